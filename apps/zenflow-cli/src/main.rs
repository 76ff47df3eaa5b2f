//! Zenflow CLI - git-flow branch lifecycle tool
//!
//! Command-line interface for zenflow: one subcommand tree per flow kind
//! (feature, hotfix, release, bug, chore) plus deploy, reviews and init.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error};
use zenflow_ask::SESSION_TARGET;
use zenflow_core::log::{self, LogStyle};
use zenflow_core::{FlowKind, FlowOptions, FlowRuntime, ZenflowConfig, ZenflowError};

/// Zenflow - branch management and deployment
///
/// Starts, updates, reviews, deploys and finishes git-flow style branches.
#[derive(Parser)]
#[command(name = "zenflow", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging
    #[arg(long, global = true)]
    trace: bool,
}

/// Available zenflow commands
#[derive(Subcommand)]
enum Commands {
    /// Manage feature branches
    Feature {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Manage hotfix branches
    Hotfix {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Manage release branches
    Release {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Manage bug branches
    Bug {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Manage chore branches
    Chore {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Deploy to an environment
    Deploy {
        #[command(subcommand)]
        environment: Environment,

        /// Run migrations during deployment
        #[arg(short, long, global = true)]
        migrations: bool,
    },

    /// Work with code reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewsAction,
    },

    /// Write the zenflow config file
    Init,
}

/// Operations on the work branch of one flow
#[derive(Subcommand)]
enum BranchAction {
    /// List the local branches of this flow
    Branches,

    /// Start a new branch
    Start {
        /// Branch identifier (dashes, underscores, 0-9, a-z)
        name: Option<String>,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Update the branch from its source
    Update {
        #[command(flatten)]
        remote: RemoteArgs,

        #[command(flatten)]
        strategy: StrategyArgs,
    },

    /// Deploy the branch to the flow's deploy branches
    Deploy {
        /// Run migrations during deployment
        #[arg(short, long)]
        migrations: bool,
    },

    /// Launch the difftool against the source branch
    Diff,

    /// Open the compare view on GitHub
    Compare,

    /// Open a pull request
    Review,

    /// Merge the branch and clean up
    Finish {
        #[command(flatten)]
        remote: RemoteArgs,

        #[command(flatten)]
        strategy: StrategyArgs,
    },

    /// Delete the branch without merging it
    Abort {
        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Push the branch and track it
    Publish,
}

#[derive(Args)]
struct RemoteArgs {
    /// Skip every interaction with remotes
    #[arg(long)]
    offline: bool,
}

#[derive(Args)]
struct StrategyArgs {
    /// Rebase instead of merging
    #[arg(long)]
    rebase: bool,
}

/// Deploy environments
#[derive(Subcommand)]
enum Environment {
    /// Deploy to qa
    Qa,
    /// Deploy to staging
    Staging,
    /// Deploy to production
    Production,
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Qa => "qa",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Pull request subcommands
#[derive(Subcommand)]
enum ReviewsAction {
    /// List open pull requests
    List,
}

fn main() {
    let cli = Cli::parse();
    let repo_root = find_repo_root();

    init_tracing(cli.verbose, cli.trace, repo_root.as_deref().ok());
    if let Err(e) = exit_on_interrupt() {
        debug!("interrupt handler not installed: {e:#}");
    }

    match repo_root.and_then(|root| run_command(cli.command, root)) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {:#}", e);
            report(&e);
            std::process::exit(1);
        }
    }
}

/// Initialize tracing: diagnostics on stderr, narration mirrored to the
/// session log in the repository root.
fn init_tracing(verbose: bool, trace: bool, repo_root: Option<&Path>) {
    use tracing_subscriber::filter::Targets;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let level = if trace {
        "trace"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_filter(EnvFilter::new(format!(
            "zenflow_cli={level},zenflow_core={level},zenflow_ask={level},{SESSION_TARGET}=off"
        )));

    let session = repo_root
        .map(|root| root.join(zenflow_core::config::LOG_FILE_NAME))
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok())
        .map(|file| {
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_level(false)
                .with_filter(Targets::new().with_target(SESSION_TARGET, tracing::Level::INFO))
        });

    tracing_subscriber::registry()
        .with(stderr)
        .with(session)
        .init();
}

fn say_exiting() {
    println!();
    log::say_with("Exiting...", LogStyle::error());
}

/// Turns Ctrl-C into "Exiting..." and exit status 1.
///
/// The prompt blocks in a stdin read that SIGINT does not wake, so a
/// watcher thread ends the process itself.
#[cfg(unix)]
fn exit_on_interrupt() -> Result<()> {
    use signal_hook::consts::SIGINT;
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT]).context("Failed to register SIGINT")?;
    std::thread::Builder::new()
        .name("zenflow-interrupt".to_string())
        .spawn(move || {
            if signals.forever().next().is_some() {
                debug!("received interrupt");
                say_exiting();
                std::process::exit(1);
            }
        })
        .context("Failed to spawn the interrupt watcher")?;
    Ok(())
}

#[cfg(not(unix))]
fn exit_on_interrupt() -> Result<()> {
    Ok(())
}

/// Prints a failure the way narration prints rejections.
fn report(e: &anyhow::Error) {
    match e.downcast_ref::<ZenflowError>() {
        Some(err) if err.is_interrupt() => say_exiting(),
        // finish already explained the refusal
        Some(ZenflowError::ConfirmationDeclined(_)) => {}
        _ => log::error(&format!("{e:#}")),
    }
}

/// Execute the specified command.
///
/// Returns `false` when a shell command failed and the rest were skipped.
fn run_command(command: Commands, repo_root: PathBuf) -> Result<bool> {
    let config = ZenflowConfig::load(repo_root).context("Failed to load zenflow configuration")?;
    debug!(root = %config.repo_root.display(), configured = config.is_configured(), "loaded config");
    for (legacy, current) in config.legacy_files() {
        log::error(&format!(
            "Ignoring {}; move its settings to {} (see README, Migrating)",
            legacy.display(),
            current.display()
        ));
    }
    let mut runtime = FlowRuntime::new(config);

    match command {
        Commands::Feature { action } => run_flow(&runtime, FlowKind::Feature, action)?,
        Commands::Hotfix { action } => run_flow(&runtime, FlowKind::Hotfix, action)?,
        Commands::Release { action } => run_flow(&runtime, FlowKind::Release, action)?,
        Commands::Bug { action } => run_flow(&runtime, FlowKind::Bug, action)?,
        Commands::Chore { action } => run_flow(&runtime, FlowKind::Chore, action)?,
        Commands::Deploy {
            environment,
            migrations,
        } => runtime.deploy_to(environment.as_str(), migrations)?,
        Commands::Reviews {
            action: ReviewsAction::List,
        } => {
            runtime.list_reviews()?;
        }
        Commands::Init => {
            runtime.init()?;
        }
    }

    Ok(!runtime.exec.failed())
}

/// Dispatch one branch action for a flow
fn run_flow(runtime: &FlowRuntime, kind: FlowKind, action: BranchAction) -> Result<()> {
    let flow = kind.as_str();
    match action {
        BranchAction::Branches => {
            runtime.branches(flow)?;
        }
        BranchAction::Start { name, remote } => {
            runtime.start(flow, name.as_deref(), options(&remote, None, false))?;
        }
        BranchAction::Update { remote, strategy } => {
            runtime.update(flow, options(&remote, Some(&strategy), false))?;
        }
        BranchAction::Deploy { migrations } => {
            runtime.deploy(flow, options(&RemoteArgs { offline: false }, None, migrations))?;
        }
        BranchAction::Diff => runtime.diff(flow)?,
        BranchAction::Compare => {
            runtime.compare(flow)?;
        }
        BranchAction::Review => {
            runtime.review(flow, FlowOptions::default())?;
        }
        BranchAction::Finish { remote, strategy } => {
            runtime.finish(flow, options(&remote, Some(&strategy), false))?;
        }
        BranchAction::Abort { remote } => {
            runtime.abort(flow, options(&remote, None, false))?;
        }
        BranchAction::Publish => runtime.publish(flow, FlowOptions::default())?,
    }
    Ok(())
}

fn options(remote: &RemoteArgs, strategy: Option<&StrategyArgs>, migrations: bool) -> FlowOptions {
    FlowOptions {
        offline: remote.offline,
        rebase: strategy.is_some_and(|s| s.rebase),
        migrations,
    }
}

/// Find the repository root by searching for .git
fn find_repo_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;

    let mut path = current_dir.as_path();
    loop {
        if path.join(".git").exists() {
            return Ok(path.to_path_buf());
        }

        match path.parent() {
            Some(parent) => path = parent,
            None => return Err(ZenflowError::NotGitRepository(current_dir.clone()).into()),
        }
    }
}
