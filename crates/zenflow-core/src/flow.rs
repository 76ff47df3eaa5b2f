//! Flow definitions.
//!
//! A flow (feature, hotfix, release, bug, chore) declares which long-lived
//! branches it starts from, lands in and deploys to, and which release
//! chores (version bump, changelog, tag) run when a work branch finishes.
//! Definitions are plain values built once from the project settings.

use crate::config::ProjectSettings;
use crate::error::{Result, ZenflowError};
use crate::version::VersionLevel;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Part a long-lived branch plays in a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Branch work starts from and is merged back into.
    Source,
    /// Branch the finished work lands in; defaults to the source.
    Destination,
    /// Second landing branch, e.g. the development line for hotfixes.
    SecondaryDestination,
    /// Branches that receive the work on deploy.
    Deploy,
}

impl Role {
    /// Returns the snake_case name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Destination => "destination",
            Role::SecondaryDestination => "secondary_destination",
            Role::Deploy => "deploy",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a role holds one branch or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleShape {
    /// Exactly one branch.
    Single,
    /// Two or more branches.
    Many,
}

/// Ordered, non-empty list of branches registered for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRole {
    branches: Vec<String>,
}

impl BranchRole {
    fn new(first: String) -> Self {
        Self {
            branches: vec![first],
        }
    }

    fn push(&mut self, branch: String) {
        self.branches.push(branch);
    }

    /// The only branch of the role.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::AmbiguousBranchRole` when several branches are
    /// registered.
    pub fn single(&self, flow: &str, role: Role) -> Result<&str> {
        match self.branches.as_slice() {
            [only] => Ok(only),
            many => Err(ZenflowError::AmbiguousBranchRole {
                flow: flow.to_string(),
                role,
                count: many.len(),
            }),
        }
    }

    /// All branches in registration order.
    pub fn all(&self) -> &[String] {
        &self.branches
    }

    /// Whether the role resolves to one branch or a list.
    pub fn shape(&self) -> RoleShape {
        if self.branches.len() == 1 {
            RoleShape::Single
        } else {
            RoleShape::Many
        }
    }
}

/// What happens to the changelog when a work branch finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangelogPolicy {
    /// The changelog is left alone.
    #[default]
    None,
    /// Add an entry and rotate pending changes into a dated block.
    Rotate,
    /// Add an entry without rotating.
    SansRotation,
}

impl ChangelogPolicy {
    /// Whether finishing touches the changelog at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ChangelogPolicy::None)
    }
}

/// Declarative description of one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDefinition {
    name: String,
    branches: BTreeMap<Role, BranchRole>,
    version: Option<VersionLevel>,
    changelog: ChangelogPolicy,
    tag: bool,
}

impl FlowDefinition {
    /// Starts building a flow named `name`.
    pub fn builder(name: impl Into<String>) -> FlowBuilder {
        FlowBuilder {
            definition: FlowDefinition {
                name: name.into(),
                branches: BTreeMap::new(),
                version: None,
                changelog: ChangelogPolicy::None,
                tag: false,
            },
        }
    }

    /// Flow name, also the work branch prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Branches registered for `role`, if any.
    pub fn role(&self, role: Role) -> Option<&BranchRole> {
        self.branches.get(&role)
    }

    /// The single branch registered for `role`, if any.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::AmbiguousBranchRole` when several branches are
    /// registered.
    pub fn optional_branch(&self, role: Role) -> Result<Option<&str>> {
        self.role(role)
            .map(|branches| branches.single(&self.name, role))
            .transpose()
    }

    /// The single branch registered for `role`.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::BranchRoleMissing` when nothing is registered,
    /// or `ZenflowError::AmbiguousBranchRole` when several branches are.
    pub fn branch(&self, role: Role) -> Result<&str> {
        self.optional_branch(role)?
            .ok_or_else(|| ZenflowError::BranchRoleMissing {
                flow: self.name.clone(),
                role,
            })
    }

    /// All branches registered for `role`, empty when none are.
    pub fn all_branches(&self, role: Role) -> &[String] {
        self.role(role).map(BranchRole::all).unwrap_or_default()
    }

    /// Source branch.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::BranchRoleMissing` when no source is configured.
    pub fn source(&self) -> Result<&str> {
        self.branch(Role::Source)
    }

    /// Destination branch, falling back to the source.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::BranchRoleMissing` when neither is configured.
    pub fn destination(&self) -> Result<&str> {
        match self.optional_branch(Role::Destination)? {
            Some(destination) => Ok(destination),
            None => self.source(),
        }
    }

    /// Version bump applied on finish.
    pub fn version(&self) -> Option<VersionLevel> {
        self.version
    }

    /// Changelog policy applied on finish.
    pub fn changelog(&self) -> ChangelogPolicy {
        self.changelog
    }

    /// Whether finishing creates a release tag.
    pub fn tag(&self) -> bool {
        self.tag
    }

    /// Full work branch name for an identifier.
    pub fn work_branch(&self, identifier: &str) -> String {
        format!("{}/{}", self.name, identifier)
    }
}

/// Builder for [`FlowDefinition`].
#[derive(Debug, Clone)]
pub struct FlowBuilder {
    definition: FlowDefinition,
}

impl FlowBuilder {
    /// Appends a branch to a role. `None` is ignored so unconfigured
    /// settings never register an empty branch.
    #[must_use]
    pub fn branch(mut self, role: Role, branch: Option<&str>) -> Self {
        if let Some(branch) = branch.filter(|b| !b.is_empty()) {
            match self.definition.branches.get_mut(&role) {
                Some(existing) => existing.push(branch.to_string()),
                None => {
                    self.definition
                        .branches
                        .insert(role, BranchRole::new(branch.to_string()));
                }
            }
        }
        self
    }

    /// Sets the version bump applied on finish.
    #[must_use]
    pub fn version(mut self, level: VersionLevel) -> Self {
        self.definition.version = Some(level);
        self
    }

    /// Sets the changelog policy.
    #[must_use]
    pub fn changelog(mut self, policy: ChangelogPolicy) -> Self {
        self.definition.changelog = policy;
        self
    }

    /// Enables or disables tagging on finish.
    #[must_use]
    pub fn tag(mut self, tag: bool) -> Self {
        self.definition.tag = tag;
        self
    }

    /// Finishes the definition.
    pub fn build(self) -> FlowDefinition {
        self.definition
    }
}

/// Built-in flow kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// New functionality off the development line.
    Feature,
    /// Urgent fix off the release line.
    Hotfix,
    /// Release candidate from development into the release line.
    Release,
    /// Bug fix off the development line.
    Bug,
    /// Maintenance off the development line.
    Chore,
}

impl FlowKind {
    /// Every kind, in command order.
    pub const ALL: [FlowKind; 5] = [
        FlowKind::Feature,
        FlowKind::Hotfix,
        FlowKind::Release,
        FlowKind::Bug,
        FlowKind::Chore,
    ];

    /// Flow name and branch prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Feature => "feature",
            FlowKind::Hotfix => "hotfix",
            FlowKind::Release => "release",
            FlowKind::Bug => "bug",
            FlowKind::Chore => "chore",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = ZenflowError;

    fn from_str(s: &str) -> Result<Self> {
        FlowKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ZenflowError::UnknownFlow(s.to_string()))
    }
}

/// The flows available to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRegistry {
    flows: Vec<FlowDefinition>,
}

impl FlowRegistry {
    /// Builds the built-in flows from the project settings.
    pub fn from_settings(settings: &ProjectSettings) -> Self {
        let development = settings.development_branch.as_deref();
        let staging = settings.staging_branch.as_deref();
        let qa = settings.qa_branch.as_deref();
        let release = settings.release_branch.as_deref();

        let feature = FlowDefinition::builder(FlowKind::Feature.as_str())
            .branch(Role::Source, development)
            .branch(Role::Deploy, qa)
            .build();

        let hotfix = FlowDefinition::builder(FlowKind::Hotfix.as_str())
            .branch(Role::Source, release)
            .branch(Role::Deploy, staging)
            .branch(Role::Deploy, qa)
            .branch(Role::SecondaryDestination, development)
            .changelog(ChangelogPolicy::Rotate)
            .version(VersionLevel::Patch)
            .tag(true)
            .build();

        let release_flow = FlowDefinition::builder(FlowKind::Release.as_str())
            .branch(Role::Source, development)
            .branch(Role::Deploy, staging)
            .branch(Role::Deploy, qa)
            .branch(Role::Destination, release)
            .changelog(ChangelogPolicy::Rotate)
            .version(VersionLevel::Minor)
            .tag(true)
            .build();

        let maintenance = |kind: FlowKind| {
            let builder = FlowDefinition::builder(kind.as_str())
                .branch(Role::Source, development)
                .branch(Role::Deploy, qa);
            if release.is_some() {
                builder.changelog(ChangelogPolicy::SansRotation).build()
            } else {
                builder
                    .changelog(ChangelogPolicy::Rotate)
                    .version(VersionLevel::Patch)
                    .build()
            }
        };

        Self {
            flows: vec![
                feature,
                hotfix,
                release_flow,
                maintenance(FlowKind::Bug),
                maintenance(FlowKind::Chore),
            ],
        }
    }

    /// Looks up a flow by name.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::UnknownFlow` for names that are not registered.
    pub fn get(&self, name: &str) -> Result<&FlowDefinition> {
        self.flows
            .iter()
            .find(|flow| flow.name() == name)
            .ok_or_else(|| ZenflowError::UnknownFlow(name.to_string()))
    }

    /// Every registered flow.
    pub fn iter(&self) -> impl Iterator<Item = &FlowDefinition> {
        self.flows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProjectSettings {
        ProjectSettings {
            development_branch: Some("master".to_string()),
            staging_branch: Some("staging".to_string()),
            qa_branch: Some("qa".to_string()),
            release_branch: Some("production".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_deploy_target_resolves_to_scalar() {
        let registry = FlowRegistry::from_settings(&settings());
        let feature = registry.get("feature").unwrap();

        let deploy = feature.role(Role::Deploy).unwrap();
        assert_eq!(deploy.shape(), RoleShape::Single);
        assert_eq!(feature.branch(Role::Deploy).unwrap(), "qa");
    }

    #[test]
    fn test_two_deploy_targets_resolve_to_list() {
        let registry = FlowRegistry::from_settings(&settings());
        let release = registry.get("release").unwrap();

        let deploy = release.role(Role::Deploy).unwrap();
        assert_eq!(deploy.shape(), RoleShape::Many);
        assert_eq!(deploy.all(), ["staging".to_string(), "qa".to_string()]);
        assert!(matches!(
            release.branch(Role::Deploy),
            Err(ZenflowError::AmbiguousBranchRole { count: 2, .. })
        ));
    }

    #[test]
    fn test_destination_falls_back_to_source() {
        let registry = FlowRegistry::from_settings(&settings());

        let feature = registry.get("feature").unwrap();
        assert!(feature.role(Role::Destination).is_none());
        assert_eq!(feature.destination().unwrap(), "master");

        let release = registry.get("release").unwrap();
        assert_eq!(release.destination().unwrap(), "production");
    }

    #[test]
    fn test_unconfigured_branches_are_not_registered() {
        let registry = FlowRegistry::from_settings(&ProjectSettings {
            development_branch: Some("master".to_string()),
            ..Default::default()
        });
        let hotfix = registry.get("hotfix").unwrap();

        assert!(hotfix.role(Role::Source).is_none());
        assert!(hotfix.all_branches(Role::Deploy).is_empty());
        assert!(matches!(
            hotfix.source(),
            Err(ZenflowError::BranchRoleMissing {
                role: Role::Source,
                ..
            })
        ));
    }

    #[test]
    fn test_hotfix_lands_in_two_places() {
        let registry = FlowRegistry::from_settings(&settings());
        let hotfix = registry.get("hotfix").unwrap();

        assert_eq!(hotfix.source().unwrap(), "production");
        assert_eq!(
            hotfix.optional_branch(Role::SecondaryDestination).unwrap(),
            Some("master")
        );
        assert_eq!(hotfix.version(), Some(VersionLevel::Patch));
        assert_eq!(hotfix.changelog(), ChangelogPolicy::Rotate);
        assert!(hotfix.tag());
    }

    #[test]
    fn test_bug_policy_depends_on_release_branch() {
        let with_release = FlowRegistry::from_settings(&settings());
        let bug = with_release.get("bug").unwrap();
        assert_eq!(bug.changelog(), ChangelogPolicy::SansRotation);
        assert_eq!(bug.version(), None);

        let without_release = FlowRegistry::from_settings(&ProjectSettings {
            release_branch: None,
            ..settings()
        });
        let chore = without_release.get("chore").unwrap();
        assert_eq!(chore.changelog(), ChangelogPolicy::Rotate);
        assert_eq!(chore.version(), Some(VersionLevel::Patch));
        assert!(!chore.tag());
    }

    #[test]
    fn test_unknown_flow() {
        let registry = FlowRegistry::from_settings(&settings());
        assert!(matches!(
            registry.get("bugfix"),
            Err(ZenflowError::UnknownFlow(name)) if name == "bugfix"
        ));
        assert_eq!("chore".parse::<FlowKind>().unwrap(), FlowKind::Chore);
        assert_eq!(registry.iter().count(), 5);
    }

    #[test]
    fn test_work_branch_name() {
        let flow = FlowDefinition::builder("feature").build();
        assert_eq!(flow.work_branch("my-feature"), "feature/my-feature");
    }
}
