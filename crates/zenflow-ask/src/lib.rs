//! Interactive question/answer support for zenflow.
//!
//! This crate provides the prompt collaborator used by the branch workflows:
//! a [`Question`] describes what is asked (options, default, required flag,
//! regex validation, pre-supplied response), and an [`Ask`] implementation
//! obtains a valid answer for it.
//!
//! # Examples
//!
//! ```
//! use zenflow_ask::{Ask, Question, ScriptedAsk};
//!
//! let ask = ScriptedAsk::new(["Y"]);
//! let question = Question::new("Has this been code reviewed yet?")
//!     .with_options(&["Y", "n"])
//!     .with_default("Y");
//!
//! assert_eq!(ask.ask(&question)?, "y");
//! # Ok::<(), zenflow_ask::AskError>(())
//! ```

pub mod engine;
pub mod error;
pub mod question;
pub mod scripted;
pub mod terminal;

pub use engine::Ask;
pub use error::{AskError, Result};
pub use question::Question;
pub use scripted::ScriptedAsk;
pub use terminal::TerminalAsk;

/// Tracing target mirrored into the session log file.
pub const SESSION_TARGET: &str = "zenflow_session";
