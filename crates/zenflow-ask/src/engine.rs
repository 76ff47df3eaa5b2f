//! Core ask trait definition.

use crate::error::Result;
use crate::question::Question;

/// Trait for obtaining an answer to a [`Question`].
///
/// Implementations keep asking until the answer satisfies the question's
/// constraints, so callers only ever see a valid, normalized response.
///
/// # Examples
///
/// ```
/// use zenflow_ask::{Ask, Question, ScriptedAsk};
///
/// fn name_of(ask: &dyn Ask) -> zenflow_ask::Result<String> {
///     ask.ask(&Question::new("What is the name of this project?").required())
/// }
///
/// let ask = ScriptedAsk::new(["", "zenflow"]);
/// assert_eq!(name_of(&ask)?, "zenflow");
/// # Ok::<(), zenflow_ask::AskError>(())
/// ```
pub trait Ask: Send + Sync {
    /// Asks a question and returns the normalized answer.
    ///
    /// # Errors
    ///
    /// Returns `AskError::Interrupted` if input ends before a valid answer
    /// is given, or `AskError::Io` if the terminal cannot be used.
    fn ask(&self, question: &Question) -> Result<String>;
}
