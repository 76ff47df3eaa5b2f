//! Scripted ask implementation for testing.

use crate::engine::Ask;
use crate::error::{AskError, Result};
use crate::question::Question;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Ask adapter that replays pre-programmed answers.
///
/// Answers are consumed in order, with the same retry behavior as the
/// terminal: an answer that does not satisfy the question is skipped and
/// the next one is tried. Running out of answers behaves like closed input.
///
/// # Examples
///
/// ```
/// use zenflow_ask::{Ask, Question, ScriptedAsk};
///
/// let ask = ScriptedAsk::new(["n"]);
/// let answer = ask.ask(&Question::new("Continue?").with_options(&["Y", "n"]))?;
/// assert_eq!(answer, "n");
/// assert_eq!(ask.asked(), vec!["Continue?".to_string()]);
/// # Ok::<(), zenflow_ask::AskError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedAsk {
    /// Remaining answers
    answers: Arc<Mutex<VecDeque<String>>>,
    /// Text of every question asked, in order
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAsk {
    /// Creates a scripted adapter with the given answers.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().map(Into::into).collect())),
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues another answer.
    pub fn push_answer(&self, answer: impl Into<String>) {
        self.answers.lock().unwrap().push_back(answer.into());
    }

    /// Returns the text of every question asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    /// Returns the number of answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

impl Ask for ScriptedAsk {
    fn ask(&self, question: &Question) -> Result<String> {
        self.asked.lock().unwrap().push(question.text.clone());

        if let Some(preset) = question.preset()
            && let Ok(answer) = question.resolve(preset)
        {
            return Ok(answer);
        }

        loop {
            let next = self.answers.lock().unwrap().pop_front();
            let Some(raw) = next else {
                return Err(AskError::Interrupted);
            };
            match question.resolve(&raw) {
                Ok(answer) => return Ok(answer),
                Err(err) if err.is_retryable() => continue,
                Err(err) => return Err(err),
            }
        }
    }
}
