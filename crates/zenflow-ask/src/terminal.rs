//! Terminal-backed ask implementation.

use crate::SESSION_TARGET;
use crate::engine::Ask;
use crate::error::{AskError, Result};
use crate::question::Question;
use crossterm::style::Stylize;
use std::io::{BufRead, Write};

/// Asks questions on stdin/stdout.
///
/// Invalid answers are reported and the question is asked again. Closing
/// stdin ends the loop with `AskError::Interrupted`. Every prompt and
/// response is mirrored to the session log target.
#[derive(Debug, Default)]
pub struct TerminalAsk;

impl TerminalAsk {
    /// Creates a new terminal ask adapter.
    pub fn new() -> Self {
        Self
    }

    /// Runs the ask loop against arbitrary input and output streams.
    ///
    /// # Errors
    ///
    /// Returns `AskError::Interrupted` when `input` reaches end of file, or
    /// `AskError::Io` if reading or writing fails.
    pub fn ask_with<R: BufRead, W: Write>(
        &self,
        question: &Question,
        input: &mut R,
        output: &mut W,
    ) -> Result<String> {
        let mut preset = question.preset().map(str::to_string);

        loop {
            let raw = match preset.take() {
                Some(response) => response,
                None => {
                    let prompt = question.prompt();
                    tracing::info!(target: SESSION_TARGET, "Asked: {prompt}");
                    write!(output, "{prompt}")?;
                    output.flush()?;

                    let mut line = String::new();
                    if input.read_line(&mut line)? == 0 {
                        writeln!(output)?;
                        tracing::info!(target: SESSION_TARGET, "-----> Received interrupt. Exiting...");
                        return Err(AskError::Interrupted);
                    }
                    line
                }
            };

            let raw = raw.trim_end_matches(['\r', '\n']);
            tracing::info!(target: SESSION_TARGET, "Response: {raw}");

            match question.resolve(raw) {
                Ok(answer) => return Ok(answer),
                Err(err) if err.is_retryable() => {
                    writeln!(output, "{}", format!("-----> {err}").red())?;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Ask for TerminalAsk {
    fn ask(&self, question: &Question) -> Result<String> {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        self.ask_with(question, &mut input, &mut output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(question: &Question, input: &str) -> (Result<String>, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = TerminalAsk::new().ask_with(question, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_reads_answer_from_input() {
        let question = Question::new("What is the name of this project?").required();
        let (result, output) = run(&question, "zenflow\n");

        assert_eq!(result.unwrap(), "zenflow");
        assert_eq!(output, ">> What is the name of this project? ");
    }

    #[test]
    fn test_reprompts_until_valid() {
        let question = Question::new("Continue?").with_options(&["Y", "n"]);
        let (result, output) = run(&question, "maybe\nn\n");

        assert_eq!(result.unwrap(), "n");
        assert!(output.contains("\"maybe\" is not a valid response. Try again."));
        assert_eq!(output.matches(">> Continue? [Y/n] ").count(), 2);
    }

    #[test]
    fn test_preset_response_skips_prompt() {
        let question = Question::new("Name of the feature:")
            .required()
            .with_response(Some("my-feature"));
        let (result, output) = run(&question, "");

        assert_eq!(result.unwrap(), "my-feature");
        assert!(output.is_empty());
    }

    #[test]
    fn test_invalid_preset_falls_back_to_prompt() {
        let question = Question::new("Continue?")
            .with_options(&["Y", "n"])
            .with_response(Some("perhaps"));
        let (result, output) = run(&question, "Y\n");

        assert_eq!(result.unwrap(), "y");
        assert!(output.contains("\"perhaps\" is not a valid response"));
    }

    #[test]
    fn test_end_of_input_is_an_interrupt() {
        let question = Question::new("Describe this feature:").required();
        let (result, _) = run(&question, "\n");

        assert!(matches!(result, Err(AskError::Interrupted)));
    }
}
