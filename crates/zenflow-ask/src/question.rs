//! Question descriptions and answer normalization.

use crate::error::{AskError, Result};
use regex::Regex;

/// A question put to the operator.
///
/// A question may restrict answers to a set of options, validate them
/// against a pattern, provide a default for empty answers, or carry a
/// response that was already supplied (for example on the command line).
///
/// # Examples
///
/// ```
/// use zenflow_ask::Question;
///
/// let question = Question::new("Use a backup remote?")
///     .with_options(&["Y", "n"])
///     .with_default("n");
/// assert_eq!(question.prompt(), ">> Use a backup remote? [Y/n] ");
/// assert_eq!(question.resolve("").unwrap(), "n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Question {
    /// Text shown to the operator.
    pub text: String,

    /// Accepted answers (compared case-insensitively). Empty means any.
    pub options: Vec<String>,

    /// Answer used when the response is empty and the question is optional.
    pub default: Option<String>,

    /// Whether an empty response is rejected.
    pub required: bool,

    /// Pattern a non-empty response must match.
    pub validate: Option<Regex>,

    /// Message shown when validation fails.
    pub error_message: Option<String>,

    /// Response supplied ahead of time; the operator is only prompted if it
    /// is blank or invalid.
    pub response: Option<String>,

    /// Lower-case every non-empty response before it is checked.
    pub lowercase: bool,
}

impl Question {
    /// Creates an optional free-form question.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Restricts answers to the given options.
    #[must_use]
    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| (*o).to_string()).collect();
        self
    }

    /// Sets the default answer.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Marks the question as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets whether the question is required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Validates non-empty answers against `pattern`.
    #[must_use]
    pub fn with_validation(mut self, pattern: Regex, error_message: impl Into<String>) -> Self {
        self.validate = Some(pattern);
        self.error_message = Some(error_message.into());
        self
    }

    /// Folds responses to lower case before options and validation apply.
    #[must_use]
    pub fn lowercased(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Supplies a response ahead of time.
    #[must_use]
    pub fn with_response(mut self, response: Option<&str>) -> Self {
        self.response = response.map(str::to_string);
        self
    }

    /// The pre-supplied response, if it is not blank.
    pub fn preset(&self) -> Option<&str> {
        self.response
            .as_deref()
            .filter(|response| !response.trim().is_empty())
    }

    /// Renders the prompt line, e.g. `>> Question? [Y/n] `.
    pub fn prompt(&self) -> String {
        let mut prompt = format!(">> {} ", self.text);
        if !self.options.is_empty() {
            prompt.push_str(&format!("[{}] ", self.options.join("/")));
        } else if let Some(default) = &self.default {
            prompt.push_str(&format!("[{default}] "));
        }
        prompt
    }

    /// Checks a raw response against the question and normalizes it.
    ///
    /// `Y` and `N` are lower-cased; an empty response resolves to the
    /// lower-cased default unless the question is required. Questions built
    /// with [`Question::lowercased`] fold the whole response first.
    ///
    /// # Errors
    ///
    /// Returns `AskError::InvalidOption`, `AskError::ValidationFailed` or
    /// `AskError::ResponseRequired`; all of them are retryable.
    pub fn resolve(&self, raw: &str) -> Result<String> {
        let trimmed = raw.trim_end_matches(['\r', '\n']);
        let folded;
        let response = if self.lowercase {
            folded = trimmed.to_lowercase();
            folded.as_str()
        } else {
            trimmed
        };

        if response.is_empty() {
            if self.required {
                return Err(AskError::ResponseRequired);
            }
            return Ok(self
                .default
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default());
        }

        if !self.options.is_empty()
            && !self
                .options
                .iter()
                .any(|option| option.eq_ignore_ascii_case(response))
        {
            return Err(AskError::InvalidOption(response.to_string()));
        }

        if let Some(pattern) = &self.validate
            && !pattern.is_match(response)
        {
            return Err(AskError::ValidationFailed(
                self.error_message.clone().unwrap_or_else(|| {
                    format!("\"{response}\" is not a valid response. Try again.")
                }),
            ));
        }

        if response == "Y" || response == "N" {
            Ok(response.to_lowercase())
        } else {
            Ok(response.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_pattern() -> Regex {
        Regex::new(r"^[-_0-9a-z]+$").unwrap()
    }

    #[test]
    fn test_prompt_lists_options_before_default() {
        let question = Question::new("Require code reviews?")
            .with_options(&["Y", "n"])
            .with_default("Y");
        assert_eq!(question.prompt(), ">> Require code reviews? [Y/n] ");

        let question = Question::new("Primary remote?").with_default("origin");
        assert_eq!(question.prompt(), ">> Primary remote? [origin] ");

        let question = Question::new("Tag message:");
        assert_eq!(question.prompt(), ">> Tag message: ");
    }

    #[test]
    fn test_empty_response_uses_lowercased_default() {
        let question = Question::new("Continue?")
            .with_options(&["Y", "n"])
            .with_default("Y");
        assert_eq!(question.resolve("\n").unwrap(), "y");
    }

    #[test]
    fn test_empty_response_to_required_question_is_rejected() {
        let question = Question::new("Describe this feature:").required();
        assert!(matches!(
            question.resolve(""),
            Err(AskError::ResponseRequired)
        ));
    }

    #[test]
    fn test_optional_question_without_default_resolves_empty() {
        let question = Question::new("Add one line to the changelog (optional):");
        assert_eq!(question.resolve("").unwrap(), "");
    }

    #[test]
    fn test_options_are_case_insensitive_and_yes_no_lowercased() {
        let question = Question::new("Overwrite?").with_options(&["y", "N"]);
        assert_eq!(question.resolve("Y").unwrap(), "y");
        assert_eq!(question.resolve("N").unwrap(), "n");
        assert!(matches!(
            question.resolve("maybe"),
            Err(AskError::InvalidOption(answer)) if answer == "maybe"
        ));
    }

    #[test]
    fn test_validation_uses_custom_message() {
        let question = Question::new("Name of the feature:")
            .required()
            .with_validation(name_pattern(), "Names can only contain dashes, 0-9, and a-z");

        assert_eq!(question.resolve("my-feature").unwrap(), "my-feature");
        let err = question.resolve("my feature").unwrap_err();
        assert_eq!(err.to_string(), "Names can only contain dashes, 0-9, and a-z");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_lowercased_question_folds_before_validation() {
        let question = Question::new("Name of the bug:")
            .required()
            .lowercased()
            .with_validation(name_pattern(), "Names can only contain dashes, 0-9, and a-z");

        assert_eq!(question.resolve("My_Bug\n").unwrap(), "my_bug");
        assert!(question.resolve("My Bug").is_err());

        let strict = Question::new("Name of the bug:").with_validation(name_pattern(), "bad name");
        assert!(strict.resolve("My_Bug").is_err());
    }

    #[test]
    fn test_preset_ignores_blank_responses() {
        assert_eq!(
            Question::new("q").with_response(Some("  ")).preset(),
            None
        );
        assert_eq!(
            Question::new("q").with_response(Some("abc")).preset(),
            Some("abc")
        );
        assert_eq!(Question::new("q").with_response(None).preset(), None);
    }
}
