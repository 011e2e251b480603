use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{GitAioError, Result};
use crate::ui::Prompter;

/// Prompter replaying canned answers in order.
///
/// `select` answers must name one of the offered options. Running out of
/// answers is an error, which is also how a non-interactive session behaves.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
    headless: bool,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
            headless: false,
        }
    }

    /// Behave like a session without a terminal: every prompt fails
    pub fn headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Prompts shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }

    fn next_answer(&self, message: &str) -> Result<String> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        if self.headless {
            return Err(GitAioError::user_input(format!(
                "cannot prompt \"{}\": not running in a terminal",
                message.trim_end_matches(':')
            )));
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .ok_or_else(|| GitAioError::user_input(format!("no answer for prompt \"{}\"", message)))
    }
}

impl Prompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        !self.headless
    }

    fn select(&self, message: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(GitAioError::user_input("no options to select from"));
        }
        let answer = self.next_answer(message)?;
        if options.contains(&answer) {
            Ok(answer)
        } else {
            Err(GitAioError::user_input(format!(
                "'{}' is not one of the offered options",
                answer
            )))
        }
    }

    fn input(&self, message: &str, required: bool) -> Result<String> {
        let answer = self.next_answer(message)?.trim().to_string();
        if required && answer.is_empty() {
            return Err(GitAioError::user_input(format!(
                "a value is required for \"{}\"",
                message
            )));
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replays_answers() {
        let prompter = ScriptedPrompter::new(["develop"]);
        let options = vec!["main".to_string(), "develop".to_string()];
        assert_eq!(prompter.select("Pick:", &options).unwrap(), "develop");
        assert_eq!(prompter.asked(), vec!["Pick:"]);
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let prompter = ScriptedPrompter::new(["hotfix"]);
        let options = vec!["main".to_string()];
        assert!(prompter.select("Pick:", &options).is_err());
    }

    #[test]
    fn test_select_without_options() {
        let prompter = ScriptedPrompter::new(["main"]);
        assert!(matches!(
            prompter.select("Pick:", &[]),
            Err(GitAioError::UserInput(_))
        ));
    }

    #[test]
    fn test_required_input() {
        let prompter = ScriptedPrompter::new(["  ", "JIRA-12 "]);
        assert!(prompter.input("Ticket:", true).is_err());
        assert_eq!(prompter.input("Ticket:", true).unwrap(), "JIRA-12");
    }

    #[test]
    fn test_headless_refuses_prompts() {
        let prompter = ScriptedPrompter::new(["JIRA-12"]).headless();
        assert!(!prompter.is_interactive());
        assert!(matches!(
            prompter.input("Ticket:", true),
            Err(GitAioError::UserInput(_))
        ));
    }

    #[test]
    fn test_exhausted_answers() {
        let prompter = ScriptedPrompter::default();
        assert!(prompter.input("Anything:", false).is_err());
    }
}
