//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `scripted` - Canned answers for non-interactive use and tests
//! - This module - The [Prompter] seam and its terminal implementation

use console::Term;
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input};

use crate::error::{GitAioError, Result};

pub mod formatter;
pub mod scripted;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_conflict_instructions, display_error,
    display_manual_push_instruction, display_proposed_tag, display_status, display_success,
};
pub use scripted::ScriptedPrompter;

/// Source of interactive answers
pub trait Prompter {
    /// Pick one of `options`. Fails when `options` is empty.
    fn select(&self, message: &str, options: &[String]) -> Result<String>;

    /// Free text answer. A `required` answer may not be blank.
    fn input(&self, message: &str, required: bool) -> Result<String>;

    /// Whether prompts can reach a user
    fn is_interactive(&self) -> bool {
        true
    }
}

/// Prompter reading from the controlling terminal.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter {
            term: Term::stderr(),
        }
    }

    fn ensure_interactive(&self, message: &str) -> Result<()> {
        if self.is_interactive() {
            Ok(())
        } else {
            Err(GitAioError::user_input(format!(
                "cannot prompt \"{}\": not running in a terminal",
                message.trim_end_matches(':')
            )))
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }

    fn select(&self, message: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(GitAioError::user_input("no options to select from"));
        }
        self.ensure_interactive(message)?;

        let index = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(options)
            .default(0)
            .interact_on(&self.term)
            .map_err(|e| GitAioError::prompt(e.to_string()))?;

        Ok(options[index].clone())
    }

    fn input(&self, message: &str, required: bool) -> Result<String> {
        self.ensure_interactive(message)?;

        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty(!required)
            .validate_with(|value: &String| -> std::result::Result<(), &'static str> {
                if required && value.trim().is_empty() {
                    Err("a value is required")
                } else {
                    Ok(())
                }
            })
            .interact_text_on(&self.term)
            .map_err(|e| GitAioError::prompt(e.to_string()))?;

        Ok(answer.trim().to_string())
    }
}
