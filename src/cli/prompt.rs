//! Terminal prompt asking the operator before each step

use crate::cli::output::{style, WARN};
use crate::error::UpgradeError;
use crate::execution::{Decision, Prompter};
use console::Term;
use std::io::{BufRead, BufReader};
use std::sync::Mutex;
use tracing::warn;

type Input = Box<dyn BufRead + Send>;

/// Asks on stdout and reads answers from stdin.
///
/// Reading blocks the calling worker through `block_in_place`, so it must
/// run on the multi-threaded runtime.
pub struct TerminalPrompter {
    term: Term,
    input: Mutex<Input>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::with_input(BufReader::new(std::io::stdin()))
    }

    /// Read answers from another source
    pub fn with_input(input: impl BufRead + Send + 'static) -> Self {
        Self {
            term: Term::stdout(),
            input: Mutex::new(Box::new(input)),
        }
    }

    fn read_answer(&self) -> std::io::Result<Option<String>> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| std::io::Error::other("prompt input poisoned"))?;
        let mut answer = String::new();
        match tokio::task::block_in_place(|| input.read_line(&mut answer))? {
            0 => Ok(None),
            _ => Ok(Some(answer)),
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
        true
    }

    /// Re-asks until the answer is c, a or s; end of input counts as abort
    fn ask(&self, description: &str) -> Result<Decision, UpgradeError> {
        loop {
            let question = format!(
                "{} {} ",
                style(description).bold(),
                style("[Continue/abort/skip]").dim()
            );
            if let Err(e) = self.term.write_str(&question) {
                warn!("Failed to write prompt: {}", e);
                return Err(UpgradeError::UserAbort);
            }

            let answer = match self.read_answer() {
                Ok(Some(answer)) => answer,
                Ok(None) => {
                    warn!("No more input, aborting");
                    return Err(UpgradeError::UserAbort);
                }
                Err(e) => {
                    warn!("Failed to read answer: {}", e);
                    return Err(UpgradeError::UserAbort);
                }
            };

            match Decision::parse(&answer) {
                Some(decision) => return Ok(decision),
                None => {
                    if let Err(e) = self
                        .term
                        .write_line(&format!("{}Please answer C, A or S", WARN))
                    {
                        warn!("Failed to write prompt: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter {
        TerminalPrompter::with_input(Cursor::new(input.to_string()))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_answers_are_case_insensitive() {
        let prompter = prompter("s\nA\n");
        assert_eq!(prompter.ask("Backup mysql databases").unwrap(), Decision::Skip);
        assert!(matches!(
            prompter.ask("Backup mysql databases"),
            Ok(Decision::Abort)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_answer_asks_again() {
        let prompter = prompter("yes\n\n  c \n");
        assert_eq!(prompter.ask("Change charm channels").unwrap(), Decision::Continue);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_end_of_input_aborts() {
        let prompter = prompter("maybe\n");
        assert!(matches!(
            prompter.ask("Change charm channels"),
            Err(UpgradeError::UserAbort)
        ));
    }
}
