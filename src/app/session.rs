//! The editing-session boundary.
//!
//! The `edit` verb hands a widget's lines to an external session — the
//! full-screen terminal editor in `ui`, or a scripted stub in tests — and
//! only an explicit save inside the session writes lines back into the
//! draft.  Nothing else couples the command editor to any UI toolkit.

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user saved: these lines replace the widget in the draft.
    Saved(Vec<String>),
    /// The session closed without ever saving; the draft is untouched.
    Discarded,
}

/// An interactive grid-editing session over one widget.
pub trait EditSession {
    /// Run the session seeded with the widget's current lines.
    fn edit(&mut self, name: &str, lines: &[String]) -> anyhow::Result<SessionOutcome>;
}

/// The blocking yes/no confirmation gate guarding destructive and
/// persisting commands.  Terminal and test implementations both answer
/// case-insensitively with `Y`/`N`, re-prompting on anything else.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Stdin-backed gate used by the real command loop.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        use std::io::{BufRead, Write};

        println!("{question}");
        let stdin = std::io::stdin();
        loop {
            print!("Input Y/n to continue: ");
            let _ = std::io::stdout().flush();
            let mut answer = String::new();
            if stdin.lock().read_line(&mut answer).unwrap_or(0) == 0 {
                // EOF counts as a decline rather than blocking forever.
                return false;
            }
            match answer.trim() {
                "Y" | "y" => return true,
                "N" | "n" => return false,
                _ => {}
            }
        }
    }
}
