//! The interactive command editor.
//!
//! Holds a draft copy of the widget document, loaded once at
//! construction, and mutates it through a small verb-argument language.
//! Every command is isolated: a failing verb reports its error and leaves
//! the draft exactly as it was, and the loop keeps accepting input.  Only
//! `save` (and the save offer on `exit`) touches the document on disk.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crossterm::{cursor, execute, terminal};

use crate::core::error::Error;
use crate::core::ramp::parse_char_token;
use crate::core::store::{self, WidgetDocument};
use crate::core::widget::Widget;

use super::command;
use super::session::{EditSession, Prompter, SessionOutcome};

/// What the loop does after a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Exit,
}

const HELP: &str = "\
Commands (verb and arguments are separated by '-'):
  help                          show this reference
  list                          print all widget names in store order
  show -<name>                  print a widget, then offer to clear the screen
  info -<name>                  print a widget's shape, size, and properness
  del -<name ...>               delete widgets (all or nothing, confirmed)
  replace -<name> -<chars> -<char>
                                replace every listed source char with the
                                destination char; /SPC means a space
  edit -<name>                  open the widget in the grid editor
  cls                           clear the screen
  save                          write the draft back to widgets.json
  exit                          offer to save, then leave the editor";

// ───────────────────────────────────────── editor ────────────

/// Interactive editor over an in-memory draft of the store.
pub struct CommandEditor {
    location: PathBuf,
    draft: WidgetDocument,
}

impl CommandEditor {
    /// The draft is loaded exactly once; the store location is fixed for
    /// the editor's lifetime.
    pub fn new(draft: WidgetDocument, location: PathBuf) -> Self {
        Self { location, draft }
    }

    pub fn draft(&self) -> &WidgetDocument {
        &self.draft
    }

    /// Blocking command loop over stdin.  Ends on `exit` or EOF; the host
    /// process is unaffected.
    pub fn run(
        &mut self,
        prompter: &mut dyn Prompter,
        session: &mut dyn EditSession,
    ) -> anyhow::Result<()> {
        println!("Welcome to the widget editor — input help to see available commands.");
        let stdin = io::stdin();
        loop {
            print!("widget-forge> ");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }
            if self.dispatch(&line, prompter, session) == LoopAction::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and execute one input line.  All failures are caught here,
    /// reported, and turned into [`LoopAction::Continue`] — the draft is
    /// untouched by the failing command.
    pub fn dispatch(
        &mut self,
        input: &str,
        prompter: &mut dyn Prompter,
        session: &mut dyn EditSession,
    ) -> LoopAction {
        let (verb, args) = command::parse(input);
        if verb.is_empty() {
            return LoopAction::Continue;
        }
        match self.execute(&verb, &args, prompter, session) {
            Ok(Some(action)) => action,
            Ok(None) => {
                println!("command not found: {verb}");
                LoopAction::Continue
            }
            Err(err) => {
                println!("Values are illegal, please retry.");
                println!("{err}");
                LoopAction::Continue
            }
        }
    }

    /// Run a known verb.  `Ok(None)` means the verb does not exist.
    fn execute(
        &mut self,
        verb: &str,
        args: &[String],
        prompter: &mut dyn Prompter,
        session: &mut dyn EditSession,
    ) -> anyhow::Result<Option<LoopAction>> {
        let action = match verb {
            "help" => {
                println!("{HELP}");
                LoopAction::Continue
            }
            "del" => {
                self.cmd_del(args, prompter)?;
                LoopAction::Continue
            }
            "show" => {
                self.cmd_show(args, prompter)?;
                LoopAction::Continue
            }
            "cls" => {
                clear_screen()?;
                LoopAction::Continue
            }
            "list" => {
                println!("{}", self.draft.names().collect::<Vec<_>>().join(" "));
                LoopAction::Continue
            }
            "info" => {
                let name = one_arg(args)?;
                println!("{}", self.draft.info(name)?);
                LoopAction::Continue
            }
            "replace" => {
                self.cmd_replace(args, prompter)?;
                LoopAction::Continue
            }
            "edit" => {
                self.cmd_edit(args, session)?;
                LoopAction::Continue
            }
            "save" => {
                self.cmd_save(prompter)?;
                LoopAction::Continue
            }
            "exit" => {
                println!("This will leave the editor. Would you like to save your widgets?");
                if prompter.confirm("Unsaved changes are lost otherwise.") {
                    store::save(&self.draft, &self.location)?;
                }
                LoopAction::Exit
            }
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    // ── verbs ───────────────────────────────────────────────────

    fn cmd_del(&mut self, args: &[String], prompter: &mut dyn Prompter) -> anyhow::Result<()> {
        let names: Vec<&str> = one_arg(args)?.split_whitespace().collect();
        if names.is_empty() {
            return Err(Error::Arity { expected: 1, got: 0 }.into());
        }
        println!("You are going to delete: {}", names.join(" "));
        if prompter.confirm("This operation cannot be undone.") {
            self.draft.delete(&names)?;
            tracing::debug!(count = names.len(), "deleted widgets from draft");
        }
        Ok(())
    }

    fn cmd_show(&self, args: &[String], prompter: &mut dyn Prompter) -> anyhow::Result<()> {
        let name = one_arg(args)?;
        println!("{}", self.draft.get(name)?.joined());
        if prompter.confirm("Everything above will be cleared.") {
            clear_screen()?;
        }
        Ok(())
    }

    fn cmd_replace(&mut self, args: &[String], prompter: &mut dyn Prompter) -> anyhow::Result<()> {
        let [name, chars, newchar] = args else {
            return Err(Error::Arity { expected: 3, got: args.len() }.into());
        };
        let sources = chars
            .split_whitespace()
            .map(parse_char_token)
            .collect::<Result<Vec<char>, Error>>()?;
        if sources.is_empty() {
            return Err(Error::BadToken(chars.clone()).into());
        }
        let dest = parse_char_token(newchar)?;
        // Resolve the widget before prompting so a bad name fails fast.
        self.draft.get(name)?;
        println!("This will replace every listed char with {dest:?}.");
        if prompter.confirm("The widget text is rewritten in place.") {
            self.draft.get_mut(name)?.replace_chars(&sources, dest);
        }
        Ok(())
    }

    fn cmd_edit(&mut self, args: &[String], session: &mut dyn EditSession) -> anyhow::Result<()> {
        let name = one_arg(args)?;
        let lines = self.draft.get(name)?.lines().to_vec();
        match session.edit(name, &lines)? {
            SessionOutcome::Saved(lines) => {
                *self.draft.get_mut(name)? = Widget::new(lines);
                tracing::debug!(name, "editing session saved back into draft");
            }
            SessionOutcome::Discarded => {
                println!("Editing session closed without saving.");
            }
        }
        Ok(())
    }

    fn cmd_save(&self, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
        println!("This writes the whole draft to the JSON document.");
        if prompter.confirm("The previous content is overwritten.") {
            store::save(&self.draft, &self.location)?;
        }
        Ok(())
    }
}

/// Exactly one `-` argument, or an arity error.
fn one_arg(args: &[String]) -> Result<&str, Error> {
    match args {
        [arg] => Ok(arg),
        _ => Err(Error::Arity { expected: 1, got: args.len() }),
    }
}

fn clear_screen() -> io::Result<()> {
    execute!(
        io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )
}

// ───────────────────────────────────────── tests ─────────────
