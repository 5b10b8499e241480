//! End-to-end flow: render a grid into a widget, persist it, drive the
//! command editor against the store, and check what lands back on disk.

use std::collections::VecDeque;

use widget_forge::app::editor::{CommandEditor, LoopAction};
use widget_forge::app::session::{EditSession, Prompter, SessionOutcome};
use widget_forge::core::ramp::{Ramp, Substitution};
use widget_forge::core::raster::IntensityGrid;
use widget_forge::core::store;
use widget_forge::core::widget::Widget;

/// Prompter that answers from a script, defaulting to yes.
struct Scripted(VecDeque<bool>);

impl Scripted {
    fn yes() -> Self {
        Scripted(VecDeque::new())
    }
}

impl Prompter for Scripted {
    fn confirm(&mut self, _question: &str) -> bool {
        self.0.pop_front().unwrap_or(true)
    }
}

/// Session that fills everything with `#` and saves.
struct FillSession;

impl EditSession for FillSession {
    fn edit(&mut self, _name: &str, lines: &[String]) -> anyhow::Result<SessionOutcome> {
        let filled = lines
            .iter()
            .map(|l| "#".repeat(l.chars().count()))
            .collect();
        Ok(SessionOutcome::Saved(filled))
    }
}

#[test]
fn generate_edit_and_persist_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    // A 4x3 gradient rendered through a three-step ramp.
    let grid = IntensityGrid::from_raw(
        4,
        3,
        vec![0, 0, 128, 255, 0, 128, 255, 255, 128, 255, 255, 255],
    )
    .unwrap();
    let ramp = Ramp::new(" .#").unwrap();
    let lines = grid.render(&ramp, None);
    assert_eq!(lines, vec!["  .#", " .##", ".###"]);

    // Persist it, then load a fresh draft like the editor subcommand does.
    let mut doc = store::load(dir.path()).unwrap();
    doc.put("gradient", Widget::new(lines)).unwrap();
    store::save(&doc, dir.path()).unwrap();

    let draft = store::load(dir.path()).unwrap();
    let mut editor = CommandEditor::new(draft, dir.path().to_path_buf());
    let mut prompter = Scripted::yes();

    // Replace the mid-tone dot with a space, confirmed.
    let action = editor.dispatch("replace -gradient -. -/SPC", &mut prompter, &mut FillSession);
    assert_eq!(action, LoopAction::Continue);
    assert_eq!(
        editor.draft().get("gradient").unwrap().lines(),
        &["   #", "  ##", " ###"]
    );

    // An editing session rewrites the whole grid and saves.
    editor.dispatch("edit -gradient", &mut prompter, &mut FillSession);
    assert_eq!(
        editor.draft().get("gradient").unwrap().lines(),
        &["####", "####", "####"]
    );

    // Nothing reached the file yet — the draft is in memory only.
    let on_disk = store::load(dir.path()).unwrap();
    assert_eq!(on_disk.get("gradient").unwrap().lines(), &["  .#", " .##", ".###"]);

    // `exit` with a confirmed save writes the draft back.
    let action = editor.dispatch("exit", &mut prompter, &mut FillSession);
    assert_eq!(action, LoopAction::Exit);
    let on_disk = store::load(dir.path()).unwrap();
    assert_eq!(on_disk.get("gradient").unwrap().lines(), &["####", "####", "####"]);
}

#[test]
fn substitution_and_store_order_survive_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();

    let grid = IntensityGrid::from_raw(2, 1, vec![0, 255]).unwrap();
    let ramp = Ramp::new("m#").unwrap();
    let sub = Substitution::new(&["m"], "/SPC").unwrap();
    let lines = grid.render(&ramp, Some(&sub));
    assert_eq!(lines, vec![" #"]);

    let mut doc = store::load(dir.path()).unwrap();
    doc.put("later", Widget::new(vec!["b".into()])).unwrap();
    doc.put("first", Widget::new(lines)).unwrap();
    store::save(&doc, dir.path()).unwrap();

    let reloaded = store::load(dir.path()).unwrap();
    assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["later", "first"]);

    let info = reloaded.info("first").unwrap();
    assert_eq!(info.shape, (2, 1));
    assert!(info.is_proper);
}
