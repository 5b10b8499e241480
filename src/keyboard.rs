//! Background keyboard monitor.
//!
//! A worker thread polls the terminal for key presses and keeps only the
//! most recent `(key, timestamp)` pair behind a mutex.  Consumers poll
//! [`KeyMonitor::snapshot`] and compare timestamps to notice new presses.
//! Nothing here touches the widget store or the editor — this exists for
//! simple demo/monitoring loops only, and the terminal must be in raw
//! mode for presses to arrive unbuffered.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// The most recent key press and when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySnapshot {
    pub key: String,
    pub pressed_at: DateTime<Local>,
}

/// Handle to the monitor thread.  Dropping it leaves the daemon thread
/// running until the process exits, like any background monitor.
pub struct KeyMonitor {
    latest: Arc<Mutex<Option<KeySnapshot>>>,
}

impl KeyMonitor {
    /// Start the monitor thread.
    pub fn spawn() -> Self {
        let latest: Arc<Mutex<Option<KeySnapshot>>> = Arc::new(Mutex::new(None));
        let shared = Arc::clone(&latest);

        std::thread::spawn(move || loop {
            if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let snapshot = KeySnapshot {
                key: key_label(key.code),
                pressed_at: Local::now(),
            };
            if let Ok(mut slot) = shared.lock() {
                *slot = Some(snapshot);
            }
        });

        Self { latest }
    }

    /// The latest press, or `None` before the first one.
    pub fn snapshot(&self) -> Option<KeySnapshot> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}
