//! Generate character-art widgets from images and refine them in place.
//!
//! `generate` maps a raster image onto a brightness ramp and can store the
//! result in a `widgets.json` store.  `editor` opens the interactive
//! command loop over a store.  `keys` runs the background key monitor demo.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use widget_forge::app::editor::CommandEditor;
use widget_forge::app::session::StdinPrompter;
use widget_forge::config::AppConfig;
use widget_forge::core::ramp::{Ramp, Substitution};
use widget_forge::core::raster::IntensityGrid;
use widget_forge::core::store;
use widget_forge::core::widget::Widget;
use widget_forge::keyboard;
use widget_forge::ui::edit_session::TerminalSession;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Image-to-character-art widget generator and editor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map an image onto a brightness ramp and optionally store it.
    Generate(GenerateArgs),

    /// Interactive command editor over a widget store.
    Editor {
        /// Store location: a directory holding `widgets.json`, or the
        /// file itself.
        #[arg(long, default_value = ".")]
        store: PathBuf,
    },

    /// Background keyboard monitor demo — prints `(key, timestamp)`
    /// pairs until `q` is pressed.
    Keys,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source image (any format the decoder understands).
    image: PathBuf,

    /// Store the result under this name (must not contain `-`).
    #[arg(long)]
    name: Option<String>,

    /// Store location (directory holding `widgets.json`, or the file).
    #[arg(long, default_value = ".")]
    store: PathBuf,

    /// Brightness ramp, darkest character first (default from config).
    #[arg(long)]
    ramp: Option<String>,

    /// Background characters to rewrite; `/SPC` stands for a space.
    #[arg(long, num_args = 1..)]
    base: Vec<String>,

    /// Replacement for the background characters.
    #[arg(long)]
    newbase: Option<String>,

    /// Horizontal scale factor (default from config).
    #[arg(long)]
    fx: Option<f64>,

    /// Vertical scale factor (default from config).
    #[arg(long)]
    fy: Option<f64>,

    /// Absolute output width in characters (overrides the factors).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Absolute output height in characters (overrides the factors).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Don't print the widget to stdout.
    #[arg(long)]
    quiet: bool,
}

// ───────────────────────────────────────── main ──────────────

fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load();

    match cli.command {
        Command::Generate(args) => generate(&config, args),
        Command::Editor { store } => run_editor(&config, store),
        Command::Keys => keys_demo(),
    }
}

// ───────────────────────────────────────── generate ──────────

fn generate(config: &AppConfig, args: GenerateArgs) -> Result<()> {
    let ramp = Ramp::new(args.ramp.as_deref().unwrap_or(&config.ramp))?;
    let substitution = match (&args.base[..], &args.newbase) {
        ([], None) => None,
        (bases, Some(newbase)) if !bases.is_empty() => {
            Some(Substitution::new(bases, newbase)?)
        }
        _ => anyhow::bail!("--base and --newbase must be given together"),
    };

    let grid = IntensityGrid::open(&args.image)?;
    let grid = match (args.width, args.height) {
        (Some(width), Some(height)) => grid.resize_to(width, height),
        _ => grid.scale(
            args.fx.unwrap_or(config.scale_x),
            args.fy.unwrap_or(config.scale_y),
        ),
    };

    let lines = grid.render(&ramp, substitution.as_ref());
    if !args.quiet {
        println!("{}", lines.join("\n"));
    }

    if let Some(name) = args.name {
        let mut doc = store::load(&args.store)?;
        doc.put(&name, Widget::new(lines))?;
        store::save(&doc, &args.store)?;
        println!(
            "Saved widget {name:?} to {}",
            store::document_path(&args.store).display()
        );
    }
    Ok(())
}

// ───────────────────────────────────────── editor ────────────

fn run_editor(config: &AppConfig, store_location: PathBuf) -> Result<()> {
    let draft = store::load(&store_location)?;
    let mut editor = CommandEditor::new(draft, store_location);
    let mut prompter = StdinPrompter;
    let mut session = TerminalSession::new(config);
    editor.run(&mut prompter, &mut session)
}

// ───────────────────────────────────────── keys demo ─────────

fn keys_demo() -> Result<()> {
    println!("Press keys to see them reported; q quits.");
    enable_raw_mode()?;
    let monitor = keyboard::KeyMonitor::spawn();

    let mut last_seen: Option<DateTime<Local>> = None;
    loop {
        std::thread::sleep(Duration::from_millis(20));
        let Some(snapshot) = monitor.snapshot() else {
            continue;
        };
        if last_seen == Some(snapshot.pressed_at) {
            continue; // nothing new since the last poll
        }
        last_seen = Some(snapshot.pressed_at);
        // Raw mode: carriage return has to be explicit.
        print!("{} {}\r\n", snapshot.key, snapshot.pressed_at.format("%H:%M:%S%.3f"));
        let _ = io::stdout().flush();
        if snapshot.key == "q" {
            break;
        }
    }

    disable_raw_mode()?;
    Ok(())
}
