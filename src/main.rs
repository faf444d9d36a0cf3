//! # Reqscope CLI Entry Point
//!
//! Reqscope is a terminal user interface for browsing captured HTTP
//! traffic. It loads HAR capture files, lists the requests in a compact
//! grid, and opens a per-request detail pane with headers, response body
//! and timing breakdown.
//!
//! ## Usage
//!
//! ```bash
//! # Scan the current directory for .har files
//! reqscope
//!
//! # Scan a specific directory
//! reqscope --path ./captures
//!
//! # Load a single capture file
//! reqscope --file ./session.har
//!
//! # Explore the interface with a built-in capture
//! reqscope --demo
//!
//! # Debug mode - print loaded requests and exit
//! reqscope --debug
//! ```
//!
//! ## Startup
//!
//! Startup runs in three steps: load records from the chosen source,
//! restore persisted settings, then hand both to the [`App`] and poll for
//! keys until it asks to quit. Everything interesting happens behind
//! `App::handle_key`; this file only owns the terminal.
//!
//! ## Key Bindings
//!
//! ### Requests panel
//! - `q` / `Q` - Quit the application
//! - `j` / `Down`, `k` / `Up` - Move selection
//! - `Enter` - Open the selected request
//! - `Esc` - Close the detail pane
//! - `Tab` - Cycle detail sections
//! - `PgUp` / `PgDn` - Scroll the detail pane
//! - `/` - Search visible requests, `n` / `N` - jump between matches
//! - `f` - Filter the grid, `c` - clear all requests
//! - `d` - Toggle row density, `y` - copy the request URL
//! - `m` - Context menu, `t` - cycle theme, `i` - help
//!
//! ### Overview panel
//! - `1` / `2` - Switch panels
//! - `j` / `k` - Move through failed requests
//! - `Enter` - Reveal the failure in the Requests panel

use reqscope::record::{self, RecordStore};
use reqscope::ui;
use reqscope::ui::config::Config;
use reqscope::ui::theme::Theme;
use reqscope::ui::App;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

/// Where `run_app` gets its input. A trait so tests can feed it scripted
/// events instead of a live terminal.
trait EventSource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// The live source over crossterm's poll/read pair.
struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout).context("Failed to poll for events")? {
            return Ok(None);
        }
        let event = event::read().context("Failed to read keyboard event")?;
        Ok(Some(event))
    }
}

/// Reqscope - A TUI for inspecting captured HTTP traffic
#[derive(Parser, Debug)]
#[command(name = "reqscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse HAR captures from your terminal", long_about = None)]
struct Args {
    /// Path to a directory to scan for .har capture files
    #[arg(short, long, value_name = "DIR", conflicts_with = "file")]
    path: Option<PathBuf>,

    /// Path to a single .har capture file to load
    #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "path")]
    file: Option<PathBuf>,

    /// Load a built-in demo capture instead of reading files
    #[arg(long, conflicts_with_all = ["path", "file"])]
    demo: bool,

    /// Print debug information about loaded requests and exit
    #[arg(long)]
    debug: bool,

    /// Color theme to use for this run (see the in-app help for names)
    #[arg(short, long, value_name = "NAME")]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A panic inside the TUI would land on the alternate screen in raw
    // mode, leaving the message invisible and the terminal wedged. Leave
    // both before the default hook prints.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    let _ = panic::take_hook();

    result
}

async fn run_application(args: Args) -> Result<()> {
    // Pick the capture source: demo data, a single file, or a directory
    // scan. `source` feeds the messages below.
    let (records, source) = if args.demo {
        (record::demo_records(), "built-in demo capture".to_string())
    } else if let Some(file_path) = args.file {
        let canonical_path = file_path
            .canonicalize()
            .with_context(|| format!("Failed to access file: {}", file_path.display()))?;

        let records = record::load_capture_file(&canonical_path)?;
        (records, canonical_path.display().to_string())
    } else {
        let capture_dir = if let Some(path) = args.path {
            path.canonicalize()
                .with_context(|| format!("Failed to access directory: {}", path.display()))?
        } else {
            std::env::current_dir().context("Failed to get current working directory")?
        };

        let records = record::load_capture_dir(&capture_dir)?;
        (records, capture_dir.display().to_string())
    };

    // Debug mode: print loaded requests and exit
    if args.debug {
        println!("=== Loaded Requests ===");
        for record in &records {
            println!(
                "  {} {} {}\n    Id: {}  Type: {}  Size: {}  Time: {:.0} ms\n",
                record.method,
                record.url,
                record.status_display(),
                record.id,
                record.mime_type,
                record.size_display(),
                record.duration_ms
            );
        }
        println!("Total: {} requests from {}", records.len(), source);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("Warning: No requests found");
        eprintln!("Searched in: {}", source);
        eprintln!("\nPoint reqscope at a directory containing .har capture files:");
        eprintln!("  reqscope --path ./captures");
        eprintln!("\nOr load a single capture:");
        eprintln!("  reqscope --file ./session.har");
        eprintln!("\nTo explore the interface without a capture of your own:");
        eprintln!("  reqscope --demo");
        std::process::exit(1);
    }

    // Load persisted settings; a CLI theme overrides them for this run
    let mut config = Config::load();
    if let Some(theme_name) = args.theme {
        if Theme::by_name(&theme_name).is_some() {
            config.theme = theme_name;
        } else {
            let available: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
            eprintln!(
                "Warning: Unknown theme '{}', keeping '{}'. Available: {}",
                theme_name,
                config.theme,
                available.join(", ")
            );
        }
    }

    // From here on stdout belongs to the TUI.
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(RecordStore::new(records), config);

    let mut events = TerminalEvents;
    let run_result = run_app(&mut terminal, &mut app, &mut events).await;

    // Cleanup must run whether or not the loop failed.
    let cleanup_result = cleanup_terminal(&mut terminal);

    // Persist settings changed during the session (theme, row density).
    // After cleanup, so the warning lands on the normal screen.
    if let Err(e) = app.config.save() {
        eprintln!("Warning: Failed to save config: {e}");
    }

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Undo the raw-mode and alternate-screen setup.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut dyn EventSource,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;

        let event = match events.next_event(Duration::from_millis(100))? {
            Some(e) => e,
            None => continue,
        };

        if let Event::Key(key) = event {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    /// Hands out a fixed sequence of key events, then reports the input
    /// as drained.
    struct ScriptedEvents {
        queue: VecDeque<Event>,
    }

    impl ScriptedEvents {
        fn new(codes: &[KeyCode]) -> Self {
            let queue = codes
                .iter()
                .map(|&code| Event::Key(KeyEvent::new(code, KeyModifiers::empty())))
                .collect();
            Self { queue }
        }
    }

    impl EventSource for ScriptedEvents {
        fn next_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.queue.pop_front())
        }
    }

    #[test]
    fn test_scripted_events_replay_in_order_then_drain() {
        let mut source =
            ScriptedEvents::new(&[KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Enter]);

        for expected in [KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Enter] {
            match source.next_event(Duration::from_millis(10)).unwrap() {
                Some(Event::Key(key)) => assert_eq!(key.code, expected),
                other => panic!("expected a key event, got {other:?}"),
            }
        }

        let drained = source.next_event(Duration::from_millis(10)).unwrap();
        assert!(drained.is_none());
    }

    #[test]
    fn test_event_sources_are_object_safe() {
        let _live: Box<dyn EventSource> = Box::new(TerminalEvents);
        let _scripted: Box<dyn EventSource> = Box::new(ScriptedEvents::new(&[]));
    }

    #[test]
    fn test_args_default_to_directory_scan() {
        let args = Args::try_parse_from(["reqscope"]).unwrap();
        assert!(args.path.is_none());
        assert!(args.file.is_none());
        assert!(!args.demo);
        assert!(!args.debug);
        assert!(args.theme.is_none());
    }

    #[test]
    fn test_args_parse_path_and_file() {
        let args = Args::try_parse_from(["reqscope", "--path", "/some/captures"]).unwrap();
        assert_eq!(args.path, Some(PathBuf::from("/some/captures")));

        let args = Args::try_parse_from(["reqscope", "-f", "/some/session.har"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("/some/session.har")));
    }

    #[test]
    fn test_args_conflict_path_and_file() {
        let result = Args::try_parse_from(["reqscope", "--path", "/a", "--file", "/b.har"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_conflict_demo_and_path() {
        let result = Args::try_parse_from(["reqscope", "--demo", "--path", "/a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_parse_theme() {
        let args = Args::try_parse_from(["reqscope", "--demo", "--theme", "Nord"]).unwrap();
        assert!(args.demo);
        assert_eq!(args.theme, Some("Nord".to_string()));
    }

    /// Builds `Args` the way a user would, through the parser.
    fn parse_args(argv: &[&str]) -> Args {
        let full: Vec<&str> = std::iter::once("reqscope").chain(argv.iter().copied()).collect();
        Args::try_parse_from(full).unwrap()
    }

    #[tokio::test]
    async fn test_run_application_nonexistent_directory() {
        let err = run_application(parse_args(&["--path", "/no/such/capture/dir"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to access directory"));
    }

    #[tokio::test]
    async fn test_run_application_file_instead_of_directory() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("notadir.txt");
        fs::write(&file_path, "plain text").unwrap();

        let err = run_application(parse_args(&["--path", &file_path.to_string_lossy()]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[tokio::test]
    async fn test_run_application_with_file_nonexistent() {
        let err = run_application(parse_args(&["--file", "/no/such/session.har"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to access file"));
    }

    #[tokio::test]
    async fn test_run_application_with_invalid_har_file() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let har_path = temp_dir.path().join("broken.har");
        fs::write(&har_path, "this is not json").unwrap();

        let err = run_application(parse_args(&["--file", &har_path.to_string_lossy()]))
            .await
            .unwrap_err();
        assert!(format!("{err:?}").contains("Failed to parse HAR file"));
    }

    #[tokio::test]
    async fn test_run_application_demo_debug() {
        // Debug mode prints the demo records and returns without touching
        // the terminal.
        let result = run_application(parse_args(&["--demo", "--debug"])).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_application_empty_directory_debug() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let dir_arg = temp_dir.path().to_string_lossy().into_owned();

        let result = run_application(parse_args(&["--path", &dir_arg, "--debug"])).await;
        assert!(result.is_ok());
    }
}
