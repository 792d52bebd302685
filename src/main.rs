mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, parse_target};
use crate::state::messages::UiEvent;
use crossterm::event::{self as crossterm_event, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::{cursor, execute, terminal};
use shortlist_engine::ByePolicy;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = AppSettings::load();
    if handle_cli_args(&mut settings) {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx).await;

    input_handler.abort();
    cleanup_terminal();

    Ok(())
}

#[derive(Debug, PartialEq)]
enum CliAction {
    Run,
    Help,
    Version,
}

fn handle_cli_args(settings: &mut AppSettings) -> bool {
    match parse_cli_args(std::env::args().skip(1), settings) {
        Ok(CliAction::Run) => false,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            true
        }
        Ok(CliAction::Version) => {
            println!("shortlist {}", env!("CARGO_PKG_VERSION"));
            true
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

/// Apply command-line flags on top of `settings`.
fn parse_cli_args(
    args: impl IntoIterator<Item = String>,
    settings: &mut AppSettings,
) -> Result<CliAction, String> {
    let mut args = args.into_iter();
    let mut file_given = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "-a" | "--auto-bye" => settings.bye_policy = ByePolicy::Auto,
            "-t" | "--target" => {
                let value = args.next().ok_or_else(|| format!("{arg} needs a value"))?;
                settings.target_size = parse_target(&value)?;
            }
            _ if arg.starts_with("--target=") => {
                settings.target_size = parse_target(&arg["--target=".len()..])?;
            }
            _ if arg.starts_with('-') => return Err(format!("Unknown argument: {arg}")),
            _ if file_given => return Err(format!("Only one entries file is supported: {arg}")),
            _ => {
                // Replaces SHORTLIST_FILE, if that was set.
                settings.entries_path = Some(PathBuf::from(&arg));
                file_given = true;
            }
        }
    }
    Ok(CliAction::Run)
}

fn usage_text() -> &'static str {
    "shortlist - narrow a list down to a top N by picking winners of head-to-head duels

Usage:
  shortlist [OPTIONS] [FILE]
  shortlist --help
  shortlist --version

Arguments:
  FILE                 Entries to rank: one \"title - artist\" per line, or a JSON
                       array of {\"title\", \"artist\"} objects (.json)

Options:
  -t, --target N       Size of the shortlist (default 10)
  -a, --auto-bye       Advance unpaired items without asking

Environment:
  SHORTLIST_TARGET     Default for --target
  SHORTLIST_AUTO_BYE   1/true/yes/on to advance byes automatically
  SHORTLIST_LOG        Log level for the log pane (error, warn, info, debug, trace)
  SHORTLIST_FILE       Default entries file"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
) {
    while let Some(ui_event) = ui_events.recv().await {
        if handle_ui_event(ui_event, &app).await {
            let mut app_guard = app.lock().await;
            draw::draw(&mut terminal, &mut app_guard);
        }
    }
}

async fn handle_ui_event(ui_event: UiEvent, app: &Arc<Mutex<App>>) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            app.lock().await.on_app_started();
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app).await;
            true
        }
        UiEvent::Pasted(text) => {
            keys::handle_paste(text, app).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Paste(text) => Some(UiEvent::Pasted(text)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, EnableBracketedPaste)?;
    terminal::enable_raw_mode()
}

/// Best effort: runs from the panic hook too, where nothing can be reported.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableBracketedPaste);
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
