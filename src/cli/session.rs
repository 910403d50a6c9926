//! Interactive foreground session.
//!
//! The engine runs on the current task via [`run_session`]. Keyboard input
//! is read line by line on a plain thread, since a blocked stdin read must
//! never hold up runtime shutdown, and forwarded as [`SessionCommand`]s.
//! Ctrl-C is turned into `Quit` the same way.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::sound::{try_create_player, SoundNotifier};
use crate::store::find_template;
use crate::timer::{
    run_session, ChannelNotifier, Notifiers, SessionCommand, TimerEngine, TimerEvent,
    TimerSnapshot,
};
use crate::types::SessionTemplate;

use super::display::Display;

/// How an interactive session is set up.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub sound_enabled: bool,
    pub volume: f32,
    pub autostart: bool,
    pub exit_on_complete: bool,
    pub tick_interval: Duration,
}

// ============================================================================
// Input parsing
// ============================================================================

/// What a line of keyboard input asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Command(SessionCommand),
    /// Load the template matching the query
    Load(String),
    Help,
    Unknown(String),
}

/// Parses one line typed during a session.
pub fn parse_input(line: &str) -> InputAction {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" | "p" | "toggle" => InputAction::Command(SessionCommand::Toggle),
        "play" | "start" => InputAction::Command(SessionCommand::Play),
        "pause" => InputAction::Command(SessionCommand::Pause),
        "r" | "reset" => InputAction::Command(SessionCommand::Reset),
        "s" | "skip" | "next" => InputAction::Command(SessionCommand::Skip),
        "q" | "quit" | "exit" => InputAction::Command(SessionCommand::Quit),
        "h" | "?" | "help" => InputAction::Help,
        "l" | "load" if !rest.is_empty() => InputAction::Load(rest.to_string()),
        _ => InputAction::Unknown(line.to_string()),
    }
}

// ============================================================================
// Background inputs
// ============================================================================

fn spawn_input_reader(commands: UnboundedSender<SessionCommand>, templates: Vec<SessionTemplate>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    return;
                }
            };

            let command = match parse_input(&line) {
                InputAction::Command(command) => command,
                InputAction::Load(query) => match find_template(&templates, &query) {
                    Some(template) => SessionCommand::Load(Arc::new(template.clone())),
                    None => {
                        Display::show_error(&format!("no template matches '{query}'"));
                        continue;
                    }
                },
                InputAction::Help => {
                    Display::show_session_help();
                    continue;
                }
                InputAction::Unknown(input) => {
                    Display::show_error(&format!("unknown command '{input}' (h for help)"));
                    continue;
                }
            };

            if commands.send(command).is_err() {
                return;
            }
        }
        debug!("Input closed");
    });
}

fn spawn_ctrl_c(commands: UnboundedSender<SessionCommand>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received");
            let _ = commands.send(SessionCommand::Quit);
        }
    });
}

// ============================================================================
// Output
// ============================================================================

/// Keeps the status on one rewritten line when attached to a terminal,
/// printing plain lines otherwise.
struct StatusPrinter {
    tty: bool,
    pending: bool,
}

impl StatusPrinter {
    fn new() -> Self {
        Self {
            tty: io::stdout().is_terminal(),
            pending: false,
        }
    }

    fn status(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        if self.tty {
            let _ = write!(out, "\r\x1b[2K{line}");
            self.pending = true;
        } else {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }

    fn message(&mut self, line: &str) {
        self.clear();
        println!("{line}");
    }

    fn clear(&mut self) {
        if self.pending {
            print!("\r\x1b[2K");
            self.pending = false;
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Runs `template` interactively until the user quits.
///
/// `templates` are what `l <name>` can switch to.
pub async fn run_interactive(
    template: SessionTemplate,
    templates: Vec<SessionTemplate>,
    options: SessionOptions,
) {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TimerEvent>();
    let mut notifiers = Notifiers::new().with(ChannelNotifier::new(event_tx));
    if options.sound_enabled {
        if let Some(player) = try_create_player(options.volume) {
            notifiers = notifiers.with(SoundNotifier::new(player));
        }
    }

    let mut engine = TimerEngine::with_system_clock(notifiers);
    engine.load_template(Arc::new(template));
    if options.autostart {
        engine.play();
    }

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    spawn_input_reader(command_tx.clone(), templates);
    spawn_ctrl_c(command_tx.clone());

    Display::show_session_help();
    let mut printer = StatusPrinter::new();
    let exit_on_complete = options.exit_on_complete;

    run_session(
        &mut engine,
        command_rx,
        options.tick_interval,
        |snapshot: &TimerSnapshot| {
            while let Ok(event) = event_rx.try_recv() {
                printer.message(&Display::format_event(&event, snapshot));
                if exit_on_complete && event == TimerEvent::SessionComplete {
                    let _ = command_tx.send(SessionCommand::Quit);
                }
            }
            printer.status(&Display::format_status_line(snapshot));
        },
    )
    .await;

    printer.clear();
    println!();
    debug!("Session ended: {}", Display::format_status_line(&engine.snapshot()));
}

// ============================================================================
// Tests
// ============================================================================
