//! Interactive notepad shell.
//!
//! # Responsibility
//! - Wire config, logging and the SQLite key-value backend into a session.
//! - Translate stdin lines into session commands and print the outcome.
//!
//! # Invariants
//! - Autosave and pending drawing restores run after every input line.
//! - Storage failures are reported through the status line, never fatal.

mod shell;

use chrono::Local;
use log::{info, warn};
use notepad_core::db::open_db;
use notepad_core::{
    format_last_saved, init_logging, Command, ListView, NoteSession, NoteStore,
    NotepadConfig, PixelCanvas, SqliteKvStore, SystemClock, TextBuffer, TextSurface,
};
use shell::{parse_line, Input, HELP};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 600;

type Session<'conn> = NoteSession<SqliteKvStore<'conn>, TextBuffer, PixelCanvas, SystemClock>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notepad: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = NotepadConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let backend = match config.quota_bytes {
        Some(quota) => SqliteKvStore::with_quota(&conn, quota),
        None => SqliteKvStore::new(&conn),
    };
    let mut session = NoteSession::open(
        NoteStore::with_key(backend, config.storage_key.as_str()),
        TextBuffer::new(),
        PixelCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        SystemClock,
        &config.session,
    );
    session.restore_drawings_now();
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    println!("notepad {} (type `help`)", notepad_core::core_version());
    print_current(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(Input::Quit) => break,
            Ok(input) => apply(&mut session, input),
            Err(message) => println!("{message}"),
        }
        if session.tick() {
            println!("(autosaved)");
        }
        session.restore_drawings_now();
        stdout.flush()?;
    }

    session.flush();
    if session.status_is_error() {
        warn!("event=cli_exit module=cli status=error");
        println!("{}", session.status_text());
    }
    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn apply(session: &mut Session<'_>, input: Input) {
    match input {
        Input::Session(command) => {
            let switches = matches!(
                command,
                Command::NewNote | Command::OpenNote(_) | Command::Delete
            );
            session.dispatch(command);
            if switches {
                print_current(session);
            }
            println!("{}", session.status_text());
        }
        Input::Format(range, format) => {
            session.text_mut().select(range);
            session.dispatch(Command::ToggleFormat(format));
            println!("{}", session.text().content());
        }
        Input::Pen(color, width) => {
            session.dispatch(Command::SetPenColor(color));
            session.dispatch(Command::SetPenWidth(width));
            let drawing = session.drawing();
            println!("pen {} width {}", drawing.color().to_hex(), drawing.width());
        }
        Input::Stroke(points) => {
            let mut points = points.into_iter();
            if let Some(first) = points.next() {
                session.dispatch(Command::PointerDown(first));
                for point in points {
                    session.dispatch(Command::PointerMove(point));
                }
                session.dispatch(Command::PointerUp);
            }
            if session.mode().composite().is_none() {
                println!("switch to `mode draw` or `mode erase` first");
            }
        }
        Input::List(query) => {
            session.dispatch(Command::Search(query));
            print_list(&session.list_view());
        }
        Input::Status => {
            println!("{}", session.status_text());
            if let Some(saved) = session.status().last_saved() {
                println!("{}", format_last_saved(&saved.with_timezone(&Local)));
            }
            println!("mode {}", session.mode().label());
        }
        Input::Help => println!("{HELP}"),
        Input::Quit | Input::Blank => {}
    }
}

fn print_current(session: &Session<'_>) {
    if let Some(id) = session.current_id() {
        println!("[{id}] {}", session.text().title());
    }
}

fn print_list(view: &ListView) {
    match view {
        ListView::Empty(message) => println!("{message}"),
        ListView::Items(items) => {
            for item in items {
                let marker = if item.active { '*' } else { ' ' };
                println!("{marker} [{}] {}\n    {}", item.id, item.title, item.preview);
            }
        }
    }
}
