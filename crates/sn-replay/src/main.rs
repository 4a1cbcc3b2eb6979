//! Replay host for the canvas core.
//!
//! Loads notebooks into a `MemoryStore`, opens a session on one of them,
//! feeds it a recorded list of input events, runs the resulting commits,
//! and prints the final state as JSON.
//!
//! ```text
//! sn-replay scripts/connect.json
//! RUST_LOG=debug sn-replay < script.json
//! ```

use serde::{Deserialize, Serialize};
use sn_core::{
    CanvasBounds, CanvasConfig, MemoryStore, NoteStore, NotebookId, NotebookSnapshot, StoreError,
};
use sn_editor::{CommitQueue, Effect, InputEvent, Notification, Session};
use std::io::{self, Read};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
enum ReplayError {
    #[error("cannot read script: {0}")]
    Io(#[from] io::Error),

    #[error("malformed script: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("script contains no notebooks")]
    NoNotebook,
}

/// A recorded interaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    #[serde(default)]
    config: CanvasConfig,
    notebooks: Vec<NotebookSnapshot>,
    /// Which notebook to open; the first one when absent.
    #[serde(default)]
    open: Option<NotebookId>,
    #[serde(default)]
    events: Vec<InputEvent>,
    /// Hold every commit until the script ends instead of running each
    /// event's commits immediately.
    #[serde(default)]
    defer_commits: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    notebook: NotebookSnapshot,
    stored: Option<NotebookSnapshot>,
    bounds: CanvasBounds,
    notifications: Vec<Notification>,
    navigated_to_list: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sn-replay: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ReplayError> {
    let text = match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let script: Script = serde_json::from_str(&text)?;
    let report = replay(script)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn replay(script: Script) -> Result<Report, ReplayError> {
    let target = script
        .open
        .or_else(|| script.notebooks.first().map(|s| s.notebook.id))
        .ok_or(ReplayError::NoNotebook)?;

    let mut store = MemoryStore::new(script.config);
    for snapshot in script.notebooks {
        store.insert_snapshot(snapshot);
    }
    let mut session = Session::new(store.fetch_notebook(target)?, script.config);
    let mut queue = CommitQueue::new();
    let mut surfaced = Vec::new();

    log::info!("replaying {} events on {target}", script.events.len());
    for event in &script.events {
        log::trace!("event {event:?}");
        surfaced.extend(queue.absorb(session.handle(event)));
        if !script.defer_commits {
            surfaced.extend(queue.run(&mut store, &mut session));
        }
    }
    surfaced.extend(queue.run(&mut store, &mut session));

    let mut notifications = Vec::new();
    let mut navigated_to_list = false;
    for effect in surfaced {
        match effect {
            Effect::Notify(n) => notifications.push(n),
            Effect::NavigateToList => navigated_to_list = true,
            Effect::Commit(c) => log::warn!("unexpected commit left over: {}", c.name()),
        }
    }

    let stored = match store.fetch_notebook(target) {
        Ok(snapshot) => Some(snapshot),
        Err(err) if err.is_not_found() => None,
        Err(err) => return Err(err.into()),
    };
    Ok(Report {
        notebook: session.snapshot(),
        stored,
        bounds: session.bounds(),
        notifications,
        navigated_to_list,
    })
}
