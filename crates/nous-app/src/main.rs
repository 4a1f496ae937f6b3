//! NousSense console harness - composition root.
//!
//! Ties the crates together into a runnable binary:
//! 1. Parse CLI args and load the TOML configuration
//! 2. Initialize tracing
//! 3. Open the SQLite database and build the dispatcher
//! 4. Run a stdin REPL where each line is treated as a recognized
//!    utterance, with meta-commands for inspecting the three logs
//!
//! The REPL stands in for the recognition engine: typed lines arrive
//! with full confidence, and `:stop`/`:start` drive the listen
//! lifecycle the way the engine's lifecycle events would.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use nous_assist::{CommandDispatcher, EndOutcome, ListenLifecycle, ListenState};
use nous_core::config::NousConfig;
use nous_core::error::NousError;
use nous_storage::{Database, Snapshot};

mod cli;
mod console;

use cli::CliArgs;
use console::{ConsoleNotifier, ConsoleSynthesizer, SimulatedCamera};

#[tokio::main]
async fn main() -> Result<(), NousError> {
    let args = CliArgs::parse();
    let config = NousConfig::load_or_default(&args.resolve_config_path());

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = args.resolve_data_dir(&config.general.data_dir);
    let db_path = data_dir.join(&config.storage.db_file);
    let db = Arc::new(Database::open(&db_path)?);

    let dispatcher = CommandDispatcher::new(
        db,
        Arc::new(ConsoleSynthesizer),
        Arc::new(SimulatedCamera::new(config.camera.clone())),
        Arc::new(ConsoleNotifier),
        config.speech.clone(),
    );

    let lifecycle = ListenLifecycle::new(config.speech.auto_restart);
    lifecycle.begin()?;

    println!("NousSense — escribe un comando de voz, :help para ayuda");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(meta) = line.strip_prefix(':') {
            if !run_meta_command(meta, &dispatcher, &lifecycle).await? {
                break;
            }
            continue;
        }

        if lifecycle.current() != ListenState::Listening {
            println!("(asistente inactivo — usa :start para escuchar)");
            continue;
        }

        match dispatcher.handle_utterance(line, 1.0).await {
            Ok(snapshot) => print_counts(&snapshot),
            Err(e) => tracing::error!("Command failed: {}", e),
        }
    }

    Ok(())
}

/// Execute a `:meta` command. Returns false when the REPL should exit.
async fn run_meta_command(
    meta: &str,
    dispatcher: &CommandDispatcher,
    lifecycle: &ListenLifecycle,
) -> Result<bool, NousError> {
    match meta {
        "quit" | "q" => return Ok(false),
        "stop" => {
            if lifecycle.request_stop().is_ok() {
                // The console engine "ends" immediately after a stop.
                if lifecycle.on_end()? == EndOutcome::Stopped {
                    println!("Asistente inactivo");
                }
            }
        }
        "start" => match lifecycle.begin() {
            Ok(_) => println!("Asistente escuchando..."),
            Err(_) => println!("(ya está escuchando)"),
        },
        "history" => {
            let snapshot = dispatcher.refresh()?;
            if snapshot.history.is_empty() {
                println!("Sin historial todavía.");
            }
            for entry in &snapshot.history {
                println!("{} [{}] {}", entry.created_at, entry.kind, entry.text);
            }
        }
        "notes" => {
            let snapshot = dispatcher.refresh()?;
            if snapshot.notes.is_empty() {
                println!("Sin notas guardadas.");
            }
            for note in &snapshot.notes {
                println!("{} {}", note.created_at, note.text);
            }
        }
        "captures" => {
            let snapshot = dispatcher.refresh()?;
            if snapshot.captures.is_empty() {
                println!("No hay capturas.");
            }
            for capture in &snapshot.captures {
                println!(
                    "{} modo {} ({} bytes)",
                    capture.created_at,
                    capture.mode.label(),
                    capture.image.len()
                );
            }
        }
        "export" => {
            println!("{}", dispatcher.export_notes()?);
        }
        "clear-notes" => {
            dispatcher.clear_notes()?;
            println!("Notas eliminadas");
        }
        "clear-history" => {
            dispatcher.clear_history()?;
            println!("Historial vaciado");
        }
        _ => {
            println!(
                "Comandos: modo manos | modo cara | modo normal | iniciar cámara |\n\
                 detener cámara | capturar | guardar nota <texto> | leer notas |\n\
                 eliminar notas\n\
                 Meta: :history :notes :captures :export :clear-notes\n\
                 :clear-history :stop :start :quit"
            );
        }
    }
    Ok(true)
}

fn print_counts(snapshot: &Snapshot) {
    tracing::debug!(
        voice = snapshot.counts.voice,
        notes = snapshot.counts.notes,
        captures = snapshot.counts.captures,
        events = snapshot.counts.events,
        "Refreshed"
    );
}
