// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VideoRate console
//!
//! A line-oriented front end that drives the engine against a file-backed
//! store and prints the notifications it produces.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use videorate::{config::Config, db::FileStore, handlers, EngineState};

const HELP: &str = "\
Commands:
  signin <assertion>          sign in with an identity assertion
  signout
  consent status|accept [analytics]|accept-none|decline
  search <query>
  rate <video_id> <0-10>
  rating <video_id>
  ratings
  import <file.json>          import a watch-history export
  urls <url> [url ...]        import watch URLs
  privacy <flag> on|off
  export
  delete-ratings --yes
  delete-account --yes
  quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Starting VideoRate console");

    let store = Arc::new(FileStore::open(&config.data_dir)?);
    let mut state = EngineState::new(config, store)?;

    if !handlers::consent::check_consent_status(&mut state) {
        println!("Consent required: `consent accept [analytics]` or `consent decline`.");
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        run_command(&mut state, line).await;

        for notification in state.notifier.drain() {
            println!("[{}] {}", notification.severity, notification.message);
        }
    }

    tracing::info!("Console closed");
    Ok(())
}

async fn run_command(state: &mut EngineState, line: &str) {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    // Errors have already been pushed to the notifier by the handlers.
    match command {
        "help" => println!("{HELP}"),
        "signin" => {
            let _ = handlers::auth::sign_in(state, rest);
        }
        "signout" => {
            handlers::auth::sign_out(state);
        }
        "consent" => match rest {
            "status" => {
                let given = handlers::consent::check_consent_status(state);
                println!("consent given: {given}");
            }
            "accept" => {
                let _ = handlers::consent::accept_consent(state, true, false);
            }
            "accept analytics" => {
                let _ = handlers::consent::accept_consent(state, true, true);
            }
            "accept-none" => {
                let _ = handlers::consent::accept_consent(state, false, false);
            }
            "decline" => handlers::consent::decline_consent(state),
            _ => println!("usage: consent status|accept [analytics]|accept-none|decline"),
        },
        "search" => {
            if let Ok(query) = handlers::search::authorize_search(state, rest) {
                println!("searching for {query:?}");
            }
        }
        "rate" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next().map(str::parse::<i64>)) {
                (Some(video_id), Some(Ok(rating))) => {
                    let _ = handlers::ratings::rate_video(state, video_id, rating);
                }
                _ => println!("usage: rate <video_id> <0-10>"),
            }
        }
        "rating" => match handlers::ratings::get_rating(state, rest) {
            Some(rating) => println!("{rest}: {rating}/10"),
            None => println!("{rest}: not rated"),
        },
        "ratings" => {
            if let Ok((records, stats)) = handlers::ratings::list_ratings(state) {
                for record in &records {
                    println!("{}  {}/10  {}", record.video_id, record.rating, record.timestamp);
                }
                println!("total: {}  average: {:.1}", stats.total, stats.average);
            }
        }
        "import" => {
            if let Ok(items) = handlers::history::import_history_file(state, Path::new(rest)).await {
                for item in &items {
                    println!("{}  {}", item.video_id, item.title);
                }
            }
        }
        "urls" => {
            let text = rest.split_whitespace().collect::<Vec<_>>().join("\n");
            let _ = handlers::history::import_urls(state, &text);
        }
        "privacy" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(flag), Some(value @ ("on" | "off"))) => {
                    if let Ok(settings) =
                        handlers::account::set_privacy_flag(state, flag, value == "on")
                    {
                        println!("{settings:?}");
                    }
                }
                _ => println!("usage: privacy <analytics|recommendations|marketing> on|off"),
            }
        }
        "export" => {
            if let Ok(export) = handlers::account::export_user_data(state) {
                write_export(&export).await;
            }
        }
        "delete-ratings" => {
            let _ = handlers::ratings::delete_all_ratings(state, rest == "--yes");
        }
        "delete-account" => {
            let _ = handlers::account::delete_account(state, rest == "--yes");
        }
        other => println!("unknown command: {other} (try `help`)"),
    }
}

async fn write_export(export: &videorate::models::UserDataExport) {
    let file_name = export.file_name();
    let body = match export.to_json_pretty() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Export serialization failed");
            return;
        }
    };

    match tokio::fs::write(&file_name, body).await {
        Ok(()) => println!("wrote {file_name}"),
        Err(e) => tracing::error!(file = %file_name, error = %e, "Unable to write export"),
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("videorate=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
