//! geli - terminal client for the Geli rating server
//!
//! Search a catalog, pick an item, choose a tier, then answer head-to-head
//! comparisons until the server has placed the item in the ranking.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use geli_common::events::UiEvent;
use geli_common::MediaType;
use geli_ui::command::{Command, HELP};
use geli_ui::logging;
use geli_ui::page::Page;
use geli_ui::removal::Confirm;
use geli_ui::render::{json_line, render};
use geli_ui::{ClientApp, HttpRatingApi};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{info, warn};

/// Command-line arguments for geli
#[derive(Parser, Debug)]
#[command(name = "geli")]
#[command(about = "Rate and rank games, books, movies and TV shows")]
#[command(version)]
struct Args {
    /// Path to config.toml
    #[arg(short, long, env = "GELI_CONFIG")]
    config: Option<PathBuf>,

    /// Rating server base URL
    #[arg(short, long, env = "GELI_SERVER_URL")]
    server: Option<String>,

    /// Catalog to start in (games, books, movies, tv)
    #[arg(short, long, env = "GELI_MEDIA")]
    media: Option<MediaType>,

    /// Print UI events as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// y/N prompt on the shared stdin reader
struct PromptConfirm {
    lines: InputLines,
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        println!("{} [y/N]", prompt);
        match self.lines.lock().await.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = logging::load_config(args.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(args.server, args.media);
    config.validate()?;

    logging::init(&config.logging)?;
    info!("Starting geli v{}", env!("CARGO_PKG_VERSION"));
    info!("Server: {} ({})", config.server_url, config.media);

    let api = HttpRatingApi::from_config(&config).context("Failed to create HTTP client")?;
    let base_url = api.base_url().clone();
    let bus = geli_common::events::EventBus::default();
    let mut app = ClientApp::new(
        Arc::new(api),
        base_url,
        config.media,
        config.timing.clone(),
        bus.clone(),
    );

    let (media_tx, media_rx) = watch::channel(config.media);
    let printer = tokio::spawn(print_events(bus.subscribe(), media_rx, args.json));

    println!("{} {}", config.media.emoji(), config.media.search_hint());
    println!("Type `help` for commands.");

    let lines: InputLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let confirm = PromptConfirm {
        lines: Arc::clone(&lines),
    };

    loop {
        let line = lines.lock().await.next_line().await?;
        let Some(line) = line else { break };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        handle(&mut app, command, &confirm).await;
        media_tx.send_replace(app.media());
    }

    printer.abort();
    info!("geli exiting");
    Ok(())
}

async fn handle(app: &mut ClientApp, command: Command, confirm: &PromptConfirm) {
    match command {
        Command::Search(text) => {
            if !matches!(app.page(), Page::Search(_)) {
                app.switch_media(app.media());
            }
            app.search().input(&text);
        }
        Command::Open(index) => {
            let Some(card) = app.search().cards().into_iter().nth(index - 1) else {
                println!("No result #{}", index);
                return;
            };
            match app.search().activate(card.external_id()) {
                Some(item) => {
                    if let Err(e) = app.modal().open(item) {
                        warn!("{}", e);
                    }
                }
                None => println!("\"{}\" is already ranked", card.item.name),
            }
        }
        Command::Tier(tier) => {
            // Failures are reported through the toast surface
            if let Err(e) = app.submit_tier(tier).await {
                info!("Tier not submitted: {}", e);
            }
        }
        Command::Dismiss(trigger) => app.modal().dismiss(trigger),
        Command::Answer(answer) => {
            if app.round().is_none() {
                println!("No comparison in progress");
                return;
            }
            if let Err(e) = app.answer(answer).await {
                info!("Answer not submitted: {}", e);
            }
        }
        Command::Remove { external_id, name } => {
            // Failures are reported through the toast surface
            let _ = app.removal().remove(&external_id, &name, confirm).await;
        }
        Command::Media(media) => {
            app.switch_media(media);
            println!("{} {}", media.emoji(), media.search_hint());
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

async fn print_events(
    mut rx: broadcast::Receiver<UiEvent>,
    media: watch::Receiver<MediaType>,
    json: bool,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let current = *media.borrow();
                if json {
                    match json_line(&event, current) {
                        Ok(line) => println!("{}", line),
                        Err(e) => warn!("Failed to serialize event: {}", e),
                    }
                } else if let Some(text) = render(&event, current) {
                    println!("{}", text);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Renderer lagged, {} UI events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
