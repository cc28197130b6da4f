/*
newschat - terminal front-end.
Reads queries from stdin, drives the chat session and prints the transcript
and the article cards as they arrive.
*/

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use newschat::api::http::HttpNewsApi;
use newschat::articles::Article;
use newschat::query::{parse_command, Command, QUICK_ACTIONS};
use newschat::render::{render_card, render_entry};
use newschat::session::PendingSearch;
use newschat::{ChatError, ChatSession};

#[derive(Parser, Debug)]
#[command(name = "newschat", about = "Ask for news by topic from the terminal")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override api.base_url from the configuration
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

type SearchHandle = JoinHandle<Result<Vec<Article>, ChatError>>;

/// What has already been printed, so each redraw only appends.
#[derive(Default)]
struct Screen {
    last_entry: Option<u64>,
    cards_shown: usize,
}

impl Screen {
    fn draw(&mut self, session: &ChatSession, excerpt_chars: usize) {
        let state = session.state();
        for entry in state.transcript.entries() {
            if self.last_entry.map_or(true, |last| entry.id > last) {
                println!("{}", render_entry(entry));
                self.last_entry = Some(entry.id);
            }
        }
        let now = Utc::now();
        let articles = state.articles.articles();
        for (i, article) in articles.iter().enumerate().skip(self.cards_shown) {
            println!("{}", render_card(i, article, now, excerpt_chars));
        }
        self.cards_shown = articles.len();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they do not interleave with the transcript
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let default_path = PathBuf::from("config.default.toml");
    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    ).await {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    info!(default = ?default_path, override = ?override_path, api = %config.api.base_url, "configuration loaded");

    let api = Arc::new(HttpNewsApi::new(&config.api)?);
    match api.health().await {
        Ok(health) => info!(status = %health.status, "backend reachable"),
        Err(e) => warn!("backend health check failed: {:#}", e),
    }

    let mut session = ChatSession::new(api, &config);
    let excerpt_chars = config.display.description_excerpt_chars;
    run(&mut session, excerpt_chars).await?;

    info!("Shutdown complete");
    Ok(())
}

async fn run(session: &mut ChatSession, excerpt_chars: usize) -> Result<()> {
    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<(PendingSearch, SearchHandle)> = None;

    println!("News chat. Type a topic, #N to open a title, :quit to leave.");
    for (i, label) in QUICK_ACTIONS.iter().enumerate() {
        println!("  :{}  {}", i + 1, label);
    }

    loop {
        tokio::select! {
            joined = wait_for(&mut in_flight), if in_flight.is_some() => {
                if let Some((pending, outcome)) = joined {
                    // error already written to the transcript
                    let _ = session.complete(pending, outcome);
                    screen.draw(session, excerpt_chars);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let offered = session.state().transcript.is_empty();
                let text = match parse_command(&line, offered) {
                    Command::Quit => break,
                    Command::OpenTitle(n) => {
                        open_title(session, n, excerpt_chars);
                        continue;
                    }
                    Command::Unknown(input) => {
                        println!("      (unknown command {})", input);
                        continue;
                    }
                    Command::Query(text) => text,
                };
                match session.begin(text) {
                    Ok(pending) => {
                        let handle = tokio::spawn(session.search_task(&pending));
                        in_flight = Some((pending, handle));
                        screen.draw(session, excerpt_chars);
                    }
                    Err(ChatError::Busy) => println!("      (still searching, please wait)"),
                    Err(_) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received, exiting");
                break;
            }
        }
    }

    if let Some((pending, handle)) = in_flight.take() {
        handle.abort();
        session.cancel(pending);
    }
    Ok(())
}

async fn wait_for(
    in_flight: &mut Option<(PendingSearch, SearchHandle)>,
) -> Option<(PendingSearch, Result<Vec<Article>, ChatError>)> {
    let (_, handle) = in_flight.as_mut()?;
    let outcome = match handle.await {
        Ok(outcome) => outcome,
        Err(join_err) => {
            error!(%join_err, "search task failed");
            Err(ChatError::search_failed(join_err.to_string()))
        }
    };
    let (pending, _) = in_flight.take()?;
    Some((pending, outcome))
}

/// "Click" title N of the latest answer: find its card and show it again.
fn open_title(session: &ChatSession, n: &str, excerpt_chars: usize) {
    let state = session.state();
    let target = n
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| state.transcript.last_assistant()?.title_refs.get(i))
        .and_then(|r| state.locate_article(&r.article_id));

    match target {
        Some(position) => {
            let article = &state.articles.articles()[position];
            println!("{}", render_card(position, article, Utc::now(), excerpt_chars));
        }
        None => println!("      (no such title)"),
    }
}
