//! `Letterbox` - a stack of letters in your terminal
//!
//! Open, fold or burn letters one at a time. Connect a Gmail account to
//! replace the sample correspondence with your inbox.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod command;
mod settings;
mod view;

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use letterbox_core::{
    ArchiveMode, GmailService, LetterStack, ReqwestTransport, Selection, sample_letters,
};
use letterbox_oauth::GoogleIdentity;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use command::{Command, HELP, ParseError};
use settings::{Settings, load_settings, save_settings, settings_path};

/// How long a promoted letter takes to settle on top.
const PROMOTION_DELAY: Duration = Duration::from_millis(500);
/// Length of the fold animation.
const FOLD_DELAY: Duration = Duration::from_millis(600);
/// Length of the burn animation.
const BURN_DELAY: Duration = Duration::from_millis(2400);

type Gmail = GmailService<GoogleIdentity, ReqwestTransport>;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "letterbox=info,letterbox_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Letterbox");

    let path = settings_path();
    let settings = load_settings(&path).await.unwrap_or_else(|e| {
        warn!("Ignoring unreadable settings: {e:#}");
        Settings::default()
    });

    Letterbox::new(settings, path).run().await
}

/// Whether the command loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main application state.
struct Letterbox {
    /// The letters on the desk.
    stack: LetterStack,
    /// Persisted settings.
    settings: Settings,
    /// Where the settings live.
    settings_path: PathBuf,
    /// Gmail import adapter.
    gmail: Gmail,
    /// Terminal input.
    input: Lines<BufReader<Stdin>>,
}

impl Letterbox {
    fn new(settings: Settings, settings_path: PathBuf) -> Self {
        let mut identity = GoogleIdentity::new();
        if let Some(secret) = settings.client_secret() {
            identity = identity.with_client_secret(secret);
        }

        Self {
            stack: LetterStack::new(),
            settings,
            settings_path,
            gmail: GmailService::new(Arc::new(identity), ReqwestTransport::new()),
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn run(mut self) -> Result<()> {
        self.show_stack();
        println!("Type 'help' for commands.");

        loop {
            let Some(line) = self.prompt("> ").await? else {
                break;
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(ParseError::Empty) => continue,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };

            match self.update(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => println!("{e:#}"),
            }
        }

        self.gmail.close().await;
        info!("Goodbye");
        Ok(())
    }

    async fn update(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::List => {
                self.show_stack();
                if let Some(letter) = self.stack.open_letter() {
                    println!("\n{}", view::render_letter(letter));
                }
            }
            Command::Open(id) => match self.stack.select_letter(&id) {
                Selection::Opened => {
                    if let Some(letter) = self.stack.open_letter() {
                        println!("{}", view::render_letter(letter));
                    }
                }
                Selection::Promoted => {
                    println!("Letter {id} slides to the top of the stack.");
                    tokio::time::sleep(PROMOTION_DELAY).await;
                    self.stack.finish_promotion();
                    self.show_stack();
                }
                Selection::Ignored => println!("The stack is still settling."),
                Selection::NotFound => println!("No letter with id {id}."),
            },
            Command::Close => {
                if self.stack.is_open() {
                    println!("Folding the letter closed...");
                    tokio::time::sleep(FOLD_DELAY).await;
                    self.stack.close_open();
                } else {
                    println!("No letter is open.");
                }
            }
            Command::Fold => self.archive(ArchiveMode::Fold).await,
            Command::Burn => self.archive(ArchiveMode::Burn).await,
            Command::Reply(text) => {
                if self.stack.is_open() {
                    debug!(chars = text.chars().count(), "Reply discarded");
                    println!("Reply written. Folding the letter...");
                    tokio::time::sleep(FOLD_DELAY).await;
                    self.stack.close_open();
                } else {
                    println!("Open a letter first.");
                }
            }
            Command::Reset => match self.stack.reset_to_sample() {
                Ok(()) => {
                    println!("The post has arrived.");
                    self.show_stack();
                }
                Err(e) => println!("{e}"),
            },
            Command::SignIn => {
                self.sign_in().await?;
                self.import(self.settings.max_results).await?;
            }
            Command::Import(count) => {
                self.import(count.unwrap_or(self.settings.max_results))
                    .await?;
            }
            Command::SignOut => {
                if self.gmail.is_authenticated() {
                    self.gmail.revoke_access().await;
                    self.stack.replace_all(sample_letters());
                    println!("Disconnected from Gmail.");
                } else {
                    println!("Not connected.");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn archive(&mut self, mode: ArchiveMode) {
        let (effect, delay) = match mode {
            ArchiveMode::Fold => ("Folding", FOLD_DELAY),
            ArchiveMode::Burn => ("Burning", BURN_DELAY),
        };
        let Some(subject) = self.stack.top().map(|letter| letter.subject.clone()) else {
            println!("The stack is empty.");
            return;
        };

        println!("{effect} \"{subject}\"...");
        tokio::time::sleep(delay).await;
        self.stack.archive_top(mode);
        self.show_stack();
    }

    async fn sign_in(&mut self) -> Result<()> {
        let client_id = match self.settings.client_id() {
            Some(id) => id,
            None => {
                let Some(id) = self.prompt("Google OAuth client ID: ").await? else {
                    anyhow::bail!("Please enter your Google Client ID");
                };
                let id = id.trim().to_string();
                if id.is_empty() {
                    anyhow::bail!("Please enter your Google Client ID");
                }
                self.settings.client_id = Some(id.clone());
                save_settings(&self.settings_path, &self.settings)
                    .await
                    .context("Failed to save settings")?;
                id
            }
        };

        self.gmail.init_token_client(&client_id).await?;
        println!("Complete the sign-in in your browser...");
        self.gmail.request_access().await?;
        println!("Connected to Gmail.");
        Ok(())
    }

    async fn import(&mut self, count: u32) -> Result<()> {
        let letters = self.gmail.fetch_emails(count).await?;
        info!(count = letters.len(), "Letters imported");
        self.stack.replace_all(letters);
        self.show_stack();
        Ok(())
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush()?;
        self.input.next_line().await.context("Failed to read input")
    }

    fn show_stack(&self) {
        let hour = Local::now().hour();
        print!(
            "{}",
            view::render_stack(&self.stack, &self.settings.recipient_name, hour)
        );
    }
}
