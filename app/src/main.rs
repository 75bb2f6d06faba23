//! Draft Desk - Main application entry point

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use draftdesk_core::{init, Config, DeskError, DraftController, DraftDesk, DraftState, HttpBackend};

mod render;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the inbox service
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List unread threads
    Inbox,
    /// Print the conversation of a thread
    Show { thread_id: String },
    /// Generate and print a draft reply
    Draft { thread_id: String },
    /// Review a draft and send it
    Reply {
        thread_id: String,

        /// Send the contents of this file instead of the generated draft
        #[arg(long)]
        draft_file: Option<PathBuf>,

        /// Send without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

type Desk = DraftDesk<HttpBackend>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args)?;

    // Initialize logging
    let log_level = if args.debug || config.app.debug {
        "debug"
    } else {
        config.app.log_level.as_str()
    };

    tracing_subscriber::fmt()
        .with_max_level(match log_level {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        })
        .with_writer(io::stderr)
        .init();

    info!("Starting Draft Desk v{}", env!("CARGO_PKG_VERSION"));

    // Initialize core library
    if let Err(e) = init() {
        error!("Failed to initialize core library: {}", e);
        return Err(e.into());
    }

    let backend = HttpBackend::new(&config.backend).context("Failed to create inbox client")?;
    info!("Using inbox service at {}", backend.base_url());
    let desk = DraftDesk::with_controller(
        backend,
        DraftController::with_fallback_error(config.drafting.fallback_error.clone()),
    );

    desk.refresh().await;

    match args.command {
        Commands::Inbox => {
            print!("{}", render::inbox(&desk.snapshot().threads));
        }
        Commands::Show { thread_id } => {
            let thread = desk
                .inspect(|c| c.thread(&thread_id).cloned())
                .with_context(|| format!("Thread {} is not in the unread inbox", thread_id))?;
            let units: Vec<_> = thread.exchanges().collect();
            print!("{}", render::conversation(&thread, &units));
        }
        Commands::Draft { thread_id } => {
            generate(&desk, &thread_id).await?;
            print!("{}", render::draft(&desk.state()));
        }
        Commands::Reply {
            thread_id,
            draft_file,
            yes,
        } => reply(&desk, &thread_id, draft_file, yes).await?,
    }

    Ok(())
}

/// File config, then environment, then command line flags
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::load_from_env().config_file_path(),
    };

    let mut config = Config::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    config.apply_env();
    if let Some(api_base) = &args.api_base {
        config.backend.base_url = api_base.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Select a thread and wait for its draft
async fn generate(desk: &Desk, thread_id: &str) -> anyhow::Result<()> {
    if desk.inspect(|c| c.thread(thread_id).is_none()) {
        bail!("Thread {} is not in the unread inbox", thread_id);
    }

    desk.select_thread(thread_id).await;
    if let DraftState::Error { message } = desk.state() {
        bail!(message);
    }
    Ok(())
}

async fn reply(
    desk: &Desk,
    thread_id: &str,
    draft_file: Option<PathBuf>,
    yes: bool,
) -> anyhow::Result<()> {
    match draft_file {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read draft from {}", path.display()))?;
            if desk.inspect(|c| c.thread(thread_id).is_none()) {
                bail!("Thread {} is not in the unread inbox", thread_id);
            }
            desk.compose(thread_id, text.trim_end());
        }
        None => generate(desk, thread_id).await?,
    }

    print!("{}", render::draft(&desk.state()));
    if !desk.inspect(|c| c.can_send()) {
        return Err(DeskError::validation("Draft is empty").into());
    }

    if !yes && !confirm("Send this reply?")? {
        println!("Reply not sent.");
        return Ok(());
    }

    desk.send().await;
    let snapshot = desk.snapshot();
    if let Some(notice) = snapshot.error {
        if let Some(draft) = desk.draft() {
            println!("{}", draft);
        }
        bail!(notice);
    }

    println!("Reply sent.");
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
