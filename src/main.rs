use std::io;
use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use crossterm::tty::IsTty;
use dotenv::dotenv;
use eyre::{Result, WrapErr};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use conversation_buffer::cli::chat::ChatContext;
use conversation_buffer::cli::chat::display::Theme;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Args)]
struct SessionArgs {
    /// Maximum number of finalized prompt/response pairs kept in the context window
    #[arg(
        short = 'k',
        long,
        global = true,
        env = "CONVERSATION_WINDOW_SIZE",
        default_value = "3"
    )]
    window_size: NonZeroUsize,

    /// Command to run instead of starting an interactive session (repeatable)
    #[arg(short, long, global = true)]
    input: Vec<String>,

    /// Print STATUS and HISTORY as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Start a conversation session
    Chat,
    /// Run the healthy salad walkthrough, then any --input commands, and exit
    Demo,
}

impl Cli {
    /// Commands to run non-interactively. Empty means an interactive session.
    fn scripted_inputs(&self) -> Vec<String> {
        match self.command {
            Some(Commands::Demo) => std::iter::once("DEMO".to_string())
                .chain(self.session.input.iter().cloned())
                .collect(),
            Some(Commands::Chat) | None => self.session.input.clone(),
        }
    }
}

fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let session = &cli.session;

    let log_level = if session.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("Failed to set tracing subscriber")?;

    info!("Starting conversation buffer CLI");

    let color = io::stdout().is_tty() && std::env::var_os("NO_COLOR").is_none();

    let mut chat_context = ChatContext::new(
        Box::new(io::stdout()),
        cli.scripted_inputs(),
        session.window_size,
        session.json,
        Theme::new(color),
    );
    chat_context.run()
}
