//! hpgpt CLI - exercise the completion gateway from a terminal
//!
//! Reads `GROQ_API_KEY` (and optional `GROQ_BASE_URL` / `GROQ_MODEL`) from the
//! environment or a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use hpgpt_gateway::{AnswerMode, CompletionGateway, Turn};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hpgpt")]
#[command(about = "HPGPT - chat completions and agent routing over Groq", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question
    Chat {
        /// The question to ask
        prompt: String,
        /// Print fragments as they arrive
        #[arg(short, long)]
        stream: bool,
        /// Answer length: specific (default), detailed
        #[arg(short, long, default_value = "specific")]
        mode: AnswerMode,
    },

    /// Show which agents a prompt would be routed to
    Route {
        /// The prompt to classify
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gateway = CompletionGateway::from_env().context("failed to set up the gateway")?;

    match cli.command {
        Commands::Chat {
            prompt,
            stream,
            mode,
        } => {
            if stream {
                let turns = vec![Turn::system(mode.system_prompt()), Turn::user(prompt)];
                let mut fragments = gateway.complete_stream(&turns);
                let mut stdout = std::io::stdout();
                while let Some(fragment) = fragments.next().await {
                    write!(stdout, "{}", fragment)?;
                    stdout.flush()?;
                }
                writeln!(stdout)?;
            } else {
                let answer = gateway.get_response(&prompt, &[], mode).await;
                println!("{}", answer);
            }
        }
        Commands::Route { prompt } => {
            let agents = gateway.route_agent_type(&prompt, &[]).await;
            let names: Vec<&str> = agents.iter().map(|agent| agent.as_str()).collect();
            println!("{}", names.join(", "));
        }
    }

    Ok(())
}
