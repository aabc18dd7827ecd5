mod client;
mod tools;
mod types;

use client::{Conversation, OllamaClient};
use tools::builtin_toolset;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Send a prompt to a local model, optionally letting it call tools.
#[derive(Debug, Parser)]
#[command(name = "confab", version)]
struct Args {
    /// Prompt to send to the model
    #[arg(short, long)]
    prompt: String,

    /// Model identifier known to the inference server
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Comma-separated tool names to advertise; none are advertised when
    /// absent
    #[arg(short, long, value_delimiter = ',')]
    tools: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confab=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let registry = builtin_toolset();
    let advertised = registry
        .descriptors(&args.tools)
        .context("unusable --tools selection")?;

    let endpoint = OllamaClient::new(DEFAULT_ENDPOINT);
    let mut conversation = Conversation::new(&endpoint, &registry, &args.model, advertised);
    let answer = conversation.run(&args.prompt).await?;
    debug!(
        transcript_len = conversation.transcript().len(),
        "conversation finished"
    );

    println!("{answer}");
    Ok(())
}
