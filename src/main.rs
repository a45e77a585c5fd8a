use anyhow::{Context, Result};
use clap::Parser;

use companion::{logger, Config, FallbackMessages, GroqClient, MessageProvider, Reply};

#[derive(Parser)]
#[command(name = "companion")]
#[command(about = "Ask a supportive companion; answers offline from built-in messages")]
struct Cli {
    /// Skip the network and answer from the fallback messages
    #[arg(long)]
    offline: bool,

    /// Prefix the reply with where it came from
    #[arg(long)]
    show_source: bool,

    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    logger::init(config.log_file.as_deref())?;
    log::info!("Configuration loaded (model {})", config.model);

    let fallbacks = match &config.fallback_file {
        Some(path) => FallbackMessages::from_file(path)
            .with_context(|| format!("loading fallback messages from {}", path.display()))?,
        None => FallbackMessages::builtin(),
    };

    let client = GroqClient::from_config(&config)?;
    if !client.is_configured() && !cli.offline {
        log::warn!("GROQ_API_KEY is not set; replies will come from fallback messages");
    }

    let provider =
        MessageProvider::new(client, fallbacks).with_system_prompt(config.system_prompt.clone());

    let prompt = cli.prompt.join(" ");
    let reply = provider.get_message_with(&prompt, !cli.offline).await;

    if cli.show_source {
        match &reply {
            Reply::Remote(_) => print!("[remote] "),
            Reply::Fallback { reason, .. } => print!("[fallback: {}] ", reason),
        }
    }
    println!("{}", reply.text());

    Ok(())
}
