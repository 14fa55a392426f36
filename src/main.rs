use anyhow::{Context, Result};
use fallback_intent::{Bot, BotConfig};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber")?;

    // 2. Bot + session
    let config = BotConfig::load()?;
    let bot = Arc::new(Bot::from_config(&config));
    let session = bot.create_session().await.context("creating dialog session")?;
    tracing::info!(session_id = %session.id(), "Fallback intent console ready");

    println!("Type a message. /forget <label>, /clear and /quit manage the session.");

    // 3. Console loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/clear", _) => {
                for outcome in bot.forget_all().await {
                    println!("{:?}", outcome);
                }
            }
            ("/forget", label) if !label.trim().is_empty() => {
                println!("{:?}", bot.forget(label.trim()).await);
            }
            _ => match session.message(line).await {
                Ok(reply) => println!("{}", reply.text),
                Err(e) => tracing::error!("turn failed: {}", e),
            },
        }
    }

    session.close().await.context("deleting dialog session")?;
    Ok(())
}
