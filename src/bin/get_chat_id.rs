//! One-shot chat-id discovery
//!
//! Send any message to your bot, then run this to print the chat id to
//! put in `.env`. Running it again for the same bot and chat prints the
//! same id.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GetUpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
    username: Option<String>,
}

/// Map an update batch to the distinct chats that messaged the bot.
///
/// Deterministic for a fixed batch, so repeated runs against an
/// unchanged bot/chat print the same ids.
fn discovered_chats(updates: &[Update]) -> BTreeMap<i64, String> {
    updates
        .iter()
        .filter_map(|u| u.message.as_ref())
        .map(|m| {
            (
                m.chat.id,
                m.chat
                    .username
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let token = std::env::var("BOT_TOKEN")
        .map_err(|_| anyhow::anyhow!("BOT_TOKEN must be set"))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let url = format!("https://api.telegram.org/bot{}/getUpdates", token);
    let resp: GetUpdatesResponse = client.get(&url).send().await?.json().await?;

    if !resp.ok {
        anyhow::bail!("Telegram rejected the request; check BOT_TOKEN");
    }

    let chats = discovered_chats(&resp.result);
    for (id, who) in &chats {
        println!("Chat: @{} -> id {}", who, id);
    }

    match chats.keys().next() {
        Some(id) => {
            println!("\nAdd this to your .env file:");
            println!("CHAT_ID={}", id);
        }
        None => {
            println!("No messages yet. Send your bot a message and run again.");
        }
    }

    Ok(())
}
