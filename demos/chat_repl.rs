//! Interactive chat REPL
//!
//! Reads user turns from stdin, sends them through a budget-enforced
//! session, and prints the assistant replies. Type "exit" to quit.
//!
//! Requires an API key in the environment (OPENAI_API_KEY by default).

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use transcript_manager::{init_tracing, ChatSession, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config.logging);

    let mut session = ChatSession::from_config(&config, "You are a helpful chatbot.")?;

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    stdout.write_all(b"user: ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input == "exit" {
            break;
        }

        if !input.is_empty() {
            let completion = session.send(input).await?;
            if let transcript_manager::MessageContent::Text(ref text) = completion.message.content
            {
                println!("assistant: {}", text);
            }
            println!(
                "({} messages in transcript)",
                session.transcript().len()
            );
        }

        stdout.write_all(b"user: ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
