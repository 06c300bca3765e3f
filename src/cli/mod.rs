//! Command-line interface parsing and handling
//!
//! This module parses arguments, assembles the question from arguments and
//! piped input, and decides between a one-shot answer and the interactive
//! session.

use std::error::Error;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use crate::core::cache::FileCache;
use crate::core::client::{ChatClient, ClientSettings, HttpTransport};
use crate::core::config::Config;
use crate::core::conversation::Conversation;
use crate::logging::init_tracing;
use crate::ui::chat_loop::run_chat;
use crate::utils::clipboard::SystemClipboard;

#[derive(Parser, Debug)]
#[command(name = "gptcli")]
#[command(version)]
#[command(about = "Ask a chat model from the terminal and grab the code it answers with")]
#[command(
    long_about = "gptcli sends a question to an OpenAI-compatible chat API and prints the answer. \
When the answer holds a single code snippet only that snippet is printed; with several \
snippets, or without a question, a full-screen chat session starts instead.\n\n\
Configuration:\n\
  Run 'gptcli --init' to create the config file, then set api_key in it.\n\n\
Environment Variables (fallback if not configured):\n\
  OPENAI_API_KEY    Your OpenAI API key\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\n\
Controls:\n\
  Enter             Send the message, or copy the chosen snippet\n\
  Esc               Toggle command entry, or leave snippet selection\n\
  Ctrl+S            Pick a code snippet\n\
  Ctrl+Y            Copy code (or the chosen snippet)\n\
  Ctrl+D            Quit when no answer is pending\n\
  Ctrl+C            Quit immediately\n\n\
Commands (prefix with ':' or press Esc first):\n\
  c, yy, copy       Copy code if there is any, otherwise the transcript\n\
  cc, yc            Copy all code\n\
  ca, ya            Copy the transcript\n\
  sc, selcode       Pick a code snippet"
)]
pub struct Args {
    /// Topic the assistant should help with (bash, php, ...)
    #[arg(short = 'p', long = "prompt", value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Start in interactive mode right away
    #[arg(short, long)]
    pub interactive: bool,

    /// Create the configuration file and exit
    #[arg(long)]
    pub init: bool,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Question to ask
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub question: Vec<String>,
}

/// Where a session goes after the optional one-shot question.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text and exit.
    Print(String),
    /// Continue interactively from this conversation.
    Interactive,
}

/// Join question words and append piped lines, each followed by a newline.
pub fn assemble_question<I>(words: &[String], piped: Option<I>) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut question = words.join(" ").trim().to_string();
    if let Some(lines) = piped {
        question.push('\n');
        for line in lines {
            question.push_str(&line);
            question.push('\n');
        }
    }
    question
}

/// Decide what to do with the conversation a one-shot question produced.
pub fn one_shot_outcome(conversation: &Conversation, interactive: bool) -> Outcome {
    if interactive {
        return Outcome::Interactive;
    }
    let code = conversation.parse_code();
    match code.as_slice() {
        [] => Outcome::Print(conversation.last_message_text().to_string()),
        [only] => Outcome::Print(only.clone()),
        _ => Outcome::Interactive,
    }
}

fn piped_lines() -> Option<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return None;
    }
    Some(stdin.lock().lines().map_while(Result::ok).collect())
}

fn seed_conversation(topic: Option<&str>) -> Conversation {
    match topic.map(str::trim).filter(|topic| !topic.is_empty()) {
        Some(topic) => Conversation::seeded_with_topic(topic),
        None => Conversation::new(),
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    init_tracing(args.log.as_deref())?;

    let config_path = Config::config_path()?;
    if args.init {
        if Config::init_at(&config_path)? {
            println!("Created {}", config_path.display());
        } else {
            println!("{} already exists", config_path.display());
        }
        return Ok(());
    }

    let resolved = Config::load_from_path(&config_path)?.resolve();
    if resolved.api_key.is_none() {
        eprintln!(
            "Please configure your OpenAI API key in {} (run with --init to create it) or set OPENAI_API_KEY",
            config_path.display()
        );
        std::process::exit(1);
    }
    debug!(model = %resolved.model, base_url = %resolved.base_url, "configuration resolved");

    let client = Arc::new(ChatClient::new(
        Arc::new(HttpTransport::new(resolved.base_url)),
        Arc::new(FileCache::in_temp_dir()),
        ClientSettings {
            api_key: resolved.api_key,
            model: resolved.model,
        },
    ));

    let mut conversation = seed_conversation(args.topic.as_deref());
    let question = assemble_question(&args.question, piped_lines());

    if !question.is_empty() {
        info!("asking one-shot question");
        conversation = match client.ask(&conversation, &question).await {
            Ok(answered) => answered,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        };
        if let Outcome::Print(text) = one_shot_outcome(&conversation, args.interactive) {
            println!("{text}");
            return Ok(());
        }
    }

    run_chat(conversation, client, Arc::new(SystemClipboard)).await?;
    Ok(())
}
