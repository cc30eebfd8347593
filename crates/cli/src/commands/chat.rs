//! Interactive chat command.
//!
//! Reads lines from stdin, routes them through the session's command
//! handlers, prints replies. Slash commands cover the document and persona
//! actions the session exposes; everything else is a chat turn.

use anyhow::Result;
use paperchat_config::AppConfig;
use paperchat_core::persona::Persona;
use paperchat_providers::GeminiClient;
use paperchat_session::ChatSession;
use std::io::Write;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<()> {
    let config = AppConfig::load(&AppConfig::default_path())?;
    let gateway = GeminiClient::new(
        config.model.clone(),
        config.resolved_api_key().map(String::from),
    );
    let mut session = ChatSession::new(config, Box::new(gateway));

    // Single-message mode
    if let Some(message) = message {
        let reply = session.handle_message(&message).await;
        println!("{reply}");
        return Ok(());
    }

    println!("{}", session.greeting());
    println!("Type /help for commands, or 'exit' to leave.\n");

    let stdin = io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    print_prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            print_prompt()?;
            continue;
        }

        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        if let Some(rest) = line.strip_prefix('/') {
            handle_slash_command(&mut session, rest).await;
            print_prompt()?;
            continue;
        }

        show_thinking();
        let reply = session.handle_message(&line).await;
        println!("{reply}\n");
        print_prompt()?;
    }

    Ok(())
}

async fn handle_slash_command(session: &mut ChatSession, command: &str) {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "paper" if !arg.is_empty() => {
            show_thinking();
            let reply = session.load_arxiv(arg).await;
            println!("{reply}\n");
        }
        "doc" if !arg.is_empty() => {
            show_thinking();
            let reply = session.load_archive(arg).await;
            println!("{reply}\n");
        }
        "persona" if !arg.is_empty() => match arg.parse::<Persona>() {
            Ok(persona) => {
                session.set_persona(persona);
                println!("Persona set to {persona}.\n");
            }
            Err(_) => {
                println!("Unknown persona '{arg}'. Available: {}\n", persona_list());
            }
        },
        "paper" | "doc" | "persona" => {
            println!("/{name} needs an argument. Type /help for usage.\n");
        }
        "personas" => println!("Available personas: {}\n", persona_list()),
        "clear" => {
            session.clear_document();
            println!("Document context cleared.\n");
        }
        "help" => print_help(),
        _ => println!("Unknown command '/{name}'. Type /help for the list.\n"),
    }
}

fn persona_list() -> String {
    Persona::all()
        .iter()
        .map(|p| p.id())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 /paper <id|url>   load an arXiv paper as document context\n\
         \x20 /doc <url>        load an archive page as document context\n\
         \x20 /clear            drop the document context\n\
         \x20 /persona <name>   switch the response persona\n\
         \x20 /personas         list personas\n\
         \x20 exit              leave the chat\n\
         Anything else is sent to the assistant. Phrases like\n\
         \"find papers about <topic>\" trigger an arXiv search.\n"
    );
}

fn print_prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn show_thinking() {
    println!("thinking...");
}
