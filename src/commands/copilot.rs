//! `voltstock chat`: the inventory co-pilot.

use clap::Args;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{print_json, Context};
use crate::views::copilot::EXAMPLE_PROMPTS;
use crate::views::CopilotView;

#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Message to send. Omit to chat interactively.
    #[arg(trailing_var_arg = true)]
    pub message: Vec<String>,
}

pub async fn run(args: ChatArgs, ctx: &Context) -> anyhow::Result<()> {
    let view = CopilotView::new(ctx.remote.clone());
    let message = args.message.join(" ");

    if !message.trim().is_empty() {
        if let Some(reply) = view.send(&message).await? {
            if ctx.json {
                return print_json(&view.messages());
            }
            println!("{}", reply.content);
        }
        return Ok(());
    }

    if let Some(greeting) = view.messages().first() {
        println!("co-pilot> {}", greeting.content);
    }
    println!("Try these prompts:");
    for prompt in EXAMPLE_PROMPTS {
        println!("  - {prompt}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }
        if let Some(reply) = view.send(line).await? {
            println!("co-pilot> {}", reply.content);
        }
    }
    Ok(())
}
