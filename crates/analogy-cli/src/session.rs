//! Interactive form session: one command per line on stdin.

use crate::render::{render_form, render_result};
use analogy_core::{AnalogyError, AnalogyFormController, RatingDimension};
use anyhow::Result;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const HELP: &str = "\
Commands:
  ask <question>            generate an analogy for a concept
  rate <dimension> <1-5>    rate clarity, relational, familiarity or overall
  comment <text>            set the feedback comment
  submit                    send the feedback
  show                      print the form
  help                      show this help
  quit                      leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Ask(String),
    Rate(RatingDimension, u8),
    Comment(String),
    Submit,
    Show,
    Help,
    Quit,
}

impl FormCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_start();
        // Only the one separator after the command word is dropped
        let (word, raw) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = raw.trim();

        match word.to_lowercase().as_str() {
            // The question is forwarded as typed, empty included
            "ask" | "generate" => Ok(FormCommand::Ask(raw.to_string())),
            "rate" => {
                let mut parts = rest.split_whitespace();
                let (Some(dimension), Some(value), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err("usage: rate <dimension> <1-5>".to_string());
                };
                let dimension = dimension.parse::<RatingDimension>()?;
                let value = value
                    .parse::<u8>()
                    .map_err(|_| format!("Invalid rating: {}. Must be a number from 1 to 5", value))?;
                Ok(FormCommand::Rate(dimension, value))
            }
            "comment" => Ok(FormCommand::Comment(rest.to_string())),
            "submit" => Ok(FormCommand::Submit),
            "show" => Ok(FormCommand::Show),
            "help" | "?" => Ok(FormCommand::Help),
            "quit" | "exit" => Ok(FormCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("Unknown command: {}. Type 'help' for a list", other)),
        }
    }
}

/// Run commands from stdin against `form` until `quit` or end of input
pub async fn run(form: &AnalogyFormController) -> Result<()> {
    println!("{}", "Analogical Reasoning via SMT".bold());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match FormCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                continue;
            }
        };
        if command == FormCommand::Quit {
            break;
        }
        execute(form, command).await;
    }

    Ok(())
}

/// Apply one command. Failures are reported on the terminal and the session
/// carries on.
pub async fn execute(form: &AnalogyFormController, command: FormCommand) {
    match command {
        FormCommand::Ask(question) => {
            println!("{}", "Generating...".yellow());
            match form.generate(&question).await {
                Ok(result) => print!("{}", render_result(&result)),
                Err(AnalogyError::Superseded) => {}
                Err(_) => print!("{}", render_form(&form.snapshot())),
            }
        }
        FormCommand::Rate(dimension, value) => match form.rate(dimension, value) {
            Ok(()) => print!("{}", render_form(&form.snapshot())),
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        },
        FormCommand::Comment(text) => form.set_comment(text),
        FormCommand::Submit => match form.submit_feedback().await {
            Ok(None) => println!("{}", "Nothing to rate yet. Ask a question first.".dimmed()),
            _ => {
                if let Some(message) = form.snapshot().feedback_message() {
                    if message.is_error() {
                        println!("{}", message.text().red());
                    } else {
                        println!("{}", message.text().green());
                    }
                }
            }
        },
        FormCommand::Show => print!("{}", render_form(&form.snapshot())),
        FormCommand::Help => println!("{}", HELP),
        FormCommand::Quit => {}
    }
}
