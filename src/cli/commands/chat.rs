//! Interactive chat command.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::TurnOutcome;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// What the REPL should do with one line of input.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Skip,
    Quit,
    Clear,
    Message(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Skip
    } else if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        Input::Quit
    } else if line.eq_ignore_ascii_case("clear") {
        Input::Clear
    } else {
        Input::Message(line)
    }
}

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> anyhow::Result<()> {
    let credentials = preflight::check_credentials()?;

    Output::info("Connecting to knowledge base...");
    let orchestrator = Orchestrator::connect(settings, &credentials).await?;
    let mut session = orchestrator.new_session();

    println!("\n{}", style("Sworn Chat").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'quit' to exit. Use 'clear' to reset the conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match classify(&line) {
            Input::Skip => continue,
            Input::Quit => {
                Output::info("Goodbye!");
                break;
            }
            Input::Clear => {
                session.clear_history();
                Output::info("Conversation history cleared.");
            }
            Input::Message(message) => {
                let turn = session.chat(message).await;
                match &turn.outcome {
                    TurnOutcome::Answered => {}
                    TurnOutcome::Degraded { reason } => debug!("Degraded turn: {}", reason),
                    TurnOutcome::Failed { reason } => Output::warning(reason),
                }
                println!("\n{} {}", style("Assistant:").cyan().bold(), turn.result.response);
                Output::sources(&turn.result.sources);
                println!();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_input() {
        assert_eq!(classify("   \n"), Input::Skip);
        assert_eq!(classify("QUIT\n"), Input::Quit);
        assert_eq!(classify("exit"), Input::Quit);
        assert_eq!(classify(" clear "), Input::Clear);
        assert_eq!(classify("  how do I nap?\n"), Input::Message("how do I nap?"));
    }
}
