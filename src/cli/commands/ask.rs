//! Ask command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::SwornError;
use crate::orchestrator::Orchestrator;
use crate::session::TurnOutcome;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    let question = validate_question(question)?;

    let credentials = preflight::check_credentials()?;
    let orchestrator = Orchestrator::connect(settings, &credentials).await?;
    let mut session = orchestrator.new_session();

    let spinner = Output::spinner("Searching knowledge base...");
    let turn = session.chat(question).await;
    spinner.finish_and_clear();

    println!("\n{}\n", turn.result.response);
    Output::sources(&turn.result.sources);

    match turn.outcome {
        TurnOutcome::Answered => Ok(()),
        TurnOutcome::Degraded { reason } => {
            Output::warning(&format!("Answer degraded: {}", reason));
            Ok(())
        }
        TurnOutcome::Failed { reason } => Err(anyhow::anyhow!(reason)),
    }
}

fn validate_question(question: &str) -> crate::error::Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(SwornError::InvalidInput("Question must not be empty".to_string()));
    }
    Ok(question)
}
