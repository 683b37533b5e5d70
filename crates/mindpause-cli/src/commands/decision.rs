use clap::Subcommand;
use mindpause_core::Config;
use serde_json::json;

use super::{open_ledger, print_json, CommandResult};

#[derive(Subcommand)]
pub enum DecisionAction {
    /// Set the decision text
    Set {
        /// What you decided to do instead
        text: String,
    },
    /// Replace the decision text
    Update {
        /// New decision text
        text: String,
    },
    /// Forget the decision
    Reset,
    /// Print the current decision as JSON
    Show,
}

pub fn run(action: DecisionAction) -> CommandResult {
    let config = Config::load()?;
    let ledger = open_ledger(&config)?;

    match action {
        DecisionAction::Set { text } => ledger.set_decision(&text)?,
        DecisionAction::Update { text } => ledger.update_decision(&text)?,
        DecisionAction::Reset => ledger.reset_decision()?,
        DecisionAction::Show => {}
    }

    print_json(&json!({
        "decision": ledger.decision(),
        "hasDecision": ledger.has_decision(),
    }))?;
    Ok(())
}
