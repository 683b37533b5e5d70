use clap::Subcommand;
use mindpause_core::Config;
use serde_json::json;

use super::{open_ledger, print_json, CommandResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete the decision and every pause record
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CommandResult {
    match action {
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            let config = Config::load()?;
            let ledger = open_ledger(&config)?;
            ledger.clear_all_data()?;
            print_json(&json!({ "type": "data_cleared" }))?;
        }
    }
    Ok(())
}
