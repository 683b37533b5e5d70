use clap::Subcommand;
use mindpause_core::{Config, Habit};
use serde_json::{json, Value};

use super::{open_ledger, print_json, CommandResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Start tracking a habit
    Add {
        /// Habit name (e.g. "smoking")
        name: String,
    },
    /// List habits as JSON
    List,
    /// Count one more day without the habit
    Mark {
        /// Habit ID
        id: String,
    },
    /// Reset the count to zero, starting today
    Reset {
        /// Habit ID
        id: String,
    },
    /// Stop tracking a habit
    Remove {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> CommandResult {
    let config = Config::load()?;
    let ledger = open_ledger(&config)?;
    let now = ledger.now();

    let with_age = |habit: &Habit| -> Value {
        json!({
            "habit": habit,
            "daysSinceStart": habit.days_since_start(now),
        })
    };

    match action {
        HabitAction::Add { name } => print_json(&with_age(&ledger.add_habit(&name)?))?,
        HabitAction::List => {
            let habits: Vec<Value> = ledger.habits().iter().map(with_age).collect();
            print_json(&habits)?;
        }
        HabitAction::Mark { id } => print_json(&with_age(&ledger.mark_habit_day(&id)?))?,
        HabitAction::Reset { id } => print_json(&with_age(&ledger.reset_habit(&id)?))?,
        HabitAction::Remove { id } => {
            ledger.remove_habit(&id)?;
            print_json(&json!({ "type": "habit_removed", "id": id }))?;
        }
    }
    Ok(())
}
