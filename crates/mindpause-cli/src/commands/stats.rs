use clap::Subcommand;
use mindpause_core::calendar::JalaliDate;
use mindpause_core::stats::{bucket_counts, period_summary, summarize, Period, PeriodMode};
use mindpause_core::Config;
use serde_json::json;

use super::{open_ledger, print_json, CommandResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// All-time figures
    Summary,
    /// Figures for one Jalali day, month or year
    Period {
        #[arg(long, value_parser = parse_mode)]
        mode: PeriodMode,
        /// Jalali year
        #[arg(long)]
        year: i32,
        /// Jalali month (daily and monthly reports)
        #[arg(long)]
        month: Option<u32>,
        /// Jalali day of month (daily reports)
        #[arg(long)]
        day: Option<u32>,
    },
    /// Today's attempts
    Today,
}

fn parse_mode(s: &str) -> Result<PeriodMode, String> {
    match s {
        "daily" => Ok(PeriodMode::Daily),
        "monthly" => Ok(PeriodMode::Monthly),
        "yearly" => Ok(PeriodMode::Yearly),
        other => Err(format!("unknown mode '{other}', expected daily, monthly or yearly")),
    }
}

pub fn run(action: StatsAction) -> CommandResult {
    let config = Config::load()?;
    let ledger = open_ledger(&config)?;
    let records = ledger.records();
    let now = ledger.now();

    match action {
        StatsAction::Summary => {
            print_json(&summarize(&records, now))?;
        }
        StatsAction::Period {
            mode,
            year,
            month,
            day,
        } => {
            let period = Period::new(mode, year, month, day)?;
            print_json(&json!({
                "summary": period_summary(&records, period),
                "buckets": bucket_counts(&records, period),
            }))?;
        }
        StatsAction::Today => {
            print_json(&json!({
                "todayAttempts": ledger.recompute_today_attempts(),
                "jalaliDate": JalaliDate::from_gregorian(now.date_naive()),
            }))?;
        }
    }
    Ok(())
}
