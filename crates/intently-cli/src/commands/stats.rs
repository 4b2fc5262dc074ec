use clap::Subcommand;
use intently_core::{ProfileDb, MILESTONE_SCHEDULE};
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print usage statistics and the session log summary
    Show,
    /// Print milestone progress
    Milestones,
}

#[derive(Serialize)]
struct MilestoneRow {
    milestone: u32,
    celebrated: bool,
    reached: bool,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ProfileDb::open()?;
    match action {
        StatsAction::Show => {
            let stats = db.load_stats()?;
            let summary = db.session_summary()?;
            let json = serde_json::json!({
                "usage": stats,
                "sessions": summary,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        StatsAction::Milestones => {
            let stats = db.load_stats()?;
            let rows: Vec<MilestoneRow> = MILESTONE_SCHEDULE
                .iter()
                .map(|&m| MilestoneRow {
                    milestone: m,
                    celebrated: stats.celebrated_milestones.contains(&m),
                    reached: stats.sessions_completed >= m,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
