use clap::Subcommand;
use intently_core::engagement::feedback;
use intently_core::{Config, IntentionWidget, ProfileDb, SurveyClient};

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// Submit an NPS rating (0-10)
    Submit {
        score: i32,
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Decline the feedback prompt
    Skip {
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Print feedback prompt state
    Status,
}

pub fn run(action: FeedbackAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FeedbackAction::Submit { score, tab } => {
            let mut widget = IntentionWidget::open(&tab);
            let report = widget.submit_nps(score)?;
            println!("recorded {} ({})", report.score, report.category.as_str());

            // Local state is final; the network send is fire-and-forget.
            let config = Config::load_or_default();
            if config.survey.enabled {
                let client = SurveyClient::new(&config.survey.endpoint)?;
                let rt = tokio::runtime::Runtime::new()?;
                if let Err(e) = rt.block_on(client.submit(&report)) {
                    eprintln!("Warning: survey submission failed: {e}");
                }
            }
        }
        FeedbackAction::Skip { tab } => {
            let mut widget = IntentionWidget::open(&tab);
            widget.skip_feedback();
            println!("ok");
        }
        FeedbackAction::Status => {
            let db = ProfileDb::open()?;
            let stats = db.load_stats()?;
            let json = serde_json::json!({
                "sessions_completed": stats.sessions_completed,
                "feedback_given": stats.feedback_given,
                "feedback_attempts": stats.feedback_attempts,
                "next_threshold": feedback::next_threshold(stats.feedback_attempts),
                "eligible_now": feedback::should_request(&stats),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
