use async_trait::async_trait;

use super::{Command, CommandResult, Session, print_status, run_intent};
use crate::view;
use crate::workflow::Intent;

pub struct SelectCommand;

#[async_trait]
impl Command for SelectCommand {
    fn name(&self) -> &str {
        "/select"
    }

    fn usage(&self) -> &str {
        "<n>"
    }

    fn description(&self) -> &str {
        "draft a post (and its visual) for trend n"
    }

    async fn execute(&self, args: &str, session: &mut Session<'_>) -> CommandResult {
        let position: usize = match args.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("  ✗ usage: /select <n>");
                return CommandResult::Handled;
            }
        };
        let Some(trend) = session.workflow.dashboard().trend_at(position) else {
            eprintln!("  ✗ no trend #{position}");
            return CommandResult::Handled;
        };
        let id = trend.id.clone();

        if run_intent(session, Intent::SelectTrend(id)).await {
            let dashboard = session.workflow.dashboard();
            if dashboard.draft().is_some() {
                print!("{}", view::content(dashboard));
            }
            print_status(session);
        }
        CommandResult::Handled
    }
}
