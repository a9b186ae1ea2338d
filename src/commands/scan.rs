use async_trait::async_trait;

use super::{Command, CommandResult, Session, print_status, run_intent};
use crate::view;
use crate::workflow::Intent;

pub struct ScanCommand;

#[async_trait]
impl Command for ScanCommand {
    fn name(&self) -> &str {
        "/scan"
    }

    fn aliases(&self) -> &[&str] {
        &["/rescan"]
    }

    fn description(&self) -> &str {
        "scan for trending agentic AI & RAG developments"
    }

    async fn execute(&self, _args: &str, session: &mut Session<'_>) -> CommandResult {
        if run_intent(session, Intent::Scan).await {
            print!("{}", view::trends(session.workflow.dashboard()));
            print_status(session);
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{test_config, test_workflow};
    use crate::generator::mock::MockGenerator;
    use crate::generator::{Trend, TrendId};
    use crate::workflow::Phase;

    #[tokio::test]
    async fn scan_loads_trends() {
        let trend = Trend {
            id: TrendId::new("a"),
            title: "A".to_string(),
            source: "X".to_string(),
            summary: "s".to_string(),
            business_impact: "b".to_string(),
            url: None,
        };
        let mut workflow = test_workflow(MockGenerator::new().discover(Ok(vec![trend])));
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };

        assert_eq!(
            ScanCommand.execute("", &mut session).await,
            CommandResult::Handled
        );
        assert_eq!(workflow.dashboard().phase(), Phase::TrendsLoaded);
        assert_eq!(workflow.dashboard().trends().len(), 1);
    }
}
