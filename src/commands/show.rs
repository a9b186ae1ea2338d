use async_trait::async_trait;

use super::{Command, CommandResult, Session, print_status};
use crate::view;

pub struct ShowCommand;

#[async_trait]
impl Command for ShowCommand {
    fn name(&self) -> &str {
        "/show"
    }

    fn aliases(&self) -> &[&str] {
        &["/status"]
    }

    fn description(&self) -> &str {
        "show trends, the current post, and status"
    }

    async fn execute(&self, _args: &str, session: &mut Session<'_>) -> CommandResult {
        let dashboard = session.workflow.dashboard();
        print!("{}", view::trends(dashboard));
        if dashboard.draft().is_some() {
            println!();
            print!("{}", view::content(dashboard));
        }
        print_status(session);
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{test_config, test_workflow};
    use crate::generator::mock::MockGenerator;

    #[tokio::test]
    async fn empty_dashboard_is_handled() {
        let mut workflow = test_workflow(MockGenerator::new());
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };
        assert_eq!(
            ShowCommand.execute("", &mut session).await,
            CommandResult::Handled
        );
    }
}
