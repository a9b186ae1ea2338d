use async_trait::async_trait;

use super::{Command, CommandResult, Session};

pub struct QuitCommand;

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit"]
    }

    fn description(&self) -> &str {
        "exit the dashboard"
    }

    async fn execute(&self, _args: &str, _session: &mut Session<'_>) -> CommandResult {
        CommandResult::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{test_config, test_workflow};
    use crate::generator::mock::MockGenerator;

    #[tokio::test]
    async fn returns_quit() {
        let mut workflow = test_workflow(MockGenerator::new());
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };
        assert_eq!(
            QuitCommand.execute("", &mut session).await,
            CommandResult::Quit
        );
    }

    #[test]
    fn has_aliases() {
        let aliases = QuitCommand.aliases();
        assert!(aliases.contains(&"quit"));
        assert!(aliases.contains(&"exit"));
        assert!(aliases.contains(&"/exit"));
    }
}
