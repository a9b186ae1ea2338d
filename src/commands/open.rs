use async_trait::async_trait;

use super::{Command, CommandResult, Session};

pub struct OpenCommand;

#[async_trait]
impl Command for OpenCommand {
    fn name(&self) -> &str {
        "/open"
    }

    fn usage(&self) -> &str {
        "<n>"
    }

    fn description(&self) -> &str {
        "open the source of trend n in the browser"
    }

    async fn execute(&self, args: &str, session: &mut Session<'_>) -> CommandResult {
        let Some(trend) = args
            .parse()
            .ok()
            .and_then(|n| session.workflow.dashboard().trend_at(n))
        else {
            eprintln!("  ✗ usage: /open <n> (a listed trend)");
            return CommandResult::Handled;
        };

        match &trend.url {
            Some(url) => {
                println!("  {url}");
                // Headless/SSH sessions can't open a browser; the url is printed anyway
                let _ = open::that(url);
            }
            None => println!("  no source link for \"{}\"", trend.title),
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{test_config, test_workflow};
    use crate::generator::mock::MockGenerator;

    #[tokio::test]
    async fn bad_index_is_handled() {
        let mut workflow = test_workflow(MockGenerator::new());
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };

        for args in ["", "x", "0", "9"] {
            assert_eq!(
                OpenCommand.execute(args, &mut session).await,
                CommandResult::Handled
            );
        }
    }
}
