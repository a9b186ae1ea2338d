use async_trait::async_trait;

use super::{Command, CommandResult, Session, print_status, run_intent};
use crate::view;
use crate::workflow::Intent;

pub struct ImageCommand;

#[async_trait]
impl Command for ImageCommand {
    fn name(&self) -> &str {
        "/image"
    }

    fn usage(&self) -> &str {
        "[prompt]"
    }

    fn description(&self) -> &str {
        "render the visual again, from the brief or a prompt of your own"
    }

    async fn execute(&self, args: &str, session: &mut Session<'_>) -> CommandResult {
        let prompt = (!args.is_empty()).then(|| args.to_string());
        if session.workflow.dashboard().content().is_none() && prompt.is_none() {
            println!("  nothing to render yet. /select a trend first");
            return CommandResult::Handled;
        }

        if run_intent(session, Intent::GenerateImage(prompt)).await {
            print!("{}", view::content(session.workflow.dashboard()));
            print_status(session);
        }
        CommandResult::Handled
    }
}
