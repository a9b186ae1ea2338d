use async_trait::async_trait;

use super::{Command, CommandResult, Session, print_status, run_intent};
use crate::config::KEY_TONE;
use crate::generator::Tone;
use crate::view;
use crate::workflow::Intent;

pub struct ToneCommand;

#[async_trait]
impl Command for ToneCommand {
    fn name(&self) -> &str {
        "/tone"
    }

    fn usage(&self) -> &str {
        "[tone|reset]"
    }

    fn description(&self) -> &str {
        "list tones, redraft the current post in another, or forget the saved default"
    }

    async fn execute(&self, args: &str, session: &mut Session<'_>) -> CommandResult {
        if args.is_empty() {
            let current = session.workflow.dashboard().tone();
            for tone in Tone::ALL {
                let marker = if tone == current { " ← current" } else { "" };
                println!("  {}{}", tone, marker);
            }
            return CommandResult::Handled;
        }

        if args.eq_ignore_ascii_case("reset") {
            match session.config.remove(KEY_TONE) {
                Ok(()) => println!(
                    "  saved tone cleared. next session starts with {}",
                    Tone::default()
                ),
                Err(e) => eprintln!("  ✗ failed to clear saved tone: {e}"),
            }
            return CommandResult::Handled;
        }

        let tone: Tone = match args.parse() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("  ✗ {e}");
                return CommandResult::Handled;
            }
        };

        if !run_intent(session, Intent::ChangeTone(tone)).await {
            return CommandResult::Handled;
        }

        let dashboard = session.workflow.dashboard();
        if dashboard.tone() == tone
            && let Err(e) = session.config.set_tone(tone)
        {
            eprintln!("  ✗ failed to remember tone: {e}");
        }
        print!("{}", view::content(dashboard));
        print_status(session);
        CommandResult::Handled
    }
}
