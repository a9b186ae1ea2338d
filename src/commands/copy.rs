use anyhow::{Context, Result};
use arboard::Clipboard;
use async_trait::async_trait;

use super::{Command, CommandResult, Session};

pub struct CopyCommand;

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("no clipboard available")?;
    clipboard
        .set_text(text)
        .context("failed to copy to clipboard")?;
    Ok(())
}

#[async_trait]
impl Command for CopyCommand {
    fn name(&self) -> &str {
        "/copy"
    }

    fn description(&self) -> &str {
        "copy the drafted post to the clipboard"
    }

    async fn execute(&self, _args: &str, session: &mut Session<'_>) -> CommandResult {
        let Some(content) = session.workflow.dashboard().content() else {
            println!("  nothing to copy yet. /select a trend first");
            return CommandResult::Handled;
        };

        match copy_to_clipboard(&content.post) {
            Ok(()) => println!("  ✓ post copied to clipboard"),
            Err(e) => eprintln!("  ✗ {e:#}"),
        }
        CommandResult::Handled
    }
}
