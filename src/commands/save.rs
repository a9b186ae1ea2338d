use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{Command, CommandResult, Session};
use crate::generator::GeneratedImage;

pub struct SaveCommand;

#[async_trait]
impl Command for SaveCommand {
    fn name(&self) -> &str {
        "/save"
    }

    fn usage(&self) -> &str {
        "<path>"
    }

    fn description(&self) -> &str {
        "write the rendered image to a file"
    }

    async fn execute(&self, args: &str, session: &mut Session<'_>) -> CommandResult {
        if args.is_empty() {
            eprintln!("  ✗ usage: /save <path>");
            return CommandResult::Handled;
        }
        let Some(image) = session.workflow.dashboard().image() else {
            println!("  no image to save");
            return CommandResult::Handled;
        };

        match save_image(image, Path::new(args)) {
            Ok(path) => println!("  ✓ saved {}", path.display()),
            Err(e) => eprintln!("  ✗ {e:#}"),
        }
        CommandResult::Handled
    }
}

/// Decode and write the image, adding an extension when the path has none.
pub fn save_image(image: &GeneratedImage, path: &Path) -> Result<PathBuf> {
    let path = if path.extension().is_none() {
        path.with_extension(image.extension())
    } else {
        path.to_path_buf()
    };
    let bytes = image.decode().context("image payload is not valid base64")?;
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
