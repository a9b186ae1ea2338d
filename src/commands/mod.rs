//! REPL commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry handles dispatch, alias resolution,
//! and help generation. Each command turns operator input into a workflow
//! [`Intent`] or reads the dashboard.

mod copy;
mod help;
mod image;
mod open;
mod quit;
mod save;
mod scan;
mod select;
mod show;
mod tokens;
mod tone;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::view;
use crate::workflow::{Intent, Workflow};

pub use save::save_image;

/// What commands get to work with.
pub struct Session<'a> {
    pub workflow: &'a mut Workflow,
    pub config: &'a Config,
}

/// What the REPL should do after a command runs.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a command.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Exit the REPL.
    Quit,
}

/// A REPL command. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/scan"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/rescan"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Argument hint for `/help`, e.g. `"<n>"`.
    fn usage(&self) -> &str {
        ""
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command with whatever followed its name.
    async fn execute(&self, args: &str, session: &mut Session<'_>) -> CommandResult;
}

/// Holds registered commands.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(scan::ScanCommand),
            Arc::new(select::SelectCommand),
            Arc::new(tone::ToneCommand),
            Arc::new(image::ImageCommand),
            Arc::new(copy::CopyCommand),
            Arc::new(show::ShowCommand),
            Arc::new(open::OpenCommand),
            Arc::new(save::SaveCommand),
            Arc::new(tokens::TokensCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    /// Register an additional command.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Dispatch input to a matching command, or return `NotACommand`.
    pub async fn dispatch(&self, input: &str, session: &mut Session<'_>) -> CommandResult {
        let input = input.trim();
        let (cmd, args) = match input.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (input, ""),
        };

        for command in &self.commands {
            if cmd == command.name() || command.aliases().contains(&cmd) {
                // /help needs the registry to list all commands
                if command.name() == "/help" {
                    print!("{}", self.help_text());
                    return CommandResult::Handled;
                }
                return command.execute(args, session).await;
            }
        }

        if cmd.starts_with('/') {
            println!("unknown command: {cmd}");
            println!("type /help for available commands");
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.usage(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    /// All registered command names.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// All registered names and aliases (for duplicate detection).
    pub fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Push an intent through the workflow, reporting a rejection inline.
/// Returns whether the intent was accepted.
async fn run_intent(session: &mut Session<'_>, intent: Intent) -> bool {
    match session.workflow.dispatch(intent).await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("  ✗ {e}");
            false
        }
    }
}

/// Status line plus the error, if the last operation left one.
fn print_status(session: &Session<'_>) {
    print!("{}", view::status(session.workflow.dashboard()));
}

fn format_label(name: &str, usage: &str, aliases: &[&str]) -> String {
    let mut label = name.to_string();
    if !usage.is_empty() {
        label.push(' ');
        label.push_str(usage);
    }
    if !aliases.is_empty() {
        label.push_str(&format!(" ({})", aliases.join(", ")));
    }
    label
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generator::mock::MockGenerator;
    use crate::workflow::Dashboard;

    pub(crate) fn test_workflow(generator: MockGenerator) -> Workflow {
        Workflow::new(Arc::new(generator), Dashboard::default())
    }

    pub(crate) fn test_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn all_builtins_registered() {
        let reg = CommandRegistry::new();
        let names = reg.names();
        for name in [
            "/help", "/scan", "/select", "/tone", "/image", "/copy", "/show", "/open", "/save",
            "/tokens", "/quit",
        ] {
            assert!(names.contains(&name), "missing: {name}");
        }
    }

    #[test]
    fn no_duplicate_triggers() {
        let reg = CommandRegistry::new();
        let triggers = reg.all_triggers();
        let mut seen = Vec::new();
        for t in &triggers {
            assert!(!seen.contains(t), "duplicate trigger: {t}");
            seen.push(t);
        }
    }

    #[test]
    fn help_text_includes_all_commands() {
        let reg = CommandRegistry::new();
        let text = reg.help_text();
        for name in reg.names() {
            assert!(text.contains(name), "help missing: {name}");
        }
        assert!(text.contains("/select <n>"));
        assert!(text.contains("/rescan"));
    }

    #[tokio::test]
    async fn unknown_slash_command_is_handled() {
        let reg = CommandRegistry::new();
        let mut workflow = test_workflow(MockGenerator::new());
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };
        assert_eq!(
            reg.dispatch("/foobar", &mut session).await,
            CommandResult::Handled
        );
    }

    #[tokio::test]
    async fn plain_text_is_not_a_command() {
        let reg = CommandRegistry::new();
        let mut workflow = test_workflow(MockGenerator::new());
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };
        assert_eq!(
            reg.dispatch("what's trending", &mut session).await,
            CommandResult::NotACommand
        );
    }

    #[tokio::test]
    async fn args_are_split_from_name() {
        struct EchoCommand;

        #[async_trait]
        impl Command for EchoCommand {
            fn name(&self) -> &str {
                "/echo"
            }
            fn description(&self) -> &str {
                "echo"
            }
            async fn execute(&self, args: &str, _session: &mut Session<'_>) -> CommandResult {
                if args == "two words" {
                    CommandResult::Quit
                } else {
                    CommandResult::Handled
                }
            }
        }

        let mut reg = CommandRegistry::new();
        reg.register(Arc::new(EchoCommand));
        let mut workflow = test_workflow(MockGenerator::new());
        let config = test_config();
        let mut session = Session {
            workflow: &mut workflow,
            config: &config,
        };
        assert_eq!(
            reg.dispatch("  /echo   two words  ", &mut session).await,
            CommandResult::Quit
        );
    }

    #[test]
    fn format_label_variants() {
        assert_eq!(format_label("/show", "", &[]), "/show");
        assert_eq!(format_label("/select", "<n>", &[]), "/select <n>");
        assert_eq!(
            format_label("/quit", "", &["/exit", "quit"]),
            "/quit (/exit, quit)"
        );
    }
}
