//! Startup banner and session summary display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO, format_number};
use crate::generator::TokenUsage;
use crate::generator::gemini::Models;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub models: &'a Models,
    pub auth_status: &'a str,
    pub tone: &'a str,
    pub preferences: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║          T R E N D S M I T H          ║
   ║   the hunt, the post, the picture     ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   discover  {}
   draft     {}
   image     {}
   auth      {}
   tone      {}
   prefs     {}

   /scan to start, /help for commands
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.models.discover,
        info.models.draft,
        info.models.image,
        info.auth_status,
        info.tone,
        info.preferences,
    );
}

/// Print the session summary (token usage + farewell).
pub fn print_session_summary(usage: TokenUsage) {
    if usage.total() > 0 {
        println!(
            "session: {:>6} input + {:>6} output = {:>6} tokens",
            format_number(usage.input_tokens),
            format_number(usage.output_tokens),
            format_number(usage.total()),
        );
    }
    println!("goodbye.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_banner_does_not_panic() {
        let models = Models::default();
        print_banner(&BannerInfo {
            models: &models,
            auth_status: "API key (env) ✓",
            tone: "Default",
            preferences: "ephemeral",
        });
    }

    #[test]
    fn print_session_summary_with_tokens() {
        print_session_summary(TokenUsage {
            input_tokens: 1234,
            output_tokens: 567,
        });
    }

    #[test]
    fn print_session_summary_zero_tokens() {
        print_session_summary(TokenUsage::default());
    }
}
