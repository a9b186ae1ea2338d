//! Plain-text rendering of the dashboard for the terminal.

use crate::generator::{GeneratedImage, Trend};
use crate::workflow::Dashboard;

/// Numbered trend list, marking the selected one.
pub fn trends(dashboard: &Dashboard) -> String {
    if dashboard.trends().is_empty() {
        return "  no trends yet. /scan to look for some\n".to_string();
    }

    let selected = dashboard.selected().map(|t| &t.id);
    let mut out = format!("  TOP {} SIGNALS FOUND\n\n", dashboard.trends().len());
    for (i, trend) in dashboard.trends().iter().enumerate() {
        let marker = if Some(&trend.id) == selected { "▸" } else { " " };
        out.push_str(&format!("{marker} {}. {}\n", i + 1, trend_card(trend)));
    }
    out
}

fn trend_card(trend: &Trend) -> String {
    let mut card = format!(
        "{}\n     [{}] {}\n     impact: {}\n",
        trend.title, trend.source, trend.summary, trend.business_impact
    );
    if let Some(url) = &trend.url {
        card.push_str(&format!("     {url}\n"));
    }
    card
}

/// The drafted post, its hashtags, follow-up comment, brief, and image status.
pub fn content(dashboard: &Dashboard) -> String {
    let Some(draft) = dashboard.draft() else {
        return "  no post yet. /select a trend first\n".to_string();
    };
    let c = &draft.content;

    let mut out = format!("  ── post ({}) ──\n\n{}\n\n", draft.tone, c.post.trim_end());
    out.push_str(&format!("{}\n\n", c.hashtags.join(" ")));
    out.push_str(&format!("  ── first comment ──\n\n{}\n\n", c.first_comment));
    out.push_str(&format!("  ── image brief ──\n\n{}\n\n", c.image_prompt));
    out.push_str(&format!("  image     {}\n", image_status(dashboard.image())));
    out
}

fn image_status(image: Option<&GeneratedImage>) -> String {
    match image {
        Some(img) => format!(
            "{} ({} base64 chars). /save <path> to write it",
            img.mime_type,
            img.data.len()
        ),
        None => "none".to_string(),
    }
}

/// One-line status: phase, tone, and any error.
pub fn status(dashboard: &Dashboard) -> String {
    let mut out = format!("  [{}] tone: {}", dashboard.phase(), dashboard.tone());
    if let Some(error) = dashboard.error() {
        out.push_str(&format!("\n  ✗ {error}"));
    }
    out.push('\n');
    out
}
