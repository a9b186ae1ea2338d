//! The dashboard workflow: discover trends, draft a post for one, render its
//! visual.
//!
//! [`Dashboard`] is the single owned state. It never performs I/O: every
//! operator [`Intent`] and every remote [`Completion`] goes through it and may
//! yield an [`Effect`] for the [`Workflow`] driver to carry out. Each remote
//! request carries a [`Ticket`]; completions whose ticket is no longer the one
//! the dashboard is waiting for are dropped, so a slow answer for an old
//! selection cannot overwrite a newer one.

pub mod dashboard;
pub mod driver;

pub use dashboard::{Dashboard, Draft};
pub use driver::{Workflow, perform};

use std::fmt;
use thiserror::Error;

use crate::generator::{
    GeneratedContent, GeneratedImage, GenerationError, Tone, Trend, TrendId,
};

/// Shown when discovery fails.
pub const SCAN_FAILED: &str = "Failed to scan for trends. Please check your API Key.";
/// Shown when drafting for a freshly selected trend fails.
pub const DRAFT_FAILED: &str = "Failed to generate content.";
/// Shown when redrafting in a new tone fails.
pub const RETONE_FAILED: &str = "Failed to refine tone.";

/// Identifies one outstanding remote request. Monotonic per dashboard.
pub type Ticket = u64;

/// Where the workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scanning,
    TrendsLoaded,
    GeneratingPost,
    PostReady,
    GeneratingImage,
}

impl Phase {
    /// What is happening while a remote call is outstanding, if anything.
    pub fn activity(&self) -> Option<&'static str> {
        match self {
            Phase::Scanning => Some("scanning global tech news"),
            Phase::GeneratingPost => Some("architecting your post"),
            Phase::GeneratingImage => Some("rendering the visual"),
            Phase::Idle | Phase::TrendsLoaded | Phase::PostReady => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.activity().is_some()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Scanning => "scanning",
            Phase::TrendsLoaded => "trends loaded",
            Phase::GeneratingPost => "generating post",
            Phase::PostReady => "post ready",
            Phase::GeneratingImage => "generating image",
        };
        f.write_str(label)
    }
}

/// Something the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Scan,
    SelectTrend(TrendId),
    ChangeTone(Tone),
    /// Explicit prompt, or `None` to reuse the stored image brief.
    GenerateImage(Option<String>),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Scan => "scan",
            Intent::SelectTrend(_) => "select a trend",
            Intent::ChangeTone(_) => "change tone",
            Intent::GenerateImage(_) => "generate an image",
        }
    }
}

/// A remote call the driver must make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Discover { ticket: Ticket },
    Draft { ticket: Ticket, trend: Trend, tone: Tone },
    Render { ticket: Ticket, prompt: String },
}

/// What a transition asks the driver to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(Request),
    /// Continue straight into another intent.
    Dispatch(Intent),
}

/// The outcome of a [`Request`], tagged with its ticket.
#[derive(Debug)]
pub enum Completion {
    Discovered {
        ticket: Ticket,
        result: Result<Vec<Trend>, GenerationError>,
    },
    Drafted {
        ticket: Ticket,
        result: Result<GeneratedContent, GenerationError>,
    },
    Rendered {
        ticket: Ticket,
        result: Result<Option<GeneratedImage>, GenerationError>,
    },
}

/// An intent that does not apply to the current dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("cannot {intent} while {phase}")]
    NotApplicable { intent: &'static str, phase: Phase },
    #[error("no trend with id {0}")]
    UnknownTrend(TrendId),
    #[error("no trend selected")]
    NoSelection,
}
