use tracing::{debug, warn};

use super::{
    Completion, DRAFT_FAILED, Effect, Intent, Phase, RETONE_FAILED, Request, SCAN_FAILED, Ticket,
    WorkflowError,
};
use crate::generator::{GeneratedContent, GeneratedImage, Tone, Trend, TrendId};

/// Content together with the trend and tone that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub content: GeneratedContent,
    pub trend: TrendId,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftKind {
    /// First draft after a trend was picked.
    Initial,
    /// Redraft of the current trend in a new tone.
    Retone { previous: Tone },
}

/// Tickets of the requests still being waited on.
#[derive(Debug, Default)]
struct Pending {
    scan: Option<Ticket>,
    draft: Option<(Ticket, DraftKind)>,
    image: Option<Ticket>,
}

/// The whole state of the dashboard.
#[derive(Debug, Default)]
pub struct Dashboard {
    phase: Phase,
    trends: Vec<Trend>,
    selected: Option<TrendId>,
    tone: Tone,
    draft: Option<Draft>,
    image: Option<GeneratedImage>,
    error: Option<String>,
    next_ticket: Ticket,
    pending: Pending,
}

impl Dashboard {
    /// An idle dashboard that will draft in `tone`.
    pub fn new(tone: Tone) -> Self {
        Self {
            tone,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn trends(&self) -> &[Trend] {
        &self.trends
    }

    /// Trend by 1-based position, as shown to the operator.
    pub fn trend_at(&self, position: usize) -> Option<&Trend> {
        position.checked_sub(1).and_then(|i| self.trends.get(i))
    }

    pub fn selected(&self) -> Option<&Trend> {
        let id = self.selected.as_ref()?;
        self.trends.iter().find(|t| &t.id == id)
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn content(&self) -> Option<&GeneratedContent> {
        self.draft.as_ref().map(|d| &d.content)
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Handle an operator intent. Rejected intents leave the dashboard as it was.
    pub fn apply_intent(&mut self, intent: Intent) -> Result<Option<Effect>, WorkflowError> {
        match intent {
            Intent::Scan => self.scan(),
            Intent::SelectTrend(id) => self.select(id),
            Intent::ChangeTone(tone) => self.change_tone(tone),
            Intent::GenerateImage(prompt) => self.request_image(prompt),
        }
    }

    /// Fold a remote result back in. Stale results are dropped.
    pub fn complete(&mut self, completion: Completion) -> Option<Effect> {
        match completion {
            Completion::Discovered { ticket, result } => {
                if self.pending.scan != Some(ticket) {
                    debug!(ticket, "dropping stale discovery result");
                    return None;
                }
                self.pending.scan = None;
                self.selected = None;
                self.draft = None;
                self.image = None;
                match result {
                    Ok(trends) => {
                        debug!(count = trends.len(), "trends discovered");
                        self.trends = trends;
                        self.set_phase(Phase::TrendsLoaded);
                    }
                    Err(e) => {
                        warn!(error = %e, "trend discovery failed");
                        self.trends.clear();
                        self.error = Some(SCAN_FAILED.to_string());
                        self.set_phase(Phase::Idle);
                    }
                }
                None
            }

            Completion::Drafted { ticket, result } => {
                let kind = match self.pending.draft {
                    Some((pending, kind)) if pending == ticket => kind,
                    _ => {
                        debug!(ticket, "dropping stale draft result");
                        return None;
                    }
                };
                self.pending.draft = None;

                match (result, kind) {
                    (Ok(content), _) => {
                        let trend = self.selected.clone()?;
                        let prompt = content.image_prompt.clone();
                        self.draft = Some(Draft {
                            content,
                            trend,
                            tone: self.tone,
                        });
                        self.error = None;
                        self.set_phase(Phase::PostReady);
                        Some(Effect::Dispatch(Intent::GenerateImage(Some(prompt))))
                    }
                    (Err(e), DraftKind::Initial) => {
                        warn!(error = %e, "content generation failed");
                        self.draft = None;
                        self.error = Some(DRAFT_FAILED.to_string());
                        self.set_phase(Phase::TrendsLoaded);
                        None
                    }
                    (Err(e), DraftKind::Retone { previous }) => {
                        warn!(error = %e, tone = %self.tone, "tone change failed");
                        // Prior content stays, so does the tone it was written in
                        self.tone = previous;
                        self.error = Some(RETONE_FAILED.to_string());
                        self.set_phase(Phase::PostReady);
                        None
                    }
                }
            }

            Completion::Rendered { ticket, result } => {
                if self.pending.image != Some(ticket) {
                    debug!(ticket, "dropping stale image result");
                    return None;
                }
                self.pending.image = None;
                match result {
                    Ok(image) => {
                        if image.is_none() {
                            debug!("image response carried no inline data");
                        }
                        self.image = image;
                    }
                    // Never surfaced; the post stays usable without a visual.
                    Err(e) => {
                        warn!(error = %e, "image generation failed");
                        self.image = None;
                    }
                }
                self.set_phase(Phase::PostReady);
                None
            }
        }
    }

    fn scan(&mut self) -> Result<Option<Effect>, WorkflowError> {
        self.expect_phase(
            &Intent::Scan,
            &[Phase::Idle, Phase::TrendsLoaded, Phase::PostReady],
        )?;
        self.error = None;
        let ticket = self.issue_ticket();
        // Anything still in flight belongs to the old trend list.
        self.pending = Pending {
            scan: Some(ticket),
            ..Pending::default()
        };
        self.set_phase(Phase::Scanning);
        Ok(Some(Effect::Request(Request::Discover { ticket })))
    }

    fn select(&mut self, id: TrendId) -> Result<Option<Effect>, WorkflowError> {
        self.expect_phase(
            &Intent::SelectTrend(id.clone()),
            &[
                Phase::TrendsLoaded,
                Phase::PostReady,
                Phase::GeneratingPost,
                Phase::GeneratingImage,
            ],
        )?;
        let trend = self
            .trends
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(WorkflowError::UnknownTrend(id))?;

        self.selected = Some(trend.id.clone());
        self.image = None;
        self.draft = None;
        self.error = None;

        let ticket = self.issue_ticket();
        self.pending.draft = Some((ticket, DraftKind::Initial));
        self.pending.image = None;
        self.set_phase(Phase::GeneratingPost);
        Ok(Some(Effect::Request(Request::Draft {
            ticket,
            trend,
            tone: self.tone,
        })))
    }

    fn change_tone(&mut self, tone: Tone) -> Result<Option<Effect>, WorkflowError> {
        self.expect_phase(&Intent::ChangeTone(tone), &[Phase::PostReady])?;
        let trend = self.selected().cloned().ok_or(WorkflowError::NoSelection)?;
        if tone == self.tone {
            return Ok(None);
        }

        let previous = self.tone;
        self.tone = tone;
        self.error = None;
        let ticket = self.issue_ticket();
        self.pending.draft = Some((ticket, DraftKind::Retone { previous }));
        self.set_phase(Phase::GeneratingPost);
        Ok(Some(Effect::Request(Request::Draft {
            ticket,
            trend,
            tone,
        })))
    }

    fn request_image(&mut self, prompt: Option<String>) -> Result<Option<Effect>, WorkflowError> {
        let prompt = prompt.filter(|p| !p.trim().is_empty()).or_else(|| {
            self.content()
                .map(|c| c.image_prompt.clone())
                .filter(|p| !p.trim().is_empty())
        });
        let Some(prompt) = prompt else {
            debug!("no image brief available, nothing to render");
            return Ok(None);
        };
        self.expect_phase(&Intent::GenerateImage(None), &[Phase::PostReady])?;

        let ticket = self.issue_ticket();
        self.pending.image = Some(ticket);
        self.set_phase(Phase::GeneratingImage);
        Ok(Some(Effect::Request(Request::Render { ticket, prompt })))
    }

    fn expect_phase(&self, intent: &Intent, allowed: &[Phase]) -> Result<(), WorkflowError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(WorkflowError::NotApplicable {
                intent: intent.name(),
                phase: self.phase,
            })
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "phase change");
        }
        self.phase = phase;
    }
}
