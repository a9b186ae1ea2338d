use std::sync::Arc;
use tracing::{debug, warn};

use super::{Completion, Dashboard, Effect, Intent, Request, WorkflowError};
use crate::events::{Event, EventBus};
use crate::generator::Generator;
use crate::spinner::{MakeWriter, Spinner};

/// Carry out one remote request.
pub async fn perform(generator: &dyn Generator, request: Request) -> Completion {
    match request {
        Request::Discover { ticket } => Completion::Discovered {
            ticket,
            result: generator.discover_trends().await,
        },
        Request::Draft {
            ticket,
            trend,
            tone,
        } => Completion::Drafted {
            ticket,
            result: generator.draft_content(&trend, tone).await,
        },
        Request::Render { ticket, prompt } => Completion::Rendered {
            ticket,
            result: generator.render_image(&prompt).await,
        },
    }
}

/// Drives a [`Dashboard`] against a [`Generator`], one intent at a time.
pub struct Workflow {
    dashboard: Dashboard,
    generator: Arc<dyn Generator>,
    events: Arc<EventBus>,
    spinner: Option<MakeWriter>,
}

impl Workflow {
    pub fn new(generator: Arc<dyn Generator>, dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            generator,
            events: Arc::new(EventBus::default()),
            spinner: None,
        }
    }

    /// Publish phase changes and errors on a shared bus.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Show a spinner on `output` while each remote call is outstanding.
    pub fn with_spinner(mut self, output: MakeWriter) -> Self {
        self.spinner = Some(output);
        self
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Apply `intent` and keep going until the dashboard settles: every
    /// request is performed, its completion folded back in, and any chained
    /// intent (a fresh draft asking for its image) dispatched in turn.
    ///
    /// Only the operator's own intent can be rejected.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<(), WorkflowError> {
        let mut next = self.observe(|d| d.apply_intent(intent))?;

        while let Some(effect) = next {
            next = match effect {
                Effect::Request(request) => {
                    let spinner = self.start_spinner();
                    let completion = perform(self.generator.as_ref(), request).await;
                    if let Some(spinner) = spinner {
                        spinner.stop().await;
                    }
                    self.observe(|d| Ok(d.complete(completion)))?
                }
                Effect::Dispatch(intent) => {
                    debug!(intent = intent.name(), "chained intent");
                    match self.observe(|d| d.apply_intent(intent)) {
                        Ok(effect) => effect,
                        Err(e) => {
                            warn!(error = %e, "chained intent rejected");
                            None
                        }
                    }
                }
            };
        }

        Ok(())
    }

    fn start_spinner(&self) -> Option<Spinner> {
        let output = self.spinner.as_ref()?;
        let activity = self.dashboard.phase().activity()?;
        Some(Spinner::start_on(activity, output()))
    }

    /// Run a transition and publish what it changed.
    fn observe<T>(
        &mut self,
        transition: impl FnOnce(&mut Dashboard) -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        let from = self.dashboard.phase();
        let error_before = self.dashboard.error().map(str::to_string);

        let out = transition(&mut self.dashboard)?;

        let to = self.dashboard.phase();
        if from != to {
            self.events.emit(Event::PhaseChanged { from, to });
        }
        if let Some(message) = self.dashboard.error()
            && error_before.as_deref() != Some(message)
        {
            self.events.emit(Event::ErrorRaised {
                message: message.to_string(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::mock::MockGenerator;
    use crate::generator::{Trend, TrendId};
    use crate::workflow::{Intent, Phase};
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn output(&self) -> MakeWriter {
            let capture = self.clone();
            Arc::new(move || -> Box<dyn Write + Send> { Box::new(capture.clone()) })
        }

        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn trend() -> Trend {
        Trend {
            id: TrendId::new("a"),
            title: "A".to_string(),
            source: "X".to_string(),
            summary: "s".to_string(),
            business_impact: "b".to_string(),
            url: None,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn spinner_is_cleared_before_dispatch_returns() {
        let capture = Capture::default();
        let generator = Arc::new(MockGenerator::new().discover(Ok(vec![trend()])));
        let mut workflow =
            Workflow::new(generator, Dashboard::default()).with_spinner(capture.output());

        workflow.dispatch(Intent::Scan).await.unwrap();

        let drawn = capture.text();
        assert!(drawn.contains("scanning global tech news..."));
        assert!(drawn.ends_with("\x1b[2K\r"));

        // Nothing left running to draw over what the caller prints next
        let len = drawn.len();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(capture.text().len(), len);
        assert_eq!(workflow.dashboard().phase(), Phase::TrendsLoaded);
    }

    #[tokio::test]
    async fn no_spinner_unless_asked() {
        let generator = Arc::new(MockGenerator::new().discover(Ok(vec![trend()])));
        let mut workflow = Workflow::new(generator, Dashboard::default());
        workflow.dispatch(Intent::Scan).await.unwrap();
        assert_eq!(workflow.dashboard().trends().len(), 1);
    }
}
