//! A minimal terminal spinner for the workflow's remote calls.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// Opens the stream a spinner draws on, once per spinner.
pub type MakeWriter = Arc<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>;

/// Draw on stderr so stdout output stays clean.
pub fn stderr() -> MakeWriter {
    Arc::new(|| -> Box<dyn Write + Send> { Box::new(std::io::stderr()) })
}

/// A terminal spinner that runs in a background task.
///
/// Call [`Spinner::start`] to begin, then await [`Spinner::stop`] before
/// printing anything else.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: tokio::sync::watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner on stderr with the given message (e.g. `"rendering the visual"`).
    pub fn start(message: &str) -> Self {
        Self::start_on(message, Box::new(std::io::stderr()))
    }

    /// Start a spinner drawing on `out`.
    pub fn start_on(message: &str, mut out: Box<dyn Write + Send>) -> Self {
        let (cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let mut i = 0;
            loop {
                let frame = FRAMES[i % FRAMES.len()];
                // \r moves to start of line, \x1b[2K clears the line
                let _ = write!(out, "\x1b[2K\r{frame} {message}...");
                let _ = out.flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                i += 1;
            }
            let _ = write!(out, "\x1b[2K\r");
            let _ = out.flush();
        });

        Self {
            handle,
            cancel: cancel_tx,
        }
    }

    /// Stop the spinner and clear its line. Nothing is drawn once this returns.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

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

    #[test]
    fn frames_are_single_braille_chars() {
        assert!(!FRAMES.is_empty());
        for frame in FRAMES {
            assert_eq!(frame.chars().count(), 1);
        }
    }

    #[tokio::test]
    async fn spinner_starts_and_stops_without_panic() {
        let spinner = Spinner::start("testing");
        tokio::time::sleep(Duration::from_millis(200)).await;
        spinner.stop().await;
    }

    #[tokio::test]
    async fn stop_clears_the_line_last() {
        let capture = Capture::default();
        let spinner = Spinner::start_on("testing", Box::new(capture.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        spinner.stop().await;

        let written = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(written.contains("testing..."));
        assert!(written.ends_with("\x1b[2K\r"));

        let len = written.len();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(capture.0.lock().unwrap().len(), len);
    }
}
