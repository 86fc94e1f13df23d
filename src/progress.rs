//! Progress reporting during a scan.
//!
//! [`Progress`] shows an indicatif spinner with the running file count and
//! prints a `Files processed: N` line at most once per interval. Both go to
//! stderr; the report itself is written to stdout.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for the duplicate finder.
///
/// Implement this trait to receive progress updates during a scan.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts. `total` is 0 when unknown.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called after each file is processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of files processed so far (1-based)
    /// * `path` - Path just processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called with the size of each processed file.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Rate limiter for periodic progress lines.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Instant,
}

impl Throttle {
    /// Start a throttle whose first window begins at `start`.
    #[must_use]
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last: start,
        }
    }

    /// Whether a line is due at `now`. Starts a new window when it is.
    pub fn ready(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Terminal progress reporter.
pub struct Progress {
    interval: Duration,
    quiet: bool,
    show_bar: bool,
    bar: Mutex<Option<ProgressBar>>,
    throttle: Mutex<Throttle>,
    bytes: Mutex<u64>,
}

impl Progress {
    /// Create a reporter that prints a progress line every `interval`.
    ///
    /// With `quiet` set nothing is displayed at all.
    #[must_use]
    pub fn new(interval: Duration, quiet: bool) -> Self {
        Self {
            interval,
            quiet,
            show_bar: true,
            bar: Mutex::new(None),
            throttle: Mutex::new(Throttle::new(interval, Instant::now())),
            bytes: Mutex::new(0),
        }
    }

    /// Enable or disable the spinner. Periodic lines are unaffected.
    #[must_use]
    pub fn with_bar(mut self, show_bar: bool) -> Self {
        self.show_bar = show_bar;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn emit_line(&self, line: &str) {
        let bar = self.bar.lock().ok();
        match bar.as_ref().and_then(|b| b.as_ref()) {
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ => eprintln!("{line}"),
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, _phase: &str, _total: usize) {
        if self.quiet {
            return;
        }
        if let Ok(mut throttle) = self.throttle.lock() {
            *throttle = Throttle::new(self.interval, Instant::now());
        }
        if !self.show_bar {
            return;
        }

        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        pb.set_style(Self::spinner_style());
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_progress(&self, current: usize, _path: &str) {
        if self.quiet {
            return;
        }
        if let Ok(bar) = self.bar.lock() {
            if let Some(ref pb) = *bar {
                pb.set_position(current as u64);
            }
        }

        let due = self
            .throttle
            .lock()
            .map(|mut t| t.ready(Instant::now()))
            .unwrap_or(false);
        if due {
            self.emit_line(&format!("Files processed: {current}"));
        }
    }

    fn on_item_completed(&self, bytes: u64) {
        if self.quiet {
            return;
        }
        let total = match self.bytes.lock() {
            Ok(mut b) => {
                *b += bytes;
                *b
            }
            Err(_) => return,
        };
        if let Ok(bar) = self.bar.lock() {
            if let Some(ref pb) = *bar {
                pb.set_message(format!("({})", bytesize::ByteSize(total)));
            }
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        }
    }
}
