//! Terminal progress indicator for merges.
//!
//! # Examples
//!
//! ```
//! use pdfmerge::output::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(3, ProgressStyle::Bar);
//! for i in 1..=3 {
//!     progress.set_message(format!("file {i}"));
//!     progress.update(i);
//! }
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Simple counter: 2/5
    Counter,
}

/// Progress display on stdout, redrawn in place.
///
/// Disabled automatically when stdout is not a terminal so piped output stays
/// clean.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    message: Option<String>,
    start_time: Instant,
    last_update: Option<Instant>,
    /// Minimum time between redraws.
    update_interval: Duration,
    enabled: bool,
}

impl ProgressBar {
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            last_update: None,
            update_interval: Duration::from_millis(100),
            enabled: io::stdout().is_terminal(),
        }
    }

    /// Create a progress bar that never draws.
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Move to `current` and redraw, at most once per update interval. The
    /// final step is always drawn.
    pub fn update(&mut self, current: usize) {
        self.current = current.min(self.total);

        let due = self
            .last_update
            .is_none_or(|last| last.elapsed() >= self.update_interval);
        if !due && self.current < self.total {
            return;
        }

        self.last_update = Some(Instant::now());
        self.render();
    }

    /// Draw the completed state and end the line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = self.total;
            self.render();
            println!();
        }
    }

    /// Erase the progress line.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }
        print!("\r\x1b[K{}", self.line());
        io::stdout().flush().ok();
    }

    fn line(&self) -> String {
        let body = match self.style {
            ProgressStyle::Bar => self.render_bar(),
            ProgressStyle::Counter => format!("{}/{}", self.current, self.total),
        };

        let elapsed = format_duration(self.start_time.elapsed());
        match &self.message {
            Some(msg) => format!("{body} {elapsed} {msg}"),
            None => format!("{body} {elapsed}"),
        }
    }

    fn render_bar(&self) -> String {
        let width = 30;
        let filled = (width * self.current) / self.total.max(1);

        let arrow = if filled > 0 && filled < width { ">" } else { "" };
        let bar = "=".repeat(filled.saturating_sub(arrow.len())) + arrow;

        format!(
            "[{bar:<width$}] {:>3}% {}/{}",
            self.percent() as usize,
            self.current,
            self.total
        )
    }

    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
