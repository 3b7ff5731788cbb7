use crate::prelude::eprintln;
use codemorph_core::update::Milestone;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, IsTerminal, Write};

/// User-facing notifications, choices and progress.
pub trait Ui: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Offer `action` to the user. Returns whether it was picked.
    fn choose(&self, message: &str, action: &str) -> bool;

    fn progress(&self, milestone: Milestone);

    /// Remove the progress indicator, if one is showing.
    fn finish_progress(&self) {}
}

/// Terminal UI: messages on stderr, an `indicatif` bar for progress.
pub struct Console {
    bar: ProgressBar,
    interactive: bool,
}

impl Console {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} codemorph [{bar:30.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        Self {
            bar,
            interactive: std::io::stdin().is_terminal() && std::io::stderr().is_terminal(),
        }
    }

    /// Print above the bar so it is not overwritten by the next redraw.
    fn emit(&self, line: String) {
        self.bar.suspend(|| eprintln!("{}", line));
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for Console {
    fn info(&self, message: &str) {
        self.emit(format!("{} {}", "info:".green().bold(), message));
    }

    fn warn(&self, message: &str) {
        self.emit(format!("{} {}", "warning:".yellow().bold(), message));
    }

    fn error(&self, message: &str) {
        self.emit(format!("{} {}", "error:".red().bold(), message));
    }

    fn choose(&self, message: &str, action: &str) -> bool {
        self.error(message);

        if !self.interactive {
            return false;
        }

        self.bar.suspend(|| {
            anstream::eprint!("{} [y/N] ", action.bold());
            let _ = std::io::stderr().flush();

            let mut answer = String::new();
            if std::io::stdin().lock().read_line(&mut answer).is_err() {
                return false;
            }

            matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        })
    }

    fn progress(&self, milestone: Milestone) {
        if milestone == Milestone::Connecting {
            self.bar
                .enable_steady_tick(std::time::Duration::from_millis(100));
        }

        self.bar.set_position(milestone.percent());
        self.bar.set_message(milestone.message());
    }

    fn finish_progress(&self) {
        self.bar.finish_and_clear();
    }
}
