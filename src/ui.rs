//! Terminal output, prompts, and progress.
//!
//! One shared vocabulary of styled lines: numbered steps, `✓`/`⚠`/`✗`
//! status markers, and indented detail. `--quiet` suppresses the narration
//! but never status markers or errors.

use std::sync::atomic::{AtomicBool, Ordering};

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{CairnError, Result};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress step and detail narration.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a numbered pipeline step header.
pub fn step(current: usize, total: usize, message: &str) {
    if quiet() {
        return;
    }
    println!(
        "{} {}",
        style(format!("[{current}/{total}]")).cyan().bold(),
        style(message).bold()
    );
}

/// Print a plain informational line.
pub fn info(message: &str) {
    if !quiet() {
        println!("{message}");
    }
}

/// Print an indented detail line.
pub fn detail(message: &str) {
    if !quiet() {
        println!("  {message}");
    }
}

/// Print a success line.
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a non-fatal warning line.
pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Ask for confirmation, defaulting to yes; declining is not an error.
pub fn confirm(question: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(true)
        .interact()
        .map_err(|e| CairnError::Io(e.into()))
}

/// Byte-progress bar for a download of known size.
pub fn download_bar(total_bytes: u64) -> ProgressBar {
    let bar = ProgressBar::new(total_bytes);
    bar.set_style(
        ProgressStyle::with_template("  {bar:30.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    bar
}
