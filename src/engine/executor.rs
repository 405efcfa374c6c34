//! Terminal integration for the declarative executor: progress bar,
//! confirmation prompt, and the closing summary.

use anyhow::Result;
use colored::Colorize;
use declarative::{ApplyResult, ConfirmCallback, ExecuteSummary, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the pending changes
pub struct BarProgress {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl BarProgress {
    pub fn new(quiet: bool) -> Self {
        Self { bar: None, quiet }
    }
}

impl ProgressCallback for BarProgress {
    fn on_start(&mut self, count: usize) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(count as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        self.bar = Some(bar);
    }

    fn on_resource_start(&mut self, label: &str, _description: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(label.to_string());
        }
    }

    fn on_resource_complete(&mut self, label: &str, result: &ApplyResult) {
        let Some(bar) = &self.bar else {
            return;
        };
        if let ApplyResult::Failed { error } = result {
            bar.suspend(|| println!("  {} {} ({})", "✗".red(), label, error));
        }
        bar.inc(1);
    }

    fn on_complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Interactive confirmation through dialoguer
pub struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        use dialoguer::Confirm;

        println!();
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}

fn summary_lines(summary: &ExecuteSummary) -> Vec<String> {
    [
        (summary.created, "created"),
        (summary.modified, "modified"),
        (summary.replaced, "replaced"),
        (summary.removed, "removed"),
        (summary.skipped, "skipped"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, verb)| format!("{count} resources {verb}"))
    .collect()
}

/// Print how an apply went
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!(
            "  {} Configuration applied successfully!",
            "✓".green().bold()
        );
    } else {
        println!(
            "  {} Configuration applied with errors",
            "⚠".yellow().bold()
        );
    }

    for line in summary_lines(summary) {
        println!("    • {line}");
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines_skip_zero_counts() {
        let summary = ExecuteSummary {
            created: 2,
            removed: 1,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(
            summary_lines(&summary),
            vec!["2 resources created", "1 resources removed"]
        );
    }

    #[test]
    fn test_quiet_progress_stays_silent() {
        let mut progress = BarProgress::new(true);
        progress.on_start(3);
        progress.on_resource_start("tunnel", "connection tunnel");
        progress.on_resource_complete("tunnel", &ApplyResult::Created);
        progress.on_complete();
        assert!(progress.bar.is_none());
    }
}
