use std::sync::Arc;

use anyhow::Result;
use console::{Term, style};
use serde::Serialize;

use crate::commands::report::Report;
use crate::progress::{DotProgress, NoProgress, Progress};
use crate::stats::Stats;

pub struct Output {
    term: Term,
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    /// Dots on the terminal for text output, nothing for JSON.
    pub fn progress(&self) -> Arc<dyn Progress> {
        if self.json {
            Arc::new(NoProgress)
        } else {
            Arc::new(DotProgress::new(self.term.clone()))
        }
    }

    pub fn fetched(&self, count: usize, environment: &str) -> Result<()> {
        if self.json {
            return Ok(());
        }

        self.term.write_line(&format!(
            "Fetched {} deployments for {}:",
            style(count).bold(),
            style(environment).cyan()
        ))?;
        Ok(())
    }

    pub fn report(&self, report: &Report) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }

        for group in &report.groups {
            self.term
                .write_line(&stats_line(group.cohort.label(), &group.stats))?;
        }
        Ok(())
    }
}

/// `- {total} {label }successful deployments: avg {avg} secs, min/max: {min}/{max} secs`
pub fn stats_line(label: &str, stats: &Stats) -> String {
    let label = if label.is_empty() {
        String::new()
    } else {
        format!("{label} ")
    };

    format!(
        "- {} {}successful deployments: avg {} secs, min/max: {}/{} secs",
        stats.total,
        label,
        stats.avg_duration_secs,
        stats.min_duration_secs,
        stats.max_duration_secs
    )
}
