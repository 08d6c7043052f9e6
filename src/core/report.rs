//! Violation accumulation and terminal reporting.
//!
//! Violations are warned the moment they are recorded, in every mode;
//! the terminal pass/fail decision belongs to the run boundary, which
//! inspects the accumulated report once all surfaces have been walked.

use colored::Colorize;

/// Governed surface a violation was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Configuration,
    Scripts,
    Dependencies,
    Template,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Configuration => "configuration",
            Surface::Scripts => "scripts",
            Surface::Dependencies => "dependencies",
            Surface::Template => "template",
        }
    }
}

/// One detected difference between actual and canonical state.
#[derive(Debug, Clone)]
pub struct Violation {
    pub surface: Surface,
    pub subject: String,
    pub detail: String,
}

impl Violation {
    pub fn new(surface: Surface, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Violation {
            surface,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

/// Per-run violation sink.
#[derive(Default)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn record(&mut self, violation: Violation) {
        eprintln!(
            "{} [{}]: {}",
            "Warning".yellow().bold(),
            violation.subject,
            violation.detail
        );
        self.violations.push(violation);
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self) -> usize {
        self.violations.len()
    }

    /// Bounded one-line summary of what was flagged.
    pub fn summary(&self, max_items: usize) -> String {
        let shown = self
            .violations
            .iter()
            .take(max_items)
            .map(|v| compact_line(&format!("{} {}", v.surface.as_str(), v.subject), 60))
            .collect::<Vec<_>>()
            .join(" | ");
        if self.violations.len() > max_items {
            format!("{} (+{} more)", shown, self.violations.len() - max_items)
        } else {
            shown
        }
    }
}

/// Collapse whitespace and bound length for one-line previews.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_tracks_cleanliness_and_count() {
        let mut report = Report::new();
        assert!(report.is_clean());
        report.record(Violation::new(Surface::Scripts, "package.json > scripts", "stale"));
        assert!(!report.is_clean());
        assert_eq!(report.count(), 1);
    }

    #[test]
    fn summary_bounds_the_item_list() {
        let mut report = Report::new();
        for index in 0..6 {
            report.record(Violation::new(
                Surface::Template,
                format!("file-{}.md", index),
                "file not found",
            ));
        }
        let summary = report.summary(4);
        assert!(summary.contains("file-0.md"));
        assert!(summary.contains("(+2 more)"));
        assert!(!summary.contains("file-5.md"));
    }

    #[test]
    fn compact_line_collapses_and_truncates() {
        assert_eq!(compact_line("a\n  b   c", 100), "a b c");
        assert_eq!(compact_line("abcdef", 3), "abc...");
        assert_eq!(compact_line("abc", 3), "abc");
    }
}
