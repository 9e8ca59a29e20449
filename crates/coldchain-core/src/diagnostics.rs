//! Validation issue model for pre-flight checks.
//!
//! The validator inspects a planning problem before model construction and
//! reports everything it finds as a list of [`Issue`]s grouped in a
//! [`ValidationReport`]. It supports:
//!
//! - Four severity levels (Info, Warning, Error, Critical)
//! - Categories for grouping issues (Completeness, Capacity, Transport, ...)
//! - Operator guidance (impact and fix suggestions) per issue
//! - Serialization for JSON output
//!
//! Critical issues block planning; errors are advisory and the caller may
//! proceed past them.
//!
//! # Example
//!
//! ```
//! use coldchain_core::diagnostics::{Issue, Severity, ValidationReport};
//!
//! let mut report = ValidationReport::new();
//! report.add(
//!     Issue::new("CAP_003", "Capacity", Severity::Warning, "Demand requires overtime")
//!         .with_impact("Higher labor costs but feasible."),
//! );
//!
//! assert_eq!(report.warning_count(), 1);
//! assert!(report.is_planning_feasible());
//! ```

use serde::Serialize;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, no action needed
    Info,
    /// Unusual but planning can proceed
    Warning,
    /// Likely to degrade the plan; advisory
    Error,
    /// Planning cannot proceed
    Critical,
}

/// A single issue found during pre-flight validation.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    /// Stable identifier (e.g. "CAP_001")
    pub id: String,
    /// Category for grouping (e.g. "Completeness", "Capacity", "Transport")
    pub category: String,
    pub severity: Severity,
    /// Short headline
    pub title: String,
    /// What was found
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// What it means for the plan
    #[serde(skip_serializing_if = "String::is_empty")]
    pub impact: String,
    /// How the operator can resolve it
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fix_guidance: String,
    /// Entity references the issue points at (node codes, dates, ...)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected: Vec<String>,
}

impl Issue {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            severity,
            title: title.into(),
            description: String::new(),
            impact: String::new(),
            fix_guidance: String::new(),
            affected: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = impact.into();
        self
    }

    pub fn with_fix(mut self, fix_guidance: impl Into<String>) -> Self {
        self.fix_guidance = fix_guidance.into();
        self
    }

    pub fn with_affected(mut self, affected: Vec<String>) -> Self {
        self.affected = affected;
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        write!(
            f,
            "[{}:{}] {}: {}",
            severity, self.category, self.id, self.title
        )?;
        if !self.affected.is_empty() {
            write!(f, " ({})", self.affected.join(", "))?;
        }
        Ok(())
    }
}

/// Collection of issues from one validation pass.
///
/// Running the validator twice on unchanged inputs yields an identical report;
/// checks append in a fixed order and never mutate their inputs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    // =========================================================================
    // Query Methods
    // =========================================================================

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn critical_count(&self) -> usize {
        self.count(Severity::Critical)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn has_errors_or_critical(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity >= Severity::Error)
    }

    /// Planning may proceed unless something critical was found.
    pub fn is_planning_feasible(&self) -> bool {
        !self.has_critical_issues()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn issues_at(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return "No issues".to_string();
        }
        let mut parts = Vec::new();
        for (severity, label) in [
            (Severity::Critical, "critical"),
            (Severity::Error, "error"),
            (Severity::Warning, "warning"),
            (Severity::Info, "info"),
        ] {
            let n = self.count(severity);
            if n > 0 {
                parts.push(format!("{} {}{}", n, label, if n == 1 { "" } else { "s" }));
            }
        }
        parts.join(", ")
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = ValidationReport::new();
        report.add(Issue::new("A1", "Completeness", Severity::Critical, "no forecast"));
        report.add(Issue::new("A2", "Capacity", Severity::Warning, "overtime needed"));
        report.add(Issue::new("A3", "Capacity", Severity::Warning, "tight trucks"));

        assert_eq!(report.critical_count(), 1);
        assert_eq!(report.warning_count(), 2);
        assert!(report.has_critical_issues());
        assert!(!report.is_planning_feasible());
    }

    #[test]
    fn test_errors_are_advisory() {
        let mut report = ValidationReport::new();
        report.add(Issue::new("B1", "Transport", Severity::Error, "tight weekly capacity"));

        assert!(report.has_errors_or_critical());
        assert!(report.is_planning_feasible());
    }

    #[test]
    fn test_issues_by_category() {
        let mut report = ValidationReport::new();
        report.add(Issue::new("C1", "Capacity", Severity::Info, "headroom"));
        report.add(Issue::new("D1", "Date Range", Severity::Warning, "gap"));
        report.add(Issue::new("C2", "Capacity", Severity::Warning, "peak day"));

        assert_eq!(report.issues_by_category("Capacity").count(), 2);
        assert_eq!(report.issues_by_category("Date Range").count(), 1);
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::new("BIZ_001", "Business Rules", Severity::Critical, "Unreachable node")
            .with_affected(vec!["6130".into()]);
        let s = issue.to_string();
        assert!(s.contains("critical"));
        assert!(s.contains("BIZ_001"));
        assert!(s.contains("6130"));
    }

    #[test]
    fn test_report_serialization() {
        let mut report = ValidationReport::new();
        report.add(
            Issue::new("CAP_001", "Capacity", Severity::Critical, "Demand exceeds capacity")
                .with_description("Total demand: 100,000 units")
                .with_affected(vec!["2025-10-13".into()]),
        );
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"critical\""));
        assert!(json.contains("CAP_001"));
        assert!(json.contains("2025-10-13"));
    }

    #[test]
    fn test_summary() {
        let mut report = ValidationReport::new();
        assert_eq!(report.summary(), "No issues");
        report.add(Issue::new("X", "Capacity", Severity::Warning, "w"));
        assert_eq!(report.summary(), "1 warning");
        report.add(Issue::new("Y", "Capacity", Severity::Error, "e"));
        report.add(Issue::new("Z", "Capacity", Severity::Warning, "w2"));
        assert_eq!(report.summary(), "1 error, 2 warnings");
    }
}
