//! Diagnostics collection for resource table remapping.
//!
//! Array sites that do not match the expected initializer shape are skipped rather
//! than failing the run, and classes with unsupported payloads are left untouched.
//! Both outcomes are recorded here so that callers can report what was not rewritten
//! and why.
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for thread-safe, lock-free
//! append operations, allowing diagnostics to be collected from the parallel
//! per-class workers without synchronization overhead.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual diagnostic entry with severity and context
//! - [`DiagnosticSeverity`] - Severity level (Info, Warning, Error)
//! - [`DiagnosticCategory`] - Which stage produced the diagnostic
//!
//! # Usage Examples
//!
//! ```rust
//! use resremap::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.push(
//!     Diagnostic::new(
//!         DiagnosticSeverity::Warning,
//!         DiagnosticCategory::Site,
//!         "no literal size definition reaches new-array",
//!     )
//!     .with_class("Lcom/example/R$id;")
//!     .with_position(4),
//! );
//!
//! assert_eq!(diagnostics.warning_count(), 1);
//! for entry in diagnostics.iter() {
//!     println!("{entry}");
//! }
//! ```

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    Info,

    /// A site was skipped; the rest of the class was still rewritten.
    Warning,

    /// A class was left untouched because rewriting it could corrupt resource IDs.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Category indicating the source of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Array site discovery, e.g. an allocation without a reaching size literal.
    Site,

    /// Bulk-fill payload problems, e.g. an unexpected element width.
    Payload,

    /// Site rewriting and instruction patching.
    Rewrite,

    /// Class selection and per-class summaries.
    Class,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Site => write!(f, "Site"),
            DiagnosticCategory::Payload => write!(f, "Payload"),
            DiagnosticCategory::Rewrite => write!(f, "Rewrite"),
            DiagnosticCategory::Class => write!(f, "Class"),
        }
    }
}

/// A single diagnostic entry with context information.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional descriptor of the class the issue was found in.
    pub class: Option<String>,

    /// Optional instruction index inside the static initializer.
    pub position: Option<usize>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            class: None,
            position: None,
        }
    }

    /// Adds the class descriptor to the diagnostic.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Adds the instruction index to the diagnostic.
    #[must_use]
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(class) = &self.class {
            write!(f, " (class: {})", class)?;
        }

        if let Some(position) = self.position {
            write!(f, " (instruction: {})", position)?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
/// Multiple threads can safely add diagnostics simultaneously.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds a diagnostic entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Error)
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Warning)
    }

    /// Returns the number of info-level diagnostics.
    pub fn info_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Info)
    }

    fn count_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == severity)
            .count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns diagnostics filtered by category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Returns diagnostics reported for one class.
    pub fn for_class(&self, class: &str) -> Vec<&Diagnostic> {
        self.iter()
            .filter(|d| d.class.as_deref() == Some(class))
            .collect()
    }

    /// Formats a summary of all diagnostics for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let error_count = self.error_count();
        let warning_count = self.warning_count();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s), {} info(s)",
            error_count,
            warning_count,
            self.info_count()
        );

        if error_count > 0 {
            output.push_str("\nErrors:\n");
            for diag in self.iter().filter(|d| d.severity == DiagnosticSeverity::Error) {
                let _ = writeln!(output, "  {diag}");
            }
        }

        if warning_count > 0 {
            output.push_str("\nWarnings:\n");
            for diag in self
                .iter()
                .filter(|d| d.severity == DiagnosticSeverity::Warning)
            {
                let _ = writeln!(output, "  {diag}");
            }
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_diagnostic_with_context() {
        let diag = Diagnostic::new(
            DiagnosticSeverity::Error,
            DiagnosticCategory::Payload,
            "width 2",
        )
        .with_class("Lcom/example/R$array;")
        .with_position(7);

        assert_eq!(diag.class.as_deref(), Some("Lcom/example/R$array;"));
        assert_eq!(diag.position, Some(7));
        assert_eq!(
            diag.to_string(),
            "[ERROR] Payload: width 2 (class: Lcom/example/R$array;) (instruction: 7)"
        );
    }

    #[test]
    fn test_diagnostics_container() {
        let diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_any());

        diagnostics.push(Diagnostic::new(
            DiagnosticSeverity::Info,
            DiagnosticCategory::Class,
            "Info message",
        ));
        diagnostics.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Site,
            "Warning message",
        ));
        assert!(!diagnostics.has_errors());
        diagnostics.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            DiagnosticCategory::Payload,
            "Error message",
        ));

        assert_eq!(diagnostics.count(), 3);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.info_count(), 1);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.has_any());
        assert_eq!(diagnostics.by_category(DiagnosticCategory::Site).len(), 1);

        let summary = diagnostics.summary();
        assert!(summary.contains("1 error(s), 1 warning(s), 1 info(s)"));
        assert!(summary.contains("[WARN] Site: Warning message"));
    }

    #[test]
    fn test_diagnostics_for_class() {
        let diagnostics = Diagnostics::new();
        diagnostics.push(
            Diagnostic::new(DiagnosticSeverity::Warning, DiagnosticCategory::Site, "a")
                .with_class("LR$id;"),
        );
        diagnostics.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Site,
            "b",
        ));

        assert_eq!(diagnostics.for_class("LR$id;").len(), 1);
        assert!(diagnostics.for_class("LR$string;").is_empty());
    }

    #[test]
    fn test_diagnostics_thread_safety() {
        let diagnostics = Arc::new(Diagnostics::new());
        let mut handles = vec![];

        for i in 0..10 {
            let diag_clone = Arc::clone(&diagnostics);
            handles.push(thread::spawn(move || {
                diag_clone.push(Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    DiagnosticCategory::Site,
                    format!("Thread {} warning", i),
                ));
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(diagnostics.count(), 10);
    }
}
