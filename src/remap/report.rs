use dashmap::DashMap;

use crate::{
    diagnostics::Diagnostics,
    remap::rewriter::SiteRewrite,
    resources::ClassKind,
    Error,
};

/// What happened to one selected class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassOutcome {
    /// The class was processed; its body holds the rewritten sites.
    Remapped(ClassSummary),
    /// The class was left untouched.
    Aborted(Error),
}

impl ClassOutcome {
    /// Returns the summary of a processed class.
    #[must_use]
    pub fn summary(&self) -> Option<&ClassSummary> {
        match self {
            ClassOutcome::Remapped(summary) => Some(summary),
            ClassOutcome::Aborted(_) => None,
        }
    }

    /// Returns true if the class was left untouched because of an error.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, ClassOutcome::Aborted(_))
    }
}

/// Per-class result of [`crate::remap::remap_method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    /// Table convention of the class
    pub kind: ClassKind,
    /// One entry per candidate site, in instruction order
    pub sites: Vec<SiteRewrite>,
    /// Allocations skipped because they did not have the expected shape
    pub skipped: Vec<Error>,
}

impl ClassSummary {
    /// Number of sites whose instructions were modified.
    #[must_use]
    pub fn changed_sites(&self) -> usize {
        self.sites.iter().filter(|site| site.changed).count()
    }
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapStats {
    /// Classes that were processed
    pub classes_remapped: usize,
    /// Classes left untouched because of an error
    pub classes_aborted: usize,
    /// Candidate sites found
    pub sites: usize,
    /// Sites whose instructions were modified
    pub sites_changed: usize,
    /// Allocations skipped as malformed
    pub sites_skipped: usize,
    /// Elements kept
    pub kept: usize,
    /// Elements deleted
    pub deleted: usize,
    /// Deleted elements replaced by `0`
    pub zeroed: usize,
}

/// Outcome of a [`crate::remap::ResourceArrayRemapper`] run.
///
/// Classes that were not selected do not appear.
#[derive(Debug, Default)]
pub struct RemapReport {
    outcomes: DashMap<String, ClassOutcome>,
    diagnostics: Diagnostics,
}

impl RemapReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, class: &str, outcome: ClassOutcome) {
        self.outcomes.insert(class.to_string(), outcome);
    }

    /// Returns the outcome for a class descriptor.
    #[must_use]
    pub fn outcome(&self, class: &str) -> Option<ClassOutcome> {
        self.outcomes.get(class).map(|entry| entry.value().clone())
    }

    /// Number of selected classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if no class was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Descriptors of the classes left untouched because of an error, sorted.
    #[must_use]
    pub fn aborted_classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self
            .outcomes
            .iter()
            .filter(|entry| entry.value().is_aborted())
            .map(|entry| entry.key().clone())
            .collect();
        classes.sort();
        classes
    }

    /// Diagnostics collected during the run.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Sums up all class outcomes.
    #[must_use]
    pub fn stats(&self) -> RemapStats {
        let mut stats = RemapStats::default();

        for entry in &self.outcomes {
            match entry.value() {
                ClassOutcome::Remapped(summary) => {
                    stats.classes_remapped += 1;
                    stats.sites += summary.sites.len();
                    stats.sites_changed += summary.changed_sites();
                    stats.sites_skipped += summary.skipped.len();
                    for site in &summary.sites {
                        stats.kept += site.kept;
                        stats.deleted += site.deleted;
                        stats.zeroed += site.zeroed;
                    }
                }
                ClassOutcome::Aborted(_) => stats.classes_aborted += 1,
            }
        }

        stats
    }
}
