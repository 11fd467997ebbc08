use rayon::prelude::*;

use crate::{
    bytecode::{ClassDef, MethodBody},
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity},
    remap::{
        locator::{locate_sites, select_class},
        policy::RemapPolicy,
        report::{ClassOutcome, ClassSummary, RemapReport},
        rewriter::rewrite_site,
    },
    resources::{ClassContext, RemapTable, ResourceConfig},
    Error, Result,
};

/// Rewrites every resource table in one static initializer.
///
/// All sites are located and validated before the first patch, and patching happens
/// on a copy that replaces `body` only once every site was rewritten. On error `body`
/// is left exactly as it was.
///
/// # Arguments
///
/// * `body` - The static initializer of the class described by `context`
/// * `context` - The enclosing class
/// * `table` - The global remap table
///
/// # Returns
///
/// A summary listing every rewritten site in instruction order, plus the allocations
/// that were skipped as malformed.
///
/// # Errors
///
/// Returns [`Error::PayloadWidthMismatch`] if any located bulk fill has the wrong
/// element width, or [`Error::Patch`] if a patch could not be applied.
pub fn remap_method(
    body: &mut MethodBody,
    context: &ClassContext,
    table: &RemapTable,
) -> Result<ClassSummary> {
    let located = locate_sites(body, context)?;
    let policy = RemapPolicy::new(table);

    let mut working = body.clone();
    let mut sites = Vec::with_capacity(located.sites.len());
    for site in located.sites.iter().rev() {
        let decisions = policy.decide_all(&site.elements);
        sites.push(rewrite_site(&mut working, site, &decisions)?);
    }
    sites.reverse();

    if sites.iter().any(|site| site.changed) {
        *body = working;
    }

    Ok(ClassSummary {
        kind: context.kind,
        sites,
        skipped: located.malformed,
    })
}

/// Remaps the resource tables of a whole set of classes.
///
/// Classes are independent of each other and are processed in parallel. A failure in
/// one class never affects another; see [`RemapReport`] for the per-class outcome.
///
/// # Examples
///
/// ```rust
/// use resremap::prelude::*;
///
/// let mut classes = vec![ClassDef::new(
///     "Lcom/example/R$array;",
///     Some(MethodBody::from(vec![
///         Instruction::constant(Register(0), 2),
///         Instruction::new_array(Register(0), Register(1)),
///         Instruction::fill_array(Register(1), ArrayPayload::from_u32s(&[0x7f01_0000, 0x7f01_0001])),
///         Instruction::return_void(),
///     ])),
/// )];
/// let table: RemapTable = [(0x7f01_0001_u32, 0x7f01_0000_u32)].into_iter().collect();
///
/// let config = ResourceConfig::default();
/// let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);
///
/// assert_eq!(report.stats().deleted, 1);
/// assert_eq!(
///     classes[0].static_initializer.as_ref().and_then(|body| body.get(0)),
///     Some(&Instruction::constant(Register(0), 1))
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResourceArrayRemapper<'a> {
    config: &'a ResourceConfig,
    table: &'a RemapTable,
}

impl<'a> ResourceArrayRemapper<'a> {
    /// Creates a remapper for one run.
    #[must_use]
    pub fn new(config: &'a ResourceConfig, table: &'a RemapTable) -> Self {
        ResourceArrayRemapper { config, table }
    }

    /// Rewrites the static initializers of all selected classes in place.
    pub fn run(&self, classes: &mut [ClassDef]) -> RemapReport {
        let report = RemapReport::new();

        classes
            .par_iter_mut()
            .for_each(|class| {
                self.run_class(class, &report);
            });

        let stats = report.stats();
        log::debug!(
            "remapped {} resource classes ({} aborted): {} of {} arrays changed, {} ids deleted",
            stats.classes_remapped,
            stats.classes_aborted,
            stats.sites_changed,
            stats.sites,
            stats.deleted
        );
        if report.diagnostics().has_errors() {
            log::warn!("{}", report.diagnostics().summary());
        }

        report
    }

    /// Rewrites a single class and records the outcome.
    ///
    /// Returns the class context if the class was selected.
    pub fn run_class(&self, class: &mut ClassDef, report: &RemapReport) -> Option<ClassContext> {
        let context = select_class(&class.name, self.config)?;

        let Some(body) = class.static_initializer.as_mut() else {
            report.diagnostics().push(
                Diagnostic::new(
                    DiagnosticSeverity::Info,
                    DiagnosticCategory::Class,
                    "resource class has no static initializer",
                )
                .with_class(&class.name),
            );
            report.record(
                &class.name,
                ClassOutcome::Remapped(ClassSummary {
                    kind: context.kind,
                    sites: Vec::new(),
                    skipped: Vec::new(),
                }),
            );
            return Some(context);
        };

        match remap_method(body, &context, self.table) {
            Ok(summary) => {
                for skipped in &summary.skipped {
                    log::warn!("{}: skipping array site: {}", class.name, skipped);
                    report.diagnostics().push(site_diagnostic(&class.name, skipped));
                }
                for site in summary.sites.iter().filter(|site| site.changed) {
                    log::debug!("{}: {}", class.name, site);
                }
                report.record(&class.name, ClassOutcome::Remapped(summary));
            }
            Err(error) => {
                log::warn!("{}: leaving class untouched: {}", class.name, error);
                report.diagnostics().push(class_diagnostic(&class.name, &error));
                report.record(&class.name, ClassOutcome::Aborted(error));
            }
        }

        Some(context)
    }
}

fn site_diagnostic(class: &str, error: &Error) -> Diagnostic {
    let diagnostic = Diagnostic::new(
        DiagnosticSeverity::Warning,
        DiagnosticCategory::Site,
        error.to_string(),
    )
    .with_class(class);

    match error {
        Error::MalformedInitializer { position, .. } => diagnostic.with_position(*position),
        _ => diagnostic,
    }
}

fn class_diagnostic(class: &str, error: &Error) -> Diagnostic {
    let (category, position) = match error {
        Error::PayloadWidthMismatch { position, .. } => (DiagnosticCategory::Payload, Some(*position)),
        _ => (DiagnosticCategory::Rewrite, None),
    };

    let diagnostic =
        Diagnostic::new(DiagnosticSeverity::Error, category, error.to_string()).with_class(class);
    match position {
        Some(position) => diagnostic.with_position(position),
        None => diagnostic,
    }
}
