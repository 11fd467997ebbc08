//! Applies per-element decisions to one array site.
//!
//! # Plain vs. styleable
//!
//! | | Plain | Styleable |
//! |---|---|---|
//! | deleted element | removed, later elements move up | replaced by `0` |
//! | array length | number of kept elements | unchanged |
//! | size `const` | rewritten | untouched |
//!
//! Bulk fills get a freshly built payload at the same element width. Plain store runs
//! are re-emitted densely, one store per kept element at indices `0..new_len`.
//! Styleable store runs keep one store per original store, at its original index,
//! with the mapped value or `0`.
//!
//! # Shared size constants
//!
//! The length literal is edited in place only when this allocation is its sole
//! reader. Otherwise a new `const` of the same register is inserted right before the
//! allocation and, when the register is read again afterwards, another `const`
//! restoring the old literal right after it. Registers are never renumbered.
//!
//! After every rewrite the site is decoded again and compared against the intended
//! contents; a mismatch means the body was corrupted and panics.

use std::fmt;

use crate::{
    bytecode::{Instruction, MethodBody},
    remap::{
        locator::{self, ArraySite, Population},
        patcher,
        policy::Decision,
    },
    resources::ClassKind,
    Error, Result,
};

/// How the size literal of a site was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeEdit {
    /// The length did not change.
    Unchanged,
    /// The `const` was rewritten in place.
    InPlace,
    /// A new `const` was inserted before the allocation.
    Inserted,
    /// A new `const` was inserted before the allocation and the old literal restored
    /// after it.
    InsertedWithRestore,
}

impl SizeEdit {
    /// Number of instructions this edit inserted before the allocation.
    #[must_use]
    pub fn inserted_before(self) -> usize {
        match self {
            SizeEdit::Unchanged | SizeEdit::InPlace => 0,
            SizeEdit::Inserted | SizeEdit::InsertedWithRestore => 1,
        }
    }
}

/// Summary of one site rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRewrite {
    /// Table convention that was applied
    pub kind: ClassKind,
    /// Allocation index in the body as it was located
    pub allocation_position: usize,
    /// Declared length before the rewrite
    pub original_length: u32,
    /// Declared length after the rewrite
    pub new_length: u32,
    /// Elements that survived, remapped or not
    pub kept: usize,
    /// Elements without a remap entry
    pub deleted: usize,
    /// Deleted elements that were replaced by `0` (styleable only)
    pub zeroed: usize,
    /// Treatment of the size literal
    pub size_edit: SizeEdit,
    /// False if the decisions were an identity and the body was not touched
    pub changed: bool,
}

impl fmt::Display for SiteRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} array at {}: {} -> {} elements ({} kept, {} deleted, {} zeroed)",
            self.kind,
            self.allocation_position,
            self.original_length,
            self.new_length,
            self.kept,
            self.deleted,
            self.zeroed
        )
    }
}

/// Rewrites one located site according to `decisions`.
///
/// `decisions[i]` applies to `site.elements[i]`. The site must have been located in
/// `body` and no edit may have touched positions at or before its population since.
/// Rewriting sites from the last to the first satisfies this.
///
/// # Arguments
///
/// * `body` - The method body the site was located in
/// * `site` - The site to rewrite
/// * `decisions` - One decision per decoded element
///
/// # Errors
///
/// Returns [`Error::Patch`] if the decisions do not match the site or the body no
/// longer has the located shape.
///
/// # Panics
///
/// Panics if the rewritten site does not decode to the intended contents.
pub fn rewrite_site(
    body: &mut MethodBody,
    site: &ArraySite,
    decisions: &[Decision],
) -> Result<SiteRewrite> {
    if decisions.len() != site.elements.len() {
        return Err(Error::Patch(format!(
            "{} decisions for an array of {} elements",
            decisions.len(),
            site.elements.len()
        )));
    }

    let kept = decisions.iter().filter(|d| !d.is_delete()).count();
    let deleted = decisions.len() - kept;

    let contents: Vec<u32> = match site.kind {
        ClassKind::Plain => decisions
            .iter()
            .filter_map(|d| d.kept())
            .map(|id| id.value())
            .collect(),
        ClassKind::Styleable => decisions
            .iter()
            .map(|d| d.kept().map_or(0, |id| id.value()))
            .collect(),
    };
    let zeroed = match site.kind {
        ClassKind::Plain => 0,
        ClassKind::Styleable => deleted,
    };

    let Ok(new_length) = u32::try_from(contents.len()) else {
        return Err(Error::Patch(format!(
            "array of {} elements does not fit a length literal",
            contents.len()
        )));
    };

    let mut summary = SiteRewrite {
        kind: site.kind,
        allocation_position: site.allocation_position,
        original_length: site.declared_length,
        new_length,
        kept,
        deleted,
        zeroed,
        size_edit: SizeEdit::Unchanged,
        changed: false,
    };

    let unchanged = new_length == site.declared_length
        && contents
            .iter()
            .zip(&site.elements)
            .all(|(new, old)| *new == old.value());
    if unchanged {
        return Ok(summary);
    }

    patch_population(body, site, &contents)?;
    if new_length != site.declared_length {
        summary.size_edit = patch_size(body, site, new_length)?;
    }
    summary.changed = true;

    verify(
        body,
        site,
        site.allocation_position + summary.size_edit.inserted_before(),
        &contents,
    )?;

    Ok(summary)
}

fn patch_population(body: &mut MethodBody, site: &ArraySite, contents: &[u32]) -> Result<()> {
    match site.population {
        Population::BulkFill {
            position,
            payload_len,
        } => {
            let length = match site.kind {
                ClassKind::Plain => contents.len(),
                // keep the original payload size unless a padded slot became nonzero
                ClassKind::Styleable => contents
                    .iter()
                    .rposition(|value| *value != 0)
                    .map_or(payload_len, |last| payload_len.max(last + 1)),
            };

            if length == 0 && site.kind == ClassKind::Plain {
                patcher::remove(body, position)?;
                return Ok(());
            }

            let Some(Instruction::BulkFill { payload, .. }) = body.get(position) else {
                return Err(Error::Patch(format!(
                    "expected fill-array-data at instruction {}",
                    position
                )));
            };
            let values: Vec<u64> = contents[..length].iter().map(|&v| u64::from(v)).collect();
            let replacement = payload.replace_elements(&values)?;
            patcher::replace_payload(body, position, replacement)?;
        }
        Population::StoreRun { start, len } => {
            let stores: Vec<(u32, u32)> = match site.kind {
                ClassKind::Plain => (0_u32..).zip(contents.iter().copied()).collect(),
                ClassKind::Styleable => body.instructions()[start..start + len]
                    .iter()
                    .filter_map(|instruction| match instruction {
                        Instruction::IndexedStore { index, .. } => {
                            Some((*index, contents[*index as usize]))
                        }
                        _ => None,
                    })
                    .collect(),
            };
            patcher::splice_store_run(body, start, len, site.array_register, &stores)?;
        }
    }

    Ok(())
}

fn patch_size(body: &mut MethodBody, site: &ArraySite, new_length: u32) -> Result<SizeEdit> {
    let readers =
        patcher::readers_of_definition(body, site.size_position, site.size_register);
    let shared = readers
        .iter()
        .any(|&reader| reader != site.allocation_position);

    if !shared {
        patcher::set_constant(body, site.size_position, i64::from(new_length))?;
        return Ok(SizeEdit::InPlace);
    }

    patcher::insert(
        body,
        site.allocation_position,
        Instruction::constant(site.size_register, i64::from(new_length)),
    )?;

    let read_after = readers
        .iter()
        .any(|&reader| reader > site.allocation_position);
    if read_after && site.array_register != site.size_register {
        patcher::insert(
            body,
            site.allocation_position + 2,
            Instruction::constant(site.size_register, i64::from(site.declared_length)),
        )?;
        return Ok(SizeEdit::InsertedWithRestore);
    }

    Ok(SizeEdit::Inserted)
}

fn verify(body: &MethodBody, site: &ArraySite, allocation: usize, contents: &[u32]) -> Result<()> {
    if contents.is_empty() {
        let (_, literal) = locator::find_size_definition(body, allocation, site.size_register)?;
        assert_eq!(literal, 0, "emptied array at {} kept a nonzero length", allocation);
        return Ok(());
    }

    let reread = locator::locate_site_at(body, allocation, site.kind)?;
    let Some(reread) = reread else {
        panic!("rewritten array at {} is no longer populated", allocation);
    };

    assert_eq!(
        reread.declared_length as usize,
        contents.len(),
        "declared length of array at {} does not match its contents",
        allocation
    );
    assert!(
        reread
            .elements
            .iter()
            .map(|id| id.value())
            .eq(contents.iter().copied()),
        "array at {} does not decode to its rewritten contents",
        allocation
    );

    if site.kind == ClassKind::Plain {
        let written = match reread.population {
            Population::BulkFill { payload_len, .. } => payload_len,
            Population::StoreRun { len, .. } => len,
        };
        assert_eq!(
            written,
            contents.len(),
            "array at {} declares {} elements but writes {}",
            allocation,
            contents.len(),
            written
        );
    }

    Ok(())
}
