//! Comparison of a source inventory against a target inventory

use serde::Serialize;

use wplsync_fs::RelativePath;

use crate::inventory::Inventory;

/// The sync plan: every key of either inventory in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// In the target only (orphans), in target discovery order
    pub to_delete: Vec<RelativePath>,
    /// In the source only, in source discovery order
    pub to_create: Vec<RelativePath>,
    /// In both, but size or modification time differ
    pub to_update: Vec<RelativePath>,
    /// In both and shallow-equal
    pub unchanged: Vec<RelativePath>,
}

impl Reconciliation {
    /// True if applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Compute the sync plan for `source` onto `target`.
///
/// Orphans are collected first so that deletions can free space before
/// anything is copied.
pub fn reconcile(source: &Inventory, target: &Inventory) -> Reconciliation {
    let mut plan = Reconciliation::default();

    for key in target.file_list() {
        if !source.contains(key) {
            plan.to_delete.push(key.clone());
        }
    }

    for key in source.file_list() {
        let Some(source_entry) = source.get(key) else {
            continue;
        };
        match target.get(key) {
            None => plan.to_create.push(key.clone()),
            Some(target_entry) if source_entry.shallow_eq(target_entry) => {
                plan.unchanged.push(key.clone())
            }
            Some(_) => plan.to_update.push(key.clone()),
        }
    }

    plan
}
