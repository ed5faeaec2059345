// SPDX-License-Identifier: MIT
//! Reconciliation of diagnostics against the current review diff.

use std::collections::{HashMap, HashSet};

/// A file renamed within the review diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    pub before: String,
    pub after: String,
}

/// The version-control collaborator: the four changed-file lists of the
/// current review unit, as paths relative to the repository root.
pub trait DiffSource {
    fn renamed_files(&self) -> Vec<RenamedFile>;
    fn modified_files(&self) -> Vec<String>;
    fn deleted_files(&self) -> Vec<String>;
    fn added_files(&self) -> Vec<String>;
}

/// Compute the set of paths considered part of the diff.
///
/// Modified paths are chased through the rename map first (a file modified
/// and then renamed is reported under its new name), deleted paths are
/// dropped, and added paths are unioned in. Recomputed per scan — the
/// repository state can change between calls.
pub fn files_in_diff(diff: &dyn DiffSource) -> HashSet<String> {
    let renames: HashMap<String, String> = diff
        .renamed_files()
        .into_iter()
        .map(|rename| (rename.before, rename.after))
        .collect();
    let deleted: HashSet<String> = diff.deleted_files().into_iter().collect();

    let mut files: HashSet<String> = diff
        .modified_files()
        .into_iter()
        .map(|modified| renames.get(&modified).cloned().unwrap_or(modified))
        .filter(|path| !deleted.contains(path))
        .collect();
    files.extend(diff.added_files());
    files
}
