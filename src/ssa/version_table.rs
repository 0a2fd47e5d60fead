use std::collections::BTreeMap;

use crate::expr::SsaName;

/// Tracks, for each base variable name, the version currently "live" at the
/// point the renaming walk has reached, plus a monotonic counter so every
/// version number handed out across the whole transform is unique.
///
/// The renaming walk (`ssa::driver`) snapshots this table before descending
/// into each dominator-tree child and restores a snapshot before processing
/// a block, so a version defined on one branch of a diamond never leaks
/// into a sibling branch.
#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    counters: BTreeMap<String, usize>,
    current: BTreeMap<String, usize>,
}

impl VersionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The version currently live for `base`, or `None` if it has never
    /// been defined on the path reaching this point (a live-in read).
    pub fn current(&self, base: &str) -> Option<usize> {
        self.current.get(base).copied()
    }

    /// Allocates a fresh version for `base`, makes it the current one, and
    /// returns the `SsaName` naming it.
    pub fn new_version(&mut self, base: &str, size: u32) -> SsaName {
        let next = self.counters.entry(base.to_string()).or_insert(0);
        let version = *next;
        *next += 1;
        self.current.insert(base.to_string(), version);
        SsaName::new(base, size, version)
    }

    /// Snapshot of every variable's current version, to be pushed onto the
    /// renaming walk's work stack alongside a dominator-tree child.
    pub fn snapshot(&self) -> BTreeMap<String, usize> {
        self.current.clone()
    }

    /// Restores a previously taken snapshot, discarding whatever the
    /// sibling branch that ran before this one left behind.
    pub fn restore(&mut self, snapshot: BTreeMap<String, usize>) {
        self.current = snapshot;
    }

    pub fn reset(&mut self) {
        self.counters.clear();
        self.current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_monotonic_and_unique() {
        let mut table = VersionTable::new();
        let a = table.new_version("x", 32);
        let b = table.new_version("x", 32);
        assert_eq!(a.version, 0);
        assert_eq!(b.version, 1);
        assert_eq!(table.current("x"), Some(1));
    }

    #[test]
    fn snapshot_restore_isolates_sibling_branches() {
        let mut table = VersionTable::new();
        table.new_version("x", 32);
        let snapshot = table.snapshot();
        table.new_version("x", 32);
        assert_eq!(table.current("x"), Some(1));
        table.restore(snapshot);
        assert_eq!(table.current("x"), Some(0));
    }

    #[test]
    fn unset_variable_has_no_current_version() {
        let table = VersionTable::new();
        assert_eq!(table.current("never_defined"), None);
    }
}
