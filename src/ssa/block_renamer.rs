use std::collections::VecDeque;

use crate::arch::ArchDescriptor;
use crate::cfg::AssignBlock;
use crate::error::{Error, Result};
use crate::expr::{Expr, Ident, SsaName};

use super::expr_walker::ExprWalker;
use super::version_table::VersionTable;

/// Renames one [`AssignBlock`]'s parallel assignments in place, against a
/// [`VersionTable`] that already reflects everything live before this block.
///
/// Two-phase RHS-then-LHS protocol: every right-hand side, and every memory
/// destination's address, is substituted against the *old* versions before
/// any left-hand side gets a new one — otherwise `a, b = b, a` style swaps
/// inside one parallel block would observe each other's new values.
pub struct BlockRenamer;

impl BlockRenamer {
    pub fn rename_block(
        block: &AssignBlock,
        versions: &mut VersionTable,
        arch: &dyn ArchDescriptor,
    ) -> Result<AssignBlock> {
        let mut pending_memory: VecDeque<(Expr, Expr)> = VecDeque::new();
        let mut pending_identifier: VecDeque<(Ident, Expr)> = VecDeque::new();

        for (dst, src) in block.iter() {
            let transformed_src = Self::substitute(src, versions, arch);
            match dst {
                Expr::Memory { address, size } => {
                    let transformed_addr = Self::substitute(address, versions, arch);
                    pending_memory.push_back((Expr::memory(transformed_addr, *size), transformed_src));
                }
                Expr::Identifier(ident) => {
                    pending_identifier.push_back((ident.clone(), transformed_src));
                }
                other => return Err(Error::UnsupportedDestination(other.clone())),
            }
        }

        let mut renamed = AssignBlock::new();

        // Memory destinations are emitted first: they never consume a new
        // version, so ordering them ahead of identifier destinations keeps
        // the output deterministic without affecting semantics, matching
        // the read-before-write contract of the source protocol.
        for (dst, src) in pending_memory {
            renamed.insert(dst, src);
        }

        for (ident, src) in pending_identifier {
            let var = ident.as_variable();
            let new_dst = if arch.is_excluded(&var) {
                Expr::Identifier(ident)
            } else {
                let ssa_name = versions.new_version(&var.name, var.size);
                Expr::ident(ssa_name)
            };
            renamed.insert(new_dst, src);
        }

        Ok(renamed)
    }

    /// Substitutes every identifier leaf with its current SSA version, or
    /// leaves it unchanged if it's architecturally excluded (program
    /// counter, `IRDst`) or has never been defined on this path (a live-in
    /// read, passed through verbatim per the source semantics).
    fn substitute(expr: &Expr, versions: &VersionTable, arch: &dyn ArchDescriptor) -> Expr {
        ExprWalker::replace_leaves(expr, &mut |ident| {
            let var = ident.as_variable();
            if ident.is_ssa() || arch.is_excluded(&var) {
                return Expr::Identifier(ident.clone());
            }
            match versions.current(&var.name) {
                Some(version) => Expr::ident(SsaName::new(var.name, var.size, version)),
                None => Expr::Identifier(ident.clone()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::GenericArch;
    use crate::expr::Variable;

    fn arch() -> GenericArch {
        GenericArch::new(vec![Variable::new("pc", 32)], Variable::new("IRDst", 32))
    }

    #[test]
    fn swap_within_one_block_reads_pre_block_values() {
        let mut block = AssignBlock::new();
        block.insert(
            Expr::ident(Variable::new("a", 32)),
            Expr::ident(Variable::new("b", 32)),
        );
        block.insert(
            Expr::ident(Variable::new("b", 32)),
            Expr::ident(Variable::new("a", 32)),
        );

        let mut versions = VersionTable::new();
        versions.new_version("a", 32);
        versions.new_version("b", 32);

        let renamed = BlockRenamer::rename_block(&block, &mut versions, &arch())
            .expect("rename succeeds");
        let entries: Vec<_> = renamed.iter().collect();
        assert_eq!(entries.len(), 2);

        // `a`'s new source is `b`'s pre-block version (0), and vice versa —
        // neither reads the version its sibling assignment just produced.
        let a_entry = entries
            .iter()
            .find(|(dst, _)| matches!(dst, Expr::Identifier(Ident::Ssa(ssa)) if ssa.base == "a"))
            .expect("a was renamed");
        let b_entry = entries
            .iter()
            .find(|(dst, _)| matches!(dst, Expr::Identifier(Ident::Ssa(ssa)) if ssa.base == "b"))
            .expect("b was renamed");

        match a_entry.1 {
            Expr::Identifier(Ident::Ssa(ssa)) => {
                assert_eq!(ssa.base, "b");
                assert_eq!(ssa.version, 0);
            }
            other => panic!("expected a versioned b, got {:?}", other),
        }
        match b_entry.1 {
            Expr::Identifier(Ident::Ssa(ssa)) => {
                assert_eq!(ssa.base, "a");
                assert_eq!(ssa.version, 0);
            }
            other => panic!("expected a versioned a, got {:?}", other),
        }
    }

    #[test]
    fn excluded_variable_is_never_versioned() {
        let mut block = AssignBlock::new();
        block.insert(
            Expr::ident(Variable::new("IRDst", 32)),
            Expr::constant(42, 32),
        );
        let mut versions = VersionTable::new();
        let renamed = BlockRenamer::rename_block(&block, &mut versions, &arch())
            .expect("rename succeeds");
        let (dst, _) = renamed.iter().next().unwrap();
        match dst {
            Expr::Identifier(ident) => assert!(!ident.is_ssa()),
            _ => panic!("expected identifier destination"),
        }
    }

    #[test]
    fn live_in_read_is_unchanged() {
        let mut block = AssignBlock::new();
        block.insert(
            Expr::ident(Variable::new("out", 32)),
            Expr::ident(Variable::new("never_defined", 32)),
        );
        let mut versions = VersionTable::new();
        let renamed = BlockRenamer::rename_block(&block, &mut versions, &arch())
            .expect("rename succeeds");
        let (_, src) = renamed.iter().next().unwrap();
        assert_eq!(src, &Expr::ident(Variable::new("never_defined", 32)));
    }

    #[test]
    fn unsupported_destination_shape_is_reported() {
        let mut block = AssignBlock::new();
        block.insert(Expr::constant(0, 32), Expr::constant(1, 32));
        let mut versions = VersionTable::new();
        let err = BlockRenamer::rename_block(&block, &mut versions, &arch()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDestination(_)));
    }

    #[test]
    fn memory_store_address_uses_pre_block_version_and_later_load_sees_new_one() {
        let mut versions = VersionTable::new();

        // Block 1: store `v` to `[a]`, then redefine `a` in the same
        // parallel group — the store's address must still resolve against
        // the version of `a` live before this block, not the new one its
        // sibling assignment produces.
        let mut store_block = AssignBlock::new();
        store_block.insert(
            Expr::memory(Expr::ident(Variable::new("a", 32)), 32),
            Expr::ident(Variable::new("v", 32)),
        );
        store_block.insert(Expr::ident(Variable::new("a", 32)), Expr::constant(99, 32));

        let renamed_store = BlockRenamer::rename_block(&store_block, &mut versions, &arch())
            .expect("store block renames");
        let (store_dst, _) = renamed_store
            .iter()
            .find(|(dst, _)| matches!(dst, Expr::Memory { .. }))
            .expect("memory destination present");
        match store_dst {
            Expr::Memory { address, .. } => {
                assert_eq!(**address, Expr::ident(Variable::new("a", 32)));
            }
            _ => unreachable!(),
        }

        // Block 2 (sequential, sharing `versions`): loading `[a]` now
        // resolves the address against the version of `a` block 1 produced —
        // memory itself is never versioned, only the address expression is.
        let mut load_block = AssignBlock::new();
        load_block.insert(
            Expr::ident(Variable::new("out", 32)),
            Expr::memory(Expr::ident(Variable::new("a", 32)), 32),
        );
        let renamed_load = BlockRenamer::rename_block(&load_block, &mut versions, &arch())
            .expect("load block renames");
        let (_, load_src) = renamed_load.iter().next().unwrap();
        match load_src {
            Expr::Memory { address, .. } => match address.as_ref() {
                Expr::Identifier(Ident::Ssa(ssa)) => {
                    assert_eq!(ssa.base, "a");
                    assert_eq!(ssa.version, 0);
                }
                other => panic!("expected a's new version in the load address, got {:?}", other),
            },
            _ => panic!("expected a memory load"),
        }
    }
}
