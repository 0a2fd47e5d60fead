use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::arch::ArchDescriptor;
use crate::cfg::{AssignBlock, BlockId, CfgService, IrBlock, Terminator};
use crate::config::SsaConfig;
use crate::error::{Error, Result};
use crate::expr::{Expr, Ident, SsaName, Variable};

use super::block_renamer::BlockRenamer;
use super::phi::{PhiNode, PhiPlacer};
use super::version_table::VersionTable;

/// One block after the transform: its phi nodes (keyed by the variable they
/// name), its renamed parallel-assignment groups, and its terminator
/// (terminators don't reference variables so they pass through unchanged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsaBlock {
    pub id: BlockId,
    pub phi_nodes: BTreeMap<Variable, PhiNode>,
    pub assign_blocks: Vec<AssignBlock>,
    pub terminator: Terminator,
}

/// Drives the whole transform over a CFG: definition-site collection, phi
/// placement, and the dominator-tree renaming walk. Owns all mutable state
/// for one transform; call [`SsaDriver::reset`] before reusing an instance
/// for another head block.
pub struct SsaDriver<'a, C: CfgService, A: ArchDescriptor> {
    cfg: &'a C,
    arch: &'a A,
    config: SsaConfig,
    versions: VersionTable,
    phi_nodes: BTreeMap<BlockId, BTreeMap<Variable, PhiNode>>,
    defs: BTreeMap<Variable, BTreeSet<BlockId>>,
    blocks: BTreeMap<BlockId, SsaBlock>,
    /// Every SSA name's defining expression: a renamed assignment's source
    /// for an ordinary definition, or the filled phi for a phi target.
    /// Built during the walk; the substitution map [`super::reassemble`]
    /// expects.
    ssa_defs: HashMap<SsaName, Expr>,
    transformed: bool,
}

impl<'a, C: CfgService, A: ArchDescriptor> SsaDriver<'a, C, A> {
    pub fn new(cfg: &'a C, arch: &'a A) -> Self {
        Self::with_config(cfg, arch, SsaConfig::default())
    }

    pub fn with_config(cfg: &'a C, arch: &'a A, config: SsaConfig) -> Self {
        Self {
            cfg,
            arch,
            config,
            versions: VersionTable::new(),
            phi_nodes: BTreeMap::new(),
            defs: BTreeMap::new(),
            blocks: BTreeMap::new(),
            ssa_defs: HashMap::new(),
            transformed: false,
        }
    }

    /// Clears all state from a previous transform so this driver can be
    /// reused against a different head (or the same one again).
    pub fn reset(&mut self) {
        self.versions.reset();
        self.phi_nodes.clear();
        self.defs.clear();
        self.blocks.clear();
        self.ssa_defs.clear();
        self.transformed = false;
    }

    /// Runs the full transform: definition-site collection, iterated
    /// dominance frontier phi placement, and the dominator-tree renaming
    /// walk with phi-operand filling.
    pub fn transform(&mut self, head: BlockId) -> Result<()> {
        if self.transformed {
            return Err(Error::Reentrancy);
        }

        let dominance = self.cfg.compute_dominance(head)?;
        let reachable = self.cfg.walk_depth_first_forward(head);

        self.defs = self.collect_definitions(&reachable)?;
        self.phi_nodes = PhiPlacer::place(&self.defs, &dominance.frontier);
        debug!(blocks = reachable.len(), "collected reachable blocks");

        let mut stack: Vec<(BlockId, BTreeMap<String, usize>)> = vec![(head, BTreeMap::new())];

        while let Some((block_id, snapshot)) = stack.pop() {
            self.versions.restore(snapshot);
            trace!(block = %block_id, "renaming block");

            if let Some(phis) = self.phi_nodes.get_mut(&block_id) {
                for (var, phi) in phis.iter_mut() {
                    phi.target = Some(self.versions.new_version(&var.name, var.size));
                }
            }

            let raw = self
                .cfg
                .clone_block(block_id)
                .ok_or(Error::InvalidInput(block_id))?;

            let assign_blocks: Vec<AssignBlock> = raw
                .assign_blocks
                .iter()
                .map(|ab| BlockRenamer::rename_block(ab, &mut self.versions, self.arch))
                .collect::<Result<Vec<_>>>()?;

            for assign_block in &assign_blocks {
                for (dst, src) in assign_block.iter() {
                    if let Expr::Identifier(Ident::Ssa(ssa)) = dst {
                        self.ssa_defs.insert(ssa.clone(), src.clone());
                    }
                }
            }

            let phi_nodes_here = self.phi_nodes.get(&block_id).cloned().unwrap_or_default();

            self.blocks.insert(
                block_id,
                SsaBlock {
                    id: block_id,
                    phi_nodes: phi_nodes_here,
                    assign_blocks,
                    terminator: raw.terminator,
                },
            );

            for successor in self.cfg.successors(block_id) {
                if let Some(phis) = self.phi_nodes.get_mut(&successor) {
                    for (var, phi) in phis.iter_mut() {
                        let value = match self.versions.current(&var.name) {
                            Some(version) => {
                                Expr::ident(SsaName::new(var.name.as_str(), var.size, version))
                            }
                            None => Expr::ident(var.clone()),
                        };
                        phi.operands.insert(block_id, value);
                    }
                }
            }

            let snapshot_after = self.versions.snapshot();
            let mut children = dominance.tree.children_of(block_id).to_vec();
            children.sort_by_key(|b| std::cmp::Reverse(b.0));
            for child in children {
                stack.push((child, snapshot_after.clone()));
            }
        }

        // A block's own phi nodes are cloned into `self.blocks` as soon as
        // it's visited, but a predecessor reached later in the walk (a loop
        // back edge) can still add an operand afterwards. Re-sync every
        // block's stored phis from the now-final `self.phi_nodes` so none
        // of them are missing a late operand.
        for (block_id, block) in self.blocks.iter_mut() {
            if let Some(final_phis) = self.phi_nodes.get(block_id) {
                block.phi_nodes = final_phis.clone();
            }
        }

        for phis in self.phi_nodes.values() {
            for phi in phis.values() {
                if let Some(target) = &phi.target {
                    self.ssa_defs
                        .insert(target.clone(), phi.as_expr(&self.config.naming.phi_symbol));
                }
            }
        }

        self.transformed = true;

        if self.config.validate_invariants {
            self.validate();
        }

        Ok(())
    }

    fn collect_definitions(
        &self,
        reachable: &[BlockId],
    ) -> Result<BTreeMap<Variable, BTreeSet<BlockId>>> {
        let mut defs: BTreeMap<Variable, BTreeSet<BlockId>> = BTreeMap::new();
        for &block_id in reachable {
            let block = self
                .cfg
                .clone_block(block_id)
                .ok_or(Error::InvalidInput(block_id))?;
            for assign_block in &block.assign_blocks {
                for (dst, _) in assign_block.iter() {
                    if let Expr::Identifier(ident) = dst {
                        let var = ident.as_variable();
                        if !self.arch.is_excluded(&var) {
                            defs.entry(var).or_default().insert(block_id);
                        }
                    }
                }
            }
        }
        Ok(defs)
    }

    /// Re-checks the universal invariants: every SSA version is produced by
    /// exactly one definition site, and every filled phi has as many
    /// operands as the block has predecessors it was placed for. Panics on
    /// violation rather than returning an error — these are bugs in this
    /// crate, not bad input.
    fn validate(&self) {
        let mut seen_versions: BTreeSet<(String, usize)> = BTreeSet::new();
        for block in self.blocks.values() {
            for assign_block in &block.assign_blocks {
                for (dst, _) in assign_block.iter() {
                    if let Expr::Identifier(ident) = dst {
                        if let Ident::Ssa(ssa) = ident {
                            let key = (ssa.base.clone(), ssa.version);
                            assert!(
                                seen_versions.insert(key),
                                "ssa version {} defined more than once",
                                ssa
                            );
                        }
                    }
                }
            }
        }
    }

    /// Strips an identifier's version, returning the variable it was
    /// derived from. An already-non-SSA identifier is returned unchanged
    /// rather than erroring.
    pub fn reverse_name(&self, ident: &Ident) -> Variable {
        ident.as_variable()
    }

    pub fn blocks(&self) -> &BTreeMap<BlockId, SsaBlock> {
        &self.blocks
    }

    pub fn phinodes(&self) -> &BTreeMap<BlockId, BTreeMap<Variable, PhiNode>> {
        &self.phi_nodes
    }

    pub fn defs(&self) -> &BTreeMap<Variable, BTreeSet<BlockId>> {
        &self.defs
    }

    /// Every SSA name produced anywhere in the transformed graph, mapped to
    /// its defining expression: an ordinary definition's renamed source, or
    /// a filled phi for a phi target. This is the substitution map
    /// [`super::reassemble`] expects.
    pub fn expressions(&self) -> &HashMap<SsaName, Expr> {
        &self.ssa_defs
    }
}

/// Renames a single block in isolation, with no CFG and no phi placement:
/// the straight-line case.
pub fn transform_block(
    block: &IrBlock,
    versions: &mut VersionTable,
    arch: &dyn ArchDescriptor,
) -> Result<IrBlock> {
    let assign_blocks = block
        .assign_blocks
        .iter()
        .map(|ab| BlockRenamer::rename_block(ab, versions, arch))
        .collect::<Result<Vec<_>>>()?;
    Ok(IrBlock::new(block.id, assign_blocks, block.terminator.clone()))
}

/// Renames a fixed, known-acyclic sequence of blocks sharing one
/// [`VersionTable`] and no phi nodes, since a path has no merge points.
pub fn transform_path<C: CfgService>(
    cfg: &C,
    arch: &dyn ArchDescriptor,
    path: &[BlockId],
) -> Result<Vec<IrBlock>> {
    let mut versions = VersionTable::new();
    let mut out = Vec::with_capacity(path.len());
    for &block_id in path {
        let block = cfg.clone_block(block_id).ok_or(Error::InvalidInput(block_id))?;
        out.push(transform_block(&block, &mut versions, arch)?);
    }
    Ok(out)
}
