use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::block_id::BlockId;
use super::dominance::DominanceInfo;
use super::ir::IrBlock;
use crate::error::{Error, Result};

/// What the SSA transform needs from a control-flow graph. `Cfg` implements
/// it directly; a caller with their own graph type implements it too and
/// reuses `ssa::SsaDriver` unchanged.
pub trait CfgService {
    fn clone_block(&self, label: BlockId) -> Option<IrBlock>;
    fn successors(&self, label: BlockId) -> Vec<BlockId>;
    fn predecessors(&self, label: BlockId) -> Vec<BlockId>;
    fn walk_depth_first_forward(&self, head: BlockId) -> Vec<BlockId>;
    fn compute_dominance(&self, head: BlockId) -> Result<DominanceInfo>;
}

/// A concrete, minimal control-flow graph of [`IrBlock`]s.
#[derive(Debug, Clone, Default)]
pub struct Cfg {
    blocks: HashMap<BlockId, IrBlock>,
    successors: HashMap<BlockId, Vec<BlockId>>,
    predecessors: HashMap<BlockId, Vec<BlockId>>,
}

impl Cfg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, block: IrBlock) {
        let id = block.id;
        let succs = block.terminator.successors();
        for &succ in &succs {
            self.predecessors.entry(succ).or_default().push(id);
        }
        self.successors.insert(id, succs);
        self.blocks.insert(id, block);
    }

    pub fn block(&self, id: BlockId) -> Option<&IrBlock> {
        self.blocks.get(&id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.keys().copied()
    }
}

impl CfgService for Cfg {
    fn clone_block(&self, label: BlockId) -> Option<IrBlock> {
        self.blocks.get(&label).cloned()
    }

    fn successors(&self, label: BlockId) -> Vec<BlockId> {
        self.successors.get(&label).cloned().unwrap_or_default()
    }

    fn predecessors(&self, label: BlockId) -> Vec<BlockId> {
        self.predecessors.get(&label).cloned().unwrap_or_default()
    }

    fn walk_depth_first_forward(&self, head: BlockId) -> Vec<BlockId> {
        if !self.contains(head) {
            return Vec::new();
        }
        let mut visited = BTreeSet::new();
        let mut order = Vec::new();
        let mut stack = vec![head];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            order.push(node);
            for succ in self.successors(node).into_iter().rev() {
                if !visited.contains(&succ) {
                    stack.push(succ);
                }
            }
        }
        order
    }

    fn compute_dominance(&self, head: BlockId) -> Result<DominanceInfo> {
        if !self.contains(head) {
            return Err(Error::InvalidInput(head));
        }
        Ok(DominanceInfo::compute(head, |b| self.successors(b)))
    }
}

/// Convenience re-export so callers that only need the frontier map don't
/// have to reach into `dominance`.
pub type DominanceFrontier = BTreeMap<BlockId, BTreeSet<BlockId>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::ir::AssignBlock;
    use crate::cfg::terminator::Terminator;

    fn block(id: usize, terminator: Terminator) -> IrBlock {
        IrBlock::new(BlockId(id), vec![AssignBlock::new()], terminator)
    }

    #[test]
    fn diamond_cfg_builds_correct_adjacency() {
        let mut cfg = Cfg::new();
        cfg.add_block(block(
            0,
            Terminator::Branch {
                if_true: BlockId(1),
                if_false: BlockId(2),
            },
        ));
        cfg.add_block(block(1, Terminator::Jump(BlockId(3))));
        cfg.add_block(block(2, Terminator::Jump(BlockId(3))));
        cfg.add_block(block(3, Terminator::Return));

        assert_eq!(cfg.predecessors(BlockId(3)).len(), 2);
        let order = cfg.walk_depth_first_forward(BlockId(0));
        assert_eq!(order[0], BlockId(0));
        assert!(order.contains(&BlockId(3)));
    }

    #[test]
    fn compute_dominance_rejects_unknown_head() {
        let cfg = Cfg::new();
        assert!(cfg.compute_dominance(BlockId(99)).is_err());
    }
}
