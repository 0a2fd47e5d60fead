use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::cfg::{BlockId, DominanceFrontier};
use crate::expr::{Expr, SsaName, Variable};

/// A phi node for one variable at one block. `target` is filled in by the
/// renaming walk once it actually visits this block (it needs a fresh
/// version, and versions are only meaningful in dominator-tree order);
/// `operands` are filled in as each predecessor is renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiNode {
    pub var: Variable,
    pub target: Option<SsaName>,
    pub operands: BTreeMap<BlockId, Expr>,
}

impl PhiNode {
    fn empty(var: Variable) -> Self {
        Self {
            var,
            target: None,
            operands: BTreeMap::new(),
        }
    }

    /// The phi as an expression: an empty placeholder before renaming, or
    /// `Operator(symbol, operands-in-block-id-order)` once operands have
    /// been filled in.
    pub fn as_expr(&self, symbol: &str) -> Expr {
        Expr::operator(symbol, self.operands.values().cloned().collect())
    }
}

/// Computes the minimal (not liveness-pruned) set of blocks needing a phi
/// node per variable, via the iterated dominance frontier (Cytron, Ferrante,
/// Rosen, Wegman & Zadeck, 1989): a todo/in-todo/done worklist walks
/// outward from each variable's definition sites through the dominance
/// frontier until no new phi placements are produced.
pub struct PhiPlacer;

impl PhiPlacer {
    pub fn place(
        defs: &BTreeMap<Variable, BTreeSet<BlockId>>,
        frontier: &DominanceFrontier,
    ) -> BTreeMap<BlockId, BTreeMap<Variable, PhiNode>> {
        let mut placed: BTreeMap<BlockId, BTreeMap<Variable, PhiNode>> = BTreeMap::new();

        for (var, def_sites) in defs {
            let mut has_phi: BTreeSet<BlockId> = BTreeSet::new();
            let mut in_todo: BTreeSet<BlockId> = def_sites.iter().copied().collect();
            let mut todo: VecDeque<BlockId> = def_sites.iter().copied().collect();

            while let Some(block) = todo.pop_front() {
                in_todo.remove(&block);
                let Some(df) = frontier.get(&block) else {
                    continue;
                };
                for &frontier_block in df {
                    if has_phi.contains(&frontier_block) {
                        continue;
                    }
                    has_phi.insert(frontier_block);
                    placed
                        .entry(frontier_block)
                        .or_default()
                        .insert(var.clone(), PhiNode::empty(var.clone()));

                    if !def_sites.contains(&frontier_block) && !in_todo.contains(&frontier_block) {
                        in_todo.insert(frontier_block);
                        todo.push_back(frontier_block);
                    }
                }
            }
        }

        placed
    }
}
