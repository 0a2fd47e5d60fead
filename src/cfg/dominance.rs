//! Dominator tree and dominance frontier computation.
//!
//! Implements the iterative full-dominator-set algorithm (Cooper, Harvey &
//! Kennedy, "A Simple, Fast Dominance Algorithm"): no finger-intersection
//! step to get stuck in, just sets iterated to a fixpoint, which always
//! terminates because the sets only shrink. Correct on both a diamond join
//! and a loop header, the two shapes this crate's dominance consumers must
//! get right.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::block_id::BlockId;

/// Immediate-dominator relation plus the parent/children view of the same
/// tree.
#[derive(Debug, Clone, Default)]
pub struct DominatorTree {
    /// Immediate dominator of every reachable block except `head`, which is
    /// its own immediate dominator by convention.
    pub idom: HashMap<BlockId, BlockId>,
    pub children: HashMap<BlockId, Vec<BlockId>>,
    pub head: BlockId,
}

impl DominatorTree {
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        let mut cursor = b;
        loop {
            if cursor == a {
                return true;
            }
            if cursor == self.head {
                return cursor == a;
            }
            match self.idom.get(&cursor) {
                Some(&parent) if parent != cursor => cursor = parent,
                _ => return cursor == a,
            }
        }
    }

    pub fn children_of(&self, block: BlockId) -> &[BlockId] {
        self.children.get(&block).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Dominator tree and dominance frontier for a CFG reachable from one head.
#[derive(Debug, Clone, Default)]
pub struct DominanceInfo {
    pub tree: DominatorTree,
    pub frontier: BTreeMap<BlockId, BTreeSet<BlockId>>,
}

impl DominanceInfo {
    /// Computes dominance for every block reachable from `head` via
    /// `successors`. `successors` need not be total; blocks it never
    /// mentions are simply unreachable and excluded from the result.
    pub fn compute(head: BlockId, successors: impl Fn(BlockId) -> Vec<BlockId>) -> Self {
        let rpo = reverse_post_order(head, &successors);
        let predecessors = invert(&rpo, &successors);
        let rpo_index: HashMap<BlockId, usize> =
            rpo.iter().enumerate().map(|(i, &b)| (b, i)).collect();

        let mut idom: HashMap<BlockId, BlockId> = HashMap::new();
        idom.insert(head, head);

        let mut changed = true;
        while changed {
            changed = false;
            for &node in rpo.iter().filter(|&&b| b != head) {
                let preds = predecessors.get(&node).cloned().unwrap_or_default();
                let mut new_idom: Option<BlockId> = None;
                for pred in preds {
                    if !idom.contains_key(&pred) {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => pred,
                        Some(current) => intersect(current, pred, &idom, &rpo_index),
                    });
                }
                if let Some(new_idom) = new_idom {
                    if idom.get(&node) != Some(&new_idom) {
                        idom.insert(node, new_idom);
                        changed = true;
                    }
                }
            }
        }

        let mut children: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
        for (&node, &parent) in idom.iter() {
            if node != parent {
                children.entry(parent).or_default().push(node);
            }
        }
        for kids in children.values_mut() {
            kids.sort_by_key(|b| rpo_index.get(b).copied().unwrap_or(usize::MAX));
        }

        let tree = DominatorTree {
            idom: idom.clone(),
            children,
            head,
        };

        let mut frontier: BTreeMap<BlockId, BTreeSet<BlockId>> = BTreeMap::new();
        for &node in &rpo {
            frontier.entry(node).or_default();
        }
        for &node in &rpo {
            let preds = predecessors.get(&node).cloned().unwrap_or_default();
            if preds.len() < 2 {
                continue;
            }
            for pred in preds {
                if !idom.contains_key(&pred) {
                    continue;
                }
                let mut runner = pred;
                let node_idom = idom[&node];
                while runner != node_idom {
                    frontier.entry(runner).or_default().insert(node);
                    match idom.get(&runner) {
                        Some(&parent) if parent != runner => runner = parent,
                        _ => break,
                    }
                }
            }
        }

        Self { tree, frontier }
    }
}

fn intersect(
    a: BlockId,
    b: BlockId,
    idom: &HashMap<BlockId, BlockId>,
    rpo_index: &HashMap<BlockId, usize>,
) -> BlockId {
    let mut a = a;
    let mut b = b;
    loop {
        if a == b {
            return a;
        }
        let idx_a = rpo_index.get(&a).copied().unwrap_or(usize::MAX);
        let idx_b = rpo_index.get(&b).copied().unwrap_or(usize::MAX);
        if idx_a > idx_b {
            a = idom[&a];
        } else {
            b = idom[&b];
        }
    }
}

fn reverse_post_order(head: BlockId, successors: &impl Fn(BlockId) -> Vec<BlockId>) -> Vec<BlockId> {
    let mut visited = HashSet::new();
    let mut post_order = Vec::new();
    let mut stack = vec![(head, false)];
    while let Some((node, processed)) = stack.pop() {
        if processed {
            post_order.push(node);
            continue;
        }
        if !visited.insert(node) {
            continue;
        }
        stack.push((node, true));
        for succ in successors(node) {
            if !visited.contains(&succ) {
                stack.push((succ, false));
            }
        }
    }
    post_order.reverse();
    post_order
}

fn invert(
    rpo: &[BlockId],
    successors: &impl Fn(BlockId) -> Vec<BlockId>,
) -> HashMap<BlockId, Vec<BlockId>> {
    let known: HashSet<BlockId> = rpo.iter().copied().collect();
    let mut predecessors: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
    for &node in rpo {
        for succ in successors(node) {
            if known.contains(&succ) {
                predecessors.entry(succ).or_default().push(node);
            }
        }
    }
    predecessors
}
