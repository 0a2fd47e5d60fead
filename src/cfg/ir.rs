use indexmap::IndexMap;

use super::block_id::BlockId;
use super::terminator::Terminator;
use crate::expr::Expr;

/// A single destination/source pair within an [`AssignBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub dst: Expr,
    pub src: Expr,
}

impl Assignment {
    pub fn new(dst: Expr, src: Expr) -> Self {
        Self { dst, src }
    }
}

/// A set of assignments that execute with parallel-assignment semantics:
/// every right-hand side is evaluated against the state *before* the block
/// ran, then all left-hand sides are updated at once. Insertion order is
/// preserved (backed by `IndexMap`) since it is the order diagnostics and
/// tests observe assignments in, even though the semantics themselves are
/// order-independent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignBlock {
    assigns: IndexMap<Expr, Expr>,
}

impl AssignBlock {
    pub fn new() -> Self {
        Self {
            assigns: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, dst: Expr, src: Expr) {
        self.assigns.insert(dst, src);
    }

    pub fn from_assignments(assignments: impl IntoIterator<Item = Assignment>) -> Self {
        let mut block = Self::new();
        for assignment in assignments {
            block.insert(assignment.dst, assignment.src);
        }
        block
    }

    pub fn len(&self) -> usize {
        self.assigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &Expr)> {
        self.assigns.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Expr, &mut Expr)> {
        self.assigns.iter_mut()
    }

    /// Replaces the block's contents with `assigns`, preserving the order
    /// they're given in.
    pub fn set_assigns(&mut self, assigns: IndexMap<Expr, Expr>) {
        self.assigns = assigns;
    }

    pub fn assigns(&self) -> &IndexMap<Expr, Expr> {
        &self.assigns
    }
}

impl FromIterator<(Expr, Expr)> for AssignBlock {
    fn from_iter<T: IntoIterator<Item = (Expr, Expr)>>(iter: T) -> Self {
        Self {
            assigns: IndexMap::from_iter(iter),
        }
    }
}

/// A basic block in the IR: an ordered sequence of parallel-assignment
/// groups followed by a terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrBlock {
    pub id: BlockId,
    pub assign_blocks: Vec<AssignBlock>,
    pub terminator: Terminator,
}

impl IrBlock {
    pub fn new(id: BlockId, assign_blocks: Vec<AssignBlock>, terminator: Terminator) -> Self {
        Self {
            id,
            assign_blocks,
            terminator,
        }
    }
}
