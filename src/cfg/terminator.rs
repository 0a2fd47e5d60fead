use super::block_id::BlockId;

/// How control leaves a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    Fallthrough(BlockId),
    Jump(BlockId),
    Branch { if_true: BlockId, if_false: BlockId },
    Return,
    Throw,
    Abort,
    /// Enters a try region; control flows to `body` and, on exception, to
    /// `handler`.
    TryEntry { body: BlockId, handler: BlockId },
    EndTry(BlockId),
    /// Terminator could not be classified; treated as having no successors.
    Unknown,
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Fallthrough(target) | Terminator::Jump(target) => vec![*target],
            Terminator::Branch { if_true, if_false } => vec![*if_true, *if_false],
            Terminator::Return | Terminator::Throw | Terminator::Abort | Terminator::Unknown => {
                Vec::new()
            }
            Terminator::TryEntry { body, handler } => vec![*body, *handler],
            Terminator::EndTry(target) => vec![*target],
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Terminator::Branch { .. } | Terminator::TryEntry { .. })
    }
}
