//! The architecture descriptor external collaborator.
//!
//! Consulted by `ssa::block_renamer` and `ssa::driver` to exclude the
//! program counter and `IRDst` from SSA variable harvesting. Architectural
//! registers themselves ARE renamed like any other variable; only the
//! program counter identifier(s) and the IR's own destination sentinel are
//! excluded.

use std::collections::BTreeSet;

use crate::expr::Variable;

/// Describes the subset of an architecture's identifiers that the SSA
/// transform must treat specially.
pub trait ArchDescriptor {
    /// `true` if `var` is one of the architecture's program-counter
    /// identifiers (some architectures expose more than one, e.g. a
    /// pipelined PC and a "next PC").
    fn is_program_counter(&self, var: &Variable) -> bool;

    /// The synthetic IR destination variable excluded from renaming
    /// alongside the program counter.
    fn ir_dst(&self) -> Variable;

    /// `true` if `var` should be excluded from SSA renaming: the program
    /// counter or `IRDst`. Not an architecture-specific notion of "is this a
    /// real register" — every real register is renamed normally.
    fn is_excluded(&self, var: &Variable) -> bool {
        self.is_program_counter(var) || *var == self.ir_dst()
    }
}

/// A configurable [`ArchDescriptor`] for architectures without a dedicated
/// descriptor type: a caller lists its program-counter names and its
/// `IRDst` variable directly.
#[derive(Debug, Clone)]
pub struct GenericArch {
    program_counters: BTreeSet<Variable>,
    ir_dst: Variable,
}

impl GenericArch {
    pub fn new(program_counters: impl IntoIterator<Item = Variable>, ir_dst: Variable) -> Self {
        Self {
            program_counters: program_counters.into_iter().collect(),
            ir_dst,
        }
    }
}

impl ArchDescriptor for GenericArch {
    fn is_program_counter(&self, var: &Variable) -> bool {
        self.program_counters.contains(var)
    }

    fn ir_dst(&self) -> Variable {
        self.ir_dst.clone()
    }
}
