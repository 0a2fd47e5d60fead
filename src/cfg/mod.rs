//! The IR-CFG external collaborator.
//!
//! Ships a concrete, minimal `Cfg` over `IrBlock`s of parallel-assignment
//! `AssignBlock`s, plus dominance analysis, so the crate builds and is
//! testable standalone; a caller with its own CFG representation implements
//! [`CfgService`] against it instead.

mod block_id;
mod dominance;
mod graph;
mod ir;
mod terminator;

pub use block_id::BlockId;
pub use dominance::{DominanceInfo, DominatorTree};
pub use graph::{Cfg, CfgService, DominanceFrontier};
pub use ir::{Assignment, AssignBlock, IrBlock};
pub use terminator::Terminator;
