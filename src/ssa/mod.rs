//! Minimal SSA construction: block-local parallel-assignment renaming,
//! iterated-dominance-frontier phi placement, and a dominator-tree renaming
//! walk, plus the reverse (`reassemble`).

mod block_renamer;
mod driver;
mod expr_walker;
mod phi;
mod reassemble;
mod version_table;

pub use block_renamer::BlockRenamer;
pub use driver::{transform_block, transform_path, SsaBlock, SsaDriver};
pub use expr_walker::ExprWalker;
pub use phi::{PhiNode, PhiPlacer};
pub use reassemble::reassemble;
pub use version_table::VersionTable;
