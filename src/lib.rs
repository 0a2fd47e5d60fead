//! Minimal SSA construction over a parallel-assignment intermediate
//! representation.
//!
//! Converts an [`cfg::IrBlock`] graph into SSA form through three stages:
//! block-local parallel-assignment renaming ([`ssa::BlockRenamer`]),
//! iterated-dominance-frontier phi placement ([`ssa::PhiPlacer`], Cytron et
//! al. 1989), and a dominator-tree renaming walk that fills phi operands as
//! it goes ([`ssa::SsaDriver`]). [`ssa::reassemble`] undoes the transform
//! over a single expression.
//!
//! The CFG, expression algebra, and architecture descriptor this crate
//! builds against are themselves external collaborators: concrete
//! implementations ship in [`cfg`], [`expr`], and [`arch`] so the crate
//! builds and is testable standalone, but a caller embedding this in a real
//! disassembler is expected to implement [`cfg::CfgService`] and
//! [`arch::ArchDescriptor`] against its own types instead.
//!
//! ```
//! use ssa_core::arch::GenericArch;
//! use ssa_core::cfg::{AssignBlock, Assignment, BlockId, Cfg, IrBlock, Terminator};
//! use ssa_core::expr::{Expr, Variable};
//! use ssa_core::ssa::SsaDriver;
//!
//! let mut cfg = Cfg::new();
//! cfg.add_block(IrBlock::new(
//!     BlockId(0),
//!     vec![AssignBlock::from_assignments(vec![Assignment::new(
//!         Expr::ident(Variable::new("x", 32)),
//!         Expr::constant(1, 32),
//!     )])],
//!     Terminator::Return,
//! ));
//!
//! let arch = GenericArch::new(vec![Variable::new("pc", 32)], Variable::new("IRDst", 32));
//! let mut driver = SsaDriver::new(&cfg, &arch);
//! driver.transform(BlockId(0)).unwrap();
//! assert_eq!(driver.blocks().len(), 1);
//! ```

pub mod arch;
pub mod cfg;
pub mod config;
pub mod error;
pub mod expr;
pub mod ssa;

pub use error::{Error, Result};
