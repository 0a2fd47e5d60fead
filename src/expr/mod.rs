//! The expression algebra external collaborator.
//!
//! This crate ships a concrete, minimal `Expr` so it builds and is testable
//! standalone; a caller embedding the SSA core in a real disassembler is
//! expected to adapt their own expression type to the shapes the `ssa`
//! module needs, or to reuse this one directly.

mod expr;
mod variable;

pub use expr::Expr;
pub use variable::{Ident, SsaName, Variable};
