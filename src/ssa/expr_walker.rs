use std::collections::BTreeSet;

use crate::expr::{Expr, Ident, Variable};

/// Pure, structural operations over [`Expr`] trees that the rest of `ssa`
/// builds on: collecting identifier leaves and rebuilding a tree with its
/// leaves substituted. Neither function interprets operator symbols — they
/// only walk shape via plain recursive descent.
pub struct ExprWalker;

impl ExprWalker {
    /// Every distinct [`Variable`] named by an identifier leaf in `expr`,
    /// including ones reachable only through a memory address.
    pub fn free_variables(expr: &Expr) -> BTreeSet<Variable> {
        let mut found = BTreeSet::new();
        Self::collect(expr, &mut found);
        found
    }

    fn collect(expr: &Expr, found: &mut BTreeSet<Variable>) {
        match expr {
            Expr::Identifier(ident) => {
                found.insert(ident.as_variable());
            }
            Expr::Constant { .. } => {}
            Expr::Memory { address, .. } => Self::collect(address, found),
            Expr::Operator { operands, .. } => {
                for operand in operands {
                    Self::collect(operand, found);
                }
            }
        }
    }

    /// Rebuilds `expr` with every identifier leaf passed through `replace`.
    /// `replace` returning the leaf unchanged (e.g. a live-in variable with
    /// no current version) is how callers express "leave this alone".
    pub fn replace_leaves(expr: &Expr, replace: &mut dyn FnMut(&Ident) -> Expr) -> Expr {
        match expr {
            Expr::Identifier(ident) => replace(ident),
            Expr::Constant { .. } => expr.clone(),
            Expr::Memory { address, size } => {
                Expr::memory(Self::replace_leaves(address, replace), *size)
            }
            Expr::Operator { symbol, operands } => Expr::operator(
                symbol.clone(),
                operands
                    .iter()
                    .map(|operand| Self::replace_leaves(operand, replace))
                    .collect(),
            ),
        }
    }
}
