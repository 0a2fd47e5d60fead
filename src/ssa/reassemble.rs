use std::collections::{HashMap, HashSet};

use crate::expr::{Expr, Ident, SsaName};

/// Undoes the SSA transform over a single expression: substitutes every
/// `SsaName` leaf with its defining right-hand side, repeatedly, until only
/// non-SSA leaves remain or a name already being expanded is hit again (a
/// phi-induced cycle).
///
/// A worklist-style substitution that tracks names currently being expanded
/// (rather than ever expanded) so sharing the same sub-expression in two
/// places doesn't falsely look like a cycle, while an actual loop through a
/// phi still terminates.
pub fn reassemble(expr: &Expr, defs_by_ssa: &HashMap<SsaName, Expr>) -> Expr {
    let mut expanding = HashSet::new();
    reassemble_inner(expr, defs_by_ssa, &mut expanding)
}

fn reassemble_inner(
    expr: &Expr,
    defs_by_ssa: &HashMap<SsaName, Expr>,
    expanding: &mut HashSet<SsaName>,
) -> Expr {
    match expr {
        Expr::Identifier(Ident::Ssa(ssa)) => {
            if expanding.contains(ssa) {
                return expr.clone();
            }
            match defs_by_ssa.get(ssa) {
                Some(def) => {
                    expanding.insert(ssa.clone());
                    let result = reassemble_inner(def, defs_by_ssa, expanding);
                    expanding.remove(ssa);
                    result
                }
                None => expr.clone(),
            }
        }
        Expr::Identifier(Ident::Var(_)) | Expr::Constant { .. } => expr.clone(),
        Expr::Memory { address, size } => {
            Expr::memory(reassemble_inner(address, defs_by_ssa, expanding), *size)
        }
        Expr::Operator { symbol, operands } => Expr::operator(
            symbol.clone(),
            operands
                .iter()
                .map(|operand| reassemble_inner(operand, defs_by_ssa, expanding))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Variable;

    #[test]
    fn substitutes_chained_definitions() {
        let mut defs = HashMap::new();
        let a1 = SsaName::new("a", 32, 1);
        let a0 = SsaName::new("a", 32, 0);
        defs.insert(
            a1.clone(),
            Expr::operator("+", vec![Expr::ident(a0.clone()), Expr::constant(1, 32)]),
        );
        defs.insert(a0, Expr::ident(Variable::new("a", 32)));

        let reassembled = reassemble(&Expr::ident(a1), &defs);
        assert_eq!(
            reassembled,
            Expr::operator(
                "+",
                vec![Expr::ident(Variable::new("a", 32)), Expr::constant(1, 32)]
            )
        );
    }

    #[test]
    fn phi_cycle_terminates_instead_of_looping() {
        let mut defs = HashMap::new();
        let loop_var = SsaName::new("i", 32, 1);
        // i#1 is defined in terms of itself (a phi that feeds back into its
        // own definition around a loop back-edge).
        defs.insert(
            loop_var.clone(),
            Expr::operator("phi", vec![Expr::ident(loop_var.clone())]),
        );

        let reassembled = reassemble(&Expr::ident(loop_var.clone()), &defs);
        assert_eq!(
            reassembled,
            Expr::operator("phi", vec![Expr::ident(loop_var)])
        );
    }

    #[test]
    fn undefined_ssa_name_is_left_as_is() {
        let defs = HashMap::new();
        let name = SsaName::new("a", 32, 0);
        assert_eq!(reassemble(&Expr::ident(name.clone()), &defs), Expr::ident(name));
    }
}
