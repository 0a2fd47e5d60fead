use std::fmt;

use super::variable::Ident;

/// The expression algebra operated on by the SSA transform.
///
/// An identifier leaf, a constant leaf, a memory dereference (whose address
/// is itself an `Expr`, never renamed as a whole but whose address
/// sub-expression is), and an n-ary operator node. There is no fixed set of
/// operator symbols — the transform never interprets them, it only walks and
/// substitutes, so `Operator` takes a free-form symbol rather than a closed
/// enum of opcodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Identifier(Ident),
    Constant { value: i128, size: u32 },
    Memory { address: Box<Expr>, size: u32 },
    Operator { symbol: String, operands: Vec<Expr> },
}

impl Expr {
    pub fn ident(ident: impl Into<Ident>) -> Self {
        Expr::Identifier(ident.into())
    }

    pub fn constant(value: i128, size: u32) -> Self {
        Expr::Constant { value, size }
    }

    pub fn memory(address: Expr, size: u32) -> Self {
        Expr::Memory {
            address: Box::new(address),
            size,
        }
    }

    pub fn operator(symbol: impl Into<String>, operands: Vec<Expr>) -> Self {
        Expr::Operator {
            symbol: symbol.into(),
            operands,
        }
    }

    /// A phi with no operands yet, tagged with `symbol` (the configured phi
    /// placeholder). The phi's width lives on its target `SsaName`, not on
    /// this placeholder expression.
    pub fn empty_phi(symbol: impl Into<String>) -> Self {
        Expr::Operator {
            symbol: symbol.into(),
            operands: Vec::new(),
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, Expr::Identifier(_))
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Expr::Memory { .. })
    }

    pub fn size(&self) -> u32 {
        match self {
            Expr::Identifier(ident) => ident.size(),
            Expr::Constant { size, .. } => *size,
            Expr::Memory { size, .. } => *size,
            Expr::Operator { operands, .. } => {
                operands.first().map(Expr::size).unwrap_or(0)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(ident) => write!(f, "{}", ident),
            Expr::Constant { value, .. } => write!(f, "{}", value),
            Expr::Memory { address, size } => write!(f, "@{}[{}]", size, address),
            Expr::Operator { symbol, operands } => {
                write!(f, "{}(", symbol)?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::variable::Variable;

    #[test]
    fn memory_display_shows_size_and_address() {
        let addr = Expr::ident(Variable::new("esp", 32));
        let mem = Expr::memory(addr, 32);
        assert_eq!(mem.to_string(), "@32[esp]");
    }

    #[test]
    fn operator_display_lists_operands() {
        let expr = Expr::operator(
            "+",
            vec![Expr::constant(1, 32), Expr::constant(2, 32)],
        );
        assert_eq!(expr.to_string(), "+(1, 2)");
    }

    #[test]
    fn constant_equality_is_structural() {
        assert_eq!(Expr::constant(1, 32), Expr::constant(1, 32));
        assert_ne!(Expr::constant(1, 32), Expr::constant(1, 16));
    }
}
