//! Precedence positions for the renderer's bracket-insertion rule.

/// Ranked precedence of the construct currently being rendered.
///
/// Variants are declared loosest-binding first, so the derived `Ord`
/// gives the precedence order directly: a sub-expression whose outer
/// position compares less than the context on top of the stack binds
/// more loosely than the context demands and must be bracketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Position {
    /// Top level of a statement or select list.
    General,
    /// Directly under a WHERE keyword.
    Where,
    /// Directly inside explicitly emitted brackets.
    InBracket,
    /// Operand of an OR.
    Or,
    /// Operand of an AND.
    And,
    /// Operand of a NOT.
    Not,
    /// Operand of IS NULL and friends.
    OtherComparison,
    /// Operand of an ordinary comparison.
    Comparison,
    /// Operand of + or -.
    Additive,
    /// Operand of * or /.
    Multiplicative,
    /// Operand of a unary operator.
    Unary,
    /// A self-bracketing expression such as a function call.
    Bracketed,
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn rank_order_matches_precedence() {
        assert!(Position::Or < Position::And);
        assert!(Position::And < Position::Not);
        assert!(Position::Not < Position::Comparison);
        assert!(Position::Additive < Position::Multiplicative);
        assert!(Position::Where < Position::Or);
        assert!(Position::Unary < Position::Bracketed);
    }
}
