//! Boolean conditions and their AND/OR/NOT combinators.

use serde::{Deserialize, Serialize};

use crate::ast::expr::{ExprNode, FuncOp};
use crate::bind::BindCombiner;
use crate::error::Result;

/// A boolean-valued expression.
///
/// `True` is the empty condition: always satisfied, omitted entirely
/// by the renderer. Combinators never nest an empty condition into a
/// junction, so `a.and(Condition::True)` is just `a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Condition {
    /// The empty, always-true condition.
    #[default]
    True,
    /// A comparison between two expressions.
    Compare {
        op: FuncOp,
        left: ExprNode,
        right: ExprNode,
    },
    /// IS NULL / IS NOT NULL test.
    NullCheck { negated: bool, expr: ExprNode },
    /// Conjunction of all operands.
    And(Vec<Condition>),
    /// Disjunction of the operands.
    Or(Vec<Condition>),
    /// Negation.
    Not(Box<Condition>),
}

impl Condition {
    /// Whether this condition is always true and may be omitted.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::True => true,
            Condition::And(cs) | Condition::Or(cs) => cs.iter().all(Condition::is_empty),
            _ => false,
        }
    }

    /// Conjoin with another condition. Empty operands vanish; chained
    /// calls extend one flat AND instead of nesting.
    pub fn and(self, other: Condition) -> Condition {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Condition::True,
            (true, false) => other,
            (false, true) => self,
            (false, false) => match self {
                Condition::And(mut operands) => {
                    operands.push(other);
                    Condition::And(operands)
                }
                first => Condition::And(vec![first, other]),
            },
        }
    }

    /// Disjoin with another condition. An empty operand makes the
    /// whole disjunction empty (always true).
    pub fn or(self, other: Condition) -> Condition {
        match (self.is_empty(), other.is_empty()) {
            (false, false) => match self {
                Condition::Or(mut operands) => {
                    operands.push(other);
                    Condition::Or(operands)
                }
                first => Condition::Or(vec![first, other]),
            },
            _ => Condition::True,
        }
    }

    /// Negate this condition. Negating the empty condition stays
    /// empty: builders use `True` as "no filter", and "no filter"
    /// inverted is still no filter.
    pub fn negate(self) -> Condition {
        if self.is_empty() {
            Condition::True
        } else {
            Condition::Not(Box::new(self))
        }
    }

    /// Register every bind occurrence below this condition.
    pub fn collect_binds(&self, combiner: &mut BindCombiner) -> Result<()> {
        match self {
            Condition::True => Ok(()),
            Condition::Compare { left, right, .. } => {
                left.collect_binds(combiner)?;
                right.collect_binds(combiner)
            }
            Condition::NullCheck { expr, .. } => expr.collect_binds(combiner),
            Condition::And(operands) | Condition::Or(operands) => {
                for c in operands {
                    c.collect_binds(combiner)?;
                }
                Ok(())
            }
            Condition::Not(inner) => inner.collect_binds(combiner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn leaf(n: i64) -> Condition {
        Condition::Compare {
            op: FuncOp::Eq,
            left: ExprNode::Literal(Value::Int(n)),
            right: ExprNode::Literal(Value::Int(n)),
        }
    }

    #[test]
    fn empty_operands_vanish() {
        let c = Condition::True.and(leaf(1));
        assert!(matches!(c, Condition::Compare { .. }));

        let c = leaf(1).and(Condition::True);
        assert!(matches!(c, Condition::Compare { .. }));

        assert!(Condition::True.and(Condition::True).is_empty());
    }

    #[test]
    fn chained_and_stays_flat() {
        let c = leaf(1).and(leaf(2)).and(leaf(3));
        match c {
            Condition::And(ops) => assert_eq!(ops.len(), 3),
            other => panic!("expected flat And, got {:?}", other),
        }
    }

    #[test]
    fn or_with_empty_is_empty() {
        assert!(leaf(1).or(Condition::True).is_empty());
        assert!(Condition::True.or(leaf(1)).is_empty());
    }

    #[test]
    fn negate_empty_stays_empty() {
        assert!(Condition::True.negate().is_empty());
        assert!(matches!(leaf(1).negate(), Condition::Not(_)));
    }
}
