//! Ergonomic builders for quarry AST nodes.
//!
//! - `expr` - typed expressions: literals, columns, binds, functions,
//!   comparisons
//! - `select` - the progressively-typed select builder chain
//!
//! # Example
//! ```ignore
//! use quarry::prelude::*;
//! use quarry::types::marker::{Int, Text};
//!
//! let query = select()
//!     .column(column::<Int>("u", "id"))
//!     .column(column::<Text>("u", "name"))
//!     .from_table("users", "u")
//!     .filter(column::<Int>("u", "id").eq(&bind::<Int>("id")))
//!     .build()?;
//! ```

pub mod expr;
pub mod select;

pub use expr::{bind, bind_with, column, concat, lit, lower, upper, Expr, IntoLiteral};
pub use select::{select, SelectBuilder0, SelectBuilder1, SelectBuilder2, SelectBuilderN};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Condition, ExprNode, FuncOp};
    use crate::error::Error;
    use crate::types::marker::{Int, Num, Text};

    #[test]
    fn eq_builds_a_comparison() {
        let cond = column::<Int>("t", "a").eq(&lit(5i64));
        assert!(matches!(
            cond,
            Condition::Compare {
                op: FuncOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn eq_nullable_accounts_for_both_null() {
        let a = column::<Text>("t", "a");
        let b = column::<Text>("t", "b");
        match a.eq_nullable(&b) {
            Condition::Or(operands) => {
                assert_eq!(operands.len(), 2);
                assert!(matches!(operands[0], Condition::Compare { op: FuncOp::Eq, .. }));
                assert!(matches!(operands[1], Condition::And(_)));
            }
            other => panic!("expected Or, got {:?}", other),
        }
    }

    #[test]
    fn repeated_filter_conjoins_with_and() {
        let query = select()
            .column(column::<Int>("t", "a"))
            .from_table("things", "t")
            .filter(column::<Int>("t", "a").gt(&lit(0i64)))
            .filter(column::<Int>("t", "a").lt(&lit(10i64)))
            .build()
            .unwrap();

        assert!(matches!(query.where_clause, Condition::And(ref ops) if ops.len() == 2));
    }

    #[test]
    fn typestate_grows_then_degrades() {
        let query = select()
            .column(column::<Int>("t", "a"))
            .column(column::<Text>("t", "b"))
            .column(column::<Num>("t", "c"))
            .column(column::<Int>("t", "d"))
            .from_table("things", "t")
            .build()
            .unwrap();

        assert_eq!(query.columns.len(), 4);
    }

    #[test]
    fn alias_defaults_to_column_name() {
        let query = select()
            .column(column::<Int>("t", "a"))
            .column_as(lit(1i64), "one")
            .from_table("things", "t")
            .build()
            .unwrap();

        assert_eq!(query.columns[0].output_name(), Some("a"));
        assert_eq!(query.columns[1].output_name(), Some("one"));
    }

    #[test]
    fn build_surfaces_bind_conflicts() {
        // Same bind name declared text in one column, int in another.
        let result = select()
            .column(bind_with::<Text, _>("v", "a"))
            .column(bind_with::<Int, _>("v", 1i64))
            .from_dual("d")
            .build();

        assert!(matches!(result, Err(Error::BindTypeConflict { .. })));
    }

    #[test]
    fn concat_builds_one_variadic_node() {
        let expr = concat([lit("a"), lit("b"), lit("c")]);
        match expr.node() {
            ExprNode::Func {
                op: FuncOp::Concat,
                args,
            } => assert_eq!(args.len(), 3),
            other => panic!("expected Concat, got {:?}", other),
        }
    }
}
