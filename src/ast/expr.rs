//! Untyped expression nodes and the built-in operator set.

use serde::{Deserialize, Serialize};

use crate::bind::{BindCombiner, BindVariable};
use crate::error::Result;
use crate::types::Value;

/// Built-in operators and functions. Each resolves to a render
/// template; rendering an operator without a template entry fails fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuncOp {
    /// Equality (=)
    Eq,
    /// Inequality (<>)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Arithmetic negation (-x)
    Neg,
    /// String concatenation (||), variadic
    Concat,
    /// LOWER(x)
    Lower,
    /// UPPER(x)
    Upper,
    /// IS NULL test
    IsNull,
    /// IS NOT NULL test
    IsNotNull,
}

impl std::fmt::Display for FuncOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FuncOp::Eq => "=",
            FuncOp::Ne => "<>",
            FuncOp::Lt => "<",
            FuncOp::Le => "<=",
            FuncOp::Gt => ">",
            FuncOp::Ge => ">=",
            FuncOp::Add => "+",
            FuncOp::Sub => "-",
            FuncOp::Mul => "*",
            FuncOp::Div => "/",
            FuncOp::Neg => "neg",
            FuncOp::Concat => "||",
            FuncOp::Lower => "LOWER",
            FuncOp::Upper => "UPPER",
            FuncOp::IsNull => "IS NULL",
            FuncOp::IsNotNull => "IS NOT NULL",
        };
        write!(f, "{}", name)
    }
}

/// An untyped expression node. Immutable once built; parents may share
/// subtrees freely via `Clone`.
///
/// The typed surface [`crate::ast::builders::Expr`] wraps these nodes
/// with a phantom type so that mixed-type comparisons fail to compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprNode {
    /// A literal value rendered inline.
    Literal(Value),
    /// A named bind variable, rendered as `?`.
    Bind(BindVariable),
    /// A column reference, rendered `table.name`.
    Column { table: String, name: String },
    /// A function or operator application.
    Func { op: FuncOp, args: Vec<ExprNode> },
}

impl ExprNode {
    /// The name a select column falls back to when no alias is given.
    /// Only plain column references have one.
    pub fn natural_name(&self) -> Option<&str> {
        match self {
            ExprNode::Column { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Register every bind occurrence below this node.
    pub fn collect_binds(&self, combiner: &mut BindCombiner) -> Result<()> {
        match self {
            ExprNode::Literal(_) | ExprNode::Column { .. } => Ok(()),
            ExprNode::Bind(var) => combiner.add(var),
            ExprNode::Func { args, .. } => {
                for arg in args {
                    arg.collect_binds(combiner)?;
                }
                Ok(())
            }
        }
    }
}
