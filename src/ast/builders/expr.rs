//! Typed expression surface.
//!
//! `Expr<T>` wraps an untyped [`ExprNode`] with a phantom marker type
//! so that comparisons across incompatible declared types are rejected
//! by the compiler, not at render time. All operations produce new
//! immutable nodes; nothing is mutated in place.

use std::marker::PhantomData;

use crate::ast::condition::Condition;
use crate::ast::expr::{ExprNode, FuncOp};
use crate::bind::BindVariable;
use crate::types::marker::{SqlNumeric, SqlTyped};
use crate::types::Value;

/// A typed expression. `T` is a phantom marker from
/// [`crate::types::marker`]; the runtime node is untyped.
#[derive(Debug, PartialEq)]
pub struct Expr<T: SqlTyped> {
    node: ExprNode,
    _ty: PhantomData<T>,
}

// Manual impl: deriving would demand T: Clone for no reason.
impl<T: SqlTyped> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            _ty: PhantomData,
        }
    }
}

impl<T: SqlTyped> Expr<T> {
    pub(crate) fn wrap(node: ExprNode) -> Self {
        Self {
            node,
            _ty: PhantomData,
        }
    }

    pub fn node(&self) -> &ExprNode {
        &self.node
    }

    pub fn into_node(self) -> ExprNode {
        self.node
    }

    fn compare(&self, op: FuncOp, other: &Expr<T>) -> Condition {
        Condition::Compare {
            op,
            left: self.node.clone(),
            right: other.node.clone(),
        }
    }

    /// `(a = b)`. Three-valued logic applies: NULL on either side
    /// makes the comparison unknown. Use [`Expr::eq_nullable`] when
    /// two NULLs should match.
    pub fn eq(&self, other: &Expr<T>) -> Condition {
        self.compare(FuncOp::Eq, other)
    }

    /// `(a = b) OR (a IS NULL AND b IS NULL)` - equality where two
    /// NULLs count as equal.
    pub fn eq_nullable(&self, other: &Expr<T>) -> Condition {
        self.eq(other)
            .or(self.is_null().and(other.is_null()))
    }

    /// `(a <> b)`.
    pub fn ne(&self, other: &Expr<T>) -> Condition {
        self.compare(FuncOp::Ne, other)
    }

    /// `(a < b)`.
    pub fn lt(&self, other: &Expr<T>) -> Condition {
        self.compare(FuncOp::Lt, other)
    }

    /// `(a <= b)`.
    pub fn le(&self, other: &Expr<T>) -> Condition {
        self.compare(FuncOp::Le, other)
    }

    /// `(a > b)`.
    pub fn gt(&self, other: &Expr<T>) -> Condition {
        self.compare(FuncOp::Gt, other)
    }

    /// `(a >= b)`.
    pub fn ge(&self, other: &Expr<T>) -> Condition {
        self.compare(FuncOp::Ge, other)
    }

    /// `a IS NULL`.
    pub fn is_null(&self) -> Condition {
        Condition::NullCheck {
            negated: false,
            expr: self.node.clone(),
        }
    }

    /// `a IS NOT NULL`.
    pub fn is_not_null(&self) -> Condition {
        Condition::NullCheck {
            negated: true,
            expr: self.node.clone(),
        }
    }
}

impl<T: SqlNumeric> Expr<T> {
    fn binary(&self, op: FuncOp, other: &Expr<T>) -> Expr<T> {
        Expr::wrap(ExprNode::Func {
            op,
            args: vec![self.node.clone(), other.node.clone()],
        })
    }

    pub fn add(&self, other: &Expr<T>) -> Expr<T> {
        self.binary(FuncOp::Add, other)
    }

    pub fn sub(&self, other: &Expr<T>) -> Expr<T> {
        self.binary(FuncOp::Sub, other)
    }

    pub fn mul(&self, other: &Expr<T>) -> Expr<T> {
        self.binary(FuncOp::Mul, other)
    }

    pub fn div(&self, other: &Expr<T>) -> Expr<T> {
        self.binary(FuncOp::Div, other)
    }

    pub fn neg(&self) -> Expr<T> {
        Expr::wrap(ExprNode::Func {
            op: FuncOp::Neg,
            args: vec![self.node.clone()],
        })
    }
}

/// Ties a Rust value to the marker type of the literal it produces,
/// so `lit(5i64)` infers `Expr<Int>` and `lit("a")` infers
/// `Expr<Text>`.
pub trait IntoLiteral<T: SqlTyped> {
    fn into_value(self) -> Value;
}

macro_rules! literal_sources {
    ($($rust:ty => $marker:ty),+ $(,)?) => {$(
        impl IntoLiteral<$marker> for $rust {
            fn into_value(self) -> Value {
                Value::from(self)
            }
        }
    )+};
}

literal_sources! {
    bool => crate::types::marker::Bool,
    i32 => crate::types::marker::Int,
    i64 => crate::types::marker::Int,
    f64 => crate::types::marker::Float,
    rust_decimal::Decimal => crate::types::marker::Dec,
    &str => crate::types::marker::Text,
    String => crate::types::marker::Text,
    uuid::Uuid => crate::types::marker::Uid,
    chrono::DateTime<chrono::Utc> => crate::types::marker::Stamp,
}

/// A typed literal expression.
pub fn lit<T: SqlTyped, V: IntoLiteral<T>>(value: V) -> Expr<T> {
    Expr::wrap(ExprNode::Literal(value.into_value()))
}

/// A typed column reference, `table.name`. `table` is the alias of a
/// from-element.
pub fn column<T: SqlTyped>(table: &str, name: &str) -> Expr<T> {
    Expr::wrap(ExprNode::Column {
        table: table.to_string(),
        name: name.to_string(),
    })
}

/// A typed bind variable with no value yet; supply one via
/// [`crate::stmt::Statement::bind_value`] before executing.
pub fn bind<T: SqlTyped>(name: &str) -> Expr<T> {
    Expr::wrap(ExprNode::Bind(BindVariable::new(name, T::sql_type())))
}

/// A typed bind variable carrying its value.
pub fn bind_with<T: SqlTyped, V: IntoLiteral<T>>(name: &str, value: V) -> Expr<T> {
    Expr::wrap(ExprNode::Bind(BindVariable::with_value(
        name,
        T::sql_type(),
        value.into_value(),
    )))
}

/// N-ary string concatenation, rendered as chained `||`.
pub fn concat<I>(parts: I) -> Expr<crate::types::marker::Text>
where
    I: IntoIterator<Item = Expr<crate::types::marker::Text>>,
{
    let args: Vec<ExprNode> = parts.into_iter().map(Expr::into_node).collect();
    assert!(args.len() >= 2, "concat needs at least two operands");
    Expr::wrap(ExprNode::Func {
        op: FuncOp::Concat,
        args,
    })
}

/// `LOWER(x)`.
pub fn lower(expr: &Expr<crate::types::marker::Text>) -> Expr<crate::types::marker::Text> {
    Expr::wrap(ExprNode::Func {
        op: FuncOp::Lower,
        args: vec![expr.node().clone()],
    })
}

/// `UPPER(x)`.
pub fn upper(expr: &Expr<crate::types::marker::Text>) -> Expr<crate::types::marker::Text> {
    Expr::wrap(ExprNode::Func {
        op: FuncOp::Upper,
        args: vec![expr.node().clone()],
    })
}
