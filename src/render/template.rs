//! Operator templates and the map that resolves them.
//!
//! A template is a placeholder-substitution pattern with declared
//! precedence positions. Fixed templates substitute one `{n}` per
//! argument; right-fold templates are 2-ary patterns that the renderer
//! applies recursively when an operator is used with more arguments,
//! which is how variadic operators like `||` chains render without a
//! dedicated n-ary rule.

use std::collections::HashMap;

use crate::ast::FuncOp;
use crate::render::position::Position;

/// How a template's arguments expand into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Fixed arity; one `{n}` placeholder per argument.
    Fixed,
    /// Two-argument pattern applied recursively: arity above two peels
    /// off the first argument and renders the remainder through the
    /// same template.
    RightFold,
}

/// A placeholder-substitution pattern with its precedence positions.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Pattern text with `{0}`, `{1}`, ... argument slots.
    pub text: &'static str,
    /// Priority of the rendered result, compared against the context
    /// to decide bracket insertion.
    pub outer: Position,
    /// Context pushed while rendering each argument.
    pub arg: Position,
    pub expansion: Expansion,
}

impl Template {
    pub const fn fixed(text: &'static str, outer: Position, arg: Position) -> Self {
        Self {
            text,
            outer,
            arg,
            expansion: Expansion::Fixed,
        }
    }

    pub const fn right_fold(text: &'static str, outer: Position, arg: Position) -> Self {
        Self {
            text,
            outer,
            arg,
            expansion: Expansion::RightFold,
        }
    }
}

/// Operator -> template map. Read-only after construction; build it
/// once and share it across render passes.
#[derive(Debug, Clone, Default)]
pub struct TemplateMap {
    entries: HashMap<FuncOp, Template>,
}

impl TemplateMap {
    /// An empty map. Rendering any operator against it fails with
    /// `UnknownTemplate`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in operator set.
    pub fn standard() -> Self {
        use Position::*;

        let mut map = Self::new();
        map.insert(FuncOp::Eq, Template::fixed("({0} = {1})", Comparison, Additive));
        map.insert(FuncOp::Ne, Template::fixed("({0} <> {1})", Comparison, Additive));
        map.insert(FuncOp::Lt, Template::fixed("({0} < {1})", Comparison, Additive));
        map.insert(FuncOp::Le, Template::fixed("({0} <= {1})", Comparison, Additive));
        map.insert(FuncOp::Gt, Template::fixed("({0} > {1})", Comparison, Additive));
        map.insert(FuncOp::Ge, Template::fixed("({0} >= {1})", Comparison, Additive));
        map.insert(FuncOp::Add, Template::fixed("{0} + {1}", Additive, Additive));
        // Subtraction and division demand brackets around compound
        // right operands, so their argument context is one level
        // tighter than the operator itself.
        map.insert(FuncOp::Sub, Template::fixed("{0} - {1}", Additive, Multiplicative));
        map.insert(FuncOp::Mul, Template::fixed("{0} * {1}", Multiplicative, Multiplicative));
        map.insert(FuncOp::Div, Template::fixed("{0} / {1}", Multiplicative, Unary));
        map.insert(FuncOp::Neg, Template::fixed("-{0}", Unary, Bracketed));
        map.insert(FuncOp::Concat, Template::right_fold("{0} || {1}", Additive, Additive));
        map.insert(FuncOp::Lower, Template::fixed("LOWER({0})", Bracketed, InBracket));
        map.insert(FuncOp::Upper, Template::fixed("UPPER({0})", Bracketed, InBracket));
        map.insert(FuncOp::IsNull, Template::fixed("{0} IS NULL", OtherComparison, Comparison));
        map.insert(FuncOp::IsNotNull, Template::fixed("{0} IS NOT NULL", OtherComparison, Comparison));
        map
    }

    /// Register or replace the template for an operator.
    pub fn insert(&mut self, op: FuncOp, template: Template) {
        self.entries.insert(op, template);
    }

    pub fn get(&self, op: FuncOp) -> Option<&Template> {
        self.entries.get(&op)
    }
}
