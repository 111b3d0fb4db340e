//! The `Select` statement node and its parts.

use serde::{Deserialize, Serialize};

use crate::ast::condition::Condition;
use crate::ast::expr::ExprNode;
use crate::bind::BindCombiner;
use crate::error::Result;

/// A column of a select list: an expression plus an optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectColumn {
    pub expr: ExprNode,
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(expr: ExprNode) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: ExprNode, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }

    /// The name this column is visible under: the explicit alias, or
    /// the expression's natural name when the alias was omitted.
    pub fn output_name(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.expr.natural_name())
    }
}

/// A data source of the FROM list. The alias is mandatory for every
/// kind, even where raw SQL would let it be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromElement {
    /// A named table.
    Table { name: String, alias: String },
    /// A bracketed subquery.
    Subquery { select: Box<Select>, alias: String },
    /// The single-row dummy table.
    Dual { alias: String },
}

impl FromElement {
    pub fn table(name: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        assert!(!alias.is_empty(), "from-element alias must be non-empty");
        Self::Table {
            name: name.into(),
            alias,
        }
    }

    pub fn subquery(select: Select, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        assert!(!alias.is_empty(), "from-element alias must be non-empty");
        Self::Subquery {
            select: Box::new(select),
            alias,
        }
    }

    pub fn dual(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        assert!(!alias.is_empty(), "from-element alias must be non-empty");
        Self::Dual { alias }
    }

    pub fn alias(&self) -> &str {
        match self {
            FromElement::Table { alias, .. }
            | FromElement::Subquery { alias, .. }
            | FromElement::Dual { alias } => alias,
        }
    }
}

/// A full SELECT statement: ordered columns, ordered from-list and a
/// where-condition (the empty condition means no WHERE clause).
///
/// Built by the typestate select builder; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub columns: Vec<SelectColumn>,
    pub from: Vec<FromElement>,
    pub where_clause: Condition,
}

impl Select {
    /// Register every bind occurrence in the whole statement tree.
    pub fn collect_binds(&self, combiner: &mut BindCombiner) -> Result<()> {
        for column in &self.columns {
            column.expr.collect_binds(combiner)?;
        }
        for source in &self.from {
            if let FromElement::Subquery { select, .. } = source {
                select.collect_binds(combiner)?;
            }
        }
        self.where_clause.collect_binds(combiner)
    }
}
