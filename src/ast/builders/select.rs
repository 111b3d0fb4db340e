//! Progressively-typed select builders.
//!
//! `select()` starts a zero-column builder; each `column()` call moves
//! the builder one typestate forward: `SelectBuilder0` ->
//! `SelectBuilder1<T1>` -> `SelectBuilder2<T1, T2>` -> `SelectBuilderN`.
//! Past two columns the individual column types are no longer tracked.
//! `build()` exists on every state except the zero-column one, so an
//! empty select list is a compile-time error, and it runs the bind
//! combiner over the whole tree so conflicting bind names surface
//! before any SQL is rendered.

use std::marker::PhantomData;

use crate::ast::builders::expr::Expr;
use crate::ast::condition::Condition;
use crate::ast::select::{FromElement, Select, SelectColumn};
use crate::bind::BindCombiner;
use crate::error::Result;
use crate::types::marker::SqlTyped;

/// Start building a SELECT statement.
///
/// `build()` is unreachable until at least one column is added:
///
/// ```compile_fail
/// let query = quarry::ast::builders::select().build();
/// ```
pub fn select() -> SelectBuilder0 {
    SelectBuilder0 {
        from: Vec::new(),
        where_clause: Condition::True,
    }
}

/// Zero columns. Sources and filters may be set, but `build()` does
/// not exist yet.
#[derive(Debug, Default)]
pub struct SelectBuilder0 {
    from: Vec<FromElement>,
    where_clause: Condition,
}

/// Exactly one typed column.
#[derive(Debug)]
pub struct SelectBuilder1<T1: SqlTyped> {
    columns: Vec<SelectColumn>,
    from: Vec<FromElement>,
    where_clause: Condition,
    _t1: PhantomData<T1>,
}

/// Exactly two typed columns.
#[derive(Debug)]
pub struct SelectBuilder2<T1: SqlTyped, T2: SqlTyped> {
    columns: Vec<SelectColumn>,
    from: Vec<FromElement>,
    where_clause: Condition,
    _t: PhantomData<(T1, T2)>,
}

/// Three or more columns; the column list is untyped from here on.
#[derive(Debug)]
pub struct SelectBuilderN {
    columns: Vec<SelectColumn>,
    from: Vec<FromElement>,
    where_clause: Condition,
}

macro_rules! impl_sources_and_filter {
    ($($builder:ident $(<$($t:ident),+>)?),+ $(,)?) => {$(
        impl $(<$($t: SqlTyped),+>)? $builder $(<$($t),+>)? {
            /// Append a named table source.
            pub fn from_table(mut self, name: &str, alias: &str) -> Self {
                self.from.push(FromElement::table(name, alias));
                self
            }

            /// Append a bracketed subquery source.
            pub fn from_select(mut self, select: Select, alias: &str) -> Self {
                self.from.push(FromElement::subquery(select, alias));
                self
            }

            /// Append the single-row dummy table.
            pub fn from_dual(mut self, alias: &str) -> Self {
                self.from.push(FromElement::dual(alias));
                self
            }

            /// Add a filter condition. Repeated calls conjoin with AND.
            pub fn filter(mut self, condition: Condition) -> Self {
                self.where_clause = self.where_clause.and(condition);
                self
            }
        }
    )+};
}

impl_sources_and_filter!(
    SelectBuilder0,
    SelectBuilder1<T1>,
    SelectBuilder2<T1, T2>,
    SelectBuilderN,
);

fn finish(columns: Vec<SelectColumn>, from: Vec<FromElement>, where_clause: Condition) -> Result<Select> {
    let select = Select {
        columns,
        from,
        where_clause,
    };
    // Conflicting same-named binds fail here, at build time.
    let mut combiner = BindCombiner::new();
    select.collect_binds(&mut combiner)?;
    Ok(select)
}

impl SelectBuilder0 {
    /// Add the first typed column.
    pub fn column<T: SqlTyped>(self, expr: Expr<T>) -> SelectBuilder1<T> {
        SelectBuilder1 {
            columns: vec![SelectColumn::new(expr.into_node())],
            from: self.from,
            where_clause: self.where_clause,
            _t1: PhantomData,
        }
    }

    /// Add the first typed column under an explicit alias.
    pub fn column_as<T: SqlTyped>(self, expr: Expr<T>, alias: &str) -> SelectBuilder1<T> {
        SelectBuilder1 {
            columns: vec![SelectColumn::aliased(expr.into_node(), alias)],
            from: self.from,
            where_clause: self.where_clause,
            _t1: PhantomData,
        }
    }
}

impl<T1: SqlTyped> SelectBuilder1<T1> {
    /// Add the second typed column.
    pub fn column<T2: SqlTyped>(mut self, expr: Expr<T2>) -> SelectBuilder2<T1, T2> {
        self.columns.push(SelectColumn::new(expr.into_node()));
        SelectBuilder2 {
            columns: self.columns,
            from: self.from,
            where_clause: self.where_clause,
            _t: PhantomData,
        }
    }

    /// Add the second typed column under an explicit alias.
    pub fn column_as<T2: SqlTyped>(mut self, expr: Expr<T2>, alias: &str) -> SelectBuilder2<T1, T2> {
        self.columns.push(SelectColumn::aliased(expr.into_node(), alias));
        SelectBuilder2 {
            columns: self.columns,
            from: self.from,
            where_clause: self.where_clause,
            _t: PhantomData,
        }
    }

    pub fn build(self) -> Result<Select> {
        finish(self.columns, self.from, self.where_clause)
    }
}

impl<T1: SqlTyped, T2: SqlTyped> SelectBuilder2<T1, T2> {
    /// Add a third column; individual column types stop being tracked.
    pub fn column<T: SqlTyped>(mut self, expr: Expr<T>) -> SelectBuilderN {
        self.columns.push(SelectColumn::new(expr.into_node()));
        SelectBuilderN {
            columns: self.columns,
            from: self.from,
            where_clause: self.where_clause,
        }
    }

    /// Add a third, aliased column; types stop being tracked.
    pub fn column_as<T: SqlTyped>(mut self, expr: Expr<T>, alias: &str) -> SelectBuilderN {
        self.columns.push(SelectColumn::aliased(expr.into_node(), alias));
        SelectBuilderN {
            columns: self.columns,
            from: self.from,
            where_clause: self.where_clause,
        }
    }

    pub fn build(self) -> Result<Select> {
        finish(self.columns, self.from, self.where_clause)
    }
}

impl SelectBuilderN {
    /// Add another column to the untyped list.
    pub fn column<T: SqlTyped>(mut self, expr: Expr<T>) -> SelectBuilderN {
        self.columns.push(SelectColumn::new(expr.into_node()));
        self
    }

    /// Add another aliased column to the untyped list.
    pub fn column_as<T: SqlTyped>(mut self, expr: Expr<T>, alias: &str) -> SelectBuilderN {
        self.columns.push(SelectColumn::aliased(expr.into_node(), alias));
        self
    }

    pub fn build(self) -> Result<Select> {
        finish(self.columns, self.from, self.where_clause)
    }
}
