//! SQL renderer for the quarry AST.
//!
//! Walks a [`Select`] and emits SQL text with `?` placeholders,
//! tracking a precedence position stack to decide bracket insertion
//! and recording the 1-based position of every emitted placeholder.
//! One renderer instance serves exactly one render pass.

pub mod position;
pub mod template;

#[cfg(test)]
mod tests;

pub use position::Position;
pub use template::{Expansion, Template, TemplateMap};

use std::collections::HashMap;

use crate::ast::{Condition, ExprNode, FromElement, FuncOp, Select, SelectColumn};
use crate::bind::{BindCombiner, BindVariable, BindWithPos};
use crate::error::{Error, Result};

/// Render output: immutable SQL text plus bind metadata. Only bound
/// values may change between executions; text and positions never do.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// SQL text with `?` positional placeholders.
    pub sql: String,
    /// Bind names with their placeholder positions, ordered by first
    /// occurrence in the text.
    pub bind_positions: Vec<BindWithPos>,
    /// Canonical bind declarations, unified across the whole tree.
    pub binds: HashMap<String, BindVariable>,
}

/// Render a select against a template map.
pub fn render_select(select: &Select, templates: &TemplateMap) -> Result<Rendered> {
    let mut combiner = BindCombiner::new();
    select.collect_binds(&mut combiner)?;

    let mut renderer = Renderer::new(templates);
    renderer.select(select)?;
    let bind_positions = renderer.bind_positions();
    Ok(Rendered {
        sql: renderer.out,
        bind_positions,
        binds: combiner.into_map(),
    })
}

/// A deferred argument appender: each template argument is rendered
/// through a callback in its correct position context, never
/// pre-stringified.
type ArgFn<'t, 'c> = dyn Fn(&mut Renderer<'t>) -> Result<()> + 'c;

struct Renderer<'t> {
    templates: &'t TemplateMap,
    out: String,
    stack: Vec<Position>,
    /// Bind names in first-occurrence order.
    order: Vec<String>,
    positions: HashMap<String, Vec<usize>>,
    emitted: usize,
}

impl<'t> Renderer<'t> {
    fn new(templates: &'t TemplateMap) -> Self {
        Self {
            templates,
            out: String::new(),
            stack: vec![Position::General],
            order: Vec::new(),
            positions: HashMap::new(),
            emitted: 0,
        }
    }

    fn top(&self) -> Position {
        *self.stack.last().expect("position stack never empty")
    }

    fn bind_positions(&mut self) -> Vec<BindWithPos> {
        self.order
            .iter()
            .map(|name| BindWithPos {
                name: name.clone(),
                positions: self.positions.remove(name).unwrap_or_default(),
            })
            .collect()
    }

    fn record_bind(&mut self, name: &str) {
        self.emitted += 1;
        if !self.positions.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.positions
            .entry(name.to_string())
            .or_default()
            .push(self.emitted);
    }

    fn select(&mut self, select: &Select) -> Result<()> {
        self.out.push_str("SELECT ");
        for (i, col) in select.columns.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.select_column(col)?;
        }

        if !select.from.is_empty() {
            self.out.push_str(" FROM ");
            for (i, source) in select.from.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.from_element(source)?;
            }
        }

        if !select.where_clause.is_empty() {
            self.out.push_str(" WHERE ");
            self.stack.push(Position::Where);
            let rendered = self.condition(&select.where_clause);
            self.stack.pop();
            rendered?;
        }
        Ok(())
    }

    fn select_column(&mut self, col: &SelectColumn) -> Result<()> {
        self.expr(&col.expr)?;
        if let Some(alias) = &col.alias {
            self.out.push_str(" AS ");
            self.out.push_str(alias);
        }
        Ok(())
    }

    fn from_element(&mut self, source: &FromElement) -> Result<()> {
        match source {
            FromElement::Table { name, alias } => {
                self.out.push_str(name);
                self.out.push(' ');
                self.out.push_str(alias);
                Ok(())
            }
            FromElement::Subquery { select, alias } => {
                self.out.push('(');
                self.stack.push(Position::InBracket);
                let rendered = self.select(select);
                self.stack.pop();
                rendered?;
                self.out.push_str(") ");
                self.out.push_str(alias);
                Ok(())
            }
            FromElement::Dual { alias } => {
                self.out.push_str("dual ");
                self.out.push_str(alias);
                Ok(())
            }
        }
    }

    fn expr(&mut self, node: &ExprNode) -> Result<()> {
        match node {
            ExprNode::Literal(value) => {
                self.out.push_str(&value.to_string());
                Ok(())
            }
            ExprNode::Bind(var) => {
                self.out.push('?');
                self.record_bind(&var.name);
                Ok(())
            }
            ExprNode::Column { table, name } => {
                self.out.push_str(table);
                self.out.push('.');
                self.out.push_str(name);
                Ok(())
            }
            ExprNode::Func { op, args } => {
                let arg_fns: Vec<Box<ArgFn<'t, '_>>> = args
                    .iter()
                    .map(|arg| {
                        Box::new(move |r: &mut Renderer<'t>| r.expr(arg)) as Box<ArgFn<'t, '_>>
                    })
                    .collect();
                let refs: Vec<&ArgFn<'t, '_>> = arg_fns.iter().map(|b| b.as_ref()).collect();
                self.apply_op(*op, &refs)
            }
        }
    }

    fn condition(&mut self, cond: &Condition) -> Result<()> {
        if cond.is_empty() {
            return Ok(());
        }
        let context = self.top();
        // An AND directly inside an OR is always bracketed for human
        // readability, even though raw precedence alone would not
        // require it. The reverse nesting relies on the ordinary rule.
        let force = context == Position::Or && matches!(cond, Condition::And(_));
        if force || self.condition_position(cond) < context {
            self.out.push('(');
            self.stack.push(Position::InBracket);
            let rendered = self.condition_parts(cond);
            self.stack.pop();
            rendered?;
            self.out.push(')');
            Ok(())
        } else {
            self.condition_parts(cond)
        }
    }

    /// Outer priority of a condition node, for the bracket decision.
    fn condition_position(&self, cond: &Condition) -> Position {
        let template_outer = |op: FuncOp, fallback: Position| {
            self.templates.get(op).map(|t| t.outer).unwrap_or(fallback)
        };
        match cond {
            Condition::True => Position::General,
            Condition::Compare { op, .. } => template_outer(*op, Position::Comparison),
            Condition::NullCheck { negated, .. } => {
                let op = if *negated { FuncOp::IsNotNull } else { FuncOp::IsNull };
                template_outer(op, Position::OtherComparison)
            }
            Condition::And(_) => Position::And,
            Condition::Or(_) => Position::Or,
            Condition::Not(_) => Position::Not,
        }
    }

    fn condition_parts(&mut self, cond: &Condition) -> Result<()> {
        match cond {
            Condition::True => Ok(()),
            Condition::Compare { op, left, right } => {
                let lhs = |r: &mut Renderer<'t>| r.expr(left);
                let rhs = |r: &mut Renderer<'t>| r.expr(right);
                self.apply_op(*op, &[&lhs, &rhs])
            }
            Condition::NullCheck { negated, expr } => {
                let op = if *negated { FuncOp::IsNotNull } else { FuncOp::IsNull };
                let operand = |r: &mut Renderer<'t>| r.expr(expr);
                self.apply_op(op, &[&operand])
            }
            Condition::And(operands) => self.junction(operands, " AND ", Position::And),
            Condition::Or(operands) => self.junction(operands, " OR ", Position::Or),
            Condition::Not(inner) => {
                self.out.push_str("NOT ");
                self.stack.push(Position::Not);
                let rendered = self.condition(inner);
                self.stack.pop();
                rendered
            }
        }
    }

    fn junction(&mut self, operands: &[Condition], separator: &str, context: Position) -> Result<()> {
        let mut first = true;
        for operand in operands {
            if operand.is_empty() {
                continue;
            }
            if !first {
                self.out.push_str(separator);
            }
            first = false;
            self.stack.push(context);
            let rendered = self.condition(operand);
            self.stack.pop();
            rendered?;
        }
        Ok(())
    }

    /// Resolve the operator's template and expand it, bracketing the
    /// whole result when it binds more loosely than the context.
    fn apply_op(&mut self, op: FuncOp, args: &[&ArgFn<'t, '_>]) -> Result<()> {
        let templates = self.templates;
        let template = templates.get(op).ok_or(Error::UnknownTemplate(op))?;
        if template.outer < self.top() {
            self.out.push('(');
            self.stack.push(Position::InBracket);
            let rendered = self.expand(template, args);
            self.stack.pop();
            rendered?;
            self.out.push(')');
            Ok(())
        } else {
            self.expand(template, args)
        }
    }

    /// Apply a template to its arguments. Right-fold templates with
    /// more than two arguments peel off the first and render the rest
    /// through the same template as a deferred appender.
    fn expand(&mut self, template: &Template, args: &[&ArgFn<'t, '_>]) -> Result<()> {
        if template.expansion == Expansion::RightFold && args.len() > 2 {
            let (head, tail) = args.split_first().expect("checked arity above");
            let rest: Vec<&ArgFn<'t, '_>> = tail.to_vec();
            let folded = move |r: &mut Renderer<'t>| r.expand(template, &rest);
            let folded_ref: &ArgFn<'t, '_> = &folded;
            return self.substitute(template, &[*head, folded_ref]);
        }
        self.substitute(template, args)
    }

    fn substitute(&mut self, template: &Template, args: &[&ArgFn<'t, '_>]) -> Result<()> {
        let mut rest = template.text;
        while let Some(open) = rest.find('{') {
            self.out.push_str(&rest[..open]);
            let close = rest[open..]
                .find('}')
                .expect("unclosed placeholder in template")
                + open;
            let index: usize = rest[open + 1..close]
                .parse()
                .expect("non-numeric placeholder in template");
            let arg = args.get(index).expect("template arity mismatch");
            self.stack.push(template.arg);
            let rendered = arg(self);
            self.stack.pop();
            rendered?;
            rest = &rest[close + 1..];
        }
        self.out.push_str(rest);
        Ok(())
    }
}
