use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::{Condition, FuncOp};
use crate::error::Error;
use crate::render::{render_select, TemplateMap};
use crate::types::marker::{Int, Text};

fn col_eq(table: &str, name: &str, value: i64) -> Condition {
    column::<Int>(table, name).eq(&lit(value))
}

#[test]
fn plain_select_from_where() {
    let query = select()
        .column(column::<Int>("t", "a"))
        .column(column::<Text>("t", "b"))
        .from_table("things", "t")
        .filter(col_eq("t", "a", 1))
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT t.a, t.b FROM things t WHERE (t.a = 1)"
    );
    assert!(rendered.bind_positions.is_empty());
}

#[test]
fn empty_condition_renders_no_where() {
    let query = select()
        .column(column::<Int>("t", "a"))
        .from_table("things", "t")
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(rendered.sql, "SELECT t.a FROM things t");
}

#[test]
fn or_inside_and_is_bracketed_by_precedence() {
    let query = select()
        .column(column::<Int>("t", "a"))
        .from_table("things", "t")
        .filter(col_eq("t", "a", 1).and(col_eq("t", "b", 2).or(col_eq("t", "c", 3))))
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT t.a FROM things t WHERE (t.a = 1) AND ((t.b = 2) OR (t.c = 3))"
    );
}

#[test]
fn and_inside_or_is_bracketed_by_special_case() {
    // AND binds tighter than OR, so raw precedence would not demand
    // brackets here; the renderer inserts them anyway.
    let query = select()
        .column(column::<Int>("t", "a"))
        .from_table("things", "t")
        .filter(col_eq("t", "a", 1).and(col_eq("t", "b", 2)).or(col_eq("t", "c", 3)))
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT t.a FROM things t WHERE ((t.a = 1) AND (t.b = 2)) OR (t.c = 3)"
    );
}

#[test]
fn not_brackets_its_junction_operand() {
    let query = select()
        .column(column::<Int>("t", "a"))
        .from_table("things", "t")
        .filter(col_eq("t", "a", 1).or(col_eq("t", "b", 2)).negate())
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT t.a FROM things t WHERE NOT ((t.a = 1) OR (t.b = 2))"
    );
}

#[test]
fn variadic_concat_folds_through_binary_template() {
    let query = select()
        .column(concat([lit("a"), lit("b"), lit("c")]))
        .from_dual("d")
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(rendered.sql, "SELECT 'a' || 'b' || 'c' FROM dual d");
}

#[test]
fn eq_nullable_renders_three_valued_equality() {
    let a = column::<Text>("t", "a");
    let b = column::<Text>("t", "b");
    let query = select()
        .column(column::<Int>("t", "id"))
        .from_table("things", "t")
        .filter(a.eq_nullable(&b))
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT t.id FROM things t WHERE (t.a = t.b) OR (t.a IS NULL AND t.b IS NULL)"
    );
}

#[test]
fn bind_positions_follow_emission_order() {
    let query = select()
        .column(column::<Int>("t", "id"))
        .from_table("things", "t")
        .filter(column::<Int>("t", "x").eq(&bind::<Int>("x")))
        .filter(column::<Int>("t", "y").eq(&bind::<Int>("y")))
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT t.id FROM things t WHERE (t.x = ?) AND (t.y = ?)"
    );
    assert_eq!(rendered.bind_positions.len(), 2);
    assert_eq!(rendered.bind_positions[0].name, "x");
    assert_eq!(rendered.bind_positions[0].positions, vec![1]);
    assert_eq!(rendered.bind_positions[1].name, "y");
    assert_eq!(rendered.bind_positions[1].positions, vec![2]);
}

#[test]
fn repeated_bind_name_collects_every_position() {
    let query = select()
        .column(column::<Int>("t", "id"))
        .from_table("things", "t")
        .filter(column::<Int>("t", "x").eq(&bind_with::<Int, _>("v", 5i64)))
        .filter(column::<Int>("t", "y").eq(&bind::<Int>("v")))
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(rendered.bind_positions.len(), 1);
    assert_eq!(rendered.bind_positions[0].positions, vec![1, 2]);
    // The unified declaration keeps the one supplied value.
    let var = &rendered.binds["v"];
    assert_eq!(var.value, Some(crate::types::Value::Int(5)));
}

#[test]
fn subquery_source_is_bracketed_and_aliased() {
    let inner = select()
        .column(column::<Int>("u", "id"))
        .from_table("users", "u")
        .build()
        .unwrap();

    let query = select()
        .column(column::<Int>("s", "id"))
        .from_select(inner, "s")
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT s.id FROM (SELECT u.id FROM users u) s"
    );
}

#[test]
fn arithmetic_brackets_follow_argument_positions() {
    let a = column::<Int>("t", "a");
    let b = column::<Int>("t", "b");
    let c = column::<Int>("t", "c");

    let query = select()
        .column(a.sub(&b.add(&c)))
        .from_table("things", "t")
        .build()
        .unwrap();

    let rendered = render_select(&query, &TemplateMap::standard()).unwrap();
    assert_eq!(rendered.sql, "SELECT t.a - (t.b + t.c) FROM things t");
}

#[test]
fn missing_template_fails_fast() {
    let query = select()
        .column(concat([lit("a"), lit("b")]))
        .from_dual("d")
        .build()
        .unwrap();

    let empty = TemplateMap::new();
    assert!(matches!(
        render_select(&query, &empty),
        Err(Error::UnknownTemplate(FuncOp::Concat))
    ));
}
