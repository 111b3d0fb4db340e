//! Bind variables and the combiner that unifies same-named occurrences.
//!
//! The same bind name may appear in several expression subtrees (one
//! value compared against two columns, for instance). Before a
//! statement can be rendered those occurrences must collapse into one
//! canonical declaration per name; `BindCombiner` performs that
//! unification and rejects genuinely conflicting uses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{SqlType, Value};

/// A named, typed placeholder whose value is supplied separately from
/// the SQL text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindVariable {
    /// Unique key within a statement.
    pub name: String,
    /// Declared logical type.
    pub ty: SqlType,
    /// Bound value, if one was supplied at construction.
    pub value: Option<Value>,
}

impl BindVariable {
    /// A bind with no value; the value must be supplied before execute.
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
            value: None,
        }
    }

    /// A bind carrying its value.
    pub fn with_value(name: impl Into<String>, ty: SqlType, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            ty,
            value: Some(value.into()),
        }
    }

    /// Unify this bind with another occurrence of the same name.
    ///
    /// Types: identical stays; a sub/supertype pair keeps the more
    /// specific; unrelated types conflict. Values: a single non-null
    /// value wins over none, equal values stay, differing non-null
    /// values conflict. A kept value must be an instance of the
    /// resolved type.
    fn combine(&self, incoming: &BindVariable) -> Result<BindVariable> {
        debug_assert_eq!(self.name, incoming.name);

        let ty = if self.ty == incoming.ty {
            self.ty
        } else if self.ty.accepts(incoming.ty) {
            incoming.ty
        } else if incoming.ty.accepts(self.ty) {
            self.ty
        } else {
            return Err(Error::BindTypeConflict {
                name: self.name.clone(),
                existing: self.ty,
                incoming: incoming.ty,
            });
        };

        let value = match (&self.value, &incoming.value) {
            (None, None) => None,
            (Some(v), None) | (None, Some(v)) => {
                if !v.is_instance_of(ty) {
                    return Err(Error::BindTypeConflict {
                        name: self.name.clone(),
                        existing: ty,
                        incoming: v.sql_type(),
                    });
                }
                Some(v.clone())
            }
            (Some(a), Some(b)) if a == b => Some(a.clone()),
            (Some(a), Some(b)) => {
                return Err(Error::BindValueConflict {
                    name: self.name.clone(),
                    existing: a.clone(),
                    incoming: b.clone(),
                });
            }
        };

        Ok(BindVariable {
            name: self.name.clone(),
            ty,
            value,
        })
    }
}

/// Merges bind occurrences collected while walking AST fragments into
/// one canonical `BindVariable` per name.
///
/// One combiner instance serves exactly one build or render pass.
/// Successful merges are order-independent; failures indicate a
/// conflicting use of the name and are not recoverable.
#[derive(Debug, Default)]
pub struct BindCombiner {
    vars: HashMap<String, BindVariable>,
}

impl BindCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one occurrence into the map.
    pub fn add(&mut self, var: &BindVariable) -> Result<()> {
        let merged = match self.vars.get(&var.name) {
            Some(existing) => existing.combine(var)?,
            None => var.clone(),
        };
        self.vars.insert(merged.name.clone(), merged);
        Ok(())
    }

    /// The canonical bind for `name`, if any occurrence was added.
    pub fn get(&self, name: &str) -> Option<&BindVariable> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The canonical name -> bind map for rendering.
    pub fn into_map(self) -> HashMap<String, BindVariable> {
        self.vars
    }
}

/// One bind name with every 1-based `?` position it occupies in the
/// rendered text, in left-to-right emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindWithPos {
    pub name: String,
    pub positions: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn combine2(a: &BindVariable, b: &BindVariable) -> Result<BindVariable> {
        let mut combiner = BindCombiner::new();
        combiner.add(a)?;
        combiner.add(b)?;
        Ok(combiner.get(&a.name).unwrap().clone())
    }

    #[test]
    fn subtype_wins_and_value_sticks() {
        let broad = BindVariable::new("x", SqlType::Number);
        let narrow = BindVariable::with_value("x", SqlType::Int, 5i64);

        let merged = combine2(&broad, &narrow).unwrap();
        assert_eq!(merged.ty, SqlType::Int);
        assert_eq!(merged.value, Some(Value::Int(5)));
    }

    #[test]
    fn differing_values_conflict() {
        let a = BindVariable::with_value("x", SqlType::Int, 5i64);
        let b = BindVariable::with_value("x", SqlType::Int, 7i64);

        assert!(matches!(
            combine2(&a, &b),
            Err(Error::BindValueConflict { .. })
        ));
    }

    #[test]
    fn unrelated_types_conflict() {
        let a = BindVariable::with_value("x", SqlType::Text, "a");
        let b = BindVariable::with_value("x", SqlType::Int, 1i64);

        assert!(matches!(
            combine2(&a, &b),
            Err(Error::BindTypeConflict { .. })
        ));
    }

    #[test]
    fn merge_is_order_independent() {
        let broad = BindVariable::new("x", SqlType::Number);
        let narrow = BindVariable::with_value("x", SqlType::Int, 5i64);

        let forward = combine2(&broad, &narrow).unwrap();
        let reverse = combine2(&narrow, &broad).unwrap();
        assert_eq!(forward, reverse);

        // Error cases keep their class when the order flips.
        let a = BindVariable::with_value("y", SqlType::Int, 1i64);
        let b = BindVariable::with_value("y", SqlType::Int, 2i64);
        assert!(matches!(
            combine2(&a, &b),
            Err(Error::BindValueConflict { .. })
        ));
        assert!(matches!(
            combine2(&b, &a),
            Err(Error::BindValueConflict { .. })
        ));
    }

    #[test]
    fn equal_values_merge() {
        let a = BindVariable::with_value("x", SqlType::Text, "a");
        let b = BindVariable::with_value("x", SqlType::Text, "a");

        let merged = combine2(&a, &b).unwrap();
        assert_eq!(merged.value, Some(Value::Text("a".into())));
    }

    #[test]
    fn value_must_fit_resolved_type() {
        // Declared text with no value, then a numeric occurrence whose
        // declared type is unrelated to the carried value.
        let typed = BindVariable::new("x", SqlType::Int);
        let valued = BindVariable {
            name: "x".into(),
            ty: SqlType::Int,
            value: Some(Value::Text("oops".into())),
        };

        assert!(matches!(
            combine2(&typed, &valued),
            Err(Error::BindTypeConflict { .. })
        ));
    }
}
