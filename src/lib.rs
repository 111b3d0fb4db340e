//! # quarry — typed SQL SELECT construction and rendering
//!
//! > **Stop concatenating strings. Assemble your queries.**
//!
//! quarry builds SQL SELECT statements from typed, composable pieces
//! and compiles them into parameterized SQL text plus an ordered
//! bind-variable list.
//!
//! ## Quick Example
//!
//! ```rust
//! use quarry::prelude::*;
//! use quarry::types::marker::{Int, Text};
//!
//! # fn main() -> quarry::Result<()> {
//! let id = column::<Int>("u", "id");
//!
//! let query = select()
//!     .column(id.clone())
//!     .column(column::<Text>("u", "name"))
//!     .from_table("users", "u")
//!     .filter(id.eq(&bind::<Int>("id")))
//!     .build()?;
//!
//! let rendered = render_select(&query, &TemplateMap::standard())?;
//! assert_eq!(rendered.sql, "SELECT u.id, u.name FROM users u WHERE (u.id = ?)");
//! assert_eq!(rendered.bind_positions[0].positions, vec![1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pieces
//!
//! | Module | Role |
//! |--------|------------------------------------------|
//! | `ast` | immutable expression/condition/select nodes and builders |
//! | `bind` | bind variables and the name-unification combiner |
//! | `render` | template-driven SQL text generation |
//! | `stmt` | statement factory over external connection capabilities |

pub mod ast;
pub mod bind;
pub mod error;
pub mod render;
pub mod stmt;
pub mod types;

pub use error::{Error, Result};
pub use render::render_select;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{Condition, ExprNode, FromElement, FuncOp, Select, SelectColumn};
    pub use crate::bind::{BindVariable, BindWithPos};
    pub use crate::error::{Error, Result};
    pub use crate::render::{render_select, Rendered, TemplateMap};
    pub use crate::stmt::{Connection, Prepared, Row, RowCursor, Statement, TypeAdapter};
    pub use crate::types::{SqlType, Value};
}
