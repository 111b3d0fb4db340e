pub mod builders;
pub mod condition;
pub mod expr;
pub mod select;

pub use self::condition::Condition;
pub use self::expr::{ExprNode, FuncOp};
pub use self::select::{FromElement, Select, SelectColumn};
