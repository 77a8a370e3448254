//! # critsql — filters as data, SQL as text
//!
//! critsql turns structured filter criteria into literal SQL clause text
//! and appends it to a base statement through a fluent builder.
//!
//! ## Quick Example
//!
//! ```rust
//! use critsql::prelude::*;
//!
//! let criteria = CriterionSet::new()
//!     .with(Criterion::equals("status", "active"))
//!     .with(Criterion::new("created_at", "=", "2021-06-15T10:00:00Z").or());
//!
//! let mut query = Query::new("SELECT * FROM users");
//! query.filter(Some(&criteria), false).limit(Some(10), Some(5));
//!
//! assert_eq!(
//!     query.sql(),
//!     "SELECT * FROM users WHERE  status = 'active' \
//!      OR  created_at BETWEEN '2021-06-15 10:00AM' AND '2021-06-16 9:59AM'  LIMIT 10 OFFSET 5"
//! );
//! ```
//!
//! ## Operators
//!
//! | Token    | SQL      |
//! |----------|----------|
//! | `=`      | `=`      |
//! | `!` `!=` | `!=`     |
//! | `<>`     | `<>`     |
//! | `>` `<` `>=` `<=` | same |
//! | `IN`     | `IN`     |
//! | `!IN`    | `NOT IN` |
//! | `IS`     | `IS`     |
//! | `IS NOT` | `IS NOT` |
//!
//! Any other token falls back to `=`.

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod query;
pub mod transpiler;

pub use query::Query;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{OrderSpec, QueryFile};
    pub use crate::error::*;
    pub use crate::parser::{parse_criteria, parse_criterion, parse_order};
    pub use crate::query::Query;
    pub use crate::transpiler::{ToSql, assemble};
}

/// Parse a criterion expression.
///
/// # Example
///
/// ```
/// use critsql::parse;
///
/// let c = parse("age >= 21").unwrap();
/// assert_eq!(c.field, "age");
/// ```
pub fn parse(input: &str) -> Result<ast::Criterion, error::CritError> {
    parser::parse_criterion(input)
}
