//! Fluent query builder.
//!
//! A [`Query`] owns one growing SQL string. Every method appends to it and
//! hands back the same builder, so calls chain:
//!
//! ```
//! use critsql::prelude::*;
//!
//! let criteria = CriterionSet::new()
//!     .with(Criterion::equals("status", "active"))
//!     .with(Criterion::new("age", ">=", 21));
//!
//! let mut query = Query::new("SELECT * FROM users");
//! query
//!     .filter(Some(&criteria), false)
//!     .order(Some("name"))
//!     .limit(Some(10), None);
//!
//! assert_eq!(
//!     query.sql(),
//!     "SELECT * FROM users WHERE  status = 'active' AND  age >= 21  ORDER BY name LIMIT 10"
//! );
//! ```
//!
//! Text is only ever appended, never rewritten. Malformed input turns a call
//! into a no-op instead of an error.

use std::fmt::Write;

use crate::ast::{CriterionSet, SortOrder};
use crate::transpiler::{assemble, ToSql};

/// Accumulating SQL text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    sql: String,
}

impl Query {
    /// Start from a base statement such as `SELECT * FROM users`.
    pub fn new(base: impl Into<String>) -> Self {
        Self { sql: base.into() }
    }

    /// The SQL accumulated so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }

    /// Append formatted text.
    ///
    /// ```
    /// use critsql::Query;
    ///
    /// let mut q = Query::new("SELECT 1");
    /// q.append(format_args!(" LIMIT {}", 3));
    /// assert_eq!(q.sql(), "SELECT 1 LIMIT 3");
    /// ```
    pub fn append(&mut self, args: std::fmt::Arguments<'_>) -> &mut Self {
        // Writing into a String cannot fail.
        let _ = self.sql.write_fmt(args);
        self
    }

    /// Append ` GROUP BY <expr>`.
    pub fn group(&mut self, expr: Option<&str>) -> &mut Self {
        match expr {
            Some(expr) => self.append(format_args!(" GROUP BY {}", expr)),
            None => self,
        }
    }

    /// Append ` ORDER BY <expr>`.
    ///
    /// Skipped when the expression is missing, blank, or contains the text
    /// `undefined` (an unfilled template upstream).
    pub fn order(&mut self, expr: Option<&str>) -> &mut Self {
        let Some(expr) = expr else {
            return self;
        };
        if expr.contains("undefined") || expr.trim().is_empty() {
            tracing::debug!(expr, "ignoring unusable ORDER BY expression");
            return self;
        }
        self.append(format_args!(" ORDER BY {}", expr))
    }

    /// Append ` ORDER BY c1 D1, c2 D2, ...` in the given column order.
    pub fn order_multi(&mut self, columns: Option<&[(&str, SortOrder)]>) -> &mut Self {
        let Some(columns) = columns else {
            return self;
        };
        let order = columns
            .iter()
            .map(|(col, dir)| format!("{} {}", col, dir))
            .collect::<Vec<_>>()
            .join(", ");
        self.append(format_args!(" ORDER BY {}", order))
    }

    /// Append ` LIMIT <count>` and, when given, ` OFFSET <offset>`.
    pub fn limit(&mut self, count: Option<u64>, offset: Option<u64>) -> &mut Self {
        match (count, offset) {
            (None, _) => self,
            (Some(count), None) => self.append(format_args!(" LIMIT {}", count)),
            (Some(count), Some(offset)) => {
                self.append(format_args!(" LIMIT {} OFFSET {}", count, offset))
            }
        }
    }

    /// Append a WHERE clause built from `criteria`.
    ///
    /// With `append` set the clause opens with ` AND ` instead of ` WHERE `,
    /// extending a WHERE clause already present in the base statement.
    /// An empty set leaves the query untouched.
    pub fn filter(&mut self, criteria: Option<&CriterionSet>, append: bool) -> &mut Self {
        let Some(criteria) = criteria else {
            return self;
        };
        let clause = assemble(criteria, append);
        if clause.is_empty() {
            return self;
        }
        self.sql.push_str(&clause);
        self
    }

    /// Append ` ORDER BY <expr> LIMIT 1 `.
    pub fn first(&mut self, expr: &str) -> &mut Self {
        self.append(format_args!(" ORDER BY {} LIMIT 1 ", expr))
    }

    /// Append ` ORDER BY <expr> DESC LIMIT 1 `.
    pub fn last(&mut self, expr: &str) -> &mut Self {
        self.append(format_args!(" ORDER BY {} DESC LIMIT 1 ", expr))
    }
}

impl ToSql for Query {
    fn to_sql(&self) -> String {
        self.sql.clone()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Criterion;

    fn base() -> Query {
        Query::new("SELECT * FROM t")
    }

    #[test]
    fn test_group() {
        assert_eq!(base().group(None).sql(), "SELECT * FROM t");
        assert_eq!(base().group(Some("dept")).sql(), "SELECT * FROM t GROUP BY dept");
    }

    #[test]
    fn test_order_guards() {
        assert_eq!(base().order(None).sql(), "SELECT * FROM t");
        assert_eq!(base().order(Some("   ")).sql(), "SELECT * FROM t");
        assert_eq!(base().order(Some("undefined DESC")).sql(), "SELECT * FROM t");
        assert_eq!(
            base().order(Some("created_at DESC")).sql(),
            "SELECT * FROM t ORDER BY created_at DESC"
        );
    }

    #[test]
    fn test_order_multi() {
        let cols = [("name", SortOrder::Asc), ("id", SortOrder::Desc)];
        assert_eq!(
            base().order_multi(Some(&cols)).sql(),
            "SELECT * FROM t ORDER BY name ASC, id DESC"
        );
        assert_eq!(base().order_multi(None).sql(), "SELECT * FROM t");
    }

    #[test]
    fn test_limit() {
        assert_eq!(base().limit(Some(10), Some(5)).sql(), "SELECT * FROM t LIMIT 10 OFFSET 5");
        assert_eq!(base().limit(Some(10), None).sql(), "SELECT * FROM t LIMIT 10");
        assert_eq!(base().limit(None, Some(5)).sql(), "SELECT * FROM t");
    }

    #[test]
    fn test_filter_none_and_empty() {
        assert_eq!(base().filter(None, false).sql(), "SELECT * FROM t");
        assert_eq!(
            base().filter(Some(&CriterionSet::new()), true).sql(),
            "SELECT * FROM t"
        );
    }

    #[test]
    fn test_filter_append_mode() {
        let set = CriterionSet::new().with(Criterion::equals("b", 2));
        let mut q = Query::new("SELECT * FROM t WHERE a = 1");
        q.filter(Some(&set), true);
        assert_eq!(q.sql(), "SELECT * FROM t WHERE a = 1 AND  b = 2 ");
    }

    #[test]
    fn test_first_last() {
        assert_eq!(base().first("id").sql(), "SELECT * FROM t ORDER BY id LIMIT 1 ");
        assert_eq!(base().last("id").sql(), "SELECT * FROM t ORDER BY id DESC LIMIT 1 ");
    }

    #[test]
    fn test_append_only() {
        let mut q = base();
        let mut seen = q.sql().to_string();
        q.group(Some("a"));
        assert!(q.sql().starts_with(&seen));
        seen = q.sql().to_string();
        q.order(Some("a"));
        assert!(q.sql().starts_with(&seen));
        seen = q.sql().to_string();
        q.limit(Some(1), None);
        assert!(q.sql().starts_with(&seen));
        assert_eq!(q.to_string(), "SELECT * FROM t GROUP BY a ORDER BY a LIMIT 1");
    }
}
