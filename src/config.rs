//! Query files.
//!
//! A query file describes a whole statement as data, in TOML or JSON:
//!
//! ```toml
//! sql = "SELECT * FROM users"
//! group = "dept"
//! limit = 10
//!
//! [[criteria]]
//! field = "status"
//! value = "active"
//!
//! [[criteria]]
//! field = "age"
//! op = ">="
//! value = 21
//! conjunction = "OR"
//!
//! [[order_by]]
//! column = "name"
//! direction = "DESC"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ast::{CriterionSet, SortOrder};
use crate::error::{CritError, CritResult};
use crate::query::Query;

/// One ORDER BY column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortOrder,
}

/// A statement described as data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryFile {
    /// Base statement the clauses are appended to.
    pub sql: String,
    #[serde(default)]
    pub criteria: CriterionSet,
    /// Continue an existing WHERE clause with AND.
    #[serde(default)]
    pub append: bool,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub order_by: Vec<OrderSpec>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl QueryFile {
    /// Load a query file, choosing the format by extension (`.toml` or `.json`).
    pub fn load(path: impl AsRef<Path>) -> CritResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> CritResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            other => {
                return Err(CritError::Config(format!(
                    "unsupported query file extension {:?} for {} (expected .toml or .json)",
                    other.unwrap_or(""),
                    path.display()
                )));
            }
        };

        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded query file");
        parse(&content)
    }

    pub fn from_toml_str(content: &str) -> CritResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> CritResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the query: WHERE, GROUP BY, ORDER BY, LIMIT, in that order.
    pub fn build(&self) -> Query {
        let order_by: Vec<(&str, SortOrder)> = self
            .order_by
            .iter()
            .map(|o| (o.column.as_str(), o.direction))
            .collect();

        let mut query = Query::new(self.sql.as_str());
        query
            .filter(Some(&self.criteria), self.append)
            .group(self.group.as_deref())
            .order(self.order.as_deref())
            .order_multi((!order_by.is_empty()).then_some(order_by.as_slice()))
            .limit(self.limit, self.offset);
        query
    }
}
