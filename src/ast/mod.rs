//! Criterion data model.
//!
//! A [`Criterion`] is one `field <op> value` filter with its joiner and
//! optional grouping decorations. A [`CriterionSet`] keeps them in the order
//! they will appear in the WHERE clause.

pub mod operators;
pub mod values;

pub use operators::*;
pub use values::*;

use serde::Deserialize;

/// One filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
    pub conjunction: Conjunction,
    /// Text placed before the field, typically `(`.
    pub left: String,
    /// Text placed after the value, typically `)`.
    pub right: String,
}

impl Criterion {
    /// Create an `AND`-joined criterion from an operator token.
    ///
    /// ```
    /// use critsql::ast::{Criterion, Operator};
    ///
    /// let c = Criterion::new("age", ">=", 21);
    /// assert_eq!(c.operator, Operator::Gte);
    /// ```
    pub fn new(field: impl Into<String>, op: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: op.into(),
            value: value.into(),
            conjunction: Conjunction::And,
            left: String::new(),
            right: String::new(),
        }
    }

    /// Shorthand for an `=` criterion.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn or(mut self) -> Self {
        self.conjunction = Conjunction::Or;
        self
    }

    pub fn conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    /// Open a parenthesized group before this criterion.
    pub fn open(mut self) -> Self {
        self.left.push('(');
        self
    }

    /// Close a parenthesized group after this criterion.
    pub fn close(mut self) -> Self {
        self.right.push(')');
        self
    }

    /// Set arbitrary decorations.
    pub fn decorate(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left = left.into();
        self.right = right.into();
        self
    }
}

/// Serialized shape of a criterion.
///
/// Accepts the field names legacy callers send (`op`, `prependChars`,
/// `appendChars`). The value stays raw until conversion so an unusable
/// value drops one criterion instead of failing the whole set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionSpec {
    pub field: String,
    #[serde(default, alias = "operator")]
    pub op: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub conjunction: Option<String>,
    #[serde(default, alias = "left")]
    pub prepend_chars: Option<String>,
    #[serde(default, alias = "right")]
    pub append_chars: Option<String>,
}

impl CriterionSpec {
    /// Convert into a [`Criterion`], `None` if the value has no SQL literal form.
    pub fn into_criterion(self) -> Option<Criterion> {
        let Some(value) = Value::from_json(&self.value) else {
            tracing::warn!(
                field = %self.field,
                value = %self.value,
                "skipping criterion with unrenderable value"
            );
            return None;
        };

        let conjunction = match self.conjunction.as_deref().map(str::trim) {
            None | Some("") => Conjunction::And,
            Some(text) => match text.parse() {
                Ok(conjunction) => conjunction,
                Err(e) => {
                    tracing::warn!(field = %self.field, error = %e, "skipping criterion");
                    return None;
                }
            },
        };

        Some(Criterion {
            field: self.field,
            operator: self.op.as_deref().map(Operator::resolve).unwrap_or_default(),
            value,
            conjunction,
            left: self.prepend_chars.unwrap_or_default(),
            right: self.append_chars.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CriterionSetRepr {
    List(Vec<CriterionSpec>),
    Wrapped { criteria: Vec<CriterionSpec> },
}

/// Ordered criteria for one WHERE clause.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "CriterionSetRepr")]
pub struct CriterionSet {
    pub criteria: Vec<Criterion>,
}

impl CriterionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a criterion (builder style).
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.criteria.iter()
    }
}

impl From<CriterionSetRepr> for CriterionSet {
    fn from(repr: CriterionSetRepr) -> Self {
        let specs = match repr {
            CriterionSetRepr::List(specs) => specs,
            CriterionSetRepr::Wrapped { criteria } => criteria,
        };
        specs
            .into_iter()
            .filter_map(CriterionSpec::into_criterion)
            .collect()
    }
}

impl From<Vec<Criterion>> for CriterionSet {
    fn from(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }
}

impl FromIterator<Criterion> for CriterionSet {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CriterionSet {
    type Item = Criterion;
    type IntoIter = std::vec::IntoIter<Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.into_iter()
    }
}

impl<'a> IntoIterator for &'a CriterionSet {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}
