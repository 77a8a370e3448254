//! Criterion renderer and predicate assembler.
//!
//! Turns [`Criterion`] values into literal SQL predicate text and joins a
//! [`CriterionSet`] into a `WHERE` (or continuing `AND`) clause.

use crate::ast::*;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

impl ToSql for Criterion {
    fn to_sql(&self) -> String {
        self.to_fragment(true)
    }
}

impl ToSql for CriterionSet {
    fn to_sql(&self) -> String {
        assemble(self, false)
    }
}

impl Criterion {
    /// Render this criterion as one predicate fragment.
    ///
    /// Layout is `<conj> <left> <field> <op> <value> <right>`, where the
    /// conjunction (and its trailing space) is only present when
    /// `is_first` is false. Empty decorations still keep their separating
    /// spaces.
    pub fn to_fragment(&self, is_first: bool) -> String {
        let (op, operand) = self.operands();
        let prefix = if is_first {
            String::new()
        } else {
            format!("{} ", self.conjunction)
        };
        format!(
            "{}{} {} {} {} {}",
            prefix, self.left, self.field, op, operand, self.right
        )
    }

    /// Pick the operator text and right-hand operand. First match wins.
    fn operands(&self) -> (&'static str, String) {
        let op = self.operator;

        // NULL checks: value goes in verbatim
        if op.is_identity() {
            let text = self.value.to_string();
            if text.contains("NULL") {
                return (op.sql_symbol(), text);
            }
        }

        if op.is_membership() {
            return (op.sql_symbol(), format!("({})", unquoted(&self.value)));
        }

        match &self.value {
            Value::DateTime(dt) if op == Operator::Eq => {
                let (start, end) = dt.day_window();
                (
                    "BETWEEN",
                    format!(
                        "'{}' AND '{}'",
                        format_sql_date(start),
                        format_sql_date(end)
                    ),
                )
            }
            Value::DateTime(dt) => (op.sql_symbol(), format!("'{}'", dt.to_sql_date())),
            Value::List(_) => (op.sql_symbol(), format!("({})", self.value.join(", "))),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
                (op.sql_symbol(), unquoted(&self.value))
            }
            Value::Text(s) => (op.sql_symbol(), format!("'{}'", s)),
        }
    }
}

/// Value text written without quotes. Booleans become `1` / `0`; list
/// elements keep their own text.
fn unquoted(value: &Value) -> String {
    match value {
        Value::Bool(b) => u8::from(*b).to_string(),
        other => other.to_string(),
    }
}

/// Join a criterion set into a clause.
///
/// Returns an empty string for an empty set. Otherwise the clause starts
/// with ` WHERE ` or, in append mode, ` AND ` so it can extend a WHERE
/// clause that was written elsewhere. Exactly one space separates
/// consecutive fragments.
pub fn assemble(set: &CriterionSet, append: bool) -> String {
    if set.is_empty() {
        return String::new();
    }

    let mut clause = String::new();
    for (i, criterion) in set.iter().enumerate() {
        let fragment = criterion.to_fragment(i == 0);
        tracing::trace!(field = %criterion.field, fragment = %fragment, "rendered criterion");

        if !clause.is_empty() && !clause.ends_with(char::is_whitespace) {
            clause.push(' ');
        }
        clause.push_str(&fragment);
    }

    let keyword = if append { " AND " } else { " WHERE " };
    tracing::debug!(criteria = set.len(), append, "assembled clause");
    format!("{}{}", keyword, clause)
}
