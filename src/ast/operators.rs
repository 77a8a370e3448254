use serde::Deserialize;
use std::str::FromStr;

use crate::error::CritError;

/// Comparison operators accepted in a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Operator {
    /// Equal (=)
    #[default]
    Eq,
    /// Not equal (!, !=)
    Ne,
    /// Not equal, ANSI spelling (<>)
    LtGt,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
    /// Set membership (IN)
    In,
    /// Negated set membership (!IN)
    NotIn,
    /// IS, used with NULL
    Is,
    /// IS NOT, used with NULL
    IsNot,
}

impl Operator {
    /// Every accepted token and what it resolves to.
    pub const TOKENS: [(&'static str, Operator); 12] = [
        ("=", Operator::Eq),
        ("!", Operator::Ne),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        (">=", Operator::Gte),
        ("<=", Operator::Lte),
        ("!=", Operator::Ne),
        ("<>", Operator::LtGt),
        ("IN", Operator::In),
        ("!IN", Operator::NotIn),
        ("IS", Operator::Is),
        ("IS NOT", Operator::IsNot),
    ];

    /// Resolve a short operator token.
    ///
    /// Total: anything outside the token table resolves to [`Operator::Eq`].
    pub fn resolve(token: &str) -> Operator {
        let token = token.trim();
        match token {
            "=" => return Operator::Eq,
            "!" | "!=" => return Operator::Ne,
            ">" => return Operator::Gt,
            "<" => return Operator::Lt,
            ">=" => return Operator::Gte,
            "<=" => return Operator::Lte,
            "<>" => return Operator::LtGt,
            _ => {}
        }

        let keyword = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match keyword.as_str() {
            "IN" => Operator::In,
            "!IN" => Operator::NotIn,
            "IS" => Operator::Is,
            "IS NOT" => Operator::IsNot,
            _ => Operator::Eq,
        }
    }

    /// Returns the SQL text for this operator.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::LtGt => "<>",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }

    /// True for IN / NOT IN.
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// True for IS / IS NOT.
    pub fn is_identity(&self) -> bool {
        matches!(self, Operator::Is | Operator::IsNot)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_symbol())
    }
}

impl From<&str> for Operator {
    fn from(token: &str) -> Self {
        Operator::resolve(token)
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        Operator::resolve(&token)
    }
}

/// Boolean joiner placed in front of every fragment but the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl std::fmt::Display for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conjunction::And => write!(f, "AND"),
            Conjunction::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Conjunction {
    type Err = CritError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" | "&" => Ok(Conjunction::And),
            "OR" | "|" => Ok(Conjunction::Or),
            other => Err(CritError::InvalidValue(format!(
                "conjunction '{}' (expected AND or OR)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Conjunction {
    type Error = CritError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = CritError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(CritError::InvalidValue(format!(
                "sort direction '{}' (expected ASC or DESC)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = CritError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
