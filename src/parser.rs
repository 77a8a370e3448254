//! Criterion expression parser using nom.
//!
//! Parses the compact one-line form of a criterion used on the command line.
//!
//! # Syntax Overview
//!
//! ```text
//! | ( role = 'admin' )
//! ┬ ┬ ──┬─ ┬ ───┬─── ┬
//! │ │   │  │    │    └── Right decoration
//! │ │   │  │    └── Value (bare, quoted, or [list])
//! │ │   │  └── Operator token
//! │ │   └── Field
//! │ └── Left decoration
//! └── Conjunction (| or OR, & or AND)
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{map, not, opt, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::ast::*;
use crate::error::{CritError, CritResult};

/// Parse a single criterion expression.
///
/// # Example
///
/// ```
/// use critsql::parser::parse_criterion;
/// use critsql::ast::{Conjunction, Operator, Value};
///
/// let c = parse_criterion("| age >= 21").unwrap();
/// assert_eq!(c.conjunction, Conjunction::Or);
/// assert_eq!(c.operator, Operator::Gte);
/// assert_eq!(c.value, Value::Int(21));
/// ```
pub fn parse_criterion(input: &str) -> CritResult<Criterion> {
    let input = input.trim();

    match parse_expression(input) {
        Ok(("", criterion)) => Ok(criterion),
        Ok((remaining, _)) => Err(CritError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) if e.input.starts_with('(') => Err(CritError::parse(
            input.len() - e.input.len(),
            "Parenthesized values are not supported, write lists as [a, b]",
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(CritError::parse(
            input.len() - e.input.len(),
            format!("Expected {:?} near '{}'", e.code, e.input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(CritError::parse(input.len(), "Incomplete input")),
    }
}

/// Parse several criterion expressions, in order.
pub fn parse_criteria<'a, I>(inputs: I) -> CritResult<CriterionSet>
where
    I: IntoIterator<Item = &'a str>,
{
    inputs.into_iter().map(parse_criterion).collect()
}

/// Parse an ORDER BY list such as `name:asc,id:desc` or `name, id desc`.
///
/// A column without a direction sorts ascending.
pub fn parse_order(input: &str) -> CritResult<Vec<(String, SortOrder)>> {
    let mut columns = Vec::new();
    let mut position = 0;

    for item in input.split(',') {
        let mut parts = item
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|p| !p.is_empty());

        let Some(column) = parts.next() else {
            return Err(CritError::parse(position, "Empty ORDER BY column"));
        };
        let direction = match parts.next() {
            Some(dir) => dir
                .parse::<SortOrder>()
                .map_err(|e| CritError::parse(position, e.to_string()))?,
            None => SortOrder::Asc,
        };
        if let Some(extra) = parts.next() {
            return Err(CritError::parse(
                position,
                format!("Unexpected '{}' after sort direction", extra),
            ));
        }

        columns.push((column.to_string(), direction));
        position += item.len() + 1;
    }

    Ok(columns)
}

/// Parse the complete expression.
fn parse_expression(input: &str) -> IResult<&str, Criterion> {
    let (input, conjunction) = opt(parse_conjunction)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, left) = parse_decoration('(')(input)?;
    let (input, field) = parse_field(input)?;
    let (input, _) = multispace0(input)?;
    let (input, operator) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = parse_value(input)?;
    let (input, _) = multispace0(input)?;
    let (input, right) = parse_decoration(')')(input)?;

    Ok((
        input,
        Criterion {
            field: field.to_string(),
            operator,
            value,
            conjunction: conjunction.unwrap_or_default(),
            left,
            right,
        },
    ))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A keyword that is not immediately followed by another identifier character.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(word), not(satisfy(is_ident_char)))
}

/// Parse a leading conjunction: `|`, `&`, `OR`, `AND`.
fn parse_conjunction(input: &str) -> IResult<&str, Conjunction> {
    alt((
        value(Conjunction::Or, char('|')),
        value(Conjunction::And, char('&')),
        value(Conjunction::Or, terminated(tag_no_case("OR"), multispace1)),
        value(Conjunction::And, terminated(tag_no_case("AND"), multispace1)),
    ))(input)
}

/// Parse a run of decoration characters, ignoring whitespace between them.
fn parse_decoration<'a>(paren: char) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    map(many0(terminated(char(paren), multispace0)), |parens: Vec<char>| {
        parens.into_iter().collect()
    })
}

/// Parse a field name, optionally table-qualified or backtick-quoted.
fn parse_field(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| is_ident_char(c) || c == '.' || c == '`')(input)
}

/// Parse an operator token. Longer tokens are tried first.
fn parse_operator(input: &str) -> IResult<&str, Operator> {
    alt((
        value(
            Operator::IsNot,
            tuple((keyword("IS"), multispace1, keyword("NOT"))),
        ),
        value(Operator::Is, keyword("IS")),
        value(Operator::NotIn, keyword("!IN")),
        value(Operator::In, keyword("IN")),
        value(Operator::Gte, tag(">=")),
        value(Operator::Lte, tag("<=")),
        value(Operator::LtGt, tag("<>")),
        value(Operator::Ne, tag("!=")),
        value(Operator::Ne, char('!')),
        value(Operator::Eq, char('=')),
        value(Operator::Gt, char('>')),
        value(Operator::Lt, char('<')),
    ))(input)
}

/// Parse a value.
fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((
        map(parse_list, Value::List),
        map(parse_quoted, Value::classify),
        map(
            preceded(not(char('(')), take_while1(|c: char| c != ')')),
            |s: &str| bare_value(s.trim()),
        ),
    ))(input)
}

/// Parse a `[a, b, c]` list.
fn parse_list(input: &str) -> IResult<&str, Vec<Scalar>> {
    delimited(
        pair(char('['), multispace0),
        separated_list0(delimited(multispace0, char(','), multispace0), parse_scalar),
        pair(multispace0, char(']')),
    )(input)
}

fn parse_scalar(input: &str) -> IResult<&str, Scalar> {
    alt((
        map(parse_quoted, |s| Scalar::Text(s.to_string())),
        map(take_while1(|c: char| c != ',' && c != ']'), |s: &str| {
            bare_scalar(s.trim())
        }),
    ))(input)
}

/// Parse a single- or double-quoted string.
fn parse_quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))(input)
}

fn looks_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}

fn bare_scalar(s: &str) -> Scalar {
    if s.eq_ignore_ascii_case("true") {
        return Scalar::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Scalar::Bool(false);
    }
    if looks_numeric(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Scalar::Int(n);
        }
        // Overflowing literals such as 1e999 stay text.
        if let Ok(n) = s.parse::<f64>() {
            if n.is_finite() {
                return Scalar::Float(n);
            }
        }
    }
    Scalar::Text(s.to_string())
}

fn bare_value(s: &str) -> Value {
    match bare_scalar(s) {
        Scalar::Bool(b) => Value::Bool(b),
        Scalar::Int(n) => Value::Int(n),
        Scalar::Float(n) => Value::Float(n),
        Scalar::Text(s) => Value::classify(s),
    }
}
