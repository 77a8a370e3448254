use critsql::prelude::*;
use pretty_assertions::assert_eq;

fn users() -> Query {
    Query::new("SELECT * FROM users")
}

#[test]
fn test_where_status_and_age() {
    let criteria = CriterionSet::new()
        .with(Criterion::new("status", "=", "active"))
        .with(Criterion::new("age", ">=", 21).conjunction(Conjunction::And));

    let mut query = Query::new("");
    query.filter(Some(&criteria), false);
    assert_eq!(query.sql(), " WHERE  status = 'active' AND  age >= 21 ");
}

#[test]
fn test_full_chain() {
    let criteria = CriterionSet::new()
        .with(Criterion::new("deleted_at", "IS", "NULL"))
        .with(Criterion::new("role", "IN", vec!["'admin'", "'mod'"]).open())
        .with(Criterion::new("karma", ">", 100).or().close());

    let mut query = users();
    query
        .filter(Some(&criteria), false)
        .group(Some("dept"))
        .order_multi(Some(&[("name", SortOrder::Asc), ("id", SortOrder::Desc)]))
        .limit(Some(10), Some(5));

    assert_eq!(
        query.into_sql(),
        "SELECT * FROM users WHERE  deleted_at IS NULL AND ( role IN ('admin','mod') OR  karma > 100 ) GROUP BY dept ORDER BY name ASC, id DESC LIMIT 10 OFFSET 5"
    );
}

#[test]
fn test_empty_criteria_leave_query_unchanged() {
    let mut query = users();
    query.filter(Some(&CriterionSet::new()), false).filter(None, true);
    assert_eq!(query.sql(), "SELECT * FROM users");
}

#[test]
fn test_append_mode_extends_existing_where() {
    let criteria = CriterionSet::new().with(Criterion::new("age", "<", 65));

    let mut query = Query::new("SELECT * FROM users WHERE org_id = 3");
    query.filter(Some(&criteria), true);
    assert_eq!(query.sql(), "SELECT * FROM users WHERE org_id = 3 AND  age < 65 ");

    let mut query = users();
    query.filter(Some(&criteria), false);
    assert_eq!(query.sql(), "SELECT * FROM users WHERE  age < 65 ");
}

#[test]
fn test_date_equality_day_range() {
    let criteria =
        CriterionSet::new().with(Criterion::new("created_at", "=", "2021-06-15T10:00:00Z"));
    let clause = assemble(&criteria, false);

    assert!(clause.contains("BETWEEN"));
    assert_eq!(
        clause,
        " WHERE  created_at BETWEEN '2021-06-15 10:00AM' AND '2021-06-16 9:59AM' "
    );
}

#[test]
fn test_scalars_quoting() {
    for (value, expected) in [
        (Value::from(42), " n = 42 "),
        (Value::from(-1.25), " n = -1.25 "),
        (Value::from(false), " n = 0 "),
        (Value::from(true), " n = 1 "),
        (Value::from("it"), " n = 'it' "),
    ] {
        assert_eq!(Criterion::equals("n", value).to_sql(), expected);
    }
}

#[test]
fn test_only_later_fragments_carry_their_conjunction() {
    let set = parse_criteria(["a = 1", "| b = 2", "& c = 3", "OR d = 4"]).unwrap();
    assert_eq!(
        set.to_sql(),
        " WHERE  a = 1 OR  b = 2 AND  c = 3 OR  d = 4 "
    );
}

#[test]
fn test_unknown_operator_defaults_to_equals() {
    let criterion = Criterion::new("name", "LIKE", "bob");
    assert_eq!(criterion.to_sql(), " name = 'bob' ");
}

#[test]
fn test_order_guards() {
    let mut query = users();
    query
        .order(None)
        .order(Some(""))
        .order(Some("undefined"))
        .order(Some("id"));
    assert_eq!(query.sql(), "SELECT * FROM users ORDER BY id");
}

#[test]
fn test_first_and_last() {
    let mut query = users();
    query.first("created_at");
    assert_eq!(query.sql(), "SELECT * FROM users ORDER BY created_at LIMIT 1 ");

    let mut query = users();
    query.last("created_at");
    assert_eq!(query.sql(), "SELECT * FROM users ORDER BY created_at DESC LIMIT 1 ");
}

#[test]
fn test_parsed_criteria_render_like_built_ones() {
    let parsed = parse_criteria(["( status = active", "| age >= 21 )"]).unwrap();
    let built = CriterionSet::new()
        .with(Criterion::equals("status", "active").open())
        .with(Criterion::new("age", ">=", 21).or().close());
    assert_eq!(parsed, built);
    assert_eq!(
        parsed.to_sql(),
        " WHERE ( status = 'active' OR  age >= 21 )"
    );
}

#[test]
fn test_query_file_from_legacy_json() {
    let file = QueryFile::from_json_str(
        r#"{
            "sql": "SELECT id FROM orders",
            "criteria": [
                { "field": "status", "op": "!", "value": "void" },
                { "field": "note", "value": null },
                { "field": "total", "op": ">", "value": 9.5, "conjunction": "AND" }
            ],
            "limit": 1
        }"#,
    )
    .unwrap();

    assert_eq!(
        file.build().sql(),
        "SELECT id FROM orders WHERE  status != 'void' AND  total > 9.5  LIMIT 1"
    );
}
