//! Column-list generation and the named-argument helpers, end to end.

use sqlrow::value::Value;
use sqlrow::{columns_of, record_args, Record, SqlQuery};

#[derive(Debug, Default, Record)]
struct Inner {
    #[sqlrow(col)]
    val: Option<String>,
}

#[derive(Debug, Default, Record)]
struct Outer {
    #[sqlrow(col)]
    val: String,
    #[sqlrow(nested)]
    nested: Option<Inner>,
}

#[derive(Debug, Default, Record)]
struct Innermost {
    #[sqlrow(col)]
    deep: String,
}

#[derive(Debug, Default, Record)]
struct Mid {
    #[sqlrow(nested)]
    inner: Innermost,
}

#[derive(Debug, Default, Record)]
struct Top {
    #[sqlrow(nested)]
    mid: Mid,
}

#[derive(Debug, Default, Record)]
struct Audit {
    #[sqlrow(col)]
    created_by: String,
}

#[derive(Debug, Default, Record)]
struct WithAudit {
    #[sqlrow(col)]
    id: i64,
    #[sqlrow(flatten)]
    audit: Audit,
    #[sqlrow(col = "-")]
    hidden: String,
    untagged: String,
}

#[test]
fn root_and_nested_selectors() {
    assert_eq!(
        columns_of::<Outer>(),
        r#""val", ("nested")."val" as "nested.val""#
    );
}

#[test]
fn deep_selectors_parenthesise_only_the_first_hop() {
    assert_eq!(
        columns_of::<Top>(),
        r#"("mid")."inner"."deep" as "mid.inner.deep""#
    );
}

#[test]
fn flattened_and_excluded_fields() {
    // Flattened fields render at the root; `-` and untagged fields are
    // invisible.
    assert_eq!(columns_of::<WithAudit>(), r#""id", "created_by""#);
}

#[test]
fn columns_of_is_idempotent() {
    assert_eq!(columns_of::<Outer>(), columns_of::<Outer>());
}

#[test]
fn wrap_select_cols_uses_the_alias_scheme() {
    let mut query = SqlQuery::new();
    query.append("select * from some_table", &[]);
    query.wrap_select_cols::<Outer>();

    assert_eq!(
        query.text,
        r#"with _ as (select * from some_table) select "val", ("nested")."val" as "nested.val" from _"#
    );
}

#[test]
fn record_args_collects_root_and_flattened_leaves() {
    let record = WithAudit {
        id: 42,
        audit: Audit {
            created_by: "admin".to_string(),
        },
        hidden: "hidden".to_string(),
        untagged: "untagged".to_string(),
    };

    let args = record_args(&record);
    let pairs: Vec<(String, Value)> = args
        .iter()
        .map(|arg| (arg.name.clone(), arg.value.clone()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("id".to_string(), Value::Int(42)),
            ("created_by".to_string(), Value::Text("admin".to_string())),
        ]
    );
}

#[test]
fn record_args_render_insert_fragment() {
    let record = WithAudit {
        id: 1,
        ..WithAudit::default()
    };

    let args = record_args(&record);
    assert_eq!(
        args.names_and_values_string(),
        r#"("id", "created_by") values ($1, $2)"#
    );
}

#[test]
fn record_args_skip_nested_records() {
    let record = Outer {
        val: "v".to_string(),
        nested: Some(Inner {
            val: Some("n".to_string()),
        }),
    };

    let args = record_args(&record);
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].name, "val");
}
