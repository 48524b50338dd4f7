mod common;

use matches::assert_matches;
use pg_typegen_core::{Described, Error, TypeResolution};
use tokio::io::AsyncWriteExt;

use common::*;

fn pg_type_header() -> Vec<u8> {
    row_description(&[("oid", 1247, 1, 26), ("typname", 1247, 2, 19)])
}

fn pg_attribute_header() -> Vec<u8> {
    row_description(&[
        ("attrelid", 1249, 1, 26),
        ("attnum", 1249, 2, 21),
        ("attname", 1249, 3, 19),
        ("attnotnull", 1249, 4, 16),
    ])
}

#[tokio::test]
async fn it_resolves_parameter_and_column_types() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = Vec::new();

    // the probe: parse, describe, close
    script.extend(parse_complete());
    script.extend(parameter_description(&[23]));
    script.extend(row_description(&[
        ("id", 16384, 1, 23),
        ("email", 16384, 2, 25),
        ("count", 0, 0, 20),
    ]));
    script.extend(close_complete());

    // the pg_type lookup
    script.extend(pg_type_header());
    script.extend(data_row(&[Some("23"), Some("int4")]));
    script.extend(data_row(&[Some("25"), Some("text")]));
    script.extend(data_row(&[Some("20"), Some("int8")]));
    script.extend(command_complete("SELECT 3"));
    script.extend(ready_for_query());

    // the pg_attribute lookup; only the two table-backed columns come back
    script.extend(pg_attribute_header());
    script.extend(data_row(&[Some("16384"), Some("1"), Some("id"), Some("t")]));
    script.extend(data_row(&[
        Some("16384"),
        Some("2"),
        Some("email"),
        Some("f"),
    ]));
    script.extend(command_complete("SELECT 2"));
    script.extend(ready_for_query());

    server.write_all(&script).await?;

    let resolution = conn
        .resolve_types(
            "SELECT id, email, count(*) OVER () AS count FROM users WHERE id = :id",
            "users_by_id",
        )
        .await?;

    let types = match resolution {
        TypeResolution::Resolved(types) => types,
        TypeResolution::Failed(error) => panic!("unexpected parse failure: {}", error),
    };

    assert_eq!(types.param_types.len(), 1);
    assert_eq!(types.param_types["id"], "int4");

    assert_eq!(types.return_types.len(), 3);

    assert_eq!(types.return_types[0].name, "id");
    assert_eq!(types.return_types[0].column_name.as_deref(), Some("id"));
    assert_eq!(types.return_types[0].type_name, "int4");
    assert_eq!(types.return_types[0].nullable, Some(false));

    assert_eq!(types.return_types[1].name, "email");
    assert_eq!(types.return_types[1].column_name.as_deref(), Some("email"));
    assert_eq!(types.return_types[1].type_name, "text");
    assert_eq!(types.return_types[1].nullable, Some(true));

    // the window expression has no backing column: type is known but
    // nullability is not
    assert_eq!(types.return_types[2].name, "count");
    assert_eq!(types.return_types[2].column_name, None);
    assert_eq!(types.return_types[2].type_name, "int8");
    assert_eq!(types.return_types[2].nullable, None);

    Ok(())
}

#[tokio::test]
async fn it_reports_a_parse_failure_and_stays_usable() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = error_response("42601", "syntax error at or near \"SELEC\"", Some("1"));
    // the reply to the Sync that recovers the session
    script.extend(ready_for_query());
    server.write_all(&script).await?;

    let resolution = conn.resolve_types("SELEC 1", "bad").await?;

    let error = match resolution {
        TypeResolution::Failed(error) => error,
        TypeResolution::Resolved(_) => panic!("expected a parse failure"),
    };

    assert_eq!(error.code, "42601");
    assert_eq!(error.message, "syntax error at or near \"SELEC\"");
    assert_eq!(error.position, Some(1));
    assert_eq!(error.hint, None);
    assert!(error.to_string().contains("42601"));

    // the same connection resolves the corrected query
    let mut script = parse_complete();
    script.extend(parameter_description(&[]));
    script.extend(row_description(&[("?column?", 0, 0, 23)]));
    script.extend(close_complete());

    script.extend(pg_type_header());
    script.extend(data_row(&[Some("23"), Some("int4")]));
    script.extend(command_complete("SELECT 1"));
    script.extend(ready_for_query());

    script.extend(pg_attribute_header());
    script.extend(command_complete("SELECT 0"));
    script.extend(ready_for_query());

    server.write_all(&script).await?;

    let resolution = conn.resolve_types("SELECT 1", "good").await?;

    assert_matches!(resolution, TypeResolution::Resolved(_));

    Ok(())
}

#[tokio::test]
async fn it_maps_duplicate_names_last_write_wins() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = parse_complete();
    // three positional parameters back three placeholder occurrences
    script.extend(parameter_description(&[23, 25, 20]));
    script.extend(no_data());
    script.extend(close_complete());

    script.extend(pg_type_header());
    script.extend(data_row(&[Some("23"), Some("int4")]));
    script.extend(data_row(&[Some("25"), Some("text")]));
    script.extend(data_row(&[Some("20"), Some("int8")]));
    script.extend(command_complete("SELECT 3"));
    script.extend(ready_for_query());

    script.extend(pg_attribute_header());
    script.extend(command_complete("SELECT 0"));
    script.extend(ready_for_query());

    server.write_all(&script).await?;

    let resolution = conn
        .resolve_types("SELECT set_config(:a, :b, false) WHERE length(:a) > 0", "dup")
        .await?;

    let types = match resolution {
        TypeResolution::Resolved(types) => types,
        TypeResolution::Failed(error) => panic!("unexpected parse failure: {}", error),
    };

    // `a` appears twice; its later binding (the third positional) wins
    assert_eq!(types.param_types.len(), 2);
    assert_eq!(types.param_types["a"], "int8");
    assert_eq!(types.param_types["b"], "text");

    Ok(())
}

#[tokio::test]
async fn it_skips_the_catalog_when_nothing_needs_resolving() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = parse_complete();
    script.extend(parameter_description(&[]));
    script.extend(no_data());
    script.extend(close_complete());

    // no type lookup happens; the attribute lookup still runs, with its
    // degenerate always-false predicate
    script.extend(pg_attribute_header());
    script.extend(command_complete("SELECT 0"));
    script.extend(ready_for_query());

    server.write_all(&script).await?;

    let resolution = conn.resolve_types("CREATE TABLE t (id int4)", "ddl").await?;

    let types = match resolution {
        TypeResolution::Resolved(types) => types,
        TypeResolution::Failed(error) => panic!("unexpected parse failure: {}", error),
    };

    assert!(types.param_types.is_empty());
    assert!(types.return_types.is_empty());

    Ok(())
}

#[tokio::test]
async fn it_rejects_a_parameter_count_mismatch() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = parse_complete();
    // two parameters for a query with a single placeholder
    script.extend(parameter_description(&[23, 25]));
    script.extend(no_data());
    script.extend(close_complete());
    server.write_all(&script).await?;

    let err = conn.resolve_types("SELECT :id", "odd").await.unwrap_err();
    assert_matches!(err, Error::Protocol(_));

    Ok(())
}

#[tokio::test]
async fn it_desyncs_on_an_out_of_order_message() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    // a DataRow can never answer a Parse
    server.write_all(&data_row(&[Some("1")])).await?;

    let err = conn.resolve_types("SELECT 1", "oops").await.unwrap_err();
    assert_matches!(err, Error::Protocol(_));

    Ok(())
}

#[tokio::test]
async fn it_describes_a_statement_with_no_result_rows() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = parse_complete();
    script.extend(parameter_description(&[25]));
    script.extend(no_data());
    script.extend(close_complete());
    server.write_all(&script).await?;

    let described = conn
        .describe_statement("ins", "INSERT INTO logs (line) VALUES ($1)")
        .await?;

    match described {
        Described::Statement(statement) => {
            assert_eq!(statement.parameters, [25]);
            assert!(statement.fields.is_empty());
        }

        Described::Failed(error) => panic!("unexpected parse failure: {}", error),
    }

    Ok(())
}

#[tokio::test]
async fn it_collects_rows_over_the_simple_protocol() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = row_description(&[("a", 0, 0, 25), ("b", 0, 0, 25)]);
    script.extend(data_row(&[Some("one"), None]));
    script.extend(data_row(&[Some("two"), Some("2")]));
    script.extend(command_complete("SELECT 2"));
    script.extend(ready_for_query());
    server.write_all(&script).await?;

    let rows = conn.fetch_all("SELECT a, b FROM pairs").await?;

    assert_eq!(
        rows,
        [
            vec![Some("one".to_owned()), None],
            vec![Some("two".to_owned()), Some("2".to_owned())],
        ]
    );

    Ok(())
}

#[tokio::test]
async fn it_returns_no_rows_for_an_empty_result() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    let mut script = row_description(&[("a", 0, 0, 25)]);
    script.extend(command_complete("SELECT 0"));
    script.extend(ready_for_query());
    server.write_all(&script).await?;

    let rows = conn.fetch_all("SELECT a FROM empty").await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn it_ignores_asynchronous_traffic() -> anyhow::Result<()> {
    let (mut conn, mut server) = handshake(&options()).await?;

    // notices and parameter-status changes can arrive at any point and do
    // not disturb the expected reply sequence
    let mut script = notice_response("relation \"pairs\" is empty");
    script.extend(parameter_status("TimeZone", "UTC"));
    script.extend(row_description(&[("a", 0, 0, 25)]));
    script.extend(notice_response("still nothing"));
    script.extend(command_complete("SELECT 0"));
    script.extend(ready_for_query());
    server.write_all(&script).await?;

    let rows = conn.fetch_all("SELECT a FROM pairs").await?;
    assert!(rows.is_empty());

    Ok(())
}
