//! End-to-end tests for the schema loading pipeline

use graftql_parser::{
    load_schemas_with_diagnostics, parse_schemas, read_schemas, LoadError, SchemaInput,
};
use pretty_assertions::assert_eq;
use std::io::Write;

fn input(locator: &str, text: &str) -> SchemaInput {
    SchemaInput {
        text: text.to_string(),
        locator: locator.to_string(),
    }
}

fn load(inputs: &[SchemaInput]) -> (Result<graftql_core::SchemaDocument, LoadError>, String) {
    let mut sink = Vec::new();
    let result = load_schemas_with_diagnostics(inputs, &mut sink);
    (result, String::from_utf8(sink).expect("diagnostics are utf8"))
}

#[test]
fn merges_every_input_with_the_prelude() {
    let (result, diagnostics) = load(&[
        input(
            "accounts.graphql",
            r#"
            type Query { user(id: ID!): User }
            type User implements Node { name: String }
            interface Node { id: ID! }
            "#,
        ),
        input(
            "posts.graphql",
            r#"
            type Post implements Node { title: String }
            "#,
        ),
    ]);
    let doc = result.expect("pipeline succeeds");
    assert_eq!(diagnostics, "", "no diagnostics on success");

    // Every type and field from every input survives the merge.
    for (name, field) in [("Query", "user"), ("User", "name"), ("Post", "title")] {
        let def = doc.find(name).unwrap_or_else(|| panic!("{} missing", name));
        assert!(def.field(field).is_some(), "{}.{} missing", name, field);
    }
    // Plus the prelude.
    assert!(doc.find("String").is_some_and(|d| d.built_in));
    assert!(doc.find_directive("deprecated").is_some());
}

#[test]
fn duplicate_type_names_are_rejected_not_merged() {
    let (result, diagnostics) = load(&[
        input("a.graphql", "type Query { ok: Int }\ntype User { a: Int }"),
        input("b.graphql", "type User { b: Int }"),
    ]);
    let err = result.expect_err("duplicate names must fail");
    assert_eq!(err.to_string(), "Cannot redeclare type User");
    // Both declarations survive to the dump; nothing was silently merged.
    assert_eq!(diagnostics.matches("type User").count(), 2);
}

#[test]
fn inherited_fields_follow_declared_fields() {
    let (result, _) = load(&[input(
        "s.graphql",
        r#"
        interface I { a: String }
        type T implements I { b: Int }
        type Query { t: T }
        "#,
    )]);
    let doc = result.expect("pipeline succeeds");
    let names: Vec<_> = doc
        .find("T")
        .expect("T exists")
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn multiple_interfaces_append_in_declaration_order() {
    let (result, _) = load(&[input(
        "s.graphql",
        r#"
        interface A { a1: Int a2: Int }
        interface B { b1: Int }
        type T implements A & B { own: Int }
        type Query { t: T }
        "#,
    )]);
    let doc = result.expect("pipeline succeeds");
    let names: Vec<_> = doc
        .find("T")
        .expect("T exists")
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["own", "a1", "a2", "b1"]);
}

#[test]
fn missing_interface_aborts_before_validation() {
    let (result, diagnostics) = load(&[input(
        "s.graphql",
        "type T implements Missing { a: Int }",
    )]);
    let err = result.expect_err("must fail");
    match err {
        LoadError::NoSuchInterface(name) => assert_eq!(name, "Missing"),
        other => panic!("expected structural error, got {:?}", other),
    }
    // Validation never ran, so the diagnostic dump was never written.
    assert_eq!(diagnostics, "");
}

#[test]
fn syntax_errors_return_no_partial_document() {
    let (result, diagnostics) = load(&[
        input("good.graphql", "type Query { ok: Int }"),
        input("bad.graphql", "type User {"),
    ]);
    let err = result.expect_err("must fail");
    assert!(matches!(err, LoadError::Syntax { ref locator, .. } if locator == "bad.graphql"));
    assert_eq!(diagnostics, "");
}

#[test]
fn validation_failure_dumps_reparseable_sdl() {
    let (result, diagnostics) = load(&[input(
        "s.graphql",
        r#"
        interface I { a: String }
        type T implements I { own: Int }
        type Query { t: T broken: Nowhere }
        "#,
    )]);
    let err = result.expect_err("Nowhere is undefined");
    assert_eq!(err.to_string(), "Undefined type Nowhere");

    let body = diagnostics
        .strip_prefix("Parsed schema:\n")
        .expect("dump starts with the fixed header");
    // The dump echoes the merged, inheritance-resolved document: T already
    // carries the inherited field.
    assert!(body.contains("type T implements I {\n  own: Int\n  a: String\n}"));
    // And it round-trips through the parser as recognizable SDL.
    parse_schemas(&[input("dump.graphql", body)]).expect("dump must reparse");
}

#[test]
fn read_schemas_wraps_the_failing_locator() {
    let err = read_schemas(&["does/not/exist.graphql".to_string()])
        .expect_err("missing file must fail");
    assert_eq!(
        err.to_string(),
        "failed to read from does/not/exist.graphql"
    );
}

#[test]
fn read_schemas_preserves_locator_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first.graphql");
    let second = dir.path().join("second.graphql");
    std::fs::File::create(&first)
        .and_then(|mut f| f.write_all(b"type A { x: Int }"))
        .expect("write first");
    std::fs::File::create(&second)
        .and_then(|mut f| f.write_all(b"type B { y: Int }"))
        .expect("write second");

    let locators = vec![
        first.to_str().expect("utf8").to_string(),
        second.to_str().expect("utf8").to_string(),
    ];
    let inputs = read_schemas(&locators).expect("reads");
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].locator, locators[0]);
    assert_eq!(inputs[0].text, "type A { x: Int }");
    assert_eq!(inputs[1].locator, locators[1]);
}
