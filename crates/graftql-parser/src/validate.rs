//! Type-system well-formedness validation
//!
//! The terminal gate of the pipeline: a document that fails here must never
//! reach a code emitter. Checks run in document order and stop at the first
//! violation; the returned message is what the caller surfaces verbatim.

use std::collections::HashSet;

use graftql_core::{
    DefinitionKind, Directive, DirectiveDefinition, DirectiveLocation, InputValueDefinition,
    SchemaDocument, TypeDefinition, TypeRef,
};

use crate::error::LoadError;

/// Check the merged, inheritance-resolved document against the type-system
/// rules. Read-only; returns the first violation found.
pub fn validate_schema(doc: &SchemaDocument) -> Result<(), LoadError> {
    check_unique_names(doc)?;
    check_root_operations(doc)?;
    for def in &doc.directives {
        check_directive_definition(doc, def)?;
    }
    for def in &doc.definitions {
        check_definition(doc, def)?;
    }
    Ok(())
}

fn fail(message: String) -> Result<(), LoadError> {
    Err(LoadError::Validation(message))
}

fn check_unique_names(doc: &SchemaDocument) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for def in &doc.definitions {
        if !seen.insert(def.name.as_str()) {
            return fail(format!("Cannot redeclare type {}", def.name));
        }
    }
    let mut seen = HashSet::new();
    for def in &doc.directives {
        if !seen.insert(def.name.as_str()) {
            return fail(format!("Cannot redeclare directive {}", def.name));
        }
    }
    Ok(())
}

fn check_root_operations(doc: &SchemaDocument) -> Result<(), LoadError> {
    let mut bound = HashSet::new();
    for schema in &doc.schema {
        check_directives(doc, &schema.directives, DirectiveLocation::Schema)?;
        for op in &schema.operations {
            if !bound.insert(op.operation) {
                return fail(format!(
                    "{} root operation can only be defined once",
                    op.operation.keyword()
                ));
            }
            match doc.find(&op.type_name) {
                None => return fail(format!("Undefined type {}", op.type_name)),
                Some(def) if def.kind != DefinitionKind::Object => {
                    return fail(format!(
                        "{} root type {} is not an object type",
                        op.operation.keyword(),
                        op.type_name
                    ));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn check_definition(doc: &SchemaDocument, def: &TypeDefinition) -> Result<(), LoadError> {
    check_reserved_name(&def.name, def.built_in)?;
    check_directives(doc, &def.directives, definition_location(def.kind))?;

    match def.kind {
        DefinitionKind::Scalar => {}
        DefinitionKind::Object | DefinitionKind::Interface => {
            check_fields(doc, def)?;
            for interface_name in &def.interfaces {
                check_implements_target(doc, def, interface_name)?;
            }
            if def.kind == DefinitionKind::Object {
                for interface_name in &def.interfaces {
                    check_conformance(doc, def, interface_name)?;
                }
            }
        }
        DefinitionKind::Union => {
            if def.union_members.is_empty() {
                return fail(format!("Union {} must define one or more member types", def.name));
            }
            for member in &def.union_members {
                match doc.find(member) {
                    None => return fail(format!("Undefined type {}", member)),
                    Some(target) if target.kind != DefinitionKind::Object => {
                        return fail(format!(
                            "Union {} member {} is not an object type",
                            def.name, member
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        DefinitionKind::Enum => {
            if def.enum_values.is_empty() {
                return fail(format!("Enum {} must define one or more values", def.name));
            }
            let mut seen = HashSet::new();
            for value in &def.enum_values {
                if matches!(value.name.as_str(), "true" | "false" | "null") {
                    return fail(format!(
                        "Enum {} cannot define value \"{}\"",
                        def.name, value.name
                    ));
                }
                if !seen.insert(value.name.as_str()) {
                    return fail(format!(
                        "Enum value {}.{} can only be defined once",
                        def.name, value.name
                    ));
                }
                check_directives(doc, &value.directives, DirectiveLocation::EnumValue)?;
            }
        }
        DefinitionKind::InputObject => {
            if def.input_fields.is_empty() {
                return fail(format!(
                    "Input object {} must define one or more input fields",
                    def.name
                ));
            }
            let mut seen = HashSet::new();
            for field in &def.input_fields {
                check_reserved_name(&field.name, def.built_in)?;
                if !seen.insert(field.name.as_str()) {
                    return fail(format!(
                        "Field {}.{} can only be defined once",
                        def.name, field.name
                    ));
                }
                check_input_type(doc, &field.ty, &format!("{}.{}", def.name, field.name))?;
                check_directives(doc, &field.directives, DirectiveLocation::InputFieldDefinition)?;
            }
        }
    }
    Ok(())
}

fn check_fields(doc: &SchemaDocument, def: &TypeDefinition) -> Result<(), LoadError> {
    if def.fields.is_empty() {
        let label = match def.kind {
            DefinitionKind::Interface => "Interface",
            _ => "Object type",
        };
        return fail(format!("{} {} must define one or more fields", label, def.name));
    }
    let mut seen = HashSet::new();
    for field in &def.fields {
        check_reserved_name(&field.name, def.built_in)?;
        if !seen.insert(field.name.as_str()) {
            return fail(format!(
                "Field {}.{} can only be defined once",
                def.name, field.name
            ));
        }
        check_output_type(doc, &field.ty, &format!("{}.{}", def.name, field.name))?;
        check_directives(doc, &field.directives, DirectiveLocation::FieldDefinition)?;

        let mut seen_args = HashSet::new();
        for arg in &field.arguments {
            check_reserved_name(&arg.name, def.built_in)?;
            if !seen_args.insert(arg.name.as_str()) {
                return fail(format!(
                    "Argument {}.{}({}:) can only be defined once",
                    def.name, field.name, arg.name
                ));
            }
            check_input_type(
                doc,
                &arg.ty,
                &format!("{}.{}({}:)", def.name, field.name, arg.name),
            )?;
            check_directives(doc, &arg.directives, DirectiveLocation::ArgumentDefinition)?;
        }
    }
    Ok(())
}

fn check_implements_target(
    doc: &SchemaDocument,
    def: &TypeDefinition,
    interface_name: &str,
) -> Result<(), LoadError> {
    match doc.find(interface_name) {
        None => fail(format!("Undefined type {}", interface_name)),
        Some(target) if target.kind != DefinitionKind::Interface => fail(format!(
            "{} cannot implement {}: not an interface",
            def.name, interface_name
        )),
        Some(_) => Ok(()),
    }
}

/// Check that an object provides every field its interface declares, at a
/// covariant type and with the interface's arguments.
///
/// The inheritance pass has already copied the interface's fields onto the
/// object, so inherited fields satisfy this trivially; the check bites only
/// when the object declared a conflicting field of its own (and the
/// duplicate-name rule in [`check_fields`] catches verbatim redeclarations
/// before this runs).
fn check_conformance(
    doc: &SchemaDocument,
    def: &TypeDefinition,
    interface_name: &str,
) -> Result<(), LoadError> {
    let interface = match doc.find(interface_name) {
        Some(target) if target.kind == DefinitionKind::Interface => target,
        // check_implements_target already rejected these.
        _ => return Ok(()),
    };
    for expected in &interface.fields {
        let Some(field) = def.field(&expected.name) else {
            return fail(format!(
                "{} must implement field {}.{}",
                def.name, interface_name, expected.name
            ));
        };
        if !is_covariant(doc, &field.ty, &expected.ty) {
            return fail(format!(
                "Field {}.{}: {} is not compatible with {}.{}: {}",
                def.name, field.name, field.ty, interface_name, expected.name, expected.ty
            ));
        }
        for expected_arg in &expected.arguments {
            let Some(arg) = field.arguments.iter().find(|a| a.name == expected_arg.name) else {
                return fail(format!(
                    "Field {}.{} is missing argument {}",
                    def.name, field.name, expected_arg.name
                ));
            };
            if arg.ty != expected_arg.ty {
                return fail(format!(
                    "Argument {}.{}({}:) must be type {}",
                    def.name, field.name, arg.name, expected_arg.ty
                ));
            }
        }
    }
    Ok(())
}

/// Field type covariance: equal types, a non-null narrowing of the expected
/// type, an object member of an expected union, or an implementation of an
/// expected interface.
fn is_covariant(doc: &SchemaDocument, actual: &TypeRef, expected: &TypeRef) -> bool {
    match (actual, expected) {
        (TypeRef::NonNull(a), TypeRef::NonNull(e)) => is_covariant(doc, a, e),
        (TypeRef::NonNull(a), e) => is_covariant(doc, a, e),
        (TypeRef::List(a), TypeRef::List(e)) => is_covariant(doc, a, e),
        (TypeRef::Named(a), TypeRef::Named(e)) => {
            if a == e {
                return true;
            }
            let (Some(actual_def), Some(expected_def)) = (doc.find(a), doc.find(e)) else {
                return false;
            };
            match expected_def.kind {
                DefinitionKind::Union => expected_def.union_members.iter().any(|m| m == a),
                DefinitionKind::Interface => actual_def.interfaces.iter().any(|i| i == e),
                _ => false,
            }
        }
        _ => false,
    }
}

fn check_output_type(doc: &SchemaDocument, ty: &TypeRef, at: &str) -> Result<(), LoadError> {
    let name = ty.name();
    match doc.find(name) {
        None => fail(format!("Undefined type {}", name)),
        Some(def) if !def.kind.is_output() => {
            fail(format!("{}: {} is not an output type", at, name))
        }
        Some(_) => Ok(()),
    }
}

fn check_input_type(doc: &SchemaDocument, ty: &TypeRef, at: &str) -> Result<(), LoadError> {
    let name = ty.name();
    match doc.find(name) {
        None => fail(format!("Undefined type {}", name)),
        Some(def) if !def.kind.is_input() => {
            fail(format!("{}: {} is not an input type", at, name))
        }
        Some(_) => Ok(()),
    }
}

fn check_reserved_name(name: &str, built_in: bool) -> Result<(), LoadError> {
    if !built_in && name.starts_with("__") {
        return fail(format!(
            "Name \"{}\" must not begin with \"__\", which is reserved by introspection",
            name
        ));
    }
    Ok(())
}

fn check_directive_definition(
    doc: &SchemaDocument,
    def: &DirectiveDefinition,
) -> Result<(), LoadError> {
    check_reserved_name(&def.name, def.built_in)?;
    let mut seen = HashSet::new();
    for arg in &def.arguments {
        check_reserved_name(&arg.name, def.built_in)?;
        if !seen.insert(arg.name.as_str()) {
            return fail(format!(
                "Argument @{}({}:) can only be defined once",
                def.name, arg.name
            ));
        }
        check_input_type(doc, &arg.ty, &format!("@{}({}:)", def.name, arg.name))?;
    }
    Ok(())
}

fn check_directives(
    doc: &SchemaDocument,
    directives: &[Directive],
    location: DirectiveLocation,
) -> Result<(), LoadError> {
    for (idx, usage) in directives.iter().enumerate() {
        let Some(def) = doc.find_directive(&usage.name) else {
            return fail(format!("Undefined directive @{}", usage.name));
        };
        if !def.locations.contains(&location) {
            return fail(format!(
                "Directive @{} cannot be applied to {}",
                usage.name, location
            ));
        }
        if !def.repeatable && directives[..idx].iter().any(|d| d.name == usage.name) {
            return fail(format!(
                "Directive @{} can only be applied once per location",
                usage.name
            ));
        }
        for arg in &usage.arguments {
            if !def.arguments.iter().any(|a| a.name == arg.name) {
                return fail(format!(
                    "Undefined argument {} for directive @{}",
                    arg.name, usage.name
                ));
            }
        }
        for required in required_arguments(&def.arguments) {
            if !usage.arguments.iter().any(|a| a.name == required.name) {
                return fail(format!(
                    "Directive @{} requires argument {}",
                    usage.name, required.name
                ));
            }
        }
    }
    Ok(())
}

fn required_arguments(args: &[InputValueDefinition]) -> impl Iterator<Item = &InputValueDefinition> {
    args.iter()
        .filter(|a| matches!(a.ty, TypeRef::NonNull(_)) && a.default_value.is_none())
}

fn definition_location(kind: DefinitionKind) -> DirectiveLocation {
    match kind {
        DefinitionKind::Scalar => DirectiveLocation::Scalar,
        DefinitionKind::Object => DirectiveLocation::Object,
        DefinitionKind::Interface => DirectiveLocation::Interface,
        DefinitionKind::Union => DirectiveLocation::Union,
        DefinitionKind::Enum => DirectiveLocation::Enum,
        DefinitionKind::InputObject => DirectiveLocation::InputObject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inherit::inherit_interfaces;
    use crate::parser::parse_schemas;
    use crate::SchemaInput;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> SchemaDocument {
        parse_schemas(&[SchemaInput {
            text: text.to_string(),
            locator: "test.graphql".to_string(),
        }])
        .expect("parses")
    }

    fn validate(text: &str) -> Result<(), LoadError> {
        validate_schema(&parse(text))
    }

    fn message(result: Result<(), LoadError>) -> String {
        result.expect_err("validation must fail").to_string()
    }

    #[test]
    fn accepts_a_well_formed_document() {
        validate(
            r#"
            schema { query: Query }
            directive @tag(name: String!) repeatable on OBJECT | FIELD_DEFINITION
            scalar DateTime
            interface Node { id: ID! }
            type Query @tag(name: "root") {
              node(id: ID!): Node
              search(term: String = ""): [SearchResult!]
            }
            type Person { id: ID! name: String @deprecated(reason: "use fullName") }
            union SearchResult = Person | Query
            enum Role { ADMIN USER }
            input Filter { roles: [Role!] = [ADMIN] }
            "#,
        )
        .expect("schema is valid");
    }

    #[test]
    fn rejects_duplicate_type_names() {
        assert_eq!(
            message(validate("type User { a: Int }\ntype User { b: Int }")),
            "Cannot redeclare type User"
        );
    }

    #[test]
    fn rejects_collisions_with_the_prelude() {
        assert_eq!(
            message(validate("scalar Int\ntype Query { ok: Boolean }")),
            "Cannot redeclare type Int"
        );
    }

    #[test]
    fn rejects_undefined_field_types() {
        assert_eq!(
            message(validate("type Query { user: User }")),
            "Undefined type User"
        );
    }

    #[test]
    fn rejects_input_types_in_output_position() {
        assert_eq!(
            message(validate(
                "input Filter { q: String }\ntype Query { filter: Filter }"
            )),
            "Query.filter: Filter is not an output type"
        );
    }

    #[test]
    fn rejects_output_types_in_argument_position() {
        assert_eq!(
            message(validate(
                "type Widget { id: ID }\ntype Query { widget(spec: Widget): Int }"
            )),
            "Query.widget(spec:): Widget is not an input type"
        );
    }

    #[test]
    fn rejects_duplicate_fields_after_inheritance_copy() {
        let mut doc = parse(
            r#"
            interface I { a: String }
            type T implements I { a: String b: Int }
            "#,
        );
        inherit_interfaces(&mut doc).expect("resolves");
        assert_eq!(
            message(validate_schema(&doc)),
            "Field T.a can only be defined once"
        );
    }

    #[test]
    fn conformance_check_bites_without_the_copy() {
        // Validator stays meaningful standalone: an object declaring an
        // incompatible signature for an interface field is rejected even
        // when inheritance never ran.
        let doc = parse(
            r#"
            interface I { a: String }
            type T implements I { a: Int }
            "#,
        );
        assert_eq!(
            message(validate_schema(&doc)),
            "Field T.a: Int is not compatible with I.a: String"
        );
    }

    #[test]
    fn accepts_covariant_field_overrides() {
        let doc = parse(
            r#"
            interface Node { id: ID }
            type T implements Node { id: ID! extra: Int }
            "#,
        );
        // No inherit pass: T declares its own narrowed id.
        validate_schema(&doc).expect("non-null narrowing is covariant");
    }

    #[test]
    fn rejects_missing_interface_arguments() {
        let doc = parse(
            r#"
            interface Pageable { page(limit: Int): String }
            type T implements Pageable { page: String }
            "#,
        );
        assert_eq!(
            message(validate_schema(&doc)),
            "Field T.page is missing argument limit"
        );
    }

    #[test]
    fn rejects_non_object_union_members() {
        assert_eq!(
            message(validate(
                "enum Role { ADMIN }\ntype Query { ok: Int }\nunion U = Role | Query"
            )),
            "Union U member Role is not an object type"
        );
    }

    #[test]
    fn rejects_reserved_enum_values() {
        assert_eq!(
            message(validate("enum Flag { null }\ntype Query { f: Flag }")),
            "Enum Flag cannot define value \"null\""
        );
    }

    #[test]
    fn rejects_empty_object_types() {
        assert_eq!(
            message(validate("type Query")),
            "Object type Query must define one or more fields"
        );
    }

    #[test]
    fn rejects_undefined_directives() {
        assert_eq!(
            message(validate("type Query @magic { ok: Int }")),
            "Undefined directive @magic"
        );
    }

    #[test]
    fn rejects_directives_at_the_wrong_location() {
        assert_eq!(
            message(validate(
                "directive @entity on OBJECT\nenum Role @entity { ADMIN }\ntype Query { r: Role }"
            )),
            "Directive @entity cannot be applied to ENUM"
        );
    }

    #[test]
    fn rejects_repeating_a_non_repeatable_directive() {
        assert_eq!(
            message(validate(
                "directive @entity on OBJECT\ntype Query @entity @entity { ok: Int }"
            )),
            "Directive @entity can only be applied once per location"
        );
    }

    #[test]
    fn rejects_missing_required_directive_arguments() {
        assert_eq!(
            message(validate(
                "directive @tag(name: String!) on FIELD_DEFINITION\ntype Query { ok: Int @tag }"
            )),
            "Directive @tag requires argument name"
        );
    }

    #[test]
    fn builtin_directives_enforce_their_locations() {
        assert_eq!(
            message(validate("type Query { ok: String @specifiedBy(url: \"x\") }")),
            "Directive @specifiedBy cannot be applied to FIELD_DEFINITION"
        );
    }

    #[test]
    fn rejects_reserved_name_prefix_on_user_types() {
        assert_eq!(
            message(validate("type __Internal { ok: Int }\ntype Query { ok: Int }")),
            "Name \"__Internal\" must not begin with \"__\", which is reserved by introspection"
        );
    }

    #[test]
    fn rejects_non_object_root_types() {
        assert_eq!(
            message(validate("schema { query: Role }\nenum Role { ADMIN }")),
            "query root type Role is not an object type"
        );
    }

    #[test]
    fn rejects_non_interface_implements_targets() {
        assert_eq!(
            message(validate(
                "scalar Tag\ntype T implements Tag { ok: Int }"
            )),
            "T cannot implement Tag: not an interface"
        );
    }
}
