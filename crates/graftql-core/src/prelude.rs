//! The built-in prelude implicitly merged into every schema document
//!
//! Standard scalars, built-in directives, and the introspection types. The
//! parser feeds this source through the same path as user sources, stamped
//! as built-in, so a user type that collides with a prelude name surfaces as
//! an ordinary duplicate-name validation error.

/// Locator recorded on positions of prelude definitions.
pub const PRELUDE_LOCATOR: &str = "prelude";

/// The prelude source text.
pub const PRELUDE: &str = r#"
directive @include(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @skip(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @deprecated(reason: String = "No longer supported") on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | ENUM_VALUE
directive @specifiedBy(url: String!) on SCALAR

"The `Int` scalar type represents non-fractional signed whole numeric values."
scalar Int

"The `Float` scalar type represents signed double-precision fractional values."
scalar Float

"The `String` scalar type represents textual data, represented as UTF-8 character sequences."
scalar String

"The `Boolean` scalar type represents `true` or `false`."
scalar Boolean

"The `ID` scalar type represents a unique identifier."
scalar ID

type __Schema {
  description: String
  types: [__Type!]!
  queryType: __Type!
  mutationType: __Type
  subscriptionType: __Type
  directives: [__Directive!]!
}

type __Type {
  kind: __TypeKind!
  name: String
  description: String
  fields(includeDeprecated: Boolean = false): [__Field!]
  interfaces: [__Type!]
  possibleTypes: [__Type!]
  enumValues(includeDeprecated: Boolean = false): [__EnumValue!]
  inputFields: [__InputValue!]
  ofType: __Type
  specifiedByURL: String
}

type __Field {
  name: String!
  description: String
  args: [__InputValue!]!
  type: __Type!
  isDeprecated: Boolean!
  deprecationReason: String
}

type __InputValue {
  name: String!
  description: String
  type: __Type!
  defaultValue: String
}

type __EnumValue {
  name: String!
  description: String
  isDeprecated: Boolean!
  deprecationReason: String
}

enum __TypeKind {
  SCALAR
  OBJECT
  INTERFACE
  UNION
  ENUM
  INPUT_OBJECT
  LIST
  NON_NULL
}

type __Directive {
  name: String!
  description: String
  locations: [__DirectiveLocation!]!
  args: [__InputValue!]!
  isRepeatable: Boolean!
}

enum __DirectiveLocation {
  QUERY
  MUTATION
  SUBSCRIPTION
  FIELD
  FRAGMENT_DEFINITION
  FRAGMENT_SPREAD
  INLINE_FRAGMENT
  VARIABLE_DEFINITION
  SCHEMA
  SCALAR
  OBJECT
  FIELD_DEFINITION
  ARGUMENT_DEFINITION
  INTERFACE
  UNION
  ENUM
  ENUM_VALUE
  INPUT_OBJECT
  INPUT_FIELD_DEFINITION
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_declares_the_standard_scalars() {
        for scalar in ["Int", "Float", "String", "Boolean", "ID"] {
            assert!(
                PRELUDE.contains(&format!("scalar {}", scalar)),
                "prelude is missing scalar {}",
                scalar
            );
        }
    }

    #[test]
    fn prelude_declares_the_builtin_directives() {
        for directive in ["@include", "@skip", "@deprecated", "@specifiedBy"] {
            assert!(
                PRELUDE.contains(&format!("directive {}", directive)),
                "prelude is missing {}",
                directive
            );
        }
    }
}
