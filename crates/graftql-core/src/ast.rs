//! Abstract syntax tree for merged schema documents
//!
//! A [`SchemaDocument`] holds every type-system definition parsed from all
//! input sources plus the built-in prelude, in document order. It is created
//! empty, populated once by the parser, mutated in place exactly once by the
//! interface inheritance pass, checked read-only by the validator, and then
//! handed to downstream consumers. It is never reused across runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where a construct appeared in its source text.
///
/// `line` and `column` are 1-indexed; `locator` is the opaque source locator
/// the text was read from (file path, URL, stdin sentinel, or `"prelude"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub locator: String,
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(locator: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            locator: locator.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.locator, self.line, self.column)
    }
}

/// The kind of a named type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl DefinitionKind {
    /// The SDL keyword that introduces a definition of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            DefinitionKind::Scalar => "scalar",
            DefinitionKind::Object => "type",
            DefinitionKind::Interface => "interface",
            DefinitionKind::Union => "union",
            DefinitionKind::Enum => "enum",
            DefinitionKind::InputObject => "input",
        }
    }

    /// Whether values of this kind may appear in argument and input field
    /// positions.
    pub fn is_input(self) -> bool {
        matches!(
            self,
            DefinitionKind::Scalar | DefinitionKind::Enum | DefinitionKind::InputObject
        )
    }

    /// Whether values of this kind may appear in object and interface field
    /// positions.
    pub fn is_output(self) -> bool {
        !matches!(self, DefinitionKind::InputObject)
    }
}

/// A type reference as written in a field, argument, or input field position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// The innermost named type this reference resolves through.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// A constant value literal: argument defaults and directive arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", escape_string(v)),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Null => write!(f, "null"),
            Value::Enum(v) => write!(f, "{}", v),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// A named argument inside a directive usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// A directive applied to a definition, field, argument, or enum value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub pos: Pos,
}

/// An input value: a field argument or an input object field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub pos: Pos,
}

/// One field of an object or interface definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: TypeRef,
    pub directives: Vec<Directive>,
    pub pos: Pos,
}

/// One value of an enum definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub pos: Pos,
}

/// One named entry in the schema document.
///
/// A single struct covers all six kinds; the sequence fields that do not
/// apply to a kind stay empty (e.g. `union_members` outside unions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub kind: DefinitionKind,
    pub name: String,
    pub description: Option<String>,
    /// Interface names this definition declares conformance to. Populated
    /// for object and interface kinds; only objects are expanded by the
    /// inheritance pass.
    pub interfaces: Vec<String>,
    /// Output fields (object and interface kinds). The inheritance pass
    /// appends inherited fields here, after the originally-declared ones.
    pub fields: Vec<FieldDefinition>,
    /// Input fields (input object kind).
    pub input_fields: Vec<InputValueDefinition>,
    pub enum_values: Vec<EnumValueDefinition>,
    pub union_members: Vec<String>,
    pub directives: Vec<Directive>,
    /// True for prelude definitions merged into every document.
    pub built_in: bool,
    pub pos: Pos,
}

impl TypeDefinition {
    pub fn new(kind: DefinitionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            input_fields: Vec::new(),
            enum_values: Vec::new(),
            union_members: Vec::new(),
            directives: Vec::new(),
            built_in: false,
            pos: Pos::default(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A root operation kind bound by a schema definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn keyword(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }
}

/// One `operation: TypeName` binding inside a schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootOperation {
    pub operation: OperationType,
    pub type_name: String,
    pub pos: Pos,
}

/// A `schema { ... }` definition binding root operation types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub operations: Vec<RootOperation>,
    pub pos: Pos,
}

/// A location a directive may be applied at.
///
/// The executable locations are carried so the built-in prelude directives
/// (`@include`, `@skip`) declare themselves faithfully; this pipeline only
/// ever applies directives at the type-system locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveLocation {
    // Executable locations
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    // Type-system locations
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let location = match name {
            "QUERY" => DirectiveLocation::Query,
            "MUTATION" => DirectiveLocation::Mutation,
            "SUBSCRIPTION" => DirectiveLocation::Subscription,
            "FIELD" => DirectiveLocation::Field,
            "FRAGMENT_DEFINITION" => DirectiveLocation::FragmentDefinition,
            "FRAGMENT_SPREAD" => DirectiveLocation::FragmentSpread,
            "INLINE_FRAGMENT" => DirectiveLocation::InlineFragment,
            "VARIABLE_DEFINITION" => DirectiveLocation::VariableDefinition,
            "SCHEMA" => DirectiveLocation::Schema,
            "SCALAR" => DirectiveLocation::Scalar,
            "OBJECT" => DirectiveLocation::Object,
            "FIELD_DEFINITION" => DirectiveLocation::FieldDefinition,
            "ARGUMENT_DEFINITION" => DirectiveLocation::ArgumentDefinition,
            "INTERFACE" => DirectiveLocation::Interface,
            "UNION" => DirectiveLocation::Union,
            "ENUM" => DirectiveLocation::Enum,
            "ENUM_VALUE" => DirectiveLocation::EnumValue,
            "INPUT_OBJECT" => DirectiveLocation::InputObject,
            "INPUT_FIELD_DEFINITION" => DirectiveLocation::InputFieldDefinition,
            _ => return None,
        };
        Some(location)
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `directive @name on ...` definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
    pub built_in: bool,
    pub pos: Pos,
}

/// The merged in-memory representation of all type-system definitions across
/// every input source plus the built-in prelude.
///
/// Lookup goes through a name→index map built once after parsing via
/// [`SchemaDocument::reindex`] rather than re-scanning the definition
/// sequence on every resolution. When names collide, the map keeps the first
/// declaration; the later duplicates stay in `definitions` for the validator
/// to reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub schema: Vec<SchemaDefinition>,
    pub definitions: Vec<TypeDefinition>,
    pub directives: Vec<DirectiveDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    directive_index: HashMap<String, usize>,
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the name→definition maps from the current definition
    /// sequences. The parser calls this once after merging all sources; a
    /// consumer that deserialized a document must call it before lookups.
    pub fn reindex(&mut self) {
        self.index.clear();
        for (idx, def) in self.definitions.iter().enumerate() {
            self.index.entry(def.name.clone()).or_insert(idx);
        }
        self.directive_index.clear();
        for (idx, def) in self.directives.iter().enumerate() {
            self.directive_index.entry(def.name.clone()).or_insert(idx);
        }
    }

    /// Look up a type definition by name.
    pub fn find(&self, name: &str) -> Option<&TypeDefinition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Look up a directive definition by name.
    pub fn find_directive(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directive_index
            .get(name)
            .map(|&idx| &self.directives[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_ref_innermost_name() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Int"))));
        assert_eq!(ty.name(), "Int");
    }

    #[test]
    fn type_ref_display_renders_sdl() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Int"))));
        assert_eq!(ty.to_string(), "[Int!]!");
        assert_eq!(TypeRef::named("String").to_string(), "String");
    }

    #[test]
    fn value_display_renders_literals() {
        let value = Value::Object(vec![
            ("limit".to_string(), Value::Int(10)),
            ("tags".to_string(), Value::List(vec![Value::Enum("ADMIN".to_string())])),
            ("note".to_string(), Value::String("a \"quoted\" note".to_string())),
        ]);
        assert_eq!(
            value.to_string(),
            "{limit: 10, tags: [ADMIN], note: \"a \\\"quoted\\\" note\"}"
        );
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn reindex_keeps_first_declaration_on_collision() {
        let mut doc = SchemaDocument::new();
        let mut first = TypeDefinition::new(DefinitionKind::Object, "User");
        first.pos = Pos::new("a.graphql", 1, 1);
        let mut second = TypeDefinition::new(DefinitionKind::Object, "User");
        second.pos = Pos::new("b.graphql", 3, 1);
        doc.definitions.push(first);
        doc.definitions.push(second);
        doc.reindex();

        let found = doc.find("User").expect("User is indexed");
        assert_eq!(found.pos.locator, "a.graphql");
        // Both declarations stay in the document for validation to reject.
        assert_eq!(doc.definitions.len(), 2);
    }

    #[test]
    fn kind_input_output_split() {
        assert!(DefinitionKind::Scalar.is_input());
        assert!(DefinitionKind::Scalar.is_output());
        assert!(DefinitionKind::InputObject.is_input());
        assert!(!DefinitionKind::InputObject.is_output());
        assert!(!DefinitionKind::Object.is_input());
        assert!(DefinitionKind::Object.is_output());
    }

    #[test]
    fn directive_location_round_trip() {
        for loc in [
            DirectiveLocation::Schema,
            DirectiveLocation::Field,
            DirectiveLocation::FieldDefinition,
            DirectiveLocation::InputFieldDefinition,
        ] {
            assert_eq!(DirectiveLocation::parse(loc.as_str()), Some(loc));
        }
        assert_eq!(DirectiveLocation::parse("EVERYWHERE"), None);
    }
}
