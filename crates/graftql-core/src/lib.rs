//! Core schema document model for graftql

pub mod ast;
pub mod prelude;

pub use ast::{
    Argument, DefinitionKind, Directive, DirectiveDefinition, DirectiveLocation,
    EnumValueDefinition, FieldDefinition, InputValueDefinition, OperationType, Pos, RootOperation,
    SchemaDefinition, SchemaDocument, TypeDefinition, TypeRef, Value,
};
pub use prelude::{PRELUDE, PRELUDE_LOCATOR};
