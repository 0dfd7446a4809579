//! Canonical SDL rendering and the validation diagnostic dump
//!
//! On validation failure the pipeline prints the merged,
//! inheritance-resolved document back as schema text, because that document
//! can differ substantially from any single input file. Rendering is pure;
//! the dump never fails the run.

use std::fmt::Write as _;
use std::io;

use graftql_core::{
    DefinitionKind, Directive, DirectiveDefinition, FieldDefinition, InputValueDefinition,
    SchemaDefinition, SchemaDocument, TypeDefinition,
};

/// Fixed header line preceding the diagnostic dump of a rejected document.
pub const DIAGNOSTIC_HEADER: &str = "Parsed schema:";

/// Render the document back to canonical SDL, in document order, skipping
/// the built-in prelude definitions.
pub fn format_document(doc: &SchemaDocument) -> String {
    let mut f = Formatter::default();
    for schema in &doc.schema {
        f.write_schema_definition(schema);
    }
    for directive in doc.directives.iter().filter(|d| !d.built_in) {
        f.write_directive_definition(directive);
    }
    for def in doc.definitions.iter().filter(|d| !d.built_in) {
        f.write_type_definition(def);
    }
    f.out
}

/// Write the diagnostic header plus the canonical rendering to `sink`.
///
/// Write errors are ignored: a broken diagnostic stream degrades to partial
/// output, it never masks the validation error being surfaced.
pub fn print_diagnostic(doc: &SchemaDocument, sink: &mut dyn io::Write) {
    let _ = writeln!(sink, "{}", DIAGNOSTIC_HEADER);
    let _ = sink.write_all(format_document(doc).as_bytes());
}

const INDENT: &str = "  ";

#[derive(Default)]
struct Formatter {
    out: String,
}

impl Formatter {
    fn separate(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    fn write_schema_definition(&mut self, def: &SchemaDefinition) {
        self.separate();
        self.write_description(&def.description, "");
        self.out.push_str("schema");
        self.write_directives(&def.directives);
        self.out.push_str(" {\n");
        for op in &def.operations {
            let _ = writeln!(
                self.out,
                "{}{}: {}",
                INDENT,
                op.operation.keyword(),
                op.type_name
            );
        }
        self.out.push_str("}\n");
    }

    fn write_directive_definition(&mut self, def: &DirectiveDefinition) {
        self.separate();
        self.write_description(&def.description, "");
        let _ = write!(self.out, "directive @{}", def.name);
        self.write_argument_list(&def.arguments);
        if def.repeatable {
            self.out.push_str(" repeatable");
        }
        let locations: Vec<&str> = def.locations.iter().map(|l| l.as_str()).collect();
        let _ = writeln!(self.out, " on {}", locations.join(" | "));
    }

    fn write_type_definition(&mut self, def: &TypeDefinition) {
        self.separate();
        self.write_description(&def.description, "");
        let _ = write!(self.out, "{} {}", def.kind.keyword(), def.name);
        if !def.interfaces.is_empty() {
            let _ = write!(self.out, " implements {}", def.interfaces.join(" & "));
        }
        self.write_directives(&def.directives);

        match def.kind {
            DefinitionKind::Union => {
                if !def.union_members.is_empty() {
                    let _ = write!(self.out, " = {}", def.union_members.join(" | "));
                }
                self.out.push('\n');
            }
            DefinitionKind::Enum => {
                if def.enum_values.is_empty() {
                    self.out.push('\n');
                    return;
                }
                self.out.push_str(" {\n");
                for value in &def.enum_values {
                    self.write_description(&value.description, INDENT);
                    self.out.push_str(INDENT);
                    self.out.push_str(&value.name);
                    self.write_directives(&value.directives);
                    self.out.push('\n');
                }
                self.out.push_str("}\n");
            }
            DefinitionKind::InputObject => {
                if def.input_fields.is_empty() {
                    self.out.push('\n');
                    return;
                }
                self.out.push_str(" {\n");
                for field in &def.input_fields {
                    self.write_description(&field.description, INDENT);
                    self.out.push_str(INDENT);
                    self.write_input_value(field);
                    self.out.push('\n');
                }
                self.out.push_str("}\n");
            }
            _ => {
                if def.fields.is_empty() {
                    self.out.push('\n');
                    return;
                }
                self.out.push_str(" {\n");
                for field in &def.fields {
                    self.write_field(field);
                }
                self.out.push_str("}\n");
            }
        }
    }

    fn write_field(&mut self, field: &FieldDefinition) {
        self.write_description(&field.description, INDENT);
        self.out.push_str(INDENT);
        self.out.push_str(&field.name);
        self.write_argument_list(&field.arguments);
        let _ = write!(self.out, ": {}", field.ty);
        self.write_directives(&field.directives);
        self.out.push('\n');
    }

    fn write_argument_list(&mut self, arguments: &[InputValueDefinition]) {
        if arguments.is_empty() {
            return;
        }
        self.out.push('(');
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            if let Some(description) = &arg.description {
                let _ = write!(self.out, "\"{}\" ", description.replace('"', "\\\""));
            }
            self.write_input_value(arg);
        }
        self.out.push(')');
    }

    fn write_input_value(&mut self, value: &InputValueDefinition) {
        let _ = write!(self.out, "{}: {}", value.name, value.ty);
        if let Some(default) = &value.default_value {
            let _ = write!(self.out, " = {}", default);
        }
        self.write_directives(&value.directives);
    }

    fn write_directives(&mut self, directives: &[Directive]) {
        for directive in directives {
            let _ = write!(self.out, " @{}", directive.name);
            if !directive.arguments.is_empty() {
                self.out.push('(');
                for (i, arg) in directive.arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    let _ = write!(self.out, "{}: {}", arg.name, arg.value);
                }
                self.out.push(')');
            }
        }
    }

    fn write_description(&mut self, description: &Option<String>, indent: &str) {
        let Some(description) = description else {
            return;
        };
        let _ = writeln!(self.out, "{}\"\"\"", indent);
        for line in description.split('\n') {
            let _ = writeln!(self.out, "{}{}", indent, line);
        }
        let _ = writeln!(self.out, "{}\"\"\"", indent);
    }
}
