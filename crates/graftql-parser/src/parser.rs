//! Recursive descent parser for SDL type-system documents
//!
//! [`parse_schemas`] merges every input source, plus the built-in prelude,
//! into a single [`SchemaDocument`]. Definitions are appended in document
//! order across sources and are *not* deduplicated here; rejecting colliding
//! names is the validator's job. A syntax error anywhere fails the whole
//! call and no partial document is returned.

use graftql_core::{
    Argument, DefinitionKind, Directive, DirectiveDefinition, DirectiveLocation,
    EnumValueDefinition, FieldDefinition, InputValueDefinition, OperationType, Pos, RootOperation,
    SchemaDefinition, SchemaDocument, TypeDefinition, TypeRef, Value, PRELUDE, PRELUDE_LOCATOR,
};

use crate::error::LoadError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::SchemaInput;

/// Parse and merge all inputs plus the prelude into one document.
pub fn parse_schemas(inputs: &[SchemaInput]) -> Result<SchemaDocument, LoadError> {
    let mut doc = SchemaDocument::new();
    parse_source(&mut doc, PRELUDE_LOCATOR, PRELUDE, true)?;
    for input in inputs {
        parse_source(&mut doc, &input.locator, &input.text, false)?;
    }
    doc.reindex();
    Ok(doc)
}

fn parse_source(
    doc: &mut SchemaDocument,
    locator: &str,
    text: &str,
    built_in: bool,
) -> Result<(), LoadError> {
    let tokens = Lexer::new(locator, text).tokenize()?;
    Parser {
        locator,
        tokens,
        cursor: 0,
        built_in,
    }
    .parse_document(doc)
}

struct Parser<'a> {
    locator: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
    built_in: bool,
}

impl<'a> Parser<'a> {
    fn parse_document(mut self, doc: &mut SchemaDocument) -> Result<(), LoadError> {
        loop {
            if self.at_eof() {
                return Ok(());
            }
            let description = self.eat_description();
            let token = self.peek().clone();
            let TokenKind::Name(keyword) = &token.kind else {
                return Err(self.err_at(
                    &token,
                    format!("expected definition, found {}", token.kind.describe()),
                ));
            };
            match keyword.as_str() {
                "schema" => {
                    let def = self.parse_schema_definition(description)?;
                    doc.schema.push(def);
                }
                "scalar" => self.parse_type_definition(doc, DefinitionKind::Scalar, description)?,
                "type" => self.parse_type_definition(doc, DefinitionKind::Object, description)?,
                "interface" => {
                    self.parse_type_definition(doc, DefinitionKind::Interface, description)?
                }
                "union" => self.parse_type_definition(doc, DefinitionKind::Union, description)?,
                "enum" => self.parse_type_definition(doc, DefinitionKind::Enum, description)?,
                "input" => {
                    self.parse_type_definition(doc, DefinitionKind::InputObject, description)?
                }
                "directive" => {
                    let def = self.parse_directive_definition(description)?;
                    doc.directives.push(def);
                }
                "extend" => {
                    return Err(
                        self.err_at(&token, "type extensions are not supported".to_string())
                    );
                }
                other => {
                    return Err(
                        self.err_at(&token, format!("unexpected definition \"{}\"", other))
                    );
                }
            }
        }
    }

    fn parse_type_definition(
        &mut self,
        doc: &mut SchemaDocument,
        kind: DefinitionKind,
        description: Option<String>,
    ) -> Result<(), LoadError> {
        let keyword = self.next().clone();
        let (name, _) = self.expect_name("type name")?;

        let mut def = TypeDefinition::new(kind, name);
        def.description = description;
        def.built_in = self.built_in;
        def.pos = self.pos_of(&keyword);

        if matches!(kind, DefinitionKind::Object | DefinitionKind::Interface) {
            def.interfaces = self.parse_implements()?;
        }
        def.directives = self.parse_directives()?;

        match kind {
            DefinitionKind::Scalar => {}
            DefinitionKind::Object | DefinitionKind::Interface => {
                if self.at_punct('{') {
                    def.fields = self.parse_fields_block()?;
                }
            }
            DefinitionKind::Union => {
                if self.eat_punct('=') {
                    self.eat_punct('|');
                    loop {
                        let (member, _) = self.expect_name("union member")?;
                        def.union_members.push(member);
                        if !self.eat_punct('|') {
                            break;
                        }
                    }
                }
            }
            DefinitionKind::Enum => {
                if self.eat_punct('{') {
                    while !self.at_punct('}') {
                        def.enum_values.push(self.parse_enum_value()?);
                    }
                    self.expect_punct('}')?;
                }
            }
            DefinitionKind::InputObject => {
                if self.eat_punct('{') {
                    while !self.at_punct('}') {
                        def.input_fields.push(self.parse_input_value()?);
                    }
                    self.expect_punct('}')?;
                }
            }
        }

        doc.definitions.push(def);
        Ok(())
    }

    fn parse_implements(&mut self) -> Result<Vec<String>, LoadError> {
        let mut interfaces = Vec::new();
        if self.eat_keyword("implements") {
            self.eat_punct('&');
            loop {
                let (name, _) = self.expect_name("interface name")?;
                interfaces.push(name);
                if !self.eat_punct('&') {
                    break;
                }
            }
        }
        Ok(interfaces)
    }

    fn parse_fields_block(&mut self) -> Result<Vec<FieldDefinition>, LoadError> {
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        while !self.at_punct('}') {
            fields.push(self.parse_field()?);
        }
        self.expect_punct('}')?;
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<FieldDefinition, LoadError> {
        let description = self.eat_description();
        let (name, pos) = self.expect_name("field name")?;
        let arguments = if self.at_punct('(') {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };
        self.expect_punct(':')?;
        let ty = self.parse_type_ref()?;
        let directives = self.parse_directives()?;
        Ok(FieldDefinition {
            name,
            description,
            arguments,
            ty,
            directives,
            pos,
        })
    }

    fn parse_argument_definitions(&mut self) -> Result<Vec<InputValueDefinition>, LoadError> {
        self.expect_punct('(')?;
        let mut arguments = Vec::new();
        while !self.at_punct(')') {
            arguments.push(self.parse_input_value()?);
        }
        self.expect_punct(')')?;
        Ok(arguments)
    }

    fn parse_input_value(&mut self) -> Result<InputValueDefinition, LoadError> {
        let description = self.eat_description();
        let (name, pos) = self.expect_name("argument name")?;
        self.expect_punct(':')?;
        let ty = self.parse_type_ref()?;
        let default_value = if self.eat_punct('=') {
            Some(self.parse_value()?)
        } else {
            None
        };
        let directives = self.parse_directives()?;
        Ok(InputValueDefinition {
            name,
            description,
            ty,
            default_value,
            directives,
            pos,
        })
    }

    fn parse_enum_value(&mut self) -> Result<EnumValueDefinition, LoadError> {
        let description = self.eat_description();
        let (name, pos) = self.expect_name("enum value")?;
        let directives = self.parse_directives()?;
        Ok(EnumValueDefinition {
            name,
            description,
            directives,
            pos,
        })
    }

    fn parse_type_ref(&mut self) -> Result<TypeRef, LoadError> {
        let base = if self.eat_punct('[') {
            let inner = self.parse_type_ref()?;
            self.expect_punct(']')?;
            TypeRef::list(inner)
        } else {
            let (name, _) = self.expect_name("type reference")?;
            TypeRef::named(name)
        };
        if self.eat_punct('!') {
            Ok(TypeRef::non_null(base))
        } else {
            Ok(base)
        }
    }

    fn parse_value(&mut self) -> Result<Value, LoadError> {
        let token = self.next().clone();
        match &token.kind {
            TokenKind::Int(v) => Ok(Value::Int(*v)),
            TokenKind::Float(v) => Ok(Value::Float(*v)),
            TokenKind::Str(v) => Ok(Value::String(v.clone())),
            TokenKind::Name(name) => Ok(match name.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::Null,
                _ => Value::Enum(name.clone()),
            }),
            TokenKind::Punct('[') => {
                let mut items = Vec::new();
                while !self.at_punct(']') {
                    items.push(self.parse_value()?);
                }
                self.expect_punct(']')?;
                Ok(Value::List(items))
            }
            TokenKind::Punct('{') => {
                let mut fields = Vec::new();
                while !self.at_punct('}') {
                    let (name, _) = self.expect_name("object field name")?;
                    self.expect_punct(':')?;
                    fields.push((name, self.parse_value()?));
                }
                self.expect_punct('}')?;
                Ok(Value::Object(fields))
            }
            other => Err(self.err_at(
                &token,
                format!("expected value, found {}", other.describe()),
            )),
        }
    }

    fn parse_directives(&mut self) -> Result<Vec<Directive>, LoadError> {
        let mut directives = Vec::new();
        while self.at_punct('@') {
            let at = self.next().clone();
            let (name, _) = self.expect_name("directive name")?;
            let mut arguments = Vec::new();
            if self.eat_punct('(') {
                while !self.at_punct(')') {
                    let (arg_name, _) = self.expect_name("argument name")?;
                    self.expect_punct(':')?;
                    arguments.push(Argument {
                        name: arg_name,
                        value: self.parse_value()?,
                    });
                }
                self.expect_punct(')')?;
            }
            directives.push(Directive {
                name,
                arguments,
                pos: self.pos_of(&at),
            });
        }
        Ok(directives)
    }

    fn parse_directive_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<DirectiveDefinition, LoadError> {
        let keyword = self.next().clone();
        self.expect_punct('@')?;
        let (name, _) = self.expect_name("directive name")?;
        let arguments = if self.at_punct('(') {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };
        let repeatable = self.eat_keyword("repeatable");
        if !self.eat_keyword("on") {
            let token = self.peek().clone();
            return Err(self.err_at(
                &token,
                format!("expected \"on\", found {}", token.kind.describe()),
            ));
        }
        self.eat_punct('|');
        let mut locations = Vec::new();
        loop {
            let (loc_name, loc_pos) = self.expect_name("directive location")?;
            match DirectiveLocation::parse(&loc_name) {
                Some(location) => locations.push(location),
                None => {
                    return Err(LoadError::Syntax {
                        locator: self.locator.to_string(),
                        line: loc_pos.line,
                        column: loc_pos.column,
                        message: format!("unknown directive location \"{}\"", loc_name),
                    })
                }
            }
            if !self.eat_punct('|') {
                break;
            }
        }
        Ok(DirectiveDefinition {
            name,
            description,
            arguments,
            repeatable,
            locations,
            built_in: self.built_in,
            pos: self.pos_of(&keyword),
        })
    }

    fn parse_schema_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<SchemaDefinition, LoadError> {
        let keyword = self.next().clone();
        let directives = self.parse_directives()?;
        self.expect_punct('{')?;
        let mut operations = Vec::new();
        while !self.at_punct('}') {
            let (op_name, op_pos) = self.expect_name("operation type")?;
            let operation = match op_name.as_str() {
                "query" => OperationType::Query,
                "mutation" => OperationType::Mutation,
                "subscription" => OperationType::Subscription,
                other => {
                    return Err(LoadError::Syntax {
                        locator: self.locator.to_string(),
                        line: op_pos.line,
                        column: op_pos.column,
                        message: format!("unknown operation type \"{}\"", other),
                    })
                }
            };
            self.expect_punct(':')?;
            let (type_name, _) = self.expect_name("type name")?;
            operations.push(RootOperation {
                operation,
                type_name,
                pos: op_pos,
            });
        }
        self.expect_punct('}')?;
        Ok(SchemaDefinition {
            description,
            directives,
            operations,
            pos: self.pos_of(&keyword),
        })
    }

    // Token stream helpers.

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor]
    }

    fn next(&mut self) -> &Token {
        let token = &self.tokens[self.cursor];
        // The Eof token is never consumed, so the cursor stays in bounds.
        if !matches!(token.kind, TokenKind::Eof) {
            self.cursor += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn at_punct(&self, c: char) -> bool {
        self.peek().kind == TokenKind::Punct(c)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.at_punct(c) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(&self.peek().kind, TokenKind::Name(name) if name == keyword) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn eat_description(&mut self) -> Option<String> {
        if let TokenKind::Str(value) = &self.peek().kind {
            let value = value.clone();
            self.cursor += 1;
            Some(value)
        } else {
            None
        }
    }

    fn expect_name(&mut self, what: &str) -> Result<(String, Pos), LoadError> {
        let token = self.peek().clone();
        if let TokenKind::Name(name) = &token.kind {
            let pos = self.pos_of(&token);
            self.cursor += 1;
            Ok((name.clone(), pos))
        } else {
            Err(self.err_at(
                &token,
                format!("expected {}, found {}", what, token.kind.describe()),
            ))
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), LoadError> {
        let token = self.peek().clone();
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.err_at(
                &token,
                format!("expected \"{}\", found {}", c, token.kind.describe()),
            ))
        }
    }

    fn pos_of(&self, token: &Token) -> Pos {
        Pos::new(self.locator, token.line, token.column)
    }

    fn err_at(&self, token: &Token, message: String) -> LoadError {
        LoadError::Syntax {
            locator: self.locator.to_string(),
            line: token.line,
            column: token.column,
            message,
        }
    }
}
