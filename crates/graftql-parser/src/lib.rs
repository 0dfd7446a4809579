//! SDL parsing, interface inheritance, and schema validation for graftql
//!
//! The pipeline for one run is strictly sequential:
//!
//! 1. [`read_schemas`] — resolve each locator through a source reader.
//! 2. [`parse_schemas`] — merge all sources plus the prelude into one
//!    [`SchemaDocument`].
//! 3. [`inherit_interfaces`] — copy interface fields onto implementing
//!    objects, in place, exactly once.
//! 4. [`validate_schema`] — the terminal gate; a rejected document is
//!    dumped to the diagnostic stream and never handed onward.
//!
//! [`load_schemas`] runs steps 2–4. No stage is skipped or retried, and a
//! document is never reused across runs.

pub mod error;
pub mod format;
pub mod inherit;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod validate;

use std::io;

use graftql_core::SchemaDocument;
use tracing::{debug, info};

pub use error::LoadError;
pub use format::{format_document, print_diagnostic, DIAGNOSTIC_HEADER};
pub use inherit::inherit_interfaces;
pub use parser::parse_schemas;
pub use reader::{discover, SourceReader};
pub use validate::validate_schema;

/// One raw schema source: its text plus the locator it was read from.
#[derive(Debug, Clone)]
pub struct SchemaInput {
    pub text: String,
    pub locator: String,
}

/// Read every locator, in supply order, through its discovered reader.
///
/// The first failing locator aborts the whole call; sources must be valid
/// UTF-8.
pub fn read_schemas(locators: &[String]) -> Result<Vec<SchemaInput>, LoadError> {
    let mut inputs = Vec::with_capacity(locators.len());
    for locator in locators {
        let bytes = reader::discover(locator)
            .read()
            .map_err(|e| LoadError::read(locator.as_str(), e))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            LoadError::read(locator.as_str(), io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        debug!(locator = %locator, bytes = text.len(), "read schema source");
        inputs.push(SchemaInput {
            text,
            locator: locator.clone(),
        });
    }
    Ok(inputs)
}

/// Parse, merge, resolve inheritance, and validate the given sources.
///
/// On a validation error the rejected document is dumped to stderr first;
/// see [`load_schemas_with_diagnostics`] to capture that dump elsewhere.
pub fn load_schemas(inputs: &[SchemaInput]) -> Result<SchemaDocument, LoadError> {
    load_schemas_with_diagnostics(inputs, &mut io::stderr())
}

/// [`load_schemas`] with an explicit diagnostic sink.
pub fn load_schemas_with_diagnostics(
    inputs: &[SchemaInput],
    diagnostics: &mut dyn io::Write,
) -> Result<SchemaDocument, LoadError> {
    let mut doc = parse_schemas(inputs)?;
    debug!(
        sources = inputs.len(),
        definitions = doc.definitions.len(),
        "parsed schema sources"
    );

    inherit_interfaces(&mut doc)?;
    debug!("resolved interface inheritance");

    if let Err(err) = validate_schema(&doc) {
        print_diagnostic(&doc, diagnostics);
        return Err(err);
    }
    info!(definitions = doc.definitions.len(), "schema validated");
    Ok(doc)
}
