//! Interface inheritance: copy interface fields onto implementing objects

use graftql_core::{DefinitionKind, SchemaDocument};

use crate::error::LoadError;

/// Append each declared interface's fields to every implementing object.
///
/// Single pass over the definitions in document order. For each object, the
/// declared interface names are resolved in declaration order and the
/// interface's fields are appended to the end of the object's field list, so
/// the resulting order is: the object's own fields first, then inherited
/// fields grouped by interface. Interfaces are expanded one level only; an
/// interface's own `implements` list is left alone.
///
/// An interface name that does not resolve to an interface definition fails
/// the whole pass immediately; nothing after it is processed.
///
/// Not idempotent: a second call appends the inherited fields again. The
/// pipeline calls this exactly once per document.
pub fn inherit_interfaces(doc: &mut SchemaDocument) -> Result<(), LoadError> {
    for idx in 0..doc.definitions.len() {
        if doc.definitions[idx].kind != DefinitionKind::Object {
            continue;
        }
        let interfaces = doc.definitions[idx].interfaces.clone();
        for interface_name in interfaces {
            let inherited = match doc.find(&interface_name) {
                Some(def) if def.kind == DefinitionKind::Interface => def.fields.clone(),
                _ => return Err(LoadError::NoSuchInterface(interface_name)),
            };
            doc.definitions[idx].fields.extend(inherited);
        }
    }
    Ok(())
}
