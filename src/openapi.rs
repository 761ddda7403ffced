//! Rendering of schema revisions into OpenAPI v3 documents.
//!
//! Typed revisions are rendered with schemars in OpenAPI 3 mode and passed
//! through kube's structural schema rewriter, the same way `kube` derives
//! CRD schemas. Pre-rendered documents get their internal
//! `#/components/schemas/...` references expanded inline, since a CRD
//! cannot resolve references.

use crate::version::SyntacticVersion;
use kube::core::schema::StructuralSchemaRewriter;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_derive::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

const OPENAPI_VERSION: &str = "3.0.0";
const COMPONENTS_PREFIX: &str = "#/components/schemas/";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not encode schema: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid openapi document: {0}")]
    InvalidDocument(String),
    #[error("reference {0} can not be resolved")]
    UnresolvedReference(String),
    #[error("schema {0} references itself")]
    CyclicReference(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiSettings {
    /// Inline every schema reference instead of emitting `$ref`s.
    pub expand_references: bool,
}

impl Default for OpenApiSettings {
    fn default() -> Self {
        Self {
            expand_references: true,
        }
    }
}

/// Renders the schema of `T` into a full OpenAPI v3 document.
pub fn render_typed<T: JsonSchema>(
    version: SyntacticVersion,
    settings: &OpenApiSettings,
) -> Result<Value, RenderError> {
    let expand = settings.expand_references;
    let generator = SchemaSettings::openapi3()
        .with(|s| {
            s.inline_subschemas = expand;
            s.meta_schema = None;
        })
        .with_visitor(StructuralSchemaRewriter)
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let name = T::schema_name();
    let mut schemas = Map::new();
    for (definition, schema) in root.definitions {
        schemas.insert(definition, serde_json::to_value(schema)?);
    }
    schemas.insert(name.clone(), serde_json::to_value(root.schema)?);
    let document = openapi_document(&name, version, schemas);
    // schemars keeps a $ref for recursive types even with inlining on
    if expand {
        expand_references(&document)
    } else {
        Ok(document)
    }
}

/// Renders an already encoded OpenAPI v3 document.
pub fn render_document(document: &Value, settings: &OpenApiSettings) -> Result<Value, RenderError> {
    if !document.is_object() {
        return Err(RenderError::InvalidDocument(
            "document root is not a mapping".to_owned(),
        ));
    }
    if settings.expand_references {
        expand_references(document)
    } else {
        Ok(document.clone())
    }
}

fn openapi_document(title: &str, version: SyntacticVersion, schemas: Map<String, Value>) -> Value {
    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": title,
            "version": version.to_string(),
        },
        "paths": {},
        "components": {
            "schemas": schemas,
        },
    })
}

/// Replaces every `$ref` into `components.schemas` with the schema it points to.
pub fn expand_references(document: &Value) -> Result<Value, RenderError> {
    let definitions = document
        .pointer("/components/schemas")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let mut expanded = document.clone();
    if let Some(schemas) = expanded
        .pointer_mut("/components/schemas")
        .and_then(Value::as_object_mut)
    {
        for (name, schema) in schemas.iter_mut() {
            let mut stack = vec![name.clone()];
            inline(schema, &definitions, &mut stack)?;
        }
    }
    if let Some(Value::Object(paths)) = expanded.get_mut("paths") {
        for path in paths.values_mut() {
            inline(path, &definitions, &mut Vec::new())?;
        }
    }
    Ok(expanded)
}

fn inline(
    value: &mut Value,
    definitions: &Map<String, Value>,
    stack: &mut Vec<String>,
) -> Result<(), RenderError> {
    if let Value::Object(map) = value {
        if let Some(reference) = map.remove("$ref") {
            // keys next to a $ref (description, nullable, ...) win over the target
            match resolve(&reference, definitions, stack)? {
                Value::Object(target) => {
                    for (key, item) in target {
                        map.entry(key).or_insert(item);
                    }
                }
                other => {
                    *value = other;
                    return Ok(());
                }
            }
        }
    }
    match value {
        Value::Object(map) => {
            for item in map.values_mut() {
                inline(item, definitions, stack)?;
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline(item, definitions, stack)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Finds the first `$ref` left anywhere below `value`.
pub fn first_reference(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => match map.get("$ref") {
            Some(reference) => Some(reference.as_str().unwrap_or("$ref")),
            None => map.values().find_map(first_reference),
        },
        Value::Array(items) => items.iter().find_map(first_reference),
        _ => None,
    }
}

fn resolve(
    reference: &Value,
    definitions: &Map<String, Value>,
    stack: &mut Vec<String>,
) -> Result<Value, RenderError> {
    let Some(name) = reference
        .as_str()
        .and_then(|r| r.strip_prefix(COMPONENTS_PREFIX))
    else {
        return Err(RenderError::UnresolvedReference(reference.to_string()));
    };
    if stack.iter().any(|seen| seen == name) {
        return Err(RenderError::CyclicReference(name.to_owned()));
    }
    let Some(target) = definitions.get(name) else {
        return Err(RenderError::UnresolvedReference(reference.to_string()));
    };

    let mut target = target.clone();
    stack.push(name.to_owned());
    inline(&mut target, definitions, stack)?;
    stack.pop();
    Ok(target)
}

// Only the part of the document a CRD needs; openapi, info and paths are dropped.
#[derive(Deserialize, Default)]
struct OpenApiEncoded {
    #[serde(default)]
    components: OpenApiEncodedComponents,
}

#[derive(Deserialize, Default)]
struct OpenApiEncodedComponents {
    #[serde(default)]
    schemas: BTreeMap<String, Value>,
}

/// Decodes just `components.schemas` out of a rendered document.
pub fn component_schemas(document: &Value) -> Result<BTreeMap<String, Value>, RenderError> {
    let encoded = <OpenApiEncoded as serde::Deserialize>::deserialize(document)
        .map_err(|e| RenderError::InvalidDocument(e.to_string()))?;
    Ok(encoded.components.schemas)
}
