use crate::crd::{CustomResourceDefinitionVersion, CustomResourceValidation};
use crate::error::{Error, Result};
use crate::lineage::Schema;
use crate::openapi::{self, OpenApiSettings, RenderError};
use serde_json::{json, Value};

pub const SPEC_PROPERTY: &str = "spec";

/// Translates one schema revision into a CRD version entry.
///
/// The revision must render to exactly one object schema, which becomes the
/// `spec` property of the resource. The schema is carried over untouched.
pub fn schema_to_crd_version(
    schema: &dyn Schema,
    name: &str,
    storage: bool,
    settings: &OpenApiSettings,
) -> Result<CustomResourceDefinitionVersion> {
    let version = schema.version();
    let document = schema
        .openapi(settings)
        .map_err(|source| Error::Render { version, source })?;
    let mut schemas =
        openapi::component_schemas(&document).map_err(|source| Error::Render { version, source })?;

    if schemas.len() != 1 {
        // TODO: subresources will render sibling schemas, those need their own names in the CRD
        return Err(Error::SchemaCardinality {
            version,
            count: schemas.len(),
        });
    }
    let Some((component, def)) = schemas.pop_first() else {
        return Err(Error::SchemaCardinality { version, count: 0 });
    };
    tracing::trace!("Using openapi schema {component} for version {version}");

    let def = match def {
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(Error::SchemaShape {
                version,
                reason: format!("generated schema has invalid type: {}", json_kind(&other)),
            })
        }
    };
    // a CRD has nothing to resolve references against
    if let Some(reference) = openapi::first_reference(&def) {
        return Err(Error::Render {
            version,
            source: RenderError::UnresolvedReference(reference.to_owned()),
        });
    }

    Ok(CustomResourceDefinitionVersion {
        name: name.to_owned(),
        served: true,
        storage,
        schema: CustomResourceValidation {
            open_api_v3_schema: wrap_spec(def),
        },
    })
}

fn wrap_spec(def: Value) -> Value {
    json!({
        "type": "object",
        "required": [SPEC_PROPERTY],
        "properties": {
            SPEC_PROPERTY: def,
        },
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::{Lineage, SchemaLineage};
    use crate::version::SyntacticVersion;
    use schemars::JsonSchema;
    use serde_derive::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, JsonSchema)]
    struct TeamSpec {
        name: String,
        email: Option<String>,
        members: Vec<Member>,
    }

    #[derive(Serialize, Deserialize, JsonSchema)]
    struct Member {
        login: String,
    }

    fn spec_of(version: &CustomResourceDefinitionVersion) -> &Value {
        &version.schema.open_api_v3_schema["properties"][SPEC_PROPERTY]
    }

    fn rendered_schema(schema: &dyn Schema) -> Value {
        let document = schema.openapi(&OpenApiSettings::default()).unwrap();
        let mut schemas = openapi::component_schemas(&document).unwrap();
        schemas.pop_first().unwrap().1
    }

    #[derive(Serialize, Deserialize, JsonSchema)]
    struct Row {
        title: String,
        panels: Vec<Row>,
    }

    #[test]
    fn test_typed_schema_to_crd_version() {
        let lineage = SchemaLineage::builder("team")
            .typed::<TeamSpec>((1, 2))
            .build()
            .unwrap();
        let schema = lineage.schema(SyntacticVersion(1, 2)).unwrap();

        let version =
            schema_to_crd_version(schema, "v1-2", true, &OpenApiSettings::default()).unwrap();
        assert_eq!(version.name, "v1-2");
        assert!(version.served);
        assert!(version.storage);

        let root = &version.schema.open_api_v3_schema;
        assert_eq!(root["type"], "object");
        assert_eq!(root["required"], json!(["spec"]));

        let spec = spec_of(&version);
        assert_eq!(spec, &rendered_schema(schema));
        assert_eq!(spec["type"], "object");
        assert_eq!(spec["properties"]["name"]["type"], "string");
        assert_eq!(spec["properties"]["email"]["nullable"], true);
        assert_eq!(spec["properties"]["members"]["type"], "array");
        assert_eq!(
            spec["properties"]["members"]["items"]["properties"]["login"]["type"],
            "string"
        );
        assert_eq!(spec["required"], json!(["members", "name"]));
        assert!(!version.schema.open_api_v3_schema.to_string().contains("$ref"));
    }

    #[test]
    fn test_schema_keywords_are_kept() {
        let original = json!({
            "type": "object",
            "deprecated": true,
            "properties": {
                "id": { "type": "string", "readOnly": true, "$comment": "server set" },
                "secret": { "type": "string", "writeOnly": true },
                "kind": { "const": "x" },
                "labels": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "x-kubernetes-preserve-unknown-fields": true
                }
            }
        });
        let lineage = SchemaLineage::builder("team")
            .document(
                (0, 0),
                json!({ "components": { "schemas": { "Team": original.clone() } } }),
            )
            .build()
            .unwrap();

        let version =
            schema_to_crd_version(lineage.first(), "v0-0", true, &OpenApiSettings::default())
                .unwrap();
        assert_eq!(spec_of(&version), &original);
        assert_eq!(spec_of(&version)["properties"]["kind"]["const"], "x");
    }

    #[test]
    fn test_recursive_type_is_render_error() {
        let lineage = SchemaLineage::builder("row")
            .typed::<Row>((0, 0))
            .build()
            .unwrap();
        let result =
            schema_to_crd_version(lineage.first(), "v0-0", true, &OpenApiSettings::default());
        assert!(matches!(
            result,
            Err(Error::Render {
                source: RenderError::CyclicReference(_),
                ..
            })
        ));
    }

    #[test]
    fn test_leftover_reference_is_render_error() {
        let settings = OpenApiSettings {
            expand_references: false,
        };
        let typed = SchemaLineage::builder("row")
            .typed::<Row>((0, 0))
            .build()
            .unwrap();
        let result = schema_to_crd_version(typed.first(), "v0-0", true, &settings);
        assert!(matches!(
            result,
            Err(Error::Render {
                source: RenderError::UnresolvedReference(_),
                ..
            })
        ));

        let document = SchemaLineage::builder("team")
            .document(
                (0, 0),
                json!({ "components": { "schemas": { "Team": {
                    "type": "object",
                    "properties": { "owner": { "$ref": "#/components/schemas/Team" } }
                } } } }),
            )
            .build()
            .unwrap();
        let result = schema_to_crd_version(document.first(), "v0-0", true, &settings);
        assert!(matches!(
            result,
            Err(Error::Render {
                source: RenderError::UnresolvedReference(_),
                ..
            })
        ));
    }

    #[test]
    fn test_multiple_schemas_is_cardinality_error() {
        let lineage = SchemaLineage::builder("team")
            .document(
                (0, 3),
                json!({
                    "components": { "schemas": {
                        "Team": { "type": "object" },
                        "TeamStatus": { "type": "object" }
                    } }
                }),
            )
            .build()
            .unwrap();
        let result =
            schema_to_crd_version(lineage.first(), "v0-3", false, &OpenApiSettings::default());
        assert!(matches!(
            result,
            Err(Error::SchemaCardinality { version, count: 2 }) if version == SyntacticVersion(0, 3)
        ));
    }

    #[test]
    fn test_unexpanded_references_is_cardinality_error() {
        let lineage = SchemaLineage::builder("team")
            .typed::<TeamSpec>((0, 0))
            .build()
            .unwrap();
        let settings = OpenApiSettings {
            expand_references: false,
        };
        let result = schema_to_crd_version(lineage.first(), "v0-0", true, &settings);
        assert!(matches!(
            result,
            Err(Error::SchemaCardinality { count: 2, .. })
        ));
    }

    #[test]
    fn test_no_schema_is_cardinality_error() {
        let lineage = SchemaLineage::builder("team")
            .document((0, 0), json!({ "openapi": "3.0.0", "paths": {} }))
            .build()
            .unwrap();
        let result =
            schema_to_crd_version(lineage.first(), "v0-0", true, &OpenApiSettings::default());
        assert!(matches!(
            result,
            Err(Error::SchemaCardinality { count: 0, .. })
        ));
    }

    #[test]
    fn test_scalar_schema_is_shape_error() {
        let lineage = SchemaLineage::builder("team")
            .document(
                (0, 0),
                json!({ "components": { "schemas": { "Team": "object" } } }),
            )
            .build()
            .unwrap();
        let result =
            schema_to_crd_version(lineage.first(), "v0-0", true, &OpenApiSettings::default());
        assert!(matches!(result, Err(Error::SchemaShape { .. })));
    }

    #[test]
    fn test_render_failure_is_render_error() {
        let lineage = SchemaLineage::builder("team")
            .document(
                (0, 1),
                json!({ "components": { "schemas": {
                    "Team": { "$ref": "#/components/schemas/Nope" }
                } } }),
            )
            .build()
            .unwrap();
        let result =
            schema_to_crd_version(lineage.first(), "v0-1", true, &OpenApiSettings::default());
        assert!(matches!(
            result,
            Err(Error::Render {
                source: RenderError::UnresolvedReference(_),
                ..
            })
        ));
    }
}
