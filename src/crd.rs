use crate::error::{Error, Result};
use crate::kinds::KindProperties;
use crate::lineage::Lineage;
use crate::openapi::OpenApiSettings;
use crate::version::SyntacticVersion;
use crate::walker::lineage_versions;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinitionNames;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const API_VERSION: &str = "apiextensions.k8s.io/v1";
pub const KIND: &str = "CustomResourceDefinition";

// The apiextensions types in k8s-openapi decode schemas into JSONSchemaProps,
// which drops keywords it has no field for (const, readOnly, $comment, ...).
// These keep the rendered schema as raw JSON instead.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinition {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: CustomResourceDefinitionSpec,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomResourceDefinitionSpec {
    pub group: String,
    pub names: CustomResourceDefinitionNames,
    pub scope: String,
    pub versions: Vec<CustomResourceDefinitionVersion>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomResourceDefinitionVersion {
    pub name: String,
    pub served: bool,
    pub storage: bool,
    pub schema: CustomResourceValidation,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomResourceValidation {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: Value,
}

/// Scope of the generated resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Cluster,
    Namespaced,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Cluster => "cluster",
            Scope::Namespaced => "namespaced",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrdSettings {
    pub scope: Scope,
    /// Version the lineage walk starts at.
    pub start_version: SyntacticVersion,
    pub openapi: OpenApiSettings,
}

impl Default for CrdSettings {
    fn default() -> Self {
        Self {
            scope: Scope::Cluster,
            start_version: SyntacticVersion(0, 0),
            openapi: OpenApiSettings::default(),
        }
    }
}

impl CrdSettings {
    /// Only cluster scoped lineages starting at 0.0 can be generated for now.
    pub fn validate(&self) -> Result<()> {
        if self.scope != Scope::Cluster {
            return Err(Error::UnsupportedConfiguration(format!(
                "scope {} is not supported, only {} resources can be generated",
                self.scope,
                Scope::Cluster
            )));
        }
        if self.start_version != SyntacticVersion(0, 0) {
            return Err(Error::UnsupportedConfiguration(format!(
                "lineages starting at version {} are not supported",
                self.start_version
            )));
        }
        Ok(())
    }
}

/// Builds the CRD for a kind out of all schemas in its lineage.
pub fn lineage_to_crd(
    props: &KindProperties,
    lineage: &dyn Lineage,
    settings: &CrdSettings,
) -> Result<CustomResourceDefinition> {
    settings.validate()?;
    let versions = lineage_versions(lineage, settings.start_version, &settings.openapi)?;
    Ok(assemble(props, settings.scope, versions))
}

pub fn assemble(
    props: &KindProperties,
    scope: Scope,
    versions: Vec<CustomResourceDefinitionVersion>,
) -> CustomResourceDefinition {
    CustomResourceDefinition {
        api_version: API_VERSION.to_owned(),
        kind: KIND.to_owned(),
        metadata: ObjectMeta {
            name: Some(props.crd_name()),
            ..Default::default()
        },
        spec: CustomResourceDefinitionSpec {
            group: props.group.clone(),
            scope: scope.as_str().to_owned(),
            names: CustomResourceDefinitionNames {
                kind: props.name.clone(),
                plural: props.plural_machine_name.clone(),
                ..Default::default()
            },
            versions,
        },
    }
}

pub fn to_yaml(crd: &CustomResourceDefinition) -> Result<Vec<u8>> {
    Ok(serde_yaml::to_string(crd)?.into_bytes())
}

/// Converts a kind's lineage into CRD YAML, attaching the kind to any error.
pub fn generate_crd_yaml(
    props: &KindProperties,
    lineage: &dyn Lineage,
    settings: &CrdSettings,
) -> Result<Vec<u8>> {
    lineage_to_crd(props, lineage, settings)
        .and_then(|crd| to_yaml(&crd))
        .map_err(|e| e.for_kind(&props.name))
}
