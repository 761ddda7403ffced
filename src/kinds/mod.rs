//! Core structured kinds and their schema lineages.

pub mod dashboard;
pub mod playlist;

use crate::error::{Error, Result};
use crate::lineage::SchemaLineage;
use serde_derive::{Deserialize, Serialize};

pub const CORE_GROUP: &str = "core.grafana.com";

/// Identity of a kind as it shows up in its CRD.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KindProperties {
    /// API group, e.g. `core.grafana.com`
    pub group: String,
    /// kind name, e.g. `Dashboard`
    pub name: String,
    /// machine readable name, e.g. `dashboard`
    pub machine_name: String,
    /// plural machine readable name, e.g. `dashboards`
    pub plural_machine_name: String,
}

impl KindProperties {
    pub fn core(name: &str, machine_name: &str, plural_machine_name: &str) -> Self {
        Self {
            group: CORE_GROUP.to_owned(),
            name: name.to_owned(),
            machine_name: machine_name.to_owned(),
            plural_machine_name: plural_machine_name.to_owned(),
        }
    }

    /// `<pluralMachineName>.<group>`
    pub fn crd_name(&self) -> String {
        format!("{}.{}", self.plural_machine_name, self.group)
    }
}

#[derive(Debug)]
pub struct CoreKind {
    pub properties: KindProperties,
    pub lineage: SchemaLineage,
}

pub fn core_kinds() -> Result<Vec<CoreKind>> {
    Ok(vec![dashboard::kind()?, playlist::kind()?])
}

/// Picks the kinds with the given machine names, in registry order. No names
/// selects every kind.
pub fn select<'a>(kinds: &'a [CoreKind], names: &[String]) -> Result<Vec<&'a CoreKind>> {
    if let Some(unknown) = names
        .iter()
        .find(|name| !kinds.iter().any(|k| &k.properties.machine_name == *name))
    {
        return Err(Error::UnknownKind(unknown.clone()));
    }
    Ok(kinds
        .iter()
        .filter(|k| names.is_empty() || names.contains(&k.properties.machine_name))
        .collect())
}
