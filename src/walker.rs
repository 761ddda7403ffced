use crate::crd::CustomResourceDefinitionVersion;
use crate::error::{Error, Result};
use crate::lineage::{Lineage, Schema};
use crate::openapi::OpenApiSettings;
use crate::translate::schema_to_crd_version;
use crate::version::SyntacticVersion;

/// Walks every schema of the lineage from `start` to the newest one and
/// translates each into a CRD version entry.
///
/// Only the latest version of the lineage is flagged as storage version. Any
/// translation failure aborts the walk and no entries are returned.
pub fn lineage_versions(
    lineage: &dyn Lineage,
    start: SyntacticVersion,
    settings: &OpenApiSettings,
) -> Result<Vec<CustomResourceDefinitionVersion>> {
    let Some(mut schema) = lineage.schema(start) else {
        return Err(Error::LineageEmpty {
            lineage: lineage.name().to_owned(),
            version: start,
        });
    };
    let latest = lineage.latest_version();

    let mut versions = Vec::new();
    loop {
        let version = schema.version();
        let name = version.crd_version_name();
        let storage = version == latest;
        tracing::debug!(
            "Translating schema {version} of lineage {} as {name} (storage: {storage})",
            lineage.name()
        );
        versions.push(schema_to_crd_version(schema, &name, storage, settings)?);

        match schema.successor() {
            Some(next) => schema = next,
            None => break,
        }
    }

    let stored = versions.iter().filter(|v| v.storage).count();
    if stored != 1 {
        return Err(Error::MissingStorageVersion { latest });
    }
    Ok(versions)
}
