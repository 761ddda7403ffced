//! Schema lineages: ordered chains of schema revisions for one kind.

use crate::error::{Error, Result};
use crate::openapi::{self, OpenApiSettings, RenderError};
use crate::version::SyntacticVersion;
use schemars::JsonSchema;
use serde_json::Value;

/// A single schema revision inside a lineage.
pub trait Schema {
    fn version(&self) -> SyntacticVersion;
    /// The next revision in the lineage, `None` for the newest one.
    fn successor(&self) -> Option<&dyn Schema>;
    /// Renders this revision as an OpenAPI v3 document.
    fn openapi(&self, settings: &OpenApiSettings) -> Result<Value, RenderError>;
}

pub trait Lineage {
    fn name(&self) -> &str;
    fn schema(&self, version: SyntacticVersion) -> Option<&dyn Schema>;
    fn latest_version(&self) -> SyntacticVersion;
}

type RenderFn = fn(SyntacticVersion, &OpenApiSettings) -> Result<Value, RenderError>;

enum Source {
    Typed(RenderFn),
    Document(Value),
}

pub struct SchemaRevision {
    version: SyntacticVersion,
    source: Source,
    successor: Option<Box<SchemaRevision>>,
}

impl Schema for SchemaRevision {
    fn version(&self) -> SyntacticVersion {
        self.version
    }

    fn successor(&self) -> Option<&dyn Schema> {
        self.successor.as_deref().map(|s| s as &dyn Schema)
    }

    fn openapi(&self, settings: &OpenApiSettings) -> Result<Value, RenderError> {
        match &self.source {
            Source::Typed(render) => render(self.version, settings),
            Source::Document(document) => openapi::render_document(document, settings),
        }
    }
}

impl std::fmt::Debug for SchemaRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            Source::Typed(_) => "typed",
            Source::Document(_) => "document",
        };
        f.debug_struct("SchemaRevision")
            .field("version", &self.version)
            .field("source", &source)
            .finish()
    }
}

/// Owned, non-empty lineage. Revisions are linked oldest to newest.
#[derive(Debug)]
pub struct SchemaLineage {
    name: String,
    first: SchemaRevision,
    latest: SyntacticVersion,
}

impl SchemaLineage {
    pub fn builder(name: impl Into<String>) -> SchemaLineageBuilder {
        SchemaLineageBuilder {
            name: name.into(),
            revisions: Vec::new(),
            latest: None,
        }
    }

    pub fn first(&self) -> &SchemaRevision {
        &self.first
    }

    pub fn versions(&self) -> Vec<SyntacticVersion> {
        let mut versions = Vec::new();
        let mut current = Some(&self.first as &dyn Schema);
        while let Some(schema) = current {
            versions.push(schema.version());
            current = schema.successor();
        }
        versions
    }
}

impl Lineage for SchemaLineage {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self, version: SyntacticVersion) -> Option<&dyn Schema> {
        let mut current = Some(&self.first as &dyn Schema);
        while let Some(schema) = current {
            if schema.version() == version {
                return Some(schema);
            }
            current = schema.successor();
        }
        None
    }

    fn latest_version(&self) -> SyntacticVersion {
        self.latest
    }
}

pub struct SchemaLineageBuilder {
    name: String,
    revisions: Vec<(SyntacticVersion, Source)>,
    latest: Option<SyntacticVersion>,
}

impl SchemaLineageBuilder {
    /// Appends a revision whose shape is the schema of `T`.
    pub fn typed<T: JsonSchema>(mut self, version: impl Into<SyntacticVersion>) -> Self {
        self.revisions
            .push((version.into(), Source::Typed(openapi::render_typed::<T>)));
        self
    }

    /// Appends a revision given as an encoded OpenAPI v3 document.
    pub fn document(mut self, version: impl Into<SyntacticVersion>, document: Value) -> Self {
        self.revisions
            .push((version.into(), Source::Document(document)));
        self
    }

    /// Marks the latest version. Defaults to the newest revision.
    pub fn latest(mut self, version: impl Into<SyntacticVersion>) -> Self {
        self.latest = Some(version.into());
        self
    }

    pub fn build(self) -> Result<SchemaLineage> {
        let name = self.name;
        for pair in self.revisions.windows(2) {
            if pair[0].0 >= pair[1].0 {
                return Err(Error::InvalidLineage(format!(
                    "lineage {name}: version {} must come after {}",
                    pair[1].0, pair[0].0
                )));
            }
        }
        let Some(newest) = self.revisions.last().map(|(version, _)| *version) else {
            return Err(Error::InvalidLineage(format!(
                "lineage {name} has no revisions"
            )));
        };
        let latest = self.latest.unwrap_or(newest);
        if !self.revisions.iter().any(|(version, _)| *version == latest) {
            return Err(Error::InvalidLineage(format!(
                "lineage {name}: latest version {latest} is not part of the lineage"
            )));
        }

        let mut successor: Option<Box<SchemaRevision>> = None;
        for (version, source) in self.revisions.into_iter().rev() {
            successor = Some(Box::new(SchemaRevision {
                version,
                source,
                successor,
            }));
        }
        let Some(first) = successor else {
            return Err(Error::InvalidLineage(format!(
                "lineage {name} has no revisions"
            )));
        };

        Ok(SchemaLineage {
            name,
            first: *first,
            latest,
        })
    }
}
