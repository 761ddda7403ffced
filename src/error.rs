use crate::openapi::RenderError;
use crate::version::SyntacticVersion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("LineageEmptyError: lineage {lineage} has no schema at version {version}")]
    LineageEmpty {
        lineage: String,
        version: SyntacticVersion,
    },
    #[error("RenderError: could not render schema {version} to openapi: {source}")]
    Render {
        version: SyntacticVersion,
        #[source]
        source: RenderError,
    },
    #[error("SchemaCardinalityError: schema {version} rendered {count} openapi schemas, expected exactly one")]
    SchemaCardinality {
        version: SyntacticVersion,
        count: usize,
    },
    #[error("SchemaShapeError: schema {version} is not an object schema: {reason}")]
    SchemaShape {
        version: SyntacticVersion,
        reason: String,
    },
    #[error("MissingStorageVersion: latest version {latest} was not reached while walking the lineage")]
    MissingStorageVersion { latest: SyntacticVersion },
    #[error("SerializationError: {0}")]
    Serialization(#[from] serde_yaml::Error),
    #[error("UnsupportedConfiguration: {0}")]
    UnsupportedConfiguration(String),
    #[error("UnknownKind: no core kind named {0}")]
    UnknownKind(String),
    #[error("InvalidLineage: {0}")]
    InvalidLineage(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not generate CRD for kind {kind}: {source}")]
    Kind {
        kind: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the kind name to an error raised while converting that kind.
    pub fn for_kind(self, kind: &str) -> Self {
        match self {
            Error::Kind { .. } => self,
            other => Error::Kind {
                kind: kind.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// The schema version an error refers to, if any.
    pub fn version(&self) -> Option<SyntacticVersion> {
        match self {
            Error::LineageEmpty { version, .. }
            | Error::Render { version, .. }
            | Error::SchemaCardinality { version, .. }
            | Error::SchemaShape { version, .. } => Some(*version),
            Error::MissingStorageVersion { latest } => Some(*latest),
            Error::Kind { source, .. } => source.version(),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
