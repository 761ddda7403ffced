pub mod crd;
pub mod error;
pub mod jenny;
pub mod kinds;
pub mod lineage;
pub mod openapi;
pub mod translate;
pub mod version;
pub mod walker;

pub use crd::{generate_crd_yaml, lineage_to_crd, CrdSettings, Scope};
pub use error::{Error, Result};
pub use kinds::{CoreKind, KindProperties};
pub use lineage::{Lineage, Schema, SchemaLineage};
pub use version::SyntacticVersion;
