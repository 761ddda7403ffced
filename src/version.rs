use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Two component schema version, ordered by major then minor.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default,
)]
pub struct SyntacticVersion(pub u32, pub u32);

impl SyntacticVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self(major, minor)
    }

    pub fn major(&self) -> u32 {
        self.0
    }

    pub fn minor(&self) -> u32 {
        self.1
    }

    /// Name of the CRD version entry for this schema version.
    ///
    /// Kubernetes version names may not contain dots, so `2.1` becomes `v2-1`.
    pub fn crd_version_name(&self) -> String {
        format!("v{}-{}", self.0, self.1)
    }
}

impl fmt::Display for SyntacticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

impl From<(u32, u32)> for SyntacticVersion {
    fn from((major, minor): (u32, u32)) -> Self {
        Self(major, minor)
    }
}
