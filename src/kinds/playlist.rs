use super::{CoreKind, KindProperties};
use crate::error::Result;
use crate::lineage::SchemaLineage;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

pub fn kind() -> Result<CoreKind> {
    let lineage = SchemaLineage::builder("playlist")
        .typed::<PlaylistSpec>((0, 0))
        .build()?;
    Ok(CoreKind {
        properties: KindProperties::core("Playlist", "playlist", "playlists"),
        lineage,
    })
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, PartialEq, Eq, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSpec {
    /// unique identifier of the playlist
    pub uid: String,
    /// name of the playlist
    pub name: String,
    /// interval each dashboard is shown for, e.g. `5m`
    pub interval: String,
    /// dashboards in the playlist, in play order
    pub items: Option<Vec<PlaylistItem>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, PartialEq, Eq, JsonSchema, Default)]
pub struct PlaylistItem {
    /// how the value is resolved to dashboards
    #[serde(rename = "type")]
    pub type_: PlaylistItemType,
    /// dashboard uid or tag, depending on type
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, PartialEq, Eq, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistItemType {
    #[default]
    DashboardByUid,
    DashboardByTag,
}
