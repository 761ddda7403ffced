use super::{CoreKind, KindProperties};
use crate::error::Result;
use crate::lineage::SchemaLineage;

pub fn kind() -> Result<CoreKind> {
    let lineage = SchemaLineage::builder("dashboard")
        .typed::<v0_0::DashboardSpec>((0, 0))
        .typed::<v0_1::DashboardSpec>((0, 1))
        .build()?;
    Ok(CoreKind {
        properties: KindProperties::core("Dashboard", "dashboard", "dashboards"),
        lineage,
    })
}

pub mod v0_0 {
    use schemars::JsonSchema;
    use serde_derive::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardSpec {
        /// title of the dashboard
        pub title: String,
        /// description of the dashboard
        pub description: Option<String>,
        /// tags associated with the dashboard
        pub tags: Option<Vec<String>>,
        /// whether the dashboard can be edited
        pub editable: Option<bool>,
        /// refresh interval, e.g. `30s`
        pub refresh: Option<String>,
        /// default time range of the dashboard
        pub time: Option<TimeRange>,
        pub panels: Option<Vec<Panel>>,
        /// version of the dashboard json model
        pub schema_version: u32,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, Default)]
    pub struct TimeRange {
        pub from: String,
        pub to: String,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct Panel {
        pub id: u32,
        /// panel plugin id
        #[serde(rename = "type")]
        pub type_: String,
        pub title: Option<String>,
        pub grid_pos: GridPos,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, Default)]
    pub struct GridPos {
        pub h: u32,
        pub w: u32,
        pub x: u32,
        pub y: u32,
    }
}

pub mod v0_1 {
    use super::v0_0::{Panel, TimeRange};
    use schemars::JsonSchema;
    use serde_derive::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardSpec {
        /// title of the dashboard
        pub title: String,
        /// description of the dashboard
        pub description: Option<String>,
        /// tags associated with the dashboard
        pub tags: Option<Vec<String>>,
        /// whether the dashboard can be edited
        pub editable: Option<bool>,
        /// refresh interval, e.g. `30s`
        pub refresh: Option<String>,
        /// default time range of the dashboard
        pub time: Option<TimeRange>,
        pub panels: Option<Vec<Panel>>,
        /// version of the dashboard json model
        pub schema_version: u32,
        /// timezone of the dashboard, `browser` or `utc`
        pub timezone: Option<String>,
        /// how the crosshair and tooltip are shared between panels
        pub graph_tooltip: Option<CursorSync>,
        /// links shown at the top of the dashboard
        pub links: Option<Vec<DashboardLink>>,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum CursorSync {
        #[default]
        Off,
        Crosshair,
        Tooltip,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardLink {
        pub title: String,
        pub url: String,
        /// open the link in a new tab
        pub target_blank: Option<bool>,
    }
}
