pub mod cart_map;
pub mod draw;
pub mod equalize;
pub mod geojson;
pub mod ids;
pub mod mappack;
pub mod region;
pub mod repo;
pub mod value;
pub mod version;
pub mod version_data;

pub use cart_map::{CartMap, BASE_SYSNAME};
pub use draw::{DrawPlan, HighlightChange, LabelLayout, PolygonTransition, TooltipData};
pub use mappack::{LayerData, MapConfig, Mappack};
pub use value::RegionValue;
pub use version_data::{MapVersionData, PolygonIdCounter, VersionExtras};

#[cfg(test)]
mod tests;
