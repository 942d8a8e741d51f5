pub mod area;
pub mod format;
pub mod grid;
pub mod nice;
pub mod verify;

pub use area::{AreaLegend, AreaRow};
pub use format::{format_compact, format_legend_value, format_total, LegendText};
pub use grid::{GridOption, LegendConfig, LegendGrid};
pub use nice::{find_nearest_nice_number, NICE_NUMBERS};
pub use verify::{verify_legend, LegendCheck};
