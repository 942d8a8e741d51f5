#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

pub mod error;
pub mod geometry;
pub mod legend;
pub mod map;
pub mod transform;

pub use geometry::bbox;
pub use geometry::matrix;
pub use geometry::polygon;
pub use geometry::projection;
pub use geometry::r2;

pub use error::{MapError, MatrixError};
pub use geometry::matrix::{multiply_matrix, Affine};
pub use geometry::polygon::{Polygon, Ring};
pub use geometry::projection::{GallPeters, WorldProjection};
pub use legend::{find_nearest_nice_number, format_compact, LegendGrid};
pub use map::{CartMap, DrawPlan, Mappack, RegionValue, BASE_SYSNAME};
pub use r2::R2;
pub use transform::{StretchDirection, Transformer};

/// Parse a log level string into LevelFilter. Unknown levels fall back to
/// `Info` with a warning.
pub fn parse_log_level(level: Option<&str>) -> log::LevelFilter {
    match level {
        Some("error") => log::LevelFilter::Error,
        Some("warn") => log::LevelFilter::Warn,
        Some("info") | Some("") | None => log::LevelFilter::Info,
        Some("debug") => log::LevelFilter::Debug,
        Some("trace") => log::LevelFilter::Trace,
        Some(level) => {
            log::warn!("invalid log level {:?}, using info", level);
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level(None), log::LevelFilter::Info);
        assert_eq!(parse_log_level(Some("debug")), log::LevelFilter::Debug);
        assert_eq!(parse_log_level(Some("loud")), log::LevelFilter::Info);
    }
}
