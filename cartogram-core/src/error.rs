#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Feature type '{0}' not supported")]
    UnsupportedFeatureType(String),

    #[error("Unsupported map format: layer has neither `bbox` nor `extrema`")]
    UnsupportedMapFormat,

    #[error("No tooltip data for region {0:?} (expected key \"id_{0}\")")]
    MissingRegionData(String),

    #[error("Mappack has no layer named {0:?}")]
    MissingLayer(String),

    #[error("Version {sysname:?} has degenerate extrema ({width} x {height})")]
    DegenerateExtrema {
        sysname: String,
        width: f64,
        height: f64,
    },

    #[error("Version {sysname:?} has no polygon area ({area}); can't size or equalize it")]
    DegenerateGeometry {
        sysname: String,
        area: f64,
    },

    #[error("Unknown map version: {0:?}")]
    UnknownVersion(String),

    #[error("Unknown region: {0:?}")]
    UnknownRegion(String),

    #[error("Version {0:?} has no values to size a legend against")]
    NoLegend(String),

    #[error("Grid option {index} out of range ({count} options)")]
    GridOption {
        index: usize,
        count: usize,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("Both matrices should be 3x3 (got {rows} rows, {cols} columns)")]
    NotThreeByThree { rows: usize, cols: usize },
}
