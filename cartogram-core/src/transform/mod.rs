pub mod gesture;
pub mod touch;

pub use gesture::{StretchDirection, Transformer, DOUBLE_TAP_THRESHOLD_MS};
pub use touch::{PointerId, TouchInfo};
