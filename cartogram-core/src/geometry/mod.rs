pub mod bbox;
pub mod matrix;
pub mod polygon;
pub mod projection;
pub mod r2;
