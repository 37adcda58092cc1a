//! Camera driver implementations

pub mod cmucam5;

pub use cmucam5::{CameraError, Cmucam5, Response};
