//! Embassy async tasks

pub mod tracker;

pub use tracker::{tracker_task, Camera};
