//! Pixy camera drivers
//!
//! This crate provides the device façade for the CMUcam5 "Pixy" camera
//! on top of the transport traits in `pixy-hal` and the packet codec in
//! `pixy-protocol`:
//!
//! - Camera driver (`Cmucam5`: LED, lamp, brightness, version,
//!   resolution, blocks, RGB sampling, init polling)
//! - Camera configuration and its TOML-subset loader

#![no_std]
#![deny(unsafe_code)]

pub mod camera;
pub mod config;

pub use camera::{CameraError, Cmucam5, Response};
pub use config::{parse_config, CameraConfig, ConfigError};
pub use pixy_protocol::{Block, Resolution, Rgb, Version};
