//! Pixy Hardware Abstraction Layer
//!
//! This crate defines the bus traits the camera driver talks through.
//! Chip HALs plug in either by implementing [`I2cBus`] directly or by
//! wrapping an `embedded-hal` I2C peripheral in [`HalI2c`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pixy-drivers (Cmucam5 façade)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pixy-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  test doubles │
//! │  I2C (HalI2c) │       │  (I2cBus impl)│
//! └───────────────┘       └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

pub use i2c::{HalI2c, I2cBus};
