//! Camera configuration
//!
//! [`CameraConfig`] holds everything the façade needs besides the bus:
//! the device address, init polling budget and the default block query.
//! Firmware loads it from a small TOML subset:
//!
//! ```toml
//! [camera]
//! address = 0x54
//! init_timeout_ms = 5000
//! poll_interval_ms = 100
//! signature = 255     # all signatures
//! max_blocks = 255
//! brightness = 80     # optional
//! frequency = 100000
//! ```
//!
//! Supported: `[camera]` header, `key = value` integers (decimal or `0x`
//! hex), `#` comments. Anything else is rejected.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use pixy_protocol::messages::{ALL_BLOCKS, ALL_SIGNATURES};

/// Default 7-bit I2C address of the camera
pub const DEFAULT_ADDRESS: u8 = 0x54;

/// Default wait between init polls
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Default init budget
pub const DEFAULT_INIT_TIMEOUT_MS: u32 = 5000;

/// Camera driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Total time `init` keeps polling for the camera
    pub init_timeout_ms: u32,
    /// Sleep between init polls
    pub poll_interval_ms: u32,
    /// Signature mask for block queries (255 = all)
    pub signature: u8,
    /// Block limit for block queries (255 = no limit)
    pub max_blocks: u8,
    /// Brightness applied after init, if set
    pub brightness: Option<u8>,
    /// Bus clock in Hz
    pub frequency: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraConfig {
    /// Default configuration, usable in `const` contexts
    pub const fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            init_timeout_ms: DEFAULT_INIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            signature: ALL_SIGNATURES,
            max_blocks: ALL_BLOCKS,
            brightness: None,
            frequency: 100_000,
        }
    }

    /// Same configuration with a different device address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Same configuration with a different init budget
    pub const fn with_init_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.init_timeout_ms = timeout_ms;
        self
    }
}

/// Config parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Section header other than `[camera]`, or a key outside any section
    InvalidSection,
    /// Key not recognized in `[camera]`
    UnknownKey,
    /// Value is not an integer, or the line has no `=`
    InvalidValue,
    /// Value parsed but does not fit the field
    OutOfRange,
}

/// Parse TOML-subset text into a [`CameraConfig`]
///
/// Keys not present keep their default values.
pub fn parse_config(input: &str) -> Result<CameraConfig, ConfigError> {
    let mut config = CameraConfig::new();
    let mut in_camera = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if line[1..line.len() - 1].trim() != "camera" {
                return Err(ConfigError::InvalidSection);
            }
            in_camera = true;
            continue;
        }

        if !in_camera {
            return Err(ConfigError::InvalidSection);
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(&mut config, key, value)?;
    }

    if config.poll_interval_ms == 0 || config.address > 0x7F {
        return Err(ConfigError::OutOfRange);
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_int(value: &str) -> Result<u32, ConfigError> {
    let digits = strip_separators(value)?;
    let digits = digits.as_str();
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidValue)
}

/// Drop TOML digit separators (`2_000`)
fn strip_separators(value: &str) -> Result<heapless::String<16>, ConfigError> {
    let mut out = heapless::String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        out.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }
    Ok(out)
}

fn parse_u8(value: &str) -> Result<u8, ConfigError> {
    u8::try_from(parse_int(value)?).map_err(|_| ConfigError::OutOfRange)
}

fn apply_value(config: &mut CameraConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "address" => config.address = parse_u8(value)?,
        "init_timeout_ms" => config.init_timeout_ms = parse_int(value)?,
        "poll_interval_ms" => config.poll_interval_ms = parse_int(value)?,
        "signature" => config.signature = parse_u8(value)?,
        "max_blocks" => config.max_blocks = parse_u8(value)?,
        "brightness" => config.brightness = Some(parse_u8(value)?),
        "frequency" => config.frequency = parse_int(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CameraConfig::default();
        assert_eq!(config.address, 0x54);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.signature, ALL_SIGNATURES);
        assert_eq!(config.max_blocks, ALL_BLOCKS);
        assert_eq!(config.brightness, None);
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Pixy on I2C0
[camera]
address = 0x55
init_timeout_ms = 2_000
poll_interval_ms = 50   # faster polling
signature = 1
max_blocks = 4
brightness = 80
frequency = 400000
"#;
        let config = parse_config(config_str).unwrap();
        assert_eq!(config.address, 0x55);
        assert_eq!(config.init_timeout_ms, 2000);
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.signature, 1);
        assert_eq!(config.max_blocks, 4);
        assert_eq!(config.brightness, Some(80));
        assert_eq!(config.frequency, 400_000);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), CameraConfig::default());
        assert_eq!(parse_config("[camera]\n").unwrap(), CameraConfig::default());
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[stepper spin]\naddress = 1"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(parse_config("address = 1"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[camera]\nzoom = 2"),
            Err(ConfigError::UnknownKey)
        );
    }

    #[test]
    fn test_invalid_and_out_of_range_values() {
        assert_eq!(
            parse_config("[camera]\naddress = \"x\""),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[camera]\nsignature = 256"),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(
            parse_config("[camera]\naddress = 0x80"),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(
            parse_config("[camera]\npoll_interval_ms = 0"),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(parse_config("[camera]\nmax_blocks"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_builder_helpers() {
        let config = CameraConfig::new()
            .with_address(0x60)
            .with_init_timeout_ms(300);
        assert_eq!(config.address, 0x60);
        assert_eq!(config.init_timeout_ms, 300);
    }
}
