//! Command codes and typed payloads for the Pixy protocol
//!
//! Requests are built from [`CameraRequest`]; responses are decoded from the
//! raw payload into [`Resolution`], [`Rgb`], [`Version`] or a block list
//! (see [`crate::blocks`]).

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::packet::{ProtocolError, Request, MAX_PAYLOAD_SIZE};

// Command codes, fixed by the camera firmware
pub const CMD_GET_RESOLUTION: u8 = 12;
pub const CMD_GET_VERSION: u8 = 14;
pub const CMD_SET_BRIGHTNESS: u8 = 16;
pub const CMD_SET_LED: u8 = 20;
pub const CMD_SET_LAMP: u8 = 22;
pub const CMD_GET_BLOCKS: u8 = 32;
pub const CMD_GET_RGB: u8 = 112;

/// Signature mask selecting every color signature
pub const ALL_SIGNATURES: u8 = 255;

/// Block count meaning "as many as the camera reports"
pub const ALL_BLOCKS: u8 = 255;

/// Known command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    GetResolution = CMD_GET_RESOLUTION,
    GetVersion = CMD_GET_VERSION,
    SetBrightness = CMD_SET_BRIGHTNESS,
    SetLed = CMD_SET_LED,
    SetLamp = CMD_SET_LAMP,
    GetBlocks = CMD_GET_BLOCKS,
    GetRgb = CMD_GET_RGB,
}

impl Command {
    /// Parse a command from its wire code
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_GET_RESOLUTION => Some(Command::GetResolution),
            CMD_GET_VERSION => Some(Command::GetVersion),
            CMD_SET_BRIGHTNESS => Some(Command::SetBrightness),
            CMD_SET_LED => Some(Command::SetLed),
            CMD_SET_LAMP => Some(Command::SetLamp),
            CMD_GET_BLOCKS => Some(Command::GetBlocks),
            CMD_GET_RGB => Some(Command::GetRgb),
            _ => None,
        }
    }

    /// Wire code for this command
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command.to_byte()
    }
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Command::from_byte(byte).ok_or(byte)
    }
}

/// Requests the host can send to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraRequest {
    /// Set the RGB LED color (ignored after the lamp has been used)
    SetLed { r: u8, g: u8, b: u8 },
    /// Switch the white lamps
    SetLamp { upper: u8, lower: u8 },
    /// Set the sensor brightness
    SetBrightness(u8),
    /// Query the firmware/hardware version
    GetVersion,
    /// Query the frame resolution
    GetResolution,
    /// Fetch detected blocks matching a signature mask
    GetBlocks { signature: u8, max_blocks: u8 },
    /// Sample the pixel color at a frame coordinate
    GetRgb { x: u16, y: u16, saturate: bool },
}

impl CameraRequest {
    /// Command code this request is sent with
    pub fn command(&self) -> Command {
        match self {
            CameraRequest::SetLed { .. } => Command::SetLed,
            CameraRequest::SetLamp { .. } => Command::SetLamp,
            CameraRequest::SetBrightness(_) => Command::SetBrightness,
            CameraRequest::GetVersion => Command::GetVersion,
            CameraRequest::GetResolution => Command::GetResolution,
            CameraRequest::GetBlocks { .. } => Command::GetBlocks,
            CameraRequest::GetRgb { .. } => Command::GetRgb,
        }
    }

    /// Encode this request into a packet
    pub fn to_request(&self) -> Result<Request, ProtocolError> {
        let code = self.command().to_byte();
        match *self {
            CameraRequest::SetLed { r, g, b } => Request::new(code, &[r, g, b]),
            CameraRequest::SetLamp { upper, lower } => Request::new(code, &[upper, lower]),
            CameraRequest::SetBrightness(value) => Request::new(code, &[value]),
            CameraRequest::GetVersion => Ok(Request::empty(code)),
            // Resolution takes a single reserved type byte
            CameraRequest::GetResolution => Request::new(code, &[0]),
            CameraRequest::GetBlocks {
                signature,
                max_blocks,
            } => Request::new(code, &[signature, max_blocks]),
            CameraRequest::GetRgb { x, y, saturate } => {
                let [x_lo, x_hi] = x.to_le_bytes();
                let [y_lo, y_hi] = y.to_le_bytes();
                Request::new(code, &[x_lo, x_hi, y_lo, y_hi, saturate as u8])
            }
        }
    }
}

fn require(payload: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if payload.len() < expected {
        return Err(ProtocolError::MalformedLength {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

/// Frame resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Resolution {
    /// Decode from a resolution payload (two little-endian u16)
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        require(payload, 4)?;
        Ok(Self {
            width: u16::from_le_bytes([payload[0], payload[1]]),
            height: u16::from_le_bytes([payload[2], payload[3]]),
        })
    }
}

impl From<Resolution> for (u16, u16) {
    fn from(res: Resolution) -> Self {
        (res.width, res.height)
    }
}

/// Pixel color sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Decode from an RGB payload
    ///
    /// The camera sends the channels as B, G, R.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        require(payload, 3)?;
        Ok(Self {
            r: payload[2],
            g: payload[1],
            b: payload[0],
        })
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(rgb: Rgb) -> Self {
        (rgb.r, rgb.g, rgb.b)
    }
}

/// Version response, kept as the raw blob the camera sent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    raw: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Version {
    /// Wrap a version payload
    pub fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        let mut raw = Vec::new();
        raw.extend_from_slice(payload)
            .map_err(|_| ProtocolError::PayloadTooLarge)?;
        Ok(Self { raw })
    }

    /// Raw version bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Hardware revision, if the blob carries one (first u16, little-endian)
    pub fn hardware(&self) -> Option<u16> {
        match self.raw.as_slice() {
            [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }

    /// Firmware (major, minor, build), if present after the hardware field
    pub fn firmware(&self) -> Option<(u8, u8, u16)> {
        match self.raw.as_slice() {
            [_, _, major, minor, build_lo, build_hi, ..] => Some((
                *major,
                *minor,
                u16::from_le_bytes([*build_lo, *build_hi]),
            )),
            _ => None,
        }
    }
}
