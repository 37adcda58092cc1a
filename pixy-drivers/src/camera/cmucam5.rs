//! CMUcam5 "Pixy" camera driver (I2C mode)
//!
//! The camera answers every request with a 6-byte header followed by a
//! checksummed payload. Each call is one bus write and two bus reads:
//!
//! ```text
//! host  → write  AE C1 TYPE LEN ARGS...
//! host  ← read   AF C1 TYPE LEN CK_LO CK_HI
//! host  ← read   PAYLOAD (LEN bytes)
//! ```
//!
//! All operations block the calling thread. The driver holds the bus
//! exclusively through `&mut self`; sharing the camera between contexts
//! is up to the caller.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use pixy_hal::I2cBus;
use pixy_protocol::{
    encode_request, parse_blocks, Block, CameraRequest, ProtocolError, Resolution, ResponseHeader,
    Rgb, Version, HEADER_SIZE, MAX_BLOCKS, MAX_PAYLOAD_SIZE, MAX_REQUEST_SIZE,
};

use crate::config::CameraConfig;

/// Camera communication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraError<E> {
    /// The bus transfer failed
    Bus(E),
    /// The camera answered with a malformed or corrupted packet
    Protocol(ProtocolError),
    /// The camera did not answer within the init budget
    InitTimeout,
}

impl<E> From<ProtocolError> for CameraError<E> {
    fn from(e: ProtocolError) -> Self {
        CameraError::Protocol(e)
    }
}

/// A verified response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response type byte from the header
    pub command_type: u8,
    /// Payload, already checked against the header checksum
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// Pixy camera on an I2C bus
pub struct Cmucam5<I2C, D> {
    bus: I2C,
    delay: D,
    config: CameraConfig,
}

impl<I2C, D> Cmucam5<I2C, D>
where
    I2C: I2cBus,
    D: DelayNs,
{
    /// Create a driver with the default configuration (address 0x54)
    pub fn new(bus: I2C, delay: D) -> Self {
        Self::with_config(bus, delay, CameraConfig::default())
    }

    /// Create a driver with an explicit configuration
    pub fn with_config(bus: I2C, delay: D, config: CameraConfig) -> Self {
        Self { bus, delay, config }
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Get the configuration
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Give back the bus and delay provider
    pub fn release(self) -> (I2C, D) {
        (self.bus, self.delay)
    }

    /// Wait for the camera to answer, using the configured budget
    ///
    /// Applies the configured brightness once the camera is up. The camera
    /// has answered at that point, so a failed brightness write is logged
    /// and `init` still returns the version.
    pub fn init(&mut self) -> Result<Version, CameraError<I2C::Error>> {
        let version = self.init_with_timeout(self.config.init_timeout_ms)?;
        if let Some(brightness) = self.config.brightness {
            if self.set_brightness(brightness).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Pixy brightness {} not applied", brightness);
            }
        }
        Ok(version)
    }

    /// Poll `get_version` until it succeeds or `timeout_ms` is spent
    ///
    /// Makes `timeout_ms / poll_interval_ms` attempts (at least one) and
    /// sleeps `poll_interval_ms` between them. Failed attempts are dropped.
    pub fn init_with_timeout(
        &mut self,
        timeout_ms: u32,
    ) -> Result<Version, CameraError<I2C::Error>> {
        let interval_ms = self.config.poll_interval_ms.max(1);
        let attempts = (timeout_ms / interval_ms).max(1);

        for attempt in 1..=attempts {
            match self.get_version() {
                Ok(version) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Pixy answered after {} attempt(s)", attempt);
                    return Ok(version);
                }
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("Pixy init attempt {}/{} failed", attempt, attempts);
                }
            }

            if attempt < attempts {
                self.delay.delay_ms(interval_ms);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("Pixy did not answer within {}ms", timeout_ms);
        Err(CameraError::InitTimeout)
    }

    /// Send one request and read back its verified response
    ///
    /// A checksum failure discards the payload; nothing partial is returned.
    pub fn call(
        &mut self,
        command_type: u8,
        args: &[u8],
    ) -> Result<Response, CameraError<I2C::Error>> {
        let address = self.config.address;

        let mut request = [0u8; MAX_REQUEST_SIZE];
        let len = encode_request(command_type, args, &mut request)?;
        self.bus
            .write(address, &request[..len])
            .map_err(CameraError::Bus)?;

        let mut header_bytes = [0u8; HEADER_SIZE];
        self.bus
            .read(address, &mut header_bytes)
            .map_err(CameraError::Bus)?;
        let header = ResponseHeader::decode(&header_bytes)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Pixy cmd {} -> type {} len {} ck {=u16:#x}",
            command_type,
            header.command_type,
            header.length,
            header.checksum
        );

        let mut payload = Vec::new();
        payload
            .resize(header.length as usize, 0)
            .map_err(|_| ProtocolError::PayloadTooLarge)?;
        if !payload.is_empty() {
            self.bus
                .read(address, &mut payload)
                .map_err(CameraError::Bus)?;
        }

        if let Err(e) = header.verify(&payload) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Pixy response checksum failed: {}", e);
            return Err(e.into());
        }

        Ok(Response {
            command_type: header.command_type,
            payload,
        })
    }

    /// Send a typed request
    pub fn request(
        &mut self,
        request: CameraRequest,
    ) -> Result<Response, CameraError<I2C::Error>> {
        let packet = request.to_request()?;
        self.call(packet.command_type, &packet.payload)
    }

    /// Set the RGB LED color
    ///
    /// The camera ignores this once `set_lamp` has been used.
    pub fn set_led(&mut self, r: u8, g: u8, b: u8) -> Result<(), CameraError<I2C::Error>> {
        self.request(CameraRequest::SetLed { r, g, b })?;
        Ok(())
    }

    /// Switch the upper and lower lamps
    pub fn set_lamp(&mut self, upper: u8, lower: u8) -> Result<(), CameraError<I2C::Error>> {
        self.request(CameraRequest::SetLamp { upper, lower })?;
        Ok(())
    }

    /// Set sensor brightness
    pub fn set_brightness(&mut self, value: u8) -> Result<(), CameraError<I2C::Error>> {
        self.request(CameraRequest::SetBrightness(value))?;
        Ok(())
    }

    /// Read the version blob
    pub fn get_version(&mut self) -> Result<Version, CameraError<I2C::Error>> {
        let response = self.request(CameraRequest::GetVersion)?;
        Ok(Version::from_payload(&response.payload)?)
    }

    /// Read the frame resolution
    pub fn get_resolution(&mut self) -> Result<Resolution, CameraError<I2C::Error>> {
        let response = self.request(CameraRequest::GetResolution)?;
        Ok(Resolution::decode(&response.payload)?)
    }

    /// Fetch the blocks detected in the current frame
    ///
    /// `signature` is a signature bitmask (255 = all), `max_blocks` caps the
    /// count the camera reports (255 = no cap).
    pub fn get_blocks(
        &mut self,
        signature: u8,
        max_blocks: u8,
    ) -> Result<Vec<Block, MAX_BLOCKS>, CameraError<I2C::Error>> {
        let response = self.request(CameraRequest::GetBlocks {
            signature,
            max_blocks,
        })?;
        Ok(parse_blocks(&response.payload)?)
    }

    /// Fetch blocks with the configured signature mask and limit
    pub fn get_all_blocks(&mut self) -> Result<Vec<Block, MAX_BLOCKS>, CameraError<I2C::Error>> {
        self.get_blocks(self.config.signature, self.config.max_blocks)
    }

    /// Sample the color at a frame coordinate
    pub fn get_rgb(
        &mut self,
        x: u16,
        y: u16,
        saturate: bool,
    ) -> Result<Rgb, CameraError<I2C::Error>> {
        let response = self.request(CameraRequest::GetRgb { x, y, saturate })?;
        Ok(Rgb::decode(&response.payload)?)
    }
}
