//! I2C bus abstractions
//!
//! Provides the master-side read/write primitive the camera protocol is
//! built on, plus an adapter for `embedded-hal` 1.0 peripherals.
//!
//! Every exchange with the camera is a plain write followed by separate
//! reads, so no combined write-read transaction is exposed. Bus clock
//! setup belongs to the chip HAL that builds the peripheral.

use embedded_hal::i2c::I2c;

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// Implementations either fill `buf` completely or return an error;
    /// a short read is a bus failure.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }
}

/// Adapter from an `embedded-hal` blocking I2C peripheral to [`I2cBus`]
///
/// ```ignore
/// let i2c = embassy_rp::i2c::I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, config);
/// let bus = HalI2c::new(i2c);
/// ```
#[derive(Debug)]
pub struct HalI2c<T> {
    inner: T,
}

impl<T> HalI2c<T> {
    /// Wrap an `embedded-hal` I2C peripheral
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped peripheral
    pub fn inner(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Release the wrapped peripheral
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T: I2c> I2cBus for HalI2c<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read(address, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Minimal embedded-hal peripheral that echoes a fixed byte on reads
    struct FillI2c {
        fill: u8,
        last_address: u8,
        written: usize,
    }

    impl ErrorType for FillI2c {
        type Error = ErrorKind;
    }

    impl I2c for FillI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.last_address = address;
            for op in operations.iter_mut() {
                match op {
                    Operation::Read(buf) => buf.fill(self.fill),
                    Operation::Write(data) => self.written += data.len(),
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_hal_adapter_forwards_reads_and_writes() {
        let mut bus = HalI2c::new(FillI2c {
            fill: 0x5A,
            last_address: 0,
            written: 0,
        });

        bus.write(0x54, &[1, 2, 3]).unwrap();
        let mut buf = [0u8; 4];
        I2cBus::read(&mut bus, 0x54, &mut buf).unwrap();

        assert_eq!(buf, [0x5A; 4]);
        assert_eq!(bus.inner().last_address, 0x54);
        assert_eq!(bus.release().written, 3);
    }
}
