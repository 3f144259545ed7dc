//! Register transport.
//!
//! The chip exposes a 16-bit address, 16-bit data register file. Addresses
//! and values travel big endian.

use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Default 7-bit I2C address.
pub const ADDRESS: SevenBitAddress = 0x0E;
/// I2C address with the address select pin pulled high.
pub const ALTERNATE_ADDRESS: SevenBitAddress = 0x0F;

/// 16-bit register access.
pub trait RegisterBus {
    type Error;

    fn write_u16(&mut self, addr: u16, val: u16) -> Result<(), Self::Error>;

    fn read_u16(&mut self, addr: u16) -> Result<u16, Self::Error>;
}

/// Register access over I2C.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Release the underlying I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cBus<I2C> {
    type Error = I2C::Error;

    fn write_u16(&mut self, addr: u16, val: u16) -> Result<(), Self::Error> {
        let [a0, a1] = addr.to_be_bytes();
        let [v0, v1] = val.to_be_bytes();
        self.i2c.write(self.address, &[a0, a1, v0, v1])
    }

    fn read_u16(&mut self, addr: u16) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &addr.to_be_bytes(), &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    #[inline]
    fn write_u16(&mut self, addr: u16, val: u16) -> Result<(), Self::Error> {
        T::write_u16(self, addr, val)
    }

    #[inline]
    fn read_u16(&mut self, addr: u16) -> Result<u16, Self::Error> {
        T::read_u16(self, addr)
    }
}
