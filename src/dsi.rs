//! MIPI DSI data types, DCS commands and the bridge's command sender.

use crate::regs::{dsicmd_tx, Reg};

/// DSI data types
pub mod data_type {
    pub const DCS_SHORT_WRITE: u8 = 0x05;
    pub const DCS_SHORT_WRITE_PARAM: u8 = 0x15;
    pub const TURN_ON_PERIPHERAL: u8 = 0x32;
    /// Packed pixel stream, 24-bit RGB 8-8-8
    pub const PACKED_PIXEL_STREAM_24: u8 = 0x3E;
}

/// DCS commands
pub mod dcs {
    pub const EXIT_SLEEP_MODE: u8 = 0x11;
    pub const SET_PIXEL_FORMAT: u8 = 0x3A;

    /// SET_PIXEL_FORMAT parameter, 24 bits per pixel
    pub const PIXEL_FMT_24BIT: u8 = 0x07;
}

/// DSICMD_TYPE packet type for short packets.
const SHORT_PACKET: u32 = 0x10;

/// Pixel format on the DPI input and the DSI stream.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 24-bit RGB 8-8-8, packed
    #[default]
    Rgb888,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgb888 => 3,
        }
    }

    /// DATAFMT PDFormat field
    pub(crate) const fn pd_format(self) -> u32 {
        match self {
            PixelFormat::Rgb888 => 0x3,
        }
    }

    /// DSITX_DT stream data type
    pub(crate) const fn data_type(self) -> u8 {
        match self {
            PixelFormat::Rgb888 => data_type::PACKED_PIXEL_STREAM_24,
        }
    }

    /// SET_PIXEL_FORMAT parameter
    pub(crate) const fn dcs_pixel_format(self) -> u8 {
        match self {
            PixelFormat::Rgb888 => dcs::PIXEL_FMT_24BIT,
        }
    }
}

/// A short packet, no payload beyond two parameter bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShortPacket {
    pub data_id: u8,
    pub data0: u8,
    pub data1: u8,
}

impl ShortPacket {
    pub const fn new(data_id: u8, data0: u8, data1: u8) -> Self {
        Self { data_id, data0, data1 }
    }

    /// Register writes issuing this packet, in order. The last one starts the transfer.
    pub(crate) fn writes(&self) -> [(Reg, u32); 4] {
        let word_count: u32 = 0;
        [
            (Reg::DsicmdType, (SHORT_PACKET << 8) | self.data_id as u32),
            (Reg::DsicmdWc, word_count & 0xf),
            (Reg::DsicmdWd0, ((self.data1 as u32) << 8) | self.data0 as u32),
            (Reg::DsicmdTx, dsicmd_tx::START),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_sleep_packet() {
        let packet = ShortPacket::new(data_type::DCS_SHORT_WRITE, dcs::EXIT_SLEEP_MODE, 0);
        assert_eq!(
            packet.writes(),
            [
                (Reg::DsicmdType, 0x1005),
                (Reg::DsicmdWc, 0),
                (Reg::DsicmdWd0, 0x0011),
                (Reg::DsicmdTx, 1),
            ]
        );
    }

    #[test]
    fn parameter_order() {
        let packet = ShortPacket::new(
            data_type::DCS_SHORT_WRITE_PARAM,
            dcs::SET_PIXEL_FORMAT,
            dcs::PIXEL_FMT_24BIT,
        );
        let writes = packet.writes();
        assert_eq!(writes[0], (Reg::DsicmdType, 0x1015));
        assert_eq!(writes[2], (Reg::DsicmdWd0, 0x073A));
    }

    #[test]
    fn rgb888() {
        let fmt = PixelFormat::default();
        assert_eq!(fmt.bytes_per_pixel(), 3);
        assert_eq!(fmt.data_type(), 0x3E);
        assert_eq!(fmt.pd_format(), 0x3);
    }
}
