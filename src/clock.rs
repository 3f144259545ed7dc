//! Clock relations between the DPI input and the DSI link.
//!
//! The PLL output is twice the DSI bit clock, and one byte clock is a quarter
//! of the bit clock:
//!
//! ```text
//! pll = bit_clk * 2
//! byte_clk = pll / 2 / 4
//! pixel_clk = byte_clk * 8 * dsi_lanes / dpi_lanes
//! ```
//!
//! Both directions truncate, so a conversion round trip may lose up to one
//! byte clock worth of pixel clock.

use crate::pll;
use crate::time::Hertz;

/// Clock inputs of one link configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSpec {
    /// PLL reference clock, REFCLK pin or derived from PCLK.
    pub reference: Hertz,
    /// DPI pixel clock.
    pub pixel_clock: Hertz,
    /// Number of DPI data lines, 24 for RGB888.
    pub dpi_lanes: u32,
    /// Number of DSI data lanes.
    pub dsi_lanes: u32,
}

impl ClockSpec {
    pub(crate) fn validate(&self) -> Result<(), pll::Error> {
        if self.reference.0 == 0 || self.pixel_clock.0 == 0 || self.dpi_lanes == 0 || self.dsi_lanes == 0 {
            return Err(pll::Error::InvalidClockSpec);
        }
        Ok(())
    }

    /// PLL frequency needed to carry `pixel_clock` over the DSI lanes.
    pub fn target_pll(&self) -> Hertz {
        pixel_clock_to_target_pll(self.pixel_clock, self.dsi_lanes, self.dpi_lanes)
    }
}

/// Pixel clock carried by a PLL running at `pll`.
///
/// `dpi_lanes` must be non-zero.
pub fn pll_to_pixel_clock(pll: Hertz, dsi_lanes: u32, dpi_lanes: u32) -> Hertz {
    let byte_clk = pll.0 / 2 / 4;
    let pclk = (byte_clk as u64) * 8 * (dsi_lanes as u64) / (dpi_lanes as u64);

    Hertz(saturate(pclk))
}

/// PLL frequency targeted for `pixel_clock`.
///
/// `dsi_lanes` must be non-zero. Results beyond `u32::MAX` saturate, which
/// lies outside every PLL band.
pub fn pixel_clock_to_target_pll(pixel_clock: Hertz, dsi_lanes: u32, dpi_lanes: u32) -> Hertz {
    let byte_clk = (pixel_clock.0 as u64) * (dpi_lanes as u64) / (8 * dsi_lanes as u64);

    Hertz(saturate(byte_clk * 4 * 2))
}

fn saturate(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_panel_target() {
        // 154.9MHz, 24 DPI lines into 4 DSI lanes
        let pll = pixel_clock_to_target_pll(Hertz(154_900_000), 4, 24);
        assert_eq!(pll, Hertz(929_400_000));
        assert_eq!(pll_to_pixel_clock(pll, 4, 24), Hertz(154_900_000));
    }

    #[test]
    fn round_trip_truncates() {
        // byte_clk = 100_000_001 * 24 / 32 = 75_000_000 (.75 dropped)
        let pll = pixel_clock_to_target_pll(Hertz(100_000_001), 4, 24);
        assert_eq!(pll, Hertz(600_000_000));
        assert_eq!(pll_to_pixel_clock(pll, 4, 24), Hertz(100_000_000));
    }

    #[test]
    fn round_trip_within_one_truncation_unit() {
        // one byte clock of slack is 8 * dsi / dpi pixel clocks, rounded up
        for pclk in [
            1_000_003u32,
            25_000_000,
            33_500_000,
            74_250_000,
            100_000_001,
            148_500_001,
            154_900_000,
            165_000_007,
        ] {
            let pll = pixel_clock_to_target_pll(Hertz(pclk), 4, 24);
            let back = pll_to_pixel_clock(pll, 4, 24).0;
            assert!(back <= pclk, "{} -> {}", pclk, back);
            assert!(pclk - back <= 2, "{} -> {}", pclk, back);
        }
    }

    #[test]
    fn oversized_pixel_clock_saturates() {
        let pll = pixel_clock_to_target_pll(Hertz(u32::MAX), 1, 24);
        assert_eq!(pll, Hertz(u32::MAX));
    }

    #[test]
    fn validate_rejects_zero_inputs() {
        let spec = ClockSpec {
            reference: Hertz(38_725_000),
            pixel_clock: Hertz(154_900_000),
            dpi_lanes: 24,
            dsi_lanes: 4,
        };
        assert_eq!(spec.validate(), Ok(()));

        for broken in [
            ClockSpec { reference: Hertz(0), ..spec },
            ClockSpec { pixel_clock: Hertz(0), ..spec },
            ClockSpec { dpi_lanes: 0, ..spec },
            ClockSpec { dsi_lanes: 0, ..spec },
        ] {
            assert_eq!(broken.validate(), Err(pll::Error::InvalidClockSpec));
        }
    }
}
