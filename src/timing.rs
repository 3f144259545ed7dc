//! Panel timing and the DSI timing registers derived from it.

use crate::dsi::PixelFormat;
use crate::pll::PllSolution;
use crate::time::Hertz;

/// Panel timing, in pixels and lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelTiming {
    pub hsync_width: u32,
    pub h_back_porch: u32,
    pub vsync_width: u32,
    pub v_back_porch: u32,
    pub active_width: u32,
    pub active_height: u32,
}

/// Values for the event mode DSI timing registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DerivedTiming {
    /// DSI_VSW, sync width plus back porch in event mode.
    pub vsync_plus_back_porch_lines: u32,
    /// DSI_HSW, sync width plus back porch as link bytes.
    pub horizontal_sync_bytes: u32,
    /// DSI_VACT
    pub active_height_lines: u32,
    /// DSI_HACT
    pub active_width_bytes: u32,
}

impl DerivedTiming {
    /// `pixel_clock` and `dsi_lanes` are the ones `pll` was solved for.
    ///
    /// Sums and products saturate at `u32::MAX`, which no 16-bit timing
    /// register accepts.
    pub fn new(
        pll: &PllSolution,
        panel: &PanelTiming,
        pixel_clock: Hertz,
        dsi_lanes: u32,
        format: PixelFormat,
    ) -> Self {
        Self {
            vsync_plus_back_porch_lines: panel.vsync_width.saturating_add(panel.v_back_porch),
            horizontal_sync_bytes: horizontal_sync_bytes(pll.bit_clock, panel, pixel_clock, dsi_lanes),
            active_height_lines: panel.active_height,
            active_width_bytes: panel.active_width.saturating_mul(format.bytes_per_pixel()),
        }
    }
}

/// `(hsw + hbp) * byte_clk * lanes / pclk`: the sync and back porch time
/// expressed in bytes sent over the link. `pixel_clock` must be non-zero.
pub fn horizontal_sync_bytes(bit_clock: Hertz, panel: &PanelTiming, pixel_clock: Hertz, dsi_lanes: u32) -> u32 {
    let pixels = panel.hsync_width as u64 + panel.h_back_porch as u64;
    let byte_clk = (bit_clock.0 / 4) as u64;

    let bytes = pixels * byte_clk * dsi_lanes as u64 / pixel_clock.0 as u64;

    u32::try_from(bytes).unwrap_or(u32::MAX)
}
