//! Link configuration.

use crate::clock::ClockSpec;
use crate::dsi::PixelFormat;
use crate::time::Hertz;
use crate::timing::PanelTiming;

/// The bridge drives at most 4 DSI data lanes.
pub const MAX_DSI_LANES: u32 = 4;

/// D-PHY counter values, in byte clock cycles unless noted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DphyTiming {
    /// LP11 time before the first HS transfer, 100us for D-PHY RX init
    pub line_init_cnt: u32,
    pub lptx_time_cnt: u32,
    /// TCLK_ZEROCNT[15:8] TCLK_PREPARECNT[6:0]
    pub tclk_header_cnt: u32,
    pub tclk_trail_cnt: u32,
    /// THS_ZEROCNT[14:8] THS_PREPARECNT[6:0]
    pub ths_header_cnt: u32,
    pub twakeup: u32,
    pub tclk_post_cnt: u32,
    pub ths_trail_cnt: u32,
    /// HSTX regulator enable, one bit per lane
    pub hstx_vreg_en: u32,
    /// BTACNTRL1 TXTAGOCNT
    pub bta_txtago_cnt: u32,
    /// BTACNTRL1 RXTASURECNT
    pub bta_rxtasure_cnt: u32,
}

impl Default for DphyTiming {
    fn default() -> Self {
        Self {
            line_init_cnt: 0x2c88,
            lptx_time_cnt: 0x5,
            tclk_header_cnt: 0x1f06,
            tclk_trail_cnt: 0x3,
            ths_header_cnt: 0x0606,
            twakeup: 0x4a88,
            tclk_post_cnt: 0xb,
            ths_trail_cnt: 0x4,
            hstx_vreg_en: 0x1f,
            bta_txtago_cnt: 0x5,
            bta_rxtasure_cnt: 0x5,
        }
    }
}

/// Bridge config
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// PLL reference, REFCLK or PCLK / 4.
    pub refclk: Hertz,
    pub pixel_clock: Hertz,
    /// DPI data lines
    pub dpi_lanes: u32,
    /// DSI data lanes, 1 to 4
    pub dsi_lanes: u32,
    pub panel: PanelTiming,
    pub pixel_format: PixelFormat,
    pub dphy: DphyTiming,
}

impl Default for Config {
    /// 1200x1920 FORTEC panel, 154.9MHz pixel clock.
    fn default() -> Self {
        let pixel_clock = Hertz(154_900_000);
        Self {
            refclk: pixel_clock / 4,
            pixel_clock,
            dpi_lanes: 24,
            dsi_lanes: 4,
            panel: PanelTiming {
                hsync_width: 1,
                h_back_porch: 60,
                vsync_width: 1,
                v_back_porch: 25,
                active_width: 1200,
                active_height: 1920,
            },
            pixel_format: PixelFormat::Rgb888,
            dphy: DphyTiming::default(),
        }
    }
}

impl Config {
    /// 800x480 SEIKO WVGA panel, 33.5MHz pixel clock.
    pub fn seiko_wvga() -> Self {
        let pixel_clock = Hertz(33_500_000);
        Self {
            refclk: pixel_clock / 4,
            pixel_clock,
            panel: PanelTiming {
                hsync_width: 10,
                h_back_porch: 89,
                vsync_width: 10,
                v_back_porch: 2,
                active_width: 800,
                active_height: 480,
            },
            ..Default::default()
        }
    }

    /// Clock side of this configuration.
    pub fn clock_spec(&self) -> ClockSpec {
        ClockSpec {
            reference: self.refclk,
            pixel_clock: self.pixel_clock,
            dpi_lanes: self.dpi_lanes,
            dsi_lanes: self.dsi_lanes,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.refclk.0 != 0
            && self.pixel_clock.0 != 0
            && self.dpi_lanes != 0
            && (1..=MAX_DSI_LANES).contains(&self.dsi_lanes)
    }
}
