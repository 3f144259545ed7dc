//! DPI to DSI link bring-up and tear-down.
//!
//! ```text
//! Idle -> PllConfigured -> PhyReady -> LinkActive -> Idle
//! ```
//!
//! `enable` walks the whole chain, `disable` returns to `Idle`.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::bus::RegisterBus;
use crate::config::Config;
use crate::dsi::{data_type, dcs, ShortPacket};
use crate::pll::{self, PllSolution};
use crate::regs::{
    btacntrl1, confctl, confw, datafmt, dsi_control, pllctl, pp_misc, sysctl, txoption, Reg, Width,
};
use crate::timing::DerivedTiming;

/// Encoder clocks settle time after reset release.
const ENCODER_SETTLE_US: u32 = 1_000;
/// PLL lock time.
const PLL_LOCK_US: u32 = 1_000;
/// At least one frame at the slowest supported refresh.
const FRAME_STOP_MS: u32 = 50;

/// Link state.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Powered down, nothing cached.
    Idle,
    /// PLL parameters solved, not yet written.
    PllConfigured,
    /// PLL locked, D-PHY lanes out of reset.
    PhyReady,
    /// Video streaming.
    LinkActive,
}

/// Driver error.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// PLL setup failed, nothing was written.
    Pll(pll::Error),
    /// Register transport error.
    Bus(E),
    /// Reset line error.
    Pin,
    /// Value too wide for a 16-bit register.
    Overflow(Reg),
    /// Zero clocks or lanes, or more DSI lanes than the chip has.
    InvalidConfig,
    /// Operation not allowed in this state.
    InvalidState(LinkState),
}

impl<E> From<pll::Error> for Error<E> {
    fn from(err: pll::Error) -> Self {
        Error::Pll(err)
    }
}

/// Stand-in for boards without a reset line.
#[derive(Debug, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// TC358768 driver.
pub struct Tc358768<B, D, RST = NoPin> {
    bus: B,
    delay: D,
    /// RESX, active low
    reset: RST,
    config: Config,
    state: LinkState,
    pll: Option<PllSolution>,
}

impl<B: RegisterBus, D: DelayNs> Tc358768<B, D, NoPin> {
    /// Create a driver for a bridge with its reset line tied high.
    pub fn new_without_reset(bus: B, delay: D, config: Config) -> Self {
        Self::new(bus, delay, NoPin, config)
    }
}

impl<B: RegisterBus, D: DelayNs, RST: OutputPin> Tc358768<B, D, RST> {
    pub fn new(bus: B, delay: D, reset: RST, config: Config) -> Self {
        Self {
            bus,
            delay,
            reset,
            config,
            state: LinkState::Idle,
            pll: None,
        }
    }

    /// Release the bus, delay and reset line.
    pub fn release(self) -> (B, D, RST) {
        (self.bus, self.delay, self.reset)
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration. Only allowed while `Idle`.
    pub fn set_config(&mut self, config: Config) -> Result<(), Error<B::Error>> {
        if self.state != LinkState::Idle {
            return Err(Error::InvalidState(self.state));
        }
        self.config = config;
        Ok(())
    }

    /// PLL setup of the current enable cycle.
    pub fn pll(&self) -> Option<&PllSolution> {
        self.pll.as_ref()
    }

    /// Timing register values for the current enable cycle.
    pub fn derived_timing(&self) -> Option<DerivedTiming> {
        self.pll.as_ref().map(|pll| self.derive_timing(pll))
    }

    fn derive_timing(&self, pll: &PllSolution) -> DerivedTiming {
        let config = &self.config;
        DerivedTiming::new(
            pll,
            &config.panel,
            config.pixel_clock,
            config.dsi_lanes,
            config.pixel_format,
        )
    }

    /// Write a register, splitting 32-bit registers low half first.
    pub fn write(&mut self, reg: Reg, val: u32) -> Result<(), Error<B::Error>> {
        let addr = reg.addr();

        match reg.width() {
            Width::Narrow => {
                let val = u16::try_from(val).map_err(|_| Error::Overflow(reg))?;
                trace!("WR16 {:#x} {:#x}", addr, val);
                self.bus.write_u16(addr, val).map_err(Error::Bus)
            }
            Width::Wide => {
                trace!("WR32 {:#x} {:#x}", addr, val);
                self.bus.write_u16(addr, val as u16).map_err(Error::Bus)?;
                self.bus.write_u16(addr + 2, (val >> 16) as u16).map_err(Error::Bus)
            }
        }
    }

    /// Read a register, joining both halves of 32-bit registers.
    pub fn read(&mut self, reg: Reg) -> Result<u32, Error<B::Error>> {
        let addr = reg.addr();

        match reg.width() {
            Width::Narrow => self.bus.read_u16(addr).map(u32::from).map_err(Error::Bus),
            Width::Wide => {
                let lo = self.bus.read_u16(addr).map_err(Error::Bus)?;
                let hi = self.bus.read_u16(addr + 2).map_err(Error::Bus)?;
                Ok(lo as u32 | (hi as u32) << 16)
            }
        }
    }

    /// Read-modify-write, the write is skipped when nothing changes.
    pub fn update_bits(&mut self, reg: Reg, mask: u32, val: u32) -> Result<(), Error<B::Error>> {
        let orig = self.read(reg)?;
        let tmp = (orig & !mask) | (val & mask);

        trace!("UPD {:#x} {:#x} -> {:#x}", reg.addr(), orig, tmp);

        if tmp != orig {
            self.write(reg, tmp)?;
        }
        Ok(())
    }

    /// Send a DSI short packet to the panel.
    pub fn send_short_command(&mut self, data_id: u8, data0: u8, data1: u8) -> Result<(), Error<B::Error>> {
        for (reg, val) in ShortPacket::new(data_id, data0, data1).writes() {
            self.write(reg, val)?;
        }
        Ok(())
    }

    pub fn chip_id(&mut self) -> Result<u16, Error<B::Error>> {
        Ok(self.read(Reg::ChipId)? as u16)
    }

    /// Bring the link up and wake the panel.
    ///
    /// Only allowed while `Idle`. A PLL or configuration error leaves the
    /// driver `Idle` without any bus traffic. A bus error leaves it in the
    /// last state reached, `disable` brings it back down.
    pub fn enable(&mut self) -> Result<(), Error<B::Error>> {
        if self.state != LinkState::Idle {
            warn!("enable in state {}", self.state);
            return Err(Error::InvalidState(self.state));
        }

        if !self.config.is_valid() {
            error!("invalid link config");
            return Err(Error::InvalidConfig);
        }

        let pll = pll::solve(&self.config.clock_spec())?;

        debug!(
            "PLL: refclk {}, fbd {}, prd {}, frs {}",
            self.config.refclk.0,
            pll.fbd,
            pll.prd,
            pll.frs
        );

        self.pll = Some(pll);
        self.state = LinkState::PllConfigured;

        self.reset.set_high().map_err(|_| Error::Pin)?;

        // wait for encoder clocks to stabilize
        self.delay.delay_us(ENCODER_SETTLE_US);

        self.sw_reset()?;
        self.setup_pll(&pll)?;
        self.setup_phy()?;
        self.state = LinkState::PhyReady;

        self.start_link(&pll)?;
        self.state = LinkState::LinkActive;

        // enable panel
        self.send_short_command(data_type::TURN_ON_PERIPHERAL, 0, 0)?;
        self.send_short_command(
            data_type::DCS_SHORT_WRITE_PARAM,
            dcs::SET_PIXEL_FORMAT,
            self.config.pixel_format.dcs_pixel_format(),
        )?;

        info!("link active");

        Ok(())
    }

    /// Stop the video stream and put the bridge back into reset.
    ///
    /// Rejected while `Idle`.
    pub fn disable(&mut self) -> Result<(), Error<B::Error>> {
        if self.state == LinkState::Idle {
            warn!("disable while idle");
            return Err(Error::InvalidState(self.state));
        }

        self.update_bits(Reg::PpMisc, pp_misc::FRM_STOP, pp_misc::FRM_STOP)?;

        // wait at least for one frame
        self.delay.delay_ms(FRAME_STOP_MS);

        self.update_bits(Reg::Confctl, confctl::PP_EN, 0)?;
        self.update_bits(Reg::PpMisc, pp_misc::RST_PTR, pp_misc::RST_PTR)?;

        self.reset.set_low().map_err(|_| Error::Pin)?;

        self.pll = None;
        self.state = LinkState::Idle;

        info!("link idle");

        Ok(())
    }

    fn sw_reset(&mut self) -> Result<(), Error<B::Error>> {
        // Assert Reset
        self.write(Reg::Sysctl, sysctl::SYSRST)?;
        // Release Reset, Exit Sleep
        self.write(Reg::Sysctl, 0)
    }

    fn setup_pll(&mut self, pll: &PllSolution) -> Result<(), Error<B::Error>> {
        debug!(
            "PLL: {}, BitClk {}, ByteClk {}",
            pll.pll.0,
            pll.bit_clock.0,
            pll.byte_clock().0
        );

        let pllctl1 = (pll.frs as u32) << pllctl::FRS_SHIFT | pllctl::LBWS_50 | pllctl::RESETB | pllctl::EN;

        self.write(
            Reg::Pllctl0,
            (pll.prd as u32) << pllctl::PRD_SHIFT | (pll.fbd as u32 & pllctl::FBD_MASK),
        )?;
        self.write(Reg::Pllctl1, pllctl1)?;

        // wait for lock
        self.delay.delay_us(PLL_LOCK_US);

        self.write(Reg::Pllctl1, pllctl1 | pllctl::CKEN)
    }

    fn setup_phy(&mut self) -> Result<(), Error<B::Error>> {
        let format = self.config.pixel_format;

        self.write(Reg::Vsdly, 1)?;
        self.write(
            Reg::Datafmt,
            format.pd_format() << datafmt::PD_FORMAT_SHIFT | datafmt::RDSWAP_EN | datafmt::DSITX_EN | datafmt::TXDT_EN,
        )?;
        self.write(Reg::DsitxDt, format.data_type() as u32)?;

        // Enable D-PHY (HiZ->LP11)
        for reg in [Reg::ClwCntrl, Reg::D0wCntrl, Reg::D1wCntrl, Reg::D2wCntrl, Reg::D3wCntrl] {
            self.write(reg, 0)?;
        }
        Ok(())
    }

    fn start_link(&mut self, pll: &PllSolution) -> Result<(), Error<B::Error>> {
        let dphy = self.config.dphy;

        self.write(Reg::LineInitCnt, dphy.line_init_cnt)?;
        self.write(Reg::LptxTimeCnt, dphy.lptx_time_cnt)?;
        self.write(Reg::TclkHeaderCnt, dphy.tclk_header_cnt)?;
        self.write(Reg::TclkTrailCnt, dphy.tclk_trail_cnt)?;
        self.write(Reg::ThsHeaderCnt, dphy.ths_header_cnt)?;
        self.write(Reg::Twakeup, dphy.twakeup)?;
        self.write(Reg::TclkPostCnt, dphy.tclk_post_cnt)?;
        self.write(Reg::ThsTrailCnt, dphy.ths_trail_cnt)?;
        self.write(Reg::HstxVregEn, dphy.hstx_vreg_en)?;

        self.write(Reg::TxOptionCntrl, txoption::CONTCLKMODE)?;

        self.send_short_command(data_type::DCS_SHORT_WRITE, dcs::EXIT_SLEEP_MODE, 0)?;

        self.write(
            Reg::BtaCntrl1,
            dphy.bta_txtago_cnt << btacntrl1::TXTAGOCNT_SHIFT | (dphy.bta_rxtasure_cnt & btacntrl1::RXTASURECNT_MASK),
        )?;
        self.write(Reg::StartCntrl, 1)?;

        let timing = self.derive_timing(pll);
        debug!(
            "timing: vsw {}, hsw {}, vact {}, hact {}",
            timing.vsync_plus_back_porch_lines,
            timing.horizontal_sync_bytes,
            timing.active_height_lines,
            timing.active_width_bytes
        );

        // event mode, back porches folded into the sync widths
        self.write(Reg::DsiEvent, 1)?;
        self.write(Reg::DsiVsw, timing.vsync_plus_back_porch_lines)?;
        self.write(Reg::DsiVbpr, 0)?;
        self.write(Reg::DsiVact, timing.active_height_lines)?;
        self.write(Reg::DsiHsw, timing.horizontal_sync_bytes)?;
        self.write(Reg::DsiHbpr, 0)?;
        self.write(Reg::DsiHact, timing.active_width_bytes)?;

        self.write(Reg::DsiStart, 1)?;

        let lanes = (self.config.dsi_lanes - 1) << dsi_control::DATA_LANE_SHIFT;
        self.write(
            Reg::DsiConfw,
            confw::MODE_SET
                | confw::ADDR_DSI_CONTROL
                | dsi_control::TX_MODE_HS
                | dsi_control::HS_CLOCK_CONTINUOUS
                | lanes
                | dsi_control::EOT_DISABLE,
        )?;
        self.write(
            Reg::DsiConfw,
            confw::MODE_CLEAR | confw::ADDR_DSI_CONTROL | dsi_control::DSI_MODE,
        )?;

        // clear FrmStop and RstPtr
        self.update_bits(Reg::PpMisc, pp_misc::FRM_STOP | pp_misc::RST_PTR, 0)?;

        self.update_bits(Reg::Confctl, confctl::PP_EN, confctl::PP_EN)
    }
}
