//! Driver for Toshiba's TC358768AXBG/TC358778XBG DPI to MIPI DSI bridge.
//!
//! The bridge is programmed over I2C. [`Tc358768::enable`] solves the DSI PLL
//! for the configured pixel clock, derives the DSI timing registers from the
//! result and brings the link up.

#![cfg_attr(not(test), no_std)]

// logging macros, keep first
mod macros;

pub mod bus;
pub mod clock;
pub mod config;
pub mod dsi;
pub mod link;
pub mod pll;
pub mod regs;
pub mod time;
pub mod timing;

pub use bus::{I2cBus, RegisterBus};
pub use clock::ClockSpec;
pub use config::{Config, DphyTiming};
pub use dsi::PixelFormat;
pub use link::{Error, LinkState, NoPin, Tc358768};
pub use pll::PllSolution;
pub use time::Hertz;
pub use timing::{DerivedTiming, PanelTiming};
