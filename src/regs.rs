//! Register map.
//!
//! The chip is addressed in 16-bit words. Registers in the TX PHY, TX PPI and
//! TX CTRL blocks are 32 bits wide and occupy two consecutive words, low half
//! first.

use static_assertions::const_assert;

/// Register access width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    /// 16-bit register
    Narrow,
    /// 32-bit register, split into two 16-bit words
    Wide,
}

const WIDE_START: u16 = 0x0100;
const WIDE_END: u16 = 0x0600;

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
    // Global
    ChipId = 0x0000,
    Sysctl = 0x0002,
    Confctl = 0x0004,
    Vsdly = 0x0006,
    Datafmt = 0x0008,
    GpioEn = 0x000E,
    GpioDir = 0x0010,
    GpioIn = 0x0012,
    GpioOut = 0x0014,
    Pllctl0 = 0x0016,
    Pllctl1 = 0x0018,
    CmdByte = 0x0022,
    PpMisc = 0x0032,
    DsitxDt = 0x0050,
    FifoStatus = 0x00F8,

    // Debug
    VbufCtrl = 0x00E0,
    DbgWidth = 0x00E2,
    DbgVblank = 0x00E4,
    DbgData = 0x00E8,

    // TX PHY
    ClwDphyconttx = 0x0100,
    D0wDphyconttx = 0x0104,
    D1wDphyconttx = 0x0108,
    D2wDphyconttx = 0x010C,
    D3wDphyconttx = 0x0110,
    ClwCntrl = 0x0140,
    D0wCntrl = 0x0144,
    D1wCntrl = 0x0148,
    D2wCntrl = 0x014C,
    D3wCntrl = 0x0150,

    // TX PPI
    StartCntrl = 0x0204,
    DsiTxStatus = 0x0208,
    LineInitCnt = 0x0210,
    LptxTimeCnt = 0x0214,
    TclkHeaderCnt = 0x0218,
    TclkTrailCnt = 0x021C,
    ThsHeaderCnt = 0x0220,
    Twakeup = 0x0224,
    TclkPostCnt = 0x0228,
    ThsTrailCnt = 0x022C,
    HstxVregCnt = 0x0230,
    HstxVregEn = 0x0234,
    TxOptionCntrl = 0x0238,
    BtaCntrl1 = 0x023C,

    // TX CTRL
    DsiStatus = 0x0410,
    DsiInt = 0x0414,
    DsicmdRxFifo = 0x0430,
    DsiAckErr = 0x0434,
    DsiRxErr = 0x0440,
    DsiErr = 0x044C,
    DsiConfw = 0x0500,
    DsiReset = 0x0504,
    DsiIntClr = 0x050C,
    DsiStart = 0x0518,

    // DSITX CTRL
    DsicmdTx = 0x0600,
    DsicmdType = 0x0602,
    DsicmdWc = 0x0604,
    DsicmdWd0 = 0x0610,
    DsicmdWd1 = 0x0612,
    DsicmdWd2 = 0x0614,
    DsicmdWd3 = 0x0616,
    DsiEvent = 0x0620,
    DsiVsw = 0x0622,
    DsiVbpr = 0x0624,
    DsiVact = 0x0626,
    DsiHsw = 0x0628,
    DsiHbpr = 0x062A,
    DsiHact = 0x062C,
}

impl Reg {
    #[inline]
    pub const fn addr(self) -> u16 {
        self as u16
    }

    pub const fn width(self) -> Width {
        let addr = self.addr();
        if addr >= WIDE_START && addr < WIDE_END {
            Width::Wide
        } else {
            Width::Narrow
        }
    }
}

const_assert!(matches!(Reg::FifoStatus.width(), Width::Narrow));
const_assert!(matches!(Reg::ClwDphyconttx.width(), Width::Wide));
const_assert!(matches!(Reg::DsiStart.width(), Width::Wide));
const_assert!(matches!(Reg::DsicmdTx.width(), Width::Narrow));

/// SYSCTL
pub mod sysctl {
    /// SYSRST[0]
    pub const SYSRST: u32 = 1 << 0;
}

/// CONFCTL
pub mod confctl {
    /// PP_en[6], parallel port enable
    pub const PP_EN: u32 = 1 << 6;
}

/// PP_MISC
pub mod pp_misc {
    /// FrmStop[15]
    pub const FRM_STOP: u32 = 1 << 15;
    /// RstPtr[14]
    pub const RST_PTR: u32 = 1 << 14;
}

/// PLLCTL0, PLLCTL1
pub mod pllctl {
    /// PRD[15:12]
    pub const PRD_SHIFT: u32 = 12;
    /// FBD[8:0]
    pub const FBD_MASK: u32 = 0x1ff;
    /// FRS[11:10]
    pub const FRS_SHIFT: u32 = 10;
    /// LBWS[9:8], loop bandwidth 50%
    pub const LBWS_50: u32 = 0x2 << 8;
    /// CKEN[4]
    pub const CKEN: u32 = 1 << 4;
    /// RESETB[1]
    pub const RESETB: u32 = 1 << 1;
    /// EN[0]
    pub const EN: u32 = 1 << 0;
}

/// DATAFMT
pub mod datafmt {
    /// PDFormat[7:4]
    pub const PD_FORMAT_SHIFT: u32 = 4;
    /// spmode_en[3]
    pub const SPMODE_EN: u32 = 1 << 3;
    /// rdswap_en[2]
    pub const RDSWAP_EN: u32 = 1 << 2;
    /// dsitx_en[1]
    pub const DSITX_EN: u32 = 1 << 1;
    /// txdt_en[0]
    pub const TXDT_EN: u32 = 1 << 0;
}

/// TXOPTIONCNTRL
pub mod txoption {
    /// CONTCLKMODE[0]
    pub const CONTCLKMODE: u32 = 1 << 0;
}

/// BTACNTRL1
pub mod btacntrl1 {
    /// TXTAGOCNT[26:16]
    pub const TXTAGOCNT_SHIFT: u32 = 16;
    /// RXTASURECNT[10:0]
    pub const RXTASURECNT_MASK: u32 = 0x7ff;
}

/// DSI_CONFW, indirect access to the DSI controller registers
pub mod confw {
    /// MODE[31:29], set bits
    pub const MODE_SET: u32 = 5 << 29;
    /// MODE[31:29], clear bits
    pub const MODE_CLEAR: u32 = 6 << 29;
    /// ADDRESS[28:24], DSI_CONTROL
    pub const ADDR_DSI_CONTROL: u32 = 0x3 << 24;
}

/// DSI_CONTROL, written through DSI_CONFW
pub mod dsi_control {
    /// DSIMode[15], command mode when set
    pub const DSI_MODE: u32 = 1 << 15;
    /// TxMd[7], HS transmit mode
    pub const TX_MODE_HS: u32 = 1 << 7;
    /// HsCkMd[5], continuous HS clock
    pub const HS_CLOCK_CONTINUOUS: u32 = 1 << 5;
    /// DataLane[2:1], number of lanes minus one
    pub const DATA_LANE_SHIFT: u32 = 1;
    /// EoTDis[0]
    pub const EOT_DISABLE: u32 = 1 << 0;
}

/// DSICMD_TX
pub mod dsicmd_tx {
    /// DC_START[0]
    pub const START: u32 = 1 << 0;
}
