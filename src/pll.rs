//! DSI PLL configuration search.
//!
//! ```text
//! pll_clk = REFCLK * (FBD + 1) / (PRD + 1) / 2^FRS
//! ```
//!
//! FRS selects one of four output ranges, the search then walks every
//! (PRD, FBD) pair and keeps the first one closest to the target.

use static_assertions::const_assert;

use crate::clock::ClockSpec;
use crate::time::Hertz;

/// Output range limits, `FRS = i` covers `[FRS_LIMITS[i + 1], FRS_LIMITS[i])`.
pub const FRS_LIMITS: [u32; 5] = [1_000_000_000, 500_000_000, 250_000_000, 125_000_000, 62_500_000];

const_assert!(FRS_LIMITS[0] > FRS_LIMITS[1]);
const_assert!(FRS_LIMITS[1] > FRS_LIMITS[2]);
const_assert!(FRS_LIMITS[2] > FRS_LIMITS[3]);
const_assert!(FRS_LIMITS[3] > FRS_LIMITS[4]);

/// PRD[3:0]
const PRD_COUNT: u32 = 16;
/// FBD[8:0]
const FBD_COUNT: u32 = 512;

/// PLL error.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Zero clock or zero lane count.
    InvalidClockSpec,
    /// Target PLL frequency outside of all FRS ranges.
    NoFrequencyBand,
    /// No divider pair lands inside the selected range.
    NoPllSolution,
}

/// A solved PLL configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllSolution {
    /// Feedback divider, FBD, 0..=511
    pub fbd: u16,
    /// Input divider, PRD, 0..=15
    pub prd: u8,
    /// Frequency range select, FRS, 0..=3
    pub frs: u8,
    /// Achieved PLL output.
    pub pll: Hertz,
    /// DSI bit clock, half of the PLL output.
    pub bit_clock: Hertz,
}

impl PllSolution {
    pub fn byte_clock(&self) -> Hertz {
        self.bit_clock / 4
    }

    /// Range of the selected FRS, `(min, max)` with `max` exclusive.
    pub fn range(&self) -> (Hertz, Hertz) {
        let frs = self.frs as usize;
        (Hertz(FRS_LIMITS[frs + 1]), Hertz(FRS_LIMITS[frs]))
    }
}

/// Find the FRS range holding `target`, as `(frs, min, max)`.
pub fn frequency_range(target: Hertz) -> Option<(u8, u32, u32)> {
    FRS_LIMITS
        .windows(2)
        .position(|w| target.0 < w[0] && target.0 >= w[1])
        .map(|i| (i as u8, FRS_LIMITS[i + 1], FRS_LIMITS[i]))
}

/// Search the divider space for `spec`.
///
/// Ties keep the first candidate in PRD-major, FBD-minor order, and an exact
/// hit stops the search.
pub fn solve(spec: &ClockSpec) -> Result<PllSolution, Error> {
    spec.validate()?;

    let target = spec.target_pll();

    let Some((frs, min_pll, max_pll)) = frequency_range(target) else {
        error!("could not find frs value for {}", target.0);
        return Err(Error::NoFrequencyBand);
    };

    let target = target.0 as u64;
    let refclk = spec.reference.0 as u64;

    // (diff, pll, prd, fbd)
    let mut best: Option<(u64, u64, u32, u32)> = None;

    'search: for prd in 0..PRD_COUNT {
        let divisor = ((prd + 1) as u64) << frs;

        for fbd in 0..FBD_COUNT {
            let pll = refclk * (fbd as u64 + 1) / divisor;

            if pll >= max_pll as u64 || pll < min_pll as u64 {
                continue;
            }

            let diff = pll.abs_diff(target);

            if best.map_or(true, |(best_diff, ..)| diff < best_diff) {
                best = Some((diff, pll, prd, fbd));
            }

            if diff == 0 {
                break 'search;
            }
        }
    }

    let Some((_, pll, prd, fbd)) = best else {
        error!("could not find suitable PLL setup");
        return Err(Error::NoPllSolution);
    };

    // in range, below FRS_LIMITS[0]
    let pll = pll as u32;

    Ok(PllSolution {
        fbd: fbd as u16,
        prd: prd as u8,
        frs,
        pll: Hertz(pll),
        bit_clock: Hertz(pll / 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(reference: u32, pixel_clock: u32, dsi_lanes: u32, dpi_lanes: u32) -> ClockSpec {
        ClockSpec {
            reference: Hertz(reference),
            pixel_clock: Hertz(pixel_clock),
            dpi_lanes,
            dsi_lanes,
        }
    }

    /// Smallest reachable distance to the target inside `frs`, over every pair.
    fn best_diff(spec: &ClockSpec, frs: u8) -> u64 {
        let (min, max) = (FRS_LIMITS[frs as usize + 1] as u64, FRS_LIMITS[frs as usize] as u64);
        let target = spec.target_pll().0 as u64;
        let mut best = u64::MAX;
        for prd in 0..16u64 {
            for fbd in 0..512u64 {
                let pll = spec.reference.0 as u64 * (fbd + 1) / ((prd + 1) << frs);
                if pll >= min && pll < max {
                    best = best.min(pll.abs_diff(target));
                }
            }
        }
        best
    }

    #[test]
    fn reference_panel() {
        // refclk is PCLK / 4
        let spec = spec(154_900_000 / 4, 154_900_000, 4, 24);
        let pll = solve(&spec).unwrap();

        assert_eq!(spec.target_pll(), Hertz(929_400_000));
        assert_eq!(pll.frs, 0);
        assert_eq!(pll.prd, 0);
        assert_eq!(pll.fbd, 23);
        assert_eq!(pll.pll, Hertz(929_400_000));
        assert_eq!(pll.bit_clock, Hertz(464_700_000));
        assert_eq!(pll.byte_clock(), Hertz(116_175_000));
    }

    #[test]
    fn exact_hit_keeps_lowest_prd() {
        // PRD 1 / FBD 47 reaches the same frequency, PRD 0 is found first
        let spec = spec(38_725_000, 154_900_000, 4, 24);
        let pll = solve(&spec).unwrap();
        assert_eq!((pll.prd, pll.fbd), (0, 23));
    }

    #[test]
    fn inexact_reference() {
        let spec = spec(40_000_000, 154_900_000, 4, 24);
        let pll = solve(&spec).unwrap();

        assert_eq!(pll.frs, 0);
        assert_eq!((pll.prd, pll.fbd), (12, 301));
        assert_eq!(pll.pll, Hertz(929_230_769));
        assert_eq!(pll.bit_clock, Hertz(464_615_384));

        // within 0.1% of target
        let target = spec.target_pll().0;
        assert!(pll.pll.0.abs_diff(target) * 1000 < target);
        assert_eq!(pll.pll.0.abs_diff(target) as u64, best_diff(&spec, 0));
    }

    #[test]
    fn inexact_tie_keeps_first_pair() {
        // target 600_000_016, (5, 240) and (11, 481) land on the same frequency
        let spec = spec(14_938_268, 100_000_003, 4, 24);
        let pll = solve(&spec).unwrap();
        assert_eq!((pll.frs, pll.prd, pll.fbd), (0, 5, 240));
        assert_eq!(pll.pll, Hertz(600_020_431));
        assert_eq!(pll.pll.0.abs_diff(spec.target_pll().0) as u64, best_diff(&spec, 0));

        // (15, 297) ties with (7, 148)
        let spec = ClockSpec {
            reference: Hertz(32_222_206),
            ..spec
        };
        let pll = solve(&spec).unwrap();
        assert_eq!((pll.prd, pll.fbd), (7, 148));
        assert_eq!(pll.pll, Hertz(600_138_586));
    }

    #[test]
    fn seiko_wvga() {
        let spec = spec(33_500_000 / 4, 33_500_000, 4, 24);
        let pll = solve(&spec).unwrap();

        assert_eq!(spec.target_pll(), Hertz(201_000_000));
        assert_eq!(pll.frs, 2);
        assert_eq!((pll.prd, pll.fbd), (0, 95));
        assert_eq!(pll.bit_clock, Hertz(100_500_000));
    }

    #[test]
    fn solution_is_minimal_and_in_range() {
        for (reference, pclk) in [
            (38_725_000, 154_900_000),
            (40_000_000, 154_900_000),
            (27_000_000, 74_250_000),
            (19_200_000, 33_500_000),
            (12_000_000, 25_175_000),
            (62_500_000, 148_500_000),
            (100_000_000, 12_000_000),
        ] {
            let spec = spec(reference, pclk, 4, 24);
            let pll = solve(&spec).unwrap();
            let (min, max) = pll.range();

            assert!(pll.pll >= min && pll.pll < max);
            assert_eq!(pll.bit_clock.0, pll.pll.0 / 2);
            assert_eq!(pll.pll.0.abs_diff(spec.target_pll().0) as u64, best_diff(&spec, pll.frs));
            assert!(pll.prd < 16 && pll.fbd < 512 && pll.frs < 4);
        }
    }

    #[test]
    fn deterministic() {
        let spec = spec(27_000_000, 74_250_000, 4, 24);
        assert_eq!(solve(&spec), solve(&spec));
    }

    #[test]
    fn range_boundaries() {
        assert_eq!(frequency_range(Hertz(1_000_000_000)), None);
        assert_eq!(frequency_range(Hertz(999_999_999)), Some((0, 500_000_000, 1_000_000_000)));
        assert_eq!(frequency_range(Hertz(500_000_000)), Some((0, 500_000_000, 1_000_000_000)));
        assert_eq!(frequency_range(Hertz(499_999_999)), Some((1, 250_000_000, 500_000_000)));
        assert_eq!(frequency_range(Hertz(125_000_000)), Some((2, 125_000_000, 250_000_000)));
        assert_eq!(frequency_range(Hertz(62_500_000)), Some((3, 62_500_000, 125_000_000)));
        assert_eq!(frequency_range(Hertz(62_499_999)), None);
    }

    #[test]
    fn boundary_target_takes_lower_inclusive_range() {
        // one DSI lane, 8 DPI lines: pll = pclk * 8
        let pll = solve(&spec(50_000_000, 62_500_000, 1, 8)).unwrap();
        assert_eq!(pll.frs, 0);
        assert_eq!(pll.pll, Hertz(500_000_000));

        let pll = solve(&spec(50_000_000, 7_812_500, 1, 8)).unwrap();
        assert_eq!(pll.frs, 3);
        assert_eq!(pll.pll, Hertz(62_500_000));
    }

    #[test]
    fn target_out_of_range() {
        assert_eq!(solve(&spec(50_000_000, 125_000_000, 1, 8)), Err(Error::NoFrequencyBand));
        assert_eq!(solve(&spec(50_000_000, 7_812_499, 1, 8)), Err(Error::NoFrequencyBand));
        assert_eq!(solve(&spec(38_725_000, 1_000_000, 4, 24)), Err(Error::NoFrequencyBand));
    }

    #[test]
    fn reference_too_slow() {
        // 100kHz * 512 never reaches 500MHz
        assert_eq!(solve(&spec(100_000, 154_900_000, 4, 24)), Err(Error::NoPllSolution));
    }

    #[test]
    fn invalid_spec() {
        assert_eq!(solve(&spec(38_725_000, 154_900_000, 0, 24)), Err(Error::InvalidClockSpec));
        assert_eq!(solve(&spec(38_725_000, 0, 4, 24)), Err(Error::InvalidClockSpec));
    }
}
