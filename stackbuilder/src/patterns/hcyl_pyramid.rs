use anyhow::Result;

use crate::entities::{CylLoad, CylLoadFrame, CylPosition, LimitReached};
use crate::geometry::HalfAxis;
use crate::geometry::primitives::Vector3;
use crate::patterns::{HCylLoadPattern, fit_count};
use crate::util::fpa;

/// Lying cylinders in a pyramid: the bottom tier fills the width, every tier above holds one row
/// less, shifted by a radius and nested into the tier below (tier pitch `r * sqrt(3)`).
pub struct HCylPyramid;

impl HCylPyramid {
    fn sizes(frame: &CylLoadFrame) -> (usize, usize) {
        (
            fit_count(frame.pallet_length(), frame.length, frame.tolerance),
            fit_count(frame.pallet_width(), frame.diameter(), frame.tolerance),
        )
    }
}

impl HCylLoadPattern for HCylPyramid {
    fn name(&self) -> &str {
        "Pyramid"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn load_dimensions(&self, frame: &CylLoadFrame) -> Option<(f64, f64)> {
        match HCylPyramid::sizes(frame) {
            (0, _) | (_, 0) => None,
            (sx, sy) => Some((sx as f64 * frame.length, sy as f64 * frame.diameter())),
        }
    }

    fn generate(
        &self,
        frame: &CylLoadFrame,
        actual_length: f64,
        actual_width: f64,
        max_count: Option<usize>,
        max_height: Option<f64>,
    ) -> Result<CylLoad> {
        let (size_x, size_y) = HCylPyramid::sizes(frame);
        let (r, d) = (frame.radius, frame.diameter());
        let pitch = r * 3f64.sqrt();
        let offset_x = 0.5 * (frame.pallet_length() - actual_length);
        let offset_y = 0.5 * (frame.pallet_width() - actual_width);

        let mut load = CylLoad {
            pattern: self.name().to_string(),
            swapped: frame.swapped,
            radius: r,
            length: frame.length,
            positions: vec![],
            limit_reached: LimitReached::MaxHeight,
        };
        'tiers: for tier in 0..size_y {
            let tier_top = d + tier as f64 * pitch;
            if max_height.is_some_and(|h| fpa::exceeds(tier_top, h, frame.tolerance)) {
                break;
            }
            for j in 0..size_y - tier {
                for i in 0..size_x {
                    if max_count.is_some_and(|n| load.count() >= n) {
                        load.limit_reached = LimitReached::MaxCount;
                        break 'tiers;
                    }
                    let base = Vector3::new(
                        offset_x + i as f64 * frame.length,
                        offset_y + (1 + tier) as f64 * r + j as f64 * d,
                        r + tier as f64 * pitch,
                    );
                    load.positions.push(CylPosition {
                        position: base,
                        axis: HalfAxis::XP,
                    });
                }
            }
        }
        if max_count.is_some_and(|n| load.count() >= n) {
            load.limit_reached = LimitReached::MaxCount;
        }
        Ok(load.transform(&frame.to_container()))
    }
}
