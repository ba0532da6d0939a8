use anyhow::Result;
use itertools::iproduct;

use crate::entities::layer::{BrickFrame, BrickLayer};
use crate::geometry::HalfAxis;
use crate::geometry::primitives::{BBox2D, Vector2};
use crate::patterns::{BoxLayerPattern, fit_count};

/// Pinwheel of four blocks turning around the centre of the layer:
/// aligned blocks in the bottom-left and top-right corners, turned blocks in the other two.
pub struct BoxSpiral;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pinwheel {
    /// aligned block: columns (along length) and rows (along width)
    a: usize,
    b: usize,
    /// turned block: columns and rows
    c: usize,
    d: usize,
}

impl Pinwheel {
    fn count(&self) -> usize {
        2 * (self.a * self.b + self.c * self.d)
    }

    fn length(&self, bl: f64, bw: f64) -> f64 {
        self.a as f64 * bl + self.c as f64 * bw
    }

    fn width(&self, bl: f64, bw: f64) -> f64 {
        self.b as f64 * bw + self.d as f64 * bl
    }

    /// The four blocks in a `length x width` frame: bottom-left, bottom-right, top-right, top-left
    fn blocks(&self, bl: f64, bw: f64) -> [BBox2D; 4] {
        let (l, w) = (self.length(bl, bw), self.width(bl, bw));
        let (al, bh) = (self.a as f64 * bl, self.b as f64 * bw);
        let (cw, dh) = (self.c as f64 * bw, self.d as f64 * bl);
        [
            BBox2D::new(0.0, 0.0, al, bh),
            BBox2D::new(al, 0.0, l, dh),
            BBox2D::new(l - al, w - bh, l, w),
            BBox2D::new(0.0, w - dh, cw, w),
        ]
    }

    fn is_valid(&self, bl: f64, bw: f64, tol: f64) -> bool {
        let blocks = self.blocks(bl, bw);
        (0..4).all(|i| (i + 1..4).all(|j| !blocks[i].overlaps(&blocks[j], tol)))
    }
}

impl BoxSpiral {
    fn pinwheel(frame: &BrickFrame) -> Option<Pinwheel> {
        let (pl, pw) = (frame.pallet_length(), frame.pallet_width());
        let (bl, bw, tol) = (frame.box_length(), frame.box_width(), frame.tolerance);

        let mut best: Option<Pinwheel> = None;
        for (a, b) in iproduct!(1..=fit_count(pl, bl, tol), 1..=fit_count(pw, bw, tol)) {
            let c = fit_count(pl - a as f64 * bl, bw, tol);
            let d = fit_count(pw - b as f64 * bw, bl, tol);
            if c == 0 || d == 0 {
                continue;
            }
            let candidate = Pinwheel { a, b, c, d };
            let improves = best.is_none_or(|p| candidate.count() > p.count());
            if improves && candidate.is_valid(bl, bw, tol) {
                best = Some(candidate);
            }
        }
        best
    }
}

impl BoxLayerPattern for BoxSpiral {
    fn name(&self) -> &str {
        "Spiral"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn can_be_inverted(&self) -> bool {
        false
    }

    fn layer_dimensions(&self, frame: &BrickFrame) -> Option<(f64, f64)> {
        let (bl, bw) = (frame.box_length(), frame.box_width());
        BoxSpiral::pinwheel(frame).map(|p| (p.length(bl, bw), p.width(bl, bw)))
    }

    fn generate(&self, frame: &BrickFrame, actual_length: f64, actual_width: f64) -> Result<BrickLayer> {
        let mut layer = frame.start_layer(self.name());
        let Some(p) = BoxSpiral::pinwheel(frame) else {
            return Ok(layer.finish());
        };
        let (bl, bw) = (frame.box_length(), frame.box_width());
        let offset_x = 0.5 * (frame.pallet_length() - actual_length);
        let offset_y = 0.5 * (frame.pallet_width() - actual_width);
        // leftover is left as a gap between the blocks
        let gap_x = (actual_length - p.length(bl, bw)).max(0.0);
        let gap_y = (actual_width - p.width(bl, bw)).max(0.0);
        let (x_max, y_max) = (offset_x + actual_length, offset_y + actual_width);

        for (i, j) in iproduct!(0..p.a, 0..p.b) {
            // bottom-left, aligned
            layer.add_position(
                Vector2::new(offset_x + i as f64 * bl, offset_y + j as f64 * bw),
                HalfAxis::XP,
                HalfAxis::YP,
            );
            // top-right, aligned, half a turn
            layer.add_position(
                Vector2::new(x_max - i as f64 * bl, y_max - j as f64 * bw),
                HalfAxis::XN,
                HalfAxis::YN,
            );
        }
        let turned_x0 = offset_x + p.a as f64 * bl + gap_x;
        for (i, j) in iproduct!(0..p.c, 0..p.d) {
            // bottom-right, turned
            layer.add_position(
                Vector2::new(turned_x0 + (i + 1) as f64 * bw, offset_y + j as f64 * bl),
                HalfAxis::YP,
                HalfAxis::XN,
            );
            // top-left, turned, half a turn
            layer.add_position(
                Vector2::new(offset_x + i as f64 * bw, y_max - j as f64 * bl),
                HalfAxis::YN,
                HalfAxis::XP,
            );
        }
        layer.update_max_space(gap_x);
        layer.update_max_space(gap_y);
        Ok(layer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::layer::Layer2D;
    use crate::geometry::primitives::Vector3;
    use crate::util::assertions;

    #[test]
    fn pinwheel_on_square_footprint() {
        let frame = BrickFrame {
            item_dims: Vector3::new(300.0, 200.0, 150.0),
            container: Vector2::new(1000.0, 1000.0),
            axis_ortho: HalfAxis::ZP,
            swapped: false,
            inverted: false,
            forced_space: 0.0,
            tolerance: 1e-3,
        };
        let (al, aw) = BoxSpiral.layer_dimensions(&frame).unwrap();
        assert!(al <= 1000.0 && aw <= 1000.0);
        let layer = BoxSpiral.generate(&frame, al, aw).unwrap();
        // 2 x (2 x 2 aligned + 2 x 2 turned), one more than the 3 x 5 grid
        assert_eq!(layer.count(), 16);
        assert_eq!((al, aw), (1000.0, 1000.0));
        assert!(assertions::layer_is_feasible(&layer, frame.container));
    }
}
