use anyhow::Result;

use crate::entities::layer::{BrickFrame, BrickLayer};
use crate::geometry::HalfAxis;
use crate::geometry::primitives::Vector2;
use crate::patterns::{BoxLayerPattern, fit_count, spacing};

/// Two mirrored blocks of length-aligned columns framing a central block of turned columns.
pub struct BoxSymmetricInterlocked;

/// Column and row counts of a symmetric interlocked layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SizeXY {
    /// columns of length-aligned boxes (always even, split over both sides)
    pub x_length: usize,
    /// columns of turned boxes
    pub x_width: usize,
    /// rows of length-aligned boxes
    pub y_length: usize,
    /// rows of turned boxes
    pub y_width: usize,
}

#[cfg(test)]
impl SizeXY {
    pub fn count(&self) -> usize {
        self.x_length * self.y_length + self.x_width * self.y_width
    }
}

/// Searches the number of length-aligned column pairs downwards, keeping the first split
/// with the strictly highest count.
pub(crate) fn size_xy(bl: f64, bw: f64, pl: f64, pw: f64, tol: f64) -> SizeXY {
    let mut best = SizeXY::default();
    let mut best_count = 0;
    let mut half_x_length = fit_count(pl, bl, tol) / 2;
    while half_x_length >= 1 {
        let x_width = fit_count(pl - 2.0 * half_x_length as f64 * bl, bw, tol);
        let y_length = fit_count(pw, bw, tol);
        let y_width = fit_count(pw, bl, tol);

        let count = 2 * half_x_length * y_length + x_width * y_width;
        if count > best_count {
            best_count = count;
            best = SizeXY {
                x_length: 2 * half_x_length,
                x_width,
                y_length,
                y_width,
            };
        }
        half_x_length -= 1;
    }
    best
}

impl BoxSymmetricInterlocked {
    fn sizes(frame: &BrickFrame) -> SizeXY {
        size_xy(
            frame.box_length(),
            frame.box_width(),
            frame.pallet_length(),
            frame.pallet_width(),
            frame.tolerance,
        )
    }
}

impl BoxLayerPattern for BoxSymmetricInterlocked {
    fn name(&self) -> &str {
        "Symmetric Interlocked"
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
        let s = BoxSymmetricInterlocked::sizes(frame);
        let feasible = s.x_length > 0
            && s.x_width > 0
            && s.y_length > 0
            && s.y_width > 0
            && s.x_length % 2 == 0;
        match feasible {
            true => Some((
                s.x_length as f64 * bl + s.x_width as f64 * bw,
                f64::max(s.y_length as f64 * bw, s.y_width as f64 * bl),
            )),
            false => None,
        }
    }

    fn generate(&self, frame: &BrickFrame, actual_length: f64, actual_width: f64) -> Result<BrickLayer> {
        let (pl, pw) = (frame.pallet_length(), frame.pallet_width());
        let (bl, bw) = (frame.box_length(), frame.box_width());
        let s = BoxSymmetricInterlocked::sizes(frame);

        let offset_x = 0.5 * (pl - actual_length);
        let offset_y = 0.5 * (pw - actual_width);

        let space_x = spacing(
            actual_length,
            s.x_length as f64 * bl + s.x_width as f64 * bw,
            s.x_length + s.x_width,
        );
        let space_y_length = spacing(actual_width, s.y_length as f64 * bw, s.y_length);
        let space_y_width = spacing(actual_width, s.y_width as f64 * bl, s.y_width);

        let mut layer = frame.start_layer(self.name());
        for i in 0..s.x_length / 2 {
            for j in 0..s.y_length {
                let dx = i as f64 * (bl + space_x);
                let dy = j as f64 * (bw + space_y_length);
                layer.add_position(
                    Vector2::new(offset_x + dx, offset_y + dy),
                    HalfAxis::XP,
                    HalfAxis::YP,
                );
                layer.add_position(
                    Vector2::new(pl - offset_x - dx, pw - offset_y - dy),
                    HalfAxis::XN,
                    HalfAxis::YN,
                );
            }
        }
        let turned_x0 = offset_x + (s.x_length / 2) as f64 * (bl + space_x);
        for i in 0..s.x_width {
            for j in 0..s.y_width {
                layer.add_position(
                    Vector2::new(
                        turned_x0 + i as f64 * (bw + space_x) + bw,
                        offset_y + j as f64 * (bl + space_y_width),
                    ),
                    HalfAxis::YP,
                    HalfAxis::XN,
                );
            }
        }
        layer.update_max_space(space_x);
        layer.update_max_space(space_y_length);
        layer.update_max_space(space_y_width);
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
    fn single_aligned_pair_fills_the_length() {
        // no turned column fits next to the pair
        let s = size_xy(600.0, 400.0, 1200.0, 1000.0, 1e-3);
        assert_eq!(s.x_length, 2);
        assert_eq!(s.x_width, 0);
        assert_eq!(s.count(), 4);
    }

    #[test]
    fn tied_split_keeps_the_first_found() {
        // 4 aligned columns x 4 rows and 2 aligned columns x 4 rows + 4 turned columns x 2 rows both hold 16
        let two_pairs = size_xy(400.0, 200.0, 1600.0, 800.0, 1e-3);
        assert_eq!(two_pairs.count(), 16);
        let one_pair = SizeXY {
            x_length: 2,
            x_width: 4,
            y_length: 4,
            y_width: 2,
        };
        assert_eq!(one_pair.count(), 16);
        assert_eq!((two_pairs.x_length, two_pairs.x_width), (4, 0));

        // the kept split has no turned column, so the pattern cannot be built
        let frame = BrickFrame {
            item_dims: Vector3::new(400.0, 200.0, 150.0),
            container: Vector2::new(1600.0, 800.0),
            axis_ortho: HalfAxis::ZP,
            swapped: false,
            inverted: false,
            forced_space: 0.0,
            tolerance: 1e-3,
        };
        assert!(BoxSymmetricInterlocked.layer_dimensions(&frame).is_none());
    }

    #[test]
    fn infeasible_without_turned_column() {
        let frame = BrickFrame {
            item_dims: Vector3::new(600.0, 400.0, 300.0),
            container: Vector2::new(1200.0, 1000.0),
            axis_ortho: HalfAxis::ZP,
            swapped: false,
            inverted: false,
            forced_space: 0.0,
            tolerance: 1e-3,
        };
        assert!(BoxSymmetricInterlocked.layer_dimensions(&frame).is_none());
    }

    #[test]
    fn generates_non_overlapping_layer() {
        let frame = BrickFrame {
            item_dims: Vector3::new(400.0, 250.0, 200.0),
            container: Vector2::new(1200.0, 1000.0),
            axis_ortho: HalfAxis::ZP,
            swapped: false,
            inverted: false,
            forced_space: 0.0,
            tolerance: 1e-3,
        };
        let (al, aw) = BoxSymmetricInterlocked.layer_dimensions(&frame).unwrap();
        assert_eq!((al, aw), (1050.0, 1000.0));
        let layer = BoxSymmetricInterlocked.generate(&frame, al, aw).unwrap();
        assert_eq!(layer.count(), 10);
        assert!(assertions::layer_is_feasible(&layer, frame.container));
    }
}
