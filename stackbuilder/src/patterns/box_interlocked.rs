use anyhow::Result;

use crate::entities::layer::{BrickFrame, BrickLayer};
use crate::geometry::HalfAxis;
use crate::geometry::primitives::Vector2;
use crate::patterns::{BoxLayerPattern, fit_count, spacing};

/// A block of length-aligned columns next to a block of turned columns.
/// Inverting the layer puts the turned block first.
pub struct BoxInterlocked;

#[derive(Debug, Clone, Copy, Default)]
struct Blocks {
    aligned_columns: usize,
    turned_columns: usize,
    aligned_rows: usize,
    turned_rows: usize,
}

impl BoxInterlocked {
    fn blocks(frame: &BrickFrame) -> Blocks {
        let (pl, pw) = (frame.pallet_length(), frame.pallet_width());
        let (bl, bw, tol) = (frame.box_length(), frame.box_width(), frame.tolerance);
        let aligned_rows = fit_count(pw, bw, tol);
        let turned_rows = fit_count(pw, bl, tol);

        let mut best = Blocks::default();
        let mut best_count = 0;
        for aligned_columns in (1..=fit_count(pl, bl, tol)).rev() {
            let turned_columns = fit_count(pl - aligned_columns as f64 * bl, bw, tol);
            let count = aligned_columns * aligned_rows + turned_columns * turned_rows;
            if turned_columns > 0 && count > best_count {
                best_count = count;
                best = Blocks {
                    aligned_columns,
                    turned_columns,
                    aligned_rows,
                    turned_rows,
                };
            }
        }
        best
    }
}

impl BoxLayerPattern for BoxInterlocked {
    fn name(&self) -> &str {
        "Interlocked"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn can_be_inverted(&self) -> bool {
        true
    }

    fn layer_dimensions(&self, frame: &BrickFrame) -> Option<(f64, f64)> {
        let b = BoxInterlocked::blocks(frame);
        let (bl, bw) = (frame.box_length(), frame.box_width());
        match b.aligned_columns > 0 && b.turned_columns > 0 && b.aligned_rows > 0 && b.turned_rows > 0 {
            true => Some((
                b.aligned_columns as f64 * bl + b.turned_columns as f64 * bw,
                f64::max(b.aligned_rows as f64 * bw, b.turned_rows as f64 * bl),
            )),
            false => None,
        }
    }

    fn generate(&self, frame: &BrickFrame, actual_length: f64, actual_width: f64) -> Result<BrickLayer> {
        let b = BoxInterlocked::blocks(frame);
        let (bl, bw) = (frame.box_length(), frame.box_width());

        let offset_x = 0.5 * (frame.pallet_length() - actual_length);
        let offset_y = 0.5 * (frame.pallet_width() - actual_width);
        let space_x = spacing(
            actual_length,
            b.aligned_columns as f64 * bl + b.turned_columns as f64 * bw,
            b.aligned_columns + b.turned_columns,
        );
        let space_y_aligned = spacing(actual_width, b.aligned_rows as f64 * bw, b.aligned_rows);
        let space_y_turned = spacing(actual_width, b.turned_rows as f64 * bl, b.turned_rows);

        let mut layer = frame.start_layer(self.name());
        for i in 0..b.aligned_columns {
            for j in 0..b.aligned_rows {
                layer.add_position(
                    Vector2::new(
                        offset_x + i as f64 * (bl + space_x),
                        offset_y + j as f64 * (bw + space_y_aligned),
                    ),
                    HalfAxis::XP,
                    HalfAxis::YP,
                );
            }
        }
        let turned_x0 = offset_x + b.aligned_columns as f64 * (bl + space_x);
        for i in 0..b.turned_columns {
            for j in 0..b.turned_rows {
                layer.add_position(
                    Vector2::new(
                        turned_x0 + i as f64 * (bw + space_x) + bw,
                        offset_y + j as f64 * (bl + space_y_turned),
                    ),
                    HalfAxis::YP,
                    HalfAxis::XN,
                );
            }
        }
        layer.update_max_space(space_x);
        layer.update_max_space(space_y_aligned);
        layer.update_max_space(space_y_turned);
        Ok(layer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::layer::Layer2D;
    use crate::geometry::primitives::Vector3;
    use crate::util::assertions;

    fn frame(inverted: bool) -> BrickFrame {
        BrickFrame {
            item_dims: Vector3::new(400.0, 250.0, 200.0),
            container: Vector2::new(1200.0, 1000.0),
            axis_ortho: HalfAxis::ZP,
            swapped: false,
            inverted,
            forced_space: 0.0,
            tolerance: 1e-3,
        }
    }

    #[test]
    fn odd_number_of_aligned_columns_allowed() {
        // 2 aligned columns (8) + 1 turned column (2) is found before the tie 1 aligned (4) + 3 turned (6)
        let frame = frame(false);
        let (al, aw) = BoxInterlocked.layer_dimensions(&frame).unwrap();
        assert_eq!((al, aw), (1050.0, 1000.0));
        let layer = BoxInterlocked.generate(&frame, al, aw).unwrap();
        assert_eq!(layer.count(), 10);
        assert!(assertions::layer_is_feasible(&layer, frame.container));
    }

    #[test]
    fn inverted_layer_mirrors_blocks() {
        let (straight, inverted) = (frame(false), frame(true));
        let (al, aw) = BoxInterlocked.layer_dimensions(&straight).unwrap();
        let a = BoxInterlocked.generate(&straight, al, aw).unwrap();
        let b = BoxInterlocked.generate(&inverted, al, aw).unwrap();
        assert_eq!(a.count(), b.count());
        assert!(assertions::layer_is_feasible(&b, inverted.container));
        // the first aligned column now sits against the far side
        let first = b.item_footprints()[0];
        assert!((first.x_max - (1200.0 - 75.0)).abs() < 1e-9);
        assert_eq!(b.positions()[0].length_axis, HalfAxis::XN);
    }
}
