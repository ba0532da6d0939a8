use anyhow::{Result, ensure};

use crate::entities::layer::{BrickFrame, BrickLayer};
use crate::geometry::HalfAxis;
use crate::geometry::primitives::Vector2;
use crate::patterns::{BoxLayerPattern, fit_count, spacing};

/// Regular grid of boxes, all with their length along the pattern's length axis
pub struct BoxAligned;

impl BoxAligned {
    fn size_xy(frame: &BrickFrame) -> (usize, usize) {
        (
            fit_count(frame.pallet_length(), frame.box_length(), frame.tolerance),
            fit_count(frame.pallet_width(), frame.box_width(), frame.tolerance),
        )
    }
}

impl BoxLayerPattern for BoxAligned {
    fn name(&self) -> &str {
        "Aligned"
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
        let (size_x, size_y) = BoxAligned::size_xy(frame);
        match size_x > 0 && size_y > 0 {
            true => Some((
                size_x as f64 * frame.box_length(),
                size_y as f64 * frame.box_width(),
            )),
            false => None,
        }
    }

    fn generate(&self, frame: &BrickFrame, actual_length: f64, actual_width: f64) -> Result<BrickLayer> {
        let (bl, bw) = (frame.box_length(), frame.box_width());
        let (size_x, size_y) = BoxAligned::size_xy(frame);
        ensure!(
            actual_length + frame.tolerance >= size_x as f64 * bl
                && actual_width + frame.tolerance >= size_y as f64 * bw,
            "actual dimensions {actual_length} x {actual_width} too small for a {size_x} x {size_y} grid"
        );

        let offset_x = 0.5 * (frame.pallet_length() - actual_length);
        let offset_y = 0.5 * (frame.pallet_width() - actual_width);
        let space_x = spacing(actual_length, size_x as f64 * bl, size_x);
        let space_y = spacing(actual_width, size_y as f64 * bw, size_y);

        let mut layer = frame.start_layer(self.name());
        for j in 0..size_y {
            for i in 0..size_x {
                layer.add_position(
                    Vector2::new(
                        offset_x + i as f64 * (bl + space_x),
                        offset_y + j as f64 * (bw + space_y),
                    ),
                    HalfAxis::XP,
                    HalfAxis::YP,
                );
            }
        }
        layer.update_max_space(space_x);
        layer.update_max_space(space_y);
        Ok(layer.finish())
    }
}
