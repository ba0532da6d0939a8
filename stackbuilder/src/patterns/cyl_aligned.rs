use anyhow::Result;

use crate::entities::layer::{CylFrame, CylLayer};
use crate::geometry::primitives::Vector2;
use crate::patterns::{CylLayerPattern, fit_count, spacing};

/// Square grid of upright cylinders
pub struct CylAligned;

impl CylLayerPattern for CylAligned {
    fn name(&self) -> &str {
        "Aligned"
    }

    fn can_be_swapped(&self) -> bool {
        false
    }

    fn layer_dimensions(&self, frame: &CylFrame) -> Option<(f64, f64)> {
        let (pl, pw) = (frame.pallet_length(), frame.pallet_width());
        let d = frame.cell_diameter();
        let actual_length = fit_count(pl, d, frame.tolerance) as f64 * d;
        let actual_width = fit_count(pw, d, frame.tolerance) as f64 * d;
        match pl > d && pw > d {
            true => Some((actual_length, actual_width)),
            false => None,
        }
    }

    fn generate(&self, frame: &CylFrame, actual_length: f64, actual_width: f64) -> Result<CylLayer> {
        let (pl, pw) = (frame.pallet_length(), frame.pallet_width());
        let (r, d) = (frame.cell_radius(), frame.cell_diameter());
        let size_x = fit_count(pl, d, frame.tolerance);
        let size_y = fit_count(pw, d, frame.tolerance);

        let offset_x = 0.5 * (pl - actual_length);
        let offset_y = 0.5 * (pw - actual_width);
        let space_x = spacing(actual_length, size_x as f64 * d, size_x);
        let space_y = spacing(actual_width, size_y as f64 * d, size_y);

        let mut layer = frame.start_layer(self.name());
        for j in 0..size_y {
            for i in 0..size_x {
                layer.add_position(Vector2::new(
                    r + offset_x + i as f64 * (d + space_x),
                    r + offset_y + j as f64 * (d + space_y),
                ));
            }
        }
        layer.update_max_space(space_x);
        layer.update_max_space(space_y);
        Ok(layer.finish())
    }
}
