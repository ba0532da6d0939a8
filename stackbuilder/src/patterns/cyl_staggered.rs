use anyhow::Result;

use crate::entities::layer::{CylFrame, CylLayer};
use crate::geometry::primitives::Vector2;
use crate::patterns::{CylLayerPattern, fit_count};

/// Hexagonal arrangement: rows of cylinders, every other row shifted by a radius and nested
/// into the previous one (row pitch `r * sqrt(3)`)
pub struct CylStaggered;

#[derive(Debug, Clone, Copy)]
struct Rows {
    rows: usize,
    even: usize,
    odd: usize,
}

impl Rows {
    fn length(&self, r: f64) -> f64 {
        let even = self.even as f64 * 2.0 * r;
        match self.rows > 1 {
            true => f64::max(even, r + self.odd as f64 * 2.0 * r),
            false => even,
        }
    }

    fn width(&self, r: f64) -> f64 {
        2.0 * r + self.rows.saturating_sub(1) as f64 * r * 3f64.sqrt()
    }
}

impl CylStaggered {
    fn rows(frame: &CylFrame) -> Rows {
        let (pl, pw, tol) = (frame.pallet_length(), frame.pallet_width(), frame.tolerance);
        let (r, d) = (frame.cell_radius(), frame.cell_diameter());
        let rows = match pw + tol >= d {
            true => 1 + fit_count(pw - d, r * 3f64.sqrt(), tol),
            false => 0,
        };
        Rows {
            rows,
            even: fit_count(pl, d, tol),
            odd: fit_count(pl - r, d, tol),
        }
    }
}

impl CylLayerPattern for CylStaggered {
    fn name(&self) -> &str {
        "Staggered"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn layer_dimensions(&self, frame: &CylFrame) -> Option<(f64, f64)> {
        let rows = CylStaggered::rows(frame);
        let r = frame.cell_radius();
        match rows.rows > 1 && rows.even > 0 && rows.odd > 0 {
            true => Some((rows.length(r), rows.width(r))),
            false => None,
        }
    }

    fn generate(&self, frame: &CylFrame, actual_length: f64, actual_width: f64) -> Result<CylLayer> {
        let rows = CylStaggered::rows(frame);
        let (r, d) = (frame.cell_radius(), frame.cell_diameter());
        let offset_x = 0.5 * (frame.pallet_length() - actual_length);
        let offset_y = 0.5 * (frame.pallet_width() - actual_width);
        let pitch = match rows.rows > 1 {
            true => f64::max((actual_width - d) / (rows.rows - 1) as f64, r * 3f64.sqrt()),
            false => 0.0,
        };

        let mut layer = frame.start_layer(self.name());
        for j in 0..rows.rows {
            let (shift, n) = match j % 2 {
                0 => (0.0, rows.even),
                _ => (r, rows.odd),
            };
            for i in 0..n {
                layer.add_position(Vector2::new(
                    offset_x + r + shift + i as f64 * d,
                    offset_y + r + j as f64 * pitch,
                ));
            }
        }
        layer.update_max_space(actual_length - rows.length(r));
        layer.update_max_space(actual_width - rows.width(r));
        Ok(layer.finish())
    }
}
