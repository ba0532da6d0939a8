use log::warn;

use crate::entities::layer::brick_layer::no_layers;
use crate::entities::layer::{Layer2D, LayerDesc};
use crate::entities::position::CylPosition;
use crate::geometry::HalfAxis;
use crate::geometry::primitives::{BBox2D, Vector2};

/// Input of a cylinder pattern. Cylinders always stand upright.
#[derive(Clone, Debug, PartialEq)]
pub struct CylFrame {
    pub radius: f64,
    pub height: f64,
    pub container: Vector2,
    pub swapped: bool,
    pub forced_space: f64,
    pub tolerance: f64,
}

impl CylFrame {
    /// Radius of the disc each cylinder claims, half of the forced space included
    pub fn cell_radius(&self) -> f64 {
        self.radius + 0.5 * self.forced_space
    }

    pub fn cell_diameter(&self) -> f64 {
        2.0 * self.cell_radius()
    }

    pub fn pallet_length(&self) -> f64 {
        match self.swapped {
            false => self.container.x + self.forced_space,
            true => self.container.y + self.forced_space,
        }
    }

    pub fn pallet_width(&self) -> f64 {
        match self.swapped {
            false => self.container.y + self.forced_space,
            true => self.container.x + self.forced_space,
        }
    }

    pub fn no_layers(&self, max_height: f64) -> usize {
        no_layers(self.height, max_height, self.tolerance)
    }

    pub fn start_layer(&self, pattern: &str) -> CylLayerBuilder {
        CylLayerBuilder {
            frame: self.clone(),
            pattern: pattern.to_string(),
            centres: vec![],
            max_space: 0.0,
        }
    }
}

pub struct CylLayerBuilder {
    frame: CylFrame,
    pattern: String,
    centres: Vec<Vector2>,
    max_space: f64,
}

impl CylLayerBuilder {
    /// Adds a cylinder centred at `centre` (pattern frame)
    pub fn add_position(&mut self, centre: Vector2) {
        let f = &self.frame;
        let (cl, cw) = (f.container.x + f.forced_space, f.container.y + f.forced_space);
        let centre = match f.swapped {
            true => Vector2::new(cl - centre.y, centre.x),
            false => centre,
        };
        let r = f.cell_radius();
        let disc = BBox2D::new(centre.x - r, centre.y - r, centre.x + r, centre.y + r);
        if !disc.fits_in(cl, cw, f.tolerance) {
            warn!(
                "[LAYER] {}: cylinder centred at {:?} does not fit the container, skipped",
                self.pattern, centre
            );
            return;
        }
        self.centres.push(centre);
    }

    pub fn update_max_space(&mut self, space: f64) {
        self.max_space = self.max_space.max(space);
    }

    pub fn finish(self) -> CylLayer {
        CylLayer {
            frame: self.frame,
            pattern: self.pattern,
            centres: self.centres,
            max_space: self.max_space,
        }
    }
}

/// A generated 2D layer of upright cylinders
#[derive(Clone, Debug, PartialEq)]
pub struct CylLayer {
    frame: CylFrame,
    pattern: String,
    centres: Vec<Vector2>,
    max_space: f64,
}

impl CylLayer {
    pub fn frame(&self) -> &CylFrame {
        &self.frame
    }

    /// Centres in the container frame (forced space compensated)
    pub fn centres(&self) -> Vec<Vector2> {
        let shift = 0.5 * self.frame.forced_space;
        self.centres
            .iter()
            .map(|c| Vector2::new(c.x - shift, c.y - shift))
            .collect()
    }

    pub fn cyl_positions(&self, z: f64) -> Vec<CylPosition> {
        self.centres()
            .into_iter()
            .map(|c| CylPosition::upright(c.with_z(z)))
            .collect()
    }
}

impl Layer2D for CylLayer {
    fn count(&self) -> usize {
        self.centres.len()
    }

    fn layer_height(&self) -> f64 {
        self.frame.height
    }

    fn max_space(&self) -> f64 {
        self.max_space
    }

    fn tolerance(&self) -> f64 {
        self.frame.tolerance
    }

    fn descriptor(&self) -> LayerDesc {
        LayerDesc::new(self.pattern.clone(), HalfAxis::ZP, self.frame.swapped, false)
    }

    fn footprints(&self) -> Vec<BBox2D> {
        let r = self.frame.radius;
        self.centres()
            .iter()
            .map(|c| BBox2D::new(c.x - r, c.y - r, c.x + r, c.y + r))
            .collect()
    }
}
