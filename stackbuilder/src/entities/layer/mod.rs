mod brick_layer;
mod cyl_layer;
mod layer_desc;

#[doc(inline)]
pub use brick_layer::{BrickFrame, BrickLayer, BrickLayerBuilder};
#[doc(inline)]
pub use cyl_layer::{CylFrame, CylLayer, CylLayerBuilder};
#[doc(inline)]
pub use layer_desc::LayerDesc;

pub(crate) use brick_layer::no_layers;

use crate::geometry::primitives::BBox2D;

/// Behaviour shared by all 2D layers
pub trait Layer2D {
    /// Number of items in the layer
    fn count(&self) -> usize;

    /// Height of a single layer
    fn layer_height(&self) -> f64;

    /// Largest gap left between items by the pattern
    fn max_space(&self) -> f64;

    /// Geometric tolerance the layer was built with
    fn tolerance(&self) -> f64;

    fn descriptor(&self) -> LayerDesc;

    /// Footprints of the items, in the container frame
    fn footprints(&self) -> Vec<BBox2D>;

    /// Number of identical layers fitting in `height`
    fn no_layers(&self, height: f64) -> usize {
        no_layers(self.layer_height(), height, self.tolerance())
    }

    /// Number of items when stacking as many of these layers as fit in `height`
    fn count_in_height(&self, height: f64) -> usize {
        self.no_layers(height) * self.count()
    }
}

/// A 2D layer of either shape
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Brick(BrickLayer),
    Cyl(CylLayer),
}

impl Layer2D for Layer {
    fn count(&self) -> usize {
        match self {
            Layer::Brick(l) => l.count(),
            Layer::Cyl(l) => l.count(),
        }
    }

    fn layer_height(&self) -> f64 {
        match self {
            Layer::Brick(l) => l.layer_height(),
            Layer::Cyl(l) => l.layer_height(),
        }
    }

    fn max_space(&self) -> f64 {
        match self {
            Layer::Brick(l) => l.max_space(),
            Layer::Cyl(l) => l.max_space(),
        }
    }

    fn tolerance(&self) -> f64 {
        match self {
            Layer::Brick(l) => l.tolerance(),
            Layer::Cyl(l) => l.tolerance(),
        }
    }

    fn descriptor(&self) -> LayerDesc {
        match self {
            Layer::Brick(l) => l.descriptor(),
            Layer::Cyl(l) => l.descriptor(),
        }
    }

    fn footprints(&self) -> Vec<BBox2D> {
        match self {
            Layer::Brick(l) => l.footprints(),
            Layer::Cyl(l) => l.footprints(),
        }
    }
}

impl From<BrickLayer> for Layer {
    fn from(l: BrickLayer) -> Self {
        Layer::Brick(l)
    }
}

impl From<CylLayer> for Layer {
    fn from(l: CylLayer) -> Self {
        Layer::Cyl(l)
    }
}
