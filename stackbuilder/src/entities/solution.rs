use std::fmt::Write;

use anyhow::Result;
use itertools::Itertools;

use crate::entities::analysis::HomoAnalysis;
use crate::entities::layer::{Layer, Layer2D, LayerDesc};
use crate::entities::packable::Packable;
use crate::entities::position::{BoxPosition, CylPosition};
use crate::geometry::Transform3D;
use crate::geometry::primitives::{BBox3D, Vector3};

/// One level of a stack
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolutionLayer {
    /// A layer of items resting at `z`, `layer_type` indexes [`Solution::layer_types`]
    Items {
        layer_type: usize,
        z: f64,
        /// rotated half a turn around the footprint centre
        rotated: bool,
    },
    /// An interlayer sheet resting at `z`
    Interlayer { z: f64 },
}

/// Item placements of a single layer, in the container frame
#[derive(Clone, Debug, PartialEq)]
pub enum LayerPlacements {
    Boxes(Vec<BoxPosition>),
    Cylinders(Vec<CylPosition>),
}

/// A stacking solution: an ordered sequence of item layers and interlayers
#[derive(Clone, Debug)]
pub struct Solution {
    pub analysis: HomoAnalysis,
    pub layer_types: Vec<Layer>,
    pub layers: Vec<SolutionLayer>,
}

impl Solution {
    fn item_layers(&self) -> impl Iterator<Item = (&Layer, f64, bool)> {
        self.layers.iter().filter_map(|l| match l {
            SolutionLayer::Items {
                layer_type,
                z,
                rotated,
            } => Some((&self.layer_types[*layer_type], *z, *rotated)),
            SolutionLayer::Interlayer { .. } => None,
        })
    }

    pub fn layer_descs(&self) -> Vec<LayerDesc> {
        self.layer_types.iter().map(|l| l.descriptor()).collect()
    }

    pub fn item_layer_count(&self) -> usize {
        self.item_layers().count()
    }

    pub fn interlayer_count(&self) -> usize {
        self.layers.len() - self.item_layer_count()
    }

    pub fn item_count(&self) -> usize {
        self.item_layers().map(|(l, _, _)| l.count()).sum()
    }

    pub fn load_weight(&self) -> f64 {
        self.item_count() as f64 * self.analysis.packable.weight()
    }

    pub fn interlayer_weight(&self) -> f64 {
        match &self.analysis.interlayer {
            Some(il) => self.interlayer_count() as f64 * il.weight,
            None => 0.0,
        }
    }

    /// Load, container and interlayers
    pub fn total_weight(&self) -> f64 {
        self.load_weight() + self.interlayer_weight() + self.analysis.container.weight
    }

    /// Maps the layer frame onto the container frame for a layer
    fn layer_transform(&self, rotated: bool) -> Transform3D {
        let dims = self.analysis.container_dimensions();
        let offset = self.analysis.offset();
        let base = match rotated {
            true => Transform3D::from_rotation(2, 2).translate(Vector3::new(dims.x, dims.y, 0.0)),
            false => Transform3D::identity(),
        };
        base.translate(Vector3::new(offset.x, offset.y, 0.0))
    }

    /// Item placements of every item layer, bottom to top
    pub fn placements(&self) -> Result<Vec<LayerPlacements>> {
        self.item_layers()
            .map(|(layer, z, rotated)| {
                let t = self.layer_transform(rotated);
                match (layer, &self.analysis.packable) {
                    (Layer::Brick(l), Packable::Box(bp)) => Ok(LayerPlacements::Boxes(
                        l.box_positions(bp.dimensions(), z)?
                            .iter()
                            .map(|p| p.transform(&t))
                            .collect(),
                    )),
                    (Layer::Cyl(l), _) => Ok(LayerPlacements::Cylinders(
                        l.cyl_positions(z).iter().map(|p| p.transform(&t)).collect(),
                    )),
                    (Layer::Brick(_), Packable::Cylinder(_)) => {
                        anyhow::bail!("box layer in a cylinder solution")
                    }
                }
            })
            .collect()
    }

    /// Bounding box of all items
    pub fn load_bbox(&self) -> BBox3D {
        let mut bbox = BBox3D::empty();
        for (layer, z, rotated) in self.item_layers() {
            let t = self.layer_transform(rotated);
            for fp in layer.footprints() {
                let b = BBox3D::new(
                    Vector3::new(fp.x_min, fp.y_min, z),
                    Vector3::new(fp.x_max, fp.y_max, z + layer.layer_height()),
                );
                bbox.extend(&t.transform_bbox(&b));
            }
        }
        bbox
    }

    /// Bounding box of items, container and interlayers
    pub fn global_bbox(&self) -> BBox3D {
        let mut bbox = self.load_bbox();
        bbox.extend(&self.analysis.container.bbox());
        if let Some(il) = &self.analysis.interlayer {
            let c = &self.analysis.container;
            for layer in &self.layers {
                if let SolutionLayer::Interlayer { z } = layer {
                    let min = Vector3::new(0.5 * (c.length - il.length), 0.5 * (c.width - il.width), *z);
                    bbox.extend(&BBox3D::new(min, min + Vector3::new(il.length, il.width, il.thickness)));
                }
            }
        }
        bbox
    }

    /// Total height of the stack, container included
    pub fn height(&self) -> f64 {
        let top = self
            .layers
            .iter()
            .map(|l| match l {
                SolutionLayer::Items { layer_type, z, .. } => z + self.layer_types[*layer_type].layer_height(),
                SolutionLayer::Interlayer { z } => {
                    z + self.analysis.interlayer.as_ref().map_or(0.0, |il| il.thickness)
                }
            })
            .fold(f64::MIN, f64::max);
        top.max(self.analysis.container.load_base_z())
    }

    /// Item volume relative to the loadable volume, in percent
    pub fn volume_efficiency(&self) -> f64 {
        let c = &self.analysis.container;
        let available_height = match self.analysis.stacking_height() {
            Some(h) => h,
            None => self.height() - c.load_base_z(),
        };
        let loadable = c.length * c.width * available_height;
        match loadable > 0.0 {
            true => 100.0 * self.item_count() as f64 * self.analysis.packable.volume() / loadable,
            false => 0.0,
        }
    }

    /// Load weight relative to the allowed load weight, in percent, when a maximum weight applies
    pub fn weight_efficiency(&self) -> Option<f64> {
        let max_weight = self.analysis.constraint_set.max_weight?;
        let allowed = max_weight - self.analysis.container.weight;
        match allowed > 0.0 {
            true => Some(100.0 * self.load_weight() / allowed),
            false => None,
        }
    }

    /// Short description of the stack composition, e.g. `"27 = 3 x 9"` or `"38 = 3 x 10 + 1 x 8 (2 interlayers)"`.
    /// Layers are grouped by layer type, in order of first appearance.
    pub fn pallet_map_phrase(&self) -> String {
        let mut groups: Vec<(usize, usize)> = vec![];
        for layer in &self.layers {
            if let SolutionLayer::Items { layer_type, .. } = layer {
                match groups.iter_mut().find(|(t, _)| t == layer_type) {
                    Some((_, n)) => *n += 1,
                    None => groups.push((*layer_type, 1)),
                }
            }
        }
        let mut phrase = format!(
            "{} = {}",
            self.item_count(),
            groups
                .iter()
                .map(|(t, n)| format!("{n} x {}", self.layer_types[*t].count()))
                .join(" + ")
        );
        match self.interlayer_count() {
            0 => {}
            1 => phrase.push_str(" (1 interlayer)"),
            n => {
                let _ = write!(phrase, " ({n} interlayers)");
            }
        }
        phrase
    }
}
