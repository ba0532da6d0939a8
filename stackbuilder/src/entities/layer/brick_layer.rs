use anyhow::Result;
use log::warn;

use crate::entities::layer::{Layer2D, LayerDesc};
use crate::entities::position::{BoxPosition, LayerPosition};
use crate::geometry::HalfAxis;
use crate::geometry::primitives::{BBox2D, Vector2, Vector3};

/// Everything a box pattern needs to lay out a layer: the cell it repeats and the footprint it fills.
/// Lengths returned by the accessors are expressed in the pattern frame, which is the container
/// frame rotated a quarter turn when `swapped` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct BrickFrame {
    /// Item dimensions (length, width, height) including bulge
    pub item_dims: Vector3,
    /// Footprint to fill, overhang included
    pub container: Vector2,
    pub axis_ortho: HalfAxis,
    pub swapped: bool,
    pub inverted: bool,
    /// Gap forced between neighbouring items
    pub forced_space: f64,
    pub tolerance: f64,
}

impl BrickFrame {
    /// Dimensions of the item as seen by the layer: (along length, along width, vertical)
    fn oriented_dims(&self) -> (f64, f64, f64) {
        let Vector3 { x, y, z } = self.item_dims;
        match self.axis_ortho.direction() {
            0 => (y, z, x),
            1 => (x, z, y),
            _ => (x, y, z),
        }
    }

    pub fn box_length(&self) -> f64 {
        self.oriented_dims().0 + self.forced_space
    }

    pub fn box_width(&self) -> f64 {
        self.oriented_dims().1 + self.forced_space
    }

    pub fn box_height(&self) -> f64 {
        self.oriented_dims().2
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

    /// Number of layers of this height fitting in `max_height`
    pub fn no_layers(&self, max_height: f64) -> usize {
        no_layers(self.box_height(), max_height, self.tolerance)
    }

    pub fn start_layer(&self, pattern: &str) -> BrickLayerBuilder {
        BrickLayerBuilder {
            frame: self.clone(),
            pattern: pattern.to_string(),
            positions: vec![],
            max_space: 0.0,
        }
    }
}

pub(crate) fn no_layers(layer_height: f64, max_height: f64, tolerance: f64) -> usize {
    match max_height > 0.0 && layer_height > 0.0 {
        true => ((max_height + tolerance) / layer_height).floor() as usize,
        false => 0,
    }
}

/// Collects the positions generated by a pattern and maps them from the pattern frame into the container frame
pub struct BrickLayerBuilder {
    frame: BrickFrame,
    pattern: String,
    positions: Vec<LayerPosition>,
    max_space: f64,
}

impl BrickLayerBuilder {
    /// Adds a cell at `position` (pattern frame) spanning the box length along `length_axis`
    /// and the box width along `width_axis`.
    /// Cells that would stick out of the container are reported and skipped.
    pub fn add_position(&mut self, position: Vector2, length_axis: HalfAxis, width_axis: HalfAxis) {
        let f = &self.frame;
        let (mut pos, mut la, mut wa) = (position, length_axis, width_axis);
        if f.inverted {
            // mirror along the length axis, then restore a right-handed cell frame
            let mirror = |a: HalfAxis| match a.direction() {
                0 => a.opposite(),
                _ => a,
            };
            let (la_m, wa_m) = (mirror(la), mirror(wa));
            let mirrored = Vector2::new(f.pallet_length() - pos.x, pos.y);
            pos = mirrored + wa_m.to_vector().xy() * f.box_width();
            la = la_m;
            wa = wa_m.opposite();
        }
        if f.swapped {
            // quarter turn: (x, y) -> (L - y, x) with L the container length
            let container_length = f.container.x + f.forced_space;
            let rotate = |a: HalfAxis| match a {
                HalfAxis::XP => HalfAxis::YP,
                HalfAxis::YP => HalfAxis::XN,
                HalfAxis::XN => HalfAxis::YN,
                HalfAxis::YN => HalfAxis::XP,
                other => other,
            };
            pos = Vector2::new(container_length - pos.y, pos.x);
            la = rotate(la);
            wa = rotate(wa);
        }
        let layer_pos = LayerPosition {
            position: pos,
            length_axis: la,
            width_axis: wa,
        };
        let footprint = layer_pos.footprint(f.box_length(), f.box_width());
        let (cl, cw) = (f.container.x + f.forced_space, f.container.y + f.forced_space);
        if !footprint.fits_in(cl, cw, f.tolerance) {
            warn!(
                "[LAYER] {}: position {:?} ({}, {}) does not fit the container, skipped",
                self.pattern, layer_pos.position, la, wa
            );
            return;
        }
        self.positions.push(layer_pos);
    }

    pub fn update_max_space(&mut self, space: f64) {
        self.max_space = self.max_space.max(space);
    }

    pub fn finish(self) -> BrickLayer {
        BrickLayer {
            frame: self.frame,
            pattern: self.pattern,
            positions: self.positions,
            max_space: self.max_space,
        }
    }
}

/// A generated 2D layer of boxes, positions in the container frame
#[derive(Clone, Debug, PartialEq)]
pub struct BrickLayer {
    frame: BrickFrame,
    pattern: String,
    positions: Vec<LayerPosition>,
    max_space: f64,
}

impl BrickLayer {
    pub fn frame(&self) -> &BrickFrame {
        &self.frame
    }

    pub fn positions(&self) -> &[LayerPosition] {
        &self.positions
    }

    /// Footprints of the items themselves (forced space excluded)
    pub fn item_footprints(&self) -> Vec<BBox2D> {
        let f = &self.frame;
        self.positions
            .iter()
            .map(|p| {
                let cell = p.footprint(f.box_length(), f.box_width());
                BBox2D::new(
                    cell.x_min,
                    cell.y_min,
                    cell.x_max - f.forced_space,
                    cell.y_max - f.forced_space,
                )
            })
            .collect()
    }

    /// Real orientation of the box for a cell: directions of its length and width
    fn box_directions(&self, p: &LayerPosition) -> (HalfAxis, HalfAxis) {
        let (la, wa) = (p.length_axis, p.width_axis);
        match self.frame.axis_ortho {
            HalfAxis::ZP => (la, wa),
            HalfAxis::ZN => (la, wa.opposite()),
            HalfAxis::XP => (HalfAxis::ZP, la),
            HalfAxis::XN => (HalfAxis::ZN, la),
            HalfAxis::YP => (la, HalfAxis::ZP),
            HalfAxis::YN => (la, HalfAxis::ZN),
        }
    }

    /// 3D placements of boxes of nominal dimensions `dims` with the layer resting at height `z`
    pub fn box_positions(&self, dims: Vector3, z: f64) -> Result<Vec<BoxPosition>> {
        self.item_footprints()
            .iter()
            .zip(self.positions.iter())
            .map(|(fp, p)| {
                let (dir_length, dir_width) = self.box_directions(p);
                BoxPosition::from_min_corner(Vector3::new(fp.x_min, fp.y_min, z), dims, dir_length, dir_width)
            })
            .collect()
    }
}

impl Layer2D for BrickLayer {
    fn count(&self) -> usize {
        self.positions.len()
    }

    fn layer_height(&self) -> f64 {
        self.frame.box_height()
    }

    fn max_space(&self) -> f64 {
        self.max_space
    }

    fn tolerance(&self) -> f64 {
        self.frame.tolerance
    }

    fn descriptor(&self) -> LayerDesc {
        LayerDesc::new(
            self.pattern.clone(),
            self.frame.axis_ortho,
            self.frame.swapped,
            self.frame.inverted,
        )
    }

    fn footprints(&self) -> Vec<BBox2D> {
        self.item_footprints()
    }
}
