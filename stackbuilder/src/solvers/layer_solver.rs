use std::cmp::Reverse;

use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use log::{debug, error, info};

use crate::entities::layer::{BrickFrame, CylFrame, Layer, Layer2D, LayerDesc};
use crate::entities::{BoxProperties, ConstraintSet, CylLoad, CylLoadFrame, CylinderProperties, Packable};
use crate::geometry::{HalfAxis, Transform3D};
use crate::geometry::primitives::{Vector2, Vector3};
use crate::patterns::{BoxLayerPattern, CylLayerPattern, PatternRegistry};
use crate::util::SolverConfig;

/// Outcome of evaluating a single (pattern, orientation, swap, inversion) combination
#[derive(Debug)]
pub enum CandidateEval {
    /// The layer satisfies every constraint
    Feasible(Layer),
    /// The combination does not yield an acceptable layer
    Infeasible(&'static str),
    /// Generating the layer failed unexpectedly
    Failed(anyhow::Error),
}

/// Builds candidate 2D layers for a packable on a container footprint
pub struct LayerSolver {
    patterns: PatternRegistry,
    config: SolverConfig,
}

impl LayerSolver {
    pub fn new(patterns: PatternRegistry, config: SolverConfig) -> Self {
        Self { patterns, config }
    }

    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn tolerance(&self) -> f64 {
        self.config.unit_system.length_tolerance()
    }

    /// Builds every acceptable layer of `packable` on a footprint of `container_dim`, for a stack
    /// starting at height `offset_z`.
    /// With `keep_only_best`, only layers achieving the best item count over the available height are kept.
    /// When a maximum height applies, layers are sorted by descending item count over that height.
    /// An empty result means the item does not fit.
    pub fn build_layers(
        &self,
        packable: &Packable,
        container_dim: Vector2,
        offset_z: f64,
        cs: &ConstraintSet,
        keep_only_best: bool,
    ) -> Result<Vec<Layer>> {
        packable.validate()?;
        cs.validate()?;
        ensure!(
            container_dim.x > 0.0 && container_dim.y > 0.0,
            "degenerate container footprint: {container_dim:?}"
        );

        let evaluations = match packable {
            Packable::Box(bp) => self.evaluate_box_candidates(bp, container_dim, offset_z, cs),
            Packable::Cylinder(cp) => self.evaluate_cyl_candidates(cp, container_dim, offset_z, cs),
        };

        let mut layers = vec![];
        for (desc, eval) in evaluations {
            match eval {
                CandidateEval::Feasible(layer) => layers.push(layer),
                CandidateEval::Infeasible(reason) => {
                    debug!("[LS] {desc} rejected: {reason}")
                }
                CandidateEval::Failed(e) => error!(
                    "[LS] Pattern: {} Orient: {} Swapped: {} Message: {e:#}",
                    desc.pattern, desc.axis_ortho, desc.swapped
                ),
            }
        }

        let available = cs.max_height.map(|h| h - offset_z);
        let score = |l: &Layer| match available {
            Some(h) => l.count_in_height(h),
            None => l.count(),
        };

        if keep_only_best {
            let best = layers.iter().map(score).max().unwrap_or(0);
            layers.retain(|l| score(l) >= best);
        }
        if available.is_some() {
            // stable: equal counts keep their exploration order
            layers = layers.into_iter().sorted_by_key(|l| Reverse(score(l))).collect();
        }

        info!(
            "[LS] {} layer(s) for {:?} on {} x {}",
            layers.len(),
            packable.name(),
            container_dim.x,
            container_dim.y
        );
        Ok(layers)
    }

    /// Descriptor of the best layer, `None` if the item does not fit
    pub fn best_layer_desc(
        &self,
        packable: &Packable,
        container_dim: Vector2,
        offset_z: f64,
        cs: &ConstraintSet,
    ) -> Result<Option<LayerDesc>> {
        let layers = self.build_layers(packable, container_dim, offset_z, cs, true)?;
        Ok(layers.first().map(|l| l.descriptor()))
    }

    /// Rebuilds the layer identified by `desc`.
    /// Returns `None` if the pattern cannot be built in this configuration, fails on unknown pattern names.
    pub fn build_layer(
        &self,
        packable: &Packable,
        container_dim: Vector2,
        desc: &LayerDesc,
        min_space: f64,
    ) -> Result<Option<Layer>> {
        match packable {
            Packable::Box(bp) => {
                let pattern = self.patterns.box_pattern(&desc.pattern)?;
                let frame = self.brick_frame(bp, container_dim, desc, min_space);
                match pattern.layer_dimensions(&frame) {
                    Some((al, aw)) => Ok(Some(pattern.generate(&frame, al, aw)?.into())),
                    None => Ok(None),
                }
            }
            Packable::Cylinder(cp) => {
                let pattern = self.cyl_pattern_for(desc)?;
                let frame = self.cyl_frame(cp, container_dim, desc.swapped, min_space);
                match pattern.layer_dimensions(&frame) {
                    Some((al, aw)) => Ok(Some(pattern.generate(&frame, al, aw)?.into())),
                    None => Ok(None),
                }
            }
        }
    }

    /// Rebuilds the layer identified by `desc`, spread over `actual` (container frame).
    /// Used to give alternating layer types a common footprint.
    pub fn build_layer_with_dimensions(
        &self,
        packable: &Packable,
        container_dim: Vector2,
        desc: &LayerDesc,
        actual: Vector2,
        min_space: f64,
    ) -> Result<Option<Layer>> {
        let (al, aw) = match desc.swapped {
            true => (actual.y, actual.x),
            false => (actual.x, actual.y),
        };
        match packable {
            Packable::Box(bp) => {
                let pattern = self.patterns.box_pattern(&desc.pattern)?;
                let frame = self.brick_frame(bp, container_dim, desc, min_space);
                match pattern.layer_dimensions(&frame) {
                    Some(_) => Ok(Some(pattern.generate(&frame, al, aw)?.into())),
                    None => Ok(None),
                }
            }
            Packable::Cylinder(cp) => {
                let pattern = self.cyl_pattern_for(desc)?;
                let frame = self.cyl_frame(cp, container_dim, desc.swapped, min_space);
                match pattern.layer_dimensions(&frame) {
                    Some(_) => Ok(Some(pattern.generate(&frame, al, aw)?.into())),
                    None => Ok(None),
                }
            }
        }
    }

    /// Smallest footprint (container frame) enclosing the layers of all `descs`.
    /// `None` if any of them cannot be built.
    pub fn layer_dimensions(
        &self,
        descs: &[LayerDesc],
        packable: &Packable,
        container_dim: Vector2,
        min_space: f64,
    ) -> Result<Option<Vector2>> {
        let mut dims: Option<Vector2> = None;
        for desc in descs {
            let pattern_dims = match packable {
                Packable::Box(bp) => {
                    let frame = self.brick_frame(bp, container_dim, desc, min_space);
                    self.patterns.box_pattern(&desc.pattern)?.layer_dimensions(&frame)
                }
                Packable::Cylinder(cp) => {
                    let frame = self.cyl_frame(cp, container_dim, desc.swapped, min_space);
                    self.cyl_pattern_for(desc)?.layer_dimensions(&frame)
                }
            };
            let Some((al, aw)) = pattern_dims else {
                error!("[LS] failed to get layer dimensions of {desc}");
                return Ok(None);
            };
            let (x, y) = match desc.swapped {
                true => (aw, al),
                false => (al, aw),
            };
            dims = Some(match dims {
                Some(d) => Vector2::new(d.x.max(x), d.y.max(y)),
                None => Vector2::new(x, y),
            });
        }
        Ok(dims)
    }

    /// Best stack of at most two layer types of `bp` filling `container` (length, width, stacking height).
    /// For each vertical item axis the layer with the most items is retained, then the best single
    /// type and all pairs (thickest layer at the bottom) are compared on total item count.
    /// Returns the layer types with their repeat counts, bottom first.
    pub fn best_combination(
        &self,
        bp: &BoxProperties,
        container: Vector3,
        cs: &ConstraintSet,
    ) -> Result<Vec<(LayerDesc, usize)>> {
        bp.validate()?;
        cs.validate()?;
        let stacking_height = container.z;
        let container_dim = container.xy();

        let mut best: [Option<(LayerDesc, usize, f64)>; 3] = [None, None, None];
        for (pattern, desc) in self.box_combinations(cs) {
            let frame = self.brick_frame(bp, container_dim, &desc, cs.min_space);
            if frame.no_layers(stacking_height) < 1 {
                continue;
            }
            let Some((al, aw)) = pattern.layer_dimensions(&frame) else {
                continue;
            };
            let layer = match pattern.generate(&frame, al, aw) {
                Ok(layer) => layer,
                Err(e) => {
                    error!(
                        "[LS] Pattern: {} Orient: {} Swapped: {} Message: {e:#}",
                        desc.pattern, desc.axis_ortho, desc.swapped
                    );
                    continue;
                }
            };
            let slot = &mut best[desc.axis_ortho.direction()];
            if layer.count() > slot.as_ref().map_or(0, |(_, c, _)| *c) {
                *slot = Some((desc, layer.count(), layer.layer_height()));
            }
        }

        let counts = best.clone().map(|b| b.map_or(0, |(_, c, _)| c));
        let heights = best.clone().map(|b| b.map_or(0.0, |(_, _, h)| h));
        let tol = self.tolerance();
        let layers_in = |i: usize, height: f64| match counts[i] > 0 {
            true => crate::entities::layer::no_layers(heights[i], height, tol),
            false => 0,
        };

        // best single layer type
        let (mut index_i, mut index_j, mut no_i_max, mut no_j_max, mut count_max) = (0, 0, 0, 0, 0);
        for i in 0..3 {
            let no_layers = layers_in(i, stacking_height);
            if counts[i] * no_layers > count_max {
                count_max = counts[i] * no_layers;
                index_i = i;
                no_i_max = no_layers;
            }
        }

        // pairs, thickest at the bottom
        for (c1, c2) in [(0, 1), (1, 2), (2, 0)] {
            let (c1, c2) = match heights[c2] > heights[c1] {
                true => (c2, c1),
                false => (c1, c2),
            };
            for no_i in (1..=layers_in(c1, stacking_height)).rev() {
                let remaining = stacking_height - no_i as f64 * heights[c1];
                let no_j = layers_in(c2, remaining);
                let count = no_i * counts[c1] + no_j * counts[c2];
                if count > count_max {
                    (index_i, index_j, no_i_max, no_j_max, count_max) = (c1, c2, no_i, no_j, count);
                }
            }
        }

        let mut combination = vec![];
        for (index, no) in [(index_i, no_i_max), (index_j, no_j_max)] {
            if let (true, Some((desc, _, _))) = (no > 0, &best[index]) {
                combination.push((desc.clone(), no));
            }
        }
        info!(
            "[LS] best combination of {:?}: {count_max} items in {} layer type(s)",
            bp.name,
            combination.len()
        );
        Ok(combination)
    }

    /// Loads of `cp` lying on its side over `container_dim`, most items first.
    /// Each lying pattern is tried with the cylinder axis along the container length (`XP`) and,
    /// when swappable, along its width (`YP`), as far as the constraint set allows these axes.
    /// Loads are translated by `offset` into the container frame; `max_height` is measured from the load base.
    pub fn build_cyl_loads(
        &self,
        cp: &CylinderProperties,
        container_dim: Vector2,
        offset: Vector3,
        cs: &ConstraintSet,
        max_count: Option<usize>,
        max_height: Option<f64>,
    ) -> Result<Vec<CylLoad>> {
        cp.validate()?;
        ensure!(
            container_dim.x > 0.0 && container_dim.y > 0.0,
            "degenerate container footprint: {container_dim:?}"
        );
        let mut loads = vec![];
        for pattern in self.patterns.hcyl_patterns() {
            for swapped in [false, true] {
                let axis = match swapped {
                    false => HalfAxis::XP,
                    true => HalfAxis::YP,
                };
                if (swapped && !pattern.can_be_swapped()) || !cs.allows(axis) {
                    continue;
                }
                let frame = CylLoadFrame {
                    radius: cp.radius,
                    length: cp.height,
                    container: container_dim,
                    swapped,
                    tolerance: self.tolerance(),
                };
                let Some((al, aw)) = pattern.load_dimensions(&frame) else {
                    debug!("[LS] {}|{axis} rejected: pattern cannot be built on this footprint", pattern.name());
                    continue;
                };
                match pattern.generate(&frame, al, aw, max_count, max_height) {
                    Ok(load) if load.count() > 0 => loads.push(load.transform(&Transform3D::from_translation(offset))),
                    Ok(_) => debug!("[LS] {}|{axis} rejected: empty load", pattern.name()),
                    Err(e) => error!("[LS] Pattern: {} Orient: {axis} Swapped: {swapped} Message: {e:#}", pattern.name()),
                }
            }
        }
        // stable: equal counts keep their exploration order
        let loads = loads.into_iter().sorted_by_key(|l| Reverse(l.count())).collect_vec();
        info!(
            "[LS] {} lying load(s) for {:?} on {} x {}",
            loads.len(),
            cp.name,
            container_dim.x,
            container_dim.y
        );
        Ok(loads)
    }

    /// All (pattern, descriptor) combinations to explore for boxes under `cs`
    fn box_combinations<'a>(
        &'a self,
        cs: &'a ConstraintSet,
    ) -> impl Iterator<Item = (&'a dyn BoxLayerPattern, LayerDesc)> + 'a {
        self.patterns.box_patterns().flat_map(move |pattern| {
            let axes: &[HalfAxis] = match pattern.is_symmetric() {
                true => &HalfAxis::POSITIVES,
                false => &HalfAxis::ALL,
            };
            let swaps: &[bool] = match pattern.can_be_swapped() {
                true => &[false, true],
                false => &[false],
            };
            let inversions: &[bool] = match pattern.can_be_inverted() {
                true => &[false, true],
                false => &[false],
            };
            axes.iter()
                .filter(move |axis| cs.allows(**axis))
                .cartesian_product(swaps)
                .cartesian_product(inversions)
                .map(move |((axis, swapped), inverted)| {
                    (pattern, LayerDesc::new(pattern.name(), *axis, *swapped, *inverted))
                })
        })
    }

    fn evaluate_box_candidates(
        &self,
        bp: &BoxProperties,
        container_dim: Vector2,
        offset_z: f64,
        cs: &ConstraintSet,
    ) -> Vec<(LayerDesc, CandidateEval)> {
        self.box_combinations(cs)
            .map(|(pattern, desc)| {
                let frame = self.brick_frame(bp, container_dim, &desc, cs.min_space);
                let eval = match cs.max_height {
                    Some(h) if frame.no_layers(h) < 1 => CandidateEval::Infeasible("layer taller than the maximum height"),
                    _ => match pattern.layer_dimensions(&frame) {
                        None => CandidateEval::Infeasible("pattern cannot be built on this footprint"),
                        Some((al, aw)) => match pattern.generate(&frame, al, aw) {
                            Ok(layer) => self.check_layer(layer.into(), offset_z, cs, bp.weight),
                            Err(e) => CandidateEval::Failed(e),
                        },
                    },
                };
                (desc, eval)
            })
            .collect()
    }

    fn evaluate_cyl_candidates(
        &self,
        cp: &CylinderProperties,
        container_dim: Vector2,
        offset_z: f64,
        cs: &ConstraintSet,
    ) -> Vec<(LayerDesc, CandidateEval)> {
        if !cs.allows(HalfAxis::ZP) {
            debug!("[LS] cylinders must stand upright, which the constraint set forbids");
            return vec![];
        }
        self.patterns
            .cyl_patterns()
            .flat_map(|pattern| {
                let swaps: &[bool] = match pattern.can_be_swapped() {
                    true => &[false, true],
                    false => &[false],
                };
                swaps.iter().map(move |swapped| (pattern, *swapped))
            })
            .map(|(pattern, swapped)| {
                let desc = LayerDesc::new(pattern.name(), HalfAxis::ZP, swapped, false);
                let frame = self.cyl_frame(cp, container_dim, swapped, cs.min_space);
                let eval = match cs.max_height {
                    Some(h) if frame.no_layers(h) < 1 => CandidateEval::Infeasible("layer taller than the maximum height"),
                    _ => match pattern.layer_dimensions(&frame) {
                        None => CandidateEval::Infeasible("pattern cannot be built on this footprint"),
                        Some((al, aw)) => match pattern.generate(&frame, al, aw) {
                            Ok(layer) => self.check_layer(layer.into(), offset_z, cs, cp.weight),
                            Err(e) => CandidateEval::Failed(e),
                        },
                    },
                };
                (desc, eval)
            })
            .collect()
    }

    /// Applies the constraint set to a generated layer
    fn check_layer(&self, layer: Layer, offset_z: f64, cs: &ConstraintSet, item_weight: f64) -> CandidateEval {
        if layer.count() == 0 {
            return CandidateEval::Infeasible("empty layer");
        }
        if cs.max_height.is_some_and(|h| layer.count_in_height(h - offset_z) == 0) {
            return CandidateEval::Infeasible("no layer fits above the container");
        }
        if cs.max_layer_weight.is_some_and(|w| layer.count() as f64 * item_weight > w) {
            return CandidateEval::Infeasible("layer too heavy");
        }
        if cs.max_space_allowed.is_some_and(|s| layer.max_space() > s) {
            return CandidateEval::Infeasible("gaps between items too large");
        }
        CandidateEval::Feasible(layer)
    }

    fn brick_frame(&self, bp: &BoxProperties, container_dim: Vector2, desc: &LayerDesc, min_space: f64) -> BrickFrame {
        BrickFrame {
            item_dims: bp.outer_dimensions(),
            container: container_dim,
            axis_ortho: desc.axis_ortho,
            swapped: desc.swapped,
            inverted: desc.inverted,
            forced_space: min_space,
            tolerance: self.tolerance(),
        }
    }

    fn cyl_frame(&self, cp: &CylinderProperties, container_dim: Vector2, swapped: bool, min_space: f64) -> CylFrame {
        CylFrame {
            radius: cp.radius,
            height: cp.height,
            container: container_dim,
            swapped,
            forced_space: min_space,
            tolerance: self.tolerance(),
        }
    }

    fn cyl_pattern_for(&self, desc: &LayerDesc) -> Result<&dyn CylLayerPattern> {
        if desc.axis_ortho != HalfAxis::ZP || desc.inverted {
            bail!("invalid cylinder layer descriptor {desc}: cylinders stand upright and are never inverted");
        }
        self.patterns.cyl_pattern(&desc.pattern)
    }
}

impl Default for LayerSolver {
    fn default() -> Self {
        LayerSolver::new(PatternRegistry::default(), SolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AllowedOrientations;
    use crate::entities::layer::BrickLayer;
    use crate::patterns::BoxAligned;

    fn aligned_only() -> LayerSolver {
        LayerSolver::new(
            PatternRegistry::empty().with_box_pattern(BoxAligned),
            SolverConfig::default(),
        )
    }

    fn case() -> Packable {
        Packable::Box(BoxProperties::new("case", 400.0, 300.0, 250.0, 5.0).unwrap())
    }

    fn cs(max_height: f64) -> ConstraintSet {
        ConstraintSet {
            max_height: Some(max_height),
            ..ConstraintSet::default()
        }
    }

    const PALLET: Vector2 = Vector2::new(1200.0, 1000.0);

    /// One box in a corner, only valid with the item upright: explores every half-axis
    struct Corner;

    impl BoxLayerPattern for Corner {
        fn name(&self) -> &str {
            "Corner"
        }
        fn can_be_swapped(&self) -> bool {
            false
        }
        fn is_symmetric(&self) -> bool {
            false
        }
        fn can_be_inverted(&self) -> bool {
            false
        }
        fn layer_dimensions(&self, frame: &BrickFrame) -> Option<(f64, f64)> {
            Some((frame.box_length(), frame.box_width()))
        }
        fn generate(&self, frame: &BrickFrame, _: f64, _: f64) -> Result<BrickLayer> {
            let mut layer = frame.start_layer(self.name());
            layer.add_position(Vector2::ZERO, HalfAxis::XP, HalfAxis::YP);
            Ok(layer.finish())
        }
    }

    struct Broken;

    impl BoxLayerPattern for Broken {
        fn name(&self) -> &str {
            "Broken"
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
            Some((frame.pallet_length(), frame.pallet_width()))
        }
        fn generate(&self, _: &BrickFrame, _: f64, _: f64) -> Result<BrickLayer> {
            bail!("always fails")
        }
    }

    #[test]
    fn layers_sorted_by_count_in_height() {
        let layers = aligned_only()
            .build_layers(&case(), PALLET, 0.0, &cs(1000.0), false)
            .unwrap();
        let descs = layers.iter().map(|l| l.descriptor().to_string()).collect_vec();
        assert_eq!(
            descs,
            [
                "Aligned|YP|0|0",
                "Aligned|ZP|0|0",
                "Aligned|XP|0|0",
                "Aligned|ZP|1|0",
                "Aligned|XP|1|0",
                "Aligned|YP|1|0",
            ]
        );
        let counts = layers.iter().map(|l| l.count_in_height(1000.0)).collect_vec();
        assert_eq!(counts, [36, 36, 32, 32, 24, 24]);
    }

    #[test]
    fn keep_only_best_layers() {
        let solver = aligned_only();
        let layers = solver
            .build_layers(&case(), PALLET, 0.0, &cs(1000.0), true)
            .unwrap();
        assert_eq!(layers.len(), 2);
        assert!(layers.iter().all(|l| l.count_in_height(1000.0) == 36));
        let best = solver
            .best_layer_desc(&case(), PALLET, 0.0, &cs(1000.0))
            .unwrap()
            .unwrap();
        assert_eq!(best.to_string(), "Aligned|YP|0|0");
    }

    #[test]
    fn orientation_constraints_are_honoured() {
        let cs = ConstraintSet {
            allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
            ..cs(1000.0)
        };
        let layers = aligned_only().build_layers(&case(), PALLET, 0.0, &cs, false).unwrap();
        assert_eq!(layers.len(), 2);
        assert!(layers.iter().all(|l| l.descriptor().axis_ortho == HalfAxis::ZP));
    }

    #[test]
    fn item_too_large() {
        let big = Packable::Box(BoxProperties::new("big", 1300.0, 1100.0, 1050.0, 5.0).unwrap());
        let layers = LayerSolver::default()
            .build_layers(&big, PALLET, 150.0, &cs(1000.0), false)
            .unwrap();
        assert!(layers.is_empty());
    }

    #[test]
    fn pallet_height_reduces_stack() {
        // 850 left above the pallet: 2 x 16 beats 3 x 9 and 2 x 12
        let layers = aligned_only()
            .build_layers(&case(), PALLET, 150.0, &cs(1000.0), true)
            .unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].count_in_height(850.0), 32);
        assert_eq!(layers[0].descriptor().to_string(), "Aligned|XP|0|0");
    }

    #[test]
    fn non_symmetric_patterns_explore_all_half_axes() {
        let solver = LayerSolver::new(
            PatternRegistry::empty().with_box_pattern(Corner),
            SolverConfig::default(),
        );
        let cs = ConstraintSet {
            allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
            ..ConstraintSet::default()
        };
        let layers = solver.build_layers(&case(), PALLET, 0.0, &cs, false).unwrap();
        let axes = layers.iter().map(|l| l.descriptor().axis_ortho).collect_vec();
        assert_eq!(axes, [HalfAxis::ZN, HalfAxis::ZP]);
    }

    #[test]
    fn failing_pattern_is_skipped() {
        let solver = LayerSolver::new(
            PatternRegistry::empty()
                .with_box_pattern(Broken)
                .with_box_pattern(BoxAligned),
            SolverConfig::default(),
        );
        let layers = solver
            .build_layers(&case(), PALLET, 0.0, &cs(1000.0), false)
            .unwrap();
        assert_eq!(layers.len(), 6);
        assert!(layers.iter().all(|l| l.descriptor().pattern == "Aligned"));
    }

    #[test]
    fn invalid_constraint_set_is_rejected() {
        let cs = ConstraintSet {
            max_height: None,
            ..ConstraintSet::default()
        };
        assert!(aligned_only().build_layers(&case(), PALLET, 0.0, &cs, false).is_err());
    }

    #[test]
    fn rebuild_from_descriptor() {
        let solver = LayerSolver::default();
        let desc: LayerDesc = "Aligned|ZP|0|0".parse().unwrap();
        let layer = solver.build_layer(&case(), PALLET, &desc, 0.0).unwrap().unwrap();
        assert_eq!(layer.count(), 9);
        assert_eq!(layer.descriptor(), desc);

        let unknown: LayerDesc = "Herringbone|ZP|0|0".parse().unwrap();
        assert!(solver.build_layer(&case(), PALLET, &unknown, 0.0).is_err());
    }

    #[test]
    fn common_footprint_of_alternating_layers() {
        let solver = LayerSolver::default();
        let descs = ["Aligned|ZP|0|0", "Aligned|ZP|1|0"].map(|s| s.parse::<LayerDesc>().unwrap());
        let dims = solver
            .layer_dimensions(&descs, &case(), PALLET, 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(dims, Vector2::new(1200.0, 900.0));

        let layer = solver
            .build_layer_with_dimensions(&case(), PALLET, &descs[1], dims, 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(layer.count(), 8);
        for fp in layer.footprints() {
            assert!(fp.fits_in(PALLET.x, PALLET.y, 1e-6));
            assert!(fp.y_min >= 50.0 - 1e-6 && fp.y_max <= 950.0 + 1e-6);
        }
    }

    #[test]
    fn best_combination_mixes_two_layer_types() {
        let bp = BoxProperties::new("case", 400.0, 300.0, 250.0, 5.0).unwrap();
        let combination = aligned_only()
            .best_combination(&bp, Vector3::new(1200.0, 1000.0, 1000.0), &ConstraintSet::default())
            .unwrap();
        let combination = combination
            .iter()
            .map(|(d, n)| (d.to_string(), *n))
            .collect_vec();
        // 1 x 16 (400 high) + 2 x 12 (300 high) beats 4 x 9 or 3 x 12
        assert_eq!(
            combination,
            [("Aligned|XP|0|0".to_string(), 1), ("Aligned|YP|0|0".to_string(), 2)]
        );
    }

    #[test]
    fn cylinders_stand_upright() {
        let cyl = Packable::Cylinder(CylinderProperties::new("drum", 50.0, 100.0, 2.0).unwrap());
        let layers = LayerSolver::default()
            .build_layers(&cyl, PALLET, 0.0, &cs(1000.0), false)
            .unwrap();
        assert!(!layers.is_empty());
        assert!(layers.iter().all(|l| l.descriptor().axis_ortho == HalfAxis::ZP));
        assert!(layers[0].count() >= 127);
    }
}
