use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use log::{debug, info};

use crate::entities::layer::{Layer, Layer2D, LayerDesc};
use crate::entities::{HomoAnalysis, Solution, SolutionLayer};
use crate::geometry::primitives::Vector3;
use crate::solvers::LayerSolver;
use crate::util::{assertions, fpa};

/// Stacks 2D layers (and interlayers) into solutions of a homogeneous analysis
pub struct StackComposer<'a> {
    solver: &'a LayerSolver,
}

impl<'a> StackComposer<'a> {
    pub fn new(solver: &'a LayerSolver) -> Self {
        Self { solver }
    }

    /// Stacks layers cycling through `descs`, all built on a common footprint, until a limit of the
    /// constraint set would be exceeded.
    pub fn compose(&self, analysis: &HomoAnalysis, descs: &[LayerDesc]) -> Result<Solution> {
        ensure!(!descs.is_empty(), "at least one layer descriptor is required");
        let container_dim = analysis.container_dimensions();
        let min_space = analysis.constraint_set.min_space;
        let footprint = self
            .solver
            .layer_dimensions(descs, &analysis.packable, container_dim, min_space)?
            .with_context(|| format!("layers {} cannot be built", descs.iter().join(", ")))?;

        let layer_types = descs
            .iter()
            .map(|desc| {
                self.solver
                    .build_layer_with_dimensions(&analysis.packable, container_dim, desc, footprint, min_space)?
                    .with_context(|| format!("layer {desc} cannot be built"))
            })
            .collect::<Result<Vec<Layer>>>()?;

        let n_types = layer_types.len();
        self.stack(analysis, layer_types, (0..n_types).cycle())
    }

    /// Stacks each layer type its number of times, in order, until a limit of the constraint set would be exceeded
    pub fn compose_combination(&self, analysis: &HomoAnalysis, combination: &[(LayerDesc, usize)]) -> Result<Solution> {
        ensure!(!combination.is_empty(), "at least one layer descriptor is required");
        let container_dim = analysis.container_dimensions();
        let min_space = analysis.constraint_set.min_space;
        let layer_types = combination
            .iter()
            .map(|(desc, _)| {
                self.solver
                    .build_layer(&analysis.packable, container_dim, desc, min_space)?
                    .with_context(|| format!("layer {desc} cannot be built"))
            })
            .collect::<Result<Vec<Layer>>>()?;

        let sequence = combination
            .iter()
            .enumerate()
            .flat_map(|(i, (_, n))| std::iter::repeat_n(i, *n))
            .collect_vec();
        self.stack(analysis, layer_types, sequence.into_iter())
    }

    /// One solution per layer retained by the layer solver, most items first
    pub fn solve(&self, analysis: &HomoAnalysis, keep_only_best: bool) -> Result<Vec<Solution>> {
        let layers = self.solver.build_layers(
            &analysis.packable,
            analysis.container_dimensions(),
            analysis.offset().z,
            &analysis.effective_constraints(),
            keep_only_best,
        )?;
        let solutions = layers
            .iter()
            .map(|layer| self.compose(analysis, &[layer.descriptor()]))
            .collect::<Result<Vec<Solution>>>()?;
        Ok(solutions
            .into_iter()
            .sorted_by_key(|s| std::cmp::Reverse(s.item_count()))
            .collect())
    }

    /// Solution stacking the best combination of at most two layer types (boxes only)
    pub fn solve_best_combination(&self, analysis: &HomoAnalysis) -> Result<Option<Solution>> {
        let crate::entities::Packable::Box(bp) = &analysis.packable else {
            bail!("layer combinations are only available for boxes");
        };
        let Some(stacking_height) = analysis.stacking_height() else {
            bail!("layer combinations require a maximum height");
        };
        let dims = analysis.container_dimensions();
        let combination = self.solver.best_combination(
            bp,
            Vector3::new(dims.x, dims.y, stacking_height),
            &analysis.effective_constraints(),
        )?;
        match combination.is_empty() {
            true => Ok(None),
            false => self.compose_combination(analysis, &combination).map(Some),
        }
    }

    fn stack(
        &self,
        analysis: &HomoAnalysis,
        layer_types: Vec<Layer>,
        sequence: impl Iterator<Item = usize>,
    ) -> Result<Solution> {
        let cs = &analysis.constraint_set;
        cs.validate()?;
        let max_height = analysis.max_height();
        let item_weight = analysis.packable.weight();
        ensure!(
            max_height.is_some() || cs.max_count.is_some() || (cs.max_weight.is_some() && item_weight > 0.0),
            "the stack has no reachable limit: set a maximum height, a maximum count or a maximum weight with weighted items"
        );
        if let Some(layer) = layer_types.iter().find(|l| l.count() == 0) {
            bail!("layer {} holds no items", layer.descriptor());
        }

        let tol = self.solver.tolerance();
        let interlayer = analysis.interlayer.as_ref();
        let mut layers = vec![];
        let mut z = analysis.container.load_base_z();
        let mut weight = analysis.container.weight;
        let mut count = 0;
        let mut i_count_interlayer = 0;

        for (no_layer, layer_type) in sequence.enumerate() {
            let layer = &layer_types[layer_type];
            let with_interlayer =
                interlayer.is_some() && i_count_interlayer == 0 && (no_layer != 0 || cs.has_first_interlayer);
            let (il_thickness, il_weight) = match (with_interlayer, interlayer) {
                (true, Some(il)) => (il.thickness, il.weight),
                _ => (0.0, 0.0),
            };
            let layer_z = z + il_thickness;
            let top = layer_z + layer.layer_height();
            let next_weight = weight + il_weight + layer.count() as f64 * item_weight;

            if max_height.is_some_and(|h| fpa::exceeds(top, h, tol)) {
                debug!("[SC] stopped at layer {no_layer}: maximum height reached");
                break;
            }
            if cs.max_weight.is_some_and(|w| fpa::exceeds(next_weight, w, tol)) {
                debug!("[SC] stopped at layer {no_layer}: maximum weight reached");
                break;
            }
            if cs.max_count.is_some_and(|n| count + layer.count() > n) {
                debug!("[SC] stopped at layer {no_layer}: maximum count reached");
                break;
            }

            if with_interlayer {
                layers.push(SolutionLayer::Interlayer { z });
            }
            layers.push(SolutionLayer::Items {
                layer_type,
                z: layer_z,
                rotated: (no_layer / cs.layer_swap_period) % 2 == 1,
            });
            z = top;
            weight = next_weight;
            count += layer.count();
            i_count_interlayer = (no_layer + 1) % cs.interlayer_period;
        }

        let solution = Solution {
            analysis: analysis.clone(),
            layer_types,
            layers,
        };
        debug_assert!(assertions::solution_is_feasible(&solution));
        info!(
            "[SC] {}: {} ({:.1}% volume)",
            analysis.packable.name(),
            solution.pallet_map_phrase(),
            solution.volume_efficiency()
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        BoxProperties, ConstraintSet, ContainerProperties, InterlayerProperties, LayerPlacements, Packable,
    };
    use crate::geometry::primitives::BBox3D;
    use crate::patterns::{BoxAligned, PatternRegistry};
    use crate::util::SolverConfig;
    use crate::util::fpa::approx_eq;

    fn analysis(cs: ConstraintSet, interlayer: Option<InterlayerProperties>) -> HomoAnalysis {
        HomoAnalysis::new(
            Packable::Box(BoxProperties::new("case", 400.0, 300.0, 250.0, 5.0).unwrap()),
            ContainerProperties::pallet("EUR2", 1200.0, 1000.0, 150.0, 25.0).unwrap(),
            interlayer,
            cs,
        )
        .unwrap()
    }

    fn height_limited(max_height: f64) -> ConstraintSet {
        ConstraintSet {
            max_height: Some(max_height),
            ..ConstraintSet::default()
        }
    }

    fn aligned(swapped: bool) -> LayerDesc {
        LayerDesc::new("Aligned", crate::geometry::HalfAxis::ZP, swapped, false)
    }

    fn item_zs(sol: &Solution) -> Vec<f64> {
        sol.layers
            .iter()
            .filter_map(|l| match l {
                SolutionLayer::Items { z, .. } => Some(*z),
                SolutionLayer::Interlayer { .. } => None,
            })
            .collect()
    }

    #[test]
    fn stack_up_to_max_height() {
        let solver = LayerSolver::default();
        let sol = StackComposer::new(&solver)
            .compose(&analysis(height_limited(1150.0), None), &[aligned(false)])
            .unwrap();
        assert_eq!(sol.item_count(), 36);
        assert_eq!(item_zs(&sol), [150.0, 400.0, 650.0, 900.0]);
        assert_eq!(sol.pallet_map_phrase(), "36 = 4 x 9");
        assert!(approx_eq(sol.height(), 1150.0, 1e-9));
        assert!(approx_eq(sol.total_weight(), 205.0, 1e-9));
        assert!(approx_eq(sol.volume_efficiency(), 90.0, 1e-9));
        assert!(sol.weight_efficiency().is_none());
        assert!(assertions::solution_is_feasible(&sol));
    }

    #[test]
    fn interlayers_follow_their_period() {
        let interlayer = InterlayerProperties {
            name: "sheet".into(),
            length: 1200.0,
            width: 1000.0,
            thickness: 5.0,
            weight: 1.0,
        };
        let cs = ConstraintSet {
            interlayer_period: 2,
            has_first_interlayer: true,
            ..height_limited(1150.0)
        };
        let solver = LayerSolver::default();
        let sol = StackComposer::new(&solver)
            .compose(&analysis(cs, Some(interlayer)), &[aligned(false)])
            .unwrap();
        assert_eq!(sol.layers.len(), 5);
        assert_eq!(sol.layers[0], SolutionLayer::Interlayer { z: 150.0 });
        assert_eq!(sol.layers[3], SolutionLayer::Interlayer { z: 655.0 });
        assert_eq!(item_zs(&sol), [155.0, 405.0, 660.0]);
        assert!(matches!(sol.layers[1], SolutionLayer::Items { rotated: false, .. }));
        assert!(matches!(sol.layers[2], SolutionLayer::Items { rotated: true, .. }));
        assert_eq!(sol.interlayer_count(), 2);
        assert_eq!(sol.pallet_map_phrase(), "27 = 3 x 9 (2 interlayers)");
        assert!(approx_eq(sol.total_weight(), 25.0 + 135.0 + 2.0, 1e-9));
    }

    #[test]
    fn stack_stops_at_max_weight() {
        let cs = ConstraintSet {
            max_weight: Some(150.0),
            ..height_limited(1700.0)
        };
        let solver = LayerSolver::default();
        let sol = StackComposer::new(&solver)
            .compose(&analysis(cs, None), &[aligned(false)])
            .unwrap();
        assert_eq!(sol.item_count(), 18);
        assert!(approx_eq(sol.weight_efficiency().unwrap(), 72.0, 1e-9));
    }

    #[test]
    fn stack_stops_at_max_count_with_whole_layers() {
        let cs = ConstraintSet {
            max_count: Some(30),
            ..height_limited(1700.0)
        };
        let solver = LayerSolver::default();
        let sol = StackComposer::new(&solver)
            .compose(&analysis(cs, None), &[aligned(false)])
            .unwrap();
        assert_eq!(sol.item_count(), 27);
    }

    #[test]
    fn layers_rotate_every_swap_period() {
        let cs = ConstraintSet {
            layer_swap_period: 2,
            ..height_limited(1150.0)
        };
        let solver = LayerSolver::default();
        let sol = StackComposer::new(&solver)
            .compose(&analysis(cs, None), &[aligned(false)])
            .unwrap();
        let flags = sol
            .layers
            .iter()
            .map(|l| matches!(l, SolutionLayer::Items { rotated: true, .. }))
            .collect_vec();
        assert_eq!(flags, [false, false, true, true]);

        let container = BBox3D::new(Vector3::ZERO, Vector3::new(1200.0, 1000.0, 1150.0));
        for placements in sol.placements().unwrap() {
            let LayerPlacements::Boxes(boxes) = placements else {
                panic!("box layer expected");
            };
            assert_eq!(boxes.len(), 9);
            for b in boxes {
                assert!(container.contains(&b.bbox(Vector3::new(400.0, 300.0, 250.0)), 1e-6));
            }
        }
    }

    #[test]
    fn alternating_layer_types() {
        let solver = LayerSolver::default();
        let sol = StackComposer::new(&solver)
            .compose(&analysis(height_limited(1150.0), None), &[aligned(false), aligned(true)])
            .unwrap();
        assert_eq!(sol.pallet_map_phrase(), "34 = 2 x 9 + 2 x 8");
        assert!(assertions::solution_is_feasible(&sol));
    }

    #[test]
    fn unreachable_limit_is_rejected() {
        let analysis = HomoAnalysis::new(
            Packable::Box(BoxProperties::new("feather", 400.0, 300.0, 250.0, 0.0).unwrap()),
            ContainerProperties::pallet("EUR2", 1200.0, 1000.0, 150.0, 25.0).unwrap(),
            None,
            ConstraintSet {
                max_height: None,
                max_weight: Some(500.0),
                ..ConstraintSet::default()
            },
        )
        .unwrap();
        let solver = LayerSolver::default();
        assert!(StackComposer::new(&solver).compose(&analysis, &[aligned(false)]).is_err());
    }

    #[test]
    fn best_combination_solution() {
        let solver = LayerSolver::new(
            PatternRegistry::empty().with_box_pattern(BoxAligned),
            SolverConfig::default(),
        );
        let sol = analysis(height_limited(1150.0), None)
            .solve_best_combination(&solver)
            .unwrap()
            .unwrap();
        assert_eq!(sol.pallet_map_phrase(), "40 = 1 x 16 + 2 x 12");
        assert_eq!(item_zs(&sol), [150.0, 550.0, 850.0]);
        assert!(assertions::solution_is_feasible(&sol));
    }

    #[test]
    fn solutions_sorted_by_item_count() {
        let solver = LayerSolver::default();
        let solutions = analysis(height_limited(1150.0), None).solve(&solver).unwrap();
        assert!(!solutions.is_empty());
        assert!(solutions[0].item_count() >= 36);
        assert!(
            solutions
                .windows(2)
                .all(|w| w[0].item_count() >= w[1].item_count())
        );
    }
}
