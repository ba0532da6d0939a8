#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use itertools::Itertools;
    use test_case::test_case;

    use stackbuilder::entities::layer::{Layer, Layer2D};
    use stackbuilder::entities::{
        AllowedOrientations, BoxProperties, ConstraintSet, ContainerProperties, ContentItem, CylinderProperties,
        HAnalysis, HomoAnalysis, InterlayerProperties, LimitReached, Packable,
    };
    use stackbuilder::geometry::HalfAxis;
    use stackbuilder::geometry::primitives::Vector2;
    use stackbuilder::patterns::{BoxAligned, BoxSymmetricInterlocked, PatternRegistry};
    use stackbuilder::solvers::{HSolver, LayerSolver};
    use stackbuilder::util::{HSolverConfig, SolverConfig, assertions};

    fn pallet() -> ContainerProperties {
        ContainerProperties::pallet("EUR2", 1200.0, 1000.0, 150.0, 25.0).unwrap()
    }

    fn case(l: f64, w: f64, h: f64) -> Packable {
        Packable::Box(BoxProperties::new("case", l, w, h, 6.0).unwrap())
    }

    fn layers(analysis: &HomoAnalysis, keep_only_best: bool) -> Vec<Layer> {
        LayerSolver::default()
            .build_layers(
                &analysis.packable,
                analysis.container_dimensions(),
                analysis.offset().z,
                &analysis.effective_constraints(),
                keep_only_best,
            )
            .unwrap()
    }

    #[test_case(400.0, 300.0, 200.0, 0.0, 0.0; "eur case")]
    #[test_case(600.0, 400.0, 250.0, 0.0, 0.0; "half pallet case")]
    #[test_case(330.0, 215.0, 170.0, 25.0, 0.0; "overhang")]
    #[test_case(275.0, 183.0, 96.0, 0.0, 5.0; "forced space")]
    #[test_case(520.0, 180.0, 300.0, -20.0, 3.0; "underhang and space")]
    fn layers_fit_and_do_not_overlap(l: f64, w: f64, h: f64, overhang: f64, min_space: f64) {
        let analysis = HomoAnalysis::new(
            case(l, w, h),
            pallet(),
            None,
            ConstraintSet {
                overhang: Vector2::new(overhang, overhang),
                min_space,
                ..ConstraintSet::default()
            },
        )
        .unwrap();
        let container = analysis.container_dimensions();
        let layers = layers(&analysis, false);
        assert!(!layers.is_empty());
        for layer in &layers {
            assert!(
                assertions::layer_is_feasible(layer, container),
                "{}",
                layer.descriptor()
            );
            assert!(layer.max_space() >= -layer.tolerance(), "{}", layer.descriptor());
        }
    }

    #[test_case(150.0; "narrow drums")]
    #[test_case(230.0; "wide drums")]
    fn cylinder_layers_fit_and_do_not_overlap(radius: f64) {
        let analysis = HomoAnalysis::new(
            Packable::Cylinder(CylinderProperties::new("drum", radius, 400.0, 30.0).unwrap()),
            pallet(),
            None,
            ConstraintSet::default(),
        )
        .unwrap();
        let container = analysis.container_dimensions();
        for layer in layers(&analysis, false) {
            match &layer {
                Layer::Cyl(l) => assert!(assertions::cyl_layer_is_feasible(l, container)),
                Layer::Brick(_) => panic!("box layer for a cylinder"),
            }
        }
    }

    #[test_case(400.0, 300.0, 200.0; "eur case")]
    #[test_case(355.0, 245.0, 310.0; "odd case")]
    #[test_case(800.0, 150.0, 150.0; "long case")]
    fn keep_only_best_keeps_every_best_layer(l: f64, w: f64, h: f64) {
        let analysis = HomoAnalysis::new(case(l, w, h), pallet(), None, ConstraintSet::default()).unwrap();
        let height = analysis.stacking_height().unwrap();
        let all = layers(&analysis, false);
        let best = layers(&analysis, true);
        let best_count = all.iter().map(|l| l.count_in_height(height)).max().unwrap();

        assert!(best.iter().all(|l| l.count_in_height(height) == best_count));
        let n_best = all.iter().filter(|l| l.count_in_height(height) == best_count).count();
        assert_eq!(best.len(), n_best);
        // sorted by descending count
        assert!(
            all.iter()
                .tuple_windows()
                .all(|(a, b)| a.count_in_height(height) >= b.count_in_height(height))
        );
    }

    #[test]
    fn layer_building_is_deterministic() {
        let analysis = HomoAnalysis::new(case(365.0, 265.0, 180.0), pallet(), None, ConstraintSet::default()).unwrap();
        let first = layers(&analysis, false);
        let second = layers(&analysis, false);
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|l| l.descriptor()).collect_vec(),
            second.iter().map(|l| l.descriptor()).collect_vec()
        );
    }

    #[test_case(Some(1500.0), None; "height")]
    #[test_case(Some(2000.0), Some(400.0); "height and weight")]
    #[test_case(Some(1234.5), Some(180.0); "tight weight")]
    fn stacks_respect_height_and_weight(max_height: Option<f64>, max_weight: Option<f64>) {
        let analysis = HomoAnalysis::new(
            case(400.0, 300.0, 220.0),
            pallet(),
            Some(InterlayerProperties {
                name: "sheet".to_string(),
                length: 1200.0,
                width: 1000.0,
                thickness: 4.0,
                weight: 0.5,
            }),
            ConstraintSet {
                max_height,
                max_weight,
                interlayer_period: 2,
                has_first_interlayer: true,
                layer_swap_period: 1,
                ..ConstraintSet::default()
            },
        )
        .unwrap();
        let solutions = analysis.solve(&LayerSolver::default()).unwrap();
        assert!(!solutions.is_empty());
        for sol in &solutions {
            if let Some(h) = max_height {
                assert!(sol.height() <= h + 1e-6, "{} > {h}", sol.height());
            }
            if let Some(w) = max_weight {
                assert!(sol.total_weight() <= w + 1e-6, "{} > {w}", sol.total_weight());
            }
            assert!(assertions::solution_is_feasible(sol));
        }
    }

    #[test]
    fn simple_grid_of_nine() {
        let analysis = HomoAnalysis::new(
            case(400.0, 300.0, 200.0),
            pallet(),
            None,
            ConstraintSet {
                allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
                ..ConstraintSet::default()
            },
        )
        .unwrap();
        let solver = LayerSolver::new(PatternRegistry::empty().with_box_pattern(BoxAligned), SolverConfig::default());
        let layers = solver
            .build_layers(
                &analysis.packable,
                analysis.container_dimensions(),
                analysis.offset().z,
                &analysis.effective_constraints(),
                false,
            )
            .unwrap();
        let layer = layers
            .iter()
            .find(|l| l.descriptor().to_string() == "Aligned|ZP|0|0")
            .unwrap();
        assert_eq!(layer.count(), 9);

        let footprints = layer.footprints();
        let xs = footprints.iter().map(|f| f.x_min).sorted_by(f64::total_cmp).dedup().collect_vec();
        let ys = footprints.iter().map(|f| f.y_min).sorted_by(f64::total_cmp).dedup().collect_vec();
        // 1200 is filled exactly, the 100 left along the width is split evenly on both sides
        for (x, expected) in xs.iter().zip([0.0, 400.0, 800.0]) {
            assert!(approx_eq!(f64, *x, expected, epsilon = 1e-9));
        }
        for (y, expected) in ys.iter().zip([50.0, 350.0, 650.0]) {
            assert!(approx_eq!(f64, *y, expected, epsilon = 1e-9));
        }
        assert_eq!((xs.len(), ys.len()), (3, 3));
        assert!(approx_eq!(f64, layer.max_space(), 0.0, epsilon = 1e-9));
    }

    #[test_case(400.0, 250.0; "fits ten")]
    #[test_case(300.0, 200.0; "small case")]
    #[test_case(450.0, 280.0; "long case")]
    fn symmetric_interlocked_columns_come_in_pairs(l: f64, w: f64) {
        let analysis = HomoAnalysis::new(
            case(l, w, 200.0),
            pallet(),
            None,
            ConstraintSet {
                allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
                ..ConstraintSet::default()
            },
        )
        .unwrap();
        let solver = LayerSolver::new(
            PatternRegistry::empty().with_box_pattern(BoxSymmetricInterlocked),
            SolverConfig::default(),
        );
        let layers = solver
            .build_layers(
                &analysis.packable,
                analysis.container_dimensions(),
                analysis.offset().z,
                &analysis.effective_constraints(),
                false,
            )
            .unwrap();
        assert!(!layers.is_empty());
        for layer in &layers {
            let Layer::Brick(brick) = layer else {
                panic!("cylinder layer for a box");
            };
            let along_length = |a: HalfAxis| match brick.frame().swapped {
                false => a.direction() == 0,
                true => a.direction() == 1,
            };
            let aligned = brick.positions().iter().filter(|p| along_length(p.length_axis)).count();
            // mirrored pairs of length-aligned columns
            assert_eq!(aligned % 2, 0, "{}", layer.descriptor());
        }
    }

    #[test]
    fn symmetric_interlocked_rejects_a_single_aligned_block() {
        // a single pair of 600 long columns fills the 1200 length, leaving no room for turned columns,
        // and no pair fits along the 1000 width
        let analysis = HomoAnalysis::new(
            case(600.0, 400.0, 200.0),
            pallet(),
            None,
            ConstraintSet {
                allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
                ..ConstraintSet::default()
            },
        )
        .unwrap();
        let solver = LayerSolver::new(
            PatternRegistry::empty().with_box_pattern(BoxSymmetricInterlocked),
            SolverConfig::default(),
        );
        let layers = solver
            .build_layers(
                &analysis.packable,
                analysis.container_dimensions(),
                analysis.offset().z,
                &analysis.effective_constraints(),
                false,
            )
            .unwrap();
        assert!(layers.is_empty());
    }

    #[test]
    fn oversized_item_yields_no_layer() {
        let analysis = HomoAnalysis::new(case(1500.0, 1300.0, 1100.0), pallet(), None, ConstraintSet::default()).unwrap();
        assert!(layers(&analysis, false).is_empty());
        assert!(analysis.solve(&LayerSolver::default()).unwrap().is_empty());
    }

    #[test]
    fn heterogeneous_passes_terminate() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .try_init();

        let analysis = HAnalysis::new(
            ContainerProperties::pallet("EUR", 1200.0, 800.0, 150.0, 25.0).unwrap(),
            Some(1000.0),
            vec![
                // a single one fits per container
                ContentItem {
                    pack: BoxProperties::new("block", 1200.0, 800.0, 500.0, 40.0).unwrap(),
                    number: 4,
                    allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
                    priority: 0,
                },
                ContentItem {
                    pack: BoxProperties::new("too large", 1300.0, 900.0, 100.0, 5.0).unwrap(),
                    number: 2,
                    allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
                    priority: 0,
                },
            ],
        )
        .unwrap();
        let config = SolverConfig {
            hsolver: HSolverConfig::default(),
            ..SolverConfig::default()
        };
        let solutions = HSolver::new(&config).build_solutions(&analysis).unwrap();
        assert_eq!(solutions.len(), 6);
        for sol in &solutions {
            assert_eq!(sol.container_count(), 4, "{}", sol.algorithm);
            assert!(sol.sol_items.iter().all(|i| i.item_count() == 1));
            assert_eq!(sol.unpacked(&analysis), [0, 2]);
        }
    }

    fn lying_drums(cs: ConstraintSet) -> HomoAnalysis {
        HomoAnalysis::new(
            Packable::Cylinder(CylinderProperties::new("drum", 100.0, 400.0, 30.0).unwrap()),
            pallet(),
            None,
            cs,
        )
        .unwrap()
    }

    #[test]
    fn lying_cylinders_stop_below_max_height() {
        let analysis = lying_drums(ConstraintSet {
            max_height: Some(1000.0),
            ..ConstraintSet::default()
        });
        let loads = analysis.solve_lying_cylinders(&LayerSolver::default()).unwrap();
        // 850 above the pallet holds 4 tiers: 3 x (5+4+3+2) along the length, 2 x (6+5+4+3) along the width
        let summary = loads
            .iter()
            .map(|l| (l.count(), l.swapped, l.limit_reached))
            .collect_vec();
        assert_eq!(
            summary,
            [(42, false, LimitReached::MaxHeight), (36, true, LimitReached::MaxHeight)]
        );
        for load in &loads {
            for b in load.bboxes() {
                assert!(b.min.z >= 150.0 - 1e-6 && b.max.z <= 1000.0 + 1e-6, "{b:?}");
                assert!(b.footprint().fits_in(1200.0, 1000.0, 1e-6), "{b:?}");
            }
        }
    }

    #[test]
    fn lying_cylinders_bounded_by_weight() {
        let analysis = lying_drums(ConstraintSet {
            max_weight: Some(1000.0),
            ..ConstraintSet::default()
        });
        let loads = analysis.solve_lying_cylinders(&LayerSolver::default()).unwrap();
        // (1000 - 25) / 30 drums
        assert_eq!(loads.len(), 2);
        assert!(loads.iter().all(|l| l.count() == 32 && l.limit_reached == LimitReached::MaxCount));
    }

    #[test]
    fn lying_cylinders_need_a_horizontal_axis() {
        let upright = lying_drums(ConstraintSet {
            allowed_orientations: AllowedOrientations::UPRIGHT_ONLY,
            ..ConstraintSet::default()
        });
        assert!(upright.solve_lying_cylinders(&LayerSolver::default()).unwrap().is_empty());

        let boxes = HomoAnalysis::new(case(400.0, 300.0, 200.0), pallet(), None, ConstraintSet::default()).unwrap();
        assert!(boxes.solve_lying_cylinders(&LayerSolver::default()).is_err());
    }
}
