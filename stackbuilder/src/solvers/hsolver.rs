use std::time::Instant;

use anyhow::{Result, ensure};
use itertools::Itertools;
use log::{error, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::entities::{HAnalysis, HSolElement, HSolItem, HSolution};
use crate::geometry::Transform3D;
use crate::geometry::primitives::Vector3;
use crate::solvers::bin_packing::{BinPacker, Cuboid, PlacedCuboid, WallBuilder};
use crate::util::{HSolverConfig, SolverConfig, assertions};

/// Builds solutions of heterogeneous (mixed box) loads.
/// Runs an extreme point bin packer and a wall building packer in up to five container orientations.
/// Placed items are tagged with the index of their content item, so a solver can be reused across analyses.
pub struct HSolver {
    config: HSolverConfig,
    tolerance: f64,
}

impl HSolver {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            config: config.hsolver.clone(),
            tolerance: config.unit_system.length_tolerance(),
        }
    }

    pub fn build_solutions(&self, analysis: &HAnalysis) -> Result<Vec<HSolution>> {
        ensure!(
            self.config.wall_variants.iter().all(|v| (1..=5).contains(v)),
            "wall variants must lie within 1..=5: {:?}",
            self.config.wall_variants
        );
        let start = Instant::now();

        let mut solutions = vec![];
        if self.config.bin_packing {
            solutions.push(self.run_bin_packing(analysis)?);
        }

        let variants = self.config.wall_variants.clone();
        #[cfg(feature = "parallel")]
        let wall_solutions = variants
            .par_iter()
            .map(|v| self.run_wall_builder(*v, analysis))
            .collect::<Vec<HSolution>>();
        #[cfg(not(feature = "parallel"))]
        let wall_solutions = variants
            .iter()
            .map(|v| self.run_wall_builder(*v, analysis))
            .collect::<Vec<HSolution>>();
        solutions.extend(wall_solutions);

        for sol in &solutions {
            debug_assert!(
                sol.sol_items
                    .iter()
                    .all(|item| assertions::hsol_item_is_feasible(item, analysis, 1e-3))
            );
            info!(
                "[HS] {}: {} item(s) in {} container(s)",
                sol.algorithm,
                sol.item_count(),
                sol.container_count()
            );
        }
        info!(
            "[HS] {} solution(s) built in {:.3}ms",
            solutions.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(solutions)
    }

    fn run_bin_packing(&self, analysis: &HAnalysis) -> Result<HSolution> {
        let dims = analysis.container_dimensions();
        let identity = Transform3D::identity();
        let cuboids = analysis
            .content
            .iter()
            .enumerate()
            .filter(|(_, ci)| ci.allowed_orientations.any())
            .flat_map(|(index, ci)| {
                let cuboid = Cuboid::new(
                    index,
                    ci.pack.dimensions(),
                    ci.allowed_orientations,
                    &identity,
                    ci.priority,
                );
                std::iter::repeat_n(cuboid, ci.number)
            })
            .collect_vec();

        let result = BinPacker::new(&self.config, self.tolerance).pack(dims, &cuboids)?;

        let to_real = Transform3D::from_translation(analysis.offset());
        let mut sol = HSolution::new("Extreme point bin packing");
        for bin in &result.bins {
            sol.sol_items.push(to_sol_item(bin, &to_real));
        }
        Ok(sol)
    }

    /// Packs all content with the wall builder in the frame of `variant`, opening new containers for leftovers
    fn run_wall_builder(&self, variant: u8, analysis: &HAnalysis) -> HSolution {
        let dims = analysis.container_dimensions();
        let to_real = variant_transform(variant, dims).translate(analysis.offset());
        let packer_dims = to_real.unrotated_dimensions(dims);
        let builder = WallBuilder::new(packer_dims, self.tolerance);

        let mut remaining = analysis
            .content
            .iter()
            .enumerate()
            .filter(|(_, ci)| ci.allowed_orientations.any())
            .flat_map(|(index, ci)| {
                let cuboid = Cuboid::new(
                    index,
                    ci.pack.dimensions(),
                    ci.allowed_orientations,
                    &to_real,
                    ci.priority,
                );
                std::iter::repeat_n(cuboid, ci.number)
            })
            .collect_vec();

        let mut sol = HSolution::new(format!("Wall building - variant {variant}"));
        while !remaining.is_empty() {
            let result = builder.pack(remaining);
            if result.placed.is_empty() {
                warn!(
                    "[HS] variant {variant}: {} item(s) do not fit in the container",
                    result.unpacked.len()
                );
                break;
            }
            sol.sol_items.push(to_sol_item(&result.placed, &to_real));
            remaining = result.unpacked;
        }
        sol
    }
}

/// Maps the packer frame of a wall building variant onto the container frame (Z up).
/// `dims` are the container dimensions in the container frame.
pub fn variant_transform(variant: u8, dims: Vector3) -> Transform3D {
    match variant {
        1 => Transform3D::from_rotation(0, 1).translate(Vector3::new(0.0, dims.y, 0.0)),
        2 => Transform3D::from_rotation(2, 1).translate(Vector3::new(dims.x, 0.0, 0.0)),
        4 => Transform3D::from_rotation(1, -1).translate(Vector3::new(dims.x, 0.0, 0.0)),
        5 => Transform3D::from_rotation(0, 1).rotate(2, 1),
        _ => Transform3D::identity(),
    }
}

fn to_sol_item(placed: &[PlacedCuboid], to_real: &Transform3D) -> HSolItem {
    let contained = placed
        .iter()
        .filter_map(|p| match p.to_box_position(to_real) {
            Ok(position) => Some(HSolElement {
                content_type: p.tag,
                position,
            }),
            Err(e) => {
                error!("[HS] could not convert placement {p:?}: {e:#}");
                None
            }
        })
        .collect();
    HSolItem { contained }
}
