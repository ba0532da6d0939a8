use itertools::Itertools;
use log::error;

use crate::entities::layer::{CylLayer, Layer2D};
use crate::entities::{HAnalysis, HSolItem, Solution, SolutionLayer};
use crate::geometry::primitives::{BBox3D, Vector2, Vector3};
use crate::util::fpa;
//Various checks to verify correctness of generated layers and solutions
//Used in debug_assert!() blocks

/// All footprints lie within the container and no two of them overlap
pub fn layer_is_feasible(layer: &impl Layer2D, container: Vector2) -> bool {
    let tol = layer.tolerance();
    let footprints = layer.footprints();
    if let Some(fp) = footprints.iter().find(|fp| !fp.fits_in(container.x, container.y, tol)) {
        error!("footprint {fp:?} exceeds the container {container:?}");
        return false;
    }
    match footprints.iter().tuple_combinations().find(|(a, b)| a.overlaps(b, tol)) {
        Some((a, b)) => {
            error!("footprints {a:?} and {b:?} overlap");
            false
        }
        None => true,
    }
}

/// No two discs of radius `r` centred at `centres` overlap
pub fn discs_do_not_overlap(centres: &[Vector2], r: f64, tol: f64) -> bool {
    centres.iter().tuple_combinations().all(|(a, b)| {
        let d = *a - *b;
        (d.x * d.x + d.y * d.y).sqrt() >= 2.0 * r - tol
    })
}

pub fn cyl_layer_is_feasible(layer: &CylLayer, container: Vector2) -> bool {
    let tol = layer.tolerance();
    layer
        .footprints()
        .iter()
        .all(|fp| fp.fits_in(container.x, container.y, tol))
        && discs_do_not_overlap(&layer.centres(), layer.frame().radius, tol)
}

/// Layers are stacked bottom to top without interpenetrating and the stack respects its limits
pub fn solution_is_feasible(sol: &Solution) -> bool {
    let tol = 1e-3;
    let thickness = |l: &SolutionLayer| match l {
        SolutionLayer::Items { layer_type, .. } => sol.layer_types[*layer_type].layer_height(),
        SolutionLayer::Interlayer { .. } => sol.analysis.interlayer.as_ref().map_or(0.0, |il| il.thickness),
    };
    let z = |l: &SolutionLayer| match l {
        SolutionLayer::Items { z, .. } | SolutionLayer::Interlayer { z } => *z,
    };
    let stacked = sol
        .layers
        .iter()
        .tuple_windows()
        .all(|(a, b)| fpa::approx_le(z(a) + thickness(a), z(b), tol));
    let cs = &sol.analysis.constraint_set;
    let within_height = sol.analysis.max_height().is_none_or(|h| fpa::approx_le(sol.height(), h, tol));
    let within_weight = cs.max_weight.is_none_or(|w| fpa::approx_le(sol.total_weight(), w, tol));
    let within_count = cs.max_count.is_none_or(|n| sol.item_count() <= n);
    if !(stacked && within_height && within_weight && within_count) {
        error!(
            "infeasible solution: stacked {stacked}, height {within_height}, weight {within_weight}, count {within_count}"
        );
        return false;
    }
    true
}

/// Items of a container lie within its loading volume and do not overlap
pub fn hsol_item_is_feasible(item: &HSolItem, analysis: &HAnalysis, tol: f64) -> bool {
    let offset = analysis.offset();
    let space = BBox3D::new(offset, offset + analysis.container_dimensions());
    let bboxes = item.bboxes(analysis).collect_vec();
    let inside = bboxes.iter().all(|b| space.contains(b, tol));
    let disjoint = bboxes.iter().tuple_combinations().all(|(a, b)| !a.overlaps(b, tol));
    if !(inside && disjoint) {
        error!("infeasible container load: inside {inside}, disjoint {disjoint}");
    }
    inside && disjoint
}

/// Cuboids of dimensions `dims` at `positions` are disjoint and lie in `[0, container]`
pub fn cuboids_are_packed(positions: &[Vector3], dims: &[Vector3], container: Vector3, tol: f64) -> bool {
    let space = BBox3D::new(Vector3::ZERO, container);
    let bboxes = positions
        .iter()
        .zip(dims)
        .map(|(p, d)| BBox3D::new(*p, *p + *d))
        .collect_vec();
    bboxes.iter().all(|b| space.contains(b, tol))
        && bboxes.iter().tuple_combinations().all(|(a, b)| !a.overlaps(b, tol))
}
