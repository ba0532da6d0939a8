use std::cmp::Reverse;

use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use log::{debug, error, info, warn};
use ordered_float::{NotNan, OrderedFloat};

use crate::geometry::primitives::{BBox3D, Vector3};
use crate::solvers::bin_packing::{Cuboid, PlacedCuboid, verify};
use crate::util::{HSolverConfig, ItemOrdering, VerifyOption};

/// A single bin filled with the extreme point heuristic:
/// cuboids are placed at the lowest (z, y, x) candidate point where they fit,
/// and every placement adds new candidate points at its far corners.
pub struct ExtremePointBin {
    container: Vector3,
    /// candidate positions, sorted by (z, y, x)
    points: Vec<Vector3>,
    placed: Vec<PlacedCuboid>,
    tolerance: f64,
}

impl ExtremePointBin {
    pub fn new(container: Vector3, tolerance: f64) -> Self {
        Self {
            container,
            points: vec![Vector3::ZERO],
            placed: vec![],
            tolerance,
        }
    }

    pub fn placed(&self) -> &[PlacedCuboid] {
        &self.placed
    }

    pub fn into_placed(self) -> Vec<PlacedCuboid> {
        self.placed
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn volume(&self) -> f64 {
        self.placed.iter().map(|p| p.dims.volume()).sum()
    }

    /// Places `cuboid` at the first candidate point where one of its orientations fits
    pub fn try_place(&mut self, cuboid: &Cuboid) -> bool {
        let tol = self.tolerance;
        let space = BBox3D::new(Vector3::ZERO, self.container);
        let found = self.points.iter().enumerate().find_map(|(i, p)| {
            cuboid.orientations.iter().find_map(|o| {
                let extents = cuboid.extents(*o);
                let bbox = BBox3D::new(*p, *p + extents);
                let free = space.contains(&bbox, tol) && self.placed.iter().all(|q| !q.bbox().overlaps(&bbox, tol));
                free.then_some((i, *o, extents))
            })
        });
        let Some((i, orientation, extents)) = found else {
            return false;
        };
        let placed = PlacedCuboid {
            tag: cuboid.tag,
            position: self.points.remove(i),
            extents,
            orientation,
            dims: cuboid.dims,
        };
        self.placed.push(placed);
        self.add_points(&placed);
        true
    }

    fn add_points(&mut self, placed: &PlacedCuboid) {
        let (min, max) = (placed.position, placed.position + placed.extents);
        let candidates = [
            Vector3::new(max.x, min.y, min.z),
            Vector3::new(min.x, max.y, min.z),
            Vector3::new(min.x, min.y, max.z),
        ];
        for c in candidates {
            // let the point fall onto whatever lies below it
            let p = Vector3::new(c.x, c.y, self.support_height(c));
            let duplicate = self.points.iter().any(|q| {
                let d = *q - p;
                d.dot(&d) < self.tolerance * self.tolerance
            });
            if self.is_valid_point(p) && !duplicate {
                self.points.push(p);
            }
        }
        self.points
            .sort_by_key(|p| (OrderedFloat(p.z), OrderedFloat(p.y), OrderedFloat(p.x)));
    }

    /// Highest top face at or below `p` covering its (x, y) position, 0 for the floor
    fn support_height(&self, p: Vector3) -> f64 {
        let tol = self.tolerance;
        self.placed
            .iter()
            .map(|q| q.bbox())
            .filter(|b| {
                b.min.x - tol <= p.x && p.x < b.max.x - tol && b.min.y - tol <= p.y && p.y < b.max.y - tol
            })
            .map(|b| b.max.z)
            .filter(|top| *top <= p.z + tol)
            .fold(0.0, f64::max)
    }

    fn is_valid_point(&self, p: Vector3) -> bool {
        let tol = self.tolerance;
        let inside_container = (0..3).all(|i| p[i] < self.container[i] - tol);
        let inside_item = self
            .placed
            .iter()
            .map(|q| q.bbox())
            .any(|b| (0..3).all(|i| b.min[i] - tol <= p[i] && p[i] < b.max[i] - tol));
        inside_container && !inside_item
    }
}

/// Result of packing cuboids into as many bins as needed
#[derive(Clone, Debug)]
pub struct PackResult {
    pub ordering: ItemOrdering,
    pub bins: Vec<Vec<PlacedCuboid>>,
    /// Tags of the cuboids that do not fit in an empty bin
    pub unplaced: Vec<usize>,
}

impl PackResult {
    pub fn placed_count(&self) -> usize {
        self.bins.iter().map(|b| b.len()).sum()
    }

    fn first_bin_volume(&self) -> f64 {
        self.bins
            .first()
            .map_or(0.0, |b| b.iter().map(|p| p.dims.volume()).sum())
    }
}

/// Multi-bin packer running the extreme point heuristic for several item orderings and keeping the best result:
/// most items placed, then fewest bins, then the fullest first bin.
pub struct BinPacker {
    orderings: Vec<ItemOrdering>,
    verify: VerifyOption,
    tolerance: f64,
}

impl BinPacker {
    pub fn new(config: &HSolverConfig, tolerance: f64) -> Self {
        Self {
            orderings: config.orderings.clone(),
            verify: config.verify,
            tolerance,
        }
    }

    pub fn pack(&self, container: Vector3, cuboids: &[Cuboid]) -> Result<PackResult> {
        ensure!(!self.orderings.is_empty(), "the bin packer needs at least one item ordering");
        ensure!(
            container.x > 0.0 && container.y > 0.0 && container.z > 0.0,
            "degenerate bin: {container:?}"
        );

        let mut results = vec![];
        for ordering in &self.orderings {
            let result = self.pack_ordered(container, cuboids, *ordering);
            debug!(
                "[BP] {:?}: {} cuboid(s) in {} bin(s)",
                ordering,
                result.placed_count(),
                result.bins.len()
            );
            if self.verify == VerifyOption::All && !self.verify_result(&result, container) {
                error!("[BP] {ordering:?} produced an invalid packing, discarded");
                continue;
            }
            results.push(result);
        }

        let Some(best) = results.into_iter().reduce(|best, r| match is_better(&r, &best) {
            true => r,
            false => best,
        }) else {
            bail!("no valid bin packing result");
        };
        if self.verify == VerifyOption::BestOnly && !self.verify_result(&best, container) {
            bail!("bin packing result for {:?} failed verification", best.ordering);
        }
        if !best.unplaced.is_empty() {
            warn!("[BP] {} cuboid(s) do not fit in an empty bin", best.unplaced.len());
        }
        info!(
            "[BP] best ordering {:?}: {} cuboid(s) in {} bin(s)",
            best.ordering,
            best.placed_count(),
            best.bins.len()
        );
        Ok(best)
    }

    fn pack_ordered(&self, container: Vector3, cuboids: &[Cuboid], ordering: ItemOrdering) -> PackResult {
        let key = |c: &Cuboid| {
            let value = match ordering {
                ItemOrdering::VolumeDesc => c.volume(),
                ItemOrdering::HeightDesc => c.dims.z,
                ItemOrdering::FootprintDesc => c.dims.x * c.dims.y,
            };
            (c.priority, Reverse(NotNan::new(value).expect("cuboid dimensions are finite")))
        };

        let mut bins: Vec<ExtremePointBin> = vec![];
        let mut unplaced = vec![];
        for cuboid in cuboids.iter().sorted_by_cached_key(|c| key(c)) {
            if bins.iter_mut().any(|b| b.try_place(cuboid)) {
                continue;
            }
            let mut bin = ExtremePointBin::new(container, self.tolerance);
            match bin.try_place(cuboid) {
                true => bins.push(bin),
                false => unplaced.push(cuboid.tag),
            }
        }
        PackResult {
            ordering,
            bins: bins.into_iter().map(|b| b.into_placed()).collect(),
            unplaced,
        }
    }

    fn verify_result(&self, result: &PackResult, container: Vector3) -> bool {
        result.bins.iter().all(|b| verify(b, container, self.tolerance))
    }
}

fn is_better(a: &PackResult, b: &PackResult) -> bool {
    let key = |r: &PackResult| (r.placed_count(), Reverse(r.bins.len()), OrderedFloat(r.first_bin_volume()));
    key(a) > key(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AllowedOrientations;
    use crate::geometry::Transform3D;

    fn cuboids(n: usize, dims: Vector3, allowed: AllowedOrientations) -> Vec<Cuboid> {
        (0..n)
            .map(|_| Cuboid::new(0, dims, allowed, &Transform3D::identity(), 0))
            .collect()
    }

    #[test]
    fn fills_a_bin_exactly() {
        let mut bin = ExtremePointBin::new(Vector3::new(100.0, 100.0, 100.0), 1e-6);
        for c in cuboids(8, Vector3::new(50.0, 50.0, 50.0), AllowedOrientations::ALL) {
            assert!(bin.try_place(&c));
        }
        assert!(!bin.try_place(&cuboids(1, Vector3::new(1.0, 1.0, 1.0), AllowedOrientations::ALL)[0]));
        assert!(verify(bin.placed(), Vector3::new(100.0, 100.0, 100.0), 1e-6));
        assert_eq!(bin.volume(), 1e6);
    }

    #[test]
    fn points_fall_onto_supports() {
        let mut bin = ExtremePointBin::new(Vector3::new(100.0, 100.0, 100.0), 1e-6);
        let tall = Cuboid::new(0, Vector3::new(50.0, 50.0, 80.0), AllowedOrientations::UPRIGHT_ONLY, &Transform3D::identity(), 0);
        let flat = Cuboid::new(1, Vector3::new(50.0, 50.0, 10.0), AllowedOrientations::UPRIGHT_ONLY, &Transform3D::identity(), 0);
        assert!(bin.try_place(&tall));
        assert!(bin.try_place(&flat));
        // the second box rests on the floor next to the first one, not on top of it
        assert_eq!(bin.placed()[1].position.z, 0.0);
    }

    #[test]
    fn overflow_opens_new_bins() {
        let config = HSolverConfig::default();
        let packer = BinPacker::new(&config, 1e-6);
        let items = cuboids(20, Vector3::new(50.0, 50.0, 50.0), AllowedOrientations::ALL);
        let result = packer.pack(Vector3::new(100.0, 100.0, 100.0), &items).unwrap();
        assert_eq!(result.placed_count(), 20);
        assert_eq!(result.bins.len(), 3);
        assert_eq!(result.bins[0].len(), 8);
    }

    #[test]
    fn oversized_cuboids_are_reported() {
        let config = HSolverConfig::default();
        let packer = BinPacker::new(&config, 1e-6);
        let mut items = cuboids(2, Vector3::new(50.0, 50.0, 50.0), AllowedOrientations::ALL);
        items.push(Cuboid::new(7, Vector3::new(150.0, 50.0, 50.0), AllowedOrientations::ALL, &Transform3D::identity(), 0));
        let result = packer.pack(Vector3::new(100.0, 100.0, 100.0), &items).unwrap();
        assert_eq!(result.unplaced, [7]);
        assert_eq!(result.bins.len(), 1);
    }

    #[test]
    fn priority_is_packed_first() {
        let config = HSolverConfig::default();
        let packer = BinPacker::new(&config, 1e-6);
        let small = Cuboid::new(1, Vector3::new(10.0, 10.0, 10.0), AllowedOrientations::ALL, &Transform3D::identity(), 0);
        let large = Cuboid::new(2, Vector3::new(50.0, 50.0, 50.0), AllowedOrientations::ALL, &Transform3D::identity(), 1);
        let result = packer.pack(Vector3::new(100.0, 100.0, 100.0), &[large, small]).unwrap();
        assert_eq!(result.bins[0][0].tag, 1);
    }
}
