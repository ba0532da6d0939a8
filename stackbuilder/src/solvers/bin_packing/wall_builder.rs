use std::cmp::Reverse;

use itertools::Itertools;
use log::trace;
use ordered_float::{NotNan, OrderedFloat};

use crate::geometry::primitives::Vector3;
use crate::solvers::bin_packing::{Cuboid, PlacedCuboid};

/// Result of a wall building pass
#[derive(Clone, Debug, Default)]
pub struct WallResult {
    pub placed: Vec<PlacedCuboid>,
    pub unpacked: Vec<Cuboid>,
}

/// Fills a single container with successive walls along its x axis.
/// Each wall spans the full y-z face and is filled with shelves stacked along z.
/// The wall thickness is chosen among the cuboid extents as the one yielding the densest wall.
pub struct WallBuilder {
    container: Vector3,
    tolerance: f64,
}

impl WallBuilder {
    pub fn new(container: Vector3, tolerance: f64) -> Self {
        Self { container, tolerance }
    }

    pub fn pack(&self, cuboids: Vec<Cuboid>) -> WallResult {
        let mut remaining = cuboids
            .into_iter()
            .sorted_by_cached_key(|c| {
                (
                    c.priority,
                    Reverse(NotNan::new(c.volume()).expect("cuboid dimensions are finite")),
                )
            })
            .collect_vec();
        let mut placed = vec![];
        let mut x = 0.0;

        loop {
            let depth_left = self.container.x - x;
            let best_wall = self
                .thicknesses(&remaining, depth_left)
                .into_iter()
                .map(|t| {
                    let wall = self.fill_wall(x, t, &remaining);
                    let volume: f64 = wall.iter().map(|(_, p)| p.dims.volume()).sum();
                    (t, wall, volume / (t * self.container.y * self.container.z))
                })
                // first wall of maximal density
                .rev()
                .max_by_key(|(_, _, density)| OrderedFloat(*density));

            let Some((t, wall, density)) = best_wall else {
                break;
            };
            if wall.is_empty() {
                break;
            }
            trace!("wall at x = {x}: thickness {t}, {} item(s), density {density:.3}", wall.len());
            let indices = wall.iter().map(|(i, _)| *i).collect_vec();
            placed.extend(wall.into_iter().map(|(_, p)| p));
            remaining = remaining
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !indices.contains(i))
                .map(|(_, c)| c)
                .collect();
            x += t;
        }

        WallResult {
            placed,
            unpacked: remaining,
        }
    }

    /// Distinct extents along x of the cuboids that fit in the remaining depth, in order of appearance
    fn thicknesses(&self, cuboids: &[Cuboid], depth_left: f64) -> Vec<f64> {
        let tol = self.tolerance;
        let mut thicknesses: Vec<f64> = vec![];
        for c in cuboids {
            for o in &c.orientations {
                let e = c.extents(*o);
                let fits = e.x <= depth_left + tol && e.y <= self.container.y + tol && e.z <= self.container.z + tol;
                if fits && !thicknesses.iter().any(|t| (t - e.x).abs() <= tol) {
                    thicknesses.push(e.x);
                }
            }
        }
        thicknesses
    }

    /// Shelf filling of a wall of thickness `t` starting at `x0`, returns the indices of the cuboids used
    fn fill_wall(&self, x0: f64, t: f64, cuboids: &[Cuboid]) -> Vec<(usize, PlacedCuboid)> {
        let tol = self.tolerance;
        let (width, height) = (self.container.y, self.container.z);
        let (mut y, mut shelf_z, mut shelf_h) = (0.0, 0.0, 0.0);
        let mut wall = vec![];

        // deepest orientation fitting at (y, z), lowest one on ties
        let pick = |c: &Cuboid, y: f64, z: f64| {
            c.orientations
                .iter()
                .map(|o| (*o, c.extents(*o)))
                .filter(|(_, e)| e.x <= t + tol && y + e.y <= width + tol && z + e.z <= height + tol)
                .max_by_key(|(_, e)| (OrderedFloat(e.x), Reverse(OrderedFloat(e.z))))
        };

        for (i, c) in cuboids.iter().enumerate() {
            let choice = match pick(c, y, shelf_z) {
                Some(choice) => Some(choice),
                None if shelf_h > 0.0 => {
                    let next_z = shelf_z + shelf_h;
                    let choice = pick(c, 0.0, next_z);
                    if choice.is_some() {
                        (y, shelf_z, shelf_h) = (0.0, next_z, 0.0);
                    }
                    choice
                }
                None => None,
            };
            let Some((orientation, extents)) = choice else {
                continue;
            };
            wall.push((
                i,
                PlacedCuboid {
                    tag: c.tag,
                    position: Vector3::new(x0, y, shelf_z),
                    extents,
                    orientation,
                    dims: c.dims,
                },
            ));
            y += extents.y;
            shelf_h = f64::max(shelf_h, extents.z);
        }
        wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AllowedOrientations;
    use crate::geometry::Transform3D;
    use crate::solvers::bin_packing::verify;

    fn cuboids(n: usize, tag: usize, dims: Vector3) -> Vec<Cuboid> {
        (0..n)
            .map(|_| Cuboid::new(tag, dims, AllowedOrientations::ALL, &Transform3D::identity(), 0))
            .collect()
    }

    #[test]
    fn identical_cubes_fill_the_container() {
        let container = Vector3::new(100.0, 100.0, 100.0);
        let result = WallBuilder::new(container, 1e-6).pack(cuboids(10, 0, Vector3::new(50.0, 50.0, 50.0)));
        assert_eq!(result.placed.len(), 8);
        assert_eq!(result.unpacked.len(), 2);
        assert!(verify(&result.placed, container, 1e-6));
    }

    #[test]
    fn mixed_items_stay_inside_and_disjoint() {
        let container = Vector3::new(120.0, 100.0, 90.0);
        let mut items = cuboids(6, 0, Vector3::new(40.0, 30.0, 20.0));
        items.extend(cuboids(5, 1, Vector3::new(60.0, 50.0, 45.0)));
        items.extend(cuboids(9, 2, Vector3::new(25.0, 25.0, 25.0)));
        let result = WallBuilder::new(container, 1e-6).pack(items);
        assert!(verify(&result.placed, container, 1e-6));
        assert_eq!(result.placed.len() + result.unpacked.len(), 20);
        assert!(!result.placed.is_empty());
    }

    #[test]
    fn oversized_item_is_left_unpacked() {
        let container = Vector3::new(100.0, 100.0, 100.0);
        let result = WallBuilder::new(container, 1e-6).pack(cuboids(1, 3, Vector3::new(150.0, 10.0, 10.0)));
        assert!(result.placed.is_empty());
        assert_eq!(result.unpacked[0].tag, 3);
    }
}
