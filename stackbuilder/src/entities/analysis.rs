use anyhow::{Result, bail, ensure};

use crate::entities::constraint_set::{AllowedOrientations, ConstraintSet};
use crate::entities::container::{ContainerProperties, InterlayerProperties};
use crate::entities::cyl_load::CylLoad;
use crate::entities::packable::{BoxProperties, Packable};
use crate::entities::solution::Solution;
use crate::geometry::primitives::{Vector2, Vector3};
use crate::solvers::{LayerSolver, StackComposer};

/// A homogeneous loading problem: one item type on (or in) one container
#[derive(Clone, Debug, PartialEq)]
pub struct HomoAnalysis {
    pub packable: Packable,
    pub container: ContainerProperties,
    pub interlayer: Option<InterlayerProperties>,
    pub constraint_set: ConstraintSet,
}

impl HomoAnalysis {
    pub fn new(
        packable: Packable,
        container: ContainerProperties,
        interlayer: Option<InterlayerProperties>,
        constraint_set: ConstraintSet,
    ) -> Result<Self> {
        packable.validate()?;
        container.validate()?;
        if let Some(il) = &interlayer {
            il.validate()?;
        }
        constraint_set.validate()?;
        Ok(Self {
            packable,
            container,
            interlayer,
            constraint_set,
        })
    }

    /// Footprint available to layers, overhang included
    pub fn container_dimensions(&self) -> Vector2 {
        let o = self.constraint_set.overhang;
        Vector2::new(
            self.container.length + 2.0 * o.x,
            self.container.width + 2.0 * o.y,
        )
    }

    /// Origin of the layer frame in the container frame
    pub fn offset(&self) -> Vector3 {
        let o = self.constraint_set.overhang;
        Vector3::new(-o.x, -o.y, self.container.load_base_z())
    }

    /// Total height limit, combining the constraint set and the container itself
    pub fn max_height(&self) -> Option<f64> {
        match (self.constraint_set.max_height, self.container.height_limit()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Constraint set with the container's own height limit folded in
    pub fn effective_constraints(&self) -> ConstraintSet {
        ConstraintSet {
            max_height: self.max_height(),
            ..self.constraint_set.clone()
        }
    }

    /// Height available for layers, if bounded
    pub fn stacking_height(&self) -> Option<f64> {
        self.max_height().map(|h| h - self.container.load_base_z())
    }

    /// One solution per best layer, most items first
    pub fn solve(&self, solver: &LayerSolver) -> Result<Vec<Solution>> {
        StackComposer::new(solver).solve(self, true)
    }

    /// Solution mixing at most two layer types, `None` if the item does not fit
    pub fn solve_best_combination(&self, solver: &LayerSolver) -> Result<Option<Solution>> {
        StackComposer::new(solver).solve_best_combination(self)
    }

    /// Loads of the cylinder lying on its side, most items first.
    /// The item count is bounded by the constraint set's count and weight limits.
    pub fn solve_lying_cylinders(&self, solver: &LayerSolver) -> Result<Vec<CylLoad>> {
        let Packable::Cylinder(cp) = &self.packable else {
            bail!("only cylinders can be loaded lying: {:?}", self.packable.name());
        };
        let cs = &self.constraint_set;
        let by_weight = match cs.max_weight {
            Some(w) if cp.weight > 0.0 => Some(((w - self.container.weight) / cp.weight).floor().max(0.0) as usize),
            _ => None,
        };
        let max_count = match (cs.max_count, by_weight) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        solver.build_cyl_loads(
            cp,
            self.container_dimensions(),
            self.offset(),
            cs,
            max_count,
            self.stacking_height(),
        )
    }
}

/// A type of box in a heterogeneous load
#[derive(Clone, Debug, PartialEq)]
pub struct ContentItem {
    pub pack: BoxProperties,
    pub number: usize,
    pub allowed_orientations: AllowedOrientations,
    /// Items with a lower priority value are loaded first
    pub priority: i32,
}

/// A heterogeneous loading problem: several box types in one container type
#[derive(Clone, Debug, PartialEq)]
pub struct HAnalysis {
    pub container: ContainerProperties,
    /// Total height limit, container included
    pub max_height: Option<f64>,
    pub content: Vec<ContentItem>,
}

impl HAnalysis {
    pub fn new(container: ContainerProperties, max_height: Option<f64>, content: Vec<ContentItem>) -> Result<Self> {
        container.validate()?;
        for ci in &content {
            ci.pack.validate()?;
        }
        let analysis = Self {
            container,
            max_height,
            content,
        };
        ensure!(
            analysis.container_dimensions().z > 0.0,
            "no loading height available in container {:?}",
            analysis.container.name
        );
        Ok(analysis)
    }

    /// Loading volume of a single container
    pub fn container_dimensions(&self) -> Vector3 {
        let base = self.container.load_base_z();
        let limit = match (self.max_height, self.container.height_limit()) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => base,
        };
        Vector3::new(self.container.length, self.container.width, limit - base)
    }

    pub fn offset(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, self.container.load_base_z())
    }
}
