use crate::entities::analysis::HAnalysis;
use crate::entities::position::BoxPosition;
use crate::geometry::primitives::BBox3D;

/// A single placed item of a heterogeneous load
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HSolElement {
    /// Index into [`HAnalysis::content`]
    pub content_type: usize,
    pub position: BoxPosition,
}

/// Content of one container
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HSolItem {
    pub contained: Vec<HSolElement>,
}

impl HSolItem {
    pub fn item_count(&self) -> usize {
        self.contained.len()
    }

    pub fn bboxes<'a>(&'a self, analysis: &'a HAnalysis) -> impl Iterator<Item = BBox3D> + 'a {
        self.contained
            .iter()
            .map(|e| e.position.bbox(analysis.content[e.content_type].pack.dimensions()))
    }

    pub fn load_volume(&self, analysis: &HAnalysis) -> f64 {
        self.contained
            .iter()
            .map(|e| analysis.content[e.content_type].pack.volume())
            .sum()
    }

    pub fn load_weight(&self, analysis: &HAnalysis) -> f64 {
        self.contained
            .iter()
            .map(|e| analysis.content[e.content_type].pack.weight)
            .sum()
    }

    pub fn load_bbox(&self, analysis: &HAnalysis) -> BBox3D {
        self.bboxes(analysis).fold(BBox3D::empty(), |mut acc, b| {
            acc.extend(&b);
            acc
        })
    }

    /// Number of items of each content type
    pub fn counts(&self, analysis: &HAnalysis) -> Vec<usize> {
        let mut counts = vec![0; analysis.content.len()];
        for e in &self.contained {
            counts[e.content_type] += 1;
        }
        counts
    }
}

/// Result of one heterogeneous algorithm: the items split over one or more containers
#[derive(Clone, Debug, PartialEq)]
pub struct HSolution {
    pub algorithm: String,
    pub sol_items: Vec<HSolItem>,
}

impl HSolution {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            sol_items: vec![],
        }
    }

    pub fn item_count(&self) -> usize {
        self.sol_items.iter().map(|s| s.item_count()).sum()
    }

    pub fn container_count(&self) -> usize {
        self.sol_items.len()
    }

    pub fn load_volume(&self, analysis: &HAnalysis) -> f64 {
        self.sol_items.iter().map(|s| s.load_volume(analysis)).sum()
    }

    /// Items that could not be placed, per content type
    pub fn unpacked(&self, analysis: &HAnalysis) -> Vec<usize> {
        let mut left = analysis.content.iter().map(|c| c.number).collect::<Vec<_>>();
        for item in &self.sol_items {
            for (l, c) in left.iter_mut().zip(item.counts(analysis)) {
                *l = l.saturating_sub(c);
            }
        }
        left
    }
}
