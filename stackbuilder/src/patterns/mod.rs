use anyhow::{Result, bail};

use crate::entities::layer::{BrickFrame, BrickLayer, CylFrame, CylLayer};
use crate::entities::{CylLoad, CylLoadFrame};

mod box_aligned;
mod box_interlocked;
mod box_spiral;
mod box_symmetric_interlocked;
mod cyl_aligned;
mod cyl_staggered;
mod hcyl_pyramid;

#[doc(inline)]
pub use box_aligned::BoxAligned;
#[doc(inline)]
pub use box_interlocked::BoxInterlocked;
#[doc(inline)]
pub use box_spiral::BoxSpiral;
#[doc(inline)]
pub use box_symmetric_interlocked::BoxSymmetricInterlocked;
#[doc(inline)]
pub use cyl_aligned::CylAligned;
#[doc(inline)]
pub use cyl_staggered::CylStaggered;
#[doc(inline)]
pub use hcyl_pyramid::HCylPyramid;

/// Strategy arranging boxes into a 2D layer
pub trait BoxLayerPattern: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the pattern should also be tried with its frame rotated a quarter turn
    fn can_be_swapped(&self) -> bool;

    /// Whether flipping the item upside down yields the same layer,
    /// in which case only the positive half-axes are tried
    fn is_symmetric(&self) -> bool;

    /// Whether the pattern should also be tried mirrored along its length axis
    fn can_be_inverted(&self) -> bool;

    /// Footprint actually covered by the pattern, `None` if it cannot be built in this frame
    fn layer_dimensions(&self, frame: &BrickFrame) -> Option<(f64, f64)>;

    /// Generates the layer, spreading it over `actual_length` x `actual_width` (pattern frame)
    fn generate(&self, frame: &BrickFrame, actual_length: f64, actual_width: f64) -> Result<BrickLayer>;
}

/// Strategy arranging upright cylinders into a 2D layer
pub trait CylLayerPattern: Send + Sync {
    fn name(&self) -> &str;

    fn can_be_swapped(&self) -> bool;

    fn layer_dimensions(&self, frame: &CylFrame) -> Option<(f64, f64)>;

    fn generate(&self, frame: &CylFrame, actual_length: f64, actual_width: f64) -> Result<CylLayer>;
}

/// Strategy loading cylinders lying on their side in tiers
pub trait HCylLoadPattern: Send + Sync {
    fn name(&self) -> &str;

    fn can_be_swapped(&self) -> bool;

    /// Footprint of the bottom tier, `None` if not a single cylinder fits
    fn load_dimensions(&self, frame: &CylLoadFrame) -> Option<(f64, f64)>;

    /// Generates tiers until the next one would exceed `max_height` or `max_count` items are placed
    fn generate(
        &self,
        frame: &CylLoadFrame,
        actual_length: f64,
        actual_width: f64,
        max_count: Option<usize>,
        max_height: Option<f64>,
    ) -> Result<CylLoad>;
}

/// The set of patterns a solver explores, in exploration order
pub struct PatternRegistry {
    box_patterns: Vec<Box<dyn BoxLayerPattern>>,
    cyl_patterns: Vec<Box<dyn CylLayerPattern>>,
    hcyl_patterns: Vec<Box<dyn HCylLoadPattern>>,
}

impl PatternRegistry {
    pub fn empty() -> Self {
        Self {
            box_patterns: vec![],
            cyl_patterns: vec![],
            hcyl_patterns: vec![],
        }
    }

    pub fn with_box_pattern(mut self, pattern: impl BoxLayerPattern + 'static) -> Self {
        self.box_patterns.push(Box::new(pattern));
        self
    }

    pub fn with_cyl_pattern(mut self, pattern: impl CylLayerPattern + 'static) -> Self {
        self.cyl_patterns.push(Box::new(pattern));
        self
    }

    pub fn with_hcyl_pattern(mut self, pattern: impl HCylLoadPattern + 'static) -> Self {
        self.hcyl_patterns.push(Box::new(pattern));
        self
    }

    pub fn box_patterns(&self) -> impl Iterator<Item = &dyn BoxLayerPattern> {
        self.box_patterns.iter().map(|p| p.as_ref())
    }

    pub fn cyl_patterns(&self) -> impl Iterator<Item = &dyn CylLayerPattern> {
        self.cyl_patterns.iter().map(|p| p.as_ref())
    }

    pub fn hcyl_patterns(&self) -> impl Iterator<Item = &dyn HCylLoadPattern> {
        self.hcyl_patterns.iter().map(|p| p.as_ref())
    }

    pub fn box_pattern(&self, name: &str) -> Result<&dyn BoxLayerPattern> {
        match self.box_patterns().find(|p| p.name() == name) {
            Some(p) => Ok(p),
            None => bail!("no box layer pattern named {name:?}"),
        }
    }

    pub fn cyl_pattern(&self, name: &str) -> Result<&dyn CylLayerPattern> {
        match self.cyl_patterns().find(|p| p.name() == name) {
            Some(p) => Ok(p),
            None => bail!("no cylinder layer pattern named {name:?}"),
        }
    }

    pub fn hcyl_pattern(&self, name: &str) -> Result<&dyn HCylLoadPattern> {
        match self.hcyl_patterns().find(|p| p.name() == name) {
            Some(p) => Ok(p),
            None => bail!("no lying cylinder pattern named {name:?}"),
        }
    }
}

impl Default for PatternRegistry {
    /// All built-in patterns
    fn default() -> Self {
        PatternRegistry::empty()
            .with_box_pattern(BoxAligned)
            .with_box_pattern(BoxInterlocked)
            .with_box_pattern(BoxSymmetricInterlocked)
            .with_box_pattern(BoxSpiral)
            .with_cyl_pattern(CylAligned)
            .with_cyl_pattern(CylStaggered)
            .with_hcyl_pattern(HCylPyramid)
    }
}

/// Number of items of `size` fitting in `available`
pub(crate) fn fit_count(available: f64, size: f64, tolerance: f64) -> usize {
    match available > 0.0 && size > 0.0 {
        true => ((available + tolerance) / size).floor() as usize,
        false => 0,
    }
}

/// Uniform gap between `n` items of `size` spread over `available`
pub(crate) fn spacing(available: f64, occupied: f64, n: usize) -> f64 {
    match n > 1 {
        true => ((available - occupied) / (n - 1) as f64).max(0.0),
        false => 0.0,
    }
}
