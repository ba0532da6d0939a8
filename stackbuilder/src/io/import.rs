use anyhow::{Context, Result};
use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::entities::{
    AllowedOrientations, BoxProperties, ConstraintSet, ContainerProperties, ContentItem, CylinderProperties,
    HAnalysis, HomoAnalysis, InterlayerProperties, Packable,
};
use crate::geometry::primitives::Vector2;
use crate::io::ext_repr::{
    ExtBox, ExtConstraintSet, ExtContainer, ExtContentItem, ExtHeteroAnalysis, ExtHomoAnalysis, ExtInterlayer,
    ExtPackable,
};
use crate::util::UnitSystem;

/// Converts external representations of analyses into internal ones, validating them on the way.
#[derive(Clone, Debug, Copy, Default)]
pub struct Importer {
    /// Unit system the external values are expressed in, only used for reporting
    pub unit_system: UnitSystem,
}

impl Importer {
    pub fn new(unit_system: UnitSystem) -> Importer {
        Importer { unit_system }
    }

    pub fn import_box(&self, ext_box: &ExtBox) -> Result<BoxProperties> {
        let bp = BoxProperties::new(
            ext_box.name.clone(),
            ext_box.length,
            ext_box.width,
            ext_box.height,
            ext_box.weight,
        )?;
        let bp = match ext_box.bulge {
            Some(bulge) => bp.with_bulge(bulge.into())?,
            None => bp,
        };
        debug!(
            "[IMPORT] box {:?}: {} x {} x {} {}",
            bp.name,
            bp.length,
            bp.width,
            bp.height,
            self.unit_system.length_unit()
        );
        Ok(bp)
    }

    pub fn import_packable(&self, ext_packable: &ExtPackable) -> Result<Packable> {
        match ext_packable {
            ExtPackable::Box(ext_box) => Ok(Packable::Box(self.import_box(ext_box)?)),
            ExtPackable::Cylinder(ext_cyl) => {
                let cp = CylinderProperties::new(
                    ext_cyl.name.clone(),
                    ext_cyl.diameter / 2.0,
                    ext_cyl.height,
                    ext_cyl.weight,
                )?;
                Ok(Packable::Cylinder(cp))
            }
        }
    }

    pub fn import_container(&self, ext_container: &ExtContainer) -> Result<ContainerProperties> {
        let cp = ContainerProperties {
            name: ext_container.name.clone(),
            kind: ext_container.kind,
            length: ext_container.length,
            width: ext_container.width,
            height: ext_container.height,
            weight: ext_container.weight,
        };
        cp.validate()?;
        Ok(cp)
    }

    pub fn import_interlayer(&self, ext_interlayer: &ExtInterlayer) -> Result<InterlayerProperties> {
        let ip = InterlayerProperties {
            name: ext_interlayer.name.clone(),
            length: ext_interlayer.length,
            width: ext_interlayer.width,
            thickness: ext_interlayer.thickness,
            weight: ext_interlayer.weight,
        };
        ip.validate()?;
        Ok(ip)
    }

    pub fn import_constraint_set(&self, ext_cs: &ExtConstraintSet) -> Result<ConstraintSet> {
        let defaults = ConstraintSet::default();
        let cs = ConstraintSet {
            allowed_orientations: ext_cs
                .allowed_orientations
                .parse()
                .context("invalid allowed orientations")?,
            max_height: ext_cs.max_height,
            max_weight: ext_cs.max_weight,
            max_count: ext_cs.max_count,
            overhang: Vector2::from(ext_cs.overhang),
            min_space: ext_cs.min_space,
            max_space_allowed: ext_cs.max_space_allowed,
            max_layer_weight: ext_cs.max_layer_weight,
            interlayer_period: ext_cs.interlayer_period.unwrap_or(defaults.interlayer_period),
            has_first_interlayer: ext_cs.has_first_interlayer,
            layer_swap_period: ext_cs.layer_swap_period.unwrap_or(defaults.layer_swap_period),
        };
        cs.validate()?;
        Ok(cs)
    }

    pub fn import_homo_analysis(&self, ext_analysis: &ExtHomoAnalysis) -> Result<HomoAnalysis> {
        let packable = self.import_packable(&ext_analysis.item)?;
        let container = self.import_container(&ext_analysis.container)?;
        let interlayer = ext_analysis
            .interlayer
            .as_ref()
            .map(|il| self.import_interlayer(il))
            .transpose()?;
        let constraint_set = self.import_constraint_set(&ext_analysis.constraints)?;
        if interlayer.is_none() && constraint_set.has_first_interlayer {
            warn!(
                "[IMPORT] analysis {:?} asks for a first interlayer but defines none",
                ext_analysis.name
            );
        }
        HomoAnalysis::new(packable, container, interlayer, constraint_set)
            .with_context(|| format!("invalid analysis {:?}", ext_analysis.name))
    }

    pub fn import_content_item(&self, ext_ci: &ExtContentItem) -> Result<ContentItem> {
        let allowed_orientations: AllowedOrientations = ext_ci
            .allowed_orientations
            .parse()
            .with_context(|| format!("invalid allowed orientations of {:?}", ext_ci.item.name))?;
        if !allowed_orientations.any() {
            warn!(
                "[IMPORT] {:?} allows no orientation, its {} item(s) will not be loaded",
                ext_ci.item.name, ext_ci.number
            );
        }
        Ok(ContentItem {
            pack: self.import_box(&ext_ci.item)?,
            number: ext_ci.number,
            allowed_orientations,
            priority: ext_ci.priority,
        })
    }

    pub fn import_hetero_analysis(&self, ext_analysis: &ExtHeteroAnalysis) -> Result<HAnalysis> {
        #[cfg(feature = "parallel")]
        let content = ext_analysis
            .content
            .par_iter()
            .map(|ci| self.import_content_item(ci))
            .collect::<Result<Vec<ContentItem>>>()?;
        #[cfg(not(feature = "parallel"))]
        let content = ext_analysis
            .content
            .iter()
            .map(|ci| self.import_content_item(ci))
            .collect::<Result<Vec<ContentItem>>>()?;

        let container = self.import_container(&ext_analysis.container)?;
        HAnalysis::new(container, ext_analysis.max_height, content)
            .with_context(|| format!("invalid analysis {:?}", ext_analysis.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContainerKind;
    use crate::geometry::primitives::Vector3;

    fn ext_cs() -> ExtConstraintSet {
        ExtConstraintSet {
            allowed_orientations: "0,0,1".to_string(),
            max_height: Some(1500.0),
            max_weight: None,
            max_count: None,
            overhang: (20.0, 10.0),
            min_space: 0.0,
            max_space_allowed: None,
            max_layer_weight: None,
            interlayer_period: None,
            has_first_interlayer: false,
            layer_swap_period: Some(2),
        }
    }

    fn ext_pallet() -> ExtContainer {
        ExtContainer {
            name: "EUR".to_string(),
            kind: ContainerKind::Pallet,
            length: 1200.0,
            width: 800.0,
            height: 150.0,
            weight: 25.0,
        }
    }

    #[test]
    fn imports_a_homogeneous_analysis() {
        let ext = ExtHomoAnalysis {
            name: "case on EUR".to_string(),
            item: ExtPackable::Box(ExtBox {
                name: "case".to_string(),
                length: 400.0,
                width: 300.0,
                height: 200.0,
                weight: 8.0,
                bulge: Some((2.0, 2.0, 0.0)),
            }),
            container: ext_pallet(),
            interlayer: None,
            constraints: ext_cs(),
        };
        let analysis = Importer::default().import_homo_analysis(&ext).unwrap();
        let cs = &analysis.constraint_set;
        assert_eq!(cs.allowed_orientations, AllowedOrientations::UPRIGHT_ONLY);
        assert_eq!(cs.interlayer_period, 1);
        assert_eq!(cs.layer_swap_period, 2);
        assert_eq!(cs.overhang, Vector2::new(20.0, 10.0));
        match &analysis.packable {
            Packable::Box(bp) => assert_eq!(bp.outer_dimensions(), Vector3::new(402.0, 302.0, 200.0)),
            Packable::Cylinder(_) => panic!("expected a box"),
        }
    }

    #[test]
    fn cylinder_diameter_becomes_radius() {
        let ext = ExtPackable::Cylinder(crate::io::ext_repr::ExtCylinder {
            name: "drum".to_string(),
            diameter: 600.0,
            height: 900.0,
            weight: 20.0,
        });
        match Importer::default().import_packable(&ext).unwrap() {
            Packable::Cylinder(cp) => assert_eq!(cp.radius, 300.0),
            Packable::Box(_) => panic!("expected a cylinder"),
        }
    }

    #[test]
    fn rejects_invalid_input() {
        let importer = Importer::default();
        let mut cs = ext_cs();
        cs.max_height = None;
        assert!(importer.import_constraint_set(&cs).is_err());

        let mut cs = ext_cs();
        cs.allowed_orientations = "1,1".to_string();
        assert!(importer.import_constraint_set(&cs).is_err());

        let mut pallet = ext_pallet();
        pallet.width = 0.0;
        assert!(importer.import_container(&pallet).is_err());
    }

    #[test]
    fn imports_a_heterogeneous_analysis_in_order() {
        let content = (1..=4)
            .map(|i| ExtContentItem {
                item: ExtBox {
                    name: format!("box {i}"),
                    length: 100.0 * i as f64,
                    width: 100.0,
                    height: 100.0,
                    weight: 1.0,
                    bulge: None,
                },
                number: i,
                allowed_orientations: "1,1,1".to_string(),
                priority: 0,
            })
            .collect();
        let ext = ExtHeteroAnalysis {
            name: "mix".to_string(),
            container: ext_pallet(),
            max_height: Some(1000.0),
            content,
        };
        let analysis = Importer::default().import_hetero_analysis(&ext).unwrap();
        let numbers = analysis.content.iter().map(|ci| ci.number).collect::<Vec<_>>();
        assert_eq!(numbers, [1, 2, 3, 4]);
        assert_eq!(analysis.container_dimensions(), Vector3::new(1200.0, 800.0, 850.0));
    }
}
