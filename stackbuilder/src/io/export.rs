use anyhow::Result;
use itertools::Itertools;

use crate::entities::{
    BoxPosition, CylPosition, HAnalysis, HSolution, LayerPlacements, Solution, SolutionLayer,
};
use crate::io::ext_repr::{
    ExtHContainerLoad, ExtHPlacedItem, ExtHSolution, ExtPlacement, ExtSolution, ExtSolutionLayer,
    ExtSolutionStats,
};

/// Exports a stacked [`Solution`] by composing an [`ExtSolution`] from it.
pub fn export_solution(solution: &Solution) -> Result<ExtSolution> {
    let mut placements = solution.placements()?.into_iter();
    let layers = solution
        .layers
        .iter()
        .map(|layer| match layer {
            SolutionLayer::Items {
                layer_type,
                z,
                rotated,
            } => {
                let placements = match placements.next() {
                    Some(LayerPlacements::Boxes(bps)) => bps.iter().map(export_box_position).collect(),
                    Some(LayerPlacements::Cylinders(cps)) => cps.iter().map(export_cyl_position).collect(),
                    None => vec![],
                };
                ExtSolutionLayer::Items {
                    layer_type: *layer_type,
                    z: *z,
                    rotated: *rotated,
                    placements,
                }
            }
            SolutionLayer::Interlayer { z } => ExtSolutionLayer::Interlayer { z: *z },
        })
        .collect_vec();

    let bbox = solution.load_bbox();
    Ok(ExtSolution {
        layer_descs: solution.layer_descs().iter().map(|d| d.to_string()).collect(),
        pallet_map_phrase: solution.pallet_map_phrase(),
        layers,
        statistics: ExtSolutionStats {
            item_count: solution.item_count(),
            layer_count: solution.item_layer_count(),
            interlayer_count: solution.interlayer_count(),
            load_weight: solution.load_weight(),
            total_weight: solution.total_weight(),
            height: solution.height(),
            bbox: (bbox.min.into(), bbox.max.into()),
            volume_efficiency: solution.volume_efficiency(),
            weight_efficiency: solution.weight_efficiency(),
        },
    })
}

/// Exports an [`HSolution`] by composing an [`ExtHSolution`] from it.
pub fn export_hsolution(solution: &HSolution, analysis: &HAnalysis) -> ExtHSolution {
    let container_volume = analysis.container_dimensions().volume();
    let containers = solution
        .sol_items
        .iter()
        .map(|item| {
            let load_volume = item.load_volume(analysis);
            ExtHContainerLoad {
                placed_items: item
                    .contained
                    .iter()
                    .map(|e| ExtHPlacedItem {
                        content_index: e.content_type,
                        name: analysis.content[e.content_type].pack.name.clone(),
                        placement: export_box_position(&e.position),
                    })
                    .collect(),
                load_volume,
                load_weight: item.load_weight(analysis),
                volume_efficiency: 100.0 * load_volume / container_volume,
            }
        })
        .collect();

    ExtHSolution {
        algorithm: solution.algorithm.clone(),
        containers,
        unpacked: solution.unpacked(analysis),
    }
}

pub fn export_box_position(bp: &BoxPosition) -> ExtPlacement {
    ExtPlacement::Box {
        position: bp.position().into(),
        dir_length: bp.dir_length(),
        dir_width: bp.dir_width(),
    }
}

pub fn export_cyl_position(cp: &CylPosition) -> ExtPlacement {
    ExtPlacement::Cylinder {
        position: cp.position.into(),
        axis: cp.axis,
    }
}
