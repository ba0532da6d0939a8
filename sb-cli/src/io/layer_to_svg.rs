use itertools::Itertools;
use ordered_float::OrderedFloat;
use svg::Document;
use svg::node::element::{Circle, Group, Rectangle, Text, Title};

use stackbuilder::entities::layer::{Layer, Layer2D};
use stackbuilder::entities::{HAnalysis, HSolItem, HomoAnalysis};
use stackbuilder::geometry::primitives::BBox2D;

use crate::io::svg_util::{Color, SvgDrawOptions};

/// Palette blended into the item fill to tell content types apart
const CONTENT_TINTS: [Color; 6] = [
    Color(0xFF, 0xFF, 0xFF),
    Color(0x4A, 0x90, 0xCC),
    Color(0x6A, 0xCC, 0x4A),
    Color(0xCC, 0x4A, 0x8E),
    Color(0x9E, 0x4A, 0xCC),
    Color(0xCC, 0xC2, 0x4A),
];

/// Top view of a single layer on its container
pub fn layer_to_svg(layer: &Layer, analysis: &HomoAnalysis, options: SvgDrawOptions, title: &str) -> Document {
    let theme = options.theme.theme();
    let c = &analysis.container;
    let container = BBox2D::new(0.0, 0.0, c.length, c.width);
    let offset = analysis.offset();
    let dims = analysis.container_dimensions();
    let available = BBox2D::new(offset.x, offset.y, offset.x + dims.x, offset.y + dims.y);
    let vbox = scaled(&container.union(&available), 1.05);
    let stroke_width = f64::min(vbox.width(), vbox.height()) * 0.001 * theme.stroke_width_multiplier;

    let container_group = Group::new()
        .set("id", "container")
        .add(rect(&container, theme.container_fill, 2.0 * stroke_width))
        .add(Title::new(format!("{}: {} x {}", c.name, c.length, c.width)));

    let mut items_group = Group::new().set("id", "items");
    match layer {
        Layer::Brick(l) => {
            for (i, fp) in l.footprints().iter().enumerate() {
                let fp = BBox2D::new(fp.x_min + offset.x, fp.y_min + offset.y, fp.x_max + offset.x, fp.y_max + offset.y);
                items_group = items_group.add(rect(&fp, theme.item_fill, stroke_width));
                if options.labels {
                    items_group = items_group.add(label(i, &fp));
                }
            }
        }
        Layer::Cyl(l) => {
            let r = l.frame().radius;
            for (i, centre) in l.centres().iter().enumerate() {
                let (x, y) = (centre.x + offset.x, centre.y + offset.y);
                items_group = items_group.add(
                    Circle::new()
                        .set("cx", x)
                        .set("cy", y)
                        .set("r", r)
                        .set("fill", theme.item_fill.to_string())
                        .set("stroke", "black")
                        .set("stroke-width", stroke_width),
                );
                if options.labels {
                    items_group = items_group.add(label(i, &BBox2D::new(x - r, y - r, x + r, y + r)));
                }
            }
        }
    }

    let mut document = Document::new()
        .set("viewBox", (vbox.x_min, vbox.y_min, vbox.width(), vbox.height()))
        .add(Title::new(format!("{title} {} ({} items)", layer.descriptor(), layer.count())))
        .add(container_group);
    if options.overhang && available != container {
        document = document.add(
            rect(&available, theme.overhang_stroke, stroke_width)
                .set("fill", "none")
                .set("stroke", theme.overhang_stroke.to_string())
                .set("stroke-dasharray", 5.0 * stroke_width),
        );
    }
    document.add(items_group)
}

/// Top view of one container of a heterogeneous solution, higher items drawn last and lighter
pub fn hsol_item_to_svg(item: &HSolItem, analysis: &HAnalysis, options: SvgDrawOptions, title: &str) -> Document {
    let theme = options.theme.theme();
    let c = &analysis.container;
    let container = BBox2D::new(0.0, 0.0, c.length, c.width);
    let vbox = scaled(&container, 1.05);
    let stroke_width = f64::min(vbox.width(), vbox.height()) * 0.001 * theme.stroke_width_multiplier;
    let top = analysis.offset().z + analysis.container_dimensions().z;

    let mut items_group = Group::new().set("id", "items");
    let elements = item
        .contained
        .iter()
        .zip(item.bboxes(analysis))
        .sorted_by_key(|(_, bbox)| OrderedFloat(bbox.max.z));
    for (i, (e, bbox)) in elements.enumerate() {
        let tint = CONTENT_TINTS[e.content_type % CONTENT_TINTS.len()];
        let brightness = 0.6 + 0.4 * (bbox.max.z / top).min(1.0);
        let fill = theme.item_fill.blend(tint).change_brightness(brightness);
        let fp = bbox.footprint();
        items_group = items_group.add(rect(&fp, fill, stroke_width).add(Title::new(format!(
            "{} at z = {}",
            analysis.content[e.content_type].pack.name, bbox.min.z
        ))));
        if options.labels {
            items_group = items_group.add(label(i, &fp));
        }
    }

    Document::new()
        .set("viewBox", (vbox.x_min, vbox.y_min, vbox.width(), vbox.height()))
        .add(Title::new(format!("{title} ({} items)", item.item_count())))
        .add(rect(&container, theme.container_fill, 2.0 * stroke_width))
        .add(items_group)
}

fn rect(bbox: &BBox2D, fill: Color, stroke_width: f64) -> Rectangle {
    Rectangle::new()
        .set("x", bbox.x_min)
        .set("y", bbox.y_min)
        .set("width", bbox.width())
        .set("height", bbox.height())
        .set("fill", fill.to_string())
        .set("stroke", "black")
        .set("stroke-width", stroke_width)
}

fn label(index: usize, bbox: &BBox2D) -> Text {
    let size = 0.3 * f64::min(bbox.width(), bbox.height());
    Text::new(index.to_string())
        .set("x", 0.5 * (bbox.x_min + bbox.x_max))
        .set("y", 0.5 * (bbox.y_min + bbox.y_max))
        .set("font-size", size)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "middle")
}

fn scaled(bbox: &BBox2D, factor: f64) -> BBox2D {
    let dx = 0.5 * (factor - 1.0) * bbox.width();
    let dy = 0.5 * (factor - 1.0) * bbox.height();
    BBox2D::new(bbox.x_min - dx, bbox.y_min - dy, bbox.x_max + dx, bbox.y_max + dy)
}
