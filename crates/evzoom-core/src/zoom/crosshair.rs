//! Crosshair bands, axis labels and coupling highlights.
use super::window::Selection;
use crate::config::ViewerConfig;
use crate::data::{Coupling, PositionMap};
use crate::geometry::{Cell, PlotGeometry};
use crate::visual::{Attr, Axis, ElementId, VisualRequest};

fn label_text(map: &PositionMap, k: i64) -> String {
    usize::try_from(k)
        .ok()
        .and_then(|k| map.label(k))
        .unwrap_or_else(|| (k + 1).to_string())
}

pub(crate) fn show(
    config: &ViewerConfig,
    geometry: &PlotGeometry,
    map: &PositionMap,
    cell: Cell,
) -> Vec<VisualRequest> {
    let radius = config.zoom.radius;
    let length = geometry.length();
    let (Some((start_i, stop_i)), Some((start_j, stop_j))) = (
        Selection::window(cell.i, radius, length).bounds(),
        Selection::window(cell.j, radius, length).bounds(),
    ) else {
        return vec![];
    };
    let grid = &config.grid;
    let axis = &config.axis;

    vec![
        VisualRequest::set(ElementId::Crosshair(Axis::I))
            .attr(Attr::X, geometry.column_to_x(start_i as f64))
            .attr(Attr::Width, geometry.length_to_pixels((stop_i - start_i) as f64))
            .attr(Attr::Opacity, grid.crosshair_opacity),
        VisualRequest::set(ElementId::Crosshair(Axis::J))
            .attr(Attr::Y, geometry.row_to_y(start_j as f64))
            .attr(Attr::Height, geometry.length_to_pixels((stop_j - start_j) as f64))
            .attr(Attr::Opacity, grid.crosshair_opacity),
        VisualRequest::set(ElementId::CrosshairLabel(Axis::J))
            .attr(Attr::X, axis.left - grid.label_pad_x)
            .attr(Attr::Y, geometry.row_to_y(cell.j as f64))
            .attr(Attr::Opacity, 1.0)
            .attr(Attr::Text, label_text(map, cell.j)),
        VisualRequest::set(ElementId::CrosshairLabel(Axis::I))
            .attr(Attr::X, geometry.column_to_x(cell.i as f64))
            .attr(Attr::Y, axis.bottom + grid.label_pad_y)
            .attr(Attr::Opacity, 1.0)
            .attr(Attr::Text, label_text(map, cell.i)),
    ]
}

pub(crate) fn hide(config: &ViewerConfig) -> Vec<VisualRequest> {
    let duration = config.grid.label_duration;
    vec![
        VisualRequest::set(ElementId::Crosshair(Axis::I)).attr(Attr::Opacity, 0.0),
        VisualRequest::set(ElementId::Crosshair(Axis::J)).attr(Attr::Opacity, 0.0),
        VisualRequest::transition(ElementId::CrosshairLabel(Axis::J), 0, duration)
            .attr(Attr::Opacity, 0.0),
        VisualRequest::transition(ElementId::CrosshairLabel(Axis::I), 0, duration)
            .attr(Attr::Opacity, 0.0),
    ]
}

/// Glyphs whose anchor row or column lies within the zoom radius of `cell`
/// get the highlight fill; everything else the base fill.
pub(crate) fn highlight(
    config: &ViewerConfig,
    couplings: &[Coupling],
    cell: Cell,
    on_plot: bool,
    length: usize,
) -> Vec<VisualRequest> {
    let radius = config.zoom.radius;
    let columns = Selection::window(cell.i, radius, length);
    let rows = Selection::window(cell.j, radius, length);
    couplings
        .iter()
        .enumerate()
        .map(|(index, coupling)| {
            let (ai, aj) = coupling.anchor();
            let fill = if on_plot && (columns.contains(ai) || rows.contains(aj)) {
                &config.couplings.highlight
            } else {
                &config.couplings.fill
            };
            VisualRequest::set(ElementId::Glyph(index)).attr(Attr::Fill, fill.as_str())
        })
        .collect()
}
