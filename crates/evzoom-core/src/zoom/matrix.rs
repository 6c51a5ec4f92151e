//! The substitution-matrix widget.
//!
//! The first matrix index runs along x, like `i` on the plot. The widget has
//! a fixed number of slots per side; larger matrices are clipped.
use crate::config::ViewerConfig;
use crate::data::{ColorScheme, Coupling};
use crate::geometry::{Cell, PlotGeometry};
use crate::visual::{letter_transform, Attr, Axis, ElementId, VisualRequest};
use itertools::iproduct;
use log::warn;

fn fade_slots(config: &ViewerConfig, delay: u32, duration: u32) -> Vec<VisualRequest> {
    let slots = config.matrix.slots;
    let cells = iproduct!(0..slots, 0..slots).map(|(row, col)| {
        VisualRequest::transition(ElementId::MatrixCell { row, col }, delay, duration)
            .attr(Attr::Opacity, 0.0)
    });
    let labels = [Axis::I, Axis::J].into_iter().flat_map(|axis| {
        (0..slots).map(move |index| {
            VisualRequest::transition(ElementId::MatrixLabel { axis, index }, delay, duration)
                .attr(Attr::Opacity, 0.0)
        })
    });
    cells.chain(labels).collect()
}

/// Fades the whole widget and the colormap legend.
pub(crate) fn hide(config: &ViewerConfig) -> Vec<VisualRequest> {
    let times = &config.times;
    let mut requests = vec![
        VisualRequest::transition(ElementId::ColormapLegend, 0, times.destroy_duration)
            .attr(Attr::Opacity, 0.0),
        VisualRequest::transition(ElementId::MatrixBackground, 0, times.build_duration)
            .attr(Attr::Opacity, 0.0),
    ];
    requests.extend(fade_slots(config, 0, times.destroy_duration));
    requests
}

/// Clears the previous matrix and grows `coupling`'s matrix out of `cell`.
pub(crate) fn build(
    config: &ViewerConfig,
    geometry: &PlotGeometry,
    colors: &ColorScheme,
    index: usize,
    coupling: &Coupling,
    cell: Cell,
) -> Vec<VisualRequest> {
    let (times, matrix) = (&config.times, &config.matrix);
    let (delay, duration) = (times.destroy_duration, times.build_duration);
    let size = matrix.cell_size;

    let (rows, cols) = coupling.matrix_dims();
    if rows > matrix.slots || cols > matrix.slots {
        warn!(
            "matrix of coupling ({}, {}) is {}x{}, only {}x{} shown",
            coupling.i, coupling.j, rows, cols, matrix.slots, matrix.slots
        );
    }
    let rows = rows.min(matrix.slots);
    let cols = cols.min(matrix.slots);

    let mut requests = fade_slots(config, 0, delay);
    requests.push(
        VisualRequest::transition(ElementId::Glyph(index), 0, duration)
            .attr(Attr::Fill, config.couplings.fill.as_str()),
    );

    let sub_x = geometry.column_to_x(cell.i as f64) + matrix.pad_left;
    let sub_y = geometry.row_to_y(cell.j as f64) + matrix.pad_top;
    let width = rows as f64 * size + matrix.pad_right + matrix.pad_left;
    let height = cols as f64 * size + matrix.pad_top + matrix.pad_bottom;

    requests.push(
        VisualRequest::transition(ElementId::ColormapLegend, delay, duration)
            .attr(Attr::Opacity, 1.0),
    );
    requests.push(
        VisualRequest::set(ElementId::MatrixBackground)
            .attr(Attr::X, sub_x - matrix.pad_left)
            .attr(Attr::Y, sub_y - matrix.pad_top)
            .attr(Attr::Width, 0.0)
            .attr(Attr::Height, 0.0),
    );
    requests.push(
        VisualRequest::transition(ElementId::MatrixBackground, delay, duration)
            .attr(Attr::Width, width)
            .attr(Attr::Height, height)
            .attr(Attr::Opacity, matrix.background_opacity),
    );

    for (row, values) in coupling.matrix.iter().take(rows).enumerate() {
        for (col, &value) in values.iter().take(cols).enumerate() {
            let target = ElementId::MatrixCell { row, col };
            requests.push(
                VisualRequest::set(target)
                    .attr(Attr::Opacity, 0.0)
                    .attr(Attr::X, sub_x)
                    .attr(Attr::Y, sub_y)
                    .attr(Attr::Width, 0.0)
                    .attr(Attr::Height, 0.0),
            );
            requests.push(
                VisualRequest::transition(target, delay, duration)
                    .attr(Attr::Opacity, matrix.opacity)
                    .attr(Attr::Fill, matrix.colormap.color(value))
                    .attr(Attr::X, sub_x + row as f64 * size)
                    .attr(Attr::Y, sub_y + col as f64 * size)
                    .attr(Attr::Width, size)
                    .attr(Attr::Height, size),
            );
        }
    }

    for row in 0..rows {
        let label = coupling.i_labels.get(row).map_or("", String::as_str);
        let target = ElementId::MatrixLabel { axis: Axis::I, index: row };
        requests.push(
            VisualRequest::set(target)
                .attr(
                    Attr::Transform,
                    letter_transform(
                        sub_x + row as f64 * size + matrix.text_over,
                        sub_y - matrix.text_up,
                        0.0,
                        1.0,
                        1.0,
                    ),
                )
                .attr(Attr::Text, label),
        );
        requests.push(
            VisualRequest::transition(target, delay, duration)
                .attr(Attr::Fill, colors.label_color(label))
                .attr(Attr::Opacity, 1.0),
        );
    }
    for col in 0..cols {
        let label = coupling.j_labels.get(col).map_or("", String::as_str);
        let target = ElementId::MatrixLabel { axis: Axis::J, index: col };
        requests.push(
            VisualRequest::set(target)
                .attr(
                    Attr::Transform,
                    letter_transform(
                        sub_x + rows as f64 * size + matrix.text_up,
                        sub_y + col as f64 * size + matrix.text_over,
                        90.0,
                        1.0,
                        1.0,
                    ),
                )
                .attr(Attr::Text, label),
        );
        requests.push(
            VisualRequest::transition(target, delay, duration)
                .attr(Attr::Fill, colors.label_color(label))
                .attr(Attr::Opacity, 1.0),
        );
    }
    requests
}
