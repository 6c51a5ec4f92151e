//! Logo expansion and contraction.
//!
//! Both logos share one layout. The `I` logo stacks upwards above the plot,
//! the `J` logo stacks rightwards beside it.
use super::window::Selection;
use crate::config::ViewerConfig;
use crate::data::LogoColumn;
use crate::geometry::PlotGeometry;
use crate::shapes::{polygon_to_path_data, triangle};
use crate::visual::{letter_transform, Attr, Axis, ElementId, VisualRequest};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Placement {
    Resting,
    /// Part of the window centred on `center`.
    Expanded { center: i64 },
}

pub(crate) struct LogoLayout<'a> {
    pub config: &'a ViewerConfig,
    pub geometry: &'a PlotGeometry,
    pub logo: &'a [LogoColumn],
}

impl LogoLayout<'_> {
    fn window(&self, center: i64) -> Selection {
        Selection::window(center, self.config.zoom.radius, self.logo.len())
    }

    fn position_to_px(&self, axis: Axis, k: f64) -> f64 {
        match axis {
            Axis::I => self.geometry.column_to_x(k),
            Axis::J => self.geometry.row_to_y(k),
        }
    }

    /// Requests moving every letter and block of column `k` into `placement`.
    pub fn column(
        &self,
        axis: Axis,
        k: usize,
        placement: Placement,
        delay: u32,
        duration: u32,
    ) -> Vec<VisualRequest> {
        let Some(column) = self.logo.get(k) else {
            return vec![];
        };
        let (logo, zoom, plot) = (&self.config.logo, &self.config.zoom, &self.config.axis);
        let rotate = match axis {
            Axis::I => 0.0,
            Axis::J => 90.0,
        };

        let mut requests = Vec::with_capacity(2 * column.len());
        let mut cumulative = 0.0;
        for (entry_index, entry) in column.iter().enumerate() {
            let fraction = entry.bits / logo.bit_scale;
            let (height, thickness, font_scale, stretch, letter_opacity, block_opacity, lift, offset) =
                match placement {
                    Placement::Resting => (
                        fraction * logo.height,
                        self.geometry.bar_width(),
                        logo.font_scale,
                        fraction,
                        0.0,
                        logo.opacity,
                        logo.pad,
                        self.position_to_px(axis, k as f64),
                    ),
                    Placement::Expanded { center } => {
                        let width = zoom.letter_width();
                        (
                            fraction * zoom.height,
                            width,
                            zoom.font_scale,
                            fraction * zoom.letter_stretch,
                            1.0,
                            zoom.opacity,
                            zoom.lift,
                            self.position_to_px(axis, center as f64)
                                + (k as f64 - center as f64 - 0.5) * width,
                        )
                    }
                };

            let (x, y) = match axis {
                Axis::I => (offset, plot.top - lift - cumulative),
                Axis::J => (plot.right + lift + cumulative, offset),
            };
            let letter = ElementId::LogoLetter {
                axis,
                column: k,
                entry: entry_index,
            };
            let block = ElementId::LogoBlock {
                axis,
                column: k,
                entry: entry_index,
            };
            requests.push(
                VisualRequest::transition(letter, delay, duration)
                    .attr(
                        Attr::Transform,
                        letter_transform(x, y, rotate, font_scale, stretch),
                    )
                    .attr(Attr::Opacity, letter_opacity),
            );
            let block_request = VisualRequest::transition(block, delay, duration)
                .attr(Attr::Opacity, block_opacity);
            requests.push(match axis {
                Axis::I => block_request
                    .attr(Attr::X, x)
                    .attr(Attr::Y, y - height)
                    .attr(Attr::Width, thickness)
                    .attr(Attr::Height, height),
                Axis::J => block_request
                    .attr(Attr::X, x)
                    .attr(Attr::Y, y)
                    .attr(Attr::Width, height)
                    .attr(Attr::Height, thickness),
            });
            cumulative += height;
        }
        requests
    }

    /// Moves the window from `previous` to `center`: new columns expand, columns
    /// that drop out contract, and the underline re-grows from the centre.
    pub fn expand(&self, axis: Axis, center: i64, previous: i64) -> Vec<VisualRequest> {
        let zoom = &self.config.zoom;
        let new = self.window(center);
        let old = self.window(previous);

        let mut requests: Vec<VisualRequest> = new
            .iter()
            .flat_map(|k| {
                self.column(
                    axis,
                    k,
                    Placement::Expanded { center },
                    zoom.delay,
                    zoom.duration,
                )
            })
            .collect();
        requests.extend(
            (&old - &new)
                .iter()
                .flat_map(|k| self.column(axis, k, Placement::Resting, zoom.delay, zoom.duration)),
        );
        requests.extend(self.underline(axis, center, &new));
        requests
    }

    /// Returns the window around `previous` to the resting layout and hides
    /// the underline.
    pub fn contract(&self, axis: Axis, previous: i64) -> Vec<VisualRequest> {
        let zoom = &self.config.zoom;
        let mut requests: Vec<VisualRequest> = self
            .window(previous)
            .iter()
            .flat_map(|k| {
                self.column(
                    axis,
                    k,
                    Placement::Resting,
                    zoom.delay,
                    zoom.destroy_duration,
                )
            })
            .collect();
        for target in [ElementId::ZoomLine(axis), ElementId::ZoomNotch(axis)] {
            requests.push(
                VisualRequest::transition(target, zoom.delay, zoom.duration).attr(Attr::Opacity, 0.0),
            );
        }
        requests
    }

    fn underline(&self, axis: Axis, center: i64, window: &Selection) -> Vec<VisualRequest> {
        let Some((start, stop)) = window.bounds() else {
            return vec![];
        };
        let zoom = &self.config.zoom;
        let plot = &self.config.axis;
        let width = zoom.letter_width();
        let mid = self.position_to_px(axis, center as f64);
        let near = mid + (start as f64 - center as f64 - 0.5) * width;
        let far = mid + (stop as f64 + 1.0 - center as f64 - 0.5) * width;
        let rad = zoom.notch_radius;

        let (line_start, line_end, flat, tip) = match axis {
            Axis::I => {
                let y = plot.top - zoom.lift + zoom.underline_pad;
                (
                    VisualRequest::set(ElementId::ZoomLine(axis))
                        .attr(Attr::X1, mid)
                        .attr(Attr::X2, mid)
                        .attr(Attr::Y1, y)
                        .attr(Attr::Y2, y),
                    VisualRequest::transition(
                        ElementId::ZoomLine(axis),
                        zoom.underline_delay,
                        zoom.underline_duration,
                    )
                    .attr(Attr::X1, near)
                    .attr(Attr::X2, far),
                    triangle((mid - rad, y), (mid + rad, y), (mid, y)),
                    triangle((mid - rad, y), (mid + rad, y), (mid, y + zoom.notch_height)),
                )
            }
            Axis::J => {
                let x = plot.right + zoom.lift - zoom.underline_pad;
                (
                    VisualRequest::set(ElementId::ZoomLine(axis))
                        .attr(Attr::X1, x)
                        .attr(Attr::X2, x)
                        .attr(Attr::Y1, mid)
                        .attr(Attr::Y2, mid),
                    VisualRequest::transition(
                        ElementId::ZoomLine(axis),
                        zoom.underline_delay,
                        zoom.underline_duration,
                    )
                    .attr(Attr::Y1, near)
                    .attr(Attr::Y2, far),
                    triangle((x, mid - rad), (x, mid + rad), (x, mid)),
                    triangle((x, mid - rad), (x, mid + rad), (x - zoom.notch_height, mid)),
                )
            }
        };

        vec![
            line_start.attr(Attr::Opacity, 1.0),
            line_end,
            VisualRequest::set(ElementId::ZoomNotch(axis))
                .attr(Attr::Path, polygon_to_path_data(&flat))
                .attr(Attr::Opacity, 1.0),
            VisualRequest::transition(
                ElementId::ZoomNotch(axis),
                zoom.underline_delay,
                zoom.underline_duration,
            )
            .attr(Attr::Path, polygon_to_path_data(&tip)),
        ]
    }
}
