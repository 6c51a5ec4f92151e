//! Scene
//!
//! Every element the viewer can address is created up front, hidden where
//! appropriate; requests then only ever change attributes. Transitions are
//! collapsed to their end state, so the scene always shows where the display
//! is heading.
use evzoom_core::config::ViewerConfig;
use evzoom_core::data::{AaGroup, ColorScheme, ZoomData};
use evzoom_core::geometry::PlotGeometry;
use evzoom_core::visual::{letter_transform, Attr, Axis, ElementId, Renderer, VisualRequest};
use evzoom_core::zoom::resting_logo;
use geo::Rect;
use itertools::iproduct;
use log::debug;
use std::collections::BTreeMap;
use svg::node::element::{
    Circle, Definitions, Filter, FilterEffectBlend, FilterEffectColorMatrix,
    FilterEffectGaussianBlur, FilterEffectOffset, Line, Path, Rectangle, Text,
};
use svg::{Document, Node};

const SHADOW_ID: &str = "drop-shadow";

/// Residue-class legend entries: grid slot, label, class.
const CLASS_LEGEND: [(usize, &str, AaGroup); 6] = [
    (0, "Positive", AaGroup::Positive),
    (1, "Polar", AaGroup::Polar),
    (2, "Hydrophobic", AaGroup::Hydrophobic),
    (8, "Cysteine", AaGroup::Cysteine),
    (7, "Negative", AaGroup::Negative),
    (9, "Aromatic", AaGroup::Aromatic),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Rect,
    Line,
    Circle,
    Text,
    Path,
}

#[derive(Clone, Debug)]
struct SceneElement {
    id: Option<ElementId>,
    shape: Shape,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
}

impl SceneElement {
    fn new(shape: Shape) -> Self {
        Self {
            id: None,
            shape,
            attrs: BTreeMap::new(),
            text: None,
        }
    }

    fn with_id(mut self, id: ElementId) -> Self {
        self.id = Some(id);
        self
    }

    fn set(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn to_node(&self) -> Box<dyn Node> {
        fn assign<T: Node>(mut node: T, attrs: &BTreeMap<String, String>) -> T {
            for (name, value) in attrs {
                node.assign(name.as_str(), value.as_str());
            }
            node
        }
        match self.shape {
            Shape::Rect => Box::new(assign(Rectangle::new(), &self.attrs)),
            Shape::Line => Box::new(assign(Line::new(), &self.attrs)),
            Shape::Circle => Box::new(assign(Circle::new(), &self.attrs)),
            Shape::Path => Box::new(assign(Path::new(), &self.attrs)),
            Shape::Text => Box::new(assign(
                Text::new(self.text.clone().unwrap_or_default()),
                &self.attrs,
            )),
        }
    }
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> SceneElement {
    SceneElement::new(Shape::Line)
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
}

fn rect(area: Rect<f64>) -> SceneElement {
    SceneElement::new(Shape::Rect)
        .set("x", area.min().x)
        .set("y", area.min().y)
        .set("width", area.width())
        .set("height", area.height())
}

/// The full viewer drawing.
#[derive(Clone, Debug)]
pub struct Scene {
    width: f64,
    height: f64,
    shadow: (f64, f64, f64, f64),
    colors: ColorScheme,
    elements: Vec<SceneElement>,
    index: BTreeMap<ElementId, Vec<usize>>,
    applied: usize,
}

impl Scene {
    pub fn build(data: &ZoomData, config: &ViewerConfig, colors: &ColorScheme) -> Self {
        let mut scene = Scene {
            width: config.canvas.width,
            height: config.canvas.height,
            shadow: (
                config.shadow.dx,
                config.shadow.dy,
                config.shadow.std,
                config.shadow.scale,
            ),
            colors: colors.clone(),
            elements: vec![],
            index: BTreeMap::new(),
            applied: 0,
        };
        let geometry = PlotGeometry::from_config(config, data.len());
        scene.add_plot(data, config, &geometry);
        scene.add_glyphs(data, config, &geometry);
        scene.add_logo(data, config, colors);
        scene.add_legend(config, colors);
        scene.add_matrix(config);
        scene.apply(&resting_logo(config, &geometry, &data.logo));
        debug!("scene built with {} elements", scene.elements.len());
        scene
    }

    fn push(&mut self, element: SceneElement) {
        if let Some(id) = element.id {
            self.index.entry(id).or_default().push(self.elements.len());
        }
        self.elements.push(element);
    }

    fn add_plot(&mut self, data: &ZoomData, config: &ViewerConfig, geometry: &PlotGeometry) {
        let (axis, grid) = (&config.axis, &config.grid);
        let plot = geometry.rect();
        self.push(
            rect(plot)
                .set("fill", &axis.color)
                .set("stroke", "white"),
        );

        let mut gridlines = vec![];
        for (k, index) in data.map.indices.iter().enumerate().take(data.len()) {
            if grid.spacing != 0 && index % grid.spacing == 0 {
                let (x, y) = (geometry.column_to_x(k as f64), geometry.row_to_y(k as f64));
                gridlines.push(line(axis.left, y, axis.right, y));
                gridlines.push(line(x, axis.top, x, axis.bottom));
            }
        }
        gridlines.push(line(axis.left, axis.top, axis.right, axis.top));
        gridlines.push(line(axis.left, axis.bottom, axis.right, axis.bottom));
        gridlines.push(line(axis.left, axis.top, axis.left, axis.bottom));
        gridlines.push(line(axis.right, axis.top, axis.right, axis.bottom));
        for gridline in gridlines {
            self.push(
                gridline
                    .set("stroke", &grid.color)
                    .set("stroke-width", grid.line_width),
            );
        }

        let band = geometry.length_to_pixels((2 * config.zoom.radius + 1) as f64);
        self.push(
            rect(plot)
                .with_id(ElementId::Crosshair(Axis::I))
                .set("width", band)
                .set("opacity", 0)
                .set("fill", &grid.crosshair_color)
                .set("stroke", "none"),
        );
        self.push(
            rect(plot)
                .with_id(ElementId::Crosshair(Axis::J))
                .set("height", band)
                .set("opacity", 0)
                .set("fill", &grid.crosshair_color)
                .set("stroke", "none"),
        );
        for (axis, anchor) in [(Axis::J, "end"), (Axis::I, "middle")] {
            self.push(
                SceneElement::new(Shape::Text)
                    .with_id(ElementId::CrosshairLabel(axis))
                    .set("font-family", &grid.label_font)
                    .set("font-size", &grid.label_font_size)
                    .set("opacity", 0)
                    .set("text-anchor", anchor)
                    .set("x", 0)
                    .set("y", 0)
                    .text("0"),
            );
        }
    }

    fn add_glyphs(&mut self, data: &ZoomData, config: &ViewerConfig, geometry: &PlotGeometry) {
        let couplings = &config.couplings;
        for (index, coupling) in data.couplings.iter().enumerate() {
            let (i, j) = coupling.anchor();
            self.push(
                SceneElement::new(Shape::Circle)
                    .with_id(ElementId::Glyph(index))
                    .set("cx", geometry.column_to_x(i as f64))
                    .set("cy", geometry.row_to_y(j as f64))
                    .set("fill", &couplings.fill)
                    .set("stroke", &couplings.stroke)
                    .set("stroke-width", couplings.stroke_width)
                    .set("r", 0),
            );
        }

        let zoom = &config.zoom;
        for axis in [Axis::I, Axis::J] {
            self.push(
                line(config.axis.left, config.axis.top, config.axis.left, config.axis.top)
                    .with_id(ElementId::ZoomLine(axis))
                    .set("stroke", &zoom.underline_color)
                    .set("stroke-width", zoom.underline_width)
                    .set("opacity", 0),
            );
            self.push(
                SceneElement::new(Shape::Path)
                    .with_id(ElementId::ZoomNotch(axis))
                    .set("d", "M0,0L0,0L0,0Z")
                    .set("fill", &zoom.underline_color)
                    .set("stroke", &zoom.underline_color)
                    .set("stroke-width", zoom.underline_width)
                    .set("opacity", 0),
            );
        }
    }

    fn add_logo(&mut self, data: &ZoomData, config: &ViewerConfig, colors: &ColorScheme) {
        let (logo, axis) = (&config.logo, &config.axis);
        let x = axis.left - logo.axis_pad;
        let base = axis.top - logo.pad;
        let style = |e: SceneElement| {
            e.set("stroke", &logo.axis_stroke)
                .set("stroke-width", logo.axis_stroke_width)
        };
        self.push(style(line(x, base, x, base - logo.bits_to_height(logo.axis_max))));
        for &tick in &logo.major_ticks {
            let y = base - logo.bits_to_height(tick);
            self.push(style(line(x, y, x - logo.major_length, y)));
        }
        self.push(
            SceneElement::new(Shape::Text)
                .set("font-family", &config.legend.font)
                .set("font-size", &config.legend.font_size)
                .set("transform", letter_transform(x + logo.axis_text_x, base, -90.0, 1.0, 1.0))
                .text("Bits"),
        );

        for axis in [Axis::I, Axis::J] {
            for (column, stack) in data.logo.iter().enumerate() {
                for (entry, letter) in stack.iter().enumerate() {
                    self.push(
                        SceneElement::new(Shape::Text)
                            .with_id(ElementId::LogoLetter { axis, column, entry })
                            .set("fill", colors.get_color(letter.code))
                            .set("font-size", "20px")
                            .set("font-family", &logo.font)
                            .set("opacity", 0)
                            .text(letter.code),
                    );
                }
            }
            for (column, stack) in data.logo.iter().enumerate() {
                for (entry, letter) in stack.iter().enumerate() {
                    self.push(
                        SceneElement::new(Shape::Rect)
                            .with_id(ElementId::LogoBlock { axis, column, entry })
                            .set("stroke", "none")
                            .set("fill", colors.get_color(letter.code))
                            .set("opacity", logo.opacity),
                    );
                }
            }
        }
    }

    fn add_legend(&mut self, config: &ViewerConfig, colors: &ColorScheme) {
        let legend = &config.legend;
        let text = |x: f64, y: f64, label: &str| {
            SceneElement::new(Shape::Text)
                .set("x", x)
                .set("y", y)
                .set("font-family", &legend.font)
                .set("font-size", &legend.font_size)
                .text(label)
        };

        for (slot, label, group) in CLASS_LEGEND {
            let (x, y) = (legend.slot_x(slot), legend.slot_y(slot));
            self.push(
                SceneElement::new(Shape::Rect)
                    .set("stroke", "none")
                    .set("fill", colors.group_color(group))
                    .set("x", x - legend.glyph_size / 2.0)
                    .set("y", y - legend.glyph_size / 2.0)
                    .set("width", legend.glyph_size)
                    .set("height", legend.glyph_size),
            );
            self.push(text(x + legend.text_x, y + legend.text_y, label));
        }

        let mag_x = legend.slot_x(legend.magnitude_slot) + legend.magnitude_shift_x;
        let mag_y = legend.slot_y(legend.magnitude_slot);
        for (radius, offset) in legend.magnitude_radii.iter().zip(&legend.magnitude_offsets) {
            self.push(
                SceneElement::new(Shape::Circle)
                    .set("cx", mag_x + offset)
                    .set("cy", mag_y)
                    .set("fill", &config.couplings.fill)
                    .set("stroke", &config.couplings.stroke)
                    .set("r", radius),
            );
        }
        self.push(text(
            mag_x + legend.magnitude_text_x,
            mag_y + legend.text_y,
            "Coupling magnitude",
        ));

        let cmap_x = legend.slot_x(legend.cmap_slot) + legend.cmap_shift_x;
        let cmap_y = legend.slot_y(legend.cmap_slot);
        let blocks = legend.cmap_blocks.max(1);
        let block_width = legend.cmap_width / blocks as f64;
        for k in 0..blocks {
            let value = 2.0 * k as f64 / (blocks - 1).max(1) as f64 - 1.0;
            let offset = (k as f64 / blocks as f64 - 0.5) * legend.cmap_width;
            self.push(
                SceneElement::new(Shape::Rect)
                    .with_id(ElementId::ColormapLegend)
                    .set("stroke", "none")
                    .set("fill", config.matrix.colormap.color(value))
                    .set("x", cmap_x + offset)
                    .set("y", cmap_y - legend.cmap_height / 2.0)
                    .set("width", block_width)
                    .set("height", legend.cmap_height)
                    .set("opacity", 0),
            );
        }
        self.push(
            text(cmap_x + legend.cmap_text_x, cmap_y + legend.text_y, "Coupling value")
                .with_id(ElementId::ColormapLegend)
                .set("opacity", 0),
        );
    }

    fn add_matrix(&mut self, config: &ViewerConfig) {
        let matrix = &config.matrix;
        self.push(
            SceneElement::new(Shape::Rect)
                .with_id(ElementId::MatrixBackground)
                .set("stroke", &matrix.background_stroke)
                .set("fill", &matrix.background_fill)
                .set("stroke-width", matrix.background_stroke_width)
                .set("opacity", 0)
                .set("x", config.axis.left)
                .set("y", config.axis.top)
                .set("width", 0)
                .set("height", 0)
                .set("filter", format!("url(#{})", SHADOW_ID)),
        );
        for (row, col) in iproduct!(0..matrix.slots, 0..matrix.slots) {
            self.push(
                SceneElement::new(Shape::Rect)
                    .with_id(ElementId::MatrixCell { row, col })
                    .set("stroke", &matrix.grid_color)
                    .set("stroke-width", matrix.grid_width)
                    .set("fill", "gray")
                    .set("opacity", 0)
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", matrix.cell_size)
                    .set("height", matrix.cell_size),
            );
        }
        for axis in [Axis::I, Axis::J] {
            for index in 0..matrix.slots {
                self.push(
                    SceneElement::new(Shape::Text)
                        .with_id(ElementId::MatrixLabel { axis, index })
                        .set("stroke", "none")
                        .set("fill", "gray")
                        .set("opacity", 0)
                        .set("font-size", &matrix.font_size)
                        .set("font-family", &matrix.font)
                        .text(" "),
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of requests applied, the resting logo layout included.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Current value of `attr` on the first element with `id`.
    pub fn attr(&self, id: ElementId, attr: Attr) -> Option<&str> {
        let element = &self.elements[*self.index.get(&id)?.first()?];
        match attr {
            Attr::Text => element.text.as_deref(),
            _ => element.attrs.get(&attr.to_string()).map(String::as_str),
        }
    }

    pub fn to_document(&self) -> Document {
        let (dx, dy, std, scale) = self.shadow;
        let filter = Filter::new()
            .set("id", SHADOW_ID)
            .set("x", "-50%")
            .set("y", "-50%")
            .set("width", "200%")
            .set("height", "200%")
            .add(
                FilterEffectOffset::new()
                    .set("in", "SourceAlpha")
                    .set("dx", dx)
                    .set("dy", dy)
                    .set("result", "offsetAlpha"),
            )
            .add(
                FilterEffectGaussianBlur::new()
                    .set("in", "offsetAlpha")
                    .set("stdDeviation", std)
                    .set("result", "blur-out"),
            )
            .add(
                FilterEffectColorMatrix::new()
                    .set("in", "blur-out")
                    .set(
                        "values",
                        format!("0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 {} 0", scale),
                    )
                    .set("result", "shadow"),
            )
            .add(
                FilterEffectBlend::new()
                    .set("in", "SourceGraphic")
                    .set("in2", "shadow")
                    .set("mode", "normal"),
            );

        let document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0.0, 0.0, self.width, self.height))
            .set("overflow", "visible")
            .add(Definitions::new().add(filter));
        self.elements
            .iter()
            .fold(document, |doc, element| doc.add(element.to_node()))
    }
}

impl Renderer for Scene {
    fn apply(&mut self, requests: &[VisualRequest]) {
        for request in requests {
            let Some(targets) = self.index.get(&request.target) else {
                debug!("no element for {:?}", request.target);
                continue;
            };
            for &k in targets {
                let element = &mut self.elements[k];
                for (attr, value) in &request.attrs {
                    match attr {
                        Attr::Text => element.text = Some(value.to_string()),
                        _ => {
                            element.attrs.insert(attr.to_string(), value.to_string());
                        }
                    }
                }
            }
            self.applied += 1;
        }
    }

    fn reset(&mut self, data: &ZoomData, config: &ViewerConfig) {
        let colors = self.colors.clone();
        *self = Scene::build(data, config, &colors);
    }
}
