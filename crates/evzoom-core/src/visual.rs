//! Visual requests
//!
//! The state machine never touches a drawing surface. It emits
//! [`VisualRequest`]s: an element, the attribute values it should end up with,
//! and when/how long the change should animate. A [`Renderer`] applies them;
//! a newer request for the same attribute supersedes an older one.
use crate::config::ViewerConfig;
use crate::data::ZoomData;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// Which sequence axis an element belongs to. `I` runs horizontally (the logo
/// above the plot, the vertical crosshair band), `J` vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Axis {
    I,
    J,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementId {
    Crosshair(Axis),
    CrosshairLabel(Axis),
    /// Coupling glyph, by index into the normalized couplings.
    Glyph(usize),
    LogoLetter { axis: Axis, column: usize, entry: usize },
    LogoBlock { axis: Axis, column: usize, entry: usize },
    ZoomLine(Axis),
    ZoomNotch(Axis),
    MatrixBackground,
    MatrixCell { row: usize, col: usize },
    MatrixLabel { axis: Axis, index: usize },
    ColormapLegend,
}

/// Attribute names, rendered as their SVG spelling.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
pub enum Attr {
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "y")]
    Y,
    #[strum(serialize = "width")]
    Width,
    #[strum(serialize = "height")]
    Height,
    #[strum(serialize = "x1")]
    X1,
    #[strum(serialize = "x2")]
    X2,
    #[strum(serialize = "y1")]
    Y1,
    #[strum(serialize = "y2")]
    Y2,
    #[strum(serialize = "r")]
    Radius,
    #[strum(serialize = "opacity")]
    Opacity,
    #[strum(serialize = "fill")]
    Fill,
    #[strum(serialize = "stroke")]
    Stroke,
    #[strum(serialize = "stroke-width")]
    StrokeWidth,
    #[strum(serialize = "transform")]
    Transform,
    #[strum(serialize = "d")]
    Path,
    /// Text content rather than an attribute.
    #[strum(serialize = "text")]
    Text,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

/// Interpolation curve of a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Ease {
    Linear,
    /// Symmetric cubic in-out.
    #[default]
    Cubic,
}

impl Ease {
    /// Eased progress for `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Cubic if t < 0.5 => 4.0 * t * t * t,
            Ease::Cubic => {
                let u = 2.0 * t - 2.0;
                0.5 * u * u * u + 1.0
            }
        }
    }
}

/// Target state for one element, reached after `delay` over `duration` ms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualRequest {
    pub target: ElementId,
    pub attrs: Vec<(Attr, AttrValue)>,
    pub delay: u32,
    pub duration: u32,
    #[serde(default)]
    pub ease: Ease,
}

impl VisualRequest {
    /// Applied immediately.
    pub fn set(target: ElementId) -> Self {
        Self {
            target,
            attrs: Vec::new(),
            delay: 0,
            duration: 0,
            ease: Ease::default(),
        }
    }

    pub fn transition(target: ElementId, delay: u32, duration: u32) -> Self {
        Self {
            target,
            attrs: Vec::new(),
            delay,
            duration,
            ease: Ease::default(),
        }
    }

    pub fn attr(mut self, attr: Attr, value: impl Into<AttrValue>) -> Self {
        self.attrs.push((attr, value.into()));
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn get(&self, attr: Attr) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .rev()
            .find(|(a, _)| *a == attr)
            .map(|(_, v)| v)
    }

    pub fn is_immediate(&self) -> bool {
        self.delay == 0 && self.duration == 0
    }
}

/// Consumer of visual requests.
pub trait Renderer {
    fn apply(&mut self, requests: &[VisualRequest]);

    /// Rebuilds the scene for a new data set. Called before the requests of a
    /// reload are applied.
    fn reset(&mut self, _data: &ZoomData, _config: &ViewerConfig) {}
}

/// Records requests; used by tests and request traces.
impl Renderer for Vec<VisualRequest> {
    fn apply(&mut self, requests: &[VisualRequest]) {
        self.extend_from_slice(requests);
    }
}

/// `translate(x,y) rotate(r) scale(sx,sy)` as used by logo letters.
pub fn letter_transform(x: f64, y: f64, rotate: f64, sx: f64, sy: f64) -> String {
    format!("translate({},{}) rotate({}) scale({},{})", x, y, rotate, sx, sy)
}
