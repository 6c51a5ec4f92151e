//! # evzoom-svg
//!
//! SVG rendering of the coupling-map viewer. A [`Scene`] holds every element
//! the viewer addresses and implements [`Renderer`](evzoom_core::Renderer),
//! so a session can drive it directly and the result can be written out as a
//! static SVG snapshot.
//!
//! ```no_run
//! use evzoom_core::{Session, Viewer, ViewerConfig, ZoomData};
//! use evzoom_svg::Scene;
//!
//! let data = ZoomData::from_json_str("{}").unwrap_or_default();
//! let viewer = Viewer::new(data, ViewerConfig::default());
//! let scene = Scene::from_viewer(&viewer);
//! let session = Session::new(viewer, scene);
//! evzoom_svg::save("viewer.svg", session.renderer()).unwrap();
//! ```
mod scene;

pub use scene::Scene;

use evzoom_core::Viewer;
use std::path::Path;

impl Scene {
    pub fn from_viewer(viewer: &Viewer) -> Self {
        Scene::build(viewer.data(), viewer.config(), viewer.colors())
    }
}

/// Writes the current state of `scene` to `path`.
pub fn save<P: AsRef<Path>>(path: P, scene: &Scene) -> std::io::Result<()> {
    svg::save(path, &scene.to_document())
}
