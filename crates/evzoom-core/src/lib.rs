//! # evzoom-core
//!
//! Interaction core of a coupling-map viewer: a sequence logo drawn along two
//! axes of a contact map, a hover-driven logo zoom, and a substitution-matrix
//! widget that opens once the pointer settles on a coupling.
//!
//! The core never draws. [`Viewer`] turns pointer moves and clock ticks into
//! [`VisualRequest`]s, and a [`Renderer`] applies them.
//!
//! ```no_run
//! use evzoom_core::{source, Session, Viewer, ViewerConfig, VisualRequest};
//!
//! let source = source::resolve(Some("couplings.json"), None, None);
//! let viewer = Viewer::initialize(source.as_ref(), ViewerConfig::default());
//! let mut session = Session::new(viewer, Vec::<VisualRequest>::new());
//! session.sender().pointer_move(120.0, 240.0);
//! let _ = session.run_pending();
//! ```
pub mod colormap;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod session;
pub mod shapes;
pub mod source;
pub mod state;
pub mod visual;
pub mod zoom;

pub use config::ViewerConfig;
pub use data::{AaGroup, ColorScheme, Coupling, LogoColumn, LogoEntry, PositionMap, ZoomData};
pub use error::{Error, Result};
pub use geometry::{Cell, PlotGeometry};
pub use session::{spawn_ticker, EventSender, Session, Ticker, ViewerEvent};
pub use source::DataSource;
pub use state::{InteractionState, Mode};
pub use visual::{Attr, AttrValue, Axis, Ease, ElementId, Renderer, VisualRequest};
pub use zoom::Viewer;
