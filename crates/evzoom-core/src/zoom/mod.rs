//! Focus/zoom state machine
//!
//! [`Viewer`] owns the normalized data, the geometry and the
//! [`InteractionState`]. Pointer moves and clock ticks drive it; every call
//! returns the [`VisualRequest`]s needed to bring the display up to date.
//!
//! ```no_run
//! use evzoom_core::{Viewer, ViewerConfig, ZoomData};
//!
//! let data = ZoomData::from_json_str(r#"{"logo": [[], []]}"#).unwrap();
//! let mut viewer = Viewer::new(data, ViewerConfig::default());
//! viewer.mark_ready();
//! let requests = viewer.pointer_move(100.0, 120.0);
//! ```
mod crosshair;
mod logo;
mod matrix;
mod window;

pub use window::Selection;

use crate::config::ViewerConfig;
use crate::data::{normalize, ColorScheme, LogoColumn, ZoomData};
use crate::geometry::{Cell, PlotGeometry};
use crate::source::{self, DataSource};
use crate::state::{InteractionState, Mode};
use crate::visual::{Attr, Axis, ElementId, VisualRequest};
use geo::{coord, Coord};
use log::{debug, error, info};
use logo::{LogoLayout, Placement};

pub struct Viewer {
    config: ViewerConfig,
    data: ZoomData,
    geometry: PlotGeometry,
    colors: ColorScheme,
    state: InteractionState,
    /// Milliseconds since initialization, advanced by [`Viewer::tick`].
    clock: u64,
}

impl Viewer {
    /// Normalizes `data` and sets up a viewer that is not ready yet.
    pub fn new(mut data: ZoomData, config: ViewerConfig) -> Self {
        normalize(&mut data);
        let geometry = PlotGeometry::from_config(&config, data.len());
        info!(
            "viewer with {} positions and {} couplings, ready after {} ms",
            data.len(),
            data.couplings.len(),
            config.times.load_time(data.len())
        );
        Self {
            config,
            data,
            geometry,
            colors: ColorScheme::default(),
            state: InteractionState::default(),
            clock: 0,
        }
    }

    /// A viewer without data. It never leaves `Idle`.
    pub fn empty(config: ViewerConfig) -> Self {
        Self::new(ZoomData::default(), config)
    }

    /// Loads `source`. A missing source or a failed load is logged and yields
    /// an empty viewer.
    pub fn initialize(source: Option<&DataSource>, config: ViewerConfig) -> Self {
        match source::load_source(source) {
            Ok(data) => Self::new(data, config),
            Err(e) => {
                match source {
                    Some(source) => error!("failed to load {}: {}", source, e),
                    None => error!("{}", e),
                }
                Self::empty(config)
            }
        }
    }

    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn data(&self) -> &ZoomData {
        &self.data
    }

    pub fn geometry(&self) -> &PlotGeometry {
        &self.geometry
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Skips the load grace period.
    pub fn mark_ready(&mut self) {
        self.state.viewer_ready = true;
    }

    /// Glyphs grow from nothing, staggered by their distance from the diagonal.
    pub fn intro(&self) -> Vec<VisualRequest> {
        let couplings = &self.config.couplings;
        self.data
            .couplings
            .iter()
            .enumerate()
            .flat_map(|(index, c)| {
                let stagger = couplings.intro_stagger * c.i.abs_diff(c.j) as u32;
                [
                    VisualRequest::set(ElementId::Glyph(index)).attr(Attr::Radius, 0.0),
                    VisualRequest::transition(
                        ElementId::Glyph(index),
                        couplings.intro_delay + stagger,
                        couplings.intro_duration,
                    )
                    .attr(Attr::Radius, self.geometry.radius_for(c.score)),
                ]
            })
            .collect()
    }

    /// Records the pointer position and reacts to it. Inside a glyph the
    /// pointer snaps to that coupling's cell.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<VisualRequest> {
        self.locate(coord! { x: x, y: y });
        self.update()
    }

    fn locate(&mut self, p: Coord<f64>) {
        let mut cell = self.geometry.cell_at(p);
        if let Some(nearest) = self.geometry.nearest_to_cell(cell, &self.data.couplings) {
            if nearest.edge_distance < 0.0 {
                let (i, j) = self.data.couplings[nearest.index].anchor();
                cell = Cell::new(i, j);
            }
        }
        self.state.pointer = p;
        self.state.on_plot = !self.data.is_empty() && self.geometry.contains(p);
        self.state.cell = cell;
    }

    /// Moves focus onto the coupling nearest the current pointer cell.
    pub fn focus_nearest(&mut self) -> Vec<VisualRequest> {
        if let Some(nearest) = self
            .geometry
            .nearest_to_cell(self.state.cell, &self.data.couplings)
        {
            let (i, j) = self.data.couplings[nearest.index].anchor();
            self.state.cell = Cell::new(i, j);
        }
        self.update()
    }

    /// Advances the clock by one period. Dwell accumulates while the cell is
    /// unchanged and no match is built; the update runs once, on the first
    /// tick past the threshold.
    pub fn tick(&mut self) -> Vec<VisualRequest> {
        let times = &self.config.times;
        let period = times.global_tick;
        self.clock += period as u64;
        if !self.state.viewer_ready && self.clock > times.load_time(self.data.len()) {
            debug!("viewer ready at {} ms", self.clock);
            self.state.viewer_ready = true;
        }

        if self.state.viewer_ready {
            if !self.state.match_active && !self.state.coords_changed() {
                self.state.dwell = self.state.dwell.saturating_add(period);
            } else {
                self.state.dwell = 0;
            }
        }

        let past = self.state.dwell as i64 - times.matched_time_threshold as i64;
        if past > 0 && past <= period as i64 {
            self.update()
        } else {
            vec![]
        }
    }

    /// Replaces the data set. The display is expected to be rebuilt from
    /// [`Viewer::data`]. Any focus refers to the old couplings and is dropped;
    /// the pointer is re-mapped onto the new plot and the zoom rebuilds on the
    /// next update.
    pub fn reload(&mut self, mut data: ZoomData) -> Vec<VisualRequest> {
        normalize(&mut data);
        self.geometry = PlotGeometry::from_config(&self.config, data.len());
        self.data = data;
        info!(
            "reloaded {} positions and {} couplings",
            self.data.len(),
            self.data.couplings.len()
        );

        let requests = if self.state.focus.is_some() || self.state.match_active {
            matrix::hide(&self.config)
        } else {
            vec![]
        };
        self.reset_focus();
        self.state.zoom_active = false;
        self.locate(self.state.pointer);
        self.state.previous = self.state.cell;
        requests
    }

    fn validate_focus(&mut self) -> Vec<VisualRequest> {
        match self.state.focus {
            Some(focus) if focus >= self.data.couplings.len() => {
                debug!("focused coupling {} no longer exists", focus);
                self.reset_focus();
                matrix::hide(&self.config)
            }
            _ => vec![],
        }
    }

    fn reset_focus(&mut self) {
        self.state.focus = None;
        self.state.match_active = false;
        self.state.dwell = 0;
    }

    fn logo_layout(&self) -> LogoLayout<'_> {
        LogoLayout {
            config: &self.config,
            geometry: &self.geometry,
            logo: &self.data.logo,
        }
    }

    /// Recomputes the display from the current state. Calling it again with
    /// nothing changed returns no requests.
    pub fn update(&mut self) -> Vec<VisualRequest> {
        let mode = self.mode();
        let mut requests = self.validate_focus();
        if self.state.coords_changed() {
            self.state.dwell = 0;
        }

        let state = &self.state;
        let changed = state.coords_changed();
        let delay_over = state.dwell > self.config.times.matched_time_threshold;
        let leaving = state.zoom_active && !state.on_plot;
        // back on the plot, or the display was rebuilt, without a cell change
        let entering = state.on_plot && !state.zoom_active;
        let refresh = changed || entering;

        if state.viewer_ready
            && (refresh || leaving || (delay_over && !state.match_active))
        {
            let (cell, previous, on_plot) = (state.cell, state.previous, state.on_plot);

            if refresh || leaving {
                if on_plot {
                    requests.extend(crosshair::show(
                        &self.config,
                        &self.geometry,
                        &self.data.map,
                        cell,
                    ));
                } else {
                    requests.extend(crosshair::hide(&self.config));
                }
                requests.extend(crosshair::highlight(
                    &self.config,
                    &self.data.couplings,
                    cell,
                    on_plot,
                    self.data.len(),
                ));
            }

            if leaving {
                let layout = self.logo_layout();
                requests.extend(layout.contract(Axis::I, previous.i));
                requests.extend(layout.contract(Axis::J, previous.j));
                self.state.zoom_active = false;
            }

            if on_plot && refresh {
                let fresh = !self.state.zoom_active;
                let layout = self.logo_layout();
                if fresh || cell.i != previous.i {
                    let from = if fresh { cell.i } else { previous.i };
                    requests.extend(layout.expand(Axis::I, cell.i, from));
                }
                if fresh || cell.j != previous.j {
                    let from = if fresh { cell.j } else { previous.j };
                    requests.extend(layout.expand(Axis::J, cell.j, from));
                }
                self.state.zoom_active = true;
            }

            let match_active = self.state.match_active;
            if on_plot && ((!match_active && delay_over) || (match_active && changed)) {
                requests.extend(self.update_match(cell));
            }
        }

        self.state.previous = self.state.cell;
        let next = self.mode();
        if next != mode {
            debug!("{} -> {} at ({}, {})", mode, next, self.state.cell.i, self.state.cell.j);
        }
        requests
    }

    /// Looks up the coupling under `cell`, drops a focus the pointer has
    /// strayed too far from and builds the matrix of a new match.
    fn update_match(&mut self, cell: Cell) -> Vec<VisualRequest> {
        self.state.match_active = true;
        let couplings = &self.data.couplings;
        let found = couplings
            .iter()
            .rposition(|c| c.anchor() == (cell.i, cell.j));

        let mut requests = vec![];
        let focus_distance = self
            .state
            .focus
            .and_then(|f| couplings.get(f))
            .map_or(0.0, |c| self.geometry.edge_distance(cell, c));
        if focus_distance > self.config.zoom.radius as f64 {
            debug!("focus lost at distance {:.2}", focus_distance);
            requests.extend(matrix::hide(&self.config));
            self.reset_focus();
        }

        if let Some(index) = found {
            if self.state.focus != Some(index) {
                debug!("building matrix for coupling {}", index);
                requests.extend(matrix::build(
                    &self.config,
                    &self.geometry,
                    &self.colors,
                    index,
                    &self.data.couplings[index],
                    cell,
                ));
                self.state.focus = Some(index);
            }
        }
        requests
    }

    pub fn resting_logo(&self) -> Vec<VisualRequest> {
        resting_logo(&self.config, &self.geometry, &self.data.logo)
    }
}

/// Resting layout of every logo column on both axes, for renderers building
/// a scene.
pub fn resting_logo(
    config: &ViewerConfig,
    geometry: &PlotGeometry,
    logo: &[LogoColumn],
) -> Vec<VisualRequest> {
    let layout = LogoLayout {
        config,
        geometry,
        logo,
    };
    [Axis::I, Axis::J]
        .into_iter()
        .flat_map(|axis| {
            (0..logo.len())
                .flat_map(|k| layout.column(axis, k, Placement::Resting, 0, 0))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Coupling, LogoEntry, PositionMap};

    fn coupling(i: usize, j: usize, score: f64, value: f64) -> Coupling {
        Coupling {
            i,
            j,
            score,
            matrix: vec![vec![value]],
            i_labels: vec!["K".into()],
            j_labels: vec!["D".into()],
        }
    }

    fn data() -> ZoomData {
        ZoomData {
            couplings: vec![coupling(3, 9, 5.0, 2.0), coupling(2, 5, 10.0, 1.0)],
            logo: (0..10)
                .map(|_| {
                    LogoColumn::new(vec![
                        LogoEntry { code: 'A', bits: 0.5 },
                        LogoEntry { code: 'L', bits: 1.0 },
                    ])
                })
                .collect(),
            map: PositionMap {
                indices: (1..=10).collect(),
                letters: "MKT-YIAKQR".chars().map(String::from).collect(),
            },
        }
    }

    // Tiny glyphs, so the pointer never snaps.
    fn viewer() -> Viewer {
        let config = ViewerConfig::builder()
            .couplings(crate::config::CouplingConfig::builder().max_radius(0.1).build())
            .build();
        let mut viewer = Viewer::new(data(), config);
        viewer.mark_ready();
        viewer
    }

    // Pixel centre of cell (i, j) on the default 450px plot with 10 positions.
    fn center(i: i64, j: i64) -> (f64, f64) {
        (70.0 + 45.0 * i as f64 + 22.5, 100.0 + 45.0 * j as f64 + 22.5)
    }

    fn tick_until_quiet(viewer: &mut Viewer, ticks: usize) -> Vec<VisualRequest> {
        (0..ticks).flat_map(|_| viewer.tick()).collect()
    }

    #[test]
    fn test_new_normalizes() {
        let viewer = viewer();
        let scores: Vec<f64> = viewer.data().couplings.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![1.0, 0.5]);
        assert_eq!(viewer.mode(), Mode::Idle);
    }

    #[test]
    fn test_enter_zooms_without_dwell() {
        let mut viewer = viewer();
        let (x, y) = center(4, 4);
        let requests = viewer.pointer_move(x, y);
        assert_eq!(viewer.mode(), Mode::ZoomedUnmatched);
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::Crosshair(Axis::I)));
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::ZoomLine(Axis::J)));
        assert!(!requests
            .iter()
            .any(|r| r.target == ElementId::MatrixBackground));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut viewer = viewer();
        let (x, y) = center(1, 4);
        assert!(!viewer.pointer_move(x, y).is_empty());
        assert!(viewer.update().is_empty());
        assert!(viewer.pointer_move(x + 1.0, y).is_empty());
    }

    #[test]
    fn test_dwell_builds_matrix_once() {
        let mut viewer = viewer();
        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);

        // 150 ms is not enough; the update fires on the tick reaching 160
        let early = tick_until_quiet(&mut viewer, 15);
        assert!(early.is_empty());
        assert_eq!(viewer.state().dwell, 150);
        let matched = viewer.tick();
        assert_eq!(viewer.mode(), Mode::Matched);
        assert_eq!(viewer.state().focus, Some(0));
        assert!(matched
            .iter()
            .any(|r| r.target == ElementId::MatrixBackground && r.get(Attr::Width).is_some()));

        // dwell stays at zero once matched, so nothing fires again
        assert!(tick_until_quiet(&mut viewer, 50).is_empty());
        assert_eq!(viewer.state().dwell, 0);
    }

    #[test]
    fn test_moving_resets_dwell() {
        let mut viewer = viewer();
        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);
        tick_until_quiet(&mut viewer, 10);
        assert_eq!(viewer.state().dwell, 100);

        let (x, y) = center(2, 4);
        viewer.pointer_move(x, y);
        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);
        // each move restarted the dwell
        tick_until_quiet(&mut viewer, 10);
        assert_eq!(viewer.state().dwell, 100);
        assert_eq!(viewer.mode(), Mode::ZoomedUnmatched);
    }

    #[test]
    fn test_not_ready_emits_nothing() {
        let mut viewer = Viewer::new(data(), ViewerConfig::default());
        let (x, y) = center(1, 4);
        assert!(viewer.pointer_move(x, y).is_empty());
        // grace period for 10 positions is 750 ms
        assert!(tick_until_quiet(&mut viewer, 75).is_empty());
        assert!(!viewer.state().viewer_ready);
        viewer.tick();
        assert!(viewer.state().viewer_ready);
        assert_eq!(viewer.clock(), 760);
    }

    #[test]
    fn test_focus_slides_and_drops_when_far() {
        let mut viewer = viewer();
        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);
        tick_until_quiet(&mut viewer, 16);
        assert_eq!(viewer.state().focus, Some(0));

        // second coupling anchor (2, 8): focus slides over without dwelling
        let (x, y) = center(2, 8);
        let requests = viewer.pointer_move(x, y);
        assert_eq!(viewer.state().focus, Some(1));
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::MatrixCell { row: 0, col: 0 }
                && r.get(Attr::Fill).is_some()));

        // far corner: more than five cells away from (2, 8)
        let (x, y) = center(9, 0);
        let requests = viewer.pointer_move(x, y);
        assert_eq!(viewer.state().focus, None);
        assert_eq!(viewer.state().dwell, 0);
        assert_eq!(viewer.mode(), Mode::ZoomedUnmatched);
        let background = requests
            .iter()
            .rfind(|r| r.target == ElementId::MatrixBackground)
            .unwrap();
        assert_eq!(background.get(Attr::Opacity).and_then(|v| v.as_f64()), Some(0.0));
    }

    #[test]
    fn test_leave_contracts_and_hides() {
        let mut viewer = viewer();
        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);
        let requests = viewer.pointer_move(10.0, 10.0);
        assert_eq!(viewer.mode(), Mode::Idle);
        assert!(!viewer.state().zoom_active);
        let crosshair = requests
            .iter()
            .find(|r| r.target == ElementId::Crosshair(Axis::J))
            .unwrap();
        assert_eq!(crosshair.get(Attr::Opacity).and_then(|v| v.as_f64()), Some(0.0));
        assert!(requests.iter().any(|r| matches!(
            r.target,
            ElementId::LogoBlock { axis: Axis::I, column: 6, .. }
        ) && r.duration == 150));
    }

    #[test]
    fn test_snaps_into_glyph() {
        let mut viewer = Viewer::new(data(), ViewerConfig::default());
        viewer.mark_ready();
        // full-score radius is 3 * sqrt(45) px, far larger than a cell
        let (x, y) = center(2, 5);
        viewer.pointer_move(x, y);
        assert_eq!(viewer.state().cell, Cell::new(1, 4));
    }

    #[test]
    fn test_focus_nearest() {
        let mut viewer = viewer();
        let (x, y) = center(7, 7);
        viewer.pointer_move(x, y);
        viewer.focus_nearest();
        assert_eq!(viewer.state().cell, Cell::new(2, 8));
    }

    #[test]
    fn test_reload_drops_stale_focus() {
        let mut viewer = viewer();
        let (x, y) = center(2, 8);
        viewer.pointer_move(x, y);
        tick_until_quiet(&mut viewer, 16);
        assert_eq!(viewer.state().focus, Some(1));

        let mut smaller = data();
        smaller.couplings.truncate(1);
        let requests = viewer.reload(smaller);
        assert_eq!(viewer.state().focus, None);
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::ColormapLegend));
        assert_eq!(viewer.mode(), Mode::Hovering);
        // the zoom comes back on the next update, then the display is settled
        assert!(!viewer.update().is_empty());
        assert_eq!(viewer.mode(), Mode::ZoomedUnmatched);
        assert!(viewer.update().is_empty());
    }

    #[test]
    fn test_reload_rematches_reused_index() {
        let mut viewer = viewer();
        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);
        tick_until_quiet(&mut viewer, 16);
        assert_eq!(viewer.mode(), Mode::Matched);

        // index 0 survives the reload but names a different coupling
        let mut moved = data();
        moved.couplings.truncate(1);
        moved.couplings[0].i = 7;
        moved.couplings[0].j = 9;
        let requests = viewer.reload(moved);
        assert_eq!(viewer.state().focus, None);
        assert!(!viewer.state().match_active);
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::MatrixBackground));

        let (x, y) = center(6, 8);
        viewer.pointer_move(x, y);
        let matched = tick_until_quiet(&mut viewer, 16);
        assert_eq!(viewer.mode(), Mode::Matched);
        assert_eq!(viewer.state().focus, Some(0));
        assert!(matched
            .iter()
            .any(|r| r.target == ElementId::MatrixBackground && r.get(Attr::Width).is_some()));
    }

    #[test]
    fn test_reenter_same_snapped_cell() {
        let mut data = data();
        data.couplings.retain(|c| (c.i, c.j) == (2, 5));
        let mut viewer = Viewer::new(data, ViewerConfig::default());
        viewer.mark_ready();

        viewer.pointer_move(300.0, 300.0);
        assert_eq!(viewer.mode(), Mode::ZoomedUnmatched);
        viewer.pointer_move(60.0, 300.0);
        assert_eq!(viewer.mode(), Mode::Idle);
        // the glyph is wide enough that both points snap to (1, 4)
        assert_eq!(viewer.state().cell, Cell::new(1, 4));

        let requests = viewer.pointer_move(300.0, 300.0);
        assert_eq!(viewer.mode(), Mode::ZoomedUnmatched);
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::Crosshair(Axis::I)
                && r.get(Attr::Opacity).and_then(|v| v.as_f64()) == Some(0.06)));
        assert!(requests
            .iter()
            .any(|r| r.target == ElementId::ZoomLine(Axis::J)));
        assert!(viewer.pointer_move(310.0, 310.0).is_empty());
    }

    #[test]
    fn test_duplicate_anchor_last_wins() {
        let mut data = data();
        let mut twin = data.couplings[1].clone();
        twin.score = 1.0;
        data.couplings.push(twin);
        let config = ViewerConfig::builder()
            .couplings(crate::config::CouplingConfig::builder().max_radius(0.1).build())
            .build();
        let mut viewer = Viewer::new(data, config);
        viewer.mark_ready();
        let anchors: Vec<(i64, i64)> = viewer.data().couplings.iter().map(|c| c.anchor()).collect();
        let last = anchors.iter().rposition(|&a| a == (1, 4)).unwrap();

        let (x, y) = center(1, 4);
        viewer.pointer_move(x, y);
        tick_until_quiet(&mut viewer, 16);
        assert_eq!(viewer.state().focus, Some(last));
    }

    #[test]
    fn test_empty_viewer_stays_idle() {
        let mut viewer = Viewer::empty(ViewerConfig::default());
        viewer.mark_ready();
        assert!(viewer.pointer_move(300.0, 300.0).is_empty());
        assert_eq!(viewer.mode(), Mode::Idle);
        assert!(viewer.intro().is_empty());
    }

    #[test]
    fn test_intro_staggers() {
        let viewer = viewer();
        let requests = viewer.intro();
        assert_eq!(requests.len(), 4);
        // (2, 5) sorts first: 400 + 5 * 3
        assert_eq!(requests[1].delay, 415);
        assert_eq!(requests[3].delay, 430);
        assert_eq!(requests[1].get(Attr::Radius).and_then(|v| v.as_f64()), Some(0.1));
    }
}
