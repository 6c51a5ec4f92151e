//! Interaction state
//!
//! One instance per viewer, written only by the state machine.
use crate::geometry::Cell;
use geo::Coord;
use serde::Serialize;
use strum::Display;

/// Display mode derived from the interaction flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
pub enum Mode {
    /// Pointer is off the plot.
    Idle,
    /// On the plot, logo zoom not built yet.
    Hovering,
    /// Crosshairs and logo zoom active, no coupling focused.
    ZoomedUnmatched,
    /// A coupling is focused and its matrix is displayed.
    Matched,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub pointer: Coord<f64>,
    pub cell: Cell,
    pub previous: Cell,
    pub focus: Option<usize>,
    /// Milliseconds spent on `cell` with no match built.
    pub dwell: u32,
    pub zoom_active: bool,
    /// A match lookup has run for the current dwell episode.
    pub match_active: bool,
    pub viewer_ready: bool,
    pub on_plot: bool,
}

impl InteractionState {
    pub fn coords_changed(&self) -> bool {
        self.cell != self.previous
    }

    pub fn mode(&self) -> Mode {
        if !self.on_plot {
            Mode::Idle
        } else if self.focus.is_some() {
            Mode::Matched
        } else if self.zoom_active {
            Mode::ZoomedUnmatched
        } else {
            Mode::Hovering
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode() {
        let mut state = InteractionState::default();
        assert_eq!(state.mode(), Mode::Idle);
        state.on_plot = true;
        assert_eq!(state.mode(), Mode::Hovering);
        state.zoom_active = true;
        assert_eq!(state.mode(), Mode::ZoomedUnmatched);
        state.focus = Some(2);
        assert_eq!(state.mode(), Mode::Matched);
        state.on_plot = false;
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn test_coords_changed() {
        let mut state = InteractionState::default();
        assert!(!state.coords_changed());
        state.cell = Cell::new(0, 1);
        assert!(state.coords_changed());
        state.previous = state.cell;
        assert!(!state.coords_changed());
    }
}
