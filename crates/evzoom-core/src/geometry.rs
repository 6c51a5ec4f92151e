//! Geometry
//!
//! Maps logical positions of the contact map to pixels and back. `i` runs
//! along the horizontal axis and `j` along the vertical one; both are
//! zero-based.
use crate::config::ViewerConfig;
use crate::data::Coupling;
use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// A logical cell of the contact map. Off-plot pointers map to cells outside
/// `[0, L)`, hence the signed coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: i64,
    pub j: i64,
}

impl Cell {
    pub fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    pub fn distance_to(&self, i: i64, j: i64) -> f64 {
        ((self.i - i) as f64).hypot((self.j - j) as f64)
    }
}

/// Result of [`PlotGeometry::nearest_coupling`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub index: usize,
    /// Distance from the cell to the glyph edge; negative inside the glyph.
    pub edge_distance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotGeometry {
    rect: Rect<f64>,
    length: usize,
    max_radius: f64,
}

impl PlotGeometry {
    /// Full-score glyph radius defaults to `3 * sqrt(bar width)`.
    pub fn new(rect: Rect<f64>, length: usize) -> Self {
        let mut geometry = Self {
            rect,
            length,
            max_radius: 0.0,
        };
        geometry.max_radius = 3.0 * geometry.bar_width().sqrt();
        geometry
    }

    pub fn from_config(config: &ViewerConfig, length: usize) -> Self {
        let geometry = Self::new(config.axis.rect(), length);
        let max_radius = config
            .couplings
            .max_radius
            .unwrap_or(config.couplings.radius_scale * geometry.bar_width().sqrt());
        geometry.with_max_radius(max_radius)
    }

    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = max_radius;
        self
    }

    pub fn rect(&self) -> Rect<f64> {
        self.rect
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    // An empty sequence still gets a finite scale.
    fn positions(&self) -> f64 {
        self.length.max(1) as f64
    }

    pub fn column_to_x(&self, i: f64) -> f64 {
        self.rect.min().x + i * self.rect.width() / self.positions()
    }

    pub fn row_to_y(&self, j: f64) -> f64 {
        self.rect.min().y + j * self.rect.height() / self.positions()
    }

    pub fn length_to_pixels(&self, n: f64) -> f64 {
        n * self.rect.width() / self.positions()
    }

    pub fn bar_width(&self) -> f64 {
        self.length_to_pixels(1.0)
    }

    /// Strictly inside the plot; the border itself counts as off-plot.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
    }

    pub fn cell_at(&self, p: Coord<f64>) -> Cell {
        let min = self.rect.min();
        let n = self.length as f64;
        Cell {
            i: ((p.x - min.x) / self.rect.width() * n).floor() as i64,
            j: ((p.y - min.y) / self.rect.height() * n).floor() as i64,
        }
    }

    /// Glyph radius; area grows linearly with the normalized score.
    pub fn radius_for(&self, score: f64) -> f64 {
        self.max_radius * score.max(0.0).sqrt()
    }

    pub fn edge_distance(&self, cell: Cell, coupling: &Coupling) -> f64 {
        let (ci, cj) = coupling.anchor();
        cell.distance_to(ci, cj) - self.radius_for(coupling.score)
    }

    /// Coupling whose glyph edge is closest to `cell`. Ties keep the earliest.
    pub fn nearest_to_cell(&self, cell: Cell, couplings: &[Coupling]) -> Option<Nearest> {
        couplings
            .iter()
            .enumerate()
            .map(|(index, c)| Nearest {
                index,
                edge_distance: self.edge_distance(cell, c),
            })
            .fold(None, |best: Option<Nearest>, candidate| match best {
                Some(b) if !(candidate.edge_distance < b.edge_distance) => Some(b),
                _ => Some(candidate),
            })
    }

    pub fn nearest_coupling(&self, p: Coord<f64>, couplings: &[Coupling]) -> Option<Nearest> {
        self.nearest_to_cell(self.cell_at(p), couplings)
    }
}
