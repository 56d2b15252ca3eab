//! Uniform bucket grid for narrowing the neighbour scan.
//!
//! Cells are at least as wide as the largest neighbour radius in the flock, so
//! every boid within reach of a position lies in the 3x3 block of cells around
//! it. Candidates come back in ascending index order, which keeps force
//! summation order (and therefore the floating-point result) identical to the
//! brute-force scan.

use crate::boid::Boid;
use crate::config::Bounds;
use crate::vector::Vector3;

/// Upper bound on cells along either axis; larger domains get wider cells.
const MAX_CELLS_PER_AXIS: usize = 512;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Buckets every boid by position. Returns `None` when the flock has no
    /// usable neighbour radius, in which case callers scan everything.
    pub fn build(boids: &[Boid], bounds: &Bounds) -> Option<Self> {
        let reach = boids.iter().map(Boid::reach).fold(0.0f32, f32::max);
        if !(reach.is_finite() && reach > 0.0) {
            return None;
        }

        let width = bounds.width.max(0.0);
        let height = bounds.height.max(0.0);
        let cell_size = reach
            .max(width / MAX_CELLS_PER_AXIS as f32)
            .max(height / MAX_CELLS_PER_AXIS as f32);
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);

        let mut grid = Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        };
        for (index, boid) in boids.iter().enumerate() {
            let (col, row) = grid.cell_of(&boid.position);
            grid.cells[row * cols + col].push(index);
        }
        Some(grid)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Indices of every boid in the cell containing `position` and the eight
    /// cells around it, sorted ascending.
    pub fn candidates(&self, position: &Vector3) -> Vec<usize> {
        let (col, row) = self.cell_of(position);
        let mut result = Vec::new();

        for r in row.saturating_sub(1)..=(row + 1).min(self.rows - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(self.cols - 1) {
                result.extend_from_slice(&self.cells[r * self.cols + c]);
            }
        }

        result.sort_unstable();
        result
    }

    // Out-of-domain positions clamp into the edge cells. Clamping never pulls
    // two cells further apart, so the 3x3 neighbourhood still covers them.
    fn cell_of(&self, position: &Vector3) -> (usize, usize) {
        let col = Self::axis_cell(position.x, self.cell_size, self.cols);
        let row = Self::axis_cell(position.y, self.cell_size, self.rows);
        (col, row)
    }

    fn axis_cell(coordinate: f32, cell_size: f32, count: usize) -> usize {
        let cell = (coordinate / cell_size).floor();
        if cell.is_nan() || cell < 0.0 {
            0
        } else {
            (cell as usize).min(count - 1)
        }
    }
}
