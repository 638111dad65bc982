/*
This file is part of the Building Aggregration Tool
Copyright (C) 2022 Novel-T

The Building Aggregration Tool is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use ndarray::Array2;

use crate::error::{Error, Result};

/// The square elevation grid (C1). Dense point ids are row-major from the
/// top-left corner: `id = row * width + col`. Only points at least
/// `max_line_of_sight` away from every edge are "computable" — close enough
/// to an edge and the sweep can't see a full 360 degrees of context.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    pub max_line_of_sight: f64,
    pub max_los_cells: usize,
    pub computable_width: usize,
    pub elevations: Array2<f32>,
    pub header: [u8; 256],
}

impl Grid {
    pub fn new(width: usize, height: usize, scale: f64, max_line_of_sight: f64) -> Result<Self> {
        if width != height {
            return Err(Error::configuration("non-square grids are not supported"));
        }
        let max_los_cells = (max_line_of_sight / scale).floor() as usize;
        if width <= 2 * max_los_cells {
            return Err(Error::configuration(
                "DEM is too small for the requested max_line_of_sight",
            ));
        }
        let computable_width = width - 2 * max_los_cells;
        Ok(Grid {
            width,
            height,
            scale,
            max_line_of_sight,
            max_los_cells,
            computable_width,
            elevations: Array2::zeros((height, width)),
            header: [0u8; 256],
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn id(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn row_col(&self, id: usize) -> (usize, usize) {
        (id / self.width, id % self.width)
    }

    #[inline]
    pub fn elevation(&self, id: usize) -> f32 {
        let (row, col) = self.row_col(id);
        self.elevations[[row, col]]
    }

    /// A point is computable when a full-radius sweep around it never
    /// leaves the grid, i.e. it is at least `max_los_cells` away from
    /// every edge.
    pub fn is_computable(&self, id: usize) -> bool {
        let (row, col) = self.row_col(id);
        row >= self.max_los_cells
            && col >= self.max_los_cells
            && row < self.height - self.max_los_cells
            && col < self.width - self.max_los_cells
    }

    /// Maps a computable point id to its `(row, col)` position in the
    /// shrunk TVS raster, or `None` if the point isn't computable.
    pub fn pov_to_tvs(&self, id: usize) -> Option<(usize, usize)> {
        if !self.is_computable(id) {
            return None;
        }
        let (row, col) = self.row_col(id);
        Some((row - self.max_los_cells, col - self.max_los_cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_row_col_are_inverses() {
        let grid = Grid::new(9, 9, 10.0, 20.0).unwrap();
        for row in 0..grid.height {
            for col in 0..grid.width {
                let id = grid.id(row, col);
                assert_eq!(grid.row_col(id), (row, col));
            }
        }
    }

    #[test]
    fn computable_region_is_centered_square() {
        let grid = Grid::new(9, 9, 10.0, 20.0).unwrap();
        assert_eq!(grid.max_los_cells, 2);
        assert_eq!(grid.computable_width, 5);
        assert!(grid.is_computable(grid.id(4, 4)));
        assert!(!grid.is_computable(grid.id(0, 0)));
        assert!(!grid.is_computable(grid.id(1, 4)));
        assert!(grid.is_computable(grid.id(2, 2)));
    }

    #[test]
    fn pov_to_tvs_shifts_by_margin() {
        let grid = Grid::new(9, 9, 10.0, 20.0).unwrap();
        assert_eq!(grid.pov_to_tvs(grid.id(2, 2)), Some((0, 0)));
        assert_eq!(grid.pov_to_tvs(grid.id(6, 6)), Some((4, 4)));
        assert_eq!(grid.pov_to_tvs(grid.id(0, 0)), None);
    }

    #[test]
    fn rejects_non_square() {
        assert!(Grid::new(9, 8, 10.0, 20.0).is_err());
    }
}
