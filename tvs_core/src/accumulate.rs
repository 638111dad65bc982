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

use crate::grid::Grid;
use crate::sector::SectorOutput;

/// The TVS accumulator (C7): sums every sector's contribution into the
/// final raster, one cell per computable grid point.
pub struct TvsAccumulator {
    pub surface: Array2<f32>,
    pub volume: Option<Array2<f32>>,
}

impl TvsAccumulator {
    pub fn new(computable_width: usize, with_volume: bool) -> Self {
        TvsAccumulator {
            surface: Array2::zeros((computable_width, computable_width)),
            volume: with_volume.then(|| Array2::zeros((computable_width, computable_width))),
        }
    }

    pub fn merge_sector(&mut self, grid: &Grid, output: &SectorOutput) {
        for id in 0..grid.len() {
            if let Some((row, col)) = grid.pov_to_tvs(id) {
                self.surface[[row, col]] += output.surface[id];
                if let (Some(acc_vol), Some(sector_vol)) =
                    (self.volume.as_mut(), output.volume.as_ref())
                {
                    acc_vol[[row, col]] += sector_vol[id];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merging_two_flat_sectors_sums_their_surfaces() {
        let grid = Grid::new(5, 5, 1.0, 1.0).unwrap();
        let mut acc = TvsAccumulator::new(grid.computable_width, false);

        let mut surface_a = vec![0f32; grid.len()];
        let mut surface_b = vec![0f32; grid.len()];
        let center = grid.id(2, 2);
        surface_a[center] = 3.0;
        surface_b[center] = 4.0;

        acc.merge_sector(
            &grid,
            &SectorOutput {
                sector_angle: 0,
                surface: surface_a,
                volume: None,
                rings: None,
            },
        );
        acc.merge_sector(
            &grid,
            &SectorOutput {
                sector_angle: 1,
                surface: surface_b,
                volume: None,
                rings: None,
            },
        );

        let (row, col) = grid.pov_to_tvs(center).unwrap();
        assert_eq!(acc.surface[[row, col]], 7.0);
    }
}
