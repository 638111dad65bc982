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
use std::fmt::Write as _;

use ndarray::Array2;

use crate::horizon::RingSector;

/// Renders the TVS raster as an ASCII grid, one row per line, values
/// space-separated with two decimal places. Supplements the original
/// `Output::tvsToASCII`; PNG/KML rendering remain out of scope.
pub fn tvs_to_ascii(raster: &Array2<f32>) -> String {
    let mut out = String::new();
    for row in raster.genrows() {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{:.2}", value);
        }
        out.push('\n');
    }
    out
}

/// Reconstructs a single point's viewshed as an ASCII grid: `#` for every
/// point covered by one of its ring sectors, `.` otherwise. Supplements the
/// original `Output::viewshedToASCII`. `rings` holds the forward and
/// backward ring sectors recorded for the point of view; `width`/`height`
/// describe the full DEM (ring sector ids are dense grid ids, not
/// TVS-raster-shrunk ones).
pub fn viewshed_to_ascii(width: usize, height: usize, rings: &(Vec<RingSector>, Vec<RingSector>)) -> String {
    let mut covered = vec![false; width * height];
    for ring in rings.0.iter().chain(rings.1.iter()) {
        let lo = ring.opening_id.min(ring.closing_id) as usize;
        let hi = ring.opening_id.max(ring.closing_id) as usize;
        for id in lo..=hi {
            if id < covered.len() {
                covered[id] = true;
            }
        }
    }

    let mut out = String::new();
    for row in 0..height {
        for col in 0..width {
            let id = row * width + col;
            out.push(if covered[id] { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tvs_to_ascii_emits_one_line_per_row() {
        let raster = Array2::<f32>::zeros((2, 3));
        let ascii = tvs_to_ascii(&raster);
        assert_eq!(ascii.lines().count(), 2);
        assert_eq!(ascii.lines().next().unwrap(), "0.00 0.00 0.00");
    }

    #[test]
    fn viewshed_to_ascii_marks_covered_points() {
        let rings = (
            vec![RingSector {
                opening_id: 1,
                closing_id: 3,
            }],
            vec![],
        );
        let ascii = viewshed_to_ascii(4, 1, &rings);
        assert_eq!(ascii.trim_end(), ".###");
    }
}
