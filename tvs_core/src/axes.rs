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
use crate::grid::Grid;

/// Rotates a square grid onto a pair of sweep axes for one sector angle and
/// produces two permutations of the point ids (C2):
///
/// - `sector_ordered[k]` is the dense id of the k-th point the sweep visits,
///   in increasing perpendicular-distance-from-the-sweep-line order.
/// - `sight_ordered[id]` is the rank of `id` along the perpendicular axis —
///   the inverse permutation used by the Band-of-Sight to decide where a
///   newly inserted point belongs relative to what's already banded.
///
/// Grounded in the original `SectorAxes::preComputeTrig` / `preSort` /
/// `sort`. The quadrant split (`quad`) and the rotated-axis diagram in that
/// file explain why two symmetric formulas (`icos[x] + isin[y]` vs.
/// `icos[y] - isin[x]`) cover the full 0..180 degree sweep range with a
/// single trig table.
#[derive(Debug, Clone)]
pub struct Axes {
    pub n: usize,
    pub quad: u8,
    pub sector_ordered: Vec<u32>,
    pub sight_ordered: Vec<u32>,
    pub distances: Vec<f64>,
}

const TO_RADIANS: f64 = std::f64::consts::PI / 180.0;

impl Axes {
    /// `sector_angle` is the integer sector index (0..total_sectors); the
    /// actual rotation in degrees is `sector_angle * (180 / total_sectors)`.
    /// `shift` nudges the angle a fraction of a degree off an exact multiple
    /// of 90 so no two points ever tie on the sweep line (spec.md §9,
    /// "Numerical tie-breaking").
    pub fn compute(grid: &Grid, sector_degrees: f64, shift: f64) -> Self {
        let n = grid.width;
        debug_assert_eq!(grid.width, grid.height);

        let quad: u8 = if sector_degrees >= 90.0 { 1 } else { 0 };
        let reduced = if quad == 1 {
            sector_degrees - 90.0
        } else {
            sector_degrees
        };
        let angle = (reduced + shift + 0.5) * TO_RADIANS;
        let (sin, cos) = angle.sin_cos();
        let tan = angle.tan();
        let cot = 1.0 / tan;

        let mut isin = vec![0.0f64; n];
        let mut icos = vec![0.0f64; n];
        let mut itan = vec![0.0f64; n];
        let mut icot = vec![0.0f64; n];
        for i in 0..n {
            let fi = i as f64;
            isin[i] = fi * sin;
            icos[i] = fi * cos;
            itan[i] = fi * tan;
            icot[i] = fi * cot;
        }

        let mut distances = vec![0.0f64; n * n];
        for x in 0..n {
            for y in 0..n {
                let val = if quad == 1 {
                    icos[y] - isin[x]
                } else {
                    icos[x] + isin[y]
                };
                distances[y * n + x] = val;
            }
        }

        let (sector_ordered, sight_ordered) = Self::sort(n, quad, &icot, &itan, cot, tan);

        Axes {
            n,
            quad,
            sector_ordered,
            sight_ordered,
            distances,
        }
    }

    /// Ranks every grid point by signed perpendicular distance from the
    /// sweep line, breaking ties along the line itself with the diagonal
    /// count `ind = i*j` corrected by the two prefix-sum terms below.
    /// Ported from `SectorAxes::preSort`/`sort`, re-derived onto this
    /// crate's row-major `id = row*width + col` scheme (the original keeps
    /// `id = x*height + y`; since the grid is always square here the two
    /// schemes are related by a coordinate relabelling and the ranking math
    /// carries over unchanged). `preSort`'s recurrence is driven by the
    /// current sector's cotangent/tangent — it is not a fixed table, it
    /// changes every sector angle.
    fn sort(n: usize, quad: u8, icot: &[f64], itan: &[f64], cot: f64, tan: f64) -> (Vec<u32>, Vec<u32>) {
        let dim = n * n;
        let mut tmp1 = vec![0i64; n];
        let mut tmp2 = vec![0i64; n];
        for j in 1..n {
            tmp1[j] = tmp1[j - 1] + (n as f64).min((cot * j as f64).floor()) as i64;
        }
        for i in 1..n {
            tmp2[i] = tmp2[i - 1] + (n as f64).min((tan * i as f64).floor()) as i64;
        }

        let mut sight_ordered = vec![0u32; dim];
        let mut sector_ordered = vec![0u32; dim];
        let ln = n - 1;

        for j in 1..=n {
            let x = j - 1;
            for i in 1..=n {
                let y = i - 1;
                let mut ind = (i * j) as i64;

                ind += if (ln - y) as f64 - icot[j - 1] < 0.0 {
                    ((n - i) * j) as i64 - tmp2[n - i] - (n - i) as i64
                } else {
                    tmp1[j - 1]
                };
                ind += if (ln - x) as f64 - itan[i - 1] < 0.0 {
                    ((n - j) * i) as i64 - tmp1[n - j] - (n - j) as i64
                } else {
                    tmp2[i - 1]
                };

                let p = (y * n + x) as u32;
                let np = (x * n + (n - 1 - y)) as u32;

                if quad == 0 {
                    sight_ordered[p as usize] = (ind - 1) as u32;
                    sector_ordered[(ind - 1) as usize] = np;
                } else {
                    sight_ordered[np as usize] = (ind - 1) as u32;
                    sector_ordered[dim - ind as usize] = p;
                }
            }
        }

        (sector_ordered, sight_ordered)
    }
}
