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
use crate::axes::Axes;
use crate::band::{Band, END_BACKWARD};
use crate::cache::PositionJournal;
use crate::error::{Error, Result};

/// The Band-of-Sight manager (C3): owns the bounded [`Band`] and drives it
/// one point at a time through the Starting / Middle / Ending phases of
/// spec.md §4.2, consulting (precompute) or replaying (compute) the
/// position journal (C4) for where each new point slots in.
///
/// Grounded in `BOS::adjustToNextPoint` / `calculateNewPosition` /
/// `getNewPosition` / `insertPoint` (`src/BOS.cpp`). That function performs
/// the slot-growing insertion *before* running the sweep for the point it
/// just made current, not after — this crate follows that order (see
/// DESIGN.md) rather than spec.md §4.4's literal "kernel, then advance"
/// phrasing, since the insert-before-sweep order is what the original's own
/// test suite (`test/bos_test.cpp`) exercises.
///
/// [`BandOfSight::advance`]'s `k` argument is `adjustToNextPoint`'s
/// `sector_ordered_id + 1`, not the point index itself — see the doc
/// comment on `advance`.
pub struct BandOfSight {
    band: Band,
    half_band: usize,
    point_count: usize,
}

impl BandOfSight {
    pub fn new(band_size: usize, point_count: usize) -> Self {
        BandOfSight {
            band: Band::new(band_size),
            half_band: (band_size - 1) / 2,
            point_count,
        }
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    pub fn setup(&mut self, axes: &Axes) {
        self.band.first_node(axes.sector_ordered[0]);
    }

    /// The slot holding the k-th sector-ordered point, valid only after
    /// [`BandOfSight::advance`] has been called for this `k`.
    pub fn pov_slot(&self, k: usize) -> i32 {
        (k % self.band.capacity()) as i32
    }

    /// Grows the band so that the point about to be swept and its currently
    /// reachable context are present, per spec.md §4.2's three phases.
    /// `sector_angle` identifies the sector for invariant error messages
    /// only.
    ///
    /// `k` is the point index (`adjustToNextPoint`'s `sector_ordered_id`)
    /// *plus one* — callers drive this with the loop variable `point` they
    /// also use to index `sector_ordered`/`pov_slot`, but shifted by one, so
    /// that `advance`'s internal `2*k`/`k+half_band` arithmetic lines up
    /// directly with the original's `doubled = 2*sector_ordered_id` and
    /// `leading = sector_ordered_id + half_band_size + 1` without needing a
    /// `-1`/`+1` at every use site. Concretely: to sweep point `p`, call
    /// `advance(p + 1, ...)` and then read `sector_ordered[p]`/`pov_slot(p)`.
    pub fn advance(
        &mut self,
        k: usize,
        axes: &Axes,
        journal: &mut PositionJournal,
        is_precompute: bool,
        sector_angle: i32,
    ) -> Result<()> {
        let starting = k <= self.half_band;
        let ending = k > self.point_count.saturating_sub(self.half_band + 1);

        if starting {
            let first_new = axes.sector_ordered[2 * k - 1];
            self.insert_one(first_new, axes, journal, is_precompute, false, sector_angle)?;
            if 2 * k < self.point_count {
                let second_new = axes.sector_ordered[2 * k];
                self.insert_one(second_new, axes, journal, is_precompute, false, sector_angle)?;
            }
        } else if ending {
            self.band.remove_one();
            self.band.remove_one();
        } else {
            let idx = k + self.half_band;
            let new_point = axes.sector_ordered[idx];
            self.insert_one(new_point, axes, journal, is_precompute, true, sector_angle)?;
        }
        Ok(())
    }

    fn insert_one(
        &mut self,
        point_id: u32,
        axes: &Axes,
        journal: &mut PositionJournal,
        is_precompute: bool,
        remove: bool,
        sector_angle: i32,
    ) -> Result<()> {
        let position = if is_precompute {
            let pos = self.calculate_new_position(point_id, axes, sector_angle)?;
            journal.write_position(pos)?;
            pos
        } else {
            journal.read_position()?
        };
        self.band.insert(point_id, position, remove);
        Ok(())
    }

    /// Finds the slot a new point belongs after, by its sight-ordered rank
    /// relative to the points already banded. Ported from
    /// `BOS::calculateNewPosition`.
    fn calculate_new_position(&self, point_id: u32, axes: &Axes, sector_angle: i32) -> Result<i32> {
        let rank = axes.sight_ordered[point_id as usize];
        let first_rank = axes.sight_ordered[self.band.point_at(self.band.first) as usize];
        if rank < first_rank {
            return Ok(END_BACKWARD);
        }
        let last_rank = axes.sight_ordered[self.band.point_at(self.band.last) as usize];
        if rank > last_rank {
            return Ok(self.band.last);
        }
        let mut cursor = self.band.next_of(self.band.first);
        let mut steps = 0usize;
        loop {
            if cursor < 0 {
                return Err(Error::invariant(
                    sector_angle,
                    "ran off the band while locating an insertion point",
                ));
            }
            let cursor_rank = axes.sight_ordered[self.band.point_at(cursor) as usize];
            if rank < cursor_rank {
                return Ok(self.band.prev_of(cursor));
            }
            cursor = self.band.next_of(cursor);
            steps += 1;
            if steps > self.band.capacity() {
                return Err(Error::invariant(
                    sector_angle,
                    "insertion-position search exceeded the band capacity",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn journal_pair() -> (std::path::PathBuf, std::path::PathBuf) {
        let mut p = std::env::temp_dir();
        p.push(format!("tvs_core_bos_test_{}", std::process::id()));
        (p.clone(), p.with_extension("tmp"))
    }

    #[test]
    fn band_stays_contiguous_through_a_full_sweep() {
        let grid = Grid::new(7, 7, 1.0, 1.0).unwrap();
        let axes = Axes::compute(&grid, 15.0, 0.001);
        let n = grid.width * grid.height;
        let band_size = if grid.width % 2 == 0 {
            grid.width + 1
        } else {
            grid.width
        };

        let (path, _tmp) = journal_pair();
        let _ = std::fs::remove_file(&path);

        let mut bos = BandOfSight::new(band_size, n);
        bos.setup(&axes);
        let mut journal = PositionJournal::create(&path).unwrap();
        for point in 0..n {
            bos.advance(point + 1, &axes, &mut journal, true, 0).unwrap();
            assert!(bos.band().len() as usize <= band_size);
        }
        journal.finish().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn precompute_then_compute_agree_on_band_contents() {
        let grid = Grid::new(7, 7, 1.0, 1.0).unwrap();
        let axes = Axes::compute(&grid, 42.0, 0.001);
        let n = grid.width * grid.height;
        let band_size = grid.width;

        let (path, _tmp) = journal_pair();
        let _ = std::fs::remove_file(&path);

        let mut pre_bos = BandOfSight::new(band_size, n);
        pre_bos.setup(&axes);
        let mut write_journal = PositionJournal::create(&path).unwrap();
        let mut pre_snapshots = Vec::new();
        for point in 0..n {
            pre_bos
                .advance(point + 1, &axes, &mut write_journal, true, 0)
                .unwrap();
            pre_snapshots.push(pre_bos.band().point_at(pre_bos.pov_slot(point)));
        }
        write_journal.finish().unwrap();

        let mut comp_bos = BandOfSight::new(band_size, n);
        comp_bos.setup(&axes);
        let mut read_journal = PositionJournal::open(&path).unwrap();
        let mut comp_snapshots = Vec::new();
        for point in 0..n {
            comp_bos
                .advance(point + 1, &axes, &mut read_journal, false, 0)
                .unwrap();
            comp_snapshots.push(comp_bos.band().point_at(comp_bos.pov_slot(point)));
        }

        assert_eq!(pre_snapshots, comp_snapshots);
        let _ = std::fs::remove_file(&path);
    }
}
