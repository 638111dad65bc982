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
use log::debug;

use crate::axes::Axes;
use crate::bos::BandOfSight;
use crate::cache::PositionJournal;
use crate::config::Config;
use crate::error::Result;
use crate::grid::Grid;
use crate::horizon::{sweep_direction, HorizonConfig, Neighbor, RingSector};

/// The per-point output of one sector sweep (C6): surface (and, if enabled,
/// volume) seen from every point in this sector's direction, plus the ring
/// sectors recorded along the way when the caller asked for them. Indexed
/// by dense grid id. The sweep itself runs over every point regardless of
/// whether it's computable — `Sector::loopThroughBands` calls `sweepS`
/// unconditionally for every `point` — the computable-region margin only
/// decides which entries [`crate::accumulate::TvsAccumulator::merge_sector`]
/// reads into the final raster.
pub struct SectorOutput {
    pub sector_angle: u32,
    pub surface: Vec<f32>,
    pub volume: Option<Vec<f32>>,
    pub rings: Option<Vec<(Vec<RingSector>, Vec<RingSector>)>>,
}

/// Runs a full sweep for one sector angle (C6's lifecycle:
/// EMPTY -> SEEDED -> FILLING -> FULL -> DRAINING -> EMPTY across the
/// k-loop). `journal_path` is the sector's per-angle position-journal
/// cache file (C4); it is written during precompute and replayed during
/// compute.
///
/// Both loops call `bos.advance(k + 1, ...)` before reading
/// `sector_ordered[k]`/`pov_slot(k)` — see the doc comment on
/// [`crate::bos::BandOfSight::advance`] for why the `+ 1` belongs at the
/// call site rather than folded into `advance` itself. This mirrors
/// `Sector::loopThroughBands`, whose single `point` loop variable both
/// drives `adjustToNextPoint` and indexes the sweep in the same iteration.
pub fn run_sector(
    grid: &Grid,
    config: &Config,
    sector_angle: u32,
    journal_path: &std::path::Path,
) -> Result<Option<SectorOutput>> {
    let n = grid.len();
    let degrees = sector_angle as f64 * (180.0 / config.total_sectors as f64);
    let axes = Axes::compute(grid, degrees, config.sector_shift);
    let band_size = config.band_size();

    let mut bos = BandOfSight::new(band_size, n);
    bos.setup(&axes);

    let mut journal = if config.is_precompute {
        PositionJournal::create(journal_path)?
    } else {
        PositionJournal::open(journal_path)?
    };

    if config.is_precompute {
        for point in 0..n {
            bos.advance(
                point + 1,
                &axes,
                &mut journal,
                true,
                sector_angle as i32,
            )?;
        }
        journal.finish()?;
        debug!("sector {} precompute finished ({} points)", sector_angle, n);
        return Ok(None);
    }

    let horizon_cfg = HorizonConfig {
        cell_scale: grid.scale,
        discard_short_rings: config.discard_short_rings,
        short_ring_threshold: config.short_ring_threshold as f32,
        curved_earth: config.curved_earth,
        earth_radius_cells: config.earth_radius_cells,
        compute_volume: config.compute_volume,
    };

    let mut surface = vec![0f32; n];
    let mut volume = config.compute_volume.then(|| vec![0f32; n]);
    let mut rings: Option<Vec<(Vec<RingSector>, Vec<RingSector>)>> =
        config.store_ring_sectors.then(|| vec![(Vec::new(), Vec::new()); n]);

    for k in 0..n {
        bos.advance(k + 1, &axes, &mut journal, false, sector_angle as i32)?;
        let point_id = axes.sector_ordered[k];
        let pov_slot = bos.pov_slot(k);
        let pov_elevation = grid.elevation(point_id as usize) + config.observer_height as f32;

        let band = bos.band();
        let forward = band.iter_forward_from(pov_slot).map(|(_, id)| {
            let delta_d = (axes.distances[id as usize] - axes.distances[point_id as usize])
                .abs() as f32;
            Neighbor {
                id,
                delta_d,
                elevation: grid.elevation(id as usize),
            }
        });
        let forward_result = sweep_direction(pov_elevation, point_id, forward, &horizon_cfg);

        let backward = band.iter_backward_from(pov_slot).map(|(_, id)| {
            let delta_d = (axes.distances[point_id as usize] - axes.distances[id as usize])
                .abs() as f32;
            Neighbor {
                id,
                delta_d,
                elevation: grid.elevation(id as usize),
            }
        });
        let backward_result = sweep_direction(pov_elevation, point_id, backward, &horizon_cfg);

        surface[point_id as usize] = forward_result.surface + backward_result.surface;
        if let Some(vol) = volume.as_mut() {
            vol[point_id as usize] = forward_result.volume + backward_result.volume;
        }
        if let Some(rings_out) = rings.as_mut() {
            rings_out[point_id as usize] = (forward_result.rings, backward_result.rings);
        }
    }

    Ok(Some(SectorOutput {
        sector_angle,
        surface,
        volume,
        rings,
    }))
}

/// Which sector angles a run should cover: every angle (normal precompute
/// or compute pass) or a single one (`Config::single_sector`, used to
/// re-run or debug one sector without repeating the whole DEM).
pub fn sector_angles(config: &Config) -> Vec<u32> {
    match config.single_sector {
        Some(angle) => vec![angle],
        None => (0..config.total_sectors).collect(),
    }
}
