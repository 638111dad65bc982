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
//! Sector-sweep total viewshed surface kernel.
//!
//! For every computable point of a square elevation grid, sums the terrain
//! surface area visible across the full 360 degrees by sweeping a fixed
//! number of thin sectors, each carrying a bounded "Band of Sight" outward
//! from every point in turn. See `SPEC_FULL.md` at the repository root for
//! the full component contract; this crate implements components C1–C8.

pub mod accumulate;
pub mod axes;
pub mod band;
pub mod bos;
pub mod cache;
pub mod config;
pub mod error;
pub mod grid;
pub mod horizon;
pub mod io;
pub mod render;
pub mod sector;

pub use config::Config;
pub use error::{Error, Result};
pub use grid::Grid;

use std::sync::Mutex;

use rayon::prelude::*;

use accumulate::TvsAccumulator;
use sector::SectorOutput;

/// Runs the precompute pass: writes a position-journal cache file for
/// every sector angle `config` selects, and nothing else.
pub fn precompute(grid: &Grid, config: &Config) -> Result<()> {
    let angles = sector::sector_angles(config);
    angles.into_par_iter().try_for_each(|angle| -> Result<()> {
        let path = io::sector_cache_path(&config.sector_cache_dir, angle);
        sector::run_sector(grid, config, angle, &path)?;
        Ok(())
    })
}

/// Runs the compute pass over every sector angle `config` selects, merging
/// each sector's contribution into the final TVS raster under a
/// `Mutex`-guarded accumulator (C7), the parallelism split described in
/// spec.md §4.6/§5: one `rayon` task per sector, synchronized only at the
/// merge step.
pub fn compute(grid: &Grid, config: &Config) -> Result<TvsAccumulator> {
    let angles = sector::sector_angles(config);
    let accumulator = Mutex::new(TvsAccumulator::new(
        grid.computable_width,
        config.compute_volume,
    ));

    angles.into_par_iter().try_for_each(|angle| -> Result<()> {
        let path = io::sector_cache_path(&config.sector_cache_dir, angle);
        let output = sector::run_sector(grid, config, angle, &path)?;
        if let Some(output) = output {
            if config.store_ring_sectors {
                if let Some(rings) = output.rings.as_ref() {
                    let ring_path = io::ring_sector_path(&config.ring_sector_dir, angle);
                    io::write_ring_sector_file(&ring_path, rings)?;
                }
            }
            merge_into(&accumulator, grid, &output);
        }
        Ok(())
    })?;

    Ok(accumulator.into_inner().expect("accumulator mutex poisoned"))
}

fn merge_into(accumulator: &Mutex<TvsAccumulator>, grid: &Grid, output: &SectorOutput) {
    let mut guard = accumulator.lock().expect("accumulator mutex poisoned");
    guard.merge_sector(grid, output);
}
