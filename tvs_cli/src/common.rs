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
use std::path::PathBuf;

use anyhow::Result;
use structopt::StructOpt;
use tvs_core::config::Config;

/// Configuration options shared by every subcommand, following the
/// per-command `structopt` args structs in `bldg_agg` (one struct per
/// subcommand, a shared subset of flags repeated rather than factored into
/// a global).
#[derive(StructOpt, Debug)]
pub struct DemArgs {
    /// Input elevation grid (raw binary, 256-byte header, little-endian
    /// u16 cells, bottom-left origin).
    #[structopt(long, parse(from_os_str))]
    pub input_file: PathBuf,

    #[structopt(long)]
    pub dem_width: usize,

    #[structopt(long)]
    pub dem_height: usize,

    /// Cell size in metres.
    #[structopt(long, default_value = "10.0")]
    pub dem_scale: f64,

    /// Maximum line-of-sight radius, in metres.
    #[structopt(long)]
    pub max_line_of_sight: f64,

    /// Observer height above the terrain, in metres.
    #[structopt(long, default_value = "1.5")]
    pub observer_height: f64,

    /// Number of sectors spanning the 0..180 degree half-sweep.
    #[structopt(long, default_value = "180")]
    pub total_sectors: u32,

    /// Degrees to shift each sector's angle off an exact multiple of 90,
    /// breaking ties on the sweep line.
    #[structopt(long, default_value = "0.001")]
    pub sector_shift: f64,

    /// Run a single sector angle instead of the whole sweep.
    #[structopt(long)]
    pub single_sector: Option<u32>,

    #[structopt(long, parse(from_os_str), default_value = "out")]
    pub output_dir: PathBuf,

    #[structopt(long, parse(from_os_str))]
    pub tvs_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub ring_sector_dir: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub sector_cache_dir: Option<PathBuf>,

    #[structopt(long)]
    pub discard_short_rings: Option<bool>,

    #[structopt(long)]
    pub curved_earth: bool,

    #[structopt(long)]
    pub earth_radius_cells: Option<f64>,

    #[structopt(long)]
    pub compute_volume: bool,

    #[structopt(long)]
    pub store_ring_sectors: bool,
}

impl DemArgs {
    pub fn to_config(&self, is_precompute: bool) -> Result<Config> {
        let output_dir = self.output_dir.clone();
        let config = Config {
            dem_width: self.dem_width,
            dem_height: self.dem_height,
            dem_scale: self.dem_scale,
            max_line_of_sight: self.max_line_of_sight,
            observer_height: self.observer_height,
            total_sectors: self.total_sectors,
            sector_shift: self.sector_shift,
            is_precompute,
            single_sector: self.single_sector,
            input_file: self.input_file.clone(),
            tvs_file: self
                .tvs_file
                .clone()
                .unwrap_or_else(|| output_dir.join("tvs.bin")),
            ring_sector_dir: self
                .ring_sector_dir
                .clone()
                .unwrap_or_else(|| output_dir.join("ring_sectors")),
            sector_cache_dir: self
                .sector_cache_dir
                .clone()
                .unwrap_or_else(|| output_dir.join("sector_cache")),
            output_dir,
            discard_short_rings: self.discard_short_rings.unwrap_or(true),
            short_ring_threshold: 1.5,
            curved_earth: self.curved_earth,
            earth_radius_cells: self
                .earth_radius_cells
                .unwrap_or_else(|| Config::default_earth_radius_cells(self.dem_scale)),
            compute_volume: self.compute_volume,
            store_ring_sectors: self.store_ring_sectors,
        };
        config.validate()?;
        config.ensure_directories()?;
        Ok(config)
    }
}
