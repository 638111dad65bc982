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

use crate::error::{Error, Result};

/// Meridian offset to the Earth's radius used by the curved-earth
/// correction, carried over from the original `EARTH_CONST` constant
/// (metres, doubled radius).
pub const EARTH_DIAMETER_M: f64 = 6_371_000.0 * 2.0;

/// Every knob the sector-sweep kernel needs, gathered from the
/// per-subcommand `structopt` args in `tvs_cli`. Validated once at
/// startup via [`Config::validate`]; nothing downstream re-checks these
/// invariants.
#[derive(Debug, Clone)]
pub struct Config {
    pub dem_width: usize,
    pub dem_height: usize,
    pub dem_scale: f64,
    pub max_line_of_sight: f64,
    pub observer_height: f64,
    pub total_sectors: u32,
    pub sector_shift: f64,
    pub is_precompute: bool,
    pub single_sector: Option<u32>,

    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub tvs_file: PathBuf,
    pub ring_sector_dir: PathBuf,
    pub sector_cache_dir: PathBuf,

    pub discard_short_rings: bool,
    pub short_ring_threshold: f64,
    pub curved_earth: bool,
    pub earth_radius_cells: f64,
    pub compute_volume: bool,
    pub store_ring_sectors: bool,
}

impl Config {
    /// Derives `earth_radius_cells` from [`EARTH_DIAMETER_M`] and the given
    /// cell scale, for callers that want the default curvature radius
    /// rather than an explicit override.
    pub fn default_earth_radius_cells(dem_scale: f64) -> f64 {
        (EARTH_DIAMETER_M / 2.0) / dem_scale
    }

    /// Fatal-at-startup validation. Mirrors spec.md §7's "Configuration"
    /// error kind: anything caught here must never be discovered mid-sweep.
    pub fn validate(&self) -> Result<()> {
        if self.dem_width == 0 || self.dem_height == 0 {
            return Err(Error::configuration("DEM dimensions must be non-zero"));
        }
        if self.dem_width != self.dem_height {
            return Err(Error::configuration(
                "non-square grids are not supported",
            ));
        }
        if self.dem_scale <= 0.0 {
            return Err(Error::configuration("dem_scale must be positive"));
        }
        if self.max_line_of_sight <= 0.0 {
            return Err(Error::configuration(
                "max_line_of_sight must be positive",
            ));
        }
        let max_los_cells = (self.max_line_of_sight / self.dem_scale).floor() as usize;
        if self.dem_width <= 2 * max_los_cells {
            return Err(Error::configuration(
                "DEM is too small for the requested max_line_of_sight: no computable point remains",
            ));
        }
        if self.total_sectors == 0 || 180 % self.total_sectors != 0 {
            return Err(Error::configuration(
                "total_sectors must evenly divide 180",
            ));
        }
        if let Some(single) = self.single_sector {
            if single >= self.total_sectors {
                return Err(Error::configuration(
                    "single_sector must be less than total_sectors",
                ));
            }
        }
        if self.sector_shift <= 0.0 || self.sector_shift >= 1.0 {
            return Err(Error::configuration(
                "sector_shift must lie in (0, 1) degrees",
            ));
        }
        if self.earth_radius_cells <= 0.0 {
            return Err(Error::configuration("earth_radius_cells must be positive"));
        }
        Ok(())
    }

    /// `bw` in spec.md §3/§4.2: the Band-of-Sight's slot count. The
    /// original (`BOS::setBandSize`) forces it odd so a single observer
    /// slot sits exactly in the middle.
    pub fn band_size(&self) -> usize {
        if self.dem_width % 2 == 0 {
            self.dem_width + 1
        } else {
            self.dem_width
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.ring_sector_dir)?;
        std::fs::create_dir_all(&self.sector_cache_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            dem_width: 9,
            dem_height: 9,
            dem_scale: 10.0,
            max_line_of_sight: 30.0,
            observer_height: 1.5,
            total_sectors: 4,
            sector_shift: 0.001,
            is_precompute: false,
            single_sector: None,
            input_file: PathBuf::from("in.bt"),
            output_dir: PathBuf::from("out"),
            tvs_file: PathBuf::from("out/tvs.bin"),
            ring_sector_dir: PathBuf::from("out/rings"),
            sector_cache_dir: PathBuf::from("out/cache"),
            discard_short_rings: true,
            short_ring_threshold: 1.5,
            curved_earth: false,
            earth_radius_cells: Config::default_earth_radius_cells(10.0),
            compute_volume: false,
            store_ring_sectors: false,
        }
    }

    #[test]
    fn rejects_non_square_grids() {
        let mut cfg = base_config();
        cfg.dem_height = 8;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_total_sectors_not_dividing_180() {
        let mut cfg = base_config();
        cfg.total_sectors = 7;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn band_size_is_forced_odd() {
        let mut cfg = base_config();
        cfg.dem_width = 10;
        cfg.dem_height = 10;
        assert_eq!(cfg.band_size() % 2, 1);
    }

    #[test]
    fn accepts_a_sane_config() {
        assert!(base_config().validate().is_ok());
    }
}
