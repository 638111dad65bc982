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
use anyhow::Result;
use structopt::StructOpt;

use crate::common::DemArgs;

#[derive(StructOpt, Debug)]
pub struct PrecomputeArgs {
    #[structopt(flatten)]
    pub dem: DemArgs,
}

pub fn run(args: PrecomputeArgs) -> Result<()> {
    let config = args.dem.to_config(true)?;
    let grid = tvs_core::io::load_grid(
        &config.input_file,
        config.dem_width,
        config.dem_height,
        config.dem_scale,
        config.max_line_of_sight,
    )?;

    log::info!(
        "precomputing {} sector(s) for a {}x{} grid",
        tvs_core::sector::sector_angles(&config).len(),
        grid.width,
        grid.height
    );
    tvs_core::precompute(&grid, &config)?;
    log::info!("precompute finished, cache at {:?}", config.sector_cache_dir);
    Ok(())
}
