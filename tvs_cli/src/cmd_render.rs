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

/// Renders either a finished TVS raster or a single point's reconstructed
/// viewshed as ASCII. Supplements the original `Output::tvsToASCII` /
/// `viewshedToASCII`; PNG/KML rendering stay out of scope.
#[derive(StructOpt, Debug)]
pub struct RenderArgs {
    #[structopt(long, parse(from_os_str))]
    pub tvs_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub ring_sector_file: Option<PathBuf>,

    /// Dense grid id of the point to reconstruct a viewshed for, required
    /// together with `--ring-sector-file`.
    #[structopt(long)]
    pub point_id: Option<usize>,

    #[structopt(long)]
    pub dem_width: Option<usize>,

    #[structopt(long)]
    pub dem_height: Option<usize>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    if let Some(tvs_file) = &args.tvs_file {
        let (_, raster) = tvs_core::io::read_tvs_raster(tvs_file)?;
        print!("{}", tvs_core::render::tvs_to_ascii(&raster));
        return Ok(());
    }

    if let (Some(ring_file), Some(point_id), Some(width), Some(height)) = (
        &args.ring_sector_file,
        args.point_id,
        args.dem_width,
        args.dem_height,
    ) {
        let rings = tvs_core::io::read_ring_sector_file(ring_file, width * height)?;
        let rings_for_point = rings.get(point_id).ok_or_else(|| {
            anyhow::anyhow!("point_id {} has no recorded ring sectors", point_id)
        })?;
        print!(
            "{}",
            tvs_core::render::viewshed_to_ascii(width, height, rings_for_point)
        );
        return Ok(());
    }

    anyhow::bail!(
        "pass either --tvs-file, or --ring-sector-file with --point-id, --dem-width and --dem-height"
    )
}
