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
mod cmd_compute;
mod cmd_precompute;
mod cmd_render;
mod common;

use anyhow::Result;
use log::LevelFilter;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "tvs", about = "Sector-sweep total viewshed surface kernel")]
struct Cli {
    #[structopt(long, default_value = "warn")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Precompute the per-sector Band-of-Sight insertion cache.
    Precompute(cmd_precompute::PrecomputeArgs),
    /// Compute the total viewshed surface raster.
    Compute(cmd_compute::ComputeArgs),
    /// Render a TVS raster or a single point's viewshed as ASCII.
    RenderViewshed(cmd_render::RenderArgs),
}

fn run() -> Result<()> {
    let cli = Cli::from_args();
    simple_logger::SimpleLogger::new()
        .with_level(cli.log_level)
        .init()
        .expect("logger already initialized");

    match cli.command {
        Command::Precompute(args) => cmd_precompute::run(args),
        Command::Compute(args) => cmd_compute::run(args),
        Command::RenderViewshed(args) => cmd_render::run(args),
    }
}

fn main() {
    if let Err(err) = run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
