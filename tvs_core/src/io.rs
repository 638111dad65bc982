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
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;

use crate::error::Result;
use crate::grid::Grid;
use crate::horizon::RingSector;

pub const HEADER_SIZE: usize = 256;

/// The external I/O boundary (C8): raw little-endian binary grid files with
/// a 256-byte passthrough header, plus the per-sector cache and ring-sector
/// files. Grounded in `DEM::setElevations`/`DEM::extractBTHeader`
/// (`src/DEM.cpp`). Raster-format parsing beyond this raw layout (and any
/// PNG/KML conversion) is explicitly out of scope.
pub fn load_elevations(path: &Path, width: usize, height: usize) -> Result<([u8; HEADER_SIZE], Array2<f32>)> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    // The on-disk layout is column-major, south-to-north: the outer loop
    // walks columns west to east, the inner loop walks rows south to
    // north. The in-memory grid is row-major, north-to-south, so a cell at
    // file position (x, y) (y counted from the south) lands at internal
    // (row, col) = (height - 1 - y, x).
    let mut elevations = Array2::<f32>::zeros((height, width));
    for x in 0..width {
        for y in 0..height {
            let raw = reader.read_u16::<LittleEndian>()?;
            let row = height - 1 - y;
            elevations[[row, x]] = raw as f32;
        }
    }
    Ok((header, elevations))
}

/// Builds the TVS output header from the input DEM header: the same
/// 256-byte passthrough, with the column/row counts shrunk to the
/// computable width and the extents pulled in by `max_line_of_sight` on
/// every side. Field offsets ported from `DEM::extractBTHeader`.
pub fn build_tvs_header(input_header: &[u8; HEADER_SIZE], computable_width: usize, max_line_of_sight: f64) -> [u8; HEADER_SIZE] {
    let mut header = *input_header;
    let cols = computable_width as i32;
    header[10..14].copy_from_slice(&cols.to_le_bytes());
    header[14..18].copy_from_slice(&cols.to_le_bytes());
    header[18..20].copy_from_slice(&4i16.to_le_bytes());
    header[20..22].copy_from_slice(&1i16.to_le_bytes());

    let mut adjust = |offset: usize, delta: f64| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&header[offset..offset + 8]);
        let value = f64::from_le_bytes(bytes) + delta;
        header[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    };
    adjust(28, max_line_of_sight);
    adjust(36, -max_line_of_sight);
    adjust(44, max_line_of_sight);
    adjust(52, -max_line_of_sight);

    header
}

pub fn write_tvs_raster(path: &Path, header: &[u8; HEADER_SIZE], raster: &Array2<f32>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(header)?;
    for value in raster.iter() {
        writer.write_f32::<LittleEndian>(*value)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_tvs_raster(path: &Path) -> Result<([u8; HEADER_SIZE], Array2<f32>)> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let mut cols_bytes = [0u8; 4];
    cols_bytes.copy_from_slice(&header[10..14]);
    let width = i32::from_le_bytes(cols_bytes) as usize;
    let mut rows_bytes = [0u8; 4];
    rows_bytes.copy_from_slice(&header[14..18]);
    let height = i32::from_le_bytes(rows_bytes) as usize;

    let mut raster = Array2::<f32>::zeros((height, width));
    for row in 0..height {
        for col in 0..width {
            raster[[row, col]] = reader.read_f32::<LittleEndian>()?;
        }
    }
    Ok((header, raster))
}

pub fn sector_cache_path(dir: &Path, sector_angle: u32) -> PathBuf {
    dir.join(format!("{}.bin", sector_angle))
}

pub fn ring_sector_path(dir: &Path, sector_angle: u32) -> PathBuf {
    dir.join(format!("{}.bin", sector_angle))
}

/// Writes one sector's ring sectors (forward then backward, per point) to
/// disk: for each point in grid order, the forward ring entry count and
/// opening/closing id pairs, then the backward ring entry count and pairs.
/// No leading point-count field — the reader derives that from the grid it
/// already knows about. Ported from `Sector::recordsectorRS`.
pub fn write_ring_sector_file(
    path: &Path,
    rings: &[(Vec<RingSector>, Vec<RingSector>)],
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (forward, backward) in rings {
        write_ring_list(&mut writer, forward)?;
        write_ring_list(&mut writer, backward)?;
    }
    writer.flush()?;
    Ok(())
}

/// `nF`/`nB` count *entries*, two per ring (opening id, closing id), not
/// the ring count itself — spec.md §6, mirroring `Sector::recordsectorRS`'s
/// `size_dsF`/`size_dsB` which double the ring count before writing it.
fn write_ring_list(writer: &mut impl Write, list: &[RingSector]) -> Result<()> {
    writer.write_u32::<LittleEndian>(2 * list.len() as u32)?;
    for ring in list {
        writer.write_u32::<LittleEndian>(ring.opening_id)?;
        writer.write_u32::<LittleEndian>(ring.closing_id)?;
    }
    Ok(())
}

pub fn read_ring_sector_file(
    path: &Path,
    point_count: usize,
) -> Result<Vec<(Vec<RingSector>, Vec<RingSector>)>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut rings = Vec::with_capacity(point_count);
    for _ in 0..point_count {
        let forward = read_ring_list(&mut reader)?;
        let backward = read_ring_list(&mut reader)?;
        rings.push((forward, backward));
    }
    Ok(rings)
}

fn read_ring_list(reader: &mut impl Read) -> Result<Vec<RingSector>> {
    let entry_count = reader.read_u32::<LittleEndian>()? as usize;
    let count = entry_count / 2;
    let mut list = Vec::with_capacity(count);
    for _ in 0..count {
        let opening_id = reader.read_u32::<LittleEndian>()?;
        let closing_id = reader.read_u32::<LittleEndian>()?;
        list.push(RingSector {
            opening_id,
            closing_id,
        });
    }
    Ok(list)
}

/// Loads a [`Grid`] from an elevation file, leaving `header` and
/// `elevations` populated.
pub fn load_grid(path: &Path, width: usize, height: usize, scale: f64, max_line_of_sight: f64) -> Result<Grid> {
    let mut grid = Grid::new(width, height, scale, max_line_of_sight)?;
    let (header, elevations) = load_elevations(path, width, height)?;
    grid.header = header;
    grid.elevations = elevations;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("tvs_core_io_test_{}_{}", std::process::id(), name));
        p
    }

    fn write_fixture_dem(path: &Path, width: usize, height: usize) {
        let mut writer = BufWriter::new(File::create(path).unwrap());
        writer.write_all(&[0u8; HEADER_SIZE]).unwrap();
        for x in 0..width {
            for y in 0..height {
                let value = (x * 10 + y) as u16;
                writer.write_u16::<LittleEndian>(value).unwrap();
            }
        }
        writer.flush().unwrap();
    }

    #[test]
    fn load_elevations_flips_bottom_left_origin_to_top_left() {
        let path = temp_path("dem.bin");
        write_fixture_dem(&path, 3, 3);

        let (_, elevations) = load_elevations(&path, 3, 3).unwrap();
        // file position (x=0, y=0) is the bottom-left cell, value 0.
        // it must land at internal row = height-1 = 2, col = 0.
        assert_eq!(elevations[[2, 0]], 0.0);
        // file position (x=0, y=2) is the top-left cell in file terms
        // (northernmost row of the westernmost column), value 2.
        assert_eq!(elevations[[0, 0]], 2.0);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn tvs_header_shrinks_dimensions_and_extents() {
        let mut input = [0u8; HEADER_SIZE];
        input[28..36].copy_from_slice(&0.0f64.to_le_bytes());
        input[36..44].copy_from_slice(&100.0f64.to_le_bytes());
        input[44..52].copy_from_slice(&0.0f64.to_le_bytes());
        input[52..60].copy_from_slice(&100.0f64.to_le_bytes());

        let header = build_tvs_header(&input, 5, 10.0);
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&header[10..14]);
        assert_eq!(i32::from_le_bytes(bytes), 5);

        let mut left = [0u8; 8];
        left.copy_from_slice(&header[28..36]);
        assert_eq!(f64::from_le_bytes(left), 10.0);
        let mut right = [0u8; 8];
        right.copy_from_slice(&header[36..44]);
        assert_eq!(f64::from_le_bytes(right), 90.0);
    }

    #[test]
    fn tvs_raster_round_trips() {
        let path = temp_path("tvs.bin");
        let mut header = [0u8; HEADER_SIZE];
        header[10..14].copy_from_slice(&3i32.to_le_bytes());
        header[14..18].copy_from_slice(&3i32.to_le_bytes());

        let mut raster = Array2::<f32>::zeros((3, 3));
        raster[[0, 0]] = 1.5;
        raster[[2, 2]] = 9.25;

        write_tvs_raster(&path, &header, &raster).unwrap();
        let (_, read_back) = read_tvs_raster(&path).unwrap();
        assert_eq!(read_back, raster);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn ring_sector_file_round_trips() {
        let path = temp_path("rings.bin");
        let rings = vec![
            (
                vec![RingSector {
                    opening_id: 1,
                    closing_id: 4,
                }],
                vec![],
            ),
            (vec![], vec![RingSector {
                opening_id: 2,
                closing_id: 5,
            }]),
        ];
        write_ring_sector_file(&path, &rings).unwrap();
        let read_back = read_ring_sector_file(&path, rings.len()).unwrap();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].0[0].closing_id, 4);
        assert_eq!(read_back[1].1[0].opening_id, 2);

        let _ = std::fs::remove_file(path);
    }
}
