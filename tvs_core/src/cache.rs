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

use crate::error::Result;

/// The precompute store (C4), position-journal mode: for every point the
/// Band-of-Sight inserts during precompute, the slot it was spliced after
/// (`band::END_BACKWARD` when it became the new head) is appended to a
/// per-sector file. During compute the same file is replayed in order so
/// the expensive sweep-the-band-to-find-the-insertion-point search
/// (`Band::calculate_new_position` in the horizon module) only ever runs
/// once per point, during precompute.
///
/// Grounded in the original `BOS::positions` array / `getNewPosition`
/// (`src/BOS.cpp`), adapted from an in-memory array to a streamed file since
/// spec.md's per-sector cache file is the unit of persistence between the
/// precompute and compute passes.
pub enum PositionJournal {
    Write { writer: BufWriter<File>, path: PathBuf, tmp_path: PathBuf },
    Read(BufReader<File>),
}

impl PositionJournal {
    /// Opens a journal for writing during precompute. The data lands in a
    /// `.tmp` sibling and is only renamed into place on
    /// [`PositionJournal::finish`], so a sector aborted mid-sweep never
    /// leaves a partial cache file behind (spec.md §5).
    pub fn create(path: &Path) -> Result<Self> {
        let tmp_path = path.with_extension("tmp");
        let file = File::create(&tmp_path)?;
        Ok(PositionJournal::Write {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            tmp_path,
        })
    }

    /// Opens a previously finished journal for replay during compute.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(PositionJournal::Read(BufReader::new(file)))
    }

    pub fn write_position(&mut self, position: i32) -> Result<()> {
        match self {
            PositionJournal::Write { writer, .. } => {
                writer.write_i32::<LittleEndian>(position)?;
                Ok(())
            }
            PositionJournal::Read(_) => {
                panic!("attempted to write to a read-mode position journal")
            }
        }
    }

    pub fn read_position(&mut self) -> Result<i32> {
        match self {
            PositionJournal::Read(reader) => Ok(reader.read_i32::<LittleEndian>()?),
            PositionJournal::Write { .. } => {
                panic!("attempted to read from a write-mode position journal")
            }
        }
    }

    /// Flushes and atomically publishes the journal. Must be called after
    /// every point in the sector has been inserted; skipping it (e.g.
    /// because an earlier point raised an `Error`) leaves only the `.tmp`
    /// file, which `finish` never produces, so no corrupt cache is ever
    /// picked up by a later compute pass.
    pub fn finish(self) -> Result<()> {
        match self {
            PositionJournal::Write {
                mut writer,
                path,
                tmp_path,
            } => {
                writer.flush()?;
                drop(writer);
                std::fs::rename(tmp_path, path)?;
                Ok(())
            }
            PositionJournal::Read(_) => Ok(()),
        }
    }
}

/// Reads an entire position journal into memory, for tests and for small
/// DEMs where streaming isn't worth the complexity.
pub fn read_all_positions(path: &Path) -> Result<Vec<i32>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let mut out = Vec::with_capacity(bytes.len() / 4);
    let mut cursor = &bytes[..];
    while !cursor.is_empty() {
        out.push(cursor.read_i32::<LittleEndian>()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile_free_helpers::temp_file_path;

    mod tempfile_free_helpers {
        use std::path::PathBuf;

        pub fn temp_file_path(name: &str) -> PathBuf {
            let mut dir = std::env::temp_dir();
            dir.push(format!("tvs_core_cache_test_{}_{}", std::process::id(), name));
            dir
        }
    }

    #[test]
    fn written_positions_survive_a_round_trip() {
        let path = temp_file_path("journal.bin");
        let _ = std::fs::remove_file(&path);

        let mut journal = PositionJournal::create(&path).unwrap();
        for pos in [-2, -1, 0, 3, 7] {
            journal.write_position(pos).unwrap();
        }
        journal.finish().unwrap();

        let positions = read_all_positions(&path).unwrap();
        assert_eq!(positions, vec![-2, -1, 0, 3, 7]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unfinished_journal_leaves_no_final_file() {
        let path = temp_file_path("unfinished.bin");
        let _ = std::fs::remove_file(&path);

        {
            let mut journal = PositionJournal::create(&path).unwrap();
            journal.write_position(0).unwrap();
            // dropped without calling finish()
        }

        assert!(!path.exists());
        let _ = std::fs::remove_file(path.with_extension("tmp"));
    }
}
