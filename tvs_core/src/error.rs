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
use thiserror::Error;

/// Error kinds the sector-sweep kernel can raise. Configuration errors are
/// fatal at startup, I/O errors are fatal wherever they occur, and Invariant
/// errors mean a sweep ordering is corrupted and the sector must abort
/// without leaving a partial cache or ring-sector file behind.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("invariant violated in sector {sector}: {message}")]
    Invariant { sector: i32, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invariant(sector: i32, message: impl Into<String>) -> Self {
        Error::Invariant {
            sector,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}
