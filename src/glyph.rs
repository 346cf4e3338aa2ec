// Copyright (C) 2019-2021  Pierre Krieger
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::{Path, PathBuf};

/// Rasterized glyph, as found in the images directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Index of the glyph in the generated table.
    pub code: u32,
    pub width: u32,
    pub height: u32,
    /// One alpha value per pixel, row by row.
    pub alphas: Vec<u8>,
}

/// Error while turning a file into a [`Glyph`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to decode {}: {}", .0.display(), .1)]
    Decode(PathBuf, #[source] image::ImageError),

    #[error("Glyph file name isn't a code: {}", .0.display())]
    BadFileName(PathBuf),
}

impl Glyph {
    /// Number of pixels of the glyph.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Decodes a PNG and returns its width, height, and alpha channel.
pub fn decode(png: &[u8]) -> Result<(u32, u32, Vec<u8>), image::ImageError> {
    let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    let alphas = rgba.into_raw().chunks_exact(4).map(|px| px[3]).collect();
    Ok((width, height, alphas))
}

/// Parses the code of a glyph from the name of its file, e.g. `65.png` is `65`.
pub fn parse_code(path: &Path) -> Result<u32, Error> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
        .ok_or_else(|| Error::BadFileName(path.to_owned()))
}
