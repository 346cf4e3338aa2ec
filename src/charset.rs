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

//! Generation of the text sources from the character map of a font.

use std::{collections::BTreeSet, fs, io, path::Path};

/// Error that can happen while generating the text sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse font: {0}")]
    FaceParsing(#[from] ttf_parser::FaceParsingError),

    #[error("Font doesn't have a character map")]
    NoCharacterMap,

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Returns every code point mapped by one of the Unicode character maps of the font.
pub fn codepoints(font: &[u8]) -> Result<BTreeSet<u32>, Error> {
    let face = ttf_parser::Face::parse(font, 0)?;
    let cmap = face.tables().cmap.ok_or(Error::NoCharacterMap)?;

    let mut out = BTreeSet::new();
    for subtable in cmap.subtables {
        if !subtable.is_unicode() {
            continue;
        }

        subtable.codepoints(|c| {
            out.insert(c);
        });
    }

    Ok(out)
}

/// Reads the font at `font_path` and writes one file per character into `texts_dir`.
///
/// Returns the number of files written.
pub fn write_texts(font_path: &Path, texts_dir: &Path) -> Result<usize, Error> {
    let font = fs::read(font_path)?;
    let codepoints = codepoints(&font)?;
    log::info!(
        "{} maps {} code points",
        font_path.display(),
        codepoints.len()
    );
    Ok(write_codepoints(codepoints, texts_dir)?)
}

/// Writes `texts_dir/<code>` containing the UTF-8 encoding of the character, for each code.
///
/// Codes that aren't Unicode scalar values are skipped. Existing files are overwritten.
pub fn write_codepoints(
    codepoints: impl IntoIterator<Item = u32>,
    texts_dir: &Path,
) -> Result<usize, io::Error> {
    fs::create_dir_all(texts_dir)?;

    let mut written = 0;
    for code in codepoints {
        let c = match char::from_u32(code) {
            Some(c) => c,
            None => {
                log::debug!("Skipping U+{:04X}", code);
                continue;
            }
        };

        let mut buf = [0; 4];
        fs::write(
            texts_dir.join(code.to_string()),
            c.encode_utf8(&mut buf).as_bytes(),
        )?;
        written += 1;
    }

    Ok(written)
}
