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

//! Generation of the C++ glyph table.
//!
//! # Layout of the generated file
//!
//! - A fixed preamble declaring the `Image` struct and `cfont_empty_pixel`.
//! - One `cfont_pixels_<n>` array of `n` empty pixels for each distinct pixel count `n`. All the
//! glyphs with the same number of pixels share the same array.
//! - The placeholder glyph `cfont_empty` and its alphas.
//! - For each glyph, `cfont_<code>_alpha` and `cfont_<code>`.
//! - `cfonts`, the table indexed by code, from `0` to the highest code.
//!
//! The pixel arrays come before anything that refers to them.

use crate::glyph::{self, Glyph};

use std::{
    collections::{btree_map, BTreeMap, BTreeSet},
    fmt, fs, io, iter,
    path::Path,
};

#[cfg(test)]
mod tests;

/// Glyphs with more pixels than this aren't included in the table.
pub const MAX_PIXEL_COUNT: u64 = 5000;

/// Width of `cfont_empty`.
pub const PLACEHOLDER_WIDTH: u32 = 11;
/// Height of `cfont_empty`.
pub const PLACEHOLDER_HEIGHT: u32 = 22;

/// Value of the `composition` field of every glyph.
pub const COMPOSITION: u32 = 4;

const PRELUDE: &str = r#"
#include <Uefi.h>
#include <Protocol/GraphicsOutput.h>

typedef EFI_GRAPHICS_OUTPUT_BLT_PIXEL Pixel;

struct _Image {
    Pixel *pixels;
    UINT8 *alphas;
    int x;
    int y;
    int composition;
    int length;
};

typedef struct _Image Image;

static Pixel cfont_empty_pixel {0, 0, 0, 0};
"#;

/// Error that can happen while generating the table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to list glyph images: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{0}")]
    Glyph(#[from] glyph::Error),

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Outcome of [`TableBuilder::insert`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Inserted {
    /// The glyph is new.
    Added,
    /// A glyph with the same code was already there, and has been replaced.
    Replaced,
    /// The glyph has more than [`MAX_PIXEL_COUNT`] pixels and has been discarded.
    TooLarge,
}

/// Statistics about a generated table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of glyphs in the table.
    pub glyphs: usize,
    /// Number of glyphs discarded because of their size.
    pub too_large: usize,
    /// Number of entries of `cfonts`.
    pub table_len: u64,
}

/// Accumulates glyphs, then renders the source file with [`TableBuilder::finish`] or through
/// its `Display` implementation.
#[derive(Debug, Default, Clone)]
pub struct TableBuilder {
    glyphs: BTreeMap<u32, Glyph>,
    too_large: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a glyph to the table.
    pub fn insert(&mut self, glyph: Glyph) -> Inserted {
        if self.reject_too_large(glyph.width, glyph.height) {
            return Inserted::TooLarge;
        }

        debug_assert_eq!(glyph.alphas.len() as u64, glyph.pixel_count());
        match self.glyphs.entry(glyph.code) {
            btree_map::Entry::Vacant(e) => {
                e.insert(glyph);
                Inserted::Added
            }
            btree_map::Entry::Occupied(mut e) => {
                e.insert(glyph);
                Inserted::Replaced
            }
        }
    }

    /// Returns `true` and counts the glyph as discarded if it has more than [`MAX_PIXEL_COUNT`]
    /// pixels. Lets an image be discarded before its code is known.
    pub fn reject_too_large(&mut self, width: u32, height: u32) -> bool {
        if u64::from(width) * u64::from(height) > MAX_PIXEL_COUNT {
            self.too_large += 1;
            true
        } else {
            false
        }
    }

    /// Number of entries of the `cfonts` table, i.e. the highest code plus one.
    pub fn table_len(&self) -> u64 {
        self.glyphs
            .keys()
            .next_back()
            .map_or(0, |max| u64::from(*max) + 1)
    }

    /// Distinct pixel counts, each of which needs a `cfont_pixels_<n>` array.
    pub fn pixel_counts(&self) -> BTreeSet<u64> {
        iter::once(placeholder_pixel_count())
            .chain(self.glyphs.values().map(Glyph::pixel_count))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            glyphs: self.glyphs.len(),
            too_large: self.too_large,
            table_len: self.table_len(),
        }
    }

    /// Renders the source file.
    pub fn finish(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(PRELUDE)?;

        for pixel_count in self.pixel_counts() {
            writeln!(f, "static Pixel cfont_pixels_{}[] {{", pixel_count)?;
            for _ in 0..pixel_count {
                writeln!(f, "  cfont_empty_pixel,")?;
            }
            writeln!(f, "}};")?;
        }

        let empty_len = placeholder_pixel_count();
        write_alphas(f, "cfont_empty_alpha", iter::repeat(0).take(empty_len as usize))?;
        write!(
            f,
            "\nstatic Image cfont_empty {{\n  cfont_pixels_{len},\n  cfont_empty_alpha,\n  \
             {x},\n  {y},\n  {composition},\n  {len},\n}};\n",
            len = empty_len,
            x = PLACEHOLDER_WIDTH,
            y = PLACEHOLDER_HEIGHT,
            composition = COMPOSITION,
        )?;

        for glyph in self.glyphs.values() {
            write_alphas(
                f,
                &format!("cfont_{}_alpha", glyph.code),
                glyph.alphas.iter().copied(),
            )?;
            writeln!(f, "static Image cfont_{} {{", glyph.code)?;
            writeln!(f, "  cfont_pixels_{},", glyph.pixel_count())?;
            writeln!(f, "  cfont_{}_alpha,", glyph.code)?;
            writeln!(
                f,
                "  {}, {}, {}, {}",
                glyph.width,
                glyph.height,
                COMPOSITION,
                glyph.pixel_count()
            )?;
            writeln!(f, "}};")?;
        }

        writeln!(f, "static Image cfonts[] {{")?;
        if let Some(max) = self.glyphs.keys().next_back() {
            for code in 0..=*max {
                if self.glyphs.contains_key(&code) {
                    writeln!(f, "  cfont_{},", code)?;
                } else {
                    writeln!(f, "  cfont_empty,")?;
                }
            }
        }
        writeln!(f, "}};")
    }
}

fn placeholder_pixel_count() -> u64 {
    u64::from(PLACEHOLDER_WIDTH) * u64::from(PLACEHOLDER_HEIGHT)
}

fn write_alphas(
    f: &mut fmt::Formatter,
    name: &str,
    alphas: impl Iterator<Item = u8>,
) -> fmt::Result {
    write!(f, "static UINT8 {}[] {{", name)?;
    for alpha in alphas {
        write!(f, "{},", alpha)?;
    }
    writeln!(f, "}};")
}

/// Decodes every image of `images_dir` and gathers them into a [`TableBuilder`].
///
/// Every file directly inside `images_dir` must be a PNG whose name is a code, such as `65.png`.
/// The only exception is images that are too large, which are skipped before their name is
/// looked at.
pub fn load(images_dir: &Path) -> Result<TableBuilder, Error> {
    let mut builder = TableBuilder::new();

    for entry in walkdir::WalkDir::new(images_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let (width, height, alphas) = glyph::decode(&fs::read(path)?)
            .map_err(|err| glyph::Error::Decode(path.to_owned(), err))?;

        if builder.reject_too_large(width, height) {
            log::debug!("Skipping {} ({}x{})", path.display(), width, height);
            continue;
        }

        let code = glyph::parse_code(path)?;
        let glyph = Glyph {
            code,
            width,
            height,
            alphas,
        };
        if builder.insert(glyph) == Inserted::Replaced {
            log::warn!(
                "{} replaces a previous glyph with code {}",
                path.display(),
                code
            );
        }
    }

    Ok(builder)
}

/// Generates the source file from the images of `images_dir`.
pub fn generate(images_dir: &Path) -> Result<String, Error> {
    Ok(load(images_dir)?.finish())
}

/// Generates the source file from the images of `images_dir` and writes it to `output`.
///
/// `output` is only written once every image has been successfully processed. On error, any
/// existing file at `output` is left untouched.
pub fn write(images_dir: &Path, output: &Path) -> Result<Summary, Error> {
    let builder = load(images_dir)?;
    let summary = builder.summary();
    fs::write(output, builder.finish())?;
    Ok(summary)
}
