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

//! Offline pipeline that turns text labels into glyph tables for bare-metal firmware.
//!
//! # Firmware environment
//!
//! The firmware that consumes the output of this crate runs without a file system and without
//! any image decoding library. Text is therefore rendered ahead of time, and each rendered label
//! is embedded in the firmware as a static table that can be looked up by a numeric code.
//!
//! The pipeline has three stages, each of them communicating with the next one only through a
//! directory on disk:
//!
//! - [`charset`] writes one text file per character mapped by a TrueType font. The name of each
//! file is the decimal code point of the character.
//! - [`rasterize`] invokes an external rasterizer (ImageMagick's `convert`) once per text file,
//! producing one transparent PNG per label.
//! - [`table`] reads back every PNG and generates a single C++ source file.
//!
//! ## Generated source
//!
//! The generated file declares the following, which the firmware code relies upon:
//!
//! ```cpp
//! struct _Image {
//!     Pixel *pixels;
//!     UINT8 *alphas;
//!     int x;
//!     int y;
//!     int composition;
//!     int length;
//! };
//!
//! static Image cfonts[] { ... };
//! ```
//!
//! `cfonts[code]` is the glyph whose PNG was named `<code>.png`. Codes for which no glyph exists
//! point to `cfont_empty`, a blank 11x22 glyph.

pub mod charset;
pub mod glyph;
pub mod rasterize;
pub mod table;
