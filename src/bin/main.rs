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

use cfont_builder::{charset, rasterize, table};
use std::{error, ffi::OsString, path::PathBuf, process};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cfont-builder",
    about = "Generates glyph tables for firmware that can't decode images."
)]
enum CliOptions {
    /// Writes one text file per character of a font.
    Texts {
        /// TrueType font whose character map is used.
        #[structopt(long, parse(from_os_str), default_value = "JF-Dot-Kappa20-0213.ttf")]
        font: PathBuf,

        /// Directory where to write the text files.
        #[structopt(long, parse(from_os_str), default_value = "texts")]
        texts_dir: PathBuf,
    },

    /// Renders every text file into a PNG.
    Rasterize(RasterizeOptions),

    /// Generates the glyph table from a directory of PNGs.
    Emit(EmitOptions),

    /// Renders every text file, then generates the glyph table.
    All {
        #[structopt(flatten)]
        rasterize: RasterizeOptions,

        /// Path to the output file. Any existing file will be overwritten.
        #[structopt(short, long, parse(from_os_str), default_value = "cfonts.cpp")]
        out: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
struct RasterizeOptions {
    /// Rasterizer to invoke. Must accept the command line of ImageMagick's `convert`.
    #[structopt(long, parse(from_os_str), default_value = "convert")]
    rasterizer: OsString,

    /// Font used to render the labels.
    #[structopt(long, parse(from_os_str), default_value = "JF-Dot-Kappa20-0213.ttf")]
    font: PathBuf,

    /// Size of the font, in points.
    #[structopt(long, default_value = "20")]
    point_size: u32,

    /// Directory containing one text file per glyph.
    #[structopt(long, parse(from_os_str), default_value = "texts")]
    texts_dir: PathBuf,

    /// Directory where to write the PNG files.
    #[structopt(long, parse(from_os_str), default_value = "fs/fonts")]
    images_dir: PathBuf,
}

#[derive(Debug, StructOpt)]
struct EmitOptions {
    /// Directory containing one PNG file per glyph, named after the code of the glyph.
    #[structopt(long, parse(from_os_str), default_value = "fs/fonts")]
    images_dir: PathBuf,

    /// Path to the output file. Any existing file will be overwritten.
    #[structopt(short, long, parse(from_os_str), default_value = "cfonts.cpp")]
    out: PathBuf,
}

impl From<RasterizeOptions> for rasterize::Config {
    fn from(opts: RasterizeOptions) -> Self {
        rasterize::Config {
            program: opts.rasterizer,
            font: opts.font,
            point_size: opts.point_size,
            texts_dir: opts.texts_dir,
            out_dir: opts.images_dir,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run(CliOptions::from_args()) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(cli_opts: CliOptions) -> Result<(), Box<dyn error::Error>> {
    match cli_opts {
        CliOptions::Texts { font, texts_dir } => {
            let written = charset::write_texts(&font, &texts_dir)?;
            log::info!("Wrote {} text files to {}", written, texts_dir.display());
        }
        CliOptions::Rasterize(opts) => {
            rasterize_all(&opts.into())?;
        }
        CliOptions::Emit(opts) => {
            emit(&opts)?;
        }
        CliOptions::All { rasterize, out } => {
            let cfg = rasterize::Config::from(rasterize);
            rasterize_all(&cfg)?;
            emit(&EmitOptions {
                images_dir: cfg.out_dir,
                out,
            })?;
        }
    }

    Ok(())
}

fn rasterize_all(cfg: &rasterize::Config) -> Result<(), rasterize::Error> {
    let invocations = rasterize::run(cfg)?;
    log::info!(
        "Invoked the rasterizer {} times, output in {}",
        invocations,
        cfg.out_dir.display()
    );
    Ok(())
}

fn emit(opts: &EmitOptions) -> Result<(), table::Error> {
    let summary = table::write(&opts.images_dir, &opts.out)?;
    log::info!(
        "Wrote {} glyphs ({} too large, {} table entries) to {}",
        summary.glyphs,
        summary.too_large,
        summary.table_len,
        opts.out.display()
    );
    Ok(())
}
