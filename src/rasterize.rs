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

//! Rendering of the text sources into PNG files, using an external rasterizer.
//!
//! The rasterizer is expected to behave like ImageMagick's `convert`. The label is passed through
//! the standard input of the process (`label:@-`), so that the rasterizer receives exactly the
//! bytes of the text file.

use std::{
    collections::HashSet,
    ffi::OsString,
    fs,
    io::{self, Write as _},
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};

/// Configuration for rasterizing a directory of text files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name or path of the rasterizer executable.
    pub program: OsString,

    /// Font file passed to the rasterizer.
    pub font: PathBuf,

    /// Size of the font, in points.
    pub point_size: u32,

    /// Directory containing one text file per glyph.
    pub texts_dir: PathBuf,

    /// Directory where PNG files are written. Created if necessary.
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program: "convert".into(),
            font: "JF-Dot-Kappa20-0213.ttf".into(),
            point_size: 20,
            texts_dir: "texts".into(),
            out_dir: PathBuf::from("fs").join("fonts"),
        }
    }
}

/// Error that can happen while rasterizing.
///
/// Note that a failure of the rasterizer itself is never an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to list text files: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// One call to the rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// File the label has been read from.
    pub text_file: PathBuf,

    /// Verbatim content of `text_file`.
    pub label: Vec<u8>,

    /// PNG file to generate.
    pub output: PathBuf,
}

impl Invocation {
    /// Builds the command that renders this label. The label must then be written to its stdin.
    pub fn command(&self, cfg: &Config) -> Command {
        let mut command = Command::new(&cfg.program);
        command
            .args(&["-background", "none"])
            .args(&["-fill", "black"])
            .arg("+antialias")
            .arg("-font")
            .arg(&cfg.font)
            .arg("-pointsize")
            .arg(cfg.point_size.to_string())
            .arg("label:@-")
            .arg(&self.output);
        command
    }

    fn execute(&self, cfg: &Config) -> Result<ExitStatus, io::Error> {
        let mut command = self.command(cfg);
        log::info!("{:?}", command);

        let mut child = command.stdin(Stdio::piped()).spawn()?;
        let written = match child.stdin.take() {
            // Dropping `stdin` closes the pipe, which lets the rasterizer know the label is over.
            Some(mut stdin) => stdin.write_all(&self.label),
            None => Ok(()),
        };
        let status = child.wait()?;
        written?;
        Ok(status)
    }
}

/// Lists the text files of the texts directory and reads their content.
///
/// Sub-directories are ignored. The list is sorted by file name.
///
/// Files that only differ by their extension, such as `65` and `65.txt`, produce the same PNG.
/// The later one overwrites the earlier one.
pub fn plan(cfg: &Config) -> Result<Vec<Invocation>, Error> {
    let mut out = Vec::new();
    let mut outputs = HashSet::new();

    for entry in walkdir::WalkDir::new(&cfg.texts_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let mut png_name = entry
            .path()
            .file_stem()
            .map_or_else(|| entry.file_name().to_owned(), |s| s.to_owned());
        png_name.push(".png");
        let output = cfg.out_dir.join(png_name);

        if !outputs.insert(output.clone()) {
            log::warn!(
                "{} overwrites a previous rendering into {}",
                entry.path().display(),
                output.display()
            );
        }

        out.push(Invocation {
            label: fs::read(entry.path())?,
            output,
            text_file: entry.into_path(),
        });
    }

    Ok(out)
}

/// Rasterizes every file of the texts directory, one after the other.
///
/// Returns the number of invocations of the rasterizer. Invocations that fail are logged and
/// otherwise ignored; the missing glyphs simply end up as placeholders in the generated table.
pub fn run(cfg: &Config) -> Result<usize, Error> {
    fs::create_dir_all(&cfg.out_dir)?;

    let invocations = plan(cfg)?;
    for invocation in &invocations {
        match invocation.execute(cfg) {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!(
                "Rasterizing {} exited with {}",
                invocation.text_file.display(),
                status
            ),
            Err(err) => log::warn!(
                "Failed to rasterize {}: {}",
                invocation.text_file.display(),
                err
            ),
        }
    }

    Ok(invocations.len())
}
