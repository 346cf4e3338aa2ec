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

use super::{generate, load, write, Error, Inserted, Summary, TableBuilder, PRELUDE};
use crate::glyph::{self, Glyph};

use std::{fs, path::Path};
use tempdir::TempDir;

fn save_png(dir: &Path, name: &str, width: u32, height: u32, alpha: u8) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, alpha]))
        .save(dir.join(name))
        .unwrap();
}

/// Returns the entries of the `cfonts` table.
fn table_entries(source: &str) -> Vec<&str> {
    let start = source.find("static Image cfonts[] {\n").unwrap();
    source[start..]
        .lines()
        .skip(1)
        .take_while(|line| *line != "};")
        .collect()
}

fn pixels_definition(len: usize) -> String {
    format!(
        "static Pixel cfont_pixels_{}[] {{\n{}}};\n",
        len,
        "  cfont_empty_pixel,\n".repeat(len)
    )
}

#[test]
fn single_glyph() {
    let dir = TempDir::new("cfont-table").unwrap();
    save_png(dir.path(), "65.png", 10, 20, 255);

    let source = generate(dir.path()).unwrap();

    assert!(source.starts_with(PRELUDE));
    assert!(source.contains(&format!(
        "static UINT8 cfont_65_alpha[] {{{}}};\n",
        "255,".repeat(200)
    )));
    assert!(source.contains(
        "static Image cfont_65 {\n  cfont_pixels_200,\n  cfont_65_alpha,\n  10, 20, 4, 200\n};\n"
    ));
    assert!(source.contains(&pixels_definition(200)));
    assert!(source.contains(&pixels_definition(242)));

    let entries = table_entries(&source);
    assert_eq!(entries.len(), 66);
    assert_eq!(entries[65], "  cfont_65,");
    assert!(entries[..65].iter().all(|e| *e == "  cfont_empty,"));
}

#[test]
fn no_glyph() {
    let dir = TempDir::new("cfont-table").unwrap();

    let expected = format!(
        "{}{}static UINT8 cfont_empty_alpha[] {{{}}};\n\nstatic Image cfont_empty {{\n  \
         cfont_pixels_242,\n  cfont_empty_alpha,\n  11,\n  22,\n  4,\n  242,\n}};\n\
         static Image cfonts[] {{\n}};\n",
        PRELUDE,
        pixels_definition(242),
        "0,".repeat(242)
    );

    assert_eq!(generate(dir.path()).unwrap(), expected);
}

#[test]
fn size_limit() {
    let dir = TempDir::new("cfont-table").unwrap();
    save_png(dir.path(), "1.png", 50, 100, 7);
    save_png(dir.path(), "2.png", 3, 1667, 7);
    // Too large images are skipped before their name is parsed.
    save_png(dir.path(), "banner.png", 100, 100, 7);

    let builder = load(dir.path()).unwrap();
    assert_eq!(
        builder.summary(),
        Summary {
            glyphs: 1,
            too_large: 2,
            table_len: 2,
        }
    );

    let source = builder.finish();
    assert!(source.contains("static Image cfont_1 {"));
    assert!(!source.contains("cfont_2"));
    assert!(!source.contains("cfont_pixels_5001"));
    assert_eq!(table_entries(&source), ["  cfont_empty,", "  cfont_1,"]);
}

#[test]
fn bad_file_name_leaves_output_alone() {
    let dir = TempDir::new("cfont-table").unwrap();
    let images = dir.path().join("fonts");
    fs::create_dir(&images).unwrap();
    save_png(&images, "65.png", 10, 20, 255);
    save_png(&images, "abc.png", 10, 20, 255);

    let output = dir.path().join("cfonts.cpp");
    assert!(matches!(
        write(&images, &output),
        Err(Error::Glyph(glyph::Error::BadFileName(_)))
    ));
    assert!(!output.exists());

    fs::write(&output, "previous").unwrap();
    assert!(write(&images, &output).is_err());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn corrupt_image() {
    let dir = TempDir::new("cfont-table").unwrap();
    fs::write(dir.path().join("3.png"), b"garbage").unwrap();

    assert!(matches!(
        generate(dir.path()),
        Err(Error::Glyph(glyph::Error::Decode(..)))
    ));
}

#[test]
fn write_output() {
    let dir = TempDir::new("cfont-table").unwrap();
    let images = dir.path().join("fonts");
    fs::create_dir(&images).unwrap();
    fs::create_dir(images.join("ignored")).unwrap();
    save_png(&images, "0.png", 2, 3, 1);
    save_png(&images, "2.png", 3, 2, 2);

    let output = dir.path().join("cfonts.cpp");
    fs::write(&output, "previous").unwrap();

    let summary = write(&images, &output).unwrap();
    assert_eq!(summary.glyphs, 2);
    assert_eq!(summary.table_len, 3);

    let source = fs::read_to_string(&output).unwrap();
    assert_eq!(source, generate(&images).unwrap());
    assert_eq!(
        table_entries(&source),
        ["  cfont_0,", "  cfont_empty,", "  cfont_2,"]
    );
    // Both glyphs have 6 pixels and share the same array.
    assert_eq!(source.matches("static Pixel cfont_pixels_6[]").count(), 1);
    assert_eq!(source.matches("static Pixel cfont_pixels_").count(), 2);
}

#[test]
fn deterministic() {
    let dir = TempDir::new("cfont-table").unwrap();
    save_png(dir.path(), "12.png", 4, 4, 128);
    save_png(dir.path(), "7.png", 8, 2, 64);
    save_png(dir.path(), "30.png", 5, 5, 0);

    assert_eq!(generate(dir.path()).unwrap(), generate(dir.path()).unwrap());
}

#[test]
fn pixels_defined_before_use() {
    let dir = TempDir::new("cfont-table").unwrap();
    save_png(dir.path(), "1.png", 4, 4, 128);
    save_png(dir.path(), "2.png", 9, 3, 64);

    let source = generate(dir.path()).unwrap();
    for len in &[16, 27, 242] {
        let definition = source
            .find(&format!("static Pixel cfont_pixels_{}[]", len))
            .unwrap();
        let first_use = source.find(&format!("  cfont_pixels_{},", len)).unwrap();
        assert!(definition < first_use);
    }
}

#[test]
fn duplicate_codes() {
    let dir = TempDir::new("cfont-table").unwrap();
    save_png(dir.path(), "065.png", 2, 2, 10);
    save_png(dir.path(), "65.png", 3, 3, 20);

    let builder = load(dir.path()).unwrap();
    assert_eq!(builder.summary().glyphs, 1);
    assert!(!builder.pixel_counts().contains(&4));

    let source = builder.finish();
    assert_eq!(source.matches("static Image cfont_65 {").count(), 1);
    assert!(source.contains("  3, 3, 4, 9\n"));
}

#[test]
fn builder_insert() {
    let mut builder = TableBuilder::new();
    let glyph = |code, width, height| Glyph {
        code,
        width,
        height,
        alphas: vec![0; (width * height) as usize],
    };

    assert_eq!(builder.insert(glyph(3, 2, 2)), Inserted::Added);
    assert_eq!(builder.insert(glyph(3, 1, 1)), Inserted::Replaced);
    assert_eq!(builder.insert(glyph(4, 5001, 1)), Inserted::TooLarge);
    assert_eq!(builder.insert(glyph(5, 5000, 1)), Inserted::Added);

    assert_eq!(builder.table_len(), 6);
    assert_eq!(
        builder.pixel_counts().into_iter().collect::<Vec<_>>(),
        [1, 242, 5000]
    );
}

#[test]
fn reject_before_insert() {
    let mut builder = TableBuilder::new();
    assert!(!builder.reject_too_large(50, 100));
    assert!(builder.reject_too_large(3, 1667));
    assert!(builder.reject_too_large(u32::MAX, u32::MAX));

    assert_eq!(
        builder.summary(),
        Summary {
            glyphs: 0,
            too_large: 2,
            table_len: 0,
        }
    );
}
