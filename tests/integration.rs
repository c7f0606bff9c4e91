use std::fs;
use std::path::Path;

use card_unmatte::{
    convert_file, is_card_image, load_image, process_directory, process_file, save_image, Error,
    OutputFormat, ProcessOptions,
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

/// A small card: white background, a red pip, a pink border and a black corner.
fn card_fixture() -> RgbImage {
    let mut img = RgbImage::from_pixel(12, 16, Rgb([255, 255, 255]));
    img.put_pixel(5, 7, Rgb([255, 0, 0]));
    img.put_pixel(0, 1, Rgb([255, 128, 128]));
    img.put_pixel(11, 15, Rgb([0, 0, 0]));
    img
}

fn write_card(dir: &Path, name: &str) {
    card_fixture().save(dir.join(name)).unwrap();
}

fn assert_card_converted(path: &Path) {
    let out = load_image(path).unwrap();
    assert_eq!(out.dimensions(), (12, 16));
    assert_eq!(*out.get_pixel(3, 3), Rgba([0, 0, 0, 0]));
    assert_eq!(*out.get_pixel(5, 7), Rgba([255, 0, 0, 255]));
    assert_eq!(*out.get_pixel(0, 1), Rgba([255, 0, 0, 127]));
    assert_eq!(*out.get_pixel(11, 15), Rgba([0, 0, 0, 255]));
}

#[test]
fn convert_file_writes_lossless_webp() {
    let dir = TempDir::new().unwrap();
    write_card(dir.path(), "AS.png");
    let output = dir.path().join("out").join("AS.webp");

    convert_file(&dir.path().join("AS.png"), &output, OutputFormat::WebP).unwrap();

    assert_eq!(
        image::ImageFormat::from_path(&output).unwrap(),
        image::ImageFormat::WebP
    );
    assert_card_converted(&output);
}

#[test]
fn convert_file_writes_png() {
    let dir = TempDir::new().unwrap();
    write_card(dir.path(), "KH.png");
    let output = dir.path().join("KH_transparent.png");

    convert_file(&dir.path().join("KH.png"), &output, OutputFormat::Png).unwrap();

    assert_card_converted(&output);
}

#[test]
fn translucent_source_is_left_unchanged() {
    let dir = TempDir::new().unwrap();
    let src = RgbaImage::from_fn(8, 8, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let v = (x * 30 + y) as u8;
        Rgba([v, 255 - v, 128, 200])
    });
    let input = dir.path().join("QD.png");
    src.save(&input).unwrap();
    let output = dir.path().join("QD.out.png");

    convert_file(&input, &output, OutputFormat::Png).unwrap();

    assert_eq!(load_image(&output).unwrap(), src);
}

#[test]
fn process_directory_only_converts_card_names() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_card(input.path(), "AS.webp");
    write_card(input.path(), "10.png");
    write_card(input.path(), "joker.png");
    fs::write(input.path().join("readme.txt"), "not a card").unwrap();
    fs::create_dir(input.path().join("JD")).unwrap();

    let results = process_directory(input.path(), output.path(), &ProcessOptions::default());

    let names: Vec<_> = results
        .iter()
        .map(|r| r.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["10.png", "AS.webp"]);
    assert!(results.iter().all(|r| r.success));

    let mut written: Vec<_> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    written.sort();
    assert_eq!(written, ["10.webp", "AS.webp"]);
    assert_card_converted(&output.path().join("10.webp"));
    assert_card_converted(&output.path().join("AS.webp"));
}

#[test]
fn process_directory_creates_missing_output_dir() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let nested = output.path().join("deck").join("faces");
    write_card(input.path(), "2C.png");

    let opts = ProcessOptions {
        format: OutputFormat::Png,
        ..ProcessOptions::default()
    };
    let results = process_directory(input.path(), &nested, &opts);

    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].output.as_deref(), Some(nested.join("2C.png").as_path()));
    assert_card_converted(&nested.join("2C.png"));
}

#[test]
fn process_directory_continues_past_bad_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("3H.png"), b"definitely not a png").unwrap();
    write_card(input.path(), "4H.png");

    let results = process_directory(input.path(), output.path(), &ProcessOptions::default());

    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert!(results[0].message.contains("3H.png"));
    assert!(results[1].success);
    assert!(!output.path().join("3H.webp").exists());
    assert!(output.path().join("4H.webp").exists());
}

#[test]
fn process_directory_fail_fast_stops_at_first_failure() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("3H.png"), b"garbage").unwrap();
    write_card(input.path(), "4H.png");

    let opts = ProcessOptions {
        fail_fast: true,
        ..ProcessOptions::default()
    };
    let results = process_directory(input.path(), output.path(), &opts);

    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert!(!output.path().join("4H.webp").exists());
}

#[test]
fn load_image_reports_decode_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("5S.png");
    fs::write(&path, b"\x89PNG\r\n\x1a\ntruncated").unwrap();

    let err = load_image(&path).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[test]
fn save_image_reports_unwritable_output() {
    let dir = TempDir::new().unwrap();
    // A regular file where the output directory should be.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let img = RgbaImage::new(2, 2);
    let err = save_image(&img, &blocker.join("6S.webp"), OutputFormat::WebP).unwrap_err();
    assert!(matches!(err, Error::Io(_) | Error::Encode { .. }), "got {err:?}");
}

#[test]
fn process_file_ignores_card_naming_for_single_files() {
    let dir = TempDir::new().unwrap();
    write_card(dir.path(), "joker.png");
    let input = dir.path().join("joker.png");
    assert!(!is_card_image(&input));

    let output = dir.path().join("joker_transparent.webp");
    let result = process_file(&input, &output, &ProcessOptions::default());

    assert!(result.success, "{}", result.message);
    assert_card_converted(&output);
}
