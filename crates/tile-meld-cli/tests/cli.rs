use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn tile_meld() -> Command {
    Command::cargo_bin("tile-meld").expect("binary")
}

fn write_input(dir: &std::path::Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("input.json");
    fs::write(&path, json).expect("write input");
    path
}

#[test]
fn melds_one_pixel_gap() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [
            {"x": 0, "y": 0, "width": 10, "height": 10},
            {"x": 11, "y": 0, "width": 10, "height": 10}
        ]}"#,
    );

    let out = tile_meld()
        .args(["meld", "--threshold", "5", "--input"])
        .arg(&input)
        .output()
        .expect("run");
    assert!(out.status.success());

    let report: Value = serde_json::from_slice(&out.stdout).expect("report json");
    assert_eq!(report["did_meld"], Value::Bool(true));
    assert_eq!(report["passes"], 1);
    assert_eq!(
        report["melds"],
        serde_json::json!([{"x": 0, "y": 0, "width": 21, "height": 10}])
    );
}

#[test]
fn config_file_and_output_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [
            {"x": 0, "y": 0, "width": 10, "height": 10},
            {"x": 20, "y": 0, "width": 10, "height": 10}
        ]}"#,
    );
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"threshold": 5.0}"#).expect("write config");
    let output = dir.path().join("out/report.json");

    tile_meld()
        .args(["meld", "--input"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report: Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("report")).expect("json");
    assert_eq!(report["did_meld"], Value::Bool(false));
    assert_eq!(report["melds"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["threshold"], 5.0);
}

#[test]
fn until_stable_runs_extra_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [
            {"x": 0, "y": 0, "width": 10, "height": 10},
            {"x": 14, "y": 0, "width": 10, "height": 10},
            {"x": 12, "y": 14, "width": 0, "height": 5}
        ]}"#,
    );

    let out = tile_meld()
        .args(["meld", "--threshold", "4.2", "--until-stable", "--input"])
        .arg(&input)
        .output()
        .expect("run");
    assert!(out.status.success());
    let report: Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["passes"], 3);
    assert_eq!(
        report["melds"],
        serde_json::json!([{"x": 0, "y": 0, "width": 24, "height": 19}])
    );
}

#[test]
fn rejects_negative_threshold() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path(), "{}");
    tile_meld()
        .args(["meld", "--threshold=-1", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn rejects_invalid_box_in_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [{"x": 0, "y": 0, "width": -4, "height": 1}]}"#,
    );
    tile_meld()
        .args(["meld", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid box geometry"));
}

#[test]
fn empty_input_gives_empty_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path(), "{}");
    let out = tile_meld()
        .args(["meld", "--input"])
        .arg(&input)
        .output()
        .expect("run");
    assert!(out.status.success());
    let report: Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["did_meld"], Value::Bool(false));
    assert_eq!(report["melds"], serde_json::json!([]));
}

#[test]
fn writes_padded_crops() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("frame.png");
    image::GrayImage::from_fn(64, 48, |x, y| image::Luma([((x + y) % 256) as u8]))
        .save(&image_path)
        .expect("save image");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [
            {"x": 2, "y": 2, "width": 10, "height": 10},
            {"x": 40, "y": 30, "width": 10, "height": 10}
        ]}"#,
    );
    let crops = dir.path().join("crops");

    let out = tile_meld()
        .args(["meld", "--threshold", "3", "--padding", "4", "--input"])
        .arg(&input)
        .arg("--image")
        .arg(&image_path)
        .arg("--crop-dir")
        .arg(&crops)
        .output()
        .expect("run");
    assert!(out.status.success());

    let report: Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["crops"].as_array().map(Vec::len), Some(2));

    let first = image::open(crops.join("meld_000.png"))
        .expect("crop 0")
        .to_luma8();
    assert_eq!(first.dimensions(), (16, 16));
    let second = image::open(crops.join("meld_001.png"))
        .expect("crop 1")
        .to_luma8();
    assert_eq!(second.dimensions(), (18, 18));
}

#[test]
fn crop_dir_requires_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path(), "{}");
    tile_meld()
        .args(["meld", "--input"])
        .arg(&input)
        .arg("--crop-dir")
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn distance_between_diagonal_boxes() {
    tile_meld()
        .args([
            "distance",
            "--first",
            "0,0,10,10",
            "--second",
            "20,20,10,10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance=14.142 overlap=false"));
}

#[test]
fn distance_of_overlapping_boxes_is_zero() {
    tile_meld()
        .args(["distance", "--first", "-5,-5,10,10", "--second", "0,0,10,10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance=0.000 overlap=true"));
}

#[test]
fn log_level_comes_from_env_unless_flag_given() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [{"x": 0, "y": 0, "width": 10, "height": 10}]}"#,
    );

    tile_meld()
        .env("TILE_MELD_LOG", "info")
        .args(["meld", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO tile_meld] 1 boxes (0 contours)"));

    tile_meld()
        .env("TILE_MELD_LOG", "info")
        .args(["--log-level", "off", "meld", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn melds_span_wider_than_i32() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        r#"{"boxes": [
            {"x": -2147483648, "y": 0, "width": 0, "height": 0},
            {"x": 2147483647, "y": 0, "width": 0, "height": 0}
        ]}"#,
    );

    let out = tile_meld()
        .args(["meld", "--threshold", "1e10", "--input"])
        .arg(&input)
        .output()
        .expect("run");
    assert!(out.status.success());
    let report: Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(
        report["melds"],
        serde_json::json!([{"x": -2147483648, "y": 0, "width": 4294967295u64, "height": 0}])
    );
}
