use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::{create_layout, write_bytes, write_jpeg, write_label};

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("yolo2flat 0.1.0\n");
}

#[test]
fn convert_writes_list_relative_to_working_dir() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, _) = create_layout(temp.path());
    write_jpeg(&images.join("a.jpg"), 100, 200);
    write_label(&labels, "a.txt", "0 0.5 0.5 0.2 0.4\n");

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.current_dir(temp.path());
    cmd.args([
        "convert",
        "--images",
        "images",
        "--labels",
        "labels",
        "--output",
        "list.txt",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("1 records written"));

    let text = fs::read_to_string(temp.path().join("list.txt")).expect("read output");
    assert_eq!(text, "images/a.jpg 1 40.0 60.0 20.0 80.0 1\n");
}

#[test]
fn convert_json_report() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, out) = create_layout(temp.path());
    write_jpeg(&images.join("a.jpg"), 100, 200);
    write_bytes(&images.join("b.jpg"), &common::corrupt_jpeg_bytes());
    write_label(&labels, "a.txt", "0 0.5 0.5 0.2 0.4\n");
    write_label(&labels, "b.txt", "0 0.5 0.5 0.2 0.4\n");

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out)
        .args(["--report", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"records_written\": 1"))
        .stdout(predicates::str::contains("\"skipped_unreadable_images\": 1"))
        .stdout(predicates::str::contains("\"code\": \"image_unreadable\""));
}

#[test]
fn convert_applies_config_and_flag_overrides() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, out) = create_layout(temp.path());
    write_jpeg(&images.join("a.jpg"), 100, 200);
    write_label(&labels, "a.txt", "0 0.5 0.5 0.2 0.4\n2 0.5 0.5 0.2 0.4\n");
    let config = temp.path().join("convert.yaml");
    fs::write(&config, "class_code: 5\nclass_map:\n  2: 9\n").expect("write config");

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .args(["--class-code", "3"]);
    cmd.assert().success();

    let text = fs::read_to_string(&out).expect("read output");
    assert!(text.ends_with(" 2 40.0 60.0 20.0 80.0 3 40.0 60.0 20.0 80.0 9\n"));
}

#[test]
fn convert_malformed_label_fails_unless_skipped() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, out) = create_layout(temp.path());
    write_jpeg(&images.join("a.jpg"), 100, 200);
    write_label(&labels, "a.txt", "0 0.5 0.5\n");

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("line 1"));

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out)
        .args(["--on-malformed", "skip-file"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("1 malformed labels"));
}

#[test]
fn convert_unsupported_report_format_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, out) = create_layout(temp.path());

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out)
        .args(["--report", "yaml"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format"));
    assert!(!out.exists());
}

#[test]
fn convert_missing_image_dir_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(temp.path().join("nope"))
        .arg("--labels")
        .arg(temp.path())
        .arg("--output")
        .arg(temp.path().join("out.txt"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read image directory"));
}

#[test]
fn convert_text_report_notes_dropped_images() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, out) = create_layout(temp.path());
    write_jpeg(&images.join("a.jpg"), 100, 200);
    write_bytes(&images.join("b.jpg"), &common::corrupt_jpeg_bytes());
    write_label(&labels, "a.txt", "0 0.5 0.5 0.2 0.4\n");
    write_label(&labels, "b.txt", "0 0.5 0.5 0.2 0.4\n");

    let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
    cmd.arg("convert")
        .arg("--images")
        .arg(&images)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Some labelled images were dropped"));
}

#[test]
fn convert_no_sort_overrides_config() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let (images, labels, out) = create_layout(temp.path());
    write_jpeg(&images.join("a.jpg"), 100, 200);
    write_label(&labels, "a.txt", "0 0.5 0.5 0.2 0.4\n");
    let config = temp.path().join("convert.yaml");
    fs::write(&config, "sort_images: true\n").expect("write config");

    let run = |extra: &[&str]| {
        let mut cmd = Command::cargo_bin("yolo2flat").unwrap();
        cmd.arg("convert")
            .arg("--images")
            .arg(&images)
            .arg("--labels")
            .arg(&labels)
            .arg("--output")
            .arg(&out)
            .arg("--config")
            .arg(&config)
            .args(["--report", "json"])
            .args(extra);
        cmd.assert().success()
    };

    run(&[]).stdout(predicates::str::contains("enumeration_order").not());
    run(&["--no-sort"]).stdout(predicates::str::contains("\"code\": \"enumeration_order\""));
    run(&["--no-sort", "--sort"]).stdout(predicates::str::contains("enumeration_order").not());
}
