//! Smoke tests for the `media-resolve` binary.

use std::fs;
use std::io::Write;
use std::process::Command;

use flate2::write::GzEncoder;
use flate2::Compression;
use zip::write::FileOptions;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_media-resolve"))
}

#[test]
fn load_reports_gzip_image_size() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let gz_path = tmp.path().join("disk.d64.gz");
    let gz_file = fs::File::create(&gz_path).expect("create gzip");
    let mut gz = GzEncoder::new(gz_file, Compression::default());
    gz.write_all(&[0u8; 4096]).expect("write gzip payload");
    gz.finish().expect("finish gzip");

    let output = binary()
        .arg("load")
        .arg(&gz_path)
        .output()
        .expect("run media-resolve");

    assert!(
        output.status.success(),
        "load failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kind=gzip"), "got: {stdout}");
    assert!(stdout.contains("bytes=4096"), "got: {stdout}");
}

#[test]
fn load_substitutes_extension_from_list() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    fs::write(tmp.path().join("game.t64"), b"tape").expect("write image");

    let output = binary()
        .arg("load")
        .arg(tmp.path().join("game.d64"))
        .arg("--ext")
        .arg(".d64,.t64")
        .output()
        .expect("run media-resolve");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("game.t64"), "got: {stdout}");
    assert!(stdout.contains("bytes=4"), "got: {stdout}");
}

#[test]
fn load_missing_file_exits_with_failure() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let output = binary()
        .arg("load")
        .arg(tmp.path().join("missing.d64"))
        .output()
        .expect("run media-resolve");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("media not found"));
}

#[test]
fn ls_prints_virtual_listing() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("tree.zip");
    let mut zip = zip::ZipWriter::new(fs::File::create(&zip_path).expect("create zip"));
    zip.start_file("disks/a.d64", FileOptions::default())
        .expect("start member");
    zip.write_all(b"a").expect("write member");
    zip.start_file("top.t64", FileOptions::default())
        .expect("start member");
    zip.write_all(b"t").expect("write member");
    zip.finish().expect("finish zip");

    let output = binary()
        .arg("ls")
        .arg(&zip_path)
        .output()
        .expect("run media-resolve");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, [".. ../", "d disks/", "f top.t64"]);
}

#[test]
fn invalid_config_exits_with_usage_error() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let cfg = tmp.path().join("cfg.json");
    fs::write(&cfg, r#"{ "max_image_bytes": 0 }"#).expect("write config");

    let output = binary()
        .arg("--config")
        .arg(&cfg)
        .arg("path")
        .arg("/a/b")
        .output()
        .expect("run media-resolve");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn path_prints_normalized_forms() {
    let output = binary()
        .args(["path", "/media/./disks/../games/elite.d64", "--up", "1"])
        .output()
        .expect("run media-resolve");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("normalized=/media/games/elite.d64"), "got: {stdout}");
    assert!(stdout.contains("ascended=/media/games/"), "got: {stdout}");
}
