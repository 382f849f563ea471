use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn huffpack() -> Command {
    Command::new(env!("CARGO_BIN_EXE_huffpack"))
}

#[test]
fn unknown_mode_prints_hint_and_exits_zero() {
    let out = huffpack().arg("squash").arg("file.txt").output().unwrap();
    assert!(out.status.success(), "status: {:?}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Invalid option. Please choose 'compress' or 'decompress'"),
        "stdout: {stdout}"
    );
}

#[test]
fn missing_input_exits_non_zero() {
    let dir = tempdir().unwrap();
    let out = huffpack()
        .arg("compress")
        .arg(dir.path().join("absent.txt"))
        .arg(dir.path().join("absent.huff"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Cannot open input file"), "stderr: {stderr}");
    assert!(!dir.path().join("absent.huff").exists());
}

#[test]
fn corrupt_archive_exits_non_zero() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("bad.huff");
    // one symbol, bit length 9, but only one packed byte
    fs::write(&archive, [1, 0, 0, 0, b'x', 9, 0, 0, 0, 9, 0, 0, 0, 0]).unwrap();

    let out = huffpack().arg("decompress").arg(&archive).output().unwrap();
    assert!(!out.status.success());
    assert!(!dir.path().join("bad").exists());
}

#[test]
fn compress_then_decompress_with_default_paths() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("poem.txt");
    let text = b"so much depends upon a red wheel barrow glazed with rain water";
    fs::write(&plain, text).unwrap();

    let out = huffpack().arg("compress").arg(&plain).arg("--verify").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("File successfully compressed"));

    fs::remove_file(&plain).unwrap();
    let out = huffpack()
        .arg("decompress")
        .arg(dir.path().join("poem.txt.huff"))
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("File successfully decompressed"));
    assert_eq!(fs::read(&plain).unwrap(), text);
}
