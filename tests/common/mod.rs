#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Smallest JPEG prefix whose SOF0 segment carries the dimensions.
pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// PNG signature plus an IHDR chunk.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(b"IEND");
    bytes.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
    bytes
}

/// JPEG magic followed by a segment length that runs past the end of file.
pub fn corrupt_jpeg_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(b"garbage, not a real jpeg");
    bytes
}

pub fn write_jpeg(path: &Path, width: u16, height: u16) {
    write_bytes(path, &jpeg_bytes(width, height));
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    write_bytes(path, &png_bytes(width, height));
}

pub fn write_bytes(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write file");
}

/// Creates `images/` and `labels/` under `root` and returns their paths
/// plus the output file path.
pub fn create_layout(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let images = root.join("images");
    let labels = root.join("labels");
    fs::create_dir_all(&images).expect("create images dir");
    fs::create_dir_all(&labels).expect("create labels dir");
    (images, labels, root.join("train_list.txt"))
}

pub fn write_label(labels: &Path, name: &str, content: &str) {
    fs::write(labels.join(name), content).expect("write label file");
}
