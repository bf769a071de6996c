#![allow(dead_code)]

pub mod command;

use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

pub fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Read the commit HEAD points to, straight from disk
pub fn read_head(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".twig").join("HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}

/// Count the stored objects, skipping the fan-out directories themselves
pub fn count_objects(dir: &Path) -> usize {
    std::fs::read_dir(dir.join(".twig").join("objects"))
        .expect("Failed to read objects directory")
        .map(|fan_out| {
            std::fs::read_dir(fan_out.expect("Failed to read fan-out entry").path())
                .expect("Failed to read fan-out directory")
                .count()
        })
        .sum()
}
