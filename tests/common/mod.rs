use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds a dirsentry command rooted in `root`, with the watched directory,
/// baseline and log all living under that root.
pub fn dirsentry_cmd(root: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("dirsentry");
    cmd.current_dir(root)
        .env_remove("RUST_LOG")
        .arg("--dir")
        .arg("watched")
        .arg("--baseline")
        .arg("hash_db.toml")
        .arg("--log")
        .arg("security.log");
    cmd
}

pub fn setup_watched(root: &Path) -> PathBuf {
    let watched = root.join("watched");
    fs::create_dir_all(&watched).expect("failed to create watched directory");
    watched
}

// Each integration test file is compiled as its own crate; not every crate
// reads the log back.
#[allow(dead_code)]
pub fn read_log(root: &Path) -> String {
    fs::read_to_string(root.join("security.log")).expect("security.log should exist")
}
