use crate::common::{COMMIT_DATE, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// Three commits, each adding one file: `file1.txt`, `file2.txt`, `file3.txt`
#[fixture]
pub fn repository_with_multiple_commits(init_repository_dir: TempDir) -> TempDir {
    let messages = ["First commit", "Second commit", "Third commit"];

    for (position, message) in messages.iter().enumerate() {
        let file_name = format!("file{}.txt", position + 1);
        write_file(
            init_repository_dir.path(),
            &file_name,
            &format!("content {}\n", position + 1),
        );
        run_twig_command(init_repository_dir.path(), &["add", &file_name])
            .assert()
            .success();
        twig_commit(init_repository_dir.path(), message)
            .assert()
            .success();
    }

    init_repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.env_remove("TWIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_twig_command(dir, &["commit", "-m", message]);
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE); // %Y-%m-%d %H:%M:%S %z
    cmd
}

/// Ask `twig log` for the full IDs of every commit, newest first
pub fn commit_ids(dir: &Path) -> Vec<String> {
    let output = run_twig_command(dir, &["log"])
        .output()
        .expect("Failed to run twig log");

    String::from_utf8(output.stdout)
        .expect("log output is not UTF-8")
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}
