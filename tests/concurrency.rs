use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use common::command::{init_repository_dir, run_twig_command, twig_commit};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
#[tokio::test]
async fn concurrent_add_processes_keep_every_entry(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let file_names = (0..8).map(|n| format!("file{n}.txt")).collect::<Vec<_>>();
    for (n, file_name) in file_names.iter().enumerate() {
        init_repository_dir
            .child(file_name)
            .write_str(&format!("content {n}\n"))?;
    }

    let tasks = file_names
        .iter()
        .map(|file_name| {
            let dir = init_repository_dir.path().to_path_buf();
            let file_name = file_name.clone();
            tokio::task::spawn_blocking(move || {
                run_twig_command(&dir, &["add", &file_name])
                    .assert()
                    .success();
            })
        })
        .collect::<Vec<_>>();
    for task in tasks {
        task.await?;
    }

    let output = run_twig_command(init_repository_dir.path(), &["status"]).output()?;
    let stdout = String::from_utf8(output.stdout)?;
    for file_name in &file_names {
        assert_eq!(stdout.matches(file_name.as_str()).count(), 1);
    }

    twig_commit(init_repository_dir.path(), "everything")
        .assert()
        .success();
    let record = run_twig_command(init_repository_dir.path(), &["cat-file", "HEAD"]).output()?;
    let record = String::from_utf8(record.stdout)?;
    assert_eq!(record.matches("\nfile ").count(), file_names.len());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn concurrent_commits_never_lose_a_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = (0..4)
        .map(|n| {
            let dir = init_repository_dir.path().to_path_buf();
            let file_name = format!("writer{n}.txt");
            init_repository_dir
                .child(&file_name)
                .write_str(&format!("writer {n}\n"))
                .unwrap();
            tokio::task::spawn_blocking(move || {
                run_twig_command(&dir, &["add", &file_name])
                    .assert()
                    .success();
                // another writer may have committed our entry already
                twig_commit(&dir, &format!("writer {n}")).output().unwrap()
            })
        })
        .collect::<Vec<_>>();

    let mut successes = 0;
    for task in tasks {
        let output = task.await?;
        match output.status.code() {
            Some(0) => successes += 1,
            Some(7) => {}
            code => panic!("unexpected exit code {code:?}"),
        }
    }

    let log = run_twig_command(init_repository_dir.path(), &["log", "--oneline"]).output()?;
    assert_eq!(String::from_utf8(log.stdout)?.lines().count(), successes);

    run_twig_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("nothing staged for commit\n"));

    Ok(())
}
