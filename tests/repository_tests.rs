use assert_fs::TempDir;
use chrono::{DateTime, FixedOffset};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;
use twig::areas::database::Database;
use twig::artifacts::diff::diff_op::DiffOp;
use twig::artifacts::objects::commit::Commit;
use twig::config::Config;
use twig::{Repository, RepositoryError};

mod common;

#[fixture]
fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn timestamp() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2023-01-01T12:00:00Z").unwrap()
}

fn open(dir: &TempDir) -> Repository {
    let config = Config::default()
        .with_lock_timeout(Duration::from_secs(10))
        .with_commit_time(timestamp());
    Repository::with_config(dir.path(), config).unwrap()
}

async fn init(dir: &TempDir) -> Repository {
    let repository = open(dir);
    repository.init().await.unwrap();
    repository
}

async fn staged_paths(repository: &Repository) -> Vec<String> {
    let index = repository.index();
    let mut index = index.lock().await;
    index.rehydrate().await.unwrap();
    index.entries().map(|entry| entry.path.clone()).collect()
}

#[rstest]
#[tokio::test]
async fn init_reports_an_existing_repository(repository_dir: TempDir) {
    let repository = open(&repository_dir);

    assert!(!repository.init().await.unwrap().already_initialized);
    assert!(repository.init().await.unwrap().already_initialized);
}

#[rstest]
#[tokio::test]
async fn history_lists_every_commit_newest_first(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    let mut oids = Vec::new();

    for n in 0..5 {
        common::write_file(repository_dir.path(), "counter.txt", &format!("{n}\n"));
        repository.add("counter.txt").await.unwrap();
        oids.push(repository.commit(&format!("commit {n}")).await.unwrap().oid);
    }

    let head = repository.refs().read_head().await.unwrap();
    let history = repository
        .history(head)
        .into_stream()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    assert_eq!(history.len(), 5);
    for (position, (oid, commit)) in history.iter().enumerate() {
        assert_eq!(oid, &oids[4 - position]);
        assert_eq!(commit.message(), format!("commit {}", 4 - position));
        let expected_parent = (position < 4).then(|| oids[3 - position].clone());
        assert_eq!(commit.parent(), expected_parent.as_ref());
    }

    let log = repository.log().await.unwrap();
    assert_eq!(
        log.iter().map(|entry| entry.oid.clone()).collect::<Vec<_>>(),
        oids.iter().rev().cloned().collect::<Vec<_>>()
    );
}

#[rstest]
#[tokio::test]
async fn commit_captures_the_staged_files(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    common::write_file(repository_dir.path(), "a.txt", "one\n");
    common::write_file(repository_dir.path(), "b.txt", "two\n");

    let d1 = repository.add("a.txt").await.unwrap().oid;
    let d2 = repository.add("b.txt").await.unwrap().oid;
    let outcome = repository.commit("two files").await.unwrap();

    let commit = repository.database().load_commit(&outcome.oid).await.unwrap();
    let files = commit
        .files()
        .iter()
        .map(|entry| (entry.path.as_str(), entry.oid.clone()))
        .collect::<Vec<_>>();
    assert_eq!(files, vec![("a.txt", d1), ("b.txt", d2)]);
    assert_eq!(commit.timestamp(), timestamp());
    assert!(staged_paths(&repository).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn staging_a_path_twice_keeps_the_later_content(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;

    common::write_file(repository_dir.path(), "a.txt", "before\n");
    repository.add("a.txt").await.unwrap();
    common::write_file(repository_dir.path(), "a.txt", "after\n");
    let later = repository.add("a.txt").await.unwrap().oid;

    let status = repository.status().await.unwrap();
    assert_eq!(status.staged.len(), 1);
    assert_eq!(status.staged[0].oid, later);
}

#[rstest]
#[tokio::test]
async fn empty_commit_changes_nothing(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    common::write_file(repository_dir.path(), "a.txt", "a\n");
    repository.add("a.txt").await.unwrap();
    let head = repository.commit("first").await.unwrap().oid;
    let index_path = repository_dir.path().join(".twig").join("index");
    let index_before = std::fs::read(&index_path).unwrap();

    let err = repository.commit("nothing").await.unwrap_err();

    assert!(matches!(err, RepositoryError::EmptyCommit));
    assert_eq!(repository.refs().read_head().await.unwrap(), Some(head));
    assert_eq!(std::fs::read(&index_path).unwrap(), index_before);
}

#[rstest]
#[tokio::test]
async fn commit_stored_without_advancing_head_stays_unreachable(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    common::write_file(repository_dir.path(), "a.txt", "a\n");
    let blob = repository.add("a.txt").await.unwrap();
    let head = repository.commit("first").await.unwrap().oid;

    let orphan = Commit::new(
        Some(head.clone()),
        timestamp(),
        vec![twig::artifacts::index::index_entry::IndexEntry::new(
            blob.path,
            blob.oid,
        )],
        "never reachable".to_string(),
    );
    let orphan_oid = repository.database().store(&orphan).await.unwrap();

    assert_eq!(
        repository.database().load_commit(&orphan_oid).await.unwrap(),
        orphan
    );
    assert_eq!(repository.refs().read_head().await.unwrap(), Some(head));
    assert_eq!(repository.log().await.unwrap().len(), 1);
}

#[rstest]
#[tokio::test]
async fn index_left_by_an_interrupted_commit_is_discarded(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    common::write_file(repository_dir.path(), "a.txt", "a\n");
    common::write_file(repository_dir.path(), "b.txt", "b\n");
    repository.add("a.txt").await.unwrap();
    repository.add("b.txt").await.unwrap();

    // commit stored and HEAD advanced, index never cleared
    let interrupted = {
        let lock = repository.lock().await.unwrap();
        let index = repository.index();
        let mut index = index.lock().await;
        index.rehydrate().await.unwrap();

        let commit = Commit::new(
            None,
            timestamp(),
            index.entries().cloned().collect(),
            "interrupted".to_string(),
        );
        let oid = repository.database().store(&commit).await.unwrap();
        repository.refs().update_head(&lock, &oid).await.unwrap();
        oid
    };
    assert_eq!(staged_paths(&repository).await, vec!["a.txt", "b.txt"]);

    common::write_file(repository_dir.path(), "c.txt", "c\n");
    repository.add("c.txt").await.unwrap();
    let next = repository.commit("next").await.unwrap();

    let commit = repository.database().load_commit(&next.oid).await.unwrap();
    assert_eq!(commit.parent(), Some(&interrupted));
    assert_eq!(
        commit.files().iter().map(|entry| entry.path.as_str()).collect::<Vec<_>>(),
        vec!["c.txt"]
    );
}

#[rstest]
#[tokio::test]
async fn show_diffs_against_the_parent(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    common::write_file(repository_dir.path(), "a.txt", "a\nb\nc\n");
    repository.add("a.txt").await.unwrap();
    let first = repository.commit("first").await.unwrap();

    let root = repository.show_commit(&first.oid).await.unwrap();
    assert_eq!(root.parent, None);
    assert!(root.files[0].is_new());

    common::write_file(repository_dir.path(), "a.txt", "a\nx\nc\n");
    common::write_file(repository_dir.path(), "new.txt", "fresh\n");
    repository.add("a.txt").await.unwrap();
    repository.add("new.txt").await.unwrap();
    let second = repository.commit("second").await.unwrap();

    let shown = repository.show(second.oid.as_ref()).await.unwrap();
    assert_eq!(shown.parent, Some(first.oid));
    assert_eq!(shown.files.len(), 2);
    assert_eq!(shown.files[0].content, "a\nx\nc\n");
    assert_eq!(
        shown.files[0].diff,
        Some(vec![
            DiffOp::Unchanged("a\n".into()),
            DiffOp::Removed("b\n".into()),
            DiffOp::Added("x\n".into()),
            DiffOp::Unchanged("c\n".into()),
        ])
    );
    assert_eq!(shown.files[1].path, "new.txt");
    assert_eq!(shown.files[1].diff, None);
}

#[rstest]
#[tokio::test]
async fn show_of_an_unknown_commit_is_not_found(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;

    let err = repository
        .show_commit(&Database::hash(b"no such commit"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[rstest]
#[tokio::test]
async fn ambiguous_prefix_lists_candidates(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;

    // store blobs until two IDs share a four character prefix
    let mut seen = std::collections::HashMap::new();
    let prefix = (0u32..)
        .find_map(|n| {
            let oid = Database::hash(n.to_string().as_bytes());
            let prefix = oid.as_ref()[..4].to_string();
            seen.insert(prefix.clone(), n)
                .map(|first| (prefix, first, n))
        })
        .unwrap();
    repository.database().put(prefix.1.to_string()).await.unwrap();
    repository.database().put(prefix.2.to_string()).await.unwrap();

    let err = repository.cat_file(&prefix.0).await.unwrap_err();
    match err {
        RepositoryError::AmbiguousRevision { candidates, .. } => assert_eq!(candidates.len(), 2),
        other => panic!("expected an ambiguous revision, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_through_one_handle_keep_every_entry(repository_dir: TempDir) {
    let repository = Arc::new(init(&repository_dir).await);
    let file_count = 16;

    let tasks = (0..file_count)
        .map(|n| {
            let file_name = format!("file{n:02}.txt");
            common::write_file(repository_dir.path(), &file_name, &format!("{n}\n"));
            let repository = repository.clone();
            tokio::spawn(async move { repository.add(file_name).await })
        })
        .collect::<Vec<_>>();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut paths = staged_paths(&repository).await;
    paths.sort();
    assert_eq!(paths.len(), file_count);

    let outcome = repository.commit("all at once").await.unwrap();
    assert_eq!(outcome.files_count, file_count);
}

#[rstest]
#[tokio::test]
async fn held_lock_makes_writers_time_out(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    let impatient = Repository::with_config(
        repository_dir.path(),
        Config::default().with_lock_timeout(Duration::from_millis(50)),
    )
    .unwrap();
    common::write_file(repository_dir.path(), "a.txt", "a\n");

    let guard = repository.lock().await.unwrap();
    let err = impatient.add("a.txt").await.unwrap_err();
    assert!(err.is_retriable());

    drop(guard);
    impatient.add("a.txt").await.unwrap();
}

#[rstest]
#[tokio::test]
async fn paths_with_carriage_returns_stay_readable(repository_dir: TempDir) {
    let repository = init(&repository_dir).await;
    common::write_file(repository_dir.path(), "a\r", "a\n");
    common::write_file(repository_dir.path(), "b", "b\n");
    repository.add("a\r").await.unwrap();
    repository.add("b").await.unwrap();
    let outcome = repository.commit("carriage return").await.unwrap();

    let log = repository.log().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].oid, outcome.oid);

    let shown = repository.show("HEAD").await.unwrap();
    assert_eq!(
        shown.files.iter().map(|file| file.path.as_str()).collect::<Vec<_>>(),
        vec!["a\r", "b"]
    );
}

#[rstest]
fn opening_a_missing_directory_creates_nothing(repository_dir: TempDir) {
    let missing = repository_dir.path().join("typo");

    let err = Repository::with_config(&missing, Config::default()).unwrap_err();

    assert!(matches!(err, RepositoryError::NotInitialized(_)));
    assert!(!missing.exists());
}
