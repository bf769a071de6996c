//! Index (staging area)
//!
//! The index lists the files the next commit will capture. It keeps at most one entry
//! per path, in the order paths were first staged; restaging a path swaps its blob ID
//! in place.
//!
//! ## Recovery
//!
//! The header records the HEAD commit the entries were staged on top of. A commit
//! advances HEAD before clearing the index, so an index whose base no longer matches
//! HEAD belongs to a commit that was interrupted after HEAD moved. Its entries are
//! already part of that commit and [`Index::reconcile`] drops them.
//!
//! All mutation happens under the repository lock: load with [`Index::rehydrate`],
//! change, then persist with [`Index::write_updates`].

use crate::areas::durable::write_atomically;
use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::collections::HashMap;
use std::io::{Cursor, ErrorKind};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.twig/index`)
    path: Box<Path>,
    /// Staged files, in order of first staging
    entries: Vec<IndexEntry>,
    /// Position of each path in `entries`
    positions: HashMap<String, usize>,
    /// Index file header metadata
    header: IndexHeader,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: Vec::new(),
            positions: HashMap::new(),
            header: IndexHeader::empty(None),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// HEAD commit the staged entries build on
    pub fn base(&self) -> Option<&ObjectId> {
        self.header.base.as_ref()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.positions.get(path).map(|&position| &self.entries[position])
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Upsert an entry by path
    ///
    /// A path that is already staged keeps its position and takes the new blob ID.
    pub fn stage(&mut self, entry: IndexEntry) {
        match self.positions.get(&entry.path) {
            Some(&position) => {
                if self.entries[position] == entry {
                    return;
                }
                self.entries[position] = entry;
            }
            None => {
                self.positions.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;
    }

    /// Empty the index and rebase it on `base`, the commit that captured the entries
    pub fn clear(&mut self, base: Option<ObjectId>) {
        self.reset(base);
        self.changed = true;
    }

    /// Drop entries staged on top of a HEAD that has since moved
    ///
    /// Returns the number of discarded entries.
    pub fn reconcile(&mut self, head: Option<&ObjectId>) -> usize {
        if self.header.base.as_ref() == head {
            return 0;
        }

        let discarded = self.entries.len();
        if discarded > 0 {
            tracing::warn!(
                base = ?self.header.base,
                head = ?head,
                discarded,
                "index was left over from an interrupted commit, discarding its entries"
            );
        }
        self.clear(head.cloned());

        discarded
    }

    fn reset(&mut self, base: Option<ObjectId>) {
        self.entries.clear();
        self.positions.clear();
        self.header = IndexHeader::empty(base);
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file loads as an empty index based on no commit.
    pub async fn rehydrate(&mut self) -> Result<()> {
        self.reset(None);

        let content = match tokio::fs::read(self.path()).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        if content.is_empty() {
            return Ok(());
        }

        let mut reader = Checksum::new(Cursor::new(content));
        let header = self.parse_header(&mut reader)?;
        self.parse_entries(header.entries_count, &mut reader)?;
        reader.verify()?;

        self.header = header;
        Ok(())
    }

    fn parse_header(&self, reader: &mut Checksum<Cursor<Vec<u8>>>) -> Result<IndexHeader> {
        let header = IndexHeader::deserialize(reader.read(HEADER_SIZE)?)?;

        if header.marker != SIGNATURE {
            return Err(RepositoryError::corrupt("invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(RepositoryError::corrupt(format!(
                "unsupported index file version: {}",
                header.version
            )));
        }

        Ok(header)
    }

    fn parse_entries(
        &mut self,
        entries_count: u32,
        reader: &mut Checksum<Cursor<Vec<u8>>>,
    ) -> Result<()> {
        for _ in 0..entries_count {
            let entry = IndexEntry::read_from(reader)?;

            if self.positions.contains_key(&entry.path) {
                return Err(RepositoryError::corrupt(format!(
                    "index lists {} more than once",
                    entry.path
                )));
            }
            self.positions.insert(entry.path.clone(), self.entries.len());
            self.entries.push(entry);
        }

        Ok(())
    }

    /// Persist the index if it changed since it was loaded
    pub async fn write_updates(&mut self) -> Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut writer = Checksum::new(Vec::new());

        self.header = IndexHeader {
            entries_count: self.entries.len() as u32,
            ..self.header.clone()
        };
        writer.write(&self.header.serialize()?)?;

        for entry in self.entries() {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        write_atomically(self.path(), &writer.into_inner()).await?;
        self.changed = false;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_content;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn index(dir: &TempDir) -> Index {
        Index::new(dir.path().join("index").into_boxed_path())
    }

    fn entry(path: &str, content: &str) -> IndexEntry {
        IndexEntry::new(path.to_string(), hash_content(content.as_bytes()))
    }

    fn paths(index: &Index) -> Vec<&str> {
        index.entries().map(|entry| entry.path.as_str()).collect()
    }

    #[rstest]
    fn restaging_a_path_replaces_it_in_place(index_dir: TempDir) {
        let mut index = index(&index_dir);

        index.stage(entry("a.txt", "one"));
        index.stage(entry("b.txt", "two"));
        index.stage(entry("a.txt", "three"));

        assert_eq!(paths(&index), vec!["a.txt", "b.txt"]);
        assert_eq!(index.entry_by_path("a.txt"), Some(&entry("a.txt", "three")));
    }

    #[rstest]
    #[tokio::test]
    async fn entries_survive_a_reload_in_staging_order(index_dir: TempDir) {
        let base = hash_content(b"head commit");
        let mut index = index(&index_dir);
        index.clear(Some(base.clone()));
        index.stage(entry("z.txt", "last letter"));
        index.stage(entry("dir/a.txt", "nested"));
        index.write_updates().await.unwrap();

        let mut reloaded = self::index(&index_dir);
        reloaded.rehydrate().await.unwrap();

        assert_eq!(paths(&reloaded), vec!["z.txt", "dir/a.txt"]);
        assert_eq!(reloaded.base(), Some(&base));
        assert!(!reloaded.is_changed());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_index_loads_empty(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.rehydrate().await.unwrap();

        assert!(index.is_empty());
        assert_eq!(index.base(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn damaged_index_is_corrupt(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.stage(entry("a.txt", "one"));
        index.write_updates().await.unwrap();

        let mut bytes = std::fs::read(index.path()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(index.path(), bytes).unwrap();

        let err = index.rehydrate().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt(_)));
    }

    #[rstest]
    fn reconcile_keeps_entries_on_the_same_head(index_dir: TempDir) {
        let head = hash_content(b"head");
        let mut index = index(&index_dir);
        index.clear(Some(head.clone()));
        index.stage(entry("a.txt", "one"));

        assert_eq!(index.reconcile(Some(&head)), 0);
        assert_eq!(index.len(), 1);
    }

    #[rstest]
    fn reconcile_drops_entries_left_by_an_interrupted_commit(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.stage(entry("a.txt", "one"));
        index.stage(entry("b.txt", "two"));

        let moved_head = hash_content(b"commit that captured a and b");
        assert_eq!(index.reconcile(Some(&moved_head)), 2);
        assert!(index.is_empty());
        assert_eq!(index.base(), Some(&moved_head));
    }
}
