//! Commit object
//!
//! Commits snapshot the staging area at a point in time. They contain:
//! - The parent commit ID (absent for the root commit)
//! - A timestamp
//! - The staged files, in staging order
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! parent <parent-sha>
//! timestamp <rfc3339 with milliseconds>
//! file <blob-sha> <path>
//! file <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! The serialization is canonical: a record that does not serialize back to the
//! exact bytes it was read from is rejected, so a commit's ID can always be derived
//! from its fields.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat, SubsecRound};

/// Human readable timestamp layout, e.g. "Sun Jan 1 12:00:00 2023 +0000"
pub const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Commit record
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ID (None for the root commit)
    parent: Option<ObjectId>,
    /// Commit time, truncated to millisecond precision
    timestamp: DateTime<FixedOffset>,
    /// Snapshot of the staging area
    files: Vec<IndexEntry>,
    /// Commit message
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        files: Vec<IndexEntry>,
        message: String,
    ) -> Self {
        Commit {
            parent,
            timestamp: timestamp.trunc_subsecs(3),
            files,
            message,
        }
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// ISO-8601 form of the timestamp, as written in the record
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn files(&self) -> &[IndexEntry] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&IndexEntry> {
        self.files.iter().find(|entry| entry.path == path)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("timestamp {}", self.iso_timestamp()));
        for entry in &self.files {
            lines.push(format!("file {} {}", entry.oid, entry.path));
        }

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let content = format!("{}\n\n{}", self.header_lines().join("\n"), self.message);
        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(bytes: Bytes) -> Result<Self> {
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| RepositoryError::corrupt("commit record is not valid UTF-8"))?;

        let (header, message) = content
            .split_once("\n\n")
            .ok_or_else(|| RepositoryError::corrupt("commit record has no message separator"))?;
        let mut lines = header.split('\n').peekable();

        let parent = match lines.next_if(|line| line.starts_with("parent ")) {
            Some(line) => Some(ObjectId::try_parse(&line["parent ".len()..])?),
            None => None,
        };

        let timestamp = lines
            .next()
            .and_then(|line| line.strip_prefix("timestamp "))
            .ok_or_else(|| RepositoryError::corrupt("commit record is missing its timestamp"))?;
        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|_| RepositoryError::corrupt(format!("invalid commit timestamp: {timestamp}")))?;

        let files = lines
            .map(|line| {
                let (oid, path) = line
                    .strip_prefix("file ")
                    .and_then(|rest| rest.split_once(' '))
                    .ok_or_else(|| {
                        RepositoryError::corrupt(format!("invalid commit file line: {line}"))
                    })?;
                Ok(IndexEntry::new(path.to_string(), ObjectId::try_parse(oid)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let commit = Self::new(parent, timestamp, files, message.to_string());
        if commit.serialize()? != bytes {
            return Err(RepositoryError::corrupt("commit record is not canonical"));
        }

        Ok(commit)
    }
}

impl Object for Commit {}
