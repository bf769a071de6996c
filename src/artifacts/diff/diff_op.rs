use crate::artifacts::diff::myers::{Edit, MyersDiff};
use std::fmt;

/// A block of contiguous lines sharing one fate in a line diff
///
/// Each payload is the concatenated text of its lines, terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    Unchanged(String),
    Added(String),
    Removed(String),
}

impl DiffOp {
    pub fn text(&self) -> &str {
        match self {
            DiffOp::Unchanged(text) | DiffOp::Added(text) | DiffOp::Removed(text) => text,
        }
    }

    pub fn prefix(&self) -> char {
        match self {
            DiffOp::Unchanged(_) => ' ',
            DiffOp::Added(_) => '+',
            DiffOp::Removed(_) => '-',
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, DiffOp::Unchanged(_))
    }

    /// The block split back into its lines, each keeping its `\n`
    pub fn lines(&self) -> Vec<&str> {
        lines(self.text())
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            DiffOp::Unchanged(text) | DiffOp::Added(text) | DiffOp::Removed(text) => text,
        }
    }
}

impl fmt::Display for DiffOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            write!(f, "{}{}", self.prefix(), line)?;
        }
        Ok(())
    }
}

/// Split text into lines, each keeping its `\n`
///
/// A final line without a terminator is still a line; empty text has none.
pub fn lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Append `op` to `ops`, folding it into the last block when both are the same kind
fn push_merged(ops: &mut Vec<DiffOp>, op: DiffOp) {
    match ops.last_mut() {
        Some(last) if std::mem::discriminant(last) == std::mem::discriminant(&op) => {
            last.text_mut().push_str(op.text());
        }
        _ => ops.push(op),
    }
}

/// Line diff of `old` against `new`
///
/// The result is a minimal edit script: its `Unchanged` lines form a longest common
/// subsequence of the two inputs. Contiguous lines of the same kind are merged into one
/// op, and inside each run of changes the `Removed` block comes before the `Added` one.
/// Keeping `Unchanged` and `Removed` text rebuilds `old`; keeping `Unchanged` and
/// `Added` text rebuilds `new`.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffOp> {
    let (a, b) = (lines(old), lines(new));
    let edits = MyersDiff::new(&a, &b).diff();

    let mut ops = Vec::new();
    let mut removed = String::new();
    let mut added = String::new();

    let flush = |ops: &mut Vec<DiffOp>, removed: &mut String, added: &mut String| {
        if !removed.is_empty() {
            push_merged(ops, DiffOp::Removed(std::mem::take(removed)));
        }
        if !added.is_empty() {
            push_merged(ops, DiffOp::Added(std::mem::take(added)));
        }
    };

    for edit in edits {
        match edit {
            Edit::Delete { value } => removed.push_str(value),
            Edit::Insert { value } => added.push_str(value),
            Edit::Equal { value } => {
                flush(&mut ops, &mut removed, &mut added);
                push_merged(&mut ops, DiffOp::Unchanged(value.to_string()));
            }
        }
    }
    flush(&mut ops, &mut removed, &mut added);

    ops
}
