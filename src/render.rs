//! Text output for the command line
//!
//! Commands return structured outcomes; these functions turn them into the text the
//! `twig` binary prints. Colors follow `colored`'s global override, which the binary
//! turns off when stdout is not a terminal.

use crate::artifacts::diff::diff_op::DiffOp;
use crate::artifacts::objects::commit::READABLE_TIMESTAMP_FORMAT;
use crate::commands::porcelain::commit::CommitOutcome;
use crate::commands::porcelain::init::InitOutcome;
use crate::commands::porcelain::log::LogEntry;
use crate::commands::porcelain::show::{FileChange, ShowOutcome};
use crate::commands::porcelain::status::{StageState, StatusOutcome};
use chrono::{DateTime, FixedOffset};
use colored::Colorize;
use std::io::{self, Write};

const LABEL_WIDTH: usize = 2;

pub fn init(writer: &mut impl Write, outcome: &InitOutcome) -> io::Result<()> {
    let verb = if outcome.already_initialized {
        "Reinitialized existing"
    } else {
        "Initialized empty"
    };
    writeln!(writer, "{verb} twig repository in {}", outcome.path.display())
}

pub fn commit(writer: &mut impl Write, outcome: &CommitOutcome) -> io::Result<()> {
    let is_root = if outcome.is_root() {
        "(root-commit) "
    } else {
        ""
    };

    writeln!(
        writer,
        "[{}{}] {}",
        is_root,
        outcome.oid.to_short_oid(),
        outcome.short_message
    )
}

pub fn log(writer: &mut impl Write, entries: &[LogEntry], oneline: bool) -> io::Result<()> {
    for (position, entry) in entries.iter().enumerate() {
        if oneline {
            writeln!(
                writer,
                "{} {}",
                entry.oid.to_short_oid().yellow(),
                entry.short_message()
            )?;
            continue;
        }

        if position > 0 {
            writeln!(writer)?;
        }
        commit_header(writer, entry.oid.as_ref(), &entry.timestamp, &entry.message)?;
    }

    Ok(())
}

pub fn show(writer: &mut impl Write, outcome: &ShowOutcome) -> io::Result<()> {
    commit_header(
        writer,
        outcome.oid.as_ref(),
        &outcome.timestamp,
        &outcome.message,
    )?;

    for file in &outcome.files {
        writeln!(writer)?;
        file_change(writer, file)?;
    }

    Ok(())
}

pub fn status(writer: &mut impl Write, outcome: &StatusOutcome) -> io::Result<()> {
    match &outcome.head {
        Some(head) => writeln!(writer, "On commit {}", head.to_short_oid())?,
        None => writeln!(writer, "No commits yet")?,
    }

    if outcome.staged.is_empty() {
        return writeln!(writer, "nothing staged for commit");
    }

    writeln!(writer, "Changes to be committed:")?;
    for entry in &outcome.staged {
        let label = match entry.state {
            StageState::New => "new file:   ".green(),
            StageState::Modified => "modified:   ".green(),
            StageState::Unchanged => "unchanged:  ".normal(),
        };
        writeln!(writer, "{:>width$}{}{}", "", label, entry.path, width = LABEL_WIDTH)?;
    }

    Ok(())
}

fn commit_header(
    writer: &mut impl Write,
    oid: &str,
    timestamp: &DateTime<FixedOffset>,
    message: &str,
) -> io::Result<()> {
    writeln!(writer, "{}", format!("commit {oid}").yellow())?;
    writeln!(
        writer,
        "Date:   {}",
        timestamp.format(READABLE_TIMESTAMP_FORMAT)
    )?;
    writeln!(writer)?;
    for message_line in message.lines() {
        writeln!(writer, "    {}", message_line)?;
    }

    Ok(())
}

fn file_change(writer: &mut impl Write, file: &FileChange) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        format!("file {} {}", file.oid.to_short_oid(), file.path).bold()
    )?;

    match &file.diff {
        None => {
            writeln!(writer, "{}", "new file".bold())?;
            diff_line(writer, &DiffOp::Added(file.content.clone()))?;
        }
        Some(ops) if !ops.iter().any(DiffOp::is_change) => {
            writeln!(writer, "unchanged")?;
        }
        Some(ops) => {
            for op in ops {
                diff_line(writer, op)?;
            }
        }
    }

    Ok(())
}

fn diff_line(writer: &mut impl Write, op: &DiffOp) -> io::Result<()> {
    for line in op.lines() {
        let text = format!("{}{}", op.prefix(), line.strip_suffix('\n').unwrap_or(line));

        match op {
            DiffOp::Added(_) => writeln!(writer, "{}", text.green())?,
            DiffOp::Removed(_) => writeln!(writer, "{}", text.red())?,
            DiffOp::Unchanged(_) => writeln!(writer, "{}", text)?,
        }

        if !line.ends_with('\n') {
            writeln!(writer, "\\ No newline at end of file")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_content;
    use pretty_assertions::assert_eq;

    fn rendered(render: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut output = Vec::new();
        render(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn root_commit_is_marked() {
        let outcome = CommitOutcome {
            oid: hash_content(b"commit"),
            parent: None,
            short_message: "first".to_string(),
            files_count: 1,
        };

        let output = rendered(|writer| commit(writer, &outcome));
        assert_eq!(
            output,
            format!("[(root-commit) {}] first\n", outcome.oid.to_short_oid())
        );
    }

    #[test]
    fn diff_marks_a_missing_final_newline() {
        let output = rendered(|writer| diff_line(writer, &DiffOp::Removed("last".to_string())));

        assert_eq!(output, "-last\n\\ No newline at end of file\n");
    }

    #[test]
    fn merged_blocks_are_printed_line_by_line() {
        let output = rendered(|writer| diff_line(writer, &DiffOp::Added("x\ny".to_string())));

        assert_eq!(output, "+x\n+y\n\\ No newline at end of file\n");
    }

    #[test]
    fn new_files_list_every_line_as_added() {
        let file = FileChange {
            path: "a.txt".to_string(),
            oid: hash_content(b"one\ntwo\n"),
            content: "one\ntwo\n".to_string(),
            diff: None,
        };

        let output = rendered(|writer| file_change(writer, &file));
        assert_eq!(
            output,
            format!(
                "file {} a.txt\nnew file\n+one\n+two\n",
                file.oid.to_short_oid()
            )
        );
    }
}
