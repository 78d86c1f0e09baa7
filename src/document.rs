//! Reconciliation of the generated page content.
//!
//! A generated page is a frontmatter header (7 lines between `---`
//! delimiters) immediately followed by the issues table. Anything a human
//! wrote after the table belongs to them and must survive every run
//! byte-for-byte. Reconciling replaces the header and the generated table,
//! keeps the rest, and appends the fresh table at the end of the page.

use chrono::{DateTime, Local};
use thiserror::Error;

const HEADER_DELIMITER: &str = "---";
const TABLE_OPEN: &str = "<table";
const TABLE_CLOSE: &str = "</table>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("existing page does not start with a frontmatter delimiter")]
    MissingHeader,
    #[error("frontmatter header has no closing delimiter")]
    UnterminatedHeader,
}

/// Build the fixed frontmatter block. The timestamp is passed in rather than
/// read from a clock so the output is a pure function of its arguments.
pub fn synthesize_header(title: &str, description: &str, now: DateTime<Local>) -> String {
    format!(
        "---\n\
         title: {title}\n\
         description: {description}\n\
         published: true\n\
         date: {date}\n\
         tags: \n\
         ---",
        date = now.format("%Y-%m-%d %H:%M:%S%.6f"),
    )
}

/// Compute the new full page content.
///
/// With no existing page this is a plain header + table write. With an
/// existing page the old header and the old generated table are removed,
/// everything else is kept in place, and the new table goes at the end.
/// The result is idempotent across runs with identical issue data, except
/// for the `date:` line of the header.
pub fn reconcile(
    existing: Option<&str>,
    table: &str,
    title: &str,
    description: &str,
    now: DateTime<Local>,
) -> Result<String, ReconcileError> {
    let header = synthesize_header(title, description, now);
    let content = match existing {
        None => format!("{header}\n{table}"),
        Some(content) => {
            let body = body_after_header(content)?;
            let kept = remove_generated_table(body);
            format!("{header}\n{kept}{table}")
        }
    };
    Ok(content)
}

/// Strip the frontmatter header by finding both delimiter lines, rather than
/// assuming a fixed line count. On a well-formed generated page this skips
/// exactly the 7 header lines; a page without the delimiters is reported as
/// an error instead of being silently mangled.
fn body_after_header(content: &str) -> Result<&str, ReconcileError> {
    let rest = content
        .strip_prefix("---\n")
        .ok_or(ReconcileError::MissingHeader)?;
    let mut end = 0;
    for line in rest.split_inclusive('\n') {
        end += line.len();
        if line.trim_end_matches('\n') == HEADER_DELIMITER {
            return Ok(&rest[end..]);
        }
    }
    Err(ReconcileError::UnterminatedHeader)
}

/// Remove the previously generated table from the body.
///
/// The generated table is the first `<table` region, since the generator
/// always emits it directly after the header; later tables inside
/// hand-written content are left alone. If no marker is present the body is
/// returned unchanged and the caller appends the new table at the end.
fn remove_generated_table(body: &str) -> String {
    let Some(open) = body.find(TABLE_OPEN) else {
        return body.to_string();
    };
    match body[open..].find(TABLE_CLOSE) {
        Some(rel) => {
            let mut end = open + rel + TABLE_CLOSE.len();
            if body[end..].starts_with('\n') {
                end += 1;
            }
            let mut kept = String::with_capacity(body.len() - (end - open));
            kept.push_str(&body[..open]);
            kept.push_str(&body[end..]);
            kept
        }
        // Unterminated table: everything from the marker on is stale.
        None => body[..open].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn later() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap()
    }

    /// Drop the `date:` line so documents from different runs can be compared.
    fn strip_date(content: &str) -> String {
        content
            .lines()
            .filter(|l| !l.starts_with("date: "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn header_is_exactly_seven_lines() {
        let header = synthesize_header("Issues", "Generated list", at_noon());
        assert_eq!(header.lines().count(), 7);
        assert!(header.starts_with("---\n"));
        assert!(header.ends_with("\n---"));
    }

    #[test]
    fn header_fields_in_order() {
        let header = synthesize_header("Issues", "Generated list", at_noon());
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "---");
        assert_eq!(lines[1], "title: Issues");
        assert_eq!(lines[2], "description: Generated list");
        assert_eq!(lines[3], "published: true");
        assert!(lines[4].starts_with("date: 2024-05-01 12:00:00"));
        assert_eq!(lines[5], "tags: ");
        assert_eq!(lines[6], "---");
    }

    #[test]
    fn creation_branch_is_header_plus_table() {
        let content = reconcile(None, "<table>T</table>\n", "Issues", "desc", at_noon()).unwrap();
        let header = synthesize_header("Issues", "desc", at_noon());
        assert_eq!(content, format!("{header}\n<table>T</table>\n"));
    }

    #[test]
    fn body_after_header_skips_exactly_seven_lines() {
        let header = synthesize_header("Issues", "desc", at_noon());
        let content = format!("{header}\nBODY");
        assert_eq!(body_after_header(&content).unwrap(), "BODY");
    }

    #[test]
    fn update_preserves_trailing_manual_notes() {
        let old_header = synthesize_header("Issues", "desc", at_noon());
        let existing = format!("{old_header}\n<table old>stale</table>\n\nManual notes\n");

        let content = reconcile(
            Some(&existing),
            "<table>NEW</table>",
            "Issues",
            "desc",
            later(),
        )
        .unwrap();

        let new_header = synthesize_header("Issues", "desc", later());
        assert_eq!(
            content,
            format!("{new_header}\n\nManual notes\n<table>NEW</table>")
        );
    }

    #[test]
    fn update_preserves_content_between_header_and_table() {
        let old_header = synthesize_header("Issues", "desc", at_noon());
        let existing = format!("{old_header}\nIntro line\n<table>old</table>\n");

        let content =
            reconcile(Some(&existing), "<table>new</table>\n", "Issues", "desc", later()).unwrap();

        let new_header = synthesize_header("Issues", "desc", later());
        assert_eq!(content, format!("{new_header}\nIntro line\n<table>new</table>\n"));
    }

    #[test]
    fn update_leaves_tables_inside_manual_content_alone() {
        let old_header = synthesize_header("Issues", "desc", at_noon());
        let existing = format!(
            "{old_header}\n<table>generated</table>\nNotes with <table>my own</table>\n"
        );

        let content =
            reconcile(Some(&existing), "<table>new</table>\n", "Issues", "desc", later()).unwrap();

        assert!(content.contains("Notes with <table>my own</table>"));
        assert!(!content.contains("<table>generated</table>"));
    }

    #[test]
    fn missing_marker_appends_table_at_end() {
        let old_header = synthesize_header("Issues", "desc", at_noon());
        let existing = format!("{old_header}\nJust prose, no table\n");

        let content =
            reconcile(Some(&existing), "<table>new</table>\n", "Issues", "desc", later()).unwrap();

        let new_header = synthesize_header("Issues", "desc", later());
        assert_eq!(
            content,
            format!("{new_header}\nJust prose, no table\n<table>new</table>\n")
        );
    }

    #[test]
    fn reconcile_is_idempotent_modulo_date() {
        let table = "<table>SAME</table>\n";
        let first = reconcile(None, table, "Issues", "desc", at_noon()).unwrap();
        let annotated = format!("{first}Manual notes\n");

        let second = reconcile(Some(&annotated), table, "Issues", "desc", later()).unwrap();
        let third = reconcile(
            Some(&second),
            table,
            "Issues",
            "desc",
            Local.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap(),
        )
        .unwrap();

        assert_eq!(strip_date(&second), strip_date(&third));
        assert!(second.contains("Manual notes\n"));
    }

    #[test]
    fn page_without_frontmatter_is_an_error() {
        let err = reconcile(Some("no delimiters here"), "<table></table>", "t", "d", at_noon())
            .unwrap_err();
        assert_eq!(err, ReconcileError::MissingHeader);
    }

    #[test]
    fn unterminated_header_is_an_error() {
        let err = reconcile(Some("---\ntitle: x\n"), "<table></table>", "t", "d", at_noon())
            .unwrap_err();
        assert_eq!(err, ReconcileError::UnterminatedHeader);
    }

    #[test]
    fn unterminated_old_table_is_dropped_from_marker_on() {
        let old_header = synthesize_header("Issues", "desc", at_noon());
        let existing = format!("{old_header}\nKept\n<table>never closed");

        let content =
            reconcile(Some(&existing), "<table>new</table>\n", "Issues", "desc", later()).unwrap();

        let new_header = synthesize_header("Issues", "desc", later());
        assert_eq!(content, format!("{new_header}\nKept\n<table>new</table>\n"));
    }
}
