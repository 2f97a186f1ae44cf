use crate::constants::{DIRECTORY_SIZE, UNKNOWN_FILE_SIZE};
use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*([KMGT])?").expect("size regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// One remote directory entry, whatever page it was scraped from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub kind: EntryKind,
    pub name: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

impl FsEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Fields collected while walking one row of an index page.
#[derive(Debug, Default)]
pub struct RowBuilder {
    pub name: Option<String>,
    pub kind: Option<EntryKind>,
    pub size: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl RowBuilder {
    /// Emits an entry once both a name and a kind were seen.
    pub fn finish(self) -> Option<FsEntry> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let kind = self.kind?;
        let size = match kind {
            EntryKind::Dir => DIRECTORY_SIZE,
            EntryKind::File => self.size.unwrap_or(UNKNOWN_FILE_SIZE),
        };
        Some(FsEntry {
            kind,
            name,
            size,
            modified_at: self.modified_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }
}

/// Turns an anchor target into an entry name.
///
/// Only relative links to children qualify: sort links, absolute links
/// (the parent directory row) and `..` are rejected.
pub fn name_from_href(href: &str) -> Option<String> {
    if href.is_empty()
        || href.starts_with('/')
        || href.starts_with('?')
        || href.starts_with('#')
        || href.contains("://")
    {
        return None;
    }
    let href = href.split(['?', '#']).next().unwrap_or(href);
    let decoded = percent_decode_str(href).decode_utf8_lossy();
    let name = decoded.trim_matches('/');
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return None;
    }
    Some(name.to_string())
}

/// Parses a human readable size such as `120`, `1.5K` or `3M`.
/// Suffixes are powers of 1024.
pub fn parse_size(text: &str) -> Option<u64> {
    let caps = SIZE_RE.captures(text.trim())?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("K") => 1024.0,
        Some("M") => 1024.0 * 1024.0,
        Some("G") => 1024.0 * 1024.0 * 1024.0,
        Some("T") => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => 1.0,
    };
    Some((value * multiplier) as u64)
}

/// Parses a listing date against each of `formats` in turn.
pub fn parse_date(text: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    let text = text.trim();
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("120"), Some(120));
        assert_eq!(parse_size(" 1.5K "), Some(1536));
        assert_eq!(parse_size("2M"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size("1G"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size("1T"), Some(1024u64.pow(4)));
        assert_eq!(parse_size("-"), None);
        assert_eq!(parse_size("huge"), None);
    }

    #[test]
    fn test_name_from_href() {
        assert_eq!(name_from_href("pub/"), Some("pub".to_string()));
        assert_eq!(name_from_href("my%20file.txt"), Some("my file.txt".to_string()));
        assert_eq!(name_from_href("../"), None);
        assert_eq!(name_from_href("/site/"), None);
        assert_eq!(name_from_href("?C=N;O=D"), None);
        assert_eq!(name_from_href("http://elsewhere/"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("2023-01-15 10:30  ", &["%Y-%m-%d %H:%M"]).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2023, 1, 15));
        assert_eq!((date.hour(), date.minute()), (10, 30));

        let date = parse_date("15-Jan-2023 10:30", &["%Y-%m-%d %H:%M", "%d-%b-%Y %H:%M"]).unwrap();
        assert_eq!(date.day(), 15);
        assert!(parse_date("yesterday", &["%Y-%m-%d %H:%M"]).is_none());
    }

    #[test]
    fn test_row_builder_requires_name_and_kind() {
        let row = RowBuilder {
            name: Some("a".to_string()),
            ..Default::default()
        };
        assert!(row.finish().is_none());

        let row = RowBuilder {
            kind: Some(EntryKind::File),
            ..Default::default()
        };
        assert!(row.finish().is_none());
    }

    #[test]
    fn test_row_builder_placeholders() {
        let file = RowBuilder {
            name: Some("data.bin".to_string()),
            kind: Some(EntryKind::File),
            ..Default::default()
        }
        .finish()
        .unwrap();
        assert_eq!(file.size, UNKNOWN_FILE_SIZE);
        assert_eq!(file.modified_at, DateTime::<Utc>::UNIX_EPOCH);

        let dir = RowBuilder {
            name: Some("pub".to_string()),
            kind: Some(EntryKind::Dir),
            size: Some(12),
            ..Default::default()
        }
        .finish()
        .unwrap();
        assert_eq!(dir.size, DIRECTORY_SIZE);
    }
}
