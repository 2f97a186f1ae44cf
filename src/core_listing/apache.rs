// Apache mod_autoindex, FancyIndexing with HTMLTable.
//
// One <tr> per entry: icon, name, last modified, size, description.
// The icon's alt text tells directories from files.

use crate::core_listing::entry::{name_from_href, parse_date, parse_size, EntryKind, FsEntry, RowBuilder};
use crate::core_listing::html::{tokenize, Token};
use log::debug;

const DATE_COLUMN: usize = 3;
const SIZE_COLUMN: usize = 4;

// 2.4 prints ISO dates, 2.2 prints the same layout as nginx.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%d-%b-%Y %H:%M"];

pub fn parse_index(html: &str) -> Vec<FsEntry> {
    let mut entries = Vec::new();

    let mut in_table = false;
    let mut in_tr = false;
    let mut td_number = 0;
    let mut td_text: Option<String> = None;
    let mut row = RowBuilder::default();
    let mut parent_row = false;

    for token in tokenize(html) {
        match &token {
            Token::StartTag { name, .. } => match name.as_str() {
                "table" => in_table = true,
                "tr" if in_table => {
                    if in_tr {
                        close_cell(&mut row, td_number, td_text.take());
                        emit(&mut entries, std::mem::take(&mut row), parent_row);
                    }
                    in_tr = true;
                    td_number = 0;
                    parent_row = false;
                }
                "td" if in_tr => {
                    close_cell(&mut row, td_number, td_text.take());
                    td_number += 1;
                    td_text = Some(String::new());
                }
                "a" if td_text.is_some() => {
                    if let Some(href) = token.attr("href") {
                        row.name = name_from_href(href);
                    }
                }
                "img" if td_text.is_some() => {
                    let alt = token.attr("alt").unwrap_or_default();
                    if alt.contains("PARENTDIR") {
                        parent_row = true;
                    } else if alt.contains("DIR") {
                        row.kind = Some(EntryKind::Dir);
                    } else if alt.starts_with('[') {
                        row.kind = Some(EntryKind::File);
                    }
                }
                _ => {}
            },
            Token::Text(text) => {
                if let Some(buffer) = td_text.as_mut() {
                    buffer.push_str(text);
                }
            }
            Token::EndTag { name } => match name.as_str() {
                "td" => close_cell(&mut row, td_number, td_text.take()),
                "tr" if in_tr => {
                    close_cell(&mut row, td_number, td_text.take());
                    emit(&mut entries, std::mem::take(&mut row), parent_row);
                    in_tr = false;
                }
                "table" => {
                    // keep scanning, the listing may span several tables
                    in_table = false;
                    in_tr = false;
                    td_text = None;
                    row = RowBuilder::default();
                }
                _ => {}
            },
        }
    }

    entries
}

fn close_cell(row: &mut RowBuilder, td_number: usize, text: Option<String>) {
    let Some(text) = text else { return };
    match td_number {
        DATE_COLUMN => row.modified_at = parse_date(&text, DATE_FORMATS),
        SIZE_COLUMN => {
            let text = text.trim();
            if text != "-" {
                row.size = parse_size(text);
                if row.size.is_none() {
                    debug!("No size match for {:?}", text);
                }
            }
        }
        _ => {}
    }
}

fn emit(entries: &mut Vec<FsEntry>, row: RowBuilder, parent_row: bool) {
    if parent_row {
        return;
    }
    if let Some(entry) = row.finish() {
        entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DIRECTORY_SIZE, UNKNOWN_FILE_SIZE};
    use crate::test_support::APACHE_INDEX;
    use chrono::{DateTime, Datelike, Utc};

    #[test]
    fn test_parse_canonical_index() {
        let entries = parse_index(APACHE_INDEX);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].name, "pub");
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[0].size, DIRECTORY_SIZE);
        assert_eq!(entries[0].modified_at.year(), 2023);

        assert_eq!(entries[1].name, "readme.txt");
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[1].size, 1536);
    }

    #[test]
    fn test_bad_size_and_date_degrade() {
        let html = r#"<table><tr><td><img alt="[   ]"></td><td><a href="odd.bin">odd.bin</a></td><td>someday</td><td>lots</td></tr></table>"#;
        let entries = parse_index(html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size, UNKNOWN_FILE_SIZE);
        assert_eq!(entries[0].modified_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_row_without_icon_is_skipped() {
        let html = r#"<table><tr><td></td><td><a href="x.txt">x.txt</a></td><td></td><td>1K</td></tr></table>"#;
        assert!(parse_index(html).is_empty());
    }

    #[test]
    fn test_apache_22_dates() {
        let html = r#"<table><tr><td><img alt="[DIR]"></td><td><a href="old/">old/</a></td><td align="right">05-Mar-2009 08:15  </td><td>-</td></tr></table>"#;
        let entries = parse_index(html);
        assert_eq!(entries[0].modified_at.year(), 2009);
        assert_eq!(entries[0].modified_at.day(), 5);
    }
}
