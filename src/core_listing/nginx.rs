// nginx autoindex: a <pre> block, one anchor per line followed by
// "dd-Mon-yyyy hh:mm   size" where size is "-" for directories.

use crate::core_listing::entry::{name_from_href, parse_date, parse_size, EntryKind, FsEntry, RowBuilder};
use crate::core_listing::html::{tokenize, Token};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static DATE_AND_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}-[A-Za-z]{3}-[0-9]+ [0-9]{2}:[0-9]{2})\s+(\S+)")
        .expect("nginx date/size regex is valid")
});

const DATE_FORMATS: &[&str] = &["%d-%b-%Y %H:%M"];

pub fn parse_index(html: &str) -> Vec<FsEntry> {
    let tokens = tokenize(html);
    let mut entries = Vec::new();
    let mut name: Option<String> = None;

    for (i, token) in tokens.iter().enumerate() {
        if token.is_start("a") {
            name = token.attr("href").and_then(name_from_href);
            continue;
        }
        if !token.is_end("a") {
            continue;
        }
        let Some(current) = name.take() else { continue };
        let Some(Token::Text(text)) = tokens.get(i + 1) else {
            debug!("No date and size after link {}", current);
            continue;
        };
        let Some(caps) = DATE_AND_SIZE_RE.captures(text) else {
            debug!("No date and size regex match for {}", current);
            continue;
        };

        let mut row = RowBuilder {
            name: Some(current),
            modified_at: parse_date(&caps[1], DATE_FORMATS),
            ..Default::default()
        };
        if &caps[2] == "-" {
            row.kind = Some(EntryKind::Dir);
        } else {
            row.kind = Some(EntryKind::File);
            row.size = parse_size(&caps[2]);
        }
        if let Some(entry) = row.finish() {
            entries.push(entry);
        }
    }

    entries
}
