use crate::constants::MDTM_FORMAT;
use crate::core_listing::entry::{EntryKind, FsEntry};
use chrono::{DateTime, Datelike, Utc};

/// Renders entries the way `ls -l` does, one CRLF terminated line each.
pub fn gen_dir_list(entries: &[FsEntry]) -> String {
    gen_dir_list_at(entries, Utc::now())
}

/// Same as [`gen_dir_list`] with an explicit notion of "now": entries from
/// an earlier year show the year, the others show the time of day.
pub fn gen_dir_list_at(entries: &[FsEntry], now: DateTime<Utc>) -> String {
    let mut listing = String::new();
    for entry in entries {
        let print_time = if entry.modified_at.year() < now.year() {
            entry.modified_at.format("%b %e  %Y")
        } else {
            entry.modified_at.format("%b %e %H:%M")
        };
        let line_hdr = match entry.kind {
            EntryKind::Dir => 'd',
            EntryKind::File => '-',
        };
        listing.push_str(&format!(
            "{}rwxr-xr-x 1 ftp ftp {} {} {}\r\n",
            line_hdr, entry.size, print_time, entry.name
        ));
    }
    listing
}

/// `YYYYMMDDhhmmss`, as MDTM wants it.
pub fn format_mdtm(time: &DateTime<Utc>) -> String {
    time.format(MDTM_FORMAT).to_string()
}
