use crate::constants::{LIST_TIME_FORMAT, MACHINE_TIME_FORMAT};
use crate::core_storage::{DirEntry, ListFormat};
use chrono::{DateTime, Utc};
use std::time::SystemTime;

pub fn machine_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(MACHINE_TIME_FORMAT)
        .to_string()
}

/// `type=dir|file;modify=YYYYMMDDHHMMSS;[size=N;] name`
pub fn mlsd_line(entry: &DirEntry) -> String {
    let metadata = &entry.metadata;
    let size = if metadata.is_dir {
        String::new()
    } else {
        format!("size={};", metadata.len)
    };
    format!(
        "type={};modify={};{} {}\r\n",
        if metadata.is_dir { "dir" } else { "file" },
        machine_time(metadata.modified),
        size,
        entry.name
    )
}

/// `ls -l` style line with `owner` as both user and group.
pub fn list_line(entry: &DirEntry, owner: &str) -> String {
    let metadata = &entry.metadata;
    let (permissions, size) = if metadata.is_dir {
        ("dr--r--r--", 0)
    } else {
        ("-r--r--r--", metadata.len)
    };
    format!(
        "{} 1 {} {} {:>13} {} {}\r\n",
        permissions,
        owner,
        owner,
        size,
        DateTime::<Utc>::from(metadata.modified).format(LIST_TIME_FORMAT),
        entry.name
    )
}

/// Renders a whole listing. An empty directory is a bare CRLF.
pub fn render(entries: &[DirEntry], format: ListFormat, owner: &str) -> Vec<u8> {
    let mut listing = String::new();
    for entry in entries {
        match format {
            ListFormat::Mlsd => listing.push_str(&mlsd_line(entry)),
            ListFormat::List => listing.push_str(&list_line(entry, owner)),
        }
    }
    if listing.is_empty() {
        listing.push_str("\r\n");
    }
    listing.into_bytes()
}
