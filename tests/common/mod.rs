// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

use futures_lite::io::Cursor;
use zipstream::{ArchiveSummary, Compression, EntryOptionsBuilder, EntryRecord, ZipArchive};

/// Streams the given entries into an in-memory archive and finalizes it.
pub async fn build_archive(
    entries: &[(&str, &[u8], Compression)],
) -> (Vec<u8>, Vec<EntryRecord>, ArchiveSummary) {
    let mut buffer = Vec::new();
    let archive = ZipArchive::new(&mut buffer);

    let mut records = Vec::new();
    for (name, data, compression) in entries {
        let options = EntryOptionsBuilder::new(name.to_string()).compression(*compression).build();
        let record = archive.add_entry(options, Cursor::new(data.to_vec())).await.unwrap();
        records.push(record);
    }

    let summary = archive.finalize().await.unwrap();
    drop(archive);

    (buffer, records, summary)
}

/// Opens a finished archive with the `zip` crate for verification.
pub fn read_archive(bytes: &[u8]) -> zip::ZipArchive<std::io::Cursor<&[u8]>> {
    zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("produced archive should parse")
}
