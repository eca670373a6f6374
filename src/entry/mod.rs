// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

pub mod builder;

use chrono::{DateTime, Utc};

use crate::entry::builder::EntryOptionsBuilder;
use crate::error::{Result, ZipError};
use crate::spec::compression::Compression;
use crate::spec::date::ZipDateTime;

/// The caller-supplied description of an entry, immutable once submitted.
///
/// # Builder pattern
/// Constructed via [`EntryOptionsBuilder`]. The name is the only required
/// field; the compression method defaults to [`Compression::Deflate`], the
/// modification date to the current time, and the Unix mode to `0`.
#[derive(Debug, Clone)]
pub struct EntryOptions {
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) date: DateTime<Utc>,
    pub(crate) mode: u16,
    pub(crate) compression: Compression,
}

impl EntryOptions {
    /// Returns the entry's name, including any internal `/` path separators.
    ///
    /// # Note
    /// This is the raw name as it will be stored. Consumers extracting to a
    /// filesystem should sanitise it before using it as a path to prevent
    /// [directory traversal attacks](https://en.wikipedia.org/wiki/Directory_traversal_attack).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry's file comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the entry's last modification date.
    pub fn date(&self) -> &DateTime<Utc> {
        &self.date
    }

    /// Returns the entry's Unix file mode.
    pub fn mode(&self) -> u16 {
        self.mode
    }

    /// Returns the entry's compression method.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Checks the string length limits and the MS-DOS date range, returning
    /// the converted date. Runs before any byte of the entry is written.
    pub(crate) fn validate(&self) -> Result<ZipDateTime> {
        if self.name.len() > u16::MAX as usize {
            return Err(ZipError::FileNameTooLarge);
        }
        if self.comment.len() > u16::MAX as usize {
            return Err(ZipError::CommentTooLarge);
        }

        ZipDateTime::try_from(&self.date)
    }
}

/// The completed metadata of a written entry.
///
/// One type covers both standard and ZIP64 entries; all physical fields are
/// kept 64-bit wide and narrowed only at the serialization boundary. The
/// four physical fields ([`start_offset`], [`crc32`], [`compressed_size`],
/// [`uncompressed_size`]) and the [`zip64`] flag are frozen once the entry
/// is written; the metadata carried over from [`EntryOptions`] may still be
/// amended through the setters for use with
/// [`ZipArchive::finalize_with`](crate::write::ZipArchive::finalize_with).
///
/// [`start_offset`]: EntryRecord::start_offset
/// [`crc32`]: EntryRecord::crc32
/// [`compressed_size`]: EntryRecord::compressed_size
/// [`uncompressed_size`]: EntryRecord::uncompressed_size
/// [`zip64`]: EntryRecord::zip64
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub(crate) options: EntryOptions,
    pub(crate) start_offset: u64,
    pub(crate) crc32: u32,
    pub(crate) uncompressed_size: u64,
    pub(crate) compressed_size: u64,
    pub(crate) zip64: bool,
}

impl EntryRecord {
    /// Returns the entry's metadata.
    pub fn options(&self) -> &EntryOptions {
        &self.options
    }

    /// Returns the byte offset of the entry's local file header within the
    /// output stream.
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Returns the CRC-32 of the entry's uncompressed payload.
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Returns the entry's uncompressed byte count.
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Returns the entry's compressed byte count. Equal to
    /// [`uncompressed_size`](EntryRecord::uncompressed_size) for stored
    /// entries.
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Whether the entry was encoded with ZIP64 fields.
    pub fn zip64(&self) -> bool {
        self.zip64
    }

    /// Renames the entry as it will appear in the central directory.
    pub fn set_name(&mut self, name: String) {
        self.options.name = name;
    }

    /// Replaces the entry's file comment.
    pub fn set_comment(&mut self, comment: String) {
        self.options.comment = comment;
    }

    /// Replaces the entry's last modification date.
    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.options.date = date;
    }

    /// Replaces the entry's Unix file mode.
    pub fn set_mode(&mut self, mode: u16) {
        self.options.mode = mode;
    }

    /// Replaces the compression method recorded in the central directory.
    pub fn set_compression(&mut self, compression: Compression) {
        self.options.compression = compression;
    }
}

impl From<EntryOptionsBuilder> for EntryOptions {
    fn from(builder: EntryOptionsBuilder) -> Self {
        let comment = builder.comment.unwrap_or_default();
        let date = builder.date.unwrap_or_else(Utc::now);
        let mode = builder.mode.unwrap_or(0);

        Self { name: builder.name, comment, date, mode, compression: builder.compression }
    }
}
