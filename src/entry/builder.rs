// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

use chrono::{DateTime, Utc};

use crate::entry::EntryOptions;
use crate::spec::compression::Compression;

/// A builder for [`EntryOptions`].
pub struct EntryOptionsBuilder {
    pub(crate) name: String,
    pub(crate) comment: Option<String>,
    pub(crate) date: Option<DateTime<Utc>>,
    pub(crate) mode: Option<u16>,
    pub(crate) compression: Compression,
}

impl EntryOptionsBuilder {
    /// Constructs a new builder for an entry with the given name, compressed
    /// with DEFLATE.
    pub fn new(name: String) -> Self {
        Self { name, comment: None, date: None, mode: None, compression: Compression::Deflate }
    }

    /// Sets the entry's compression method.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the entry's file comment.
    pub fn comment(mut self, comment: String) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Sets the entry's last modification date. Defaults to the current time
    /// if unset.
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the entry's Unix file mode, stored in the upper 16 bits of the
    /// external attributes.
    pub fn mode(mut self, mode: u16) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Consumes this builder and returns the final [`EntryOptions`].
    pub fn build(self) -> EntryOptions {
        self.into()
    }
}
