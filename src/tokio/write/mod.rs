// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

use crate::crc32::Crc32Factory;
use crate::entry::{EntryOptions, EntryRecord};
use crate::error::Result;
use crate::write::{ArchiveSummary, ZipArchive as BaseZipArchive};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};

/// A streaming ZIP archive writer which acts over tokio's [`AsyncWrite`] and
/// drains tokio [`AsyncRead`] entry sources.
pub struct ZipArchive<W: AsyncWrite + Unpin>(BaseZipArchive<Compat<W>>);

impl<W: AsyncWrite + Unpin> Clone for ZipArchive<W> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<W: AsyncWrite + Unpin> ZipArchive<W> {
    /// Constructs a new archive writing to the given sink.
    pub fn new(sink: W) -> Self {
        Self(BaseZipArchive::new(sink.compat_write()))
    }

    /// Constructs a new archive with a caller-supplied CRC-32 factory.
    pub fn with_crc32(sink: W, crc32: Crc32Factory) -> Self {
        Self(BaseZipArchive::with_crc32(sink.compat_write(), crc32))
    }

    /// Appends one entry to the archive, draining its payload from `source`.
    pub async fn add_entry<R>(&self, options: EntryOptions, source: R) -> Result<EntryRecord>
    where
        R: AsyncRead + Unpin,
    {
        self.0.add_entry(options, source.compat()).await
    }

    /// Returns a snapshot of all completed entries.
    pub async fn entries(&self) -> Vec<EntryRecord> {
        self.0.entries().await
    }

    /// Completes the archive and closes the sink.
    pub async fn finalize(&self) -> Result<ArchiveSummary> {
        self.0.finalize().await
    }

    /// As [`finalize`](ZipArchive::finalize), with a caller-supplied central
    /// directory ordering.
    pub async fn finalize_with(&self, entries: Vec<EntryRecord>) -> Result<ArchiveSummary> {
        self.0.finalize_with(entries).await
    }
}
