// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

//! A module which supports writing ZIP files as a single forward-only byte
//! stream.
//!
//! # Example
//! ```no_run
//! # use zipstream::{Compression, EntryOptionsBuilder, ZipArchive};
//! # use zipstream::error::ZipError;
//! # use futures_lite::io::Cursor;
//! #
//! # async fn run() -> Result<(), ZipError> {
//! let archive = ZipArchive::new(Vec::<u8>::new());
//!
//! let options = EntryOptionsBuilder::new(String::from("foo.txt")).build();
//! let source = Cursor::new(b"This is an example file.".to_vec());
//! archive.add_entry(options, source).await?;
//!
//! let summary = archive.finalize().await?;
//! assert!(!summary.zip64);
//! #   Ok(())
//! # }
//! ```

pub(crate) mod compressed_writer;
pub(crate) mod entry_source;
pub(crate) mod io;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_lite::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

use crate::crc32::{self, Crc32Factory};
use crate::entry::{EntryOptions, EntryRecord};
use crate::error::{Result, ZipError};
use crate::spec::consts::{
    CDH_SIGNATURE, EOCDR_SIGNATURE, NON_ZIP64_MAX_NUM_FILES, NON_ZIP64_MAX_SIZE, ZIP64_EOCDL_SIGNATURE,
    ZIP64_EOCDR_SIGNATURE, ZIP64_EXTRA_FIELD_LENGTH,
};
use crate::spec::date::ZipDateTime;
use crate::spec::header::{
    CentralDirectoryRecord, EndOfCentralDirectoryRecord, GeneralPurposeFlag, Zip64EndOfCentralDirectoryLocator,
    Zip64EndOfCentralDirectoryRecord, Zip64ExtraField,
};
use crate::spec::{version, zip64};
use entry_source::EntrySourceWriter;
use io::offset::AsyncOffsetWriter;

/// Bytes buffered between the offset tracker and the downstream sink. Beyond
/// this, a slow sink propagates backpressure into the entry source through
/// the compressor.
const SINK_BUFFER_SIZE: usize = 16 * 1024;

type ArchiveWriter<W> = AsyncOffsetWriter<BufWriter<W>>;

struct ArchiveState<W: AsyncWrite + Unpin> {
    /// `None` once the archive is aborted: the slot is only re-populated
    /// after an entry completes cleanly, so a failed or cancelled write
    /// permanently kills the output.
    writer: Option<ArchiveWriter<W>>,
    entries: Vec<EntryRecord>,
    finalized: bool,
}

/// A streaming ZIP archive writer over any [`AsyncWrite`] sink.
///
/// Entry payloads are drained from caller-supplied sources and serialized
/// onto the single output stream without knowing sizes or checksums in
/// advance; each entry's real values trail its body in a data descriptor.
/// ZIP64 fields are emitted automatically whenever a size, offset, or the
/// entry count reaches the 32-bit (or 16-bit) sentinel.
///
/// Handles are cheap to clone and submissions may race freely: the archive
/// serializes them internally and guarantees entries land in the output in
/// `add_entry` call order.
pub struct ZipArchive<W: AsyncWrite + Unpin> {
    state: Arc<Mutex<ArchiveState<W>>>,
    crc32: Crc32Factory,
}

impl<W: AsyncWrite + Unpin> Clone for ZipArchive<W> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state), crc32: Arc::clone(&self.crc32) }
    }
}

impl<W: AsyncWrite + Unpin> ZipArchive<W> {
    /// Constructs a new archive writing to the given sink, hashing entries
    /// with the default CRC-32 implementation.
    pub fn new(sink: W) -> Self {
        Self::with_crc32(sink, crc32::native_factory())
    }

    /// Constructs a new archive with a caller-supplied CRC-32 factory; one
    /// hasher is created per entry.
    pub fn with_crc32(sink: W, crc32: Crc32Factory) -> Self {
        let writer = AsyncOffsetWriter::new(BufWriter::with_capacity(SINK_BUFFER_SIZE, sink));
        let state = ArchiveState { writer: Some(writer), entries: Vec::new(), finalized: false };

        Self { state: Arc::new(Mutex::new(state)), crc32 }
    }

    /// Appends one entry to the archive, draining its payload from `source`.
    ///
    /// Options are validated before the output is touched, so malformed
    /// options fail immediately and leave the archive usable. The writer
    /// lock is fair: concurrent submissions are written in the order this
    /// method was called, regardless of when their sources produce bytes.
    ///
    /// # Note
    /// Dropping the returned future once the entry has started writing
    /// aborts the whole archive, as a half-written entry is unrecoverable.
    #[tracing::instrument(skip_all, fields(name = %options.name()))]
    pub async fn add_entry<R>(&self, options: EntryOptions, source: R) -> Result<EntryRecord>
    where
        R: AsyncRead + Unpin,
    {
        let date = options.validate()?;

        let mut state = self.state.lock().await;
        if state.finalized {
            return Err(ZipError::ArchiveFinalized);
        }
        let mut writer = state.writer.take().ok_or(ZipError::ArchiveAborted)?;

        let record = EntrySourceWriter::from_raw(&mut writer, options, date, (self.crc32)(), source).write().await?;

        state.writer = Some(writer);
        state.entries.push(record.clone());
        Ok(record)
    }

    /// Returns a snapshot of all completed entries. Taken under the writer
    /// lock, so it never observes a partially-written entry.
    pub async fn entries(&self) -> Vec<EntryRecord> {
        self.state.lock().await.entries.clone()
    }

    /// Completes the archive: writes every central directory header, the
    /// ZIP64 EOCD record & locator when required, and the end of central
    /// directory record, then flushes and closes the sink.
    ///
    /// Entries already queued behind the writer lock complete first; calling
    /// this method twice is an error.
    pub async fn finalize(&self) -> Result<ArchiveSummary> {
        self.finalize_inner(None).await
    }

    /// As [`finalize`](ZipArchive::finalize), but writes the central
    /// directory from a caller-supplied re-ordering.
    ///
    /// The list must be a permutation or sub-sequence of the written
    /// entries, matched by start offset. Entry metadata (name, comment,
    /// date, mode, compression) may differ from what was originally
    /// submitted; the physical fields may not. A rejected override aborts
    /// the output so downstream consumers do not block on an archive that
    /// will never complete.
    pub async fn finalize_with(&self, entries: Vec<EntryRecord>) -> Result<ArchiveSummary> {
        self.finalize_inner(Some(entries)).await
    }

    #[tracing::instrument(skip_all)]
    async fn finalize_inner(&self, override_entries: Option<Vec<EntryRecord>>) -> Result<ArchiveSummary> {
        let mut state = self.state.lock().await;
        if state.finalized {
            return Err(ZipError::ArchiveFinalized);
        }
        state.finalized = true;

        let mut writer = state.writer.take().ok_or(ZipError::ArchiveAborted)?;

        // Fully validated before any central directory byte goes out; an
        // invalid override must not leave a half-written directory behind.
        let directory = match override_entries {
            Some(entries) => validate_override(&state.entries, entries)?,
            None => state.entries.clone(),
        };

        let cd_offset = writer.offset();
        let mut any_entry_zip64 = false;
        for record in &directory {
            any_entry_zip64 |= record.zip64;
            write_central_directory_record(&mut writer, record).await?;
        }
        let cd_size = writer.offset() - cd_offset;

        let num_entries = directory.len() as u64;
        let directory_zip64 = zip64::directory_requires_zip64(num_entries, cd_size, cd_offset);

        if directory_zip64 {
            let eocdr_offset = writer.offset();

            let eocdr = Zip64EndOfCentralDirectoryRecord {
                size_of_zip64_end_of_cd_record: 44,
                version_made_by: version::as_made_by(),
                version_needed_to_extract: version::as_needed_to_extract(true),
                disk_number: 0,
                disk_number_start_of_cd: 0,
                num_entries_in_directory_on_disk: num_entries,
                num_entries_in_directory: num_entries,
                directory_size: cd_size,
                offset_of_start_of_directory: cd_offset,
            };
            writer.write_all(&ZIP64_EOCDR_SIGNATURE.to_le_bytes()).await.map_err(ZipError::SinkIo)?;
            writer.write_all(&eocdr.as_slice()).await.map_err(ZipError::SinkIo)?;

            let eocdl = Zip64EndOfCentralDirectoryLocator {
                number_of_disk_with_start_of_zip64_end_of_central_directory: 0,
                relative_offset: eocdr_offset,
                total_number_of_disks: 1,
            };
            writer.write_all(&ZIP64_EOCDL_SIGNATURE.to_le_bytes()).await.map_err(ZipError::SinkIo)?;
            writer.write_all(&eocdl.as_slice()).await.map_err(ZipError::SinkIo)?;
        }

        let num_entries_u16 =
            if num_entries >= NON_ZIP64_MAX_NUM_FILES as u64 { NON_ZIP64_MAX_NUM_FILES } else { num_entries as u16 };
        let cd_size_u32 = if cd_size >= NON_ZIP64_MAX_SIZE as u64 { NON_ZIP64_MAX_SIZE } else { cd_size as u32 };
        let cd_offset_u32 = if cd_offset >= NON_ZIP64_MAX_SIZE as u64 { NON_ZIP64_MAX_SIZE } else { cd_offset as u32 };

        let eocdr = EndOfCentralDirectoryRecord {
            disk_num: 0,
            start_cent_dir_disk: 0,
            num_of_entries_disk: num_entries_u16,
            num_of_entries: num_entries_u16,
            size_cent_dir: cd_size_u32,
            cent_dir_offset: cd_offset_u32,
            file_comm_length: 0,
        };
        writer.write_all(&EOCDR_SIGNATURE.to_le_bytes()).await.map_err(ZipError::SinkIo)?;
        writer.write_all(&eocdr.as_slice()).await.map_err(ZipError::SinkIo)?;

        writer.close().await.map_err(ZipError::SinkIo)?;

        Ok(ArchiveSummary {
            zip64: any_entry_zip64 || directory_zip64,
            uncompressed_entries_size: directory.iter().map(|record| record.uncompressed_size).sum(),
            compressed_entries_size: directory.iter().map(|record| record.compressed_size).sum(),
            file_size: writer.offset(),
        })
    }
}

/// What [`ZipArchive::finalize`] reports about the completed archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Whether any entry or the end of central directory needed ZIP64 fields.
    pub zip64: bool,
    /// Total uncompressed bytes across the entries in the central directory.
    pub uncompressed_entries_size: u64,
    /// Total compressed bytes across the entries in the central directory.
    pub compressed_entries_size: u64,
    /// Total bytes written to the sink.
    pub file_size: u64,
}

fn validate_override(written: &[EntryRecord], override_entries: Vec<EntryRecord>) -> Result<Vec<EntryRecord>> {
    let by_offset: HashMap<u64, &EntryRecord> =
        written.iter().map(|record| (record.start_offset, record)).collect();

    let mut seen = HashSet::with_capacity(override_entries.len());
    for record in &override_entries {
        let offset = record.start_offset;
        if !seen.insert(offset) {
            return Err(ZipError::OverrideDuplicateEntry(offset));
        }

        let original = by_offset.get(&offset).ok_or(ZipError::OverrideUnknownEntry(offset))?;
        if record.crc32 != original.crc32 {
            return Err(ZipError::OverrideFrozenField { offset, field: "crc32" });
        }
        if record.uncompressed_size != original.uncompressed_size {
            return Err(ZipError::OverrideFrozenField { offset, field: "uncompressed_size" });
        }
        if record.compressed_size != original.compressed_size {
            return Err(ZipError::OverrideFrozenField { offset, field: "compressed_size" });
        }
        if record.zip64 != original.zip64 {
            return Err(ZipError::OverrideFrozenField { offset, field: "zip64" });
        }

        // Replacement metadata still has to fit the wire format.
        record.options.validate()?;
    }

    Ok(override_entries)
}

#[tracing::instrument(skip_all, fields(name = %record.options.name()))]
async fn write_central_directory_record<W: AsyncWrite + Unpin>(
    writer: &mut AsyncOffsetWriter<W>,
    record: &EntryRecord,
) -> Result<()> {
    let date = ZipDateTime::try_from(&record.options.date)?;
    let name = record.options.name.as_bytes();
    let comment = record.options.comment.as_bytes();

    // Narrow to 32 bits here and nowhere else; promoted entries get the
    // sentinel plus a ZIP64 extra field carrying the real values.
    let (compressed_u32, uncompressed_u32, offset_u32) = if record.zip64 {
        (NON_ZIP64_MAX_SIZE, NON_ZIP64_MAX_SIZE, NON_ZIP64_MAX_SIZE)
    } else {
        (record.compressed_size as u32, record.uncompressed_size as u32, record.start_offset as u32)
    };
    let extra = record.zip64.then(|| Zip64ExtraField {
        uncompressed_size: record.uncompressed_size,
        compressed_size: record.compressed_size,
        local_header_offset: record.start_offset,
    });

    let header = CentralDirectoryRecord {
        v_made_by: version::as_made_by(),
        v_needed: version::as_needed_to_extract(record.zip64),
        flags: GeneralPurposeFlag { encrypted: false, data_descriptor: true, filename_unicode: true },
        compression: record.options.compression.into(),
        mod_time: date.time,
        mod_date: date.date,
        crc: record.crc32,
        compressed_size: compressed_u32,
        uncompressed_size: uncompressed_u32,
        file_name_length: name.len().try_into().map_err(|_| ZipError::FileNameTooLarge)?,
        extra_field_length: extra.as_ref().map(|_| ZIP64_EXTRA_FIELD_LENGTH as u16).unwrap_or(0),
        file_comment_length: comment.len().try_into().map_err(|_| ZipError::CommentTooLarge)?,
        disk_start: 0,
        inter_attr: 0,
        exter_attr: (record.options.mode as u32) << 16,
        lh_offset: offset_u32,
    };

    writer.write_all(&CDH_SIGNATURE.to_le_bytes()).await.map_err(ZipError::SinkIo)?;
    writer.write_all(&header.as_slice()).await.map_err(ZipError::SinkIo)?;
    writer.write_all(name).await.map_err(ZipError::SinkIo)?;
    if let Some(extra) = extra {
        writer.write_all(&extra.as_slice()).await.map_err(ZipError::SinkIo)?;
    }
    writer.write_all(comment).await.map_err(ZipError::SinkIo)?;

    Ok(())
}
