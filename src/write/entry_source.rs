// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

use crate::crc32::Crc32;
use crate::entry::{EntryOptions, EntryRecord};
use crate::error::{Result, ZipError};
use crate::spec::consts::{DATA_DESCRIPTOR_SIGNATURE, LFH_SIGNATURE};
use crate::spec::date::ZipDateTime;
use crate::spec::header::{DataDescriptor, GeneralPurposeFlag, LocalFileHeader};
use crate::spec::{version, zip64};
use crate::write::compressed_writer::CompressedAsyncWriter;
use crate::write::io::offset::AsyncOffsetWriter;

use futures_lite::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Chunk size used when draining an entry source. Reads, like writes, are
/// suspension points; a slow sink pushes back into the source through here.
const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Writes the full on-disk sequence for one entry: local file header, the
/// (possibly compressed) body drained from the caller's source, and the
/// trailing data descriptor.
///
/// # Note
/// - The caller must hold the archive's writer lock for the whole write.
/// - Dropping the returned future mid-write leaves the output in an
///   unrecoverable state; the coordinator turns that into an aborted archive.
pub(crate) struct EntrySourceWriter<'b, W: AsyncWrite + Unpin, R: AsyncRead + Unpin> {
    writer: &'b mut AsyncOffsetWriter<W>,
    options: EntryOptions,
    date: ZipDateTime,
    hasher: Box<dyn Crc32>,
    source: R,
}

impl<'b, W: AsyncWrite + Unpin, R: AsyncRead + Unpin> EntrySourceWriter<'b, W, R> {
    pub(crate) fn from_raw(
        writer: &'b mut AsyncOffsetWriter<W>,
        options: EntryOptions,
        date: ZipDateTime,
        hasher: Box<dyn Crc32>,
        source: R,
    ) -> Self {
        Self { writer, options, date, hasher, source }
    }

    #[tracing::instrument(skip_all, fields(name = %self.options.name))]
    pub(crate) async fn write(mut self) -> Result<EntryRecord> {
        let start_offset = self.writer.offset();
        self.write_local_file_header().await?;
        let body_offset = self.writer.offset();

        let mut uncompressed_size = 0u64;
        {
            let mut compressed = CompressedAsyncWriter::from_raw(&mut *self.writer, self.options.compression);
            let mut buffer = vec![0u8; READ_BUFFER_SIZE];

            loop {
                let read = self.source.read(&mut buffer).await.map_err(ZipError::SourceIo)?;
                if read == 0 {
                    break;
                }

                self.hasher.update(&buffer[..read]);
                uncompressed_size += read as u64;
                compressed.write_all(&buffer[..read]).await.map_err(ZipError::SinkIo)?;
            }

            // Flush the encoder's trailing block; the shutdown stops at the
            // archive writer.
            compressed.close().await.map_err(ZipError::SinkIo)?;
        }

        let compressed_size = self.writer.offset() - body_offset;
        let crc = self.hasher.finalize();
        let zip64 = zip64::entry_requires_zip64(uncompressed_size, compressed_size, self.writer.offset());

        let descriptor = DataDescriptor { crc, compressed_size, uncompressed_size, zip64 };
        self.writer.write_all(&DATA_DESCRIPTOR_SIGNATURE.to_le_bytes()).await.map_err(ZipError::SinkIo)?;
        self.writer.write_all(&descriptor.as_bytes()).await.map_err(ZipError::SinkIo)?;

        Ok(EntryRecord {
            options: self.options,
            start_offset,
            crc32: crc,
            uncompressed_size,
            compressed_size,
            zip64,
        })
    }

    async fn write_local_file_header(&mut self) -> Result<()> {
        // The CRC and sizes stay zero in the local header; the data
        // descriptor carries the real values once they are known. No ZIP64
        // extra field is emitted here either, so the header length is fixed
        // up front.
        let header = LocalFileHeader {
            version: version::as_needed_to_extract(false),
            flags: GeneralPurposeFlag { encrypted: false, data_descriptor: true, filename_unicode: true },
            compression: self.options.compression.into(),
            mod_time: self.date.time,
            mod_date: self.date.date,
            crc: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name_length: self.options.name.len().try_into().map_err(|_| ZipError::FileNameTooLarge)?,
            extra_field_length: 0,
        };

        self.writer.write_all(&LFH_SIGNATURE.to_le_bytes()).await.map_err(ZipError::SinkIo)?;
        self.writer.write_all(&header.as_slice()).await.map_err(ZipError::SinkIo)?;
        self.writer.write_all(self.options.name.as_bytes()).await.map_err(ZipError::SinkIo)?;

        Ok(())
    }
}
