// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

use std::io::Error;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::io::{AsyncRead, AsyncWrite, Cursor};

use crate::error::ZipError;
use crate::spec::compression::Compression;
use crate::write::ZipArchive;
use crate::EntryOptionsBuilder;


/// /dev/null for AsyncWrite.
/// Useful for tests that involve writing, but not reading, large amounts of data.
pub(crate) struct AsyncSink;

// AsyncSink is always ready to receive bytes and throw them away.
impl AsyncWrite for AsyncSink {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, Error>> {
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }
}

/// A source producing a fixed number of zero bytes.
pub(crate) struct ZeroSource {
    remaining: u64,
}

impl ZeroSource {
    pub(crate) fn new(remaining: u64) -> Self {
        Self { remaining }
    }
}

impl AsyncRead for ZeroSource {
    fn poll_read(mut self: Pin<&mut Self>, _: &mut Context<'_>, buf: &mut [u8]) -> Poll<Result<usize, Error>> {
        let take = (self.remaining).min(buf.len() as u64) as usize;
        buf[..take].iter_mut().for_each(|byte| *byte = 0);
        self.remaining -= take as u64;
        Poll::Ready(Ok(take))
    }
}

/// A source that never produces a byte nor EOF.
struct PendingSource;

impl AsyncRead for PendingSource {
    fn poll_read(self: Pin<&mut Self>, _: &mut Context<'_>, _: &mut [u8]) -> Poll<Result<usize, Error>> {
        Poll::Pending
    }
}

/// A source that fails on the first read.
struct FailingSource;

impl AsyncRead for FailingSource {
    fn poll_read(self: Pin<&mut Self>, _: &mut Context<'_>, _: &mut [u8]) -> Poll<Result<usize, Error>> {
        Poll::Ready(Err(Error::new(std::io::ErrorKind::Other, "source exploded")))
    }
}

/// A sink that rejects every write and flush.
struct FailingSink;

impl AsyncWrite for FailingSink {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<Result<usize, Error>> {
        Poll::Ready(Err(Error::new(std::io::ErrorKind::Other, "sink exploded")))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Err(Error::new(std::io::ErrorKind::Other, "sink exploded")))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Err(Error::new(std::io::ErrorKind::Other, "sink exploded")))
    }
}

fn stored(name: &str) -> crate::EntryOptions {
    EntryOptionsBuilder::new(name.to_string()).compression(Compression::Stored).build()
}

#[tokio::test]
async fn name_of_exactly_u16_max_bytes_is_accepted() {
    let archive = ZipArchive::new(AsyncSink);

    let options = stored(&"a".repeat(u16::MAX as usize));
    archive.add_entry(options, Cursor::new(Vec::<u8>::new())).await.expect("maximum length name rejected");
}

#[tokio::test]
async fn name_over_u16_max_bytes_is_rejected() {
    let archive = ZipArchive::new(AsyncSink);

    let options = stored(&"a".repeat(u16::MAX as usize + 1));
    let result = archive.add_entry(options, Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::FileNameTooLarge)));

    // Invalid options leave the archive usable.
    archive.add_entry(stored("ok.txt"), Cursor::new(Vec::<u8>::new())).await.unwrap();
}

#[tokio::test]
async fn comment_over_u16_max_bytes_is_rejected() {
    let archive = ZipArchive::new(AsyncSink);

    let options = EntryOptionsBuilder::new("commented.txt".to_string())
        .comment("c".repeat(u16::MAX as usize + 1))
        .build();
    let result = archive.add_entry(options, Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::CommentTooLarge)));
}

#[tokio::test]
async fn date_outside_dos_range_is_rejected() {
    use chrono::{TimeZone, Utc};

    let archive = ZipArchive::new(AsyncSink);

    let options = EntryOptionsBuilder::new("old.txt".to_string())
        .date(Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 0).unwrap())
        .build();
    let result = archive.add_entry(options, Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::DateOutOfRange(1969))));
}

#[tokio::test]
async fn add_entry_after_finalize_fails() {
    let archive = ZipArchive::new(AsyncSink);
    archive.finalize().await.unwrap();

    let result = archive.add_entry(stored("late.txt"), Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::ArchiveFinalized)));
}

#[tokio::test]
async fn finalize_twice_fails() {
    let archive = ZipArchive::new(AsyncSink);
    archive.finalize().await.unwrap();

    assert!(matches!(archive.finalize().await, Err(ZipError::ArchiveFinalized)));
}

#[tokio::test]
async fn source_error_aborts_the_archive() {
    let archive = ZipArchive::new(AsyncSink);

    let result = archive.add_entry(stored("doomed.txt"), FailingSource).await;
    assert!(matches!(result, Err(ZipError::SourceIo(_))));

    let result = archive.add_entry(stored("next.txt"), Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::ArchiveAborted)));

    assert!(matches!(archive.finalize().await, Err(ZipError::ArchiveAborted)));
}

#[tokio::test]
async fn sink_error_surfaces_and_aborts() {
    let archive = ZipArchive::new(FailingSink);

    // A small entry fits the intermediate buffer, so the sink failure
    // surfaces once finalize flushes.
    archive.add_entry(stored("buffered.txt"), Cursor::new(vec![0u8; 32])).await.unwrap();

    assert!(matches!(archive.finalize().await, Err(ZipError::SinkIo(_))));
}

#[tokio::test]
async fn dropped_add_entry_future_aborts_the_archive() {
    let archive = ZipArchive::new(AsyncSink);

    {
        let entry = archive.add_entry(stored("halfway.txt"), PendingSource);
        futures_lite::pin!(entry);
        // One poll gets the local header out before the source stalls.
        assert!(futures_lite::future::poll_once(entry.as_mut()).await.is_none());
    }

    let result = archive.add_entry(stored("next.txt"), Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::ArchiveAborted)));
}

#[tokio::test]
async fn entries_returns_completed_snapshot() {
    let archive = ZipArchive::new(AsyncSink);
    assert!(archive.entries().await.is_empty());

    archive.add_entry(stored("one.txt"), Cursor::new(b"one".to_vec())).await.unwrap();
    archive.add_entry(stored("two.txt"), Cursor::new(b"two".to_vec())).await.unwrap();

    let entries = archive.entries().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].options().name(), "one.txt");
    assert_eq!(entries[1].options().name(), "two.txt");
    assert!(entries[0].start_offset() < entries[1].start_offset());
}

#[tokio::test]
async fn override_with_unknown_offset_fails_and_aborts() {
    let archive = ZipArchive::new(AsyncSink);
    archive.add_entry(stored("a.txt"), Cursor::new(b"aaaa".to_vec())).await.unwrap();

    let mut entries = archive.entries().await;
    entries[0].start_offset += 1000;

    let result = archive.finalize_with(entries).await;
    assert!(matches!(result, Err(ZipError::OverrideUnknownEntry(1000))));

    // The output is aborted and finalize cannot be retried.
    assert!(matches!(archive.finalize().await, Err(ZipError::ArchiveFinalized)));
}

#[tokio::test]
async fn override_with_duplicate_offset_fails() {
    let archive = ZipArchive::new(AsyncSink);
    archive.add_entry(stored("a.txt"), Cursor::new(b"aaaa".to_vec())).await.unwrap();

    let entries = archive.entries().await;
    let doubled = vec![entries[0].clone(), entries[0].clone()];

    let result = archive.finalize_with(doubled).await;
    assert!(matches!(result, Err(ZipError::OverrideDuplicateEntry(0))));
}

#[tokio::test]
async fn override_changing_frozen_fields_fails() {
    let archive = ZipArchive::new(AsyncSink);
    archive.add_entry(stored("a.txt"), Cursor::new(b"aaaa".to_vec())).await.unwrap();

    let mut entries = archive.entries().await;
    entries[0].crc32 ^= 1;

    let result = archive.finalize_with(entries).await;
    assert!(matches!(result, Err(ZipError::OverrideFrozenField { offset: 0, field: "crc32" })));
}

#[tokio::test]
async fn override_with_oversized_rename_fails() {
    let archive = ZipArchive::new(AsyncSink);
    archive.add_entry(stored("a.txt"), Cursor::new(b"aaaa".to_vec())).await.unwrap();

    let mut entries = archive.entries().await;
    entries[0].set_name("b".repeat(u16::MAX as usize + 1));

    let result = archive.finalize_with(entries).await;
    assert!(matches!(result, Err(ZipError::FileNameTooLarge)));
}

#[tokio::test]
async fn stored_entry_sizes_are_equal() {
    let archive = ZipArchive::new(AsyncSink);

    let record = archive.add_entry(stored("data.bin"), Cursor::new(vec![7u8; 4096])).await.unwrap();
    assert_eq!(record.uncompressed_size(), 4096);
    assert_eq!(record.compressed_size(), 4096);
    assert!(!record.zip64());
}

#[tokio::test]
async fn custom_crc32_factory_is_used() {
    use crate::crc32::TableCrc32;
    use std::sync::Arc;

    let archive = ZipArchive::with_crc32(AsyncSink, Arc::new(|| Box::new(TableCrc32::new())));

    let record = archive.add_entry(stored("hello.txt"), Cursor::new(b"Hello, World!".to_vec())).await.unwrap();
    assert_eq!(record.crc32(), 0xEC4AC3D0);
}
