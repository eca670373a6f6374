// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.

use thiserror::Error;

/// A Result type alias over ZipError to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipError>;

/// An enum of possible errors and their descriptions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZipError {
    #[error("file name exceeds the maximum encoded length of 65535 bytes")]
    FileNameTooLarge,
    #[error("entry comment exceeds the maximum encoded length of 65535 bytes")]
    CommentTooLarge,
    #[error("modification year {0} is outside the MS-DOS representable range (1980..=2107)")]
    DateOutOfRange(i32),

    #[error("the archive has already been finalized")]
    ArchiveFinalized,
    #[error("the archive output was aborted by an earlier failure")]
    ArchiveAborted,

    #[error("finalize override references an entry at offset {0} which was never written")]
    OverrideUnknownEntry(u64),
    #[error("finalize override references the entry at offset {0} more than once")]
    OverrideDuplicateEntry(u64),
    #[error("finalize override changes the frozen field '{field}' of the entry at offset {offset}")]
    OverrideFrozenField { offset: u64, field: &'static str },

    #[error("an entry source failed")]
    SourceIo(#[source] std::io::Error),
    #[error("the output sink failed")]
    SinkIo(#[source] std::io::Error),
}
