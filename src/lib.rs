// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

//! An asynchronous streaming ZIP archive writer.
//!
//! ## Features
//! - Produces a valid PKZIP archive as a single forward-only byte stream; no
//!   seeking, no payload buffering, no sizes or checksums known up front.
//! - Stored and Deflate compression methods, with entry sizes and CRC-32
//!   carried in trailing data descriptors.
//! - Automatic ZIP64 promotion per entry and for the end of central
//!   directory, at the exact sentinel boundaries.
//! - Concurrent entry submission over one fair writer lock: output order is
//!   submission order, backpressure propagates from the sink into sources.
//! - Aims for reasonable [specification](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT) compliance.
//!
//! ## Example
//! ```no_run
//! # use zipstream::{Compression, EntryOptionsBuilder, ZipArchive};
//! # use zipstream::error::ZipError;
//! # use futures_lite::io::Cursor;
//! #
//! # async fn run() -> Result<(), ZipError> {
//! let archive = ZipArchive::new(Vec::<u8>::new());
//!
//! let options = EntryOptionsBuilder::new(String::from("greeting.txt"))
//!     .compression(Compression::Stored)
//!     .build();
//! let record = archive.add_entry(options, Cursor::new(b"Hello, World!".to_vec())).await?;
//! assert_eq!(record.uncompressed_size(), 13);
//!
//! archive.finalize().await?;
//! #   Ok(())
//! # }
//! ```

pub mod crc32;
pub mod error;
pub mod write;

#[cfg(feature = "tokio")]
pub mod tokio;

pub(crate) mod entry;
pub(crate) mod spec;


pub use crate::spec::compression::Compression;

pub use crate::crc32::{Crc32, Crc32Factory, NativeCrc32, TableCrc32};
pub use crate::entry::{builder::EntryOptionsBuilder, EntryOptions, EntryRecord};
pub use crate::write::{ArchiveSummary, ZipArchive};
