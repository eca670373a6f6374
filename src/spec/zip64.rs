// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

//! The ZIP32 to ZIP64 promotion policy.
//!
//! All boundaries are inclusive: a value equal to the 32-bit (or 16-bit)
//! sentinel already requires promotion, since the sentinel itself is reserved
//! to mean "see the ZIP64 field".

use crate::spec::consts::{NON_ZIP64_MAX_NUM_FILES, NON_ZIP64_MAX_SIZE};

/// Whether an entry must be encoded with ZIP64 fields.
///
/// `end_offset` is the output offset once the entry body has been written,
/// so an entry whose body crosses the 32-bit boundary promotes even when its
/// local header started below it.
pub(crate) fn entry_requires_zip64(uncompressed_size: u64, compressed_size: u64, end_offset: u64) -> bool {
    uncompressed_size >= NON_ZIP64_MAX_SIZE as u64
        || compressed_size >= NON_ZIP64_MAX_SIZE as u64
        || end_offset >= NON_ZIP64_MAX_SIZE as u64
}

/// Whether the archive needs a ZIP64 EOCD record & locator ahead of the
/// standard EOCD.
pub(crate) fn directory_requires_zip64(num_entries: u64, directory_size: u64, directory_offset: u64) -> bool {
    num_entries >= NON_ZIP64_MAX_NUM_FILES as u64
        || directory_size >= NON_ZIP64_MAX_SIZE as u64
        || directory_offset >= NON_ZIP64_MAX_SIZE as u64
}
