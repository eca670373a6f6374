// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

#[allow(dead_code)]
pub const SIGNATURE_LENGTH: usize = 4;

// Local file header constants
pub const LFH_SIGNATURE: u32 = 0x04034b50;
/// The length of the local file header, excluding the signature and file name.
#[allow(dead_code)]
pub const LFH_LENGTH: usize = 26;

// Data descriptor constants
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x08074b50;

// Central directory header constants
pub const CDH_SIGNATURE: u32 = 0x02014b50;
/// The length of a central directory header, excluding the signature and the
/// trailing file name, extra field, and comment.
#[allow(dead_code)]
pub const CDH_LENGTH: usize = 42;

// End of central directory record constants
pub const EOCDR_SIGNATURE: u32 = 0x06054b50;
/// The length of the EOCDR, excluding the signature.
#[allow(dead_code)]
pub const EOCDR_LENGTH: usize = 18;

/// The signature for the ZIP64 end of central directory record.
pub const ZIP64_EOCDR_SIGNATURE: u32 = 0x06064b50;
/// The length of the ZIP64 EOCDR, excluding the signature.
#[allow(dead_code)]
pub const ZIP64_EOCDR_LENGTH: usize = 52;

/// The signature for the ZIP64 end of central directory locator.
pub const ZIP64_EOCDL_SIGNATURE: u32 = 0x07064b50;
/// The length of the ZIP64 EOCDL, excluding the signature.
/// The EOCDL has a fixed size, thankfully.
#[allow(dead_code)]
pub const ZIP64_EOCDL_LENGTH: usize = 16;

/// The header id of the ZIP64 extended information extra field.
pub const ZIP64_EXTRA_FIELD_ID: u16 = 0x0001;
/// The full length of the ZIP64 extra field emitted into central directory
/// headers: header id, data size, and the three 8-byte values.
pub const ZIP64_EXTRA_FIELD_LENGTH: usize = 28;

pub const VERSION_MADE_BY: u16 = 45;
pub const VERSION_NEEDED_STD: u16 = 20;
pub const VERSION_NEEDED_ZIP64: u16 = 45;

/// The contents of a 32-bit header field when one must reference the ZIP64
/// version instead. Promotion triggers at `>=` this value, matching the
/// sentinel reservation.
pub const NON_ZIP64_MAX_SIZE: u32 = 0xFFFFFFFF;
/// The contents of a 16-bit entry count field when one must reference the
/// ZIP64 version instead.
pub const NON_ZIP64_MAX_NUM_FILES: u16 = 0xFFFF;
