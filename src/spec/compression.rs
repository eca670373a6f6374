// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

/// A compression method supported by this crate.
///
/// Entries default to [`Compression::Deflate`]; [`Compression::Stored`]
/// writes the payload verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    Deflate,
}

impl From<&Compression> for u16 {
    // Convert a supported compression method into its relevant u16 stored with little endianness.
    fn from(compression: &Compression) -> u16 {
        match compression {
            Compression::Stored => 0,
            Compression::Deflate => 8,
        }
    }
}

impl From<Compression> for u16 {
    fn from(compression: Compression) -> u16 {
        (&compression).into()
    }
}
