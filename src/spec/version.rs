// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

use crate::spec::consts::{VERSION_MADE_BY, VERSION_NEEDED_STD, VERSION_NEEDED_ZIP64};

pub fn as_made_by() -> u16 {
    VERSION_MADE_BY
}

pub fn as_needed_to_extract(zip64: bool) -> u16 {
    if zip64 {
        VERSION_NEEDED_ZIP64
    } else {
        VERSION_NEEDED_STD
    }
}
