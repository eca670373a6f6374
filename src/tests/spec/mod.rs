// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)
