// Copyright (c) 2024 the zipstream developers
// MIT License (https://github.com/zipstream-rs/zipstream/blob/main/LICENSE)

//! A set of [`tokio`]-specific type aliases and features.
//!
//! # Usage
//! With the `tokio` feature enabled, this module exposes an archive writer
//! that accepts `tokio::io` traits directly, compatibility-wrapped via
//! [`tokio_util::compat`].

pub mod write;
