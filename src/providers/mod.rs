// Copyright (C) Microsoft Corporation. All rights reserved.

//! Built-in MAC algorithm providers.
//!
//! Each provider is an ordinary consumer of the dispatch contract: a
//! descriptor type implementing [`MacAlgorithm`](crate::MacAlgorithm) and a
//! private state type implementing [`MacState`](crate::MacState). Nothing
//! here is reachable through a side door; user-supplied algorithms get the
//! exact same treatment.
//!
//! # Provided algorithms
//!
//! - [`hmac`]: HMAC over SHA-256, SHA-384 and SHA-512
//! - [`cmac`]: AES-CMAC with the AES variant selected by key length

use super::*;

mod cmac;
mod hmac;

pub use self::cmac::*;
pub use self::hmac::*;
