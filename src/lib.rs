// Copyright (C) Microsoft Corporation. All rights reserved.

//! Uniform dispatch layer for message authentication code (MAC) algorithms.
//!
//! This crate drives heterogeneous MAC algorithms (HMAC, CMAC, and any
//! user-supplied construction) through one streaming lifecycle: build a
//! context, initialize it, feed data in chunks, finalize into a tag, query
//! the output size, and issue algorithm-specific control commands. The
//! dispatch layer never learns the shape of an algorithm's internal state
//! or its parameters; algorithms plug in behind two object-safe traits.
//!
//! # Architecture
//!
//! - [`MacAlgorithm`]: the immutable method descriptor. One value per
//!   algorithm, shared by reference across any number of contexts. Its only
//!   construction entry produces the algorithm's private state.
//! - [`MacState`]: the per-session private state. Duplicate, reset, init,
//!   update, finalize, size and the control entries are methods on the
//!   boxed state object, so each algorithm carries its own dispatch table.
//! - [`MacCtx`]: the per-session handle pairing a descriptor reference with
//!   exclusively owned private state, exposing the generic lifecycle.
//! - [`mac_oneshot`] / [`mac_oneshot_vec`]: single-call composition of the
//!   whole lifecycle for stateless use.
//!
//! # Control commands
//!
//! Out-of-band parameters (keys, IVs, customization strings, flags) travel
//! as the closed [`MacControl`] value rather than an open argument list.
//! Text and hex convenience encoders build the tagged value from string
//! input; algorithms that do not understand a command report
//! [`MacError::NotSupported`], which is distinguishable from an ordinary
//! rejected value.
//!
//! # Buffer management
//!
//! Finalization supports two buffer patterns:
//! - Pass `None` to query the required tag size without computing anything
//! - Pass `Some(buffer)` to compute the tag into the buffer
//!
//! # Thread safety
//!
//! A context is single-threaded; drive it from one thread or add external
//! synchronization. Separate contexts are fully independent even when they
//! share one descriptor, because the descriptor is immutable and every
//! context owns disjoint private state.

mod ctx;
mod method;
mod providers;

pub use ctx::*;
pub use method::*;
pub use providers::*;
use thiserror::Error;

/// Error type for all MAC dispatch and provider operations.
///
/// Structural failures (`AllocationFailure`, `NotSupported`,
/// `InvalidArgument`, `MissingState`) are distinguished from ordinary
/// recoverable operation failures such as a rejected key length, so callers
/// can tell "this command does not exist for this algorithm" apart from
/// "this value was rejected".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacError {
    /// Construction or duplication of private state failed.
    #[error("MAC state allocation failed")]
    AllocationFailure,
    /// The algorithm has no handler for the requested control command.
    #[error("MAC control command not supported")]
    NotSupported,
    /// A control argument exceeds the representable length limit.
    #[error("MAC control argument invalid")]
    InvalidArgument,
    /// The context holds no private state (only possible after a failed
    /// copy); the operation needs one.
    #[error("MAC context has no private state")]
    MissingState,
    /// Output buffer is too small to hold the tag.
    #[error("MAC output buffer too small")]
    BufferTooSmall,
    /// Initialization of the running computation failed.
    #[error("MAC initialization failed")]
    InitError,
    /// Streaming update failed; the current computation is no longer
    /// trustworthy.
    #[error("MAC update failed")]
    UpdateError,
    /// Tag finalization failed.
    #[error("MAC finalization failed")]
    FinishError,
    /// Reset of the private state failed.
    #[error("MAC reset failed")]
    ResetError,
    /// Key material was rejected by the algorithm.
    #[error("MAC invalid key size")]
    InvalidKeySize,
    /// A hex-form control value could not be decoded.
    #[error("MAC hex decoding failed")]
    HexDecode,
}
