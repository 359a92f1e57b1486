// Copyright (C) Microsoft Corporation. All rights reserved.

//! Method descriptor and private state traits.
//!
//! These two traits are the polymorphism contract of the crate. A
//! [`MacAlgorithm`] value is an immutable method descriptor: it names the
//! algorithm and constructs its private state. Everything that operates on
//! a running computation lives on [`MacState`], so the dispatch layer works
//! against boxed trait objects and never sees a concrete state type.
//!
//! Control parameters travel as the closed [`MacControl`] value instead of
//! an open-ended argument list; the text and hex encoders on
//! [`MacCtx`](crate::MacCtx) build it from string input keyed by a
//! [`ControlId`].

use super::*;

/// Maximum byte length of a single control-command argument.
///
/// Text and hex control encoders reject longer values with
/// [`MacError::InvalidArgument`] before dispatching.
pub const MAX_CONTROL_LEN: usize = i32::MAX as usize;

/// Immutable method descriptor for one MAC algorithm.
///
/// One descriptor value serves any number of contexts; contexts hold a
/// non-owning reference, so the descriptor must outlive them all (enforced
/// by the `'m` lifetime on [`MacCtx`](crate::MacCtx)). Descriptors carry no
/// per-session data and are therefore safe to share across threads.
pub trait MacAlgorithm: Send + Sync {
    /// Algorithm identity, opaque to the dispatch layer beyond equality
    /// and log output.
    fn name(&self) -> &str;

    /// Constructs fresh private state for one session.
    ///
    /// # Errors
    ///
    /// Any error is surfaced by the dispatch layer as
    /// [`MacError::AllocationFailure`]; no partially built context escapes.
    fn new_state(&self) -> Result<Box<dyn MacState>, MacError>;
}

/// Control command with its algorithm-defined argument.
///
/// The closed set of tagged values replaces an open variadic argument
/// list: byte-carrying commands borrow their argument, so no copy is made
/// on the way to the algorithm.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum MacControl<'a> {
    /// Install the authentication key, (re)starting the computation.
    SetKey(&'a [u8]),
    /// Install a nonce/IV for algorithms that take one.
    SetIv(&'a [u8]),
    /// Install an algorithm-defined customization string.
    SetCustom(&'a [u8]),
    /// Set algorithm-defined behavior flags.
    SetFlags(u32),
}

impl MacControl<'_> {
    /// Command name for diagnostics; never exposes the argument bytes.
    pub fn name(&self) -> &'static str {
        match self {
            MacControl::SetKey(_) => "set-key",
            MacControl::SetIv(_) => "set-iv",
            MacControl::SetCustom(_) => "set-custom",
            MacControl::SetFlags(_) => "set-flags",
        }
    }
}

/// Identifies a byte-carrying control command for the text and hex
/// encoders, which supply the argument separately as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    /// Targets [`MacControl::SetKey`].
    Key,
    /// Targets [`MacControl::SetIv`].
    Iv,
    /// Targets [`MacControl::SetCustom`].
    Custom,
}

impl ControlId {
    /// Builds the tagged control value carrying `arg`.
    pub fn with_bytes(self, arg: &[u8]) -> MacControl<'_> {
        match self {
            ControlId::Key => MacControl::SetKey(arg),
            ControlId::Iv => MacControl::SetIv(arg),
            ControlId::Custom => MacControl::SetCustom(arg),
        }
    }
}

/// Private per-session state of one MAC algorithm.
///
/// Produced only by [`MacAlgorithm::new_state`] or [`MacState::duplicate`]
/// of the same algorithm; the dispatch layer never mixes state across
/// descriptors. All methods are synchronous and bounded by the cost of the
/// underlying transform.
pub trait MacState: Send {
    /// Deep-duplicates this state; the duplicate is fully independent.
    ///
    /// # Errors
    ///
    /// Surfaced by [`MacCtx::copy_from`](crate::MacCtx::copy_from) as
    /// [`MacError::AllocationFailure`], leaving the destination without
    /// private state.
    fn duplicate(&self) -> Result<Box<dyn MacState>, MacError>;

    /// Reinitializes the state in place, keeping installed parameters.
    fn reset(&mut self) -> Result<(), MacError>;

    /// Starts a streaming computation.
    fn init(&mut self) -> Result<(), MacError>;

    /// Appends `data` to the running computation.
    fn update(&mut self, data: &[u8]) -> Result<(), MacError>;

    /// Writes the tag into `out`, which the dispatch layer has already
    /// sized to exactly [`size`](MacState::size) bytes.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), MacError>;

    /// Output tag size in bytes.
    fn size(&self) -> usize;

    /// Handles a control command.
    ///
    /// The default entry handles nothing: algorithms opt in per command and
    /// anything unhandled reports [`MacError::NotSupported`].
    fn control(&mut self, ctrl: MacControl<'_>) -> Result<(), MacError> {
        let _ = ctrl;
        Err(MacError::NotSupported)
    }

    /// Handles a control command given by name with a textual value,
    /// parsed by the algorithm itself (e.g. `"key"`, `"hexkey"`).
    ///
    /// The default entry handles nothing and reports
    /// [`MacError::NotSupported`].
    fn control_str(&mut self, name: &str, value: &str) -> Result<(), MacError> {
        let _ = (name, value);
        Err(MacError::NotSupported)
    }
}
