// Copyright (C) Microsoft Corporation. All rights reserved.

//! Generic MAC context and lifecycle operations.
//!
//! [`MacCtx`] is the per-session handle: a non-owning reference to a
//! [`MacAlgorithm`] descriptor plus exclusively owned private state. All
//! lifecycle operations are implemented once here and delegate to the
//! state's dispatch entries, so every algorithm behind the trait gets the
//! same streaming surface.
//!
//! # Usage pattern
//!
//! 1. Build a context over a descriptor with [`MacCtx::new`]
//! 2. Initialize with [`init`](MacCtx::init) and install the key via
//!    [`ctrl`](MacCtx::ctrl)
//! 3. Stream data with [`update`](MacCtx::update)
//! 4. Produce the tag with [`finalize`](MacCtx::finalize), passing `None`
//!    first to learn the required buffer size if needed
//!
//! [`mac_oneshot`] composes the whole sequence for single-message use.

use super::*;

/// Per-session MAC handle.
///
/// Pairs a shared, immutable method descriptor with the private state it
/// constructed. The state slot is empty only after a failed
/// [`copy_from`](MacCtx::copy_from); every other path keeps it populated.
/// Dropping the context tears down exactly its own state, never the
/// descriptor.
///
/// Not safe for concurrent use; separate contexts over one descriptor are
/// fully independent.
pub struct MacCtx<'m> {
    /// Method descriptor shared by all contexts of this algorithm.
    meth: &'m dyn MacAlgorithm,
    /// Private algorithm state, opaque to the dispatch layer.
    state: Option<Box<dyn MacState>>,
}

impl<'m> MacCtx<'m> {
    /// Creates a context over `meth`, constructing its private state.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::AllocationFailure`] if state construction
    /// fails; no handle is returned and nothing is leaked.
    pub fn new(meth: &'m dyn MacAlgorithm) -> Result<Self, MacError> {
        match meth.new_state() {
            Ok(state) => Ok(Self {
                meth,
                state: Some(state),
            }),
            Err(err) => {
                tracing::error!(error = ?err, mac = meth.name(), "MAC state construction failed");
                Err(MacError::AllocationFailure)
            }
        }
    }

    /// Returns the method descriptor this context dispatches to.
    pub fn algorithm(&self) -> &'m dyn MacAlgorithm {
        self.meth
    }

    /// Makes this context a structural copy of `src`.
    ///
    /// The destination's prior state is dropped, the descriptor reference
    /// is taken from the source, and the source's state (if any) is
    /// deep-duplicated; afterwards the two contexts are fully independent.
    /// A source without state yields a destination without state.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::AllocationFailure`] if duplication fails. The
    /// destination is then left with no private state, so it reports size
    /// 0 and fails streaming operations until repaired by a successful
    /// `copy_from`.
    pub fn copy_from(&mut self, src: &MacCtx<'m>) -> Result<(), MacError> {
        self.meth = src.meth;
        self.state = None;
        match &src.state {
            None => Ok(()),
            Some(state) => match state.duplicate() {
                Ok(dup) => {
                    self.state = Some(dup);
                    Ok(())
                }
                Err(err) => {
                    tracing::error!(error = ?err, mac = src.meth.name(), "MAC state duplication failed");
                    Err(MacError::AllocationFailure)
                }
            },
        }
    }

    /// Creates an independent duplicate of this context.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::AllocationFailure`] if state duplication fails.
    pub fn try_clone(&self) -> Result<MacCtx<'m>, MacError> {
        let mut dup = MacCtx {
            meth: self.meth,
            state: None,
        };
        dup.copy_from(self)?;
        Ok(dup)
    }

    /// Reinitializes the private state in place without reallocating.
    ///
    /// A context without state has nothing to reset and trivially
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::ResetError`] if the algorithm's reset entry
    /// fails.
    pub fn reset(&mut self) -> Result<(), MacError> {
        match &mut self.state {
            Some(state) => state.reset(),
            None => Ok(()),
        }
    }

    /// Starts a streaming computation.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::MissingState`] on a context left without state
    /// by a failed copy, or the algorithm's own initialization error.
    pub fn init(&mut self) -> Result<(), MacError> {
        self.state_mut()?.init()
    }

    /// Appends `data` to the running computation.
    ///
    /// # Errors
    ///
    /// Any failure is terminal for the current computation; callers must
    /// reinitialize before trusting further output.
    pub fn update(&mut self, data: &[u8]) -> Result<(), MacError> {
        self.state_mut()?.update(data)
    }

    /// Finalizes the computation, or queries the required tag size.
    ///
    /// Always returns the algorithm's output size. With `out` absent
    /// nothing is computed, letting callers size a buffer before
    /// allocating it; with `out` present the tag is written to its first
    /// [`size`](MacCtx::size) bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::BufferTooSmall`] if `out` cannot hold the tag,
    /// or the algorithm's own finalization error.
    pub fn finalize(&mut self, out: Option<&mut [u8]>) -> Result<usize, MacError> {
        let len = self.size();
        if let Some(out) = out {
            if out.len() < len {
                return Err(MacError::BufferTooSmall);
            }
            self.state_mut()?.finish(&mut out[..len])?;
        }
        Ok(len)
    }

    /// Finalizes the computation and returns the tag as an owned vector.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`finalize`](MacCtx::finalize).
    pub fn finalize_vec(&mut self) -> Result<Vec<u8>, MacError> {
        let len = self.finalize(None)?;
        let mut out = vec![0u8; len];
        self.finalize(Some(&mut out))?;
        Ok(out)
    }

    /// Output tag size in bytes, or 0 while the size is not yet known
    /// (context left without state by a failed copy).
    pub fn size(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.size())
    }

    /// Issues a control command to the algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::NotSupported`] when the algorithm has no
    /// handler for the command, distinguishable from an ordinary rejected
    /// value such as [`MacError::InvalidKeySize`].
    pub fn ctrl(&mut self, ctrl: MacControl<'_>) -> Result<(), MacError> {
        let meth = self.meth;
        let result = self.state_mut()?.control(ctrl);
        if let Err(err @ MacError::NotSupported) = result {
            tracing::error!(error = ?err, mac = meth.name(), ctrl = ctrl.name(), "MAC control command not supported");
        }
        result
    }

    /// Issues a control command by name with a textual value parsed by the
    /// algorithm itself.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::NotSupported`] when the algorithm has no
    /// string-control entry or does not know `name`.
    pub fn ctrl_str(&mut self, name: &str, value: &str) -> Result<(), MacError> {
        let meth = self.meth;
        let result = self.state_mut()?.control_str(name, value);
        if let Err(err @ MacError::NotSupported) = result {
            tracing::error!(error = ?err, mac = meth.name(), name, "MAC string control not supported");
        }
        result
    }

    /// Forwards a UTF-8 text value as the binary argument of the
    /// byte-carrying command identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::InvalidArgument`] if the text exceeds
    /// [`MAX_CONTROL_LEN`], otherwise the routed command's result.
    pub fn ctrl_text(&mut self, id: ControlId, value: &str) -> Result<(), MacError> {
        if value.len() > MAX_CONTROL_LEN {
            return Err(MacError::InvalidArgument);
        }
        self.ctrl(id.with_bytes(value.as_bytes()))
    }

    /// Decodes a hex string and forwards the raw bytes as the binary
    /// argument of the byte-carrying command identified by `id`.
    ///
    /// The decoded buffer is owned locally and released on every path.
    ///
    /// # Errors
    ///
    /// Returns [`MacError::HexDecode`] if `value` is not valid hex and
    /// [`MacError::InvalidArgument`] if the decoded bytes exceed
    /// [`MAX_CONTROL_LEN`], otherwise the routed command's result.
    pub fn ctrl_hex(&mut self, id: ControlId, value: &str) -> Result<(), MacError> {
        let bin = hex::decode(value).map_err(|err| {
            tracing::error!(error = %err, mac = self.meth.name(), "MAC hex control value invalid");
            MacError::HexDecode
        })?;
        if bin.len() > MAX_CONTROL_LEN {
            return Err(MacError::InvalidArgument);
        }
        self.ctrl(id.with_bytes(&bin))
    }

    fn state_mut(&mut self) -> Result<&mut Box<dyn MacState>, MacError> {
        match &mut self.state {
            Some(state) => Ok(state),
            None => {
                tracing::error!(
                    error = ?MacError::MissingState,
                    mac = self.meth.name(),
                    "MAC context used without private state"
                );
                Err(MacError::MissingState)
            }
        }
    }
}

/// Computes a MAC over a single message in one call.
///
/// Composes context creation, initialization, key installation, one update
/// and finalization, short-circuiting on the first failure. The internal
/// context is released on every exit path. `out` follows the
/// [`MacCtx::finalize`] buffer pattern: pass `None` to query the tag size.
///
/// # Errors
///
/// The first failure of any composed step, unchanged.
pub fn mac_oneshot(
    meth: &dyn MacAlgorithm,
    key: &[u8],
    data: &[u8],
    out: Option<&mut [u8]>,
) -> Result<usize, MacError> {
    let mut ctx = MacCtx::new(meth)?;
    ctx.init()?;
    ctx.ctrl(MacControl::SetKey(key))?;
    ctx.update(data)?;
    ctx.finalize(out)
}

/// Computes a MAC over a single message, returning the tag as an owned
/// vector.
///
/// # Errors
///
/// Same failure modes as [`mac_oneshot`].
pub fn mac_oneshot_vec(
    meth: &dyn MacAlgorithm,
    key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, MacError> {
    let mut ctx = MacCtx::new(meth)?;
    ctx.init()?;
    ctx.ctrl(MacControl::SetKey(key))?;
    ctx.update(data)?;
    ctx.finalize_vec()
}
