// Copyright (C) Microsoft Corporation. All rights reserved.

//! AES-CMAC provider.
//!
//! Wraps the RustCrypto `cmac` + `aes` implementation behind the dispatch
//! contract. Unlike HMAC, CMAC is strict about key material: the key must
//! be exactly 16, 24 or 32 bytes, and its length selects the AES variant.
//! A key of any other length is rejected as a recoverable failure without
//! disturbing the previously installed key.

use aes::{Aes128, Aes192, Aes256};
use ::cmac::{Cmac, Mac};
use zeroize::Zeroizing;

use super::*;

/// AES block size; every CMAC tag is this long.
const CMAC_TAG_SIZE: usize = 16;

/// Method descriptor for AES-CMAC.
///
/// The AES variant is not fixed by the descriptor; it follows the length
/// of the key installed per context through the set-key control command.
pub struct CmacAlgo;

impl CmacAlgo {
    /// Creates the AES-CMAC descriptor.
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CmacAlgo {
    fn default() -> Self {
        Self::new()
    }
}

impl MacAlgorithm for CmacAlgo {
    fn name(&self) -> &str {
        "CMAC-AES"
    }

    fn new_state(&self) -> Result<Box<dyn MacState>, MacError> {
        Ok(Box::new(CmacState {
            key: None,
            engine: None,
        }))
    }
}

#[derive(Clone)]
enum CmacEngine {
    Aes128(Cmac<Aes128>),
    Aes192(Cmac<Aes192>),
    Aes256(Cmac<Aes256>),
}

/// Private CMAC state: the installed key plus the running keyed engine.
#[derive(Clone)]
struct CmacState {
    key: Option<Zeroizing<Vec<u8>>>,
    engine: Option<CmacEngine>,
}

impl CmacState {
    /// Starts a fresh computation under the installed key.
    fn rekey(&mut self) -> Result<(), MacError> {
        let key = self.key.as_ref().ok_or(MacError::InitError)?;
        let engine = match key.len() {
            16 => CmacEngine::Aes128(
                Cmac::<Aes128>::new_from_slice(key).map_err(|_| MacError::InvalidKeySize)?,
            ),
            24 => CmacEngine::Aes192(
                Cmac::<Aes192>::new_from_slice(key).map_err(|_| MacError::InvalidKeySize)?,
            ),
            32 => CmacEngine::Aes256(
                Cmac::<Aes256>::new_from_slice(key).map_err(|_| MacError::InvalidKeySize)?,
            ),
            _ => return Err(MacError::InvalidKeySize),
        };
        self.engine = Some(engine);
        Ok(())
    }
}

impl MacState for CmacState {
    fn duplicate(&self) -> Result<Box<dyn MacState>, MacError> {
        Ok(Box::new(self.clone()))
    }

    fn reset(&mut self) -> Result<(), MacError> {
        if self.key.is_some() {
            self.rekey()
        } else {
            self.engine = None;
            Ok(())
        }
    }

    fn init(&mut self) -> Result<(), MacError> {
        if self.key.is_some() {
            self.rekey()
        } else {
            Ok(())
        }
    }

    fn update(&mut self, data: &[u8]) -> Result<(), MacError> {
        match self.engine.as_mut().ok_or(MacError::UpdateError)? {
            CmacEngine::Aes128(mac) => mac.update(data),
            CmacEngine::Aes192(mac) => mac.update(data),
            CmacEngine::Aes256(mac) => mac.update(data),
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), MacError> {
        match self.engine.as_mut().ok_or(MacError::FinishError)? {
            CmacEngine::Aes128(mac) => out.copy_from_slice(&mac.finalize_reset().into_bytes()),
            CmacEngine::Aes192(mac) => out.copy_from_slice(&mac.finalize_reset().into_bytes()),
            CmacEngine::Aes256(mac) => out.copy_from_slice(&mac.finalize_reset().into_bytes()),
        }
        Ok(())
    }

    fn size(&self) -> usize {
        CMAC_TAG_SIZE
    }

    fn control(&mut self, ctrl: MacControl<'_>) -> Result<(), MacError> {
        match ctrl {
            MacControl::SetKey(key) => {
                if !matches!(key.len(), 16 | 24 | 32) {
                    return Err(MacError::InvalidKeySize);
                }
                self.key = Some(Zeroizing::new(key.to_vec()));
                self.rekey()
            }
            _ => Err(MacError::NotSupported),
        }
    }

    fn control_str(&mut self, name: &str, value: &str) -> Result<(), MacError> {
        match name {
            "key" => self.control(MacControl::SetKey(value.as_bytes())),
            "hexkey" => {
                let bin = hex::decode(value).map_err(|_| MacError::HexDecode)?;
                self.control(MacControl::SetKey(&bin))
            }
            _ => Err(MacError::NotSupported),
        }
    }
}

#[cfg(test)]
mod tests;
