// Copyright (C) Microsoft Corporation. All rights reserved.

//! HMAC provider over the SHA-2 family.
//!
//! Wraps the RustCrypto `hmac` + `sha2` implementation behind the dispatch
//! contract. HMAC accepts keys of any length (longer-than-block keys are
//! hashed down per RFC 2104), so the set-key command never rejects a key
//! here; the running computation simply restarts under the new key.

use ::hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::*;

/// Hash function underlying an HMAC descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmacHash {
    /// SHA-256, 32-byte tags.
    Sha256,
    /// SHA-384, 48-byte tags.
    Sha384,
    /// SHA-512, 64-byte tags.
    Sha512,
}

impl HmacHash {
    /// Tag size in bytes for this hash function.
    pub fn digest_size(self) -> usize {
        match self {
            HmacHash::Sha256 => 32,
            HmacHash::Sha384 => 48,
            HmacHash::Sha512 => 64,
        }
    }
}

/// Method descriptor for HMAC over one SHA-2 hash function.
///
/// One value serves any number of contexts. Keys are installed per context
/// through the set-key control command.
pub struct HmacAlgo {
    hash: HmacHash,
}

impl HmacAlgo {
    /// Creates a descriptor for HMAC over `hash`.
    pub const fn new(hash: HmacHash) -> Self {
        Self { hash }
    }

    /// HMAC-SHA-256 descriptor.
    pub const fn sha256() -> Self {
        Self::new(HmacHash::Sha256)
    }

    /// HMAC-SHA-384 descriptor.
    pub const fn sha384() -> Self {
        Self::new(HmacHash::Sha384)
    }

    /// HMAC-SHA-512 descriptor.
    pub const fn sha512() -> Self {
        Self::new(HmacHash::Sha512)
    }
}

impl MacAlgorithm for HmacAlgo {
    fn name(&self) -> &str {
        match self.hash {
            HmacHash::Sha256 => "HMAC-SHA256",
            HmacHash::Sha384 => "HMAC-SHA384",
            HmacHash::Sha512 => "HMAC-SHA512",
        }
    }

    fn new_state(&self) -> Result<Box<dyn MacState>, MacError> {
        Ok(Box::new(HmacState {
            hash: self.hash,
            key: None,
            engine: None,
        }))
    }
}

#[derive(Clone)]
enum HmacEngine {
    Sha256(Hmac<Sha256>),
    Sha384(Hmac<Sha384>),
    Sha512(Hmac<Sha512>),
}

/// Private HMAC state: the installed key plus the running keyed engine.
///
/// The engine exists only while a key is installed; init before set-key is
/// legal and defers engine creation to the moment the key arrives.
#[derive(Clone)]
struct HmacState {
    hash: HmacHash,
    key: Option<Zeroizing<Vec<u8>>>,
    engine: Option<HmacEngine>,
}

impl HmacState {
    /// Starts a fresh computation under the installed key.
    fn rekey(&mut self) -> Result<(), MacError> {
        let key = self.key.as_ref().ok_or(MacError::InitError)?;
        let engine = match self.hash {
            HmacHash::Sha256 => HmacEngine::Sha256(
                Hmac::<Sha256>::new_from_slice(key).map_err(|_| MacError::InvalidKeySize)?,
            ),
            HmacHash::Sha384 => HmacEngine::Sha384(
                Hmac::<Sha384>::new_from_slice(key).map_err(|_| MacError::InvalidKeySize)?,
            ),
            HmacHash::Sha512 => HmacEngine::Sha512(
                Hmac::<Sha512>::new_from_slice(key).map_err(|_| MacError::InvalidKeySize)?,
            ),
        };
        self.engine = Some(engine);
        Ok(())
    }
}

impl MacState for HmacState {
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
        // Key may legally arrive after init; the engine starts then.
        if self.key.is_some() {
            self.rekey()
        } else {
            Ok(())
        }
    }

    fn update(&mut self, data: &[u8]) -> Result<(), MacError> {
        match self.engine.as_mut().ok_or(MacError::UpdateError)? {
            HmacEngine::Sha256(mac) => mac.update(data),
            HmacEngine::Sha384(mac) => mac.update(data),
            HmacEngine::Sha512(mac) => mac.update(data),
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), MacError> {
        match self.engine.as_mut().ok_or(MacError::FinishError)? {
            HmacEngine::Sha256(mac) => out.copy_from_slice(&mac.finalize_reset().into_bytes()),
            HmacEngine::Sha384(mac) => out.copy_from_slice(&mac.finalize_reset().into_bytes()),
            HmacEngine::Sha512(mac) => out.copy_from_slice(&mac.finalize_reset().into_bytes()),
        }
        Ok(())
    }

    fn size(&self) -> usize {
        self.hash.digest_size()
    }

    fn control(&mut self, ctrl: MacControl<'_>) -> Result<(), MacError> {
        match ctrl {
            MacControl::SetKey(key) => {
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
