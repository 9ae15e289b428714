//! Cryptographic primitives and the key material they operate on.
//!
//! `ContentKeys`/`DerivedKeys` mirror the teacher's `KeyMaterial` (zeroized
//! secret wrapper, `examples/artemonad-QuiverDB/src/crypto/mod.rs`); the
//! cipher suite itself is modeled as free functions in `envelope` rather
//! than a capability-object trait, since the engine only ever instantiates
//! one concrete suite (see `DESIGN.md`, Open Question 4).

pub mod envelope;
pub mod threefish;

use crate::consts::{CIPHER_KEY_SIZE, MAC_KEY_SIZE};
use zeroize::Zeroize;

/// The 128-byte (cipher key, MAC key) pair stored encrypted in the
/// parameters block and used for all page I/O.
pub struct ContentKeys {
    pub cipher_key: [u8; CIPHER_KEY_SIZE],
    pub mac_key: [u8; MAC_KEY_SIZE],
}

impl ContentKeys {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), CIPHER_KEY_SIZE + MAC_KEY_SIZE);
        let mut cipher_key = [0u8; CIPHER_KEY_SIZE];
        let mut mac_key = [0u8; MAC_KEY_SIZE];
        cipher_key.copy_from_slice(&bytes[..CIPHER_KEY_SIZE]);
        mac_key.copy_from_slice(&bytes[CIPHER_KEY_SIZE..]);
        Self { cipher_key, mac_key }
    }
}

impl Drop for ContentKeys {
    fn drop(&mut self) {
        self.cipher_key.zeroize();
        self.mac_key.zeroize();
    }
}

/// The 128-byte PBKDF2 output used to unlock content keys and authenticate
/// the header/params block. Same shape as `ContentKeys`, kept as a distinct
/// type so the two can't be mixed up at a call site.
pub struct DerivedKeys {
    pub cipher_key: [u8; CIPHER_KEY_SIZE],
    pub mac_key: [u8; MAC_KEY_SIZE],
}

impl DerivedKeys {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), CIPHER_KEY_SIZE + MAC_KEY_SIZE);
        let mut cipher_key = [0u8; CIPHER_KEY_SIZE];
        let mut mac_key = [0u8; MAC_KEY_SIZE];
        cipher_key.copy_from_slice(&bytes[..CIPHER_KEY_SIZE]);
        mac_key.copy_from_slice(&bytes[CIPHER_KEY_SIZE..]);
        Self { cipher_key, mac_key }
    }
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.cipher_key.zeroize();
        self.mac_key.zeroize();
    }
}
