//! Crypto envelope: block-wise encrypt/decrypt with a per-block tweak, MAC,
//! hash, and PBKDF2 key derivation.
//!
//! Grounded on `original_source/src/ciphers.c` (`mdbc_encrypt`/`_decrypt`
//! tweak construction and fatal-on-misalignment behavior) and spec §4.1.
//! `sha2`/`hmac` are the teacher's own dependencies; `pbkdf2` is added as the
//! natural RustCrypto sibling of those two, not a new stack.

use crate::consts::BLOCK_SIZE;
use crate::crypto::threefish;
use crate::host::FatalHook;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

fn block_tweak(location: u64, block_num: u32) -> [u8; 16] {
    let mut tweak = [0u8; 16];
    tweak[0..8].copy_from_slice(&location.to_le_bytes());
    tweak[8..12].copy_from_slice(&block_num.to_le_bytes());
    tweak
}

/// Encrypt `buf` in place. `location` is the absolute file byte offset at
/// which `buf` begins; it seeds the tweak, and the block index within `buf`
/// restarts at 0 for every call. `buf.len()` must be a multiple of 64.
pub fn encrypt(cipher_key: &[u8; 64], buf: &mut [u8], location: u64, fatal: &dyn FatalHook) {
    if buf.len() % BLOCK_SIZE != 0 {
        fatal.fatal("encrypt: length not a multiple of the block size");
    }

    let mut block_num: u32 = 0;
    for chunk_start in (0..buf.len()).step_by(BLOCK_SIZE) {
        let tweak = block_tweak(location, block_num);
        let src: [u8; 64] = buf[chunk_start..chunk_start + BLOCK_SIZE].try_into().unwrap();
        let mut dst = [0u8; 64];
        threefish::encrypt_block(&mut dst, cipher_key, &tweak, &src);
        buf[chunk_start..chunk_start + BLOCK_SIZE].copy_from_slice(&dst);
        block_num += 1;
    }
}

/// Decrypt `buf` in place; mirrors `encrypt`.
pub fn decrypt(cipher_key: &[u8; 64], buf: &mut [u8], location: u64, fatal: &dyn FatalHook) {
    if buf.len() % BLOCK_SIZE != 0 {
        fatal.fatal("decrypt: length not a multiple of the block size");
    }

    let mut block_num: u32 = 0;
    for chunk_start in (0..buf.len()).step_by(BLOCK_SIZE) {
        let tweak = block_tweak(location, block_num);
        let src: [u8; 64] = buf[chunk_start..chunk_start + BLOCK_SIZE].try_into().unwrap();
        let mut dst = [0u8; 64];
        threefish::decrypt_block(&mut dst, cipher_key, &tweak, &src);
        buf[chunk_start..chunk_start + BLOCK_SIZE].copy_from_slice(&dst);
        block_num += 1;
    }
}

/// HMAC-SHA-256 over `data` using the MAC key; 32-byte output.
pub fn mac(mac_key: &[u8; 64], data: &[u8]) -> [u8; 32] {
    let mut m = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
    m.update(data);
    m.finalize().into_bytes().into()
}

/// SHA-256 over `data`; 32-byte output.
pub fn hash(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// PBKDF2-HMAC-SHA-256. `params` is the 32-byte on-disk KDF-params blob; the
/// iteration count is its first 8 little-endian bytes. An iteration count
/// that doesn't fit a u32 is a fatal precondition per spec §4.1.
pub fn kdf(password: &[u8], salt: &[u8], params: &[u8; 32], out_len: usize, fatal: &dyn FatalHook) -> Vec<u8> {
    let iterations = u64::from_le_bytes(params[0..8].try_into().unwrap());
    if iterations > u32::MAX as u64 {
        fatal.fatal("kdf: iteration count exceeds 2^32");
    }

    let mut out = vec![0u8; out_len];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations as u32, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AbortHook;

    #[test]
    fn encrypt_decrypt_roundtrip_multi_block() {
        let key = [7u8; 64];
        let mut buf = vec![0u8; 192];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = i as u8;
        }
        let original = buf.clone();

        encrypt(&key, &mut buf, 512, &AbortHook);
        assert_ne!(buf, original);

        decrypt(&key, &mut buf, 512, &AbortHook);
        assert_eq!(buf, original);
    }

    #[test]
    fn kdf_is_deterministic() {
        let params = {
            let mut p = [0u8; 32];
            p[0..8].copy_from_slice(&1000u64.to_le_bytes());
            p
        };
        let a = kdf(b"pw", b"salt-bytes-here-salt-bytes-here", &params, 128, &AbortHook);
        let b = kdf(b"pw", b"salt-bytes-here-salt-bytes-here", &params, 128, &AbortHook);
        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
    }
}
