//! Key/value layer: packs fixed-size-key, variable-length-value records into
//! a single row's payload.
//!
//! Grounded on `original_source/src/keyvalue.c` (`mdbk_update`,
//! `mdbk_get_value`, `mdbk_read_key`, `mdbk_get_uint32`). Record layout is
//! `[key(8)][valuelen(4)][value(valuelen)]`, terminated by an all-zero key.
//! A `value == None` update writes a zero-length record (key present,
//! `valuelen == 0`) rather than dropping the key entirely — the choice the
//! specification calls out as the normative reading of an otherwise
//! underspecified "delete" (see `DESIGN.md`).

use crate::consts::{KV_KEY_LEN, KV_RECORD_HEADER_LEN};
use crate::db::Db;
use crate::error::{MdbError, Result};
use crate::util::{read_u32_le, write_u32_le};

/// One entry in a `kv_update` batch. `value: None` clears the key (writes a
/// zero-length record); `value: Some(v)` sets or replaces it.
pub struct KvUpdate<'a> {
    pub key: [u8; KV_KEY_LEN],
    pub value: Option<&'a [u8]>,
}

fn is_empty_key(key: &[u8]) -> bool {
    key.iter().all(|&b| b == 0)
}

impl Db {
    pub fn kv_update(&mut self, updates: &[KvUpdate]) -> Result<()> {
        for u in updates {
            if is_empty_key(&u.key) {
                return Err(MdbError::BadArgument);
            }
        }

        let mut total_len: u64 = 0;
        for u in updates {
            let entry_len = KV_RECORD_HEADER_LEN as u64 + u.value.map_or(0, |v| v.len()) as u64;
            total_len = total_len.checked_add(entry_len).ok_or(MdbError::DataTooBig)?;
        }

        // Second pass: walk the existing row, adding the length of every
        // record whose key is not being overwritten.
        let mut offset: u32 = 0;
        loop {
            let mut hdr = [0u8; KV_RECORD_HEADER_LEN];
            self.read_value(&mut hdr, offset)?;

            if is_empty_key(&hdr[..KV_KEY_LEN]) {
                total_len = total_len.checked_add(KV_RECORD_HEADER_LEN as u64).ok_or(MdbError::DataTooBig)?;
                break;
            }

            let valuelen = read_u32_le(&hdr[KV_KEY_LEN..KV_RECORD_HEADER_LEN]);
            let record_len = (valuelen as u64)
                .checked_add(KV_RECORD_HEADER_LEN as u64)
                .ok_or(MdbError::Corrupt)?;

            offset = offset.checked_add(record_len as u32).ok_or(MdbError::Corrupt)?;

            let overwritten = updates.iter().any(|u| u.key == hdr[..KV_KEY_LEN]);
            if !overwritten {
                total_len = total_len.checked_add(record_len).ok_or(MdbError::DataTooBig)?;
            }
        }

        if total_len > u32::MAX as u64 {
            return Err(MdbError::DataTooBig);
        }

        self.update_begin(total_len as u32)?;

        for u in updates {
            let mut hdr = [0u8; KV_RECORD_HEADER_LEN];
            hdr[..KV_KEY_LEN].copy_from_slice(&u.key);
            write_u32_le(&mut hdr[KV_KEY_LEN..], u.value.map_or(0, |v| v.len() as u32));
            self.update_continue(&hdr)?;

            if let Some(v) = u.value {
                self.update_continue(v)?;
            }
        }

        let mut offset: u32 = 0;
        loop {
            let mut hdr = [0u8; KV_RECORD_HEADER_LEN];
            self.read_value(&mut hdr, offset)?;

            if is_empty_key(&hdr[..KV_KEY_LEN]) {
                self.update_continue(&hdr)?;
                break;
            }

            let valuelen = read_u32_le(&hdr[KV_KEY_LEN..KV_RECORD_HEADER_LEN]);
            let record_len = valuelen
                .checked_add(KV_RECORD_HEADER_LEN as u32)
                .ok_or(MdbError::Corrupt)?;

            let overwritten = updates.iter().any(|u| u.key == hdr[..KV_KEY_LEN]);
            if overwritten {
                offset = offset.checked_add(record_len).ok_or(MdbError::Corrupt)?;
                continue;
            }

            let mut remaining = record_len;
            let mut chunk = [0u8; 256];
            while remaining > 0 {
                let l = remaining.min(chunk.len() as u32);
                self.read_value(&mut chunk[..l as usize], offset)?;
                self.update_continue(&chunk[..l as usize])?;
                offset += l;
                remaining -= l;
            }
        }

        self.update_finalize()
    }

    /// Returns the value's length. With `dst` present, also copies it; a hit
    /// shorter than `maxlen` still copies only the actual `valuelen` bytes.
    pub fn kv_get_value(&mut self, key: &[u8; KV_KEY_LEN], dst: Option<&mut [u8]>, maxlen: u32) -> Result<u32> {
        let mut offset: u32 = 0;
        loop {
            let mut hdr = [0u8; KV_RECORD_HEADER_LEN];
            self.read_value(&mut hdr, offset)?;

            if is_empty_key(&hdr[..KV_KEY_LEN]) {
                return Ok(0);
            }

            let valuelen = read_u32_le(&hdr[KV_KEY_LEN..KV_RECORD_HEADER_LEN]);
            let value_offset = offset.checked_add(KV_RECORD_HEADER_LEN as u32).ok_or(MdbError::Corrupt)?;

            if hdr[..KV_KEY_LEN] == *key {
                if let Some(dst) = dst {
                    if valuelen > maxlen {
                        return Err(MdbError::DataTooBig);
                    }
                    self.read_value(&mut dst[..valuelen as usize], value_offset)?;
                }
                return Ok(valuelen);
            }

            offset = value_offset.checked_add(valuelen).ok_or(MdbError::Corrupt)?;
        }
    }

    /// Returns the `idx`-th key in iteration order, or `NotFound`.
    pub fn kv_read_key(&mut self, idx: u32) -> Result<[u8; KV_KEY_LEN]> {
        let mut offset: u32 = 0;
        let mut current_idx: u32 = 0;
        loop {
            let mut hdr = [0u8; KV_RECORD_HEADER_LEN];
            self.read_value(&mut hdr, offset)?;

            if is_empty_key(&hdr[..KV_KEY_LEN]) {
                return Err(MdbError::NotFound);
            }

            let valuelen = read_u32_le(&hdr[KV_KEY_LEN..KV_RECORD_HEADER_LEN]);
            offset = offset
                .checked_add(KV_RECORD_HEADER_LEN as u32)
                .and_then(|o| o.checked_add(valuelen))
                .ok_or(MdbError::Corrupt)?;

            if current_idx == idx {
                let mut key = [0u8; KV_KEY_LEN];
                key.copy_from_slice(&hdr[..KV_KEY_LEN]);
                return Ok(key);
            }
            current_idx += 1;
        }
    }

    pub fn kv_get_uint32(&mut self, key: &[u8; KV_KEY_LEN]) -> Result<u32> {
        let mut buf = [0u8; 4];
        let len = self.kv_get_value(key, Some(&mut buf), 4)?;
        if len != 4 {
            return Err(MdbError::BadType);
        }
        Ok(read_u32_le(&buf))
    }
}
