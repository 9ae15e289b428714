//! File creation and unlock: header, the two alternate encryption-parameters
//! blocks, and deriving/decrypting the content keys.
//!
//! Grounded on `original_source/src/meagerdb.c` (`mdb_create`/`mdb_open`),
//! generalized to spec §3's redesign: a physical, validated `page_size`
//! distinct from the usable `real_page_size`, a standalone header hash, and
//! two alternate parameters blocks each with their own integrity hash
//! (see `DESIGN.md` for the exact byte-layout reconciliation).

use crate::config::MdbConfig;
use crate::consts::*;
use crate::crypto::envelope;
use crate::crypto::{ContentKeys, DerivedKeys};
use crate::error::{MdbError, Result};
use crate::host::{FatalHook, RandomSource};
use crate::journal::{cleanup_journal, set_journal};
use crate::pager::Pager;
use crate::util::{ct_eq, read_u32_le, round_up_u64, write_u16_le, write_u32_le, write_u64_le};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use zeroize::{Zeroize, Zeroizing};

fn real_page_size_of(page_size: u32) -> u32 {
    ((page_size - 32) / BLOCK_SIZE as u32) * BLOCK_SIZE as u32
}

fn write_zeros(file: &mut File, mut len: u64) -> std::io::Result<()> {
    let chunk = vec![0u8; 4096];
    while len > 0 {
        let n = len.min(chunk.len() as u64) as usize;
        file.write_all(&chunk[..n])?;
        len -= n as u64;
    }
    Ok(())
}

fn pad_name(name: &str, size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    let bytes = name.as_bytes();
    debug_assert!(bytes.len() <= size);
    buf[..bytes.len()].copy_from_slice(bytes);
    buf
}

pub fn create(path: &Path, password: &[u8], cfg: &MdbConfig, rand: &dyn RandomSource, fatal: &dyn FatalHook) -> Result<()> {
    let page_size = cfg.page_size;
    let iterations = cfg.iterations;
    if page_size < MIN_PAGE_SIZE || (page_size - 32) < MIN_REAL_PAGE_SIZE {
        return Err(MdbError::BadPageSize);
    }
    if page_size > cfg.max_page_size {
        return Err(MdbError::UnsupportedPageSize);
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|_| MdbError::Open)?;

    let real_page_size = real_page_size_of(page_size);
    let header_region_size = round_up_u64(HEADER_SIZE as u64, page_size as u64, fatal);
    let params_block_size = round_up_u64(PARAMS_SIZE as u64, page_size as u64, fatal);
    let page_offset = header_region_size + 2 * params_block_size;

    let mut db_id = [0u8; HEADER_DBID_SIZE];
    rand.fill(&mut db_id);

    let mut cipher_key = [0u8; CIPHER_KEY_SIZE];
    let mut mac_key = [0u8; MAC_KEY_SIZE];
    rand.fill(&mut cipher_key);
    rand.fill(&mut mac_key);

    // ----- Header -----
    let mut header = vec![0u8; HEADER_SIZE];
    header[HEADER_MAGIC_OFF..HEADER_MAGIC_OFF + 8].copy_from_slice(MAGIC);
    write_u16_le(&mut header[HEADER_VERSION_OFF..HEADER_VERSION_OFF + 2], VERSION);
    write_u32_le(&mut header[HEADER_PAGE_SIZE_OFF..HEADER_PAGE_SIZE_OFF + 4], page_size);
    header[HEADER_DBID_OFF..HEADER_DBID_OFF + HEADER_DBID_SIZE].copy_from_slice(&db_id);
    let suite_name = pad_name(CIPHER_SUITE_NAME, HEADER_CIPHER_NAME_SIZE);
    header[HEADER_CIPHER_NAME_OFF..HEADER_CIPHER_NAME_OFF + HEADER_CIPHER_NAME_SIZE].copy_from_slice(&suite_name);
    let header_hash = envelope::hash(&header[..HEADER_HASH_OFF]);
    header[HEADER_HASH_OFF..HEADER_HASH_OFF + HEADER_HASH_SIZE].copy_from_slice(&header_hash);

    file.seek(SeekFrom::Start(0))?;
    file.write_all(&header)?;
    write_zeros(&mut file, header_region_size - HEADER_SIZE as u64)?;

    // ----- Params block 0 (live) -----
    let mut salt = [0u8; SALT_SIZE];
    rand.fill(&mut salt);

    let mut kdf_params = [0u8; KDF_PARAMS_SIZE];
    write_u64_le(&mut kdf_params[0..8], iterations);

    let derived_bytes = Zeroizing::new(envelope::kdf(password, &salt, &kdf_params, CONTENT_KEYS_SIZE, fatal));
    let derived = DerivedKeys::from_bytes(&derived_bytes);

    let content_keys_location = header_region_size + PARAMS_CONTENT_KEYS_OFF as u64;
    let mut content_keys_ct = [0u8; CONTENT_KEYS_SIZE];
    content_keys_ct[..CIPHER_KEY_SIZE].copy_from_slice(&cipher_key);
    content_keys_ct[CIPHER_KEY_SIZE..].copy_from_slice(&mac_key);
    envelope::encrypt(&derived.cipher_key, &mut content_keys_ct, content_keys_location, fatal);

    let mut params = vec![0u8; PARAMS_SIZE];
    params[PARAMS_SALT_OFF..PARAMS_SALT_OFF + SALT_SIZE].copy_from_slice(&salt);
    let kdf_name = pad_name(KDF_NAME, 32);
    params[PARAMS_KDF_NAME_OFF..PARAMS_KDF_NAME_OFF + 32].copy_from_slice(&kdf_name);
    params[PARAMS_KDF_PARAMS_OFF..PARAMS_KDF_PARAMS_OFF + KDF_PARAMS_SIZE].copy_from_slice(&kdf_params);
    params[PARAMS_CONTENT_KEYS_OFF..PARAMS_CONTENT_KEYS_OFF + CONTENT_KEYS_SIZE].copy_from_slice(&content_keys_ct);
    content_keys_ct.zeroize();

    let mut mac_input = Vec::with_capacity(HEADER_HASH_SIZE + PARAMS_HASH_COVERAGE);
    mac_input.extend_from_slice(&header_hash);
    mac_input.extend_from_slice(&params[..PARAMS_HASH_COVERAGE]);
    let mac_tag = envelope::mac(&derived.mac_key, &mac_input);
    params[PARAMS_MAC_OFF..PARAMS_MAC_OFF + TAG_SIZE].copy_from_slice(&mac_tag);

    let params_hash = envelope::hash(&params[..PARAMS_HASH_COVERAGE]);
    params[PARAMS_HASH_OFF..PARAMS_HASH_OFF + TAG_SIZE].copy_from_slice(&params_hash);

    file.seek(SeekFrom::Start(header_region_size))?;
    file.write_all(&params)?;
    write_zeros(&mut file, params_block_size - PARAMS_SIZE as u64)?;

    // ----- Params block 1 (blank) -----
    write_zeros(&mut file, params_block_size)?;

    drop(derived);

    // ----- Journal slots + terminator -----
    // Built from the still-plaintext arrays, not `content_keys_ct` (which
    // `envelope::encrypt` above turned into ciphertext for on-disk storage).
    let content_keys = ContentKeys { cipher_key, mac_key };
    cipher_key.zeroize();
    mac_key.zeroize();
    let mut pager = Pager::new(file, page_size, real_page_size, page_offset, content_keys);

    set_journal(&mut pager, JOURNAL_SLOT_0, 0, 0, fatal)?;
    set_journal(&mut pager, JOURNAL_SLOT_1, 0, 0, fatal)?;

    pager.page_buf_mut().fill(0);
    pager.write_page(FIRST_PAGE, fatal)?;

    Ok(())
}

pub fn open(path: &Path, password: &[u8], cfg: &MdbConfig, fatal: &dyn FatalHook) -> Result<Pager> {
    let mut file = OpenOptions::new().read(true).write(true).open(path).map_err(|_| MdbError::Open)?;

    let mut header = vec![0u8; HEADER_SIZE];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut header)?;

    if &header[HEADER_MAGIC_OFF..HEADER_MAGIC_OFF + 8] != MAGIC {
        return Err(MdbError::NotMdb);
    }

    let version = crate::util::read_u16_le(&header[HEADER_VERSION_OFF..HEADER_VERSION_OFF + 2]);
    if version != VERSION {
        return Err(MdbError::BadVersion);
    }

    let page_size = read_u32_le(&header[HEADER_PAGE_SIZE_OFF..HEADER_PAGE_SIZE_OFF + 4]);
    if page_size % BLOCK_SIZE as u32 != 0 || page_size < MIN_PAGE_SIZE || (page_size - 32) < MIN_REAL_PAGE_SIZE {
        return Err(MdbError::BadPageSize);
    }
    if page_size > cfg.max_page_size {
        return Err(MdbError::UnsupportedPageSize);
    }

    let suite_name = &header[HEADER_CIPHER_NAME_OFF..HEADER_CIPHER_NAME_OFF + HEADER_CIPHER_NAME_SIZE];
    let expected_suite = pad_name(CIPHER_SUITE_NAME, HEADER_CIPHER_NAME_SIZE);
    if suite_name != expected_suite.as_slice() {
        return Err(MdbError::UnsupportedCipher);
    }

    let header_hash = envelope::hash(&header[..HEADER_HASH_OFF]);
    if !ct_eq(&header_hash, &header[HEADER_HASH_OFF..HEADER_HASH_OFF + HEADER_HASH_SIZE]) {
        return Err(MdbError::Corrupt);
    }

    let real_page_size = real_page_size_of(page_size);
    let header_region_size = round_up_u64(HEADER_SIZE as u64, page_size as u64, fatal);
    let params_block_size = round_up_u64(PARAMS_SIZE as u64, page_size as u64, fatal);
    let page_offset = header_region_size + 2 * params_block_size;

    let mut params = vec![0u8; PARAMS_SIZE];
    let mut params_offset = header_region_size;

    let read_and_check = |file: &mut File, offset: u64, buf: &mut [u8]| -> Result<bool> {
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        let computed = envelope::hash(&buf[..PARAMS_HASH_COVERAGE]);
        Ok(ct_eq(&computed, &buf[PARAMS_HASH_OFF..PARAMS_HASH_OFF + TAG_SIZE]))
    };

    if !read_and_check(&mut file, params_offset, &mut params)? {
        params_offset = header_region_size + params_block_size;
        if !read_and_check(&mut file, params_offset, &mut params)? {
            return Err(MdbError::Corrupt);
        }
    }

    let kdf_name = &params[PARAMS_KDF_NAME_OFF..PARAMS_KDF_NAME_OFF + 32];
    let expected_kdf = pad_name(KDF_NAME, 32);
    if kdf_name != expected_kdf.as_slice() {
        return Err(MdbError::BadKeyDerive);
    }

    let salt = &params[PARAMS_SALT_OFF..PARAMS_SALT_OFF + SALT_SIZE];
    let kdf_params: [u8; KDF_PARAMS_SIZE] =
        params[PARAMS_KDF_PARAMS_OFF..PARAMS_KDF_PARAMS_OFF + KDF_PARAMS_SIZE].try_into().unwrap();

    let derived_bytes = Zeroizing::new(envelope::kdf(password, salt, &kdf_params, CONTENT_KEYS_SIZE, fatal));
    let derived = DerivedKeys::from_bytes(&derived_bytes);

    let mut mac_input = Vec::with_capacity(HEADER_HASH_SIZE + PARAMS_HASH_COVERAGE);
    mac_input.extend_from_slice(&header_hash);
    mac_input.extend_from_slice(&params[..PARAMS_HASH_COVERAGE]);
    let computed_mac = envelope::mac(&derived.mac_key, &mac_input);

    if !ct_eq(&computed_mac, &params[PARAMS_MAC_OFF..PARAMS_MAC_OFF + TAG_SIZE]) {
        return Err(MdbError::BadPassword);
    }

    let content_keys_location = params_offset + PARAMS_CONTENT_KEYS_OFF as u64;
    let mut content_keys_buf: [u8; CONTENT_KEYS_SIZE] =
        params[PARAMS_CONTENT_KEYS_OFF..PARAMS_CONTENT_KEYS_OFF + CONTENT_KEYS_SIZE].try_into().unwrap();
    envelope::decrypt(&derived.cipher_key, &mut content_keys_buf, content_keys_location, fatal);

    let content_keys = ContentKeys::from_bytes(&content_keys_buf);
    content_keys_buf.zeroize();
    drop(derived);

    let mut pager = Pager::new(file, page_size, real_page_size, page_offset, content_keys);
    cleanup_journal(&mut pager, fatal)?;

    Ok(pager)
}
