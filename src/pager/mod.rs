//! Page I/O: read/write a single page with authenticate-then-decrypt /
//! encrypt-then-authenticate, backed by a one-page cache.
//!
//! Grounded on the teacher's `Pager` (`examples/artemonad-QuiverDB/src/pager/core.rs`
//! + `pager/io.rs`: a struct that owns the file handle, cache, and key
//! material together) and on `original_source/src/meagerdb.c`'s
//! `read_page`/`write_page` for the exact byte-shuffling algorithm.

mod io;

use crate::consts::TAG_SIZE;
use crate::crypto::ContentKeys;
use std::fs::File;

/// Owns the open file, the page geometry, the content keys, and the
/// single-page cache. `cached_page == 0` means the cache is invalid (page 0
/// is a journal slot and is never cached).
pub struct Pager {
    file: File,
    page_size: u32,
    real_page_size: u32,
    page_offset: u64,
    keys: ContentKeys,
    cached_page: u32,
    /// Workspace reused by both read and write: holds ciphertext, the
    /// tweak-concat offset, and the MAC tag, with room for the read path's
    /// "shift tag right by 8" maneuver. Sized to this database's actual
    /// `real_page_size`, not a global `MAX_PAGE_SIZE` bound — see DESIGN.md
    /// Open Question 5.
    io_buf: Vec<u8>,
}

impl Pager {
    pub fn new(file: File, page_size: u32, real_page_size: u32, page_offset: u64, keys: ContentKeys) -> Self {
        let io_buf = vec![0u8; real_page_size as usize + TAG_SIZE + 8];
        Self {
            file,
            page_size,
            real_page_size,
            page_offset,
            keys,
            cached_page: 0,
            io_buf,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn real_page_size(&self) -> u32 {
        self.real_page_size
    }

    pub fn page_offset(&self) -> u64 {
        self.page_offset
    }

    pub fn file_offset_of(&self, page: u32) -> u64 {
        self.page_offset + page as u64 * self.page_size as u64
    }

    /// The current page's plaintext, valid after `read_page` or as the
    /// staging area before `write_page`.
    pub fn page_buf(&self) -> &[u8] {
        &self.io_buf[..self.real_page_size as usize]
    }

    pub fn page_buf_mut(&mut self) -> &mut [u8] {
        &mut self.io_buf[..self.real_page_size as usize]
    }

    pub fn keys(&self) -> &ContentKeys {
        &self.keys
    }
}
