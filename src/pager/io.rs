use super::Pager;
use crate::consts::TAG_SIZE;
use crate::crypto::envelope;
use crate::error::{MdbError, Result};
use crate::host::FatalHook;
use crate::util::ct_eq;
use std::io::{Read, Seek, SeekFrom, Write};

impl Pager {
    /// Read page `p`'s plaintext into `page_buf()`. Cache-hit when
    /// `cached_page == p` and `p != 0`.
    pub fn read_page(&mut self, p: u32, fatal: &dyn FatalHook) -> Result<()> {
        if self.cached_page == p && p != 0 {
            log::debug!("page {p}: cache hit");
            return Ok(());
        }

        self.cached_page = 0;

        let rps = self.real_page_size as usize;
        let pos = self.file_offset_of(p);

        self.file.seek(SeekFrom::Start(pos))?;
        self.file.read_exact(&mut self.io_buf[..rps + TAG_SIZE])?;

        // Shift the trailing 32-byte tag right by 8 bytes, then write the
        // little-endian file offset into the gap, forming
        // ciphertext(rps) || offset(8) || tag(32) for the HMAC check.
        self.io_buf.copy_within(rps..rps + TAG_SIZE, rps + 8);
        self.io_buf[rps..rps + 8].copy_from_slice(&pos.to_le_bytes());

        let computed = envelope::mac(&self.keys().mac_key, &self.io_buf[..rps + 8]);
        if !ct_eq(&computed, &self.io_buf[rps + 8..rps + 8 + TAG_SIZE]) {
            log::error!("page {p}: MAC mismatch, reporting Corrupt");
            return Err(MdbError::Corrupt);
        }

        let cipher_key = self.keys.cipher_key;
        envelope::decrypt(&cipher_key, &mut self.io_buf[..rps], pos, fatal);

        self.cached_page = p;
        log::debug!("page {p}: read and authenticated");
        Ok(())
    }

    /// Write `page_buf()`'s plaintext to page `p`. Always invalidates the
    /// cache first; a page that was just written is never cached.
    pub fn write_page(&mut self, p: u32, fatal: &dyn FatalHook) -> Result<()> {
        self.cached_page = 0;

        let rps = self.real_page_size as usize;
        let pos = self.file_offset_of(p);

        let cipher_key = self.keys.cipher_key;
        envelope::encrypt(&cipher_key, &mut self.io_buf[..rps], pos, fatal);

        self.io_buf[rps..rps + 8].copy_from_slice(&pos.to_le_bytes());
        let tag = envelope::mac(&self.keys().mac_key, &self.io_buf[..rps + 8]);
        self.io_buf[rps..rps + TAG_SIZE].copy_from_slice(&tag);

        self.file.seek(SeekFrom::Start(pos))?;
        self.file.write_all(&self.io_buf[..rps + TAG_SIZE])?;

        let padding = self.page_size as usize - rps - TAG_SIZE;
        if padding > 0 {
            let zeros = vec![0u8; padding];
            self.file.write_all(&zeros)?;
        }

        self.file.sync_data()?;
        log::debug!("page {p}: encrypted and written");
        Ok(())
    }
}
