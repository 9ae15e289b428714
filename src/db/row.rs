//! Row lifecycle: insert/update/delete state machines, walk/select, and
//! value reads.
//!
//! Grounded on `original_source/src/meagerdb.c` (`mdb_insert_*`,
//! `mdb_update_*`, `mdb_delete`, `mdb_walk`, `mdb_select_by_*`,
//! `mdb_get_*`, `mdb_read_value`), translated from the original's single
//! static `g_database` to `Db`'s instance fields and from its `page_size`
//! stride (which in the original has no separate physical/usable split) to
//! `real_page_size` per spec §3/§4.6.

use super::core::Db;
use crate::alloc::find_empty_row;
use crate::consts::*;
use crate::error::{MdbError, Result};
use crate::journal::{cleanup_journal, set_journal};
use crate::util::{ceil_div_u32, read_u32_le, write_u32_le};

impl Db {
    fn real_page_size(&self) -> u32 {
        self.pager.real_page_size()
    }

    // ----- Insert -----

    /// Begin inserting a row. Returns the freshly assigned rowid.
    pub fn insert_begin(&mut self, table: u8, valuelen: u32) -> Result<u32> {
        if valuelen.checked_add(ROW_HEADER_SIZE as u32).is_none() {
            return Err(MdbError::DataTooBig);
        }
        if self.insert_page != 0 {
            return Err(MdbError::Busy);
        }

        let rowid = self.next_rowid(table)?;
        let page_count = (ceil_div_u32(valuelen + ROW_HEADER_SIZE as u32, self.real_page_size())).max(1);

        let fatal = self.fatal.as_ref();
        let page_start = find_empty_row(&mut self.pager, page_count, fatal)?;

        {
            let buf = self.pager.page_buf_mut();
            buf.fill(0);
            write_row_header(buf, page_count, rowid, table, valuelen);
        }
        self.pager.write_page(page_start, fatal)?;

        self.insert_page = page_start;
        self.insert_page_count = page_count;
        self.insert_offset = ROW_HEADER_SIZE as u32;

        Ok(rowid)
    }

    /// Stream `data` into the row opened by `insert_begin`/`update_begin`.
    pub fn insert_continue(&mut self, mut data: &[u8]) -> Result<()> {
        if self.insert_page < FIRST_PAGE || self.insert_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let rps = self.real_page_size();
        let fatal = self.fatal.as_ref();

        while !data.is_empty() {
            let page = self.insert_offset / rps;
            let page_offset = self.insert_offset - page * rps;
            let available = rps - page_offset;
            let l = data.len().min(available as usize);

            if page >= self.insert_page_count {
                fatal.fatal("insert_continue: write past end of allocated row");
            }

            self.pager.read_page(self.insert_page + page, fatal)?;
            self.pager.page_buf_mut()[page_offset as usize..page_offset as usize + l].copy_from_slice(&data[..l]);
            self.pager.write_page(self.insert_page + page, fatal)?;

            data = &data[l..];
            self.insert_offset += l as u32;
        }

        Ok(())
    }

    /// Close journal slot 0 and make the inserted run the selected row.
    pub fn insert_finalize(&mut self) -> Result<()> {
        if self.insert_page < FIRST_PAGE || self.insert_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let fatal = self.fatal.as_ref();
        set_journal(&mut self.pager, JOURNAL_SLOT_0, 0, 0, fatal)?;

        self.selected_page = self.insert_page;
        self.selected_page_count = self.insert_page_count;
        self.insert_page = 0;
        self.insert_page_count = 0;

        Ok(())
    }

    pub fn insert(&mut self, table: u8, value: &[u8]) -> Result<u32> {
        let rowid = self.insert_begin(table, value.len() as u32)?;
        self.insert_continue(value)?;
        self.insert_finalize()?;
        Ok(rowid)
    }

    // ----- Update (copy-on-write, then journal-swap the old run) -----

    pub fn update_begin(&mut self, valuelen: u32) -> Result<()> {
        let (table, rowid) = self.get_rowid()?;

        self.update_page = self.selected_page;
        self.update_page_count = self.selected_page_count;

        self.insert_begin(table, valuelen)?;

        // insert_begin assigned a fresh rowid; this is a replacement, so the
        // header gets the original row's rowid instead.
        let insert_page = self.insert_page;
        let insert_page_count = self.insert_page_count;
        let fatal = self.fatal.as_ref();
        {
            let buf = self.pager.page_buf_mut();
            buf.fill(0);
            write_row_header(buf, insert_page_count, rowid, table, valuelen);
        }
        self.pager.write_page(insert_page, fatal)?;

        Ok(())
    }

    pub fn update_continue(&mut self, data: &[u8]) -> Result<()> {
        self.insert_continue(data)
    }

    pub fn update_finalize(&mut self) -> Result<()> {
        if self.update_page < FIRST_PAGE || self.update_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }
        if self.insert_page < FIRST_PAGE || self.insert_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let fatal = self.fatal.as_ref();
        set_journal(&mut self.pager, JOURNAL_SLOT_1, self.update_page, self.update_page_count, fatal)?;
        cleanup_journal(&mut self.pager, fatal)?;

        if self.selected_page == self.update_page {
            self.selected_page = self.insert_page;
            self.selected_page_count = self.insert_page_count;
        }

        self.update_page = 0;
        self.update_page_count = 0;
        self.insert_page = 0;
        self.insert_page_count = 0;

        Ok(())
    }

    pub fn update(&mut self, value: &[u8]) -> Result<()> {
        self.update_begin(value.len() as u32)?;
        self.update_continue(value)?;
        self.update_finalize()
    }

    // ----- Delete -----

    pub fn delete(&mut self) -> Result<()> {
        if self.insert_page != 0 || self.update_page != 0 {
            return Err(MdbError::Busy);
        }
        if self.selected_page < FIRST_PAGE || self.selected_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let fatal = self.fatal.as_ref();
        set_journal(&mut self.pager, JOURNAL_SLOT_0, self.selected_page, self.selected_page_count, fatal)?;
        cleanup_journal(&mut self.pager, fatal)?;

        self.selected_page = 0;
        self.selected_page_count = 0;

        Ok(())
    }

    // ----- Walk / select -----

    /// Advance the cursor. `Ok(true)` means a live row of `table` is now
    /// selected; `Ok(false)` means the end of the file was reached.
    pub fn walk(&mut self, table: u8, restart: bool) -> Result<bool> {
        if restart {
            self.selected_page = FIRST_PAGE;
        } else {
            self.selected_page =
                self.selected_page.checked_add(self.selected_page_count).ok_or(MdbError::Corrupt)?;
        }

        let fatal = self.fatal.as_ref();
        loop {
            self.pager.read_page(self.selected_page, fatal)?;
            let page_count = read_u32_le(&self.pager.page_buf()[ROW_PAGE_COUNT_OFF..ROW_PAGE_COUNT_OFF + 4]);
            let rowid = read_u32_le(&self.pager.page_buf()[ROW_ROWID_OFF..ROW_ROWID_OFF + 4]);
            let tableid = self.pager.page_buf()[ROW_TABLEID_OFF];

            self.selected_page_count = page_count;

            if page_count == 0 {
                self.selected_page = 0;
                self.selected_page_count = 0;
                return Ok(false);
            }

            if rowid > 0 && tableid == table {
                return Ok(true);
            }

            self.selected_page = self.selected_page.checked_add(page_count).ok_or(MdbError::Corrupt)?;
        }
    }

    pub fn select_by_rowid(&mut self, table: u8, rowid: u32) -> Result<()> {
        let mut current_rowid = 0u32;
        loop {
            if !self.walk(table, current_rowid == 0)? {
                return Err(MdbError::RowNotFound);
            }

            let (_, found_rowid) = self.get_rowid()?;
            if found_rowid == 0 {
                return Err(MdbError::Corrupt);
            }
            current_rowid = found_rowid;

            if current_rowid == rowid {
                return Ok(());
            }
        }
    }

    pub fn select_by_page(&mut self, page: u32) -> Result<()> {
        if page < FIRST_PAGE {
            return Err(MdbError::BadArgument);
        }

        let fatal = self.fatal.as_ref();
        self.pager.read_page(page, fatal)?;
        let page_count = read_u32_le(&self.pager.page_buf()[ROW_PAGE_COUNT_OFF..ROW_PAGE_COUNT_OFF + 4]);

        if page_count == 0 {
            return Err(MdbError::RowNotFound);
        }

        self.selected_page = page;
        self.selected_page_count = page_count;
        Ok(())
    }

    pub fn get_rowid(&mut self) -> Result<(u8, u32)> {
        if self.selected_page < FIRST_PAGE || self.selected_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let fatal = self.fatal.as_ref();
        self.pager.read_page(self.selected_page, fatal)?;
        let table = self.pager.page_buf()[ROW_TABLEID_OFF];
        let rowid = read_u32_le(&self.pager.page_buf()[ROW_ROWID_OFF..ROW_ROWID_OFF + 4]);
        Ok((table, rowid))
    }

    pub fn get_page(&self) -> Result<u32> {
        if self.selected_page < FIRST_PAGE || self.selected_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }
        Ok(self.selected_page)
    }

    /// The number of contiguous pages backing the selected row.
    pub fn get_page_count(&self) -> Result<u32> {
        if self.selected_page < FIRST_PAGE || self.selected_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }
        Ok(self.selected_page_count)
    }

    /// Walk the whole table tracking the largest live rowid, preserving the
    /// caller's current selection across the scan.
    pub fn next_rowid(&mut self, table: u8) -> Result<u32> {
        let saved_page = self.selected_page;
        let saved_count = self.selected_page_count;

        let mut max_rowid = 0u32;
        loop {
            if !self.walk(table, max_rowid == 0)? {
                break;
            }
            let (_, rowid) = self.get_rowid()?;
            if rowid == 0 {
                return Err(MdbError::Corrupt);
            }
            max_rowid = max_rowid.max(rowid);
        }

        self.selected_page = saved_page;
        self.selected_page_count = saved_count;

        if max_rowid == u32::MAX {
            return Err(MdbError::Full);
        }

        Ok(max_rowid + 1)
    }

    // ----- Value reads -----

    pub fn read_value(&mut self, dst: &mut [u8], offset: u32) -> Result<()> {
        if self.selected_page < FIRST_PAGE || self.selected_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let rps = self.real_page_size();
        let datalen = self.selected_page_count as u64 * rps as u64;
        let mut real_offset = offset as u64 + ROW_HEADER_SIZE as u64;
        let fatal = self.fatal.as_ref();

        let mut written = 0usize;
        while written < dst.len() {
            if real_offset >= datalen {
                return Err(MdbError::NotEnoughData);
            }

            let page = (real_offset / rps as u64) as u32;
            let page_offset = (real_offset - page as u64 * rps as u64) as u32;
            let maxlen = rps - page_offset;
            let l = (dst.len() - written).min(maxlen as usize);

            self.pager.read_page(self.selected_page + page, fatal)?;
            dst[written..written + l]
                .copy_from_slice(&self.pager.page_buf()[page_offset as usize..page_offset as usize + l]);

            written += l;
            real_offset += l as u64;
        }

        Ok(())
    }

    /// Returns the value length; copies the value into `dst` when present.
    pub fn get_value(&mut self, dst: Option<&mut [u8]>, maxlen: u32) -> Result<u32> {
        if self.selected_page < FIRST_PAGE || self.selected_page_count == 0 {
            return Err(MdbError::NoRowSelected);
        }

        let fatal = self.fatal.as_ref();
        self.pager.read_page(self.selected_page, fatal)?;
        let valuelen = read_u32_le(&self.pager.page_buf()[ROW_VALUELEN_OFF..ROW_VALUELEN_OFF + 4]);

        if let Some(dst) = dst {
            if valuelen > maxlen {
                return Err(MdbError::DataTooBig);
            }
            self.read_value(&mut dst[..valuelen as usize], 0)?;
        }

        Ok(valuelen)
    }
}

fn write_row_header(buf: &mut [u8], page_count: u32, rowid: u32, table: u8, valuelen: u32) {
    write_u32_le(&mut buf[ROW_PAGE_COUNT_OFF..ROW_PAGE_COUNT_OFF + 4], page_count);
    write_u32_le(&mut buf[ROW_ROWID_OFF..ROW_ROWID_OFF + 4], rowid);
    buf[ROW_TABLEID_OFF] = table;
    write_u32_le(&mut buf[ROW_VALUELEN_OFF..ROW_VALUELEN_OFF + 4], valuelen);
}
