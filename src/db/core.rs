//! The `Db` handle: an open database plus the transient row-lifecycle state
//! (selected row, in-progress insert, in-progress update).
//!
//! Grounded on the teacher's `Db` (`examples/artemonad-QuiverDB/src/db/core.rs`):
//! a struct that owns the pager and the host collaborators together, with a
//! `Drop` that clears anything sensitive. `original_source/src/meagerdb.c`
//! keeps this same state in one static `g_database` struct; here it is
//! instance state so more than one database can be open at once.

use crate::config::MdbConfig;
use crate::header;
use crate::host::{FatalHook, RandomSource};
use crate::pager::Pager;
use crate::error::Result;
use std::path::Path;

/// An open MeagerDB file plus the cursor/in-progress-write state the row
/// lifecycle operations (`src/db/row.rs`) advance. Row operations need no
/// randomness — only `create` does — so no `RandomSource` is kept here.
pub struct Db {
    pub(super) pager: Pager,
    pub(super) fatal: Box<dyn FatalHook>,

    pub(super) selected_page: u32,
    pub(super) selected_page_count: u32,

    pub(super) insert_page: u32,
    pub(super) insert_page_count: u32,
    pub(super) insert_offset: u32,

    pub(super) update_page: u32,
    pub(super) update_page_count: u32,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("selected_page", &self.selected_page)
            .field("selected_page_count", &self.selected_page_count)
            .field("insert_page", &self.insert_page)
            .field("insert_page_count", &self.insert_page_count)
            .field("insert_offset", &self.insert_offset)
            .field("update_page", &self.update_page)
            .field("update_page_count", &self.update_page_count)
            .finish_non_exhaustive()
    }
}

impl Db {
    /// Create a new, empty database file. Always closes the file again: per
    /// the file-format's create/open split, a freshly created database must
    /// be opened separately to obtain a live handle.
    pub fn create(path: &Path, password: &[u8], cfg: &MdbConfig, rand: &dyn RandomSource, fatal: &dyn FatalHook) -> Result<()> {
        header::create(path, password, cfg, rand, fatal)
    }

    /// Unlock and open an existing database file.
    pub fn open(path: &Path, password: &[u8], cfg: &MdbConfig, fatal: Box<dyn FatalHook>) -> Result<Db> {
        let pager = header::open(path, password, cfg, fatal.as_ref())?;
        Ok(Db {
            pager,
            fatal,
            selected_page: 0,
            selected_page_count: 0,
            insert_page: 0,
            insert_page_count: 0,
            insert_offset: 0,
            update_page: 0,
            update_page_count: 0,
        })
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        self.selected_page = 0;
        self.selected_page_count = 0;
        self.insert_page = 0;
        self.insert_page_count = 0;
        self.update_page = 0;
        self.update_page_count = 0;
        log::debug!("database closed");
    }
}
