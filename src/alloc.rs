//! Row allocator: find a run of contiguous empty tombstones, or extend the
//! file by writing a fresh terminator further out.
//!
//! Grounded on `original_source/src/meagerdb.c`'s `find_empty_row`.

use crate::consts::FIRST_PAGE;
use crate::error::{MdbError, Result};
use crate::host::FatalHook;
use crate::journal::set_journal;
use crate::pager::Pager;
use crate::util::read_u32_le;

/// Find (or create) a run of `n` consecutive pages for a new row. Arms
/// journal slot 0 with `(start, n)` only when a fresh run is carved out of
/// new file space — reused tombstones already represent recoverable free
/// space and need no journal entry of their own.
pub fn find_empty_row(pager: &mut Pager, n: u32, fatal: &dyn FatalHook) -> Result<u32> {
    let mut potential_start = FIRST_PAGE;
    let mut potential_count = 0u32;

    loop {
        let p = potential_start + potential_count;
        pager.read_page(p, fatal)?;
        let page_count = read_u32_le(&pager.page_buf()[0..4]);
        let rowid = read_u32_le(&pager.page_buf()[4..8]);

        if page_count == 0 {
            potential_start += potential_count;
            break;
        }

        if rowid != 0 {
            potential_start += potential_count + page_count;
            potential_count = 0;
            continue;
        }

        if page_count != 1 {
            return Err(MdbError::Corrupt);
        }

        potential_count += 1;

        if potential_count == n {
            return Ok(potential_start);
        }
    }

    if potential_start.checked_add(n).and_then(|v| v.checked_add(1)).is_none() {
        return Err(MdbError::Full);
    }

    for count in 0..=n {
        let buf = pager.page_buf_mut();
        buf.fill(0);
        pager.write_page(potential_start + count, fatal)?;
    }

    set_journal(pager, crate::consts::JOURNAL_SLOT_0, potential_start, n, fatal)?;

    Ok(potential_start)
}
