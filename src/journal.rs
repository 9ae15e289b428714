//! Two-slot journal and crash-recovery replay.
//!
//! Grounded on `original_source/src/meagerdb.c` (`set_journal`,
//! `cleanup_journal`), generalized with spec §4.4's explicit `start >= 2`
//! validity guard the original omits.

use crate::consts::{FIRST_PAGE, JOURNAL_SLOT_0, JOURNAL_SLOT_1};
use crate::error::{MdbError, Result};
use crate::host::FatalHook;
use crate::pager::Pager;
use crate::util::{read_u32_le, write_u32_le};

/// Arm a journal slot with a pending `(page_start, page_count)` deletion
/// intent. `count == 0` clears the slot.
pub fn set_journal(pager: &mut Pager, slot: u32, start: u32, count: u32, fatal: &dyn FatalHook) -> Result<()> {
    let buf = pager.page_buf_mut();
    buf.fill(0);
    write_u32_le(&mut buf[0..4], start);
    write_u32_le(&mut buf[4..8], count);
    pager.write_page(slot, fatal)
}

fn read_slot(pager: &mut Pager, slot: u32, fatal: &dyn FatalHook) -> Result<Option<(u32, u32)>> {
    match pager.read_page(slot, fatal) {
        Ok(()) => {
            let start = read_u32_le(&pager.page_buf()[0..4]);
            let count = read_u32_le(&pager.page_buf()[4..8]);
            Ok(Some((start, count)))
        }
        Err(MdbError::Corrupt) => Ok(None),
        Err(e) => Err(e),
    }
}

fn tombstone_range(pager: &mut Pager, start: u32, count: u32, fatal: &dyn FatalHook) -> Result<()> {
    for page in start..start + count {
        let buf = pager.page_buf_mut();
        buf.fill(0);
        write_u32_le(&mut buf[0..4], 1); // page_count = 1, rest zero
        pager.write_page(page, fatal)?;
    }
    Ok(())
}

/// Run on open, after every delete, and after every update finalize. Slot 1
/// has priority over slot 0 so that a crash between arming slot 1 and
/// finishing its replay is itself replayed correctly on the next attempt.
pub fn cleanup_journal(pager: &mut Pager, fatal: &dyn FatalHook) -> Result<()> {
    if let Some((start, count)) = read_slot(pager, JOURNAL_SLOT_1, fatal)? {
        if count != 0 && start >= FIRST_PAGE {
            set_journal(pager, JOURNAL_SLOT_0, 0, 0, fatal)?;
            tombstone_range(pager, start, count, fatal)?;
            set_journal(pager, JOURNAL_SLOT_1, 0, 0, fatal)?;
            log::warn!("journal: replayed slot 1, pages [{start}, {})", start + count);
            return Ok(());
        }
    }

    if let Some((start, count)) = read_slot(pager, JOURNAL_SLOT_0, fatal)? {
        if count != 0 && start >= FIRST_PAGE {
            tombstone_range(pager, start, count, fatal)?;
            set_journal(pager, JOURNAL_SLOT_0, 0, 0, fatal)?;
            log::warn!("journal: replayed slot 0, pages [{start}, {})", start + count);
        }
    }

    Ok(())
}
