use anyhow::Result;
use meagerdb::consts::JOURNAL_SLOT_1;
use meagerdb::journal::set_journal;
use meagerdb::{AbortHook, Db, MdbConfig, OsRandomSource};

/// Exercises the central crash-recovery invariant: an update writes its new
/// page run, slot 1 gets armed with the old run it is about to retire, and a
/// crash lands between arming the slot and finishing the replay that
/// tombstones the old run. Reopening must complete that replay so exactly
/// one live copy of the row survives.
#[test]
fn crash_after_update_arms_slot1_replays_on_reopen_with_one_live_copy() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("crash.mdb");
    let cfg = MdbConfig::default();

    Db::create(&path, b"pw", &cfg, &OsRandomSource, &AbortHook)?;

    let (old_page, old_count, rowid) = {
        let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
        let rowid = db.insert(7, b"before")?;
        db.select_by_rowid(7, rowid)?;
        let old_page = db.get_page()?;
        let old_count = db.get_page_count()?;

        // Write the replacement row's new page run but stop short of
        // `update_finalize` — the step that would normally arm and
        // immediately clean up slot 1 itself.
        db.update_begin(b"after-update".len() as u32)?;
        db.update_continue(b"after-update")?;

        (old_page, old_count, rowid)
    };

    // Simulate the crash landing right after slot 1 is armed: open the file
    // at the pager level, arm slot 1 with the old run exactly as
    // `update_finalize` would have, then drop without replaying it.
    {
        let mut pager = meagerdb::header::open(&path, b"pw", &cfg, &AbortHook)?;
        set_journal(&mut pager, JOURNAL_SLOT_1, old_page, old_count, &AbortHook)?;
    }

    // Reopening runs `cleanup_journal`, which must replay the armed slot.
    let mut db = Db::open(&path, b"pw", &cfg, Box::new(AbortHook))?;
    db.select_by_rowid(7, rowid)?;
    let len = db.get_value(None, 0)?;
    let mut buf = vec![0u8; len as usize];
    db.get_value(Some(&mut buf), len)?;
    assert_eq!(buf, b"after-update");

    let mut seen = Vec::new();
    let mut restart = true;
    loop {
        if !db.walk(7, restart)? {
            break;
        }
        restart = false;
        let (_, r) = db.get_rowid()?;
        seen.push(r);
    }
    assert_eq!(seen, vec![rowid], "exactly one live copy of the row must remain");

    Ok(())
}
