//! Pluggable host collaborators.
//!
//! The specification treats file I/O, the random-bytes source, and the
//! fatal-abort hook as external collaborators the engine must not assume a
//! single concrete implementation of. On a hosted OS, file I/O is realized
//! directly with `std::fs::File` — there is no embedder to swap it out for.
//! The other two remain traits, following the pluggable-provider idiom the
//! teacher crate uses for `KeyProvider`: a constrained embedder genuinely may
//! want a hardware RNG or a non-`abort` fatal path.

use rand::RngCore;

/// Source of cryptographically random bytes, used for the database id, the
/// PBKDF2 salt, and the randomly generated content keys.
pub trait RandomSource {
    fn fill(&self, dst: &mut [u8]);
}

/// The OS RNG, via the `rand` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomSource;

impl RandomSource for OsRandomSource {
    fn fill(&self, dst: &mut [u8]) {
        rand::thread_rng().fill_bytes(dst);
    }
}

/// Invoked for programmer errors and unreachable invariants: misaligned
/// crypto buffer lengths, a zero modulus or overflow in a round-up, an
/// iteration count that does not fit the stored field. Per spec §7 it must
/// not return.
pub trait FatalHook {
    fn fatal(&self, message: &str) -> !;
}

/// The default hook: log the message and abort the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbortHook;

impl FatalHook for AbortHook {
    fn fatal(&self, message: &str) -> ! {
        log::error!("fatal error: {message}");
        std::process::abort();
    }
}
