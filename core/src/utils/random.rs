//! Random identifier generation.
//!
//! The spec asks for a persistent per-endpoint id of "16+ hex chars" and an
//! admin token from "a cryptographically strong RNG (>= 128 bits)". Rather
//! than add a dependency on `rand` purely for this, we reuse `uuid`'s own
//! OS-backed CSPRNG (already a hard dependency for other ids): one UUID v4
//! is 122 bits of entropy and 32 hex chars, two concatenated comfortably
//! clears the 128-bit admin-token bar.

use uuid::Uuid;

/// A fresh persistent local user id: 32 hex chars (one UUID v4, no hyphens).
pub fn new_local_user_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A fresh admin token: 64 hex chars (two UUID v4s), well over 128 bits.
pub fn new_admin_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}
