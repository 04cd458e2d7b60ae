//! Short opaque identifiers for artifact file names.

use uuid::Uuid;

/// Generates an 8-character lowercase hexadecimal identifier.
///
/// Derived from a random v4 UUID, truncated. Roughly 32 bits of entropy:
/// enough to disambiguate files sharing a timestamp, not collision-proof.
pub fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
