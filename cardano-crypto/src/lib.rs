//! Blake2b hashing primitives the transaction-construction core is allowed
//! to own: body hashes, script-data hashes, auxiliary-data hashes and the
//! 28-byte policy/key hashes embedded throughout the entity model. Signing,
//! key derivation and VRF live outside this crate's scope.

pub mod hash;

pub use hash::{Hash, Hasher};
