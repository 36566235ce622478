mod digest;
mod hasher;

pub use digest::Hash;
pub use hasher::Hasher;
