//! Rust-native building blocks for Cardano transaction construction.
//!
//! This crate doesn't provide any particular application; it is meant to
//! be used as a single entry point over the layered `cardano-*` crates
//! that do the actual work: a CBOR codec kernel, a hashing layer, the
//! on-chain entity model and the transaction-balancing core.

#[doc(inline)]
pub use cardano_codec as codec;

#[doc(inline)]
pub use cardano_crypto as crypto;

pub mod ledger {
    //! On-chain entity model and canonical CBOR codecs.

    #[doc(inline)]
    pub use cardano_chain::*;
}

pub mod tx {
    //! Implicit-coin accounting, signer derivation, fee/collateral
    //! computation and the balancer driver.

    #[doc(inline)]
    pub use cardano_tx::*;
}
