//! Entity model and deterministic CBOR codec for Cardano transactions.
//!
//! This crate owns the on-chain data shapes (inputs, outputs, the value
//! algebra, certificates, governance actions, protocol parameter updates,
//! the witness set and the transaction body) and their canonical encoding.
//! It has no opinion on how a transaction gets built or balanced; that
//! lives in `cardano-tx`.

pub mod auxiliary_data;
pub mod body;
pub mod certificate;
pub mod containers;
pub mod credential;
pub mod error;
pub mod governance;
pub mod metadatum;
pub mod native_script;
pub mod network;
pub mod plutus;
pub mod pool;
pub mod protocol_params;
pub mod rational;
pub mod redeemer;
pub mod script;
pub mod transaction_input;
pub mod transaction_output;
pub mod value;
pub mod witness;

pub use auxiliary_data::{AuxiliaryData, Metadata, PostAlonzoAuxiliaryData};
pub use body::{Mint, TransactionBody, Withdrawals};
pub use certificate::{Certificate, PoolKeyhash, VrfKeyhash};
pub use containers::InsertionOrderedMap;
pub use credential::StakeCredential;
pub use error::{ChainError, ChainResult};
pub use governance::{
    Anchor, Constitution, DRep, Epoch, GovAction, GovActionId, ProposalProcedure, RewardAccount,
    Vote, Voter, VotingProcedure, VotingProcedures,
};
pub use metadatum::{Metadatum, MetadatumLabel};
pub use native_script::{AddrKeyhash, NativeScript, ScriptHash};
pub use network::NetworkId;
pub use plutus::{Constr, PlutusData};
pub use pool::{PoolMetadata, PoolMetadataHash, Relay};
pub use protocol_params::{
    CostModel, CostModels, DRepVotingThresholds, ExUnitPrices, PoolVotingThresholds,
    ProtocolParamUpdate,
};
pub use rational::RationalNumber;
pub use redeemer::{ExUnits, Redeemer, Redeemers};
pub use script::{PlutusScript, Script, ScriptRef};
pub use transaction_input::{TransactionId, TransactionInput};
pub use transaction_output::{Address, DatumOption, TransactionOutput};
pub use value::{AssetId, AssetIdMap, AssetName, AssetNameMap, Coin, MultiAsset, PolicyId, Value};
pub use witness::{BootstrapWitness, VKeyWitness, WitnessSet};

pub use cardano_codec::set::{NonEmptySet, Set};
