//! The transaction body (spec §3.3, §4.1 Component E) and its Blake2b-256
//! hash. Grounded on `pallas_primitives::conway::TransactionBody`; field
//! numbers follow the Conway CDDL exactly, including the gaps left by
//! retired Shelley-era fields (6, 10, 12).

use crate::certificate::Certificate;
use crate::containers::InsertionOrderedMap;
use crate::governance::{ProposalProcedure, RewardAccount, VotingProcedures};
use crate::native_script::AddrKeyhash;
use crate::network::NetworkId;
use crate::transaction_input::TransactionInput;
use crate::transaction_output::TransactionOutput;
use crate::value::{Coin, MultiAsset};
use cardano_codec::set::Set;
use cardano_codec::{CodecResult, Fragment};
use cardano_crypto::{Hash, Hasher};
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};

pub type Withdrawals = InsertionOrderedMap<RewardAccount, Coin>;
/// Multi-asset amounts to mint (positive) or burn (negative) this transaction.
pub type Mint = MultiAsset;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub inputs: Set<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: Coin,
    pub ttl: Option<u64>,
    pub certificates: Vec<Certificate>,
    pub withdrawals: Option<Withdrawals>,
    pub auxiliary_data_hash: Option<Hash<32>>,
    pub validity_interval_start: Option<u64>,
    pub mint: Option<Mint>,
    pub script_data_hash: Option<Hash<32>>,
    pub collateral: Option<Set<TransactionInput>>,
    pub required_signers: Option<Set<AddrKeyhash>>,
    pub network_id: Option<NetworkId>,
    pub collateral_return: Option<TransactionOutput>,
    pub total_collateral: Option<Coin>,
    pub reference_inputs: Option<Set<TransactionInput>>,
    pub voting_procedures: Option<VotingProcedures>,
    pub proposal_procedures: Vec<ProposalProcedure>,
    pub treasury_value: Option<Coin>,
    pub donation: Option<Coin>,
}

impl TransactionBody {
    pub fn new(inputs: Set<TransactionInput>, outputs: Vec<TransactionOutput>, fee: Coin) -> Self {
        TransactionBody {
            inputs,
            outputs,
            fee,
            ..Default::default()
        }
    }

    /// Blake2b-256 hash of this body's canonical CBOR encoding, used as the
    /// transaction id and as the payload every vkey witness signs.
    pub fn hash(&self) -> CodecResult<Hash<32>> {
        let bytes = self.encode_fragment()?;
        Ok(Hasher::<256>::hash(&bytes))
    }
}

impl<'b, C> Decode<'b, C> for TransactionBody {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut out = TransactionBody::default();
        let mut inputs = None;
        let mut outputs = None;
        let mut fee = None;

        let len = d.map()?;
        let mut remaining = len;
        loop {
            match remaining {
                Some(0) => break,
                Some(n) => remaining = Some(n - 1),
                None => {
                    if d.datatype()? == minicbor::data::Type::Break {
                        d.skip()?;
                        break;
                    }
                }
            }
            let idx = d.u8()?;
            match idx {
                0 => inputs = Some(d.decode_with(ctx)?),
                1 => outputs = Some(d.decode_with(ctx)?),
                2 => fee = Some(d.decode_with(ctx)?),
                3 => out.ttl = Some(d.decode_with(ctx)?),
                4 => out.certificates = d.decode_with(ctx)?,
                5 => out.withdrawals = Some(d.decode_with(ctx)?),
                7 => out.auxiliary_data_hash = Some(d.decode_with(ctx)?),
                8 => out.validity_interval_start = Some(d.decode_with(ctx)?),
                9 => out.mint = Some(d.decode_with(ctx)?),
                11 => out.script_data_hash = Some(d.decode_with(ctx)?),
                13 => out.collateral = Some(d.decode_with(ctx)?),
                14 => out.required_signers = Some(d.decode_with(ctx)?),
                15 => out.network_id = Some(d.decode_with(ctx)?),
                16 => out.collateral_return = Some(d.decode_with(ctx)?),
                17 => out.total_collateral = Some(d.decode_with(ctx)?),
                18 => out.reference_inputs = Some(d.decode_with(ctx)?),
                19 => out.voting_procedures = Some(d.decode_with(ctx)?),
                20 => out.proposal_procedures = d.decode_with(ctx)?,
                21 => out.treasury_value = Some(d.decode_with(ctx)?),
                22 => out.donation = Some(d.decode_with(ctx)?),
                other => {
                    return Err(DecodeError::message(format!(
                        "unknown transaction body field {other}"
                    )))
                }
            }
        }

        out.inputs = inputs.ok_or_else(|| DecodeError::message("transaction body missing inputs"))?;
        out.outputs =
            outputs.ok_or_else(|| DecodeError::message("transaction body missing outputs"))?;
        out.fee = fee.ok_or_else(|| DecodeError::message("transaction body missing fee"))?;
        Ok(out)
    }
}

impl<C> Encode<C> for TransactionBody {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let len = 3
            + self.ttl.is_some() as u64
            + !self.certificates.is_empty() as u64
            + self.withdrawals.is_some() as u64
            + self.auxiliary_data_hash.is_some() as u64
            + self.validity_interval_start.is_some() as u64
            + self.mint.is_some() as u64
            + self.script_data_hash.is_some() as u64
            + self.collateral.is_some() as u64
            + self.required_signers.is_some() as u64
            + self.network_id.is_some() as u64
            + self.collateral_return.is_some() as u64
            + self.total_collateral.is_some() as u64
            + self.reference_inputs.is_some() as u64
            + self.voting_procedures.is_some() as u64
            + !self.proposal_procedures.is_empty() as u64
            + self.treasury_value.is_some() as u64
            + self.donation.is_some() as u64;

        e.map(len)?;
        e.u8(0)?;
        self.inputs.encode(e, ctx)?;
        e.u8(1)?;
        e.encode_with(&self.outputs, ctx)?;
        e.u8(2)?;
        self.fee.encode(e, ctx)?;
        if let Some(ttl) = &self.ttl {
            e.u8(3)?;
            ttl.encode(e, ctx)?;
        }
        if !self.certificates.is_empty() {
            e.u8(4)?;
            e.encode_with(&self.certificates, ctx)?;
        }
        if let Some(withdrawals) = &self.withdrawals {
            e.u8(5)?;
            withdrawals.encode(e, ctx)?;
        }
        if let Some(hash) = &self.auxiliary_data_hash {
            e.u8(7)?;
            hash.encode(e, ctx)?;
        }
        if let Some(start) = &self.validity_interval_start {
            e.u8(8)?;
            start.encode(e, ctx)?;
        }
        if let Some(mint) = &self.mint {
            e.u8(9)?;
            mint.encode(e, ctx)?;
        }
        if let Some(hash) = &self.script_data_hash {
            e.u8(11)?;
            hash.encode(e, ctx)?;
        }
        if let Some(collateral) = &self.collateral {
            e.u8(13)?;
            collateral.encode(e, ctx)?;
        }
        if let Some(signers) = &self.required_signers {
            e.u8(14)?;
            signers.encode(e, ctx)?;
        }
        if let Some(network_id) = &self.network_id {
            e.u8(15)?;
            network_id.encode(e, ctx)?;
        }
        if let Some(output) = &self.collateral_return {
            e.u8(16)?;
            output.encode(e, ctx)?;
        }
        if let Some(total) = &self.total_collateral {
            e.u8(17)?;
            total.encode(e, ctx)?;
        }
        if let Some(refs) = &self.reference_inputs {
            e.u8(18)?;
            refs.encode(e, ctx)?;
        }
        if let Some(procedures) = &self.voting_procedures {
            e.u8(19)?;
            procedures.encode(e, ctx)?;
        }
        if !self.proposal_procedures.is_empty() {
            e.u8(20)?;
            e.encode_with(&self.proposal_procedures, ctx)?;
        }
        if let Some(value) = &self.treasury_value {
            e.u8(21)?;
            value.encode(e, ctx)?;
        }
        if let Some(donation) = &self.donation {
            e.u8(22)?;
            donation.encode(e, ctx)?;
        }
        Ok(())
    }
}
