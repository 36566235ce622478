//! Implicit-coin accounting (spec §4.4, Component F): the net value a
//! transaction body contributes or consumes outside of its inputs/outputs
//! proper — withdrawals, certificate deposits and reclaims, and proposal
//! deposits. Grounded on the deposit/reclaim bookkeeping
//! `pallas_txbuilder::babbage`/`conway` scatter across certificate
//! handling, gathered here into one pass the balancer calls once per
//! iteration (§4.7 step 2).

use cardano_chain::{Certificate, TransactionBody};

use crate::protocol_parameters::ProtocolParameters;

/// Sum of the three accumulators in §4.4, plus the grand total used to form
/// `v_imp`. Kept as signed 128-bit so `deposits` (a cost to the balance
/// equation) and `reclaim_deposits`/`withdrawals` (a credit) can be summed
/// without an intermediate overflow check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImplicitCoin {
    pub withdrawals: u64,
    pub deposits: u64,
    pub reclaim_deposits: u64,
}

impl ImplicitCoin {
    /// Net contribution to the balance equation: positive means the body
    /// is a net source of coin outside inputs/outputs (withdrawals and
    /// reclaims exceed deposits), negative means a net sink.
    pub fn net(&self) -> i128 {
        self.withdrawals as i128 + self.reclaim_deposits as i128 - self.deposits as i128
    }
}

/// Computes withdrawals, deposits and reclaim_deposits for `body` under
/// `params` (§4.4). Certificate deposit/reclaim amounts that carry their
/// own deposit field (the Conway `Reg`/`UnReg` certs) use that field
/// directly; Shelley-era certs fall back to the current protocol
/// parameters' `key_deposit`/`pool_deposit`/`drep_deposit`, which is only
/// an approximation for a reclaim whose deposit was set under prior
/// parameters (spec §4.4 note, §9 open question — preserved as-is).
pub fn compute(body: &TransactionBody, params: &ProtocolParameters) -> ImplicitCoin {
    let mut out = ImplicitCoin::default();

    if let Some(withdrawals) = &body.withdrawals {
        for (_, amount) in withdrawals.iter() {
            out.withdrawals += amount.amount();
        }
    }

    for cert in &body.certificates {
        match cert {
            Certificate::StakeRegistration(_) => out.deposits += params.key_deposit,
            Certificate::StakeDeregistration(_) => out.reclaim_deposits += params.key_deposit,
            Certificate::PoolRegistration { .. } => out.deposits += params.pool_deposit,
            Certificate::PoolRetirement(..) => out.reclaim_deposits += params.pool_deposit,
            Certificate::Reg(_, coin) => out.deposits += coin.amount(),
            Certificate::UnReg(_, coin) => out.reclaim_deposits += coin.amount(),
            Certificate::StakeRegDeleg(_, _, coin) => out.deposits += coin.amount(),
            Certificate::VoteRegDeleg(_, _, coin) => out.deposits += coin.amount(),
            Certificate::StakeVoteRegDeleg(_, _, _, coin) => out.deposits += coin.amount(),
            Certificate::RegDRepCert(_, coin, _) => out.deposits += coin.amount(),
            Certificate::UnRegDRepCert(_, coin) => out.reclaim_deposits += coin.amount(),
            Certificate::StakeDelegation(..)
            | Certificate::VoteDeleg(..)
            | Certificate::StakeVoteDeleg(..)
            | Certificate::AuthCommitteeHot(..)
            | Certificate::ResignCommitteeCold(..)
            | Certificate::UpdateDRepCert(..) => {}
        }
    }

    for proposal in &body.proposal_procedures {
        out.deposits += proposal.deposit.amount();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_protocol_parameters;
    use cardano_chain::{Coin, StakeCredential, TransactionInput, TransactionOutput, Value};
    use cardano_chain::Set;

    fn empty_body() -> TransactionBody {
        let input = TransactionInput::new(cardano_chain::TransactionId::new([1u8; 32]), 0);
        let output = TransactionOutput::new(
            cardano_codec::utils::Bytes::from(vec![0x60, 1, 2, 3]),
            Value::coin_only(1_000_000),
        );
        TransactionBody::new(Set::new(vec![input]), vec![output], Coin::new(0))
    }

    #[test]
    fn stake_registration_counts_as_deposit() {
        let params = sample_protocol_parameters();
        let mut body = empty_body();
        body.certificates.push(Certificate::StakeRegistration(
            StakeCredential::AddrKeyhash(cardano_chain::AddrKeyhash::new([2u8; 28])),
        ));
        let coin = compute(&body, &params);
        assert_eq!(coin.deposits, params.key_deposit);
        assert_eq!(coin.net(), -(params.key_deposit as i128));
    }

    #[test]
    fn stake_deregistration_reclaims() {
        let params = sample_protocol_parameters();
        let mut body = empty_body();
        body.certificates.push(Certificate::StakeDeregistration(
            StakeCredential::AddrKeyhash(cardano_chain::AddrKeyhash::new([2u8; 28])),
        ));
        let coin = compute(&body, &params);
        assert_eq!(coin.reclaim_deposits, params.key_deposit);
        assert_eq!(coin.net(), params.key_deposit as i128);
    }

    #[test]
    fn conway_reg_cert_uses_its_own_deposit_field() {
        let params = sample_protocol_parameters();
        let mut body = empty_body();
        body.certificates.push(Certificate::Reg(
            StakeCredential::AddrKeyhash(cardano_chain::AddrKeyhash::new([3u8; 28])),
            Coin::new(2_000_000),
        ));
        let coin = compute(&body, &params);
        assert_eq!(coin.deposits, 2_000_000);
    }

    #[test]
    fn withdrawals_sum_across_entries() {
        let params = sample_protocol_parameters();
        let mut body = empty_body();
        let mut withdrawals = cardano_chain::Withdrawals::new();
        withdrawals
            .insert(
                cardano_codec::utils::Bytes::from(vec![0xe0, 1]),
                Coin::new(1_000_000),
            )
            .unwrap();
        withdrawals
            .insert(
                cardano_codec::utils::Bytes::from(vec![0xe0, 2]),
                Coin::new(500_000),
            )
            .unwrap();
        body.withdrawals = Some(withdrawals);
        let coin = compute(&body, &params);
        assert_eq!(coin.withdrawals, 1_500_000);
    }
}
