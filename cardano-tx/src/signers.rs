//! Unique-signer derivation (spec §4.5, Component G): walks a transaction
//! body and the UTxOs it spends/collateralizes to produce the set of
//! Blake2b-224 key hashes that must sign. Used both to size the per-signer
//! fee padding (§4.6) and, downstream of this crate, to know which keys an
//! external signer needs.

use std::collections::BTreeSet;

use cardano_chain::{AddrKeyhash, Certificate, TransactionBody, Voter};

use crate::provider::{CredentialResolver, Utxo};

/// Every key hash `body` requires a signature from (§4.5, steps 1-5).
/// Deduplicated by byte equality; the return order is insertion order
/// (body field order, then per-field iteration order) since §4.5 says
/// ordering is "used only for counting" — callers that need a stable
/// wire order should sort it themselves.
pub fn unique_signers(
    body: &TransactionBody,
    spent_utxos: &[Utxo],
    collateral_utxos: &[Utxo],
    credentials: &dyn CredentialResolver,
) -> Vec<AddrKeyhash> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    let mut push = |hash: AddrKeyhash| {
        if seen.insert(hash) {
            out.push(hash);
        }
    };

    if let Some(required) = &body.required_signers {
        for hash in required.iter() {
            push(*hash);
        }
    }

    for utxo in spent_utxos.iter().chain(collateral_utxos.iter()) {
        if let Some(credential) = credentials.payment_credential(&utxo.output.address) {
            if let Some(hash) = credential.key_hash() {
                push(*hash);
            }
        }
    }

    if let Some(withdrawals) = &body.withdrawals {
        for (reward_account, _) in withdrawals.iter() {
            if let Some(credential) = credentials.stake_credential(reward_account) {
                if let Some(hash) = credential.key_hash() {
                    push(*hash);
                }
            }
        }
    }

    for cert in &body.certificates {
        match cert {
            Certificate::PoolRegistration { pool_owners, .. } => {
                for owner in pool_owners.iter() {
                    push(*owner);
                }
            }
            Certificate::PoolRetirement(pool, _) => push(*pool),
            Certificate::AuthCommitteeHot(cold, _) => {
                if let Some(hash) = cold.key_hash() {
                    push(*hash);
                }
            }
            other => {
                if let Some(credential) = other.credential() {
                    if let Some(hash) = credential.key_hash() {
                        push(*hash);
                    }
                }
            }
        }
    }

    if let Some(procedures) = &body.voting_procedures {
        for voter in procedures.keys() {
            if let Voter::ConstitutionalCommitteeKey(hash)
            | Voter::DRepKey(hash)
            | Voter::StakePoolKey(hash) = voter
            {
                push(*hash);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NullCredentials;
    use cardano_chain::{Coin, Set, StakeCredential, TransactionId, TransactionInput, TransactionOutput, Value};

    struct FixedKeyCredentials;

    impl CredentialResolver for FixedKeyCredentials {
        fn payment_credential(&self, _address: &cardano_chain::Address) -> Option<StakeCredential> {
            Some(StakeCredential::AddrKeyhash(AddrKeyhash::new([9u8; 28])))
        }

        fn stake_credential(
            &self,
            _reward_account: &cardano_chain::RewardAccount,
        ) -> Option<StakeCredential> {
            Some(StakeCredential::AddrKeyhash(AddrKeyhash::new([8u8; 28])))
        }
    }

    fn sample_body() -> TransactionBody {
        let input = TransactionInput::new(TransactionId::new([1u8; 32]), 0);
        let output = TransactionOutput::new(
            cardano_codec::utils::Bytes::from(vec![0x60, 1, 2, 3]),
            Value::coin_only(1_000_000),
        );
        TransactionBody::new(Set::new(vec![input]), vec![output], Coin::new(0))
    }

    #[test]
    fn required_signers_are_included() {
        let mut body = sample_body();
        body.required_signers = Some(Set::new(vec![AddrKeyhash::new([1u8; 28])]));
        let signers = unique_signers(&body, &[], &[], &NullCredentials);
        assert_eq!(signers, vec![AddrKeyhash::new([1u8; 28])]);
    }

    #[test]
    fn spent_input_contributes_key_hash_credential() {
        let body = sample_body();
        let utxo = Utxo::new(
            TransactionInput::new(TransactionId::new([2u8; 32]), 0),
            TransactionOutput::new(
                cardano_codec::utils::Bytes::from(vec![0x61]),
                Value::coin_only(5_000_000),
            ),
        );
        let signers = unique_signers(&body, &[utxo], &[], &FixedKeyCredentials);
        assert_eq!(signers, vec![AddrKeyhash::new([9u8; 28])]);
    }

    #[test]
    fn duplicate_hash_is_counted_once() {
        let mut body = sample_body();
        body.required_signers = Some(Set::new(vec![AddrKeyhash::new([9u8; 28])]));
        let utxo = Utxo::new(
            TransactionInput::new(TransactionId::new([2u8; 32]), 0),
            TransactionOutput::new(
                cardano_codec::utils::Bytes::from(vec![0x61]),
                Value::coin_only(5_000_000),
            ),
        );
        let signers = unique_signers(&body, &[utxo], &[], &FixedKeyCredentials);
        assert_eq!(signers.len(), 1);
    }

    #[test]
    fn pool_registration_counts_every_owner() {
        let mut body = sample_body();
        body.certificates.push(Certificate::PoolRegistration {
            operator: cardano_chain::PoolKeyhash::new([1u8; 28]),
            vrf_keyhash: cardano_chain::VrfKeyhash::new([2u8; 32]),
            pledge: Coin::new(0),
            cost: Coin::new(0),
            margin: cardano_chain::RationalNumber::new(0, 1),
            reward_account: cardano_codec::utils::Bytes::from(vec![0xe0]),
            pool_owners: Set::new(vec![
                AddrKeyhash::new([3u8; 28]),
                AddrKeyhash::new([4u8; 28]),
            ]),
            relays: vec![],
            pool_metadata: None,
        });
        let signers = unique_signers(&body, &[], &[], &NullCredentials);
        assert_eq!(signers.len(), 2);
    }
}
