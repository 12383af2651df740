//! Transaction module split into types and validation for better modularity

pub mod types;
pub mod validation;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::crypto::KeyPair;
    use crate::error::ChainError;

    const CHAIN_ID: u16 = 1;

    fn receiver() -> AccountId {
        AccountId::from("0xbEE6ACE826eC3DE1B6349888B9151B92522F7F76")
    }

    fn signed(keypair: &KeyPair, nonce: u64) -> SignedTx {
        Tx::new(
            CHAIN_ID,
            nonce,
            keypair.account_id(),
            receiver(),
            250,
            15,
            b"memo".to_vec(),
        )
        .unwrap()
        .sign(keypair)
        .unwrap()
    }

    #[test]
    fn test_new_rejects_malformed_accounts() {
        let good = receiver();
        let bad = AccountId::from("not-an-account");

        let result = Tx::new(CHAIN_ID, 1, bad.clone(), good.clone(), 1, 0, vec![]);
        assert!(matches!(result, Err(ChainError::InvalidAccount(msg)) if msg.contains("from")));

        let result = Tx::new(CHAIN_ID, 1, good, bad, 1, 0, vec![]);
        assert!(matches!(result, Err(ChainError::InvalidAccount(msg)) if msg.contains("to")));
    }

    #[test]
    fn test_sign_then_validate() {
        let keypair = KeyPair::generate();
        let tx = signed(&keypair, 1);
        assert_eq!(tx.validate(CHAIN_ID), Ok(()));
    }

    #[test]
    fn test_self_payment_signs_but_never_validates() {
        let keypair = KeyPair::generate();
        let me = keypair.account_id();
        let tx = Tx::new(CHAIN_ID, 1, me.clone(), me, 10, 0, vec![]).unwrap();
        let signed = tx.sign(&keypair).unwrap();

        assert!(matches!(
            signed.validate(CHAIN_ID),
            Err(ChainError::SelfPayment { .. })
        ));
    }

    #[test]
    fn test_self_payment_through_other_spelling() {
        let keypair = KeyPair::generate();
        let me = keypair.account_id();
        let shouted = AccountId::from(format!("0x{}", me.as_str()[2..].to_uppercase()));
        assert_ne!(me.as_str(), shouted.as_str());

        let tx = Tx::new(CHAIN_ID, 1, me, shouted, 10, 0, vec![]).unwrap();
        let signed = tx.sign(&keypair).unwrap();
        assert!(matches!(
            signed.validate(CHAIN_ID),
            Err(ChainError::SelfPayment { .. })
        ));
    }

    #[test]
    fn test_uppercase_sender_validates() {
        let keypair = KeyPair::generate();
        let me = keypair.account_id();
        let shouted = AccountId::from(format!("0x{}", me.as_str()[2..].to_uppercase()));

        let tx = Tx::new(CHAIN_ID, 1, shouted, receiver(), 10, 0, vec![]).unwrap();
        let signed = tx.sign(&keypair).unwrap();
        assert_eq!(signed.validate(CHAIN_ID), Ok(()));
    }

    #[test]
    fn test_chain_mismatch() {
        let keypair = KeyPair::generate();
        let tx = signed(&keypair, 1);
        assert_eq!(
            tx.validate(CHAIN_ID + 1),
            Err(ChainError::ChainMismatch {
                got: CHAIN_ID,
                expected: CHAIN_ID + 1
            })
        );
    }

    #[test]
    fn test_chain_id_checked_before_accounts() {
        let keypair = KeyPair::generate();
        let mut tx = signed(&keypair, 1);
        tx.tx.to = AccountId::from("garbage");
        assert!(matches!(
            tx.validate(CHAIN_ID + 1),
            Err(ChainError::ChainMismatch { .. })
        ));
        assert!(matches!(
            tx.validate(CHAIN_ID),
            Err(ChainError::InvalidAccount(_))
        ));
    }

    #[test]
    fn test_tampering_breaks_signer_binding() {
        let keypair = KeyPair::generate();
        let original = signed(&keypair, 3);

        let mut by_value = original.clone();
        by_value.tx.value += 1;
        let mut by_nonce = original.clone();
        by_nonce.tx.nonce += 1;
        let mut by_to = original.clone();
        by_to.tx.to = AccountId::from("0x0000000000000000000000000000000000000001");
        let mut by_data = original.clone();
        by_data.tx.data = b"other".to_vec();

        for tampered in [by_value, by_nonce, by_to, by_data] {
            let result = tampered.validate(CHAIN_ID);
            assert!(
                matches!(
                    result,
                    Err(ChainError::SignerMismatch) | Err(ChainError::BadSignature(_))
                ),
                "unexpected result {:?}",
                result
            );
        }
    }

    #[test]
    fn test_signed_by_someone_else() {
        let owner = KeyPair::generate();
        let thief = KeyPair::generate();
        let tx = Tx::new(CHAIN_ID, 1, owner.account_id(), receiver(), 1, 0, vec![]).unwrap();
        let forged = tx.sign(&thief).unwrap();
        assert_eq!(forged.validate(CHAIN_ID), Err(ChainError::SignerMismatch));
    }

    #[test]
    fn test_corrupt_signature_values() {
        let keypair = KeyPair::generate();
        let mut tx = signed(&keypair, 1);
        tx.v = 27;
        assert!(matches!(
            tx.validate(CHAIN_ID),
            Err(ChainError::BadSignature(_))
        ));

        let mut tx = signed(&keypair, 1);
        tx.r = [0u8; 32];
        assert!(matches!(
            tx.validate(CHAIN_ID),
            Err(ChainError::BadSignature(_))
        ));
    }

    #[test]
    fn test_identity_and_signature_string() {
        let keypair = KeyPair::generate();
        let tx = signed(&keypair, 42);
        assert_eq!(tx.to_string(), format!("{}:42", keypair.account_id()));

        let rendered = tx.signature_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 132);
        assert_eq!(rendered, tx.signature_string());
    }

    #[test]
    fn test_block_tx_hash_keeps_account_boundary() {
        let keypair = KeyPair::generate();
        let base = BlockTx::new(signed(&keypair, 1), 1, 21);

        let mut left = base.clone();
        left.signed_tx.tx.from = AccountId::from("0xab");
        left.signed_tx.tx.to = AccountId::from("cd");

        let mut right = base.clone();
        right.signed_tx.tx.from = AccountId::from("0xa");
        right.signed_tx.tx.to = AccountId::from("bcd");

        assert_ne!(left.hash(), right.hash());

        let json = serde_json::to_string(&base).unwrap();
        let decoded: BlockTx = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.hash(), base.hash());
        assert_eq!(decoded.hash_str(), hex::encode(base.hash()));
    }

    #[test]
    fn test_json_shape_is_flat() {
        let keypair = KeyPair::generate();
        let block_tx = BlockTx::new(signed(&keypair, 1), 1, 21);
        let value = serde_json::to_value(&block_tx).unwrap();

        assert_eq!(value["nonce"], 1);
        assert_eq!(value["tip"], 15);
        assert_eq!(value["data"], "bWVtbw==");
        assert_eq!(value["gas_units"], 21);
        assert!(value["r"].as_str().unwrap().starts_with("0x"));

        let decoded: BlockTx = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, block_tx);
        assert_eq!(decoded.signed_tx.validate(CHAIN_ID), Ok(()));
    }
}
