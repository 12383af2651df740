/// Validation logic for transactions separated from type definitions
use crate::crypto;
use crate::error::ChainError;
use crate::transaction::types::SignedTx;

impl SignedTx {
    /// Checks the transaction against the chain rules and its signature.
    ///
    /// The checks run in a fixed order and stop at the first failure:
    /// chain id, sender format, receiver format, self-payment, signature
    /// structure, and finally that the recovered signer is the sender.
    pub fn validate(&self, chain_id: u16) -> Result<(), ChainError> {
        let tx = &self.tx;

        if tx.chain_id != chain_id {
            return Err(ChainError::ChainMismatch {
                got: tx.chain_id,
                expected: chain_id,
            });
        }

        if !tx.from.is_account_id() {
            return Err(ChainError::InvalidAccount(
                "from account is not properly formatted".to_string(),
            ));
        }

        if !tx.to.is_account_id() {
            return Err(ChainError::InvalidAccount(
                "to account is not properly formatted".to_string(),
            ));
        }

        if tx.from == tx.to {
            return Err(ChainError::SelfPayment {
                from: tx.from.to_string(),
                to: tx.to.to_string(),
            });
        }

        crypto::verify_signature(self.v, &self.r, &self.s)?;

        let signer = crypto::from_address(tx, self.v, &self.r, &self.s).map_err(|e| match e {
            ChainError::BadSignature(_) => e,
            other => ChainError::BadSignature(other.to_string()),
        })?;

        if signer != tx.from {
            return Err(ChainError::SignerMismatch);
        }

        Ok(())
    }
}
