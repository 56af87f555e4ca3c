use moor_crypto::Account;
use moor_ledger::{SignedSubmission, SubmissionPayload};
use moor_types::NonceMode;

use crate::error::TxError;

/// Sign a payload into a submission the ledger will accept.
///
/// The signature covers the encoded payload only; nonce assignment happens
/// at admission per the requested [`NonceMode`].
pub fn seal(
    payload: SubmissionPayload,
    account: &Account,
    nonce: NonceMode,
) -> Result<SignedSubmission, TxError> {
    let bytes = SignedSubmission::signing_bytes(&payload)?;
    let signature = account.sign(&bytes);
    Ok(SignedSubmission {
        payload,
        signer: account.address(),
        nonce,
        signature,
    })
}
