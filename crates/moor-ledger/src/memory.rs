use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

use moor_types::{Address, BlockRef, Nonce, NonceMode};

use crate::connection::{LedgerConnection, StatusStream};
use crate::error::LedgerError;
use crate::status::{DispatchFailure, SubmissionStatus};
use crate::submission::{SignedSubmission, SubmissionPayload};

/// Failure behavior injectable per call target.
#[derive(Clone, Debug)]
pub enum FailureMode {
    /// Refuse admission with the given reason.
    Reject(String),
    /// Admit and broadcast, then fail at execution time with a module error.
    Dispatch { module: u8, error: u8 },
}

/// Record of one call observed by the in-memory ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    TimestampNow,
    AccountNonce { address: Address },
    Submit { batch: bool, operations: usize },
    Close,
}

struct AccountState {
    confirmed: u64,
    pending: u64,
}

struct LedgerState {
    open: bool,
    now_ms: u64,
    next_block: u64,
    batch_limit: usize,
    accounts: HashMap<Address, AccountState>,
    failures: HashMap<String, FailureMode>,
    calls: Vec<LedgerCall>,
    submissions: Vec<SubmissionPayload>,
}

/// In-memory ledger implementation for tests, local demos, and embedding.
///
/// Drives each admitted submission through `Broadcast → InBlock → Finalized`
/// synchronously: all lifecycle events are queued on the status stream
/// before `submit` returns, so tests observe a deterministic order. Failure
/// modes can be injected per call target, and every call is recorded for
/// sequencing assertions.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Default batch resource limit.
    pub const DEFAULT_BATCH_LIMIT: usize = 65_536;

    /// Ledger whose clock starts at the current system time.
    pub fn new() -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::with_timestamp(now_ms)
    }

    /// Ledger with a fixed timestamp, for reproducible runs.
    pub fn with_timestamp(now_ms: u64) -> Self {
        Self {
            inner: RwLock::new(LedgerState {
                open: true,
                now_ms,
                next_block: 1,
                batch_limit: Self::DEFAULT_BATCH_LIMIT,
                accounts: HashMap::new(),
                failures: HashMap::new(),
                calls: Vec::new(),
                submissions: Vec::new(),
            }),
        }
    }

    /// Make an account known to the ledger with a zero nonce.
    pub fn register_account(&self, address: Address) {
        let mut state = self.inner.write().expect("ledger lock poisoned");
        state.accounts.entry(address).or_insert(AccountState {
            confirmed: 0,
            pending: 0,
        });
    }

    /// Inject a failure for every submission containing the given target.
    pub fn fail_target(&self, target: &str, mode: FailureMode) {
        let mut state = self.inner.write().expect("ledger lock poisoned");
        state.failures.insert(target.to_string(), mode);
    }

    /// Override the batch resource limit.
    pub fn set_batch_limit(&self, limit: usize) {
        let mut state = self.inner.write().expect("ledger lock poisoned");
        state.batch_limit = limit;
    }

    /// Snapshot of every call observed so far, in order.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.inner
            .read()
            .expect("ledger lock poisoned")
            .calls
            .clone()
    }

    /// Payloads of every admitted-or-refused submission, in order.
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.inner
            .read()
            .expect("ledger lock poisoned")
            .submissions
            .clone()
    }

    fn make_block(state: &mut LedgerState) -> BlockRef {
        let number = state.next_block;
        state.next_block += 1;
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"moor-inmemory-block:");
        hasher.update(&number.to_le_bytes());
        hasher.update(&state.now_ms.to_le_bytes());
        BlockRef::new(number, *hasher.finalize().as_bytes())
    }

    fn failure_for(state: &LedgerState, payload: &SubmissionPayload) -> Option<FailureMode> {
        payload
            .operations()
            .iter()
            .find_map(|op| state.failures.get(&op.target).cloned())
    }

    /// Decide the full event sequence for one submission under the lock.
    fn admit(state: &mut LedgerState, submission: &SignedSubmission) -> Vec<SubmissionStatus> {
        if !submission.verify_signature() {
            return vec![SubmissionStatus::Rejected("invalid signature".into())];
        }

        let failure = Self::failure_for(state, &submission.payload);
        if let Some(FailureMode::Reject(reason)) = &failure {
            return vec![SubmissionStatus::Rejected(reason.clone())];
        }

        let account = state
            .accounts
            .get_mut(&submission.signer)
            .expect("signer checked before admission");
        let assigned = match submission.nonce {
            NonceMode::Automatic => {
                let next = account.pending;
                account.pending += 1;
                Nonce::new(next)
            }
            NonceMode::Explicit(nonce) => {
                if nonce.value() < account.pending {
                    return vec![SubmissionStatus::Rejected(format!(
                        "stale nonce {nonce}, pending is {}",
                        account.pending
                    ))];
                }
                account.pending = nonce.value() + 1;
                nonce
            }
        };

        if let Some(FailureMode::Dispatch { module, error }) = failure {
            // Included but refused at execution time: the nonce is consumed.
            account.confirmed = assigned.value() + 1;
            return vec![
                SubmissionStatus::Broadcast,
                SubmissionStatus::DispatchError(DispatchFailure::Module { module, error }),
            ];
        }

        account.confirmed = assigned.value() + 1;
        let block = Self::make_block(state);
        debug!(nonce = %assigned, block = %block, "submission included");
        vec![
            SubmissionStatus::Broadcast,
            SubmissionStatus::InBlock(block),
            SubmissionStatus::Finalized(block),
        ]
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerConnection for InMemoryLedger {
    async fn timestamp_now(&self) -> Result<u64, LedgerError> {
        let mut state = self.inner.write().expect("ledger lock poisoned");
        if !state.open {
            return Err(LedgerError::ConnectionClosed);
        }
        state.calls.push(LedgerCall::TimestampNow);
        Ok(state.now_ms)
    }

    async fn account_nonce(&self, address: &Address) -> Result<Nonce, LedgerError> {
        let mut state = self.inner.write().expect("ledger lock poisoned");
        if !state.open {
            return Err(LedgerError::ConnectionClosed);
        }
        state.calls.push(LedgerCall::AccountNonce { address: *address });
        state
            .accounts
            .get(address)
            .map(|account| Nonce::new(account.confirmed))
            .ok_or_else(|| LedgerError::UnknownAccount(address.to_hex()))
    }

    async fn submit(&self, submission: SignedSubmission) -> Result<StatusStream, LedgerError> {
        let events = {
            let mut state = self.inner.write().expect("ledger lock poisoned");
            if !state.open {
                return Err(LedgerError::ConnectionClosed);
            }
            state.calls.push(LedgerCall::Submit {
                batch: submission.payload.is_batch(),
                operations: submission.payload.operations().len(),
            });
            state.submissions.push(submission.payload.clone());

            let len = submission.payload.operations().len();
            if submission.payload.is_batch() && len > state.batch_limit {
                return Err(LedgerError::OversizedBatch {
                    limit: state.batch_limit,
                    len,
                });
            }
            if !state.accounts.contains_key(&submission.signer) {
                return Err(LedgerError::UnknownAccount(submission.signer.to_hex()));
            }

            Self::admit(&mut state, &submission)
        };

        info!(
            batch = submission.payload.is_batch(),
            operations = submission.payload.operations().len(),
            outcome = events.last().map(SubmissionStatus::label).unwrap_or("none"),
            "submission processed"
        );

        let (tx, rx) = mpsc::channel(events.len());
        for event in events {
            tx.try_send(event).expect("status channel sized to event count");
        }
        Ok(rx)
    }

    async fn close(&self) -> Result<(), LedgerError> {
        let mut state = self.inner.write().expect("ledger lock poisoned");
        if state.open {
            state.open = false;
            state.calls.push(LedgerCall::Close);
            info!("in-memory ledger connection closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moor_crypto::Account;
    use moor_types::HashWidth;

    use crate::submission::{CallArg, Operation};

    fn anchor_op(payload: &[u8]) -> Operation {
        let hash = moor_crypto::ContentHasher::hash(payload, HashWidth::W256);
        Operation::new("mtype.anchor", vec![CallArg::Hash(hash)])
    }

    fn signed(
        payload: SubmissionPayload,
        account: &Account,
        nonce: NonceMode,
    ) -> SignedSubmission {
        let bytes = SignedSubmission::signing_bytes(&payload).unwrap();
        SignedSubmission {
            signature: account.sign(&bytes),
            signer: account.address(),
            nonce,
            payload,
        }
    }

    fn registered(account: &Account) -> InMemoryLedger {
        let ledger = InMemoryLedger::with_timestamp(1_600_000_000_000);
        ledger.register_account(account.address());
        ledger
    }

    async fn drain(mut stream: StatusStream) -> Vec<SubmissionStatus> {
        let mut events = Vec::new();
        while let Some(event) = stream.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn successful_submission_reaches_finalized() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);
        let submission = signed(
            SubmissionPayload::Single(anchor_op(b"root")),
            &account,
            NonceMode::Automatic,
        );

        let events = drain(ledger.submit(submission).await.unwrap()).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SubmissionStatus::Broadcast);
        assert!(matches!(events[1], SubmissionStatus::InBlock(_)));
        assert!(matches!(events[2], SubmissionStatus::Finalized(_)));
        assert_eq!(events[1].block(), events[2].block());
    }

    #[tokio::test]
    async fn automatic_nonces_advance_without_confirmation_waits() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);

        for _ in 0..3 {
            let submission = signed(
                SubmissionPayload::Single(anchor_op(b"x")),
                &account,
                NonceMode::Automatic,
            );
            ledger.submit(submission).await.unwrap();
        }
        let nonce = ledger.account_nonce(&account.address()).await.unwrap();
        assert_eq!(nonce, Nonce::new(3));
    }

    #[tokio::test]
    async fn stale_explicit_nonce_is_rejected() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);

        let first = signed(
            SubmissionPayload::Single(anchor_op(b"a")),
            &account,
            NonceMode::Automatic,
        );
        ledger.submit(first).await.unwrap();

        let stale = signed(
            SubmissionPayload::Single(anchor_op(b"b")),
            &account,
            NonceMode::Explicit(Nonce::new(0)),
        );
        let events = drain(ledger.submit(stale).await.unwrap()).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], SubmissionStatus::Rejected(r) if r.contains("stale nonce")));
    }

    #[tokio::test]
    async fn unknown_account_fails_nonce_lookup_and_submit() {
        let account = Account::dev("//Mallory");
        let ledger = InMemoryLedger::with_timestamp(1);

        let err = ledger.account_nonce(&account.address()).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(_)));

        let submission = signed(
            SubmissionPayload::Single(anchor_op(b"x")),
            &account,
            NonceMode::Automatic,
        );
        let err = ledger.submit(submission).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(_)));
    }

    #[tokio::test]
    async fn invalid_signature_is_rejected() {
        let account = Account::dev("//Eve");
        let forger = Account::dev("//Alice");
        let ledger = registered(&account);

        let payload = SubmissionPayload::Single(anchor_op(b"root"));
        let bytes = SignedSubmission::signing_bytes(&payload).unwrap();
        let submission = SignedSubmission {
            signature: forger.sign(&bytes),
            signer: account.address(),
            nonce: NonceMode::Automatic,
            payload,
        };
        let events = drain(ledger.submit(submission).await.unwrap()).await;
        assert_eq!(
            events,
            vec![SubmissionStatus::Rejected("invalid signature".into())]
        );
    }

    #[tokio::test]
    async fn dispatch_failure_follows_broadcast() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);
        ledger.fail_target("mtype.anchor", FailureMode::Dispatch { module: 2, error: 0 });

        let submission = signed(
            SubmissionPayload::Single(anchor_op(b"dup")),
            &account,
            NonceMode::Automatic,
        );
        let events = drain(ledger.submit(submission).await.unwrap()).await;
        assert_eq!(events[0], SubmissionStatus::Broadcast);
        assert_eq!(
            events[1],
            SubmissionStatus::DispatchError(DispatchFailure::Module { module: 2, error: 0 })
        );
    }

    #[tokio::test]
    async fn oversized_batch_is_refused_at_admission() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);
        ledger.set_batch_limit(2);

        let ops = vec![anchor_op(b"1"), anchor_op(b"2"), anchor_op(b"3")];
        let submission = signed(
            SubmissionPayload::Batch(ops),
            &account,
            NonceMode::Automatic,
        );
        let err = ledger.submit(submission).await.unwrap_err();
        assert_eq!(err, LedgerError::OversizedBatch { limit: 2, len: 3 });
    }

    #[tokio::test]
    async fn batch_members_share_one_block_in_order() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);

        let ops: Vec<Operation> = (0..5)
            .map(|i| anchor_op(format!("item {i}").as_bytes()))
            .collect();
        let submission = signed(
            SubmissionPayload::Batch(ops.clone()),
            &account,
            NonceMode::Automatic,
        );
        let events = drain(ledger.submit(submission).await.unwrap()).await;
        assert!(matches!(events[1], SubmissionStatus::InBlock(_)));

        // Recorded payload preserves construction order.
        let recorded = ledger.submissions();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].operations(), ops.as_slice());
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);

        ledger.timestamp_now().await.unwrap();
        ledger.account_nonce(&account.address()).await.unwrap();
        let submission = signed(
            SubmissionPayload::Single(anchor_op(b"x")),
            &account,
            NonceMode::Automatic,
        );
        ledger.submit(submission).await.unwrap();
        ledger.close().await.unwrap();

        let calls = ledger.calls();
        assert_eq!(calls[0], LedgerCall::TimestampNow);
        assert_eq!(
            calls[1],
            LedgerCall::AccountNonce {
                address: account.address()
            }
        );
        assert_eq!(
            calls[2],
            LedgerCall::Submit {
                batch: false,
                operations: 1
            }
        );
        assert_eq!(calls[3], LedgerCall::Close);
    }

    #[tokio::test]
    async fn closed_connection_refuses_everything() {
        let account = Account::dev("//Eve");
        let ledger = registered(&account);
        ledger.close().await.unwrap();

        assert_eq!(
            ledger.timestamp_now().await.unwrap_err(),
            LedgerError::ConnectionClosed
        );
        assert_eq!(
            ledger.account_nonce(&account.address()).await.unwrap_err(),
            LedgerError::ConnectionClosed
        );
        // close is idempotent
        ledger.close().await.unwrap();
    }

    #[tokio::test]
    async fn fixed_timestamp_is_reported() {
        let ledger = InMemoryLedger::with_timestamp(42);
        assert_eq!(ledger.timestamp_now().await.unwrap(), 42);
    }
}
