use std::sync::Arc;

use tracing::info;

use moor_crypto::{Account, ContentHasher};
use moor_ledger::{ErrorRegistry, LedgerConnection, SubmissionPayload};
use moor_tx::{linked_anchor, root_anchor, seal, Batch, NonceSequencer, Submission};
use moor_types::{BlockRef, ContentHash, NonceMode};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Outcome of a completed anchoring run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineReport {
    /// The run-scoped root hash every linked anchor references.
    pub root_hash: ContentHash,
    /// Block that included the root anchor.
    pub root_block: BlockRef,
    /// Block that included the linked batch.
    pub batch_block: BlockRef,
    /// Number of linked anchors in the batch.
    pub anchored: usize,
}

/// Sequences one anchoring run against a ledger connection.
///
/// The run is a single causal chain: the linked batch is never constructed
/// or submitted before the root submission reaches `InBlock`. Inclusion in
/// a candidate block is accepted as confirmation; the run does not wait for
/// finality. Any rejection or dispatch error ends the run with no partial
/// continuation and no retry.
pub struct Pipeline {
    conn: Arc<dyn LedgerConnection>,
    account: Account,
    registry: Arc<ErrorRegistry>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        conn: Arc<dyn LedgerConnection>,
        account: Account,
        registry: Arc<ErrorRegistry>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            conn,
            account,
            registry,
            config,
        }
    }

    /// Run the pipeline to completion or first failure.
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let now = self.conn.timestamp_now().await?;

        // Confirms the account is known before anything is signed. The
        // submissions themselves use automatic assignment so the root and
        // the batch can go out back-to-back without a confirmation wait.
        let sequencer = NonceSequencer::new(self.conn.as_ref());
        let nonce = sequencer.next(&self.account.address()).await?;
        info!(timestamp = now, nonce = %nonce, "starting anchoring run");

        let descriptor = format!("{}{}", self.config.schema, now);
        let root_hash = ContentHasher::hash(descriptor.as_bytes(), self.config.width);

        let signed = seal(
            SubmissionPayload::Single(root_anchor(&root_hash)),
            &self.account,
            NonceMode::Automatic,
        )?;
        let mut root = Submission::submit(
            self.conn.as_ref(),
            signed,
            Arc::clone(&self.registry),
            "root anchor",
        )
        .await?;
        let root_block = root.wait_for_in_block().await?;
        info!(hash = %root_hash.short_hex(), block = %root_block, "root anchor included");

        // Fan-out construction is pure and has no dependency on ledger
        // state, so it runs in one tight loop before a single submission.
        let mut operations = Vec::with_capacity(self.config.fanout);
        for i in 0..self.config.fanout {
            let link = format!("{}/{}/{}", self.config.link_base, now, i);
            let item_hash = ContentHasher::hash(link.as_bytes(), self.config.width);
            operations.push(linked_anchor(&item_hash, &root_hash));
        }
        let batch = Batch::aggregate(operations)?;
        info!(count = batch.len(), "linked anchors constructed");

        let signed = seal(batch.into_payload(), &self.account, NonceMode::Automatic)?;
        let mut batched = Submission::submit(
            self.conn.as_ref(),
            signed,
            Arc::clone(&self.registry),
            "anchor batch",
        )
        .await?;
        let batch_block = batched.wait_for_in_block().await?;
        info!(block = %batch_block, count = self.config.fanout, "anchor batch included");

        Ok(PipelineReport {
            root_hash,
            root_block,
            batch_block,
            anchored: self.config.fanout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moor_ledger::{
        CallArg, FailureMode, InMemoryLedger, LedgerCall, LedgerError, SubmissionPayload,
    };
    use moor_tx::{TxError, LINKED_ANCHOR_TARGET, ROOT_ANCHOR_TARGET};
    use moor_types::HashWidth;

    const T: u64 = 1_600_000_000_000;

    fn test_config(fanout: usize) -> PipelineConfig {
        PipelineConfig {
            fanout,
            link_base: "https://example.org/anchor".into(),
            ..Default::default()
        }
    }

    fn pipeline(fanout: usize) -> (Arc<InMemoryLedger>, Pipeline) {
        let account = Account::dev("//Eve");
        let ledger = Arc::new(InMemoryLedger::with_timestamp(T));
        ledger.register_account(account.address());
        let pipeline = Pipeline::new(
            Arc::clone(&ledger) as Arc<dyn LedgerConnection>,
            account,
            Arc::new(ErrorRegistry::builtin()),
            test_config(fanout),
        );
        (ledger, pipeline)
    }

    fn expected_root_hash() -> ContentHash {
        ContentHasher::hash(
            format!("{}{}", "{ name, company }", T).as_bytes(),
            HashWidth::W256,
        )
    }

    #[tokio::test]
    async fn end_to_end_run_anchors_root_then_batch() {
        let (ledger, pipeline) = pipeline(5);
        let report = pipeline.run().await.unwrap();

        assert_eq!(report.root_hash, expected_root_hash());
        assert_eq!(report.anchored, 5);
        assert!(report.batch_block.number > report.root_block.number);

        // Exactly one single submission followed by exactly one batch of 5.
        let submits: Vec<LedgerCall> = ledger
            .calls()
            .into_iter()
            .filter(|c| matches!(c, LedgerCall::Submit { .. }))
            .collect();
        assert_eq!(
            submits,
            vec![
                LedgerCall::Submit {
                    batch: false,
                    operations: 1
                },
                LedgerCall::Submit {
                    batch: true,
                    operations: 5
                },
            ]
        );
    }

    #[tokio::test]
    async fn every_linked_anchor_references_the_root() {
        let (ledger, pipeline) = pipeline(5);
        let report = pipeline.run().await.unwrap();

        let recorded = ledger.submissions();
        assert_eq!(recorded.len(), 2);
        let SubmissionPayload::Batch(members) = &recorded[1] else {
            panic!("second submission must be the batch");
        };
        assert_eq!(members.len(), 5);
        for (i, op) in members.iter().enumerate() {
            assert_eq!(op.target, LINKED_ANCHOR_TARGET);
            let link = format!("https://example.org/anchor/{T}/{i}");
            let expected = ContentHasher::hash(link.as_bytes(), HashWidth::W256);
            assert_eq!(op.args[0], CallArg::Hash(expected));
            assert_eq!(op.args[1], CallArg::Hash(report.root_hash.clone()));
            assert_eq!(op.args[2], CallArg::Empty);
        }
    }

    #[tokio::test]
    async fn batch_is_never_submitted_before_root_inclusion() {
        let (ledger, pipeline) = pipeline(3);
        pipeline.run().await.unwrap();

        // The batch submit must come strictly after the root submit in the
        // ledger's call log, and nothing batch-shaped may precede it.
        let calls = ledger.calls();
        let root_at = calls
            .iter()
            .position(|c| matches!(c, LedgerCall::Submit { batch: false, .. }))
            .expect("root submission recorded");
        let batch_at = calls
            .iter()
            .position(|c| matches!(c, LedgerCall::Submit { batch: true, .. }))
            .expect("batch submission recorded");
        assert!(root_at < batch_at);
        assert!(!calls[..root_at]
            .iter()
            .any(|c| matches!(c, LedgerCall::Submit { batch: true, .. })));
    }

    #[tokio::test]
    async fn dispatch_error_on_root_suppresses_the_batch() {
        let (ledger, pipeline) = pipeline(5);
        ledger.fail_target(ROOT_ANCHOR_TARGET, FailureMode::Dispatch { module: 2, error: 0 });

        let err = pipeline.run().await.unwrap_err();
        match err {
            PipelineError::Tx(TxError::Dispatch(detail)) => {
                assert!(detail.contains("mtype.AlreadyAnchored"));
            }
            other => panic!("expected dispatch error, got {other:?}"),
        }

        // No batch submission was ever attempted.
        assert!(!ledger
            .calls()
            .iter()
            .any(|c| matches!(c, LedgerCall::Submit { batch: true, .. })));
    }

    #[tokio::test]
    async fn rejected_root_stops_the_run() {
        let (ledger, pipeline) = pipeline(5);
        ledger.fail_target(ROOT_ANCHOR_TARGET, FailureMode::Reject("underpriced".into()));

        let err = pipeline.run().await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Tx(TxError::Rejected("underpriced".into()))
        );
        assert_eq!(
            ledger
                .calls()
                .iter()
                .filter(|c| matches!(c, LedgerCall::Submit { .. }))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn unknown_account_fails_before_any_submission() {
        let account = Account::dev("//Stranger");
        let ledger = Arc::new(InMemoryLedger::with_timestamp(T));
        let pipeline = Pipeline::new(
            Arc::clone(&ledger) as Arc<dyn LedgerConnection>,
            account,
            Arc::new(ErrorRegistry::builtin()),
            test_config(2),
        );

        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Tx(TxError::Ledger(LedgerError::UnknownAccount(_)))
        ));
        assert!(!ledger
            .calls()
            .iter()
            .any(|c| matches!(c, LedgerCall::Submit { .. })));
    }

    #[tokio::test]
    async fn oversized_batch_surfaces_the_ledger_limit() {
        let (ledger, pipeline) = pipeline(5);
        ledger.set_batch_limit(3);

        let err = pipeline.run().await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Tx(TxError::Ledger(LedgerError::OversizedBatch {
                limit: 3,
                len: 5
            }))
        );
    }

    #[tokio::test]
    async fn root_hash_is_stable_for_a_fixed_timestamp() {
        let (_, first) = pipeline(2);
        let (_, second) = pipeline(2);
        let r1 = first.run().await.unwrap();
        let r2 = second.run().await.unwrap();
        assert_eq!(r1.root_hash, r2.root_hash);
        assert_eq!(r1.root_hash, expected_root_hash());
    }
}
