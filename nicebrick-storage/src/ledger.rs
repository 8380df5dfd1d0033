//! Per-day vote ledger over a [`KvStore`].
//!
//! For each `(dateKey, index)` pair the ledger keeps a likes counter, a
//! dislikes counter and a voter set. A subject may vote once per pair; a
//! repeated vote is a no-op that reports `already_voted`.

use std::sync::Arc;

use nicebrick_core::{
    DateKey, LedgerKey, StorageError, SubjectId, VoteKind, VoteOutcome, VoteStatus, VoteTally,
};

use crate::kv::KvStore;

/// A read that may have been served from the zero fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRead<T> {
    pub value: T,
    /// The store was unreachable and `value` is the default.
    pub degraded: bool,
}

impl<T> LedgerRead<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> LedgerRead<T> {
    fn fallback() -> Self {
        Self {
            value: T::default(),
            degraded: true,
        }
    }
}

/// Vote ledger.
///
/// Cloning shares the store handle.
#[derive(Clone)]
pub struct VoteLedger {
    store: Arc<dyn KvStore>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Current tally. Never fails: an unreachable store reads as zero with
    /// `degraded` set.
    pub async fn get_tally(&self, date_key: &DateKey, index: usize) -> LedgerRead<VoteTally> {
        let key = LedgerKey::new(date_key.clone(), index);
        match self.read_tally(&key).await {
            Ok(tally) => LedgerRead::live(tally),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    date_key = %date_key,
                    index,
                    backend = self.backend_name(),
                    "Tally read failed, serving zero tally"
                );
                LedgerRead::fallback()
            }
        }
    }

    /// Tally plus whether `subject_id` has voted. Degrades like [`get_tally`].
    ///
    /// [`get_tally`]: Self::get_tally
    pub async fn status(
        &self,
        subject_id: SubjectId,
        date_key: &DateKey,
        index: usize,
    ) -> LedgerRead<VoteStatus> {
        let key = LedgerKey::new(date_key.clone(), index);
        match self.read_status(subject_id, &key).await {
            Ok(status) => LedgerRead::live(status),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    subject_id = %subject_id,
                    date_key = %date_key,
                    index,
                    "Vote status read failed, serving zero status"
                );
                LedgerRead::fallback()
            }
        }
    }

    /// Record a vote for `subject_id`, at most once per `(date_key, index)`.
    ///
    /// The voter-set add and the counter increment go to the store as one
    /// [`KvStore::record_vote`] call: the counter moves only when the add
    /// reports a new member, and a failed call leaves neither behind, so the
    /// subject can retry. Two concurrent duplicate votes increment at most
    /// once.
    ///
    /// Store failures are returned, never masked as success.
    pub async fn cast_vote(
        &self,
        subject_id: SubjectId,
        date_key: &DateKey,
        index: usize,
        kind: VoteKind,
    ) -> Result<VoteOutcome, StorageError> {
        let key = LedgerKey::new(date_key.clone(), index);

        let newly_added = self
            .store
            .record_vote(
                &key.voters_key(),
                &subject_id.to_string(),
                &key.counter_key(kind),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    subject_id = %subject_id,
                    ledger_key = %key,
                    kind = %kind,
                    "Vote record failed"
                );
                e
            })?;

        if newly_added {
            tracing::info!(
                subject_id = %subject_id,
                date_key = %date_key,
                index,
                kind = %kind,
                "Vote recorded"
            );
        } else {
            tracing::debug!(
                subject_id = %subject_id,
                ledger_key = %key,
                "Duplicate vote ignored"
            );
        }

        let tally = self.read_tally(&key).await?;
        Ok(VoteOutcome {
            tally,
            already_voted: !newly_added,
        })
    }

    async fn read_status(
        &self,
        subject_id: SubjectId,
        key: &LedgerKey,
    ) -> Result<VoteStatus, StorageError> {
        let has_voted = self
            .store
            .sismember(&key.voters_key(), &subject_id.to_string())
            .await?;
        let tally = self.read_tally(key).await?;
        Ok(VoteStatus { tally, has_voted })
    }

    async fn read_tally(&self, key: &LedgerKey) -> Result<VoteTally, StorageError> {
        let likes = self.store.get(&key.likes_key()).await?.unwrap_or(0);
        let dislikes = self.store.get(&key.dislikes_key()).await?.unwrap_or(0);
        Ok(VoteTally { likes, dislikes })
    }
}

impl std::fmt::Debug for VoteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteLedger")
            .field("backend", &self.backend_name())
            .finish()
    }
}
