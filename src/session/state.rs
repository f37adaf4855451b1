//! Session state: sampling, recording and export of pending judgments.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, CatalogError, SLOT_COUNT};
use crate::upload::{UploadError, UploadSink};

use super::export::{encode_judgments, export_filename, ExportReceipt};
use super::options::SessionOptions;
use super::types::{ComparisonPair, Judgment, SessionPhase};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("catalog has no items to draw from")]
    EmptyCatalog,
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("slot {chosen} is not part of the pair ({slot_a}, {slot_b})")]
    InvalidChoice {
        chosen: usize,
        slot_a: usize,
        slot_b: usize,
    },
    #[error("no pending judgments to export")]
    EmptyExport,
    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),
}

/// State of one labeling session.
///
/// Owned by the caller for the lifetime of the session and never shared
/// between concurrent sessions. The catalog is passed in by reference on each
/// draw.
#[derive(Debug)]
pub struct SessionState {
    tag: Uuid,
    rounds: u64,
    pending: Vec<Judgment>,
    phase: SessionPhase,
    rng: StdRng,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&SessionOptions::default())
    }
}

impl SessionState {
    pub fn new(options: &SessionOptions) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tag = Uuid::new_v4();
        debug!(session = %tag, seeded = options.rng_seed.is_some(), "session started");
        Self {
            tag,
            rounds: 0,
            pending: Vec::new(),
            phase: SessionPhase::Idle,
            rng,
        }
    }

    /// Diagnostic tag for correlating log lines of this session.
    pub fn tag(&self) -> Uuid {
        self.tag
    }

    /// Number of resolved pairs since the session started.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Judgments recorded but not yet exported, in insertion order.
    pub fn pending(&self) -> &[Judgment] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Draw a random item and two distinct random slots of it.
    ///
    /// The item is uniform over the catalog; the slots are drawn uniformly
    /// without replacement and their A/B order is itself random. Consecutive
    /// draws may repeat an item.
    pub fn draw_pair(&mut self, catalog: &Catalog) -> Result<ComparisonPair, SessionError> {
        if catalog.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }

        let item_id = self.rng.gen_range(0..catalog.item_count());
        let item = catalog.get_item(item_id)?;

        let mut slots: [usize; SLOT_COUNT] = std::array::from_fn(|i| i);
        slots.shuffle(&mut self.rng);
        let (slot_a, slot_b) = (slots[0], slots[1]);

        self.phase = SessionPhase::PairDrawn;
        debug!(session = %self.tag, item_id, slot_a, slot_b, "pair drawn");

        Ok(ComparisonPair {
            item_id,
            slot_a,
            text_a: item.variants[slot_a].clone(),
            slot_b,
            text_b: item.variants[slot_b].clone(),
        })
    }

    /// Record that `chosen_slot` won against the other slot of `pair`.
    ///
    /// Leaves the state untouched when `chosen_slot` is not one of the pair's
    /// two slots.
    pub fn record_judgment(
        &mut self,
        pair: &ComparisonPair,
        chosen_slot: usize,
    ) -> Result<Judgment, SessionError> {
        let loser = pair
            .other(chosen_slot)
            .ok_or(SessionError::InvalidChoice {
                chosen: chosen_slot,
                slot_a: pair.slot_a,
                slot_b: pair.slot_b,
            })?;

        let judgment = Judgment {
            item_id: pair.item_id,
            winner: chosen_slot,
            loser,
        };
        self.pending.push(judgment);
        self.rounds += 1;
        self.phase = SessionPhase::Idle;
        debug!(
            session = %self.tag,
            round = self.rounds,
            item_id = judgment.item_id,
            winner = judgment.winner,
            loser = judgment.loser,
            "judgment recorded"
        );
        Ok(judgment)
    }

    /// Upload all pending judgments as one timestamped CSV file.
    ///
    /// Pending judgments are cleared only when the sink reports success; on
    /// any failure they are kept as they were. Fails with
    /// [`SessionError::EmptyExport`] when nothing is pending.
    pub async fn export_pending(
        &mut self,
        sink: &dyn UploadSink,
    ) -> Result<ExportReceipt, SessionError> {
        if self.pending.is_empty() {
            return Err(SessionError::EmptyExport);
        }

        let payload = encode_judgments(&self.pending);
        let filename = export_filename(Utc::now(), &mut self.rng);
        let count = self.pending.len();

        match sink.upload(&filename, payload.as_bytes()).await {
            Ok(receipt) => {
                self.pending.clear();
                info!(
                    session = %self.tag,
                    %filename,
                    judgments = count,
                    location = %receipt.location,
                    "exported judgments"
                );
                Ok(ExportReceipt {
                    filename,
                    judgments: count,
                    location: receipt.location,
                })
            }
            Err(err) => {
                warn!(
                    session = %self.tag,
                    %filename,
                    judgments = count,
                    code = err.code(),
                    error = %err,
                    "export failed; keeping pending judgments"
                );
                Err(SessionError::Upload(err))
            }
        }
    }
}
