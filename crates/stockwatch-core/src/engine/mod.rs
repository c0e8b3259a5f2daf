//! Change detection engine
//!
//! The ChangeEngine is responsible for:
//! - Fetching current availability via InventorySource
//! - Comparing it with the snapshot from StatusStore
//! - Sending one notification per change via Notifier
//! - Persisting the current snapshot
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ InventorySource │─── AvailabilityIndex ───┐
//! └─────────────────┘                         │
//!                                             ▼
//!                                    ┌──────────────┐
//!                                    │ ChangeEngine │
//!                                    └──────────────┘
//!                                             │
//!                   ┌─────────────────────────┼─────────────────────────┐
//!                   │                         │                         │
//!                   ▼                         ▼                         ▼
//!           ┌─────────────┐           ┌──────────────┐          ┌─────────────┐
//!           │ StatusStore │           │   Notifier   │          │ StatusStore │
//!           │ (load)      │           │ (per change) │          │ (save)      │
//!           └─────────────┘           └──────────────┘          └─────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Fetch every plan (all requests complete before any diffing)
//! 2. Load the previous snapshot
//! 3. For each datacenter and record, notify if the value is new or changed
//! 4. Save the current run's snapshot, replacing the previous one

use crate::error::Result;
use crate::model::{AvailabilityIndex, PlanSet, Transition};
use crate::traits::{InventorySource, Notifier, StatusStore};
use tracing::{debug, info, warn};

/// Outcome of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of (datacenter, plan) records examined
    pub records_seen: usize,
    /// Every change that was notified, in notification order
    pub transitions: Vec<Transition>,
    /// Notifications the channel did not accept
    pub delivery_failures: usize,
}

impl RunReport {
    /// Notifications the channel accepted
    pub fn delivered(&self) -> usize {
        self.transitions.len() - self.delivery_failures
    }
}

/// Core change detection engine
///
/// One call to [`ChangeEngine::run`] is one poll. The engine holds no state
/// of its own between runs; everything that must survive lives in the
/// [`StatusStore`].
///
/// ## Ordering
///
/// All work is sequential: each request is awaited before the next one is
/// issued, all fetches finish before any notification, and all notifications
/// are sent before the save.
pub struct ChangeEngine {
    /// Availability provider
    source: Box<dyn InventorySource>,

    /// Notification channel
    notifier: Box<dyn Notifier>,

    /// Snapshot persistence
    store: Box<dyn StatusStore>,
}

impl ChangeEngine {
    /// Create a new engine
    pub fn new(
        source: Box<dyn InventorySource>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn StatusStore>,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
        }
    }

    /// Fetch availability and notify about every change
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: Run completed and the snapshot was saved
    /// - `Err(Error)`: Fetch failed, the notifier is misconfigured, or the
    ///   save failed. Nothing is saved after a fetch failure.
    pub async fn run(&self, plans: &PlanSet, datacenters: Option<&[String]>) -> Result<RunReport> {
        info!(
            "Fetching availability for {} plan(s) from {}",
            plans.len(),
            self.source.source_name()
        );
        let avail = self.source.fetch(plans, datacenters).await?;
        self.notify(&avail).await
    }

    /// Diff `avail` against the stored snapshot, notify, then save
    ///
    /// A pair is notified when it was never observed before or when its
    /// value changed. The saved snapshot is exactly the projection of
    /// `avail`: pairs from earlier runs that were not observed this time are
    /// dropped.
    pub async fn notify(&self, avail: &AvailabilityIndex) -> Result<RunReport> {
        let previous = self.store.load().await;
        let mut report = RunReport::default();

        for (datacenter, records) in avail.iter() {
            for record in records {
                report.records_seen += 1;

                let key = record.status_key();
                let prior = previous.get(datacenter, &key);

                if prior == Some(record.is_available) {
                    debug!(
                        "{} in {} unchanged (available: {})",
                        key, datacenter, record.is_available
                    );
                    continue;
                }

                let transition = Transition::new(datacenter, record, prior);
                info!("Availability changed: {}", transition);

                match self.notifier.send(&transition).await {
                    Ok(()) => {
                        debug!("Notification delivered via {}", self.notifier.notifier_name());
                    }
                    // Unconfigured channel: abort, nothing is saved
                    Err(e) if e.is_config() => return Err(e),
                    Err(e) => {
                        warn!(
                            "Notification for {} via {} failed: {}",
                            transition,
                            self.notifier.notifier_name(),
                            e
                        );
                        report.delivery_failures += 1;
                    }
                }

                report.transitions.push(transition);
            }
        }

        self.store.save(&avail.to_snapshot()).await?;

        info!(
            "Run complete: {} record(s), {} change(s), {} delivery failure(s)",
            report.records_seen,
            report.transitions.len(),
            report.delivery_failures
        );

        Ok(report)
    }
}
