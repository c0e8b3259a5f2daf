//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! drives its collaborators without doing any real I/O.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stockwatch_core::error::{Error, Result};
use stockwatch_core::model::{AvailabilityIndex, AvailabilityRecord, PlanSet, PlanSpec, Transition};
use stockwatch_core::traits::{InventorySource, Notifier};

/// An InventorySource that returns a fixed index and counts calls
pub struct StaticInventorySource {
    index: AvailabilityIndex,
    fetch_call_count: Arc<AtomicUsize>,
}

impl StaticInventorySource {
    pub fn new(index: AvailabilityIndex) -> Self {
        Self {
            index,
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Create a source returning `index` that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self, index: AvailabilityIndex) -> Self {
        Self {
            index,
            fetch_call_count: Arc::clone(&other.fetch_call_count),
        }
    }
}

#[async_trait::async_trait]
impl InventorySource for StaticInventorySource {
    async fn fetch(
        &self,
        _plans: &PlanSet,
        _datacenters: Option<&[String]>,
    ) -> Result<AvailabilityIndex> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.index.clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// An InventorySource whose provider always answers with garbage
pub struct MalformedInventorySource;

#[async_trait::async_trait]
impl InventorySource for MalformedInventorySource {
    async fn fetch(
        &self,
        _plans: &PlanSet,
        _datacenters: Option<&[String]>,
    ) -> Result<AvailabilityIndex> {
        Err(Error::malformed("response is not an array"))
    }

    fn source_name(&self) -> &'static str {
        "malformed"
    }
}

/// How a [`RecordingNotifier`] answers each send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accept,
    /// Channel rejects the message (e.g. HTTP 500)
    Reject,
    /// Notifier has no destination configured
    Unconfigured,
}

/// A Notifier that records every transition it is asked to send
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Transition>>>,
    delivery: Delivery,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::with_delivery(Delivery::Accept)
    }

    pub fn with_delivery(delivery: Delivery) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            delivery,
        }
    }

    /// Every transition passed to send(), including rejected ones
    pub fn sent(&self) -> Vec<Transition> {
        self.sent.lock().unwrap().clone()
    }

    /// Rendered messages, in send order
    pub fn messages(&self) -> Vec<String> {
        self.sent().iter().map(Transition::message).collect()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Create a new notifier that shares its log with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            sent: Arc::clone(&other.sent),
            delivery: other.delivery,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, transition: &Transition) -> Result<()> {
        self.sent.lock().unwrap().push(transition.clone());
        match self.delivery {
            Delivery::Accept => Ok(()),
            Delivery::Reject => Err(Error::http("500 Internal Server Error")),
            Delivery::Unconfigured => Err(Error::config("webhook URL is not set")),
        }
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// Build a record for `name`/`code`
pub fn record(name: &str, code: &str, is_available: bool) -> AvailabilityRecord {
    AvailabilityRecord::new(&PlanSpec::new(name, code), is_available)
}

/// The plan set used by most tests
pub fn ks_a_plans() -> PlanSet {
    PlanSet::new().with("KS-A", "24ska01")
}
