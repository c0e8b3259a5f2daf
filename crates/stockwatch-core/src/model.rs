//! Data model shared by sources, stores and the engine
//!
//! - [`PlanSet`]: ordered, name-unique set of plans to query
//! - [`AvailabilityIndex`]: one run's observations, keyed by datacenter
//! - [`StatusSnapshot`]: the persisted boolean projection of an index
//! - [`Transition`]: a single availability change to notify about

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Provider status string that marks a plan as out of stock
pub const UNAVAILABLE_STATUS: &str = "unavailable";

/// A plan to watch: display name plus provider plan code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSpec {
    /// Human-readable plan name (e.g. "KS-A")
    pub plan_name: String,
    /// Provider plan code (e.g. "24ska01")
    pub plan_code: String,
}

impl PlanSpec {
    /// Create a new plan
    pub fn new(plan_name: impl Into<String>, plan_code: impl Into<String>) -> Self {
        Self {
            plan_name: plan_name.into(),
            plan_code: plan_code.into(),
        }
    }
}

/// Ordered mapping of plan name to plan code
///
/// Iteration order is insertion order. Inserting a name that is already
/// present replaces its code in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanSet {
    plans: Vec<PlanSpec>,
}

impl PlanSet {
    /// Create an empty plan set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plan, replacing the code of an existing plan with the same name
    pub fn insert(&mut self, plan_name: impl Into<String>, plan_code: impl Into<String>) {
        let plan = PlanSpec::new(plan_name, plan_code);
        match self.plans.iter_mut().find(|p| p.plan_name == plan.plan_name) {
            Some(existing) => existing.plan_code = plan.plan_code,
            None => self.plans.push(plan),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, plan_name: impl Into<String>, plan_code: impl Into<String>) -> Self {
        self.insert(plan_name, plan_code);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanSpec> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl<'a> IntoIterator for &'a PlanSet {
    type Item = &'a PlanSpec;
    type IntoIter = std::slice::Iter<'a, PlanSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.plans.iter()
    }
}

/// Parses `"KS-A=24ska01,KS-B=24skb01"`
impl FromStr for PlanSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut plans = PlanSet::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, code) = entry.split_once('=').ok_or_else(|| {
                Error::config(format!("Plan entry '{}' must be of the form name=code", entry))
            })?;
            let (name, code) = (name.trim(), code.trim());
            if name.is_empty() || code.is_empty() {
                return Err(Error::config(format!(
                    "Plan entry '{}' has an empty name or code",
                    entry
                )));
            }
            plans.insert(name, code);
        }
        Ok(plans)
    }
}

/// Availability of one plan in one datacenter, as observed in a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub plan_name: String,
    pub plan_code: String,
    pub is_available: bool,
}

impl AvailabilityRecord {
    pub fn new(plan: &PlanSpec, is_available: bool) -> Self {
        Self {
            plan_name: plan.plan_name.clone(),
            plan_code: plan.plan_code.clone(),
            is_available,
        }
    }

    /// Composite key used in the persisted snapshot: `{plan_name}_{plan_code}`
    pub fn status_key(&self) -> String {
        format!("{}_{}", self.plan_name, self.plan_code)
    }
}

/// Whether a provider status string means "in stock"
///
/// Only the exact sentinel `"unavailable"` counts as out of stock; every
/// other status, including ones we have never seen, counts as available.
pub fn is_available_status(status: Option<&str>) -> bool {
    matches!(status, Some(s) if s != UNAVAILABLE_STATUS)
}

/// Records of a single run grouped by datacenter
///
/// Datacenters keep first-seen order; records within a datacenter keep the
/// order they were pushed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    entries: Vec<(String, Vec<AvailabilityRecord>)>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to a datacenter, registering the datacenter on first use
    pub fn push(&mut self, datacenter: &str, record: AvailabilityRecord) {
        match self.entries.iter_mut().find(|(dc, _)| dc == datacenter) {
            Some((_, records)) => records.push(record),
            None => self.entries.push((datacenter.to_string(), vec![record])),
        }
    }

    /// Builder-style push, handy for tests
    pub fn with(mut self, datacenter: &str, record: AvailabilityRecord) -> Self {
        self.push(datacenter, record);
        self
    }

    /// Records observed for a datacenter
    pub fn get(&self, datacenter: &str) -> Option<&[AvailabilityRecord]> {
        self.entries
            .iter()
            .find(|(dc, _)| dc == datacenter)
            .map(|(_, records)| records.as_slice())
    }

    /// Iterate datacenters in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AvailabilityRecord])> {
        self.entries
            .iter()
            .map(|(dc, records)| (dc.as_str(), records.as_slice()))
    }

    pub fn datacenters(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(dc, _)| dc.as_str())
    }

    /// Number of datacenters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of (datacenter, plan) records
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    /// Boolean projection of this run, as it will be persisted
    pub fn to_snapshot(&self) -> StatusSnapshot {
        let mut snapshot = StatusSnapshot::new();
        for (datacenter, records) in self.iter() {
            snapshot.ensure_datacenter(datacenter);
            for record in records {
                snapshot.insert(datacenter, record.status_key(), record.is_available);
            }
        }
        snapshot
    }
}

/// Last known availability per datacenter and composite plan key
///
/// A missing key means "never observed", which is distinct from `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusSnapshot {
    datacenters: BTreeMap<String, BTreeMap<String, bool>>,
}

impl StatusSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously observed value, `None` if never observed
    pub fn get(&self, datacenter: &str, key: &str) -> Option<bool> {
        self.datacenters
            .get(datacenter)
            .and_then(|plans| plans.get(key))
            .copied()
    }

    pub fn insert(&mut self, datacenter: &str, key: impl Into<String>, available: bool) {
        self.datacenters
            .entry(datacenter.to_string())
            .or_default()
            .insert(key.into(), available);
    }

    /// Builder-style insert
    pub fn with(mut self, datacenter: &str, key: impl Into<String>, available: bool) -> Self {
        self.insert(datacenter, key, available);
        self
    }

    /// Register a datacenter even if no plan ends up under it
    pub fn ensure_datacenter(&mut self, datacenter: &str) {
        self.datacenters.entry(datacenter.to_string()).or_default();
    }

    pub fn datacenter(&self, datacenter: &str) -> Option<&BTreeMap<String, bool>> {
        self.datacenters.get(datacenter)
    }

    /// Number of (datacenter, plan) entries
    pub fn len(&self) -> usize {
        self.datacenters.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk document: informational timestamp plus the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// ISO-8601 time of the save; informational only
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub status: StatusSnapshot,
}

impl StoredDocument {
    /// Wrap a snapshot with the current local time
    pub fn now(status: StatusSnapshot) -> Self {
        Self {
            last_updated: Some(chrono::Local::now().to_rfc3339()),
            status,
        }
    }
}

/// An availability change for one plan in one datacenter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub datacenter: String,
    pub plan_name: String,
    pub plan_code: String,
    /// `None` when the pair was never observed before
    pub previous: Option<bool>,
    pub current: bool,
}

impl Transition {
    pub fn new(datacenter: &str, record: &AvailabilityRecord, previous: Option<bool>) -> Self {
        Self {
            datacenter: datacenter.to_string(),
            plan_name: record.plan_name.clone(),
            plan_code: record.plan_code.clone(),
            previous,
            current: record.is_available,
        }
    }

    pub fn state_label(&self) -> &'static str {
        if self.current {
            "now available"
        } else {
            "no longer available"
        }
    }

    /// Human-readable notification text
    pub fn message(&self) -> String {
        format!(
            "🚨  Server plan {} ({}) is {} in datacenter {}!  🚨",
            self.plan_name,
            self.plan_code,
            self.state_label(),
            self.datacenter
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}_{}: {:?} -> {}",
            self.datacenter, self.plan_name, self.plan_code, self.previous, self.current
        )
    }
}
