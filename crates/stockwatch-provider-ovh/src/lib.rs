// # OVH Inventory Source
//
// This crate provides the OVH dedicated server availability source for
// stockwatch.
//
// ## Behavior
//
// - One GET per plan code, issued sequentially in plan order
// - No retry, no backoff, no caching: the first failure aborts the fetch
// - No timeout override (reqwest defaults apply)
// - No authentication: the availability endpoint is public
//
// ## API Reference
//
// - `GET /v1/dedicated/server/datacenter/availabilities?planCode=<code>`
//
// The response is an array of hardware configurations for the plan. Only the
// first element is used:
//
// ```json
// [
//   {
//     "planCode": "24ska01",
//     "datacenters": [
//       { "datacenter": "bhs", "availability": "unavailable" },
//       { "datacenter": "gra", "availability": "1H-high" }
//     ]
//   }
// ]
// ```
//
// A `datacenters` object keyed by datacenter id
// (`{"bhs": {"availability": "unavailable"}}`) is accepted as well.

use async_trait::async_trait;
use serde_json::Value;
use stockwatch_core::config::DEFAULT_API_BASE;
use stockwatch_core::model::is_available_status;
use stockwatch_core::traits::InventorySource;
use stockwatch_core::{AvailabilityIndex, AvailabilityRecord, Error, PlanSet, PlanSpec, Result};

/// Availability endpoint, relative to the API base
const AVAILABILITY_PATH: &str = "/v1/dedicated/server/datacenter/availabilities";

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "ovh";

/// Status of one datacenter as reported by OVH for a single plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatacenterStatus {
    /// Datacenter id (e.g. "bhs")
    pub datacenter: String,
    /// Raw availability string, `None` if the entry carries none
    pub availability: Option<String>,
}

/// OVH dedicated server availability source
#[derive(Debug, Clone)]
pub struct OvhInventorySource {
    /// API base URL without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl OvhInventorySource {
    /// Create a source against the given API base (e.g. `https://ca.api.ovh.com`)
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Full availability URL, without the query string
    pub fn availability_url(&self) -> String {
        format!("{}{}", self.api_base, AVAILABILITY_PATH)
    }

    /// Query availability for a single plan
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/dedicated/server/datacenter/availabilities?planCode=24ska01
    /// ```
    async fn fetch_plan(&self, plan: &PlanSpec) -> Result<Vec<DatacenterStatus>> {
        let url = self.availability_url();
        tracing::debug!("Querying {} for plan {}", url, plan.plan_code);

        let response = self
            .client
            .get(&url)
            .query(&[("planCode", plan.plan_code.as_str())])
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(Error::provider(
                PROVIDER_NAME,
                format!(
                    "Availability query for plan {} failed: {} - {}",
                    plan.plan_code, status, error_text
                ),
            ));
        }

        let json: Value = response.json().await.map_err(|e| {
            Error::malformed(format!(
                "Plan {}: response is not valid JSON: {}",
                plan.plan_code, e
            ))
        })?;

        parse_availability(&json).map_err(|e| match e {
            Error::MalformedResponse(msg) => {
                Error::malformed(format!("Plan {}: {}", plan.plan_code, msg))
            }
            other => other,
        })
    }
}

impl Default for OvhInventorySource {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl InventorySource for OvhInventorySource {
    async fn fetch(
        &self,
        plans: &PlanSet,
        datacenters: Option<&[String]>,
    ) -> Result<AvailabilityIndex> {
        let mut index = AvailabilityIndex::new();

        for plan in plans {
            let statuses = self.fetch_plan(plan).await?;
            tracing::info!(
                "Plan {} ({}): provider reported {} datacenter(s)",
                plan.plan_name,
                plan.plan_code,
                statuses.len()
            );
            index_plan(&mut index, plan, &statuses, datacenters);
        }

        Ok(index)
    }

    fn source_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Extract per-datacenter statuses from an availability response
///
/// # Returns
///
/// - `Ok(statuses)`: In document order, for both forms
/// - `Err(Error::MalformedResponse)`: Not an array, empty array, or no
///   usable `datacenters` field in the first element
pub fn parse_availability(body: &Value) -> Result<Vec<DatacenterStatus>> {
    let first = body
        .as_array()
        .ok_or_else(|| Error::malformed("expected a JSON array"))?
        .first()
        .ok_or_else(|| Error::malformed("empty availability array"))?;

    let datacenters = first
        .get("datacenters")
        .ok_or_else(|| Error::malformed("first element has no `datacenters` field"))?;

    match datacenters {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| -> Result<DatacenterStatus> {
                let datacenter = entry["datacenter"].as_str().ok_or_else(|| {
                    Error::malformed("datacenter entry has no `datacenter` id")
                })?;
                Ok(DatacenterStatus {
                    datacenter: datacenter.to_string(),
                    availability: entry["availability"].as_str().map(str::to_string),
                })
            })
            .collect(),
        Value::Object(entries) => Ok(entries
            .iter()
            .map(|(datacenter, entry)| DatacenterStatus {
                datacenter: datacenter.clone(),
                availability: entry["availability"].as_str().map(str::to_string),
            })
            .collect()),
        _ => Err(Error::malformed(
            "`datacenters` is neither an array nor an object",
        )),
    }
}

/// Append one plan's records to `index`
///
/// With an explicit datacenter list, exactly those datacenters get a record;
/// any the provider did not report are unavailable. Without one, every
/// reported datacenter gets a record.
pub fn index_plan(
    index: &mut AvailabilityIndex,
    plan: &PlanSpec,
    statuses: &[DatacenterStatus],
    datacenters: Option<&[String]>,
) {
    let mut push = |datacenter: &str, availability: Option<&str>| {
        let record = AvailabilityRecord::new(plan, is_available_status(availability));
        tracing::debug!(
            "{} in {}: {} (available: {})",
            plan.plan_name,
            datacenter,
            availability.unwrap_or("not reported"),
            record.is_available
        );
        index.push(datacenter, record);
    };

    match datacenters {
        Some(wanted) => {
            for datacenter in wanted {
                let availability = statuses
                    .iter()
                    .find(|s| &s.datacenter == datacenter)
                    .and_then(|s| s.availability.as_deref());
                push(datacenter, availability);
            }
        }
        None => {
            for status in statuses {
                push(&status.datacenter, status.availability.as_deref());
            }
        }
    }
}
