// # Inventory Source Trait
//
// Defines the interface for querying a hosting provider's stock of
// dedicated servers.
//
// ## Implementations
//
// - OVH: `stockwatch-provider-ovh` crate
//
// ## Usage
//
// ```rust,ignore
// use stockwatch_core::{InventorySource, PlanSet};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* InventorySource implementation */;
//     let plans = PlanSet::new().with("KS-A", "24ska01");
//     let datacenters = vec!["bhs".to_string()];
//
//     let index = source.fetch(&plans, Some(datacenters.as_slice())).await?;
//     for (datacenter, records) in index.iter() {
//         println!("{datacenter}: {records:?}");
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{AvailabilityIndex, PlanSet};

/// Trait for inventory source implementations
///
/// # Contract
///
/// - One outbound request per plan, issued sequentially in plan order
/// - No retries: the first failure aborts the whole fetch
/// - When `datacenters` is `Some`, exactly those datacenters appear in the
///   result for every plan; a datacenter the provider does not report is
///   recorded as unavailable
/// - When `datacenters` is `None`, every datacenter the provider reports is used
/// - Datacenters appear in first-seen order, records in plan order
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch availability for every plan
    ///
    /// # Returns
    ///
    /// - `Ok(AvailabilityIndex)`: One record per (plan, datacenter)
    /// - `Err(Error)`: Transport failure or a response of unexpected shape
    async fn fetch(
        &self,
        plans: &PlanSet,
        datacenters: Option<&[String]>,
    ) -> Result<AvailabilityIndex, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
