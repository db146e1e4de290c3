//! Host list projection.

use serde::Serialize;

use crate::error::Result;
use crate::types::{ActiveHosts, Currency, HostSettings};

/// The subset of a host's announced settings the explorer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDisplayInfo {
    pub ip_address: String,
    pub total_storage: i64,
    pub price: Currency,
}

impl From<&HostSettings> for HostDisplayInfo {
    fn from(settings: &HostSettings) -> Self {
        Self {
            ip_address: settings.ip_address.clone(),
            total_storage: settings.total_storage,
            price: settings.price,
        }
    }
}

/// Decodes a raw `/hostdb/hosts/active` payload into display rows, in daemon order.
pub fn display_hosts(raw: &[u8]) -> Result<Vec<HostDisplayInfo>> {
    let active: ActiveHosts = serde_json::from_slice(raw)?;
    Ok(active.hosts.iter().map(HostDisplayInfo::from).collect())
}
