use crate::core::communication::Connector;
use crate::core::query::VersionQuery;
use crate::domain::config::BusAddress;
use crate::domain::error::Sys8x00Result;
use serde::Serialize;
use tracing::debug;

/// A unit that answered during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    pub address: BusAddress,
    pub response: String,
}

/// Responding units, in ascending address order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub responding: Vec<ScanHit>,
}

/// Progress notifications emitted while scanning
#[derive(Debug)]
pub enum ScanEvent<'a> {
    /// About to query this address
    Probing(BusAddress),
    /// The query for this address finished
    Probed(BusAddress, &'a Sys8x00Result<String>),
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.responding.is_empty()
    }

    pub fn len(&self) -> usize {
        self.responding.len()
    }

    /// `(address, response)` pairs
    pub fn pairs(&self) -> Vec<(u8, String)> {
        self.responding
            .iter()
            .map(|hit| (hit.address.value(), hit.response.clone()))
            .collect()
    }
}

/// Query every bus address from 0 to 63 and collect the ones that reply
pub async fn scan_addresses<C: Connector>(query: &VersionQuery<C>) -> ScanReport {
    scan_addresses_with(query, |_| {}).await
}

/// Sequential scan reporting progress through `on_event`
pub async fn scan_addresses_with<C, F>(query: &VersionQuery<C>, mut on_event: F) -> ScanReport
where
    C: Connector,
    F: FnMut(ScanEvent<'_>),
{
    let mut report = ScanReport::default();

    for address in BusAddress::all() {
        on_event(ScanEvent::Probing(address));

        let outcome = query.try_query(Some(address)).await;
        on_event(ScanEvent::Probed(address, &outcome));

        match outcome {
            Ok(response) => report.responding.push(ScanHit { address, response }),
            Err(e) => debug!("Address {} did not respond: {}", address, e),
        }
    }

    report
}
