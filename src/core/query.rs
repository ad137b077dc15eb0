use crate::core::communication::{decode_reply, Connector, DeviceCommand, Link};
use crate::domain::config::{BusAddress, QueryOptions};
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use tracing::{debug, info, warn};

/// Version query against one transport target.
///
/// Every query opens its own connection and drops it when done.
pub struct VersionQuery<C: Connector> {
    connector: C,
    options: QueryOptions,
}

impl<C: Connector> VersionQuery<C> {
    pub fn new(connector: C, options: QueryOptions) -> Self {
        Self { connector, options }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run one `[ADR nn] VER` exchange and return the decoded reply.
    ///
    /// An empty reply counts as no response.
    pub async fn try_query(&self, address: Option<BusAddress>) -> Sys8x00Result<String> {
        let mut link = self.connector.connect(self.options.timeout).await?;

        if let Some(address) = address {
            link.send(&DeviceCommand::Address(address).encode()).await?;
            debug!("Selected bus address {}", address);
            tokio::time::sleep(self.options.settle).await;
        }

        link.send(&DeviceCommand::Version.encode()).await?;

        let raw = link.read_reply().await?;
        debug!("Received {} byte reply", raw.len());

        let response = decode_reply(&raw)?;
        if response.is_empty() {
            return Err(Sys8x00Error::NoResponse);
        }

        info!("Version reply: {}", response);
        Ok(response)
    }

    /// Like [`try_query`](Self::try_query), with every failure mapped to `None`
    pub async fn query(&self, address: Option<BusAddress>) -> Option<String> {
        match self.try_query(address).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(
                    "{} communication error: {}",
                    self.connector.transport_type().label(),
                    e
                );
                None
            }
        }
    }
}
