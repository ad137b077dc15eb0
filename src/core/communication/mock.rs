//! In-memory transport used by unit tests to emulate a SYS8X00 bus.

use super::transport::{Connector, Link, TransportType};
use crate::domain::error::{Sys8x00Error, Sys8x00Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    /// Answer `VER` with a fixed reply, whatever the address
    Respond(Vec<u8>),
    /// Never answer
    Silent,
    /// Refuse every connection
    Refuse,
    /// Answer only when addressed to one of the listed units
    Bus(HashMap<u8, String>),
}

/// Mock connector that hands out links to an emulated device
#[derive(Debug, Clone)]
pub struct MockConnector {
    behavior: Arc<Behavior>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    connections: Arc<AtomicUsize>,
}

pub struct MockLink {
    behavior: Arc<Behavior>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    selected: Option<u8>,
    version_requested: bool,
}

impl MockConnector {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            sent: Arc::new(Mutex::new(Vec::new())),
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn responding(reply: &[u8]) -> Self {
        Self::with_behavior(Behavior::Respond(reply.to_vec()))
    }

    pub fn silent() -> Self {
        Self::with_behavior(Behavior::Silent)
    }

    pub fn refusing() -> Self {
        Self::with_behavior(Behavior::Refuse)
    }

    pub fn bus(units: &[(u8, &str)]) -> Self {
        let units = units
            .iter()
            .map(|(address, reply)| (*address, reply.to_string()))
            .collect();
        Self::with_behavior(Behavior::Bus(units))
    }

    /// Every frame written through any link, in order
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Link = MockLink;

    fn transport_type(&self) -> TransportType {
        TransportType::Tcp
    }

    async fn connect(&self, _timeout: Duration) -> Sys8x00Result<MockLink> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        if matches!(*self.behavior, Behavior::Refuse) {
            return Err(Sys8x00Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        Ok(MockLink {
            behavior: Arc::clone(&self.behavior),
            sent: Arc::clone(&self.sent),
            selected: None,
            version_requested: false,
        })
    }
}

#[async_trait]
impl Link for MockLink {
    async fn send(&mut self, data: &[u8]) -> Sys8x00Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(data.to_vec());
        }

        let text = String::from_utf8_lossy(data);
        if let Some(address) = text.strip_prefix("ADR ") {
            self.selected = address.trim().parse().ok();
        } else if text == "VER\r" {
            self.version_requested = true;
        }
        Ok(())
    }

    async fn read_reply(&mut self) -> Sys8x00Result<Vec<u8>> {
        if !self.version_requested {
            return Err(Sys8x00Error::Timeout);
        }

        match &*self.behavior {
            Behavior::Respond(reply) => Ok(reply.clone()),
            Behavior::Bus(units) => self
                .selected
                .and_then(|address| units.get(&address))
                .map(|reply| format!("{}\r", reply).into_bytes())
                .ok_or(Sys8x00Error::Timeout),
            Behavior::Silent | Behavior::Refuse => Err(Sys8x00Error::Timeout),
        }
    }
}
