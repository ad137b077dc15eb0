//! Emulated SYS8X00 unit behind a TCP socket, shared by the integration tests.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How the emulated unit answers `VER`
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    /// Always answer, whatever address was selected
    Always(String),
    /// Answer only for the listed addresses; close the connection otherwise
    Bus(HashMap<u8, String>),
    /// Accept the connection but never answer
    Silent,
}

#[allow(dead_code)]
pub struct MockDevice {
    pub port: u16,
    connections: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockDevice {
    pub fn always(reply: &str) -> Self {
        Self::spawn(Reply::Always(reply.to_string()))
    }

    pub fn bus(units: &[(u8, &str)]) -> Self {
        let units = units
            .iter()
            .map(|(address, reply)| (*address, reply.to_string()))
            .collect();
        Self::spawn(Reply::Bus(units))
    }

    pub fn silent() -> Self {
        Self::spawn(Reply::Silent)
    }

    pub fn target(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn spawn(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock device");
        let port = listener.local_addr().expect("local addr").port();
        let connections = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&connections);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = reply.clone();
                thread::spawn(move || serve(stream, &reply));
            }
        });

        Self { port, connections }
    }
}

fn serve(mut stream: TcpStream, reply: &Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(10)));

    let mut received = Vec::new();
    let mut buf = [0u8; 64];
    while !received.windows(4).any(|w| w == b"VER\r") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => received.extend_from_slice(&buf[..n]),
        }
    }

    let text = String::from_utf8_lossy(&received);
    let selected = text
        .split('\r')
        .find_map(|command| command.strip_prefix("ADR "))
        .and_then(|address| address.trim().parse::<u8>().ok());

    let answer = match reply {
        Reply::Always(version) => Some(version.clone()),
        Reply::Bus(units) => selected.and_then(|address| units.get(&address).cloned()),
        Reply::Silent => {
            // Wait for the client to give up
            let _ = stream.read(&mut buf);
            return;
        }
    };

    if let Some(version) = answer {
        let _ = stream.write_all(format!("{}\r\n", version).as_bytes());
        let _ = stream.flush();
        let _ = stream.read(&mut buf);
    }
}
