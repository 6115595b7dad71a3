//! Free TCP port discovery on the local host.
//!
//! A port counts as free when nothing accepts a connection on any address
//! `localhost` resolves to. This is a check, not a reservation: another
//! process can still claim the port before it is used.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use flowpack_core::ErrorKind;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(200);

/// First port in `start..=max` with no local listener.
pub fn find_available_port(start: u16, max: u16) -> Result<u16, PortError> {
    for port in start..=max {
        if !is_port_in_use(port) {
            tracing::debug!(port, "found free port");
            return Ok(port);
        }
    }
    Err(PortError::Exhausted { start, max })
}

/// Whether a local TCP connect to `port` succeeds.
pub fn is_port_in_use(port: u16) -> bool {
    localhost_addrs(port)
        .iter()
        .any(|addr| TcpStream::connect_timeout(addr, CONNECT_TIMEOUT).is_ok())
}

fn localhost_addrs(port: u16) -> Vec<SocketAddr> {
    let loopback = SocketAddr::from(([127, 0, 0, 1], port));
    match ("localhost", port).to_socket_addrs() {
        Ok(addrs) => {
            let mut addrs: Vec<SocketAddr> = addrs.collect();
            if !addrs.contains(&loopback) {
                addrs.push(loopback);
            }
            addrs
        }
        Err(e) => {
            tracing::debug!(error = %e, "localhost did not resolve, using 127.0.0.1");
            vec![loopback]
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("no available port found in range {start}-{max}")]
    Exhausted { start: u16, max: u16 },
}

impl PortError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Exhausted { .. } => ErrorKind::ResourceExhausted,
        }
    }
}
