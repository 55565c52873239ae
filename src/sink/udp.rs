//! UDP sink for remote log consoles
//!
//! Each non-empty transmitter write becomes one datagram sent to the configured
//! target.
//! Sends are non-blocking and fire-and-forget: a full socket buffer or an
//! unreachable target drops the datagram.

use super::Sink;
use crate::error::{LoggerError, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{SocketAddr, UdpSocket};
use tracing::{debug, trace};

pub const NAME: &str = "udp";

pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Bind an ephemeral local socket that sends to `target`
    pub fn connect(target: SocketAddr) -> Result<Self> {
        let socket = create_sender_socket(target)?;
        debug!("UDP sink sending to {}", target);
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok()
    }
}

/// Create a non-blocking UDP socket on an ephemeral port of the target's family
fn create_sender_socket(target: SocketAddr) -> Result<UdpSocket> {
    let (domain, bind_addr): (Domain, SocketAddr) = if target.is_ipv4() {
        (Domain::IPV4, SocketAddr::from(([0, 0, 0, 0], 0)))
    } else {
        (Domain::IPV6, SocketAddr::from(([0u16; 8], 0)))
    };
    let map_err = |e| LoggerError::UdpBind {
        addr: bind_addr,
        source: e,
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP)).map_err(map_err)?;
    socket.set_nonblocking(true).map_err(map_err)?;
    socket.bind(&bind_addr.into()).map_err(map_err)?;
    Ok(socket.into())
}

impl Sink for UdpSink {
    fn name(&self) -> &str {
        NAME
    }

    fn transmit(&mut self, bytes: &[u8]) {
        // No zero-length datagrams for empty bodies
        if bytes.is_empty() {
            return;
        }
        if let Err(e) = self.socket.send_to(bytes, self.target) {
            trace!("UDP datagram to {} dropped: {}", self.target, e);
        }
    }
}
