//! TCP connection to the other peer.
//!
//! Connecting is blocking and happens once, before the match. After the
//! handshake a dedicated reader thread decodes incoming lines and feeds
//! orders into the inbox; the simulation thread only ever writes.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{info, warn};

use lightspeed_core::enums::Team;
use lightspeed_core::orders::Order;

use crate::config::PROTOCOL_VERSION;
use crate::error::{LinkError, LinkResult};
use crate::inbox::{inbox, Inbox};
use crate::wire::{self, PeerMessage};

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    team: Team,
    seed: u64,
    reader: Option<JoinHandle<()>>,
}

impl Connection {
    /// Wait for one peer on `listener`, greet it with the match seed, and
    /// start reading. The host plays Blue.
    pub fn accept(listener: &TcpListener, seed: u64, capacity: usize) -> LinkResult<(Self, Inbox)> {
        let (stream, peer) = listener.accept()?;
        info!(%peer, "peer connected");

        let hello = wire::encode(&PeerMessage::Hello {
            version: PROTOCOL_VERSION,
            seed,
        })?;
        (&stream).write_all(hello.as_bytes())?;

        let reader = BufReader::new(stream.try_clone()?);
        Self::start(stream, reader, peer, Team::Blue, seed, capacity)
    }

    /// Connect to a host and wait for its greeting. The joiner plays Red.
    pub fn connect(addr: impl ToSocketAddrs, capacity: usize) -> LinkResult<(Self, Inbox)> {
        let stream = TcpStream::connect(addr)?;
        let peer = stream.peer_addr()?;
        info!(%peer, "connected to host");

        let mut reader = BufReader::new(stream.try_clone()?);
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(LinkError::Handshake("host closed before greeting".into()));
        }
        let seed = match wire::decode(&line)? {
            PeerMessage::Hello { version, seed } if version == PROTOCOL_VERSION => seed,
            PeerMessage::Hello { version, .. } => {
                return Err(LinkError::Handshake(format!(
                    "host speaks version {version}, expected {PROTOCOL_VERSION}"
                )));
            }
            PeerMessage::Order(_) => {
                return Err(LinkError::Handshake("expected greeting, got an order".into()));
            }
        };
        Self::start(stream, reader, peer, Team::Red, seed, capacity)
    }

    fn start(
        stream: TcpStream,
        reader: BufReader<TcpStream>,
        peer: SocketAddr,
        team: Team,
        seed: u64,
        capacity: usize,
    ) -> LinkResult<(Self, Inbox)> {
        let (tx, inbox) = inbox(capacity);
        let handle = thread::Builder::new()
            .name("lightspeed-reader".into())
            .spawn(move || read_loop(reader, tx))?;
        info!(%peer, ?team, seed, "link established");

        let connection = Self {
            stream,
            peer,
            team,
            seed,
            reader: Some(handle),
        };
        Ok((connection, inbox))
    }

    /// Send one order to the peer.
    pub fn send(&mut self, order: &Order) -> LinkResult<()> {
        let line = wire::encode(&PeerMessage::Order(*order))?;
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;
        Ok(())
    }

    /// The team this side plays.
    pub fn team(&self) -> Team {
        self.team
    }

    /// Seed shared by both sides.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Close both directions and wait for the reader thread to finish.
    pub fn close(&mut self) {
        let Some(handle) = self.reader.take() else {
            return;
        };
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            warn!(error = %e, "shutdown failed");
        }
        if handle.join().is_err() {
            warn!("reader thread panicked");
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Decode lines until the stream ends or the inbox is dropped. Returns
/// (dropping the sender) when done, which the inbox reports as `Closed`.
fn read_loop(reader: BufReader<TcpStream>, tx: Sender<Order>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "peer read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match wire::decode(&line) {
            Ok(PeerMessage::Order(order)) => {
                if tx.send(order).is_err() {
                    break;
                }
            }
            Ok(PeerMessage::Hello { .. }) => warn!("ignoring repeated greeting"),
            Err(e) => warn!(error = %e, "dropping undecodable line"),
        }
    }
    info!("peer reader finished");
}
