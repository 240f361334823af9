// Copyright (C) 2024-present The Pathwire Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::connect::ActiveConnect;
use async_trait::async_trait;
use pathwire_parse_utils::WritablePduWithOneInput;
use pathwire_pcep_pkt::{
    iana::{SessionEstablishmentError, SESSION_ESTABLISHMENT_FAILURE},
    objects::{OpenObject, PcepErrorObject},
    PcepErrorMessage, PcepExtensions, PcepMessage,
};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{io::DuplexStream, sync::Notify};

mod client;
mod negotiator;

pub(crate) const PEER_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 2)), 4189);

pub(crate) const KEEPALIVE: u8 = 30;
pub(crate) const DEAD_TIMER: u8 = 120;

pub(crate) fn local_open() -> OpenObject {
    OpenObject::new(KEEPALIVE, DEAD_TIMER, 1, vec![])
}

pub(crate) fn peer_open(keepalive: u8, dead_timer: u8) -> OpenObject {
    OpenObject::new(keepalive, dead_timer, 7, vec![])
}

pub(crate) fn establishment_error(
    value: SessionEstablishmentError,
    open: Option<OpenObject>,
) -> PcepMessage {
    PcepMessage::Error(PcepErrorMessage::new(
        vec![PcepErrorObject::new(
            SESSION_ESTABLISHMENT_FAILURE,
            value.into(),
            vec![],
        )],
        open,
    ))
}

pub(crate) fn extensions() -> Arc<PcepExtensions> {
    PcepExtensions::standard().unwrap()
}

pub(crate) fn encode(msg: &PcepMessage) -> Vec<u8> {
    let mut buf = vec![];
    msg.write(&mut buf, extensions().as_ref()).unwrap();
    buf
}

/// Wrap [tokio_test::io::Builder] allowing it to accept PcepMessages for read
/// and write mocks rather than `&[u8]`.
#[derive(Default, Debug)]
pub struct PcepIoMockBuilder {
    io_builder: tokio_test::io::Builder,
}

impl PcepIoMockBuilder {
    pub fn new() -> Self {
        Self {
            io_builder: tokio_test::io::Builder::new(),
        }
    }

    pub fn read(&mut self, msg: PcepMessage) -> &mut Self {
        self.io_builder.read(&encode(&msg));
        self
    }

    pub fn read_u8(&mut self, buf: &[u8]) -> &mut Self {
        self.io_builder.read(buf);
        self
    }

    pub fn write(&mut self, msg: PcepMessage) -> &mut Self {
        self.io_builder.write(&encode(&msg));
        self
    }

    pub fn write_error(&mut self, error: io::Error) -> &mut Self {
        self.io_builder.write_error(error);
        self
    }

    pub fn wait(&mut self, duration: Duration) -> &mut Self {
        self.io_builder.wait(duration);
        self
    }

    pub fn build(&mut self) -> tokio_test::io::Mock {
        self.io_builder.build()
    }
}

/// Refuses the first `failures` connects, then hands out one end of an
/// in-memory pipe. The other ends are kept in `peers`.
pub struct FlakyActiveConnect {
    pub failures: u32,
    pub calls: Arc<AtomicU32>,
    pub peers: Arc<std::sync::Mutex<Vec<DuplexStream>>>,
}

impl FlakyActiveConnect {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: Arc::new(AtomicU32::new(0)),
            peers: Arc::new(std::sync::Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl ActiveConnect<SocketAddr, DuplexStream> for FlakyActiveConnect {
    async fn connect(&mut self, peer_addr: SocketAddr) -> io::Result<DuplexStream> {
        assert_eq!(PEER_ADDR, peer_addr);
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "FlakyActiveConnect connection refused",
            ));
        }
        let (local, remote) = tokio::io::duplex(1024);
        self.peers.lock().unwrap().push(remote);
        Ok(local)
    }
}

/// Connects instantly and signals `connected` once the transport is handed
/// out
pub struct NotifyingActiveConnect {
    pub connected: Arc<Notify>,
    pub peer: Arc<std::sync::Mutex<Option<DuplexStream>>>,
}

impl NotifyingActiveConnect {
    pub fn new() -> Self {
        Self {
            connected: Arc::new(Notify::new()),
            peer: Arc::new(std::sync::Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ActiveConnect<SocketAddr, DuplexStream> for NotifyingActiveConnect {
    async fn connect(&mut self, _peer_addr: SocketAddr) -> io::Result<DuplexStream> {
        let (local, remote) = tokio::io::duplex(1024);
        self.peer.lock().unwrap().replace(remote);
        self.connected.notify_one();
        Ok(local)
    }
}

/// Never completes, stands for a peer that drops SYNs
pub struct HangingActiveConnect;

#[async_trait]
impl ActiveConnect<SocketAddr, DuplexStream> for HangingActiveConnect {
    async fn connect(&mut self, _peer_addr: SocketAddr) -> io::Result<DuplexStream> {
        std::future::pending().await
    }
}
