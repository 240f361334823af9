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

use crate::{
    client::{ClientError, PcepClient},
    config::{ReconnectConfigBuilder, SessionConfigBuilder},
    connect::ActiveConnect,
    negotiator::{AcceptAllPolicy, NegotiationError},
    reconnect::{ReconnectController, ReconnectError},
    session::SessionState,
    tests::{
        encode, extensions, local_open, peer_open, FlakyActiveConnect, PcepIoMockBuilder,
        PEER_ADDR,
    },
};
use async_trait::async_trait;
use pathwire_pcep_pkt::{objects::CloseObject, PcepMessage};
use std::{collections::VecDeque, io, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{io::AsyncReadExt, time::Instant};
use tokio_test::io::Mock;

/// Hands out one prepared transport per connect
struct SequenceActiveConnect {
    transports: VecDeque<Mock>,
}

#[async_trait]
impl ActiveConnect<SocketAddr, Mock> for SequenceActiveConnect {
    async fn connect(&mut self, _peer_addr: SocketAddr) -> io::Result<Mock> {
        self.transports
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "no transport left"))
    }
}

fn peer_closes() -> Mock {
    PcepIoMockBuilder::new()
        .write(PcepMessage::Open(local_open()))
        .read(PcepMessage::Close(CloseObject::new(1, vec![])))
        .build()
}

fn peer_accepts() -> Mock {
    PcepIoMockBuilder::new()
        .write(PcepMessage::Open(local_open()))
        .read(PcepMessage::Open(peer_open(30, 120)))
        .write(PcepMessage::Keepalive)
        .read(PcepMessage::Keepalive)
        .build()
}

fn client(
    transports: Vec<Mock>,
    retry_delay: u16,
) -> PcepClient<SocketAddr, Mock, SequenceActiveConnect, AcceptAllPolicy> {
    let connector = SequenceActiveConnect {
        transports: transports.into(),
    };
    let reconnect = ReconnectConfigBuilder::new()
        .retry_delay(retry_delay)
        .build();
    PcepClient::new(
        ReconnectController::new(PEER_ADDR, reconnect, connector),
        SessionConfigBuilder::new().session_id(1).build(),
        extensions(),
        AcceptAllPolicy,
    )
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_retry_after_failed_negotiation() {
    let client = client(vec![peer_closes(), peer_accepts()], 5);
    let session = client.connect().await.unwrap();
    assert_eq!(session.state(), SessionState::Up);
    assert_eq!(session.remote(), &peer_open(30, 120));
    assert_eq!(client.controller().attempts(), 2);
}

#[test_log::test(tokio::test)]
async fn test_failed_negotiation_without_retry() {
    let client = client(vec![peer_closes(), peer_accepts()], 0);
    let result = client.connect().await;
    assert_eq!(
        result.err(),
        Some(ClientError::Negotiation(NegotiationError::PeerClosed(1)))
    );
    assert_eq!(client.controller().attempts(), 1);
}

#[test_log::test(tokio::test)]
async fn test_cancelled_client() {
    let client = client(vec![], 5);
    client.cancel();
    assert_eq!(
        client.connect().await.err(),
        Some(ClientError::Reconnect(ReconnectError::Cancelled))
    );
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_cancel_during_negotiation() {
    let connector = FlakyActiveConnect::new(0);
    let peers = Arc::clone(&connector.peers);
    let controller = ReconnectController::new(
        PEER_ADDR,
        ReconnectConfigBuilder::new().build(),
        connector,
    );
    let canceller = controller.clone();
    let client = PcepClient::new(
        controller,
        SessionConfigBuilder::new().session_id(1).build(),
        extensions(),
        AcceptAllPolicy,
    );

    // Peer never answers our Open, OpenWait is far away
    let started = Instant::now();
    let cancel = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });
    assert_eq!(
        client.connect().await.err(),
        Some(ClientError::Reconnect(ReconnectError::Cancelled))
    );
    assert!(started.elapsed() < Duration::from_secs(2));
    cancel.await.unwrap();
    assert_eq!(client.controller().attempts(), 1);

    // Transport was dropped, the peer sees our Open then EOF
    let mut peer = peers.lock().unwrap().pop().unwrap();
    let mut received = vec![];
    peer.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, encode(&PcepMessage::Open(local_open())));
}
