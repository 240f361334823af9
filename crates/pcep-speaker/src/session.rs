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

//! Established PCEP sessions and the negotiation that produces them

use crate::{
    config::SessionConfig,
    negotiator::{
        NegotiatedProposals, NegotiationError, NegotiationEvent, NegotiationPolicy,
        NegotiationState, SessionNegotiator,
    },
};
use chrono::prelude::*;
use futures::{SinkExt, StreamExt};
use futures_util::FutureExt;
use pathwire_pcep_pkt::{
    codec::{PcepCodec, PcepCodecDecoderError},
    iana::CloseReason,
    objects::{CloseObject, OpenObject},
    wire::serializer::PcepMessageWritingError,
    PcepExtensions, PcepMessage,
};
use std::{collections::VecDeque, fmt::Display, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    time::{Instant, Interval},
};
use tokio_util::codec::Framed;

/// Window the unknown message limit applies to
const UNKNOWN_MESSAGES_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Copy, Clone)]
pub struct SessionStats {
    created: DateTime<Utc>,
    messages_received: u64,
    messages_sent: u64,
    keepalive_received: u64,
    keepalive_sent: u64,
    unknown_received: u64,
    last_received: Option<DateTime<Utc>>,
    last_sent: Option<DateTime<Utc>>,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            created: Utc::now(),
            messages_received: 0,
            messages_sent: 0,
            keepalive_received: 0,
            keepalive_sent: 0,
            unknown_received: 0,
            last_received: None,
            last_sent: None,
        }
    }
}

impl SessionStats {
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub const fn messages_received(&self) -> u64 {
        self.messages_received
    }

    pub const fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    pub const fn keepalive_received(&self) -> u64 {
        self.keepalive_received
    }

    pub const fn keepalive_sent(&self) -> u64 {
        self.keepalive_sent
    }

    pub const fn unknown_received(&self) -> u64 {
        self.unknown_received
    }

    pub const fn last_received(&self) -> Option<DateTime<Utc>> {
        self.last_received
    }

    pub const fn last_sent(&self) -> Option<DateTime<Utc>> {
        self.last_sent
    }

    fn record_received(&mut self, msg: &PcepMessage) {
        self.messages_received += 1;
        self.last_received = Some(Utc::now());
        match msg {
            PcepMessage::Keepalive => self.keepalive_received += 1,
            PcepMessage::Unrecognized(_) => self.unknown_received += 1,
            _ => {}
        }
    }

    fn record_sent(&mut self, msg: &PcepMessage) {
        self.messages_sent += 1;
        self.last_sent = Some(Utc::now());
        if let PcepMessage::Keepalive = msg {
            self.keepalive_sent += 1;
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum_macros::Display)]
pub enum SessionState {
    Up,
    Closed,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,

    #[error("nothing received from the peer within the dead timer")]
    DeadTimerExpired,

    #[error("more than {0} unrecognized messages within a minute")]
    TooManyUnknownMessages(usize),

    #[error("malformed message: {0:?}")]
    Decode(PcepCodecDecoderError),

    #[error("failed to send message: {0:?}")]
    Write(PcepMessageWritingError),
}

fn start_timer(period: Duration) -> Option<Interval> {
    if period.is_zero() {
        return None;
    }
    let mut interval = tokio::time::interval(period);
    interval.reset();
    Some(interval)
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        None => std::future::pending().await,
        Some(interval) => {
            interval.tick().await;
        }
    }
}

enum Wakeup {
    KeepaliveTimer,
    DeadTimer,
    Received(Option<Result<PcepMessage, PcepCodecDecoderError>>),
}

/// A negotiated session, owning the transport.
///
/// Keepalives are sent and consumed by the session itself, every other
/// message is handed to the caller of [PcepSession::recv].
#[derive(Debug)]
pub struct PcepSession<A, I: AsyncRead + AsyncWrite> {
    peer_addr: A,
    state: SessionState,
    proposals: NegotiatedProposals,
    inner: Framed<I, PcepCodec>,
    stats: SessionStats,
    keepalive_timer: Option<Interval>,
    dead_timer: Option<Interval>,
    max_unknown_messages: usize,
    unknown_messages: VecDeque<Instant>,
}

impl<A: Display, I: AsyncRead + AsyncWrite + Unpin> PcepSession<A, I> {
    /// Our keepalive paces what we send, the dead timer the peer announced
    /// bounds how long it may stay silent.
    pub fn new(
        peer_addr: A,
        inner: Framed<I, PcepCodec>,
        proposals: NegotiatedProposals,
        stats: SessionStats,
        max_unknown_messages: usize,
    ) -> Self {
        let keepalive = Duration::from_secs(proposals.local().keepalive() as u64);
        let dead_timer = Duration::from_secs(proposals.remote().dead_timer() as u64);
        Self {
            peer_addr,
            state: SessionState::Up,
            proposals,
            inner,
            stats,
            keepalive_timer: start_timer(keepalive),
            dead_timer: start_timer(dead_timer),
            max_unknown_messages,
            unknown_messages: VecDeque::new(),
        }
    }

    pub const fn peer_addr(&self) -> &A {
        &self.peer_addr
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn local(&self) -> &OpenObject {
        self.proposals.local()
    }

    pub const fn remote(&self) -> &OpenObject {
        self.proposals.remote()
    }

    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub const fn keepalive_timer(&self) -> Option<&Interval> {
        self.keepalive_timer.as_ref()
    }

    pub const fn dead_timer(&self) -> Option<&Interval> {
        self.dead_timer.as_ref()
    }

    pub async fn send(&mut self, msg: PcepMessage) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "[{}][{}] Sending message: {msg:?}",
                self.peer_addr,
                self.state
            );
        }
        self.stats.record_sent(&msg);
        if let Some(interval) = self.keepalive_timer.as_mut() {
            interval.reset();
        }
        self.inner.send(msg).await.map_err(SessionError::Write)
    }

    /// Next message from the peer. `Ok(None)` once the session is closed,
    /// a Close from the peer is returned before that.
    pub async fn recv(&mut self) -> Result<Option<PcepMessage>, SessionError> {
        loop {
            if self.state == SessionState::Closed {
                return Ok(None);
            }
            let wakeup = {
                let Self {
                    keepalive_timer,
                    dead_timer,
                    inner,
                    ..
                } = self;
                futures::select_biased! {
                    _ = tick(keepalive_timer).fuse() => Wakeup::KeepaliveTimer,
                    _ = tick(dead_timer).fuse() => Wakeup::DeadTimer,
                    msg = inner.next().fuse() => Wakeup::Received(msg),
                }
            };
            match wakeup {
                Wakeup::KeepaliveTimer => self.send(PcepMessage::Keepalive).await?,
                Wakeup::DeadTimer => {
                    log::warn!(
                        "[{}][{}] Dead timer expired",
                        self.peer_addr,
                        self.state
                    );
                    self.close(CloseReason::DeadTimerExpired).await?;
                    return Err(SessionError::DeadTimerExpired);
                }
                Wakeup::Received(None) => {
                    log::info!(
                        "[{}][{}] Transport closed by the peer",
                        self.peer_addr,
                        self.state
                    );
                    self.state = SessionState::Closed;
                    return Ok(None);
                }
                Wakeup::Received(Some(Err(err))) => {
                    log::error!(
                        "[{}][{}] Malformed message from peer: {err:?}",
                        self.peer_addr,
                        self.state
                    );
                    self.close(CloseReason::MalformedMessage).await?;
                    return Err(SessionError::Decode(err));
                }
                Wakeup::Received(Some(Ok(msg))) => {
                    if let Some(msg) = self.handle_received(msg).await? {
                        return Ok(Some(msg));
                    }
                }
            }
        }
    }

    async fn handle_received(
        &mut self,
        msg: PcepMessage,
    ) -> Result<Option<PcepMessage>, SessionError> {
        self.stats.record_received(&msg);
        if let Some(interval) = self.dead_timer.as_mut() {
            interval.reset();
        }
        match msg {
            PcepMessage::Keepalive => Ok(None),
            PcepMessage::Close(ref close) => {
                log::info!(
                    "[{}][{}] Peer closed the session with reason {}",
                    self.peer_addr,
                    self.state,
                    close.reason()
                );
                self.state = SessionState::Closed;
                Ok(Some(msg))
            }
            PcepMessage::Unrecognized(_) => {
                if self.unknown_limit_exceeded() {
                    self.close(CloseReason::TooManyUnknownMessages).await?;
                    return Err(SessionError::TooManyUnknownMessages(
                        self.max_unknown_messages,
                    ));
                }
                Ok(Some(msg))
            }
            msg => Ok(Some(msg)),
        }
    }

    fn unknown_limit_exceeded(&mut self) -> bool {
        let now = Instant::now();
        while let Some(first) = self.unknown_messages.front() {
            if now.duration_since(*first) < UNKNOWN_MESSAGES_WINDOW {
                break;
            }
            self.unknown_messages.pop_front();
        }
        self.unknown_messages.push_back(now);
        self.unknown_messages.len() > self.max_unknown_messages
    }

    /// Send a Close with `reason` and shut the transport down. Closing a
    /// closed session does nothing.
    pub async fn close(&mut self, reason: CloseReason) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        let close = PcepMessage::Close(CloseObject::new(reason.into(), vec![]));
        let sent = self.send(close).await;
        self.state = SessionState::Closed;
        self.keepalive_timer.take();
        self.dead_timer.take();
        log::info!(
            "[{}][{}] Closed session with reason {reason}",
            self.peer_addr,
            self.state
        );
        let shutdown = SinkExt::<PcepMessage>::close(&mut self.inner)
            .await
            .map_err(SessionError::Write);
        sent.and(shutdown)
    }
}

/// Deadline of a negotiation timer, zero disables it
fn deadline_after(wait: Duration) -> Option<Instant> {
    (!wait.is_zero()).then(|| Instant::now() + wait)
}

/// Next event of the Open exchange, the earliest of the still running
/// OpenWait and KeepWait deadlines turns into its expiry event.
async fn next_event<I: AsyncRead + AsyncWrite + Unpin>(
    framed: &mut Framed<I, PcepCodec>,
    open_deadline: Option<Instant>,
    keep_deadline: Option<Instant>,
) -> NegotiationEvent {
    let expiry = match (open_deadline, keep_deadline) {
        (Some(open), Some(keep)) if keep < open => {
            Some((keep, NegotiationEvent::KeepWaitExpired))
        }
        (Some(open), _) => Some((open, NegotiationEvent::OpenWaitExpired)),
        (None, Some(keep)) => Some((keep, NegotiationEvent::KeepWaitExpired)),
        (None, None) => None,
    };
    let (next, expired) = match expiry {
        None => (Ok(framed.next().await), None),
        Some((deadline, expired)) => (
            tokio::time::timeout_at(deadline, framed.next()).await,
            Some(expired),
        ),
    };
    match next {
        Err(_) => expired.unwrap_or(NegotiationEvent::OpenWaitExpired),
        Ok(None) => NegotiationEvent::TransportClosed,
        Ok(Some(Err(err))) => NegotiationEvent::MalformedMessage(err),
        Ok(Some(Ok(msg))) => NegotiationEvent::Message(msg),
    }
}

/// Run the Open exchange over `io` and hand over the established session.
///
/// The transport is dropped, and with it closed, when negotiation fails.
pub async fn negotiate<A, I, P>(
    peer_addr: A,
    io: I,
    config: &SessionConfig,
    extensions: Arc<PcepExtensions>,
    policy: P,
) -> Result<PcepSession<A, I>, NegotiationError>
where
    A: Clone + Display,
    I: AsyncRead + AsyncWrite + Unpin,
    P: NegotiationPolicy,
{
    let mut framed = Framed::new(io, PcepCodec::new(extensions));
    let mut stats = SessionStats::default();
    let mut negotiator = SessionNegotiator::new(
        peer_addr.clone(),
        config.initial_proposal(),
        config.max_rounds(),
        policy,
    );
    let open = negotiator.start()?;
    stats.record_sent(&open);
    let open_deadline = deadline_after(config.open_wait());
    let mut keep_deadline = deadline_after(config.keep_wait());
    framed.send(open).await.map_err(NegotiationError::Send)?;

    while !negotiator.state().is_terminal() {
        let event = next_event(
            &mut framed,
            open_deadline.filter(|_| negotiator.awaiting_open()),
            keep_deadline.filter(|_| negotiator.awaiting_keepalive()),
        )
        .await;
        if let NegotiationEvent::Message(msg) = &event {
            stats.record_received(msg);
        }
        let Some(reply) = negotiator.handle_event(event) else {
            continue;
        };
        if matches!(reply, PcepMessage::Open(_)) {
            // KeepWait restarts for every proposal we send
            keep_deadline = deadline_after(config.keep_wait());
        }
        stats.record_sent(&reply);
        if let Err(err) = framed.send(reply).await {
            if negotiator.state() == NegotiationState::Failed {
                // Negotiation already failed, the PCErr was best effort
                log::error!(
                    "[{}][{}] Error sending reply to peer: {err:?}",
                    peer_addr,
                    negotiator.state()
                );
            } else {
                return Err(NegotiationError::Send(err));
            }
        }
    }
    let proposals = negotiator.into_outcome()?;
    Ok(PcepSession::new(
        peer_addr,
        framed,
        proposals,
        stats,
        config.max_unknown_messages(),
    ))
}
