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

//! Client side connection attempts with a fixed retry delay

use crate::{config::ReconnectConfig, connect::ActiveConnect};
use std::{
    fmt::Display,
    io,
    marker::PhantomData,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    sync::watch,
    task::{AbortHandle, JoinError},
    time::error::Elapsed,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconnectError {
    #[error("failed to connect to {peer}: {reason}")]
    ConnectFailure { peer: String, reason: String },

    #[error("connection attempt was cancelled")]
    Cancelled,
}

#[derive(Debug, Default)]
struct AttemptSlot {
    cancelled: bool,
    pending: Option<AbortHandle>,
    attempts: u32,
}

enum Settled<I> {
    Connected(I),
    /// Connected after a cancel, the transport must be closed
    Discard(I),
    Retry(String),
    Failed(ReconnectError),
}

/// Owns the connection attempts towards one peer.
///
/// At most one attempt (or retry delay) is pending at any time and
/// [ReconnectController::cancel] aborts it. Clones share the same attempt, so
/// one clone can cancel what another is waiting on.
#[derive(Debug)]
pub struct ReconnectController<A, I, C> {
    peer_addr: A,
    config: ReconnectConfig,
    connector: Arc<tokio::sync::Mutex<C>>,
    slot: Arc<Mutex<AttemptSlot>>,
    cancel_signal: Arc<watch::Sender<bool>>,
    _io: PhantomData<fn() -> I>,
}

impl<A: Clone, I, C> Clone for ReconnectController<A, I, C> {
    fn clone(&self) -> Self {
        Self {
            peer_addr: self.peer_addr.clone(),
            config: self.config,
            connector: Arc::clone(&self.connector),
            slot: Arc::clone(&self.slot),
            cancel_signal: Arc::clone(&self.cancel_signal),
            _io: PhantomData,
        }
    }
}

impl<A, I, C> ReconnectController<A, I, C>
where
    A: Clone + Display + Send + 'static,
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    C: ActiveConnect<A, I> + Send + 'static,
{
    pub fn new(peer_addr: A, config: ReconnectConfig, connector: C) -> Self {
        Self {
            peer_addr,
            config,
            connector: Arc::new(tokio::sync::Mutex::new(connector)),
            slot: Arc::new(Mutex::new(AttemptSlot::default())),
            cancel_signal: Arc::new(watch::Sender::new(false)),
            _io: PhantomData,
        }
    }

    pub const fn peer_addr(&self) -> &A {
        &self.peer_addr
    }

    pub const fn config(&self) -> &ReconnectConfig {
        &self.config
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, AttemptSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of transport connects started so far
    pub fn attempts(&self) -> u32 {
        self.slot().attempts
    }

    pub fn is_cancelled(&self) -> bool {
        self.slot().cancelled
    }

    /// Stop the pending attempt or retry delay. Calling it again does
    /// nothing. A transport that connected but was not yet handed to the
    /// caller of [ReconnectController::connect] is closed.
    pub fn cancel(&self) {
        let mut slot = self.slot();
        if slot.cancelled {
            return;
        }
        slot.cancelled = true;
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
        self.cancel_signal.send_replace(true);
        log::info!("[{}] Cancelled connection attempts", self.peer_addr);
    }

    /// Resolves once [ReconnectController::cancel] was called, for work
    /// outside of the connection attempts that has to stop along with them
    pub(crate) async fn cancelled(&self) {
        let mut cancelled = self.cancel_signal.subscribe();
        // The sender is owned by self, the channel outlives this wait
        let _ = cancelled.wait_for(|cancelled| *cancelled).await;
    }

    /// Connect to the peer, retrying after the configured delay until it
    /// succeeds or [ReconnectController::cancel] is called. With retry
    /// disabled the first failure is returned.
    pub async fn connect(&self) -> Result<I, ReconnectError> {
        loop {
            let Some(attempt) = self.start_attempt() else {
                return Err(ReconnectError::Cancelled);
            };
            let outcome = attempt.await;
            match self.settle(outcome) {
                Settled::Connected(io) => return Ok(io),
                Settled::Discard(mut io) => {
                    log::info!(
                        "[{}] Closing connection established after cancel",
                        self.peer_addr
                    );
                    if let Err(err) = io.shutdown().await {
                        log::warn!(
                            "[{}] Error closing discarded connection: {err}",
                            self.peer_addr
                        );
                    }
                    return Err(ReconnectError::Cancelled);
                }
                Settled::Failed(err) => return Err(err),
                Settled::Retry(reason) => {
                    log::warn!(
                        "[{}] Connection attempt failed: {reason}, retrying in {:?}",
                        self.peer_addr,
                        self.config.retry_delay()
                    );
                    self.backoff().await?;
                }
            }
        }
    }

    /// Spawn one transport connect and track it as the pending attempt
    fn start_attempt(
        &self,
    ) -> Option<tokio::task::JoinHandle<Result<io::Result<I>, Elapsed>>> {
        let mut slot = self.slot();
        if slot.cancelled {
            return None;
        }
        slot.attempts += 1;
        log::debug!(
            "[{}] Starting connection attempt {}",
            self.peer_addr,
            slot.attempts
        );
        let connector = Arc::clone(&self.connector);
        let peer_addr = self.peer_addr.clone();
        let connect_timeout = self.config.connect_timeout();
        let handle = tokio::spawn(async move {
            let mut connector = connector.lock().await;
            if connect_timeout.is_zero() {
                return Ok(connector.connect(peer_addr).await);
            }
            tokio::time::timeout(connect_timeout, connector.connect(peer_addr)).await
        });
        slot.pending = Some(handle.abort_handle());
        Some(handle)
    }

    fn settle(
        &self,
        outcome: Result<Result<io::Result<I>, Elapsed>, JoinError>,
    ) -> Settled<I> {
        let mut slot = self.slot();
        slot.pending.take();
        let reason = match outcome {
            Ok(Ok(Ok(io))) if slot.cancelled => return Settled::Discard(io),
            Ok(Ok(Ok(io))) => {
                log::info!(
                    "[{}] Connected after {} attempt(s)",
                    self.peer_addr,
                    slot.attempts
                );
                return Settled::Connected(io);
            }
            Err(err) if err.is_cancelled() => return Settled::Failed(ReconnectError::Cancelled),
            _ if slot.cancelled => return Settled::Failed(ReconnectError::Cancelled),
            Ok(Ok(Err(err))) => err.to_string(),
            Ok(Err(_)) => format!("timed out after {:?}", self.config.connect_timeout()),
            Err(err) => err.to_string(),
        };
        if self.config.retry_enabled() {
            Settled::Retry(reason)
        } else {
            Settled::Failed(ReconnectError::ConnectFailure {
                peer: self.peer_addr.to_string(),
                reason,
            })
        }
    }

    /// Wait the retry delay as the pending attempt, so a cancel cuts it short
    pub(crate) async fn backoff(&self) -> Result<(), ReconnectError> {
        let sleep = {
            let mut slot = self.slot();
            if slot.cancelled {
                return Err(ReconnectError::Cancelled);
            }
            let sleep = tokio::spawn(tokio::time::sleep(self.config.retry_delay()));
            slot.pending = Some(sleep.abort_handle());
            sleep
        };
        let slept = sleep.await;
        let mut slot = self.slot();
        slot.pending.take();
        match slept {
            Ok(()) if !slot.cancelled => Ok(()),
            _ => Err(ReconnectError::Cancelled),
        }
    }
}
