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
    config::SessionConfig,
    connect::ActiveConnect,
    negotiator::{NegotiationError, NegotiationPolicy},
    reconnect::{ReconnectController, ReconnectError},
    session::{negotiate, PcepSession},
};
use pathwire_pcep_pkt::{iana::CloseReason, PcepExtensions};
use std::{fmt::Display, sync::Arc};
use tokio::io::{AsyncRead, AsyncWrite};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Reconnect(#[from] ReconnectError),

    #[error("session negotiation failed: {0}")]
    Negotiation(#[from] NegotiationError),
}

/// PCC side of a PCEP peering: connects, negotiates and hands over the
/// session. A negotiation failure on a fresh transport goes through the same
/// retry delay as a failed connect. Cancelling the controller also stops an
/// ongoing negotiation and drops its transport.
#[derive(Debug)]
pub struct PcepClient<A, I, C, P> {
    controller: ReconnectController<A, I, C>,
    session_config: SessionConfig,
    extensions: Arc<PcepExtensions>,
    policy: P,
}

impl<A, I, C, P> PcepClient<A, I, C, P>
where
    A: Clone + Display + Send + 'static,
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    C: ActiveConnect<A, I> + Send + 'static,
    P: NegotiationPolicy + Clone,
{
    pub const fn new(
        controller: ReconnectController<A, I, C>,
        session_config: SessionConfig,
        extensions: Arc<PcepExtensions>,
        policy: P,
    ) -> Self {
        Self {
            controller,
            session_config,
            extensions,
            policy,
        }
    }

    pub const fn controller(&self) -> &ReconnectController<A, I, C> {
        &self.controller
    }

    pub const fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    pub fn cancel(&self) {
        self.controller.cancel();
    }

    pub async fn connect(&self) -> Result<PcepSession<A, I>, ClientError> {
        let peer_addr = self.controller.peer_addr().clone();
        loop {
            let io = self.controller.connect().await?;
            let negotiated = tokio::select! {
                biased;
                _ = self.controller.cancelled() => {
                    log::info!("[{peer_addr}] Negotiation cancelled, dropping transport");
                    return Err(ReconnectError::Cancelled.into());
                }
                negotiated = negotiate(
                    peer_addr.clone(),
                    io,
                    &self.session_config,
                    Arc::clone(&self.extensions),
                    self.policy.clone(),
                ) => negotiated,
            };
            match negotiated {
                Ok(mut session) if self.controller.is_cancelled() => {
                    if let Err(err) = session.close(CloseReason::NoExplanation).await {
                        log::warn!("[{peer_addr}] Error closing cancelled session: {err}");
                    }
                    return Err(ReconnectError::Cancelled.into());
                }
                Ok(session) => return Ok(session),
                Err(err) if self.controller.config().retry_enabled() => {
                    log::warn!("[{peer_addr}] Negotiation failed: {err}, retrying");
                    self.controller.backoff().await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
