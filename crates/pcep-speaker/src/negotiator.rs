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

//! Open exchange of [RFC5440](https://datatracker.ietf.org/doc/html/rfc5440#section-6.2)
//! as a state machine that never touches the transport.
//!
//! The negotiator is fed [NegotiationEvent]s and answers with the message, if
//! any, to send back to the peer. Whether a peer proposal is acceptable, and
//! what to offer instead, is left to a [NegotiationPolicy].

use pathwire_pcep_pkt::{
    codec::PcepCodecDecoderError,
    iana::{PcepMessageType, SessionEstablishmentError, SESSION_ESTABLISHMENT_FAILURE},
    objects::{OpenObject, PcepErrorObject},
    wire::serializer::PcepMessageWritingError,
    PcepErrorMessage, PcepMessage,
};
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum_macros::Display)]
pub enum NegotiationState {
    /// Transport is up, nothing sent yet
    Idle,

    /// Our Open is sent, waiting for the peer's
    AwaitingOpen,

    /// Waiting for the peer to settle: either it has to acknowledge our
    /// proposal with a Keepalive, or answer a counter or revised proposal
    ProposalSent,

    Established,

    Failed,
}

impl NegotiationState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Established | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationEvent {
    Message(PcepMessage),
    MalformedMessage(PcepCodecDecoderError),
    OpenWaitExpired,
    KeepWaitExpired,
    TransportClosed,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("no agreement after {rounds} proposal rounds")]
    Exhausted { rounds: u8 },

    /// Session characteristics refused, either by us or by the peer, with the
    /// session establishment error value that was exchanged
    #[error("session characteristics rejected (by peer: {by_peer}, error value {error_value})")]
    Rejected { by_peer: bool, error_value: u8 },

    #[error("peer reported error type {error_type} value {error_value}")]
    PeerError { error_type: u8, error_value: u8 },

    #[error("peer closed the session with reason {0}")]
    PeerClosed(u8),

    #[error("unexpected message type {0} during negotiation")]
    UnexpectedMessage(u8),

    #[error("malformed message during negotiation: {0:?}")]
    Malformed(PcepCodecDecoderError),

    #[error("peer Open not received in time")]
    OpenWaitExpired,

    #[error("peer did not acknowledge our Open in time")]
    KeepWaitExpired,

    #[error("transport closed during negotiation")]
    TransportClosed,

    #[error("failed to send message: {0:?}")]
    Send(PcepMessageWritingError),

    #[error("negotiation can't be started in state {0}")]
    InvalidState(NegotiationState),
}

/// Decides on the peer's proposals. Every method may keep state across
/// rounds.
pub trait NegotiationPolicy {
    /// Accept the peer's Open as is
    fn is_acceptable(&mut self, remote: &OpenObject) -> bool;

    /// What to suggest to the peer instead of an unacceptable Open, `None`
    /// refuses the session.
    fn counter_proposal(&mut self, _remote: &OpenObject) -> Option<OpenObject> {
        None
    }

    /// Our final offer after the peer suggested `suggestion` in place of our
    /// proposal, `None` refuses the suggestion.
    fn revised_proposal(&mut self, _suggestion: &OpenObject) -> Option<OpenObject> {
        None
    }
}

/// Accepts any Open the peer sends
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllPolicy;

impl NegotiationPolicy for AcceptAllPolicy {
    fn is_acceptable(&mut self, _remote: &OpenObject) -> bool {
        true
    }
}

/// Accepts peer proposals matching a predicate, counters the others with a
/// fixed proposal.
#[derive(Debug, Clone)]
pub struct PredicatePolicy<F> {
    predicate: F,
    counter: Option<OpenObject>,
    accept_suggestions: bool,
}

impl<F: FnMut(&OpenObject) -> bool> PredicatePolicy<F> {
    pub const fn new(predicate: F) -> Self {
        Self {
            predicate,
            counter: None,
            accept_suggestions: false,
        }
    }

    pub fn with_counter_proposal(mut self, counter: OpenObject) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Take up the peer's suggestion as our revised proposal
    pub const fn with_accept_suggestions(mut self, value: bool) -> Self {
        self.accept_suggestions = value;
        self
    }
}

impl<F: FnMut(&OpenObject) -> bool> NegotiationPolicy for PredicatePolicy<F> {
    fn is_acceptable(&mut self, remote: &OpenObject) -> bool {
        (self.predicate)(remote)
    }

    fn counter_proposal(&mut self, _remote: &OpenObject) -> Option<OpenObject> {
        self.counter.clone()
    }

    fn revised_proposal(&mut self, suggestion: &OpenObject) -> Option<OpenObject> {
        self.accept_suggestions.then(|| suggestion.clone())
    }
}

/// The proposals both sides settled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedProposals {
    local: OpenObject,
    remote: OpenObject,
}

impl NegotiatedProposals {
    pub const fn new(local: OpenObject, remote: OpenObject) -> Self {
        Self { local, remote }
    }

    pub const fn local(&self) -> &OpenObject {
        &self.local
    }

    pub const fn remote(&self) -> &OpenObject {
        &self.remote
    }
}

fn establishment_error(value: SessionEstablishmentError, open: Option<OpenObject>) -> PcepMessage {
    PcepMessage::Error(PcepErrorMessage::new(
        vec![PcepErrorObject::new(
            SESSION_ESTABLISHMENT_FAILURE,
            value.into(),
            vec![],
        )],
        open,
    ))
}

#[derive(Debug)]
pub struct SessionNegotiator<A, P> {
    peer_addr: A,
    state: NegotiationState,
    policy: P,
    max_rounds: u8,
    rounds: u8,
    local: OpenObject,
    remote: Option<OpenObject>,
    peer_accepted: bool,
    error: Option<NegotiationError>,
}

impl<A: Display, P: NegotiationPolicy> SessionNegotiator<A, P> {
    pub const fn new(peer_addr: A, initial: OpenObject, max_rounds: u8, policy: P) -> Self {
        Self {
            peer_addr,
            state: NegotiationState::Idle,
            policy,
            max_rounds,
            rounds: 0,
            local: initial,
            remote: None,
            peer_accepted: false,
            error: None,
        }
    }

    pub const fn peer_addr(&self) -> &A {
        &self.peer_addr
    }

    pub const fn state(&self) -> NegotiationState {
        self.state
    }

    /// Counter and revised proposals sent so far
    pub const fn rounds(&self) -> u8 {
        self.rounds
    }

    /// Our current proposal
    pub const fn local(&self) -> &OpenObject {
        &self.local
    }

    pub const fn remote(&self) -> Option<&OpenObject> {
        self.remote.as_ref()
    }

    /// The peer sent a Keepalive acknowledging our proposal
    pub const fn peer_accepted(&self) -> bool {
        self.peer_accepted
    }

    /// Still missing an acceptable Open from the peer
    pub const fn awaiting_open(&self) -> bool {
        self.remote.is_none()
    }

    /// Still missing the peer's Keepalive for our current proposal
    pub const fn awaiting_keepalive(&self) -> bool {
        !self.peer_accepted
    }

    pub const fn error(&self) -> Option<&NegotiationError> {
        self.error.as_ref()
    }

    /// Leave [NegotiationState::Idle] and return the Open to send
    pub fn start(&mut self) -> Result<PcepMessage, NegotiationError> {
        if self.state != NegotiationState::Idle {
            return Err(NegotiationError::InvalidState(self.state));
        }
        self.transition(NegotiationState::AwaitingOpen);
        Ok(PcepMessage::Open(self.local.clone()))
    }

    /// Feed an event, returns what to send to the peer in response
    pub fn handle_event(&mut self, event: NegotiationEvent) -> Option<PcepMessage> {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "[{}][{}] handling: {event:?}",
                self.peer_addr,
                self.state
            );
        }
        match self.state {
            NegotiationState::AwaitingOpen | NegotiationState::ProposalSent => {
                self.handle_negotiating_event(event)
            }
            NegotiationState::Idle | NegotiationState::Established | NegotiationState::Failed => {
                log::debug!(
                    "[{}][{}] Ignoring event outside of negotiation",
                    self.peer_addr,
                    self.state
                );
                None
            }
        }
    }

    /// Final outcome, only meaningful in a terminal state
    pub fn into_outcome(self) -> Result<NegotiatedProposals, NegotiationError> {
        match (self.state, self.remote, self.error) {
            (NegotiationState::Established, Some(remote), _) => {
                Ok(NegotiatedProposals::new(self.local, remote))
            }
            (_, _, Some(error)) => Err(error),
            (state, _, None) => Err(NegotiationError::InvalidState(state)),
        }
    }

    fn handle_negotiating_event(&mut self, event: NegotiationEvent) -> Option<PcepMessage> {
        match event {
            NegotiationEvent::Message(PcepMessage::Open(remote)) => self.handle_open(remote),
            NegotiationEvent::Message(PcepMessage::Error(error)) => self.handle_peer_error(error),
            NegotiationEvent::Message(PcepMessage::Keepalive) => {
                self.peer_accepted = true;
                if self.remote.is_some() {
                    self.transition(NegotiationState::Established);
                }
                None
            }
            NegotiationEvent::Message(PcepMessage::Close(close)) => {
                self.fail(NegotiationError::PeerClosed(close.reason()));
                None
            }
            NegotiationEvent::Message(other) => {
                self.fail(NegotiationError::UnexpectedMessage(other.message_type()));
                Some(establishment_error(
                    SessionEstablishmentError::NonOpenReceived,
                    None,
                ))
            }
            NegotiationEvent::MalformedMessage(err) => {
                self.fail(NegotiationError::Malformed(err));
                None
            }
            NegotiationEvent::OpenWaitExpired => {
                self.fail(NegotiationError::OpenWaitExpired);
                Some(establishment_error(
                    SessionEstablishmentError::OpenWaitExpired,
                    None,
                ))
            }
            NegotiationEvent::KeepWaitExpired => {
                self.fail(NegotiationError::KeepWaitExpired);
                Some(establishment_error(
                    SessionEstablishmentError::KeepWaitExpired,
                    None,
                ))
            }
            NegotiationEvent::TransportClosed => {
                self.fail(NegotiationError::TransportClosed);
                None
            }
        }
    }

    fn handle_open(&mut self, remote: OpenObject) -> Option<PcepMessage> {
        if self.remote.is_some() {
            // Peer's proposal is already settled, a second Open is invalid
            self.fail(NegotiationError::UnexpectedMessage(PcepMessageType::Open.into()));
            return Some(establishment_error(
                SessionEstablishmentError::NonOpenReceived,
                None,
            ));
        }
        if self.policy.is_acceptable(&remote) {
            self.remote = Some(remote);
            if self.peer_accepted {
                self.transition(NegotiationState::Established);
            } else {
                self.transition(NegotiationState::ProposalSent);
            }
            return Some(PcepMessage::Keepalive);
        }
        if self.rounds >= self.max_rounds {
            self.fail(NegotiationError::Exhausted {
                rounds: self.rounds,
            });
            return Some(establishment_error(
                SessionEstablishmentError::SecondUnacceptableOpen,
                None,
            ));
        }
        match self.policy.counter_proposal(&remote) {
            Some(counter) => {
                self.rounds += 1;
                log::info!(
                    "[{}][{}] Countering peer proposal {remote:?} with {counter:?}",
                    self.peer_addr,
                    self.state
                );
                self.transition(NegotiationState::ProposalSent);
                Some(establishment_error(
                    SessionEstablishmentError::UnacceptableNegotiable,
                    Some(counter),
                ))
            }
            None => {
                self.fail(NegotiationError::Rejected {
                    by_peer: false,
                    error_value: SessionEstablishmentError::UnacceptableNonNegotiable.into(),
                });
                Some(establishment_error(
                    SessionEstablishmentError::UnacceptableNonNegotiable,
                    None,
                ))
            }
        }
    }

    fn handle_peer_error(&mut self, error: PcepErrorMessage) -> Option<PcepMessage> {
        let establishment = error
            .errors()
            .iter()
            .find(|err| err.error_type() == SESSION_ESTABLISHMENT_FAILURE);
        let Some(establishment) = establishment else {
            let (error_type, error_value) = error
                .errors()
                .first()
                .map(|err| (err.error_type(), err.error_value()))
                .unwrap_or_default();
            self.fail(NegotiationError::PeerError {
                error_type,
                error_value,
            });
            return None;
        };
        let error_value = establishment.error_value();
        let suggestion = match error.open() {
            Some(suggestion)
                if error_value == u8::from(SessionEstablishmentError::UnacceptableNegotiable) =>
            {
                suggestion
            }
            _ => {
                self.fail(NegotiationError::Rejected {
                    by_peer: true,
                    error_value,
                });
                return None;
            }
        };
        if self.rounds >= self.max_rounds {
            self.fail(NegotiationError::Exhausted {
                rounds: self.rounds,
            });
            return Some(establishment_error(
                SessionEstablishmentError::UnacceptableSuggestion,
                None,
            ));
        }
        match self.policy.revised_proposal(suggestion) {
            Some(revised) => {
                self.rounds += 1;
                // A revised proposal replaces ours, any earlier acknowledgement
                // was for the old one
                self.peer_accepted = false;
                self.local = revised.clone();
                self.transition(NegotiationState::ProposalSent);
                Some(PcepMessage::Open(revised))
            }
            None => {
                self.fail(NegotiationError::Rejected {
                    by_peer: false,
                    error_value: SessionEstablishmentError::UnacceptableSuggestion.into(),
                });
                Some(establishment_error(
                    SessionEstablishmentError::UnacceptableSuggestion,
                    None,
                ))
            }
        }
    }

    fn fail(&mut self, error: NegotiationError) {
        log::warn!(
            "[{}][{}] Negotiation failed: {error}",
            self.peer_addr,
            self.state
        );
        self.error = Some(error);
        self.transition(NegotiationState::Failed);
    }

    fn transition(&mut self, state: NegotiationState) {
        let pre_state = self.state;
        self.state = state;
        if pre_state != state {
            log::info!(
                "[{}][{}] Transitioned from {pre_state} to {state}",
                self.peer_addr,
                pre_state
            );
        }
    }
}
