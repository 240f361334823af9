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
    negotiator::{
        AcceptAllPolicy, NegotiationError, NegotiationEvent, NegotiationState, PredicatePolicy,
        SessionNegotiator,
    },
    tests::{establishment_error, local_open, peer_open, PEER_ADDR},
};
use pathwire_pcep_pkt::{
    codec::PcepCodecDecoderError,
    iana::SessionEstablishmentError,
    objects::{CloseObject, OpenObject, PcepErrorObject},
    PcepErrorMessage, PcepMessage, UnrecognizedMessage,
};
use std::net::SocketAddr;

fn started<P: crate::negotiator::NegotiationPolicy>(
    max_rounds: u8,
    policy: P,
) -> SessionNegotiator<SocketAddr, P> {
    let mut negotiator = SessionNegotiator::new(PEER_ADDR, local_open(), max_rounds, policy);
    assert_eq!(negotiator.state(), NegotiationState::Idle);
    assert_eq!(negotiator.start(), Ok(PcepMessage::Open(local_open())));
    assert_eq!(negotiator.state(), NegotiationState::AwaitingOpen);
    negotiator
}

fn open_event(open: OpenObject) -> NegotiationEvent {
    NegotiationEvent::Message(PcepMessage::Open(open))
}

#[test_log::test]
fn test_accept_in_one_round() {
    let mut negotiator = started(3, AcceptAllPolicy);
    let reply = negotiator.handle_event(open_event(peer_open(30, 120)));
    assert_eq!(reply, Some(PcepMessage::Keepalive));
    assert_eq!(negotiator.rounds(), 0);
    assert_eq!(negotiator.remote(), Some(&peer_open(30, 120)));

    // The peer still has to acknowledge our Open
    assert_eq!(negotiator.state(), NegotiationState::ProposalSent);
    assert!(!negotiator.awaiting_open());
    assert!(negotiator.awaiting_keepalive());

    assert_eq!(
        negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Keepalive)),
        None
    );
    assert_eq!(negotiator.state(), NegotiationState::Established);
    let outcome = negotiator.into_outcome().unwrap();
    assert_eq!(outcome.local(), &local_open());
    assert_eq!(outcome.remote(), &peer_open(30, 120));
}

#[test_log::test]
fn test_start_twice() {
    let mut negotiator = started(3, AcceptAllPolicy);
    assert_eq!(
        negotiator.start(),
        Err(NegotiationError::InvalidState(NegotiationState::AwaitingOpen))
    );
}

#[test_log::test]
fn test_never_acceptable_is_exhausted() {
    let counter = OpenObject::new(30, 120, 1, vec![]);
    let policy = PredicatePolicy::new(|_: &OpenObject| false).with_counter_proposal(counter.clone());
    let mut negotiator = started(3, policy);

    for round in 1..=3 {
        let reply = negotiator.handle_event(open_event(peer_open(1, 4)));
        assert_eq!(
            reply,
            Some(establishment_error(
                SessionEstablishmentError::UnacceptableNegotiable,
                Some(counter.clone())
            ))
        );
        assert_eq!(negotiator.state(), NegotiationState::ProposalSent);
        assert_eq!(negotiator.rounds(), round);
    }

    let reply = negotiator.handle_event(open_event(peer_open(1, 4)));
    assert_eq!(
        reply,
        Some(establishment_error(
            SessionEstablishmentError::SecondUnacceptableOpen,
            None
        ))
    );
    assert_eq!(negotiator.state(), NegotiationState::Failed);
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::Exhausted { rounds: 3 })
    );
}

#[test_log::test]
fn test_counter_then_accept() {
    let counter = OpenObject::new(30, 120, 1, vec![]);
    let policy = PredicatePolicy::new(|open: &OpenObject| open.keepalive() >= 10)
        .with_counter_proposal(counter);
    let mut negotiator = started(3, policy);

    assert!(negotiator
        .handle_event(open_event(peer_open(1, 4)))
        .is_some());
    assert_eq!(negotiator.state(), NegotiationState::ProposalSent);

    let reply = negotiator.handle_event(open_event(peer_open(30, 120)));
    assert_eq!(reply, Some(PcepMessage::Keepalive));
    assert_eq!(negotiator.state(), NegotiationState::ProposalSent);

    negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Keepalive));
    assert_eq!(negotiator.state(), NegotiationState::Established);
    assert_eq!(negotiator.rounds(), 1);
}

#[test_log::test]
fn test_keepalive_before_open() {
    let mut negotiator = started(3, AcceptAllPolicy);
    assert_eq!(
        negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Keepalive)),
        None
    );
    assert_eq!(negotiator.state(), NegotiationState::AwaitingOpen);
    assert!(negotiator.peer_accepted());

    let reply = negotiator.handle_event(open_event(peer_open(30, 120)));
    assert_eq!(reply, Some(PcepMessage::Keepalive));
    assert_eq!(negotiator.state(), NegotiationState::Established);
}

#[test_log::test]
fn test_peer_suggestion_after_its_open() {
    let suggestion = OpenObject::new(60, 240, 1, vec![]);
    let policy = PredicatePolicy::new(|_: &OpenObject| true).with_accept_suggestions(true);
    let mut negotiator = started(3, policy);

    // Peer's Open is acceptable, but ours is not acceptable to the peer
    let reply = negotiator.handle_event(open_event(peer_open(30, 120)));
    assert_eq!(reply, Some(PcepMessage::Keepalive));
    assert_eq!(negotiator.state(), NegotiationState::ProposalSent);

    let reply = negotiator.handle_event(NegotiationEvent::Message(establishment_error(
        SessionEstablishmentError::UnacceptableNegotiable,
        Some(suggestion.clone()),
    )));
    assert_eq!(reply, Some(PcepMessage::Open(suggestion.clone())));
    assert_eq!(negotiator.state(), NegotiationState::ProposalSent);
    assert_eq!(negotiator.rounds(), 1);
    assert!(!negotiator.awaiting_open());

    negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Keepalive));
    assert_eq!(negotiator.state(), NegotiationState::Established);
    let outcome = negotiator.into_outcome().unwrap();
    assert_eq!(outcome.local(), &suggestion);
    assert_eq!(outcome.remote(), &peer_open(30, 120));
}

#[test_log::test]
fn test_peer_rejection_after_its_open() {
    let mut negotiator = started(3, AcceptAllPolicy);
    negotiator.handle_event(open_event(peer_open(30, 120)));
    let reply = negotiator.handle_event(NegotiationEvent::Message(establishment_error(
        SessionEstablishmentError::UnacceptableNonNegotiable,
        None,
    )));
    assert_eq!(reply, None);
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::Rejected {
            by_peer: true,
            error_value: 3
        })
    );
}

#[test_log::test]
fn test_second_open_after_accepting_one() {
    let mut negotiator = started(3, AcceptAllPolicy);
    negotiator.handle_event(open_event(peer_open(30, 120)));
    let reply = negotiator.handle_event(open_event(peer_open(10, 40)));
    assert_eq!(
        reply,
        Some(establishment_error(
            SessionEstablishmentError::NonOpenReceived,
            None
        ))
    );
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::UnexpectedMessage(1))
    );
}

#[test_log::test]
fn test_keep_wait_expired() {
    let mut negotiator = started(3, AcceptAllPolicy);
    negotiator.handle_event(open_event(peer_open(30, 120)));
    assert_eq!(
        negotiator.handle_event(NegotiationEvent::KeepWaitExpired),
        Some(establishment_error(
            SessionEstablishmentError::KeepWaitExpired,
            None
        ))
    );
    assert_eq!(negotiator.state(), NegotiationState::Failed);
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::KeepWaitExpired)
    );
}

#[test_log::test]
fn test_without_counter_proposal_is_rejected() {
    let mut negotiator = started(3, PredicatePolicy::new(|_: &OpenObject| false));
    let reply = negotiator.handle_event(open_event(peer_open(1, 4)));
    assert_eq!(
        reply,
        Some(establishment_error(
            SessionEstablishmentError::UnacceptableNonNegotiable,
            None
        ))
    );
    assert_eq!(
        negotiator.error(),
        Some(&NegotiationError::Rejected {
            by_peer: false,
            error_value: 3
        })
    );
}

#[test_log::test]
fn test_zero_rounds_fails_on_first_unacceptable_open() {
    let counter = OpenObject::new(30, 120, 1, vec![]);
    let policy = PredicatePolicy::new(|_: &OpenObject| false).with_counter_proposal(counter);
    let mut negotiator = started(0, policy);
    assert_eq!(
        negotiator.handle_event(open_event(peer_open(1, 4))),
        Some(establishment_error(
            SessionEstablishmentError::SecondUnacceptableOpen,
            None
        ))
    );
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::Exhausted { rounds: 0 })
    );
}

#[test_log::test]
fn test_revise_on_peer_suggestion() {
    let suggestion = OpenObject::new(10, 40, 1, vec![]);
    let policy = PredicatePolicy::new(|_: &OpenObject| true).with_accept_suggestions(true);
    let mut negotiator = started(3, policy);

    let reply = negotiator.handle_event(NegotiationEvent::Message(establishment_error(
        SessionEstablishmentError::UnacceptableNegotiable,
        Some(suggestion.clone()),
    )));
    assert_eq!(reply, Some(PcepMessage::Open(suggestion.clone())));
    assert_eq!(negotiator.state(), NegotiationState::ProposalSent);
    assert_eq!(negotiator.local(), &suggestion);
    assert_eq!(negotiator.rounds(), 1);

    negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Keepalive));
    assert!(negotiator.peer_accepted());

    let reply = negotiator.handle_event(open_event(peer_open(10, 40)));
    assert_eq!(reply, Some(PcepMessage::Keepalive));
    let outcome = negotiator.into_outcome().unwrap();
    assert_eq!(outcome.local(), &suggestion);
}

#[test_log::test]
fn test_unacceptable_peer_suggestion() {
    let mut negotiator = started(3, PredicatePolicy::new(|_: &OpenObject| true));
    let reply = negotiator.handle_event(NegotiationEvent::Message(establishment_error(
        SessionEstablishmentError::UnacceptableNegotiable,
        Some(OpenObject::new(1, 4, 1, vec![])),
    )));
    assert_eq!(
        reply,
        Some(establishment_error(
            SessionEstablishmentError::UnacceptableSuggestion,
            None
        ))
    );
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::Rejected {
            by_peer: false,
            error_value: 6
        })
    );
}

#[test_log::test]
fn test_peer_rejects_non_negotiable() {
    let mut negotiator = started(3, AcceptAllPolicy);
    let reply = negotiator.handle_event(NegotiationEvent::Message(establishment_error(
        SessionEstablishmentError::UnacceptableNonNegotiable,
        None,
    )));
    assert_eq!(reply, None);
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::Rejected {
            by_peer: true,
            error_value: 3
        })
    );
}

#[test_log::test]
fn test_peer_reports_other_error() {
    let mut negotiator = started(3, AcceptAllPolicy);
    let error = PcepMessage::Error(PcepErrorMessage::new(
        vec![PcepErrorObject::new(2, 0, vec![])],
        None,
    ));
    assert_eq!(
        negotiator.handle_event(NegotiationEvent::Message(error)),
        None
    );
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::PeerError {
            error_type: 2,
            error_value: 0
        })
    );
}

#[test_log::test]
fn test_unexpected_message() {
    let mut negotiator = started(3, AcceptAllPolicy);
    let reply = negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Unrecognized(
        UnrecognizedMessage::new(99, vec![]),
    )));
    assert_eq!(
        reply,
        Some(establishment_error(
            SessionEstablishmentError::NonOpenReceived,
            None
        ))
    );
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::UnexpectedMessage(99))
    );
}

#[test_log::test]
fn test_peer_close_keeps_reason() {
    let mut negotiator = started(3, AcceptAllPolicy);
    let reply = negotiator.handle_event(NegotiationEvent::Message(PcepMessage::Close(
        CloseObject::new(2, vec![]),
    )));
    assert_eq!(reply, None);
    assert_eq!(negotiator.state(), NegotiationState::Failed);
    assert_eq!(negotiator.into_outcome(), Err(NegotiationError::PeerClosed(2)));
}

#[test_log::test]
fn test_malformed_message() {
    let mut negotiator = started(3, AcceptAllPolicy);
    let err = PcepCodecDecoderError::Incomplete(None);
    assert_eq!(
        negotiator.handle_event(NegotiationEvent::MalformedMessage(err.clone())),
        None
    );
    assert_eq!(negotiator.into_outcome(), Err(NegotiationError::Malformed(err)));
}

#[test_log::test]
fn test_open_wait_expired() {
    let mut negotiator = started(3, AcceptAllPolicy);
    assert_eq!(
        negotiator.handle_event(NegotiationEvent::OpenWaitExpired),
        Some(establishment_error(
            SessionEstablishmentError::OpenWaitExpired,
            None
        ))
    );
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::OpenWaitExpired)
    );
}

#[test_log::test]
fn test_events_after_failure_are_ignored() {
    let mut negotiator = started(3, AcceptAllPolicy);
    negotiator.handle_event(NegotiationEvent::TransportClosed);
    assert_eq!(negotiator.state(), NegotiationState::Failed);
    assert_eq!(
        negotiator.handle_event(open_event(peer_open(30, 120))),
        None
    );
    assert_eq!(negotiator.state(), NegotiationState::Failed);
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::TransportClosed)
    );
}

#[test_log::test]
fn test_outcome_before_terminal_state() {
    let negotiator = started(3, AcceptAllPolicy);
    assert_eq!(
        negotiator.into_outcome(),
        Err(NegotiationError::InvalidState(NegotiationState::AwaitingOpen))
    );
}
