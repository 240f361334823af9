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

//! User configuration of PCEP sessions and of the reconnection controller.
//!
//! As for the BGP timers, durations are kept as unsigned seconds, which
//! bounds them to what the protocol can carry, and exposed as [Duration].

use pathwire_pcep_pkt::{objects::OpenObject, tlvs::PcepTlv};
use std::time::Duration;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionConfig {
    keepalive: u8,
    dead_timer: u8,
    session_id: u8,
    tlvs: Vec<PcepTlv>,
    max_rounds: u8,
    open_wait: u16,
    keep_wait: u16,
    max_unknown_messages: usize,
}

impl SessionConfig {
    pub const fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive as u64)
    }

    pub const fn dead_timer(&self) -> Duration {
        Duration::from_secs(self.dead_timer as u64)
    }

    pub const fn session_id(&self) -> u8 {
        self.session_id
    }

    pub const fn tlvs(&self) -> &Vec<PcepTlv> {
        &self.tlvs
    }

    /// Counter and revised proposals allowed before giving up
    pub const fn max_rounds(&self) -> u8 {
        self.max_rounds
    }

    /// How long to wait for the peer's Open once ours is sent
    pub const fn open_wait(&self) -> Duration {
        Duration::from_secs(self.open_wait as u64)
    }

    /// How long the peer has to acknowledge each Open we send, zero waits
    /// forever
    pub const fn keep_wait(&self) -> Duration {
        Duration::from_secs(self.keep_wait as u64)
    }

    /// Unrecognized messages tolerated within a minute
    pub const fn max_unknown_messages(&self) -> usize {
        self.max_unknown_messages
    }

    /// The first proposal sent to a peer
    pub fn initial_proposal(&self) -> OpenObject {
        OpenObject::new(
            self.keepalive,
            self.dead_timer,
            self.session_id,
            self.tlvs.clone(),
        )
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keepalive: 30,
            // RFC 5440 recommends four times the keepalive
            dead_timer: 120,
            session_id: 0,
            tlvs: vec![],
            max_rounds: 3,
            open_wait: 60,
            keep_wait: 60,
            max_unknown_messages: 5,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    pub const fn keepalive(mut self, value: u8) -> Self {
        self.config.keepalive = value;
        self
    }

    pub const fn dead_timer(mut self, value: u8) -> Self {
        self.config.dead_timer = value;
        self
    }

    pub const fn session_id(mut self, value: u8) -> Self {
        self.config.session_id = value;
        self
    }

    pub fn tlvs(mut self, value: Vec<PcepTlv>) -> Self {
        self.config.tlvs = value;
        self
    }

    pub const fn max_rounds(mut self, value: u8) -> Self {
        self.config.max_rounds = value;
        self
    }

    pub const fn open_wait(mut self, value: u16) -> Self {
        self.config.open_wait = value;
        self
    }

    pub const fn keep_wait(mut self, value: u16) -> Self {
        self.config.keep_wait = value;
        self
    }

    pub const fn max_unknown_messages(mut self, value: usize) -> Self {
        self.config.max_unknown_messages = value;
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ReconnectConfig {
    retry_delay: u16,
    connect_timeout: u16,
}

impl ReconnectConfig {
    /// Zero disables retrying
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay as u64)
    }

    pub const fn retry_enabled(&self) -> bool {
        self.retry_delay != 0
    }

    /// Zero waits on the transport without a timeout
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout as u64)
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            retry_delay: 5,
            connect_timeout: 5,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReconnectConfigBuilder {
    config: ReconnectConfig,
}

impl ReconnectConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ReconnectConfig::default(),
        }
    }

    pub const fn retry_delay(mut self, value: u16) -> Self {
        self.config.retry_delay = value;
        self
    }

    pub const fn connect_timeout(mut self, value: u16) -> Self {
        self.config.connect_timeout = value;
        self
    }

    pub const fn build(self) -> ReconnectConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.keepalive(), Duration::from_secs(30));
        assert_eq!(config.dead_timer(), Duration::from_secs(120));
        assert_eq!(config.session_id(), 0);
        assert_eq!(config.max_rounds(), 3);
        assert_eq!(config.open_wait(), Duration::from_secs(60));
        assert_eq!(config.keep_wait(), Duration::from_secs(60));
        assert_eq!(config.max_unknown_messages(), 5);
        assert_eq!(
            config.initial_proposal(),
            OpenObject::new(30, 120, 0, vec![])
        );
    }

    #[test]
    fn test_reconnect_builder() {
        let config = ReconnectConfigBuilder::new()
            .retry_delay(0)
            .connect_timeout(2)
            .build();
        assert!(!config.retry_enabled());
        assert_eq!(config.retry_delay(), Duration::ZERO);
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
        assert!(ReconnectConfig::default().retry_enabled());
    }
}
