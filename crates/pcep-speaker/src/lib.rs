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

//! PCEP session establishment for a PCC.
//!
//! [reconnect::ReconnectController] opens the transport, retrying with a fixed
//! delay, [session::negotiate] runs the Open exchange through a
//! [negotiator::SessionNegotiator] and hands back a [session::PcepSession].
//! [client::PcepClient] ties the two together.

pub mod client;
pub mod config;
pub mod connect;
pub mod negotiator;
pub mod reconnect;
pub mod session;

#[cfg(test)]
mod tests;
