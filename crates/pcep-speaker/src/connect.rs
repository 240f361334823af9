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

use async_trait::async_trait;
use std::{io, net::SocketAddr};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

/// Opens the transport towards a peer
#[async_trait]
pub trait ActiveConnect<A, I: AsyncRead + AsyncWrite> {
    async fn connect(&mut self, peer_addr: A) -> io::Result<I>;
}

#[derive(Debug, Clone)]
pub struct TcpActiveConnect;

#[async_trait]
impl ActiveConnect<SocketAddr, TcpStream> for TcpActiveConnect {
    async fn connect(&mut self, peer_addr: SocketAddr) -> io::Result<TcpStream> {
        TcpStream::connect(peer_addr).await
    }
}
