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
    iana::{EroSubobjectType, XroSubobjectType},
    subobjects::{
        EroSubobject, EroSubobjectKind, EroSubobjectValue, Nai, XroSubobject, XroSubobjectKind,
        XroSubobjectValue,
    },
    wire::{SR_ERO_C_MASK, SR_ERO_F_MASK, SR_ERO_M_MASK, SR_ERO_NT_SHIFT, SR_ERO_S_MASK},
};
use byteorder::{NetworkEndian, WriteBytesExt};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use pathwire_parse_utils::envelope::format_subobject;
use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum SubobjectWritingError {
    StdIOError(#[from_std_io_error] String),
    UnexpectedEroSubobject(EroSubobjectKind),
    UnexpectedXroSubobject(XroSubobjectKind),
}

fn ipv4_prefix_body(net: &Ipv4Net, last: u8) -> Vec<u8> {
    let mut body = Vec::with_capacity(6);
    body.extend_from_slice(&net.addr().octets());
    body.push(net.prefix_len());
    body.push(last);
    body
}

fn ipv6_prefix_body(net: &Ipv6Net, last: u8) -> Vec<u8> {
    let mut body = Vec::with_capacity(18);
    body.extend_from_slice(&net.addr().octets());
    body.push(net.prefix_len());
    body.push(last);
    body
}

/// ERO subobject serializers bound in [crate::PcepExtensions], they write
/// the whole subobject including its header.
///
/// IPv6 prefixes handed to the IPv4 serializer are written as type 2.
pub fn write_ero_ipv4_prefix(
    subobject: &EroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    match subobject.value() {
        EroSubobjectValue::IpPrefix(IpNet::V4(net)) => Ok(format_subobject(
            writer,
            EroSubobjectType::Ipv4Prefix.into(),
            subobject.loose(),
            &ipv4_prefix_body(net, 0),
        )?),
        EroSubobjectValue::IpPrefix(IpNet::V6(_)) => write_ero_ipv6_prefix(subobject, writer),
        other => Err(SubobjectWritingError::UnexpectedEroSubobject(other.kind())),
    }
}

pub fn write_ero_ipv6_prefix(
    subobject: &EroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    match subobject.value() {
        EroSubobjectValue::IpPrefix(IpNet::V6(net)) => Ok(format_subobject(
            writer,
            EroSubobjectType::Ipv6Prefix.into(),
            subobject.loose(),
            &ipv6_prefix_body(net, 0),
        )?),
        EroSubobjectValue::IpPrefix(IpNet::V4(_)) => write_ero_ipv4_prefix(subobject, writer),
        other => Err(SubobjectWritingError::UnexpectedEroSubobject(other.kind())),
    }
}

fn write_nai(body: &mut Vec<u8>, nai: &Nai) -> std::io::Result<()> {
    match nai {
        Nai::Ipv4Node(node) => body.write_all(&node.octets()),
        Nai::Ipv6Node(node) => body.write_all(&node.octets()),
        Nai::Ipv4Adjacency { local, remote } => {
            body.write_all(&local.octets())?;
            body.write_all(&remote.octets())
        }
        Nai::Ipv6Adjacency { local, remote } => {
            body.write_all(&local.octets())?;
            body.write_all(&remote.octets())
        }
        Nai::Unnumbered {
            local_node,
            local_interface,
            remote_node,
            remote_interface,
        } => {
            body.write_u32::<NetworkEndian>(*local_node)?;
            body.write_u32::<NetworkEndian>(*local_interface)?;
            body.write_u32::<NetworkEndian>(*remote_node)?;
            body.write_u32::<NetworkEndian>(*remote_interface)
        }
    }
}

pub fn write_sr_ero(
    subobject: &EroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    let sr = match subobject.value() {
        EroSubobjectValue::SrEro(sr) => sr,
        other => return Err(SubobjectWritingError::UnexpectedEroSubobject(other.kind())),
    };
    let mut nt_flags = (u8::from(sr.nai_type()) as u16) << SR_ERO_NT_SHIFT;
    if sr.nai().is_none() {
        nt_flags |= SR_ERO_F_MASK;
    }
    if sr.sid().is_none() {
        nt_flags |= SR_ERO_S_MASK;
    }
    if sr.c_flag() {
        nt_flags |= SR_ERO_C_MASK;
    }
    if sr.m_flag() {
        nt_flags |= SR_ERO_M_MASK;
    }
    let mut body = Vec::new();
    body.write_u16::<NetworkEndian>(nt_flags)?;
    if let Some(sid) = sr.sid() {
        body.write_u32::<NetworkEndian>(sid)?;
    }
    if let Some(nai) = sr.nai() {
        write_nai(&mut body, nai)?;
    }
    format_subobject(
        writer,
        EroSubobjectType::SrEro.into(),
        subobject.loose(),
        &body,
    )?;
    Ok(())
}

/// XRO subobject serializers bound in [crate::PcepExtensions]
///
/// IPv6 prefixes handed to the IPv4 serializer are written as type 2.
pub fn write_xro_ipv4_prefix(
    subobject: &XroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    match subobject.value() {
        XroSubobjectValue::IpPrefix(IpNet::V4(net)) => Ok(format_subobject(
            writer,
            XroSubobjectType::Ipv4Prefix.into(),
            subobject.mandatory(),
            &ipv4_prefix_body(net, subobject.attribute().into()),
        )?),
        XroSubobjectValue::IpPrefix(IpNet::V6(_)) => write_xro_ipv6_prefix(subobject, writer),
        other => Err(SubobjectWritingError::UnexpectedXroSubobject(other.kind())),
    }
}

pub fn write_xro_ipv6_prefix(
    subobject: &XroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    match subobject.value() {
        XroSubobjectValue::IpPrefix(IpNet::V6(net)) => Ok(format_subobject(
            writer,
            XroSubobjectType::Ipv6Prefix.into(),
            subobject.mandatory(),
            &ipv6_prefix_body(net, subobject.attribute().into()),
        )?),
        XroSubobjectValue::IpPrefix(IpNet::V4(_)) => write_xro_ipv4_prefix(subobject, writer),
        other => Err(SubobjectWritingError::UnexpectedXroSubobject(other.kind())),
    }
}

pub fn write_xro_srlg(
    subobject: &XroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    match subobject.value() {
        XroSubobjectValue::Srlg(srlg) => {
            let mut body = Vec::with_capacity(5);
            body.write_u32::<NetworkEndian>(*srlg)?;
            body.write_u8(subobject.attribute().into())?;
            format_subobject(
                writer,
                XroSubobjectType::Srlg.into(),
                subobject.mandatory(),
                &body,
            )?;
            Ok(())
        }
        other => Err(SubobjectWritingError::UnexpectedXroSubobject(other.kind())),
    }
}
