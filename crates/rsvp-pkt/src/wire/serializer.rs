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
    extensions::RsvpExtensions,
    iana::XroSubobjectType,
    subobjects::{XroSubobject, XroSubobjectKind, XroSubobjectValue},
};
use byteorder::{NetworkEndian, WriteBytesExt};
use ipnet::IpNet;
use pathwire_parse_utils::envelope::format_subobject;
use pathwire_serde_macros::WritingError;
use std::io::Write;

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum SubobjectWritingError {
    StdIOError(#[from_std_io_error] String),
    /// Serializer was handed a subobject of another kind
    UnexpectedSubobject(XroSubobjectKind),
    UnregisteredSerializer(XroSubobjectKind),
}

fn prefix_body(net: &IpNet, attribute: u8) -> Vec<u8> {
    let mut body = match net {
        IpNet::V4(net) => net.addr().octets().to_vec(),
        IpNet::V6(net) => net.addr().octets().to_vec(),
    };
    body.push(net.prefix_len());
    body.push(attribute);
    body
}

/// Writes IPv4 and IPv6 prefixes alike, the subobject type follows the
/// address family.
pub fn write_xro_ip_prefix(
    subobject: &XroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    let net = match subobject.value() {
        XroSubobjectValue::IpPrefix(net) => net,
        other => return Err(SubobjectWritingError::UnexpectedSubobject(other.kind())),
    };
    let code = match net {
        IpNet::V4(_) => XroSubobjectType::Ipv4Prefix,
        IpNet::V6(_) => XroSubobjectType::Ipv6Prefix,
    };
    format_subobject(
        writer,
        code.into(),
        subobject.mandatory(),
        &prefix_body(net, subobject.attribute().into()),
    )?;
    Ok(())
}

pub fn write_xro_srlg(
    subobject: &XroSubobject,
    writer: &mut dyn Write,
) -> Result<(), SubobjectWritingError> {
    let srlg = match subobject.value() {
        XroSubobjectValue::Srlg(srlg) => *srlg,
        other => return Err(SubobjectWritingError::UnexpectedSubobject(other.kind())),
    };
    let mut body = Vec::with_capacity(6);
    body.write_u32::<NetworkEndian>(srlg)?;
    body.write_u8(0)?;
    body.write_u8(subobject.attribute().into())?;
    format_subobject(
        writer,
        XroSubobjectType::Srlg.into(),
        subobject.mandatory(),
        &body,
    )?;
    Ok(())
}

/// Write each subobject through the serializer registered for its kind
pub fn write_xro_subobjects<T: Write + ?Sized>(
    subobjects: &[XroSubobject],
    extensions: &RsvpExtensions,
    mut writer: &mut T,
) -> Result<(), SubobjectWritingError> {
    for subobject in subobjects {
        let kind = subobject.value().kind();
        let Some(serializer) = extensions.xro_subobjects().serializer(&kind) else {
            return Err(SubobjectWritingError::UnregisteredSerializer(kind));
        };
        serializer(subobject, &mut writer)?;
    }
    Ok(())
}
