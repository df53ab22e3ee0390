// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small device path codec for PCI topology paths.
//!
//! [`BasicCodec`] understands the nodes that make up the device paths of
//! PCI devices in a configuration file: `PciRoot(UID)`, `PcieRoot(UID)` and
//! `Pci(Device,Function)`. Numeric arguments may be written in decimal or
//! with a `0x` prefix in hexadecimal; they are always rendered as lowercase
//! `0x` hexadecimal, as firmware does. Any other node fails to parse.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use zerocopy::byteorder::little_endian;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::DevicePathCodec;
use crate::error::{DevicePathError, DevicePathErrorKind};

const HARDWARE_DEVICE_PATH: u8 = 0x01;
const HW_PCI_DP: u8 = 0x01;
const ACPI_DEVICE_PATH: u8 = 0x02;
const ACPI_DP: u8 = 0x01;
const END_DEVICE_PATH_TYPE: u8 = 0x7f;
const END_ENTIRE_DEVICE_PATH_SUBTYPE: u8 = 0xff;

/// Compressed EISA ID of the `PNP0A03` PCI host bridge.
const PNP0A03: u32 = eisa_pnp_id(0x0a03);
/// Compressed EISA ID of the `PNP0A08` PCI Express host bridge.
const PNP0A08: u32 = eisa_pnp_id(0x0a08);

const fn eisa_pnp_id(product: u32) -> u32 {
    (product << 16) | 0x41d0
}

/// Generic header at the start of every binary device path node.
#[repr(C)]
#[derive(Debug, Copy, Clone, FromBytes, IntoBytes, Unaligned, Immutable, KnownLayout)]
struct NodeHeader {
    node_type: u8,
    sub_type: u8,
    /// Length of the whole node, header included.
    length: little_endian::U16,
}

impl NodeHeader {
    #[allow(clippy::cast_possible_truncation)]
    fn new<T>(node_type: u8, sub_type: u8) -> Self {
        // Nodes are a handful of bytes.
        Self {
            node_type,
            sub_type,
            length: little_endian::U16::new(size_of::<T>() as u16),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, FromBytes, IntoBytes, Unaligned, Immutable, KnownLayout)]
struct AcpiNode {
    header: NodeHeader,
    hid: little_endian::U32,
    uid: little_endian::U32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, FromBytes, IntoBytes, Unaligned, Immutable, KnownLayout)]
struct PciNode {
    header: NodeHeader,
    function: u8,
    device: u8,
}

/// A binary device path as produced by [`BasicCodec`], end node included.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BinaryDevicePath(Vec<u8>);

impl BinaryDevicePath {
    /// Wraps raw device path bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the device path.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Device path codec for PCI topology paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicCodec;

impl DevicePathCodec for BasicCodec {
    type Binary = BinaryDevicePath;

    fn text_to_binary(&self, text: &[u16]) -> Result<BinaryDevicePath, DevicePathError> {
        let text = narrow(text)?;
        if text.is_empty() {
            return Err(parse_error(0, DevicePathErrorKind::Empty));
        }

        let mut bytes = Vec::new();
        let mut offset = 0;
        for node in text.split('/') {
            encode_node(node, offset, &mut bytes)?;
            offset += node.len() + 1;
        }

        bytes.extend_from_slice(
            NodeHeader::new::<NodeHeader>(END_DEVICE_PATH_TYPE, END_ENTIRE_DEVICE_PATH_SUBTYPE)
                .as_bytes(),
        );
        Ok(BinaryDevicePath(bytes))
    }

    fn binary_to_text(&self, path: &BinaryDevicePath) -> Result<Vec<u16>, DevicePathError> {
        let mut nodes = Vec::new();
        let mut rest = path.as_bytes();

        loop {
            let (header, _) = NodeHeader::read_from_prefix(rest)
                .map_err(|_| render_error(DevicePathErrorKind::MissingEnd))?;
            let length = usize::from(header.length.get());
            if length < size_of::<NodeHeader>() || length > rest.len() {
                return Err(render_error(DevicePathErrorKind::InvalidLength));
            }
            let (node, tail) = rest.split_at(length);
            rest = tail;

            match (header.node_type, header.sub_type) {
                (END_DEVICE_PATH_TYPE, END_ENTIRE_DEVICE_PATH_SUBTYPE) => break,
                (ACPI_DEVICE_PATH, ACPI_DP) => nodes.push(render_acpi(node)?),
                (HARDWARE_DEVICE_PATH, HW_PCI_DP) => nodes.push(render_pci(node)?),
                _ => return Err(render_error(DevicePathErrorKind::UnknownNode)),
            }
        }

        if nodes.is_empty() {
            return Err(render_error(DevicePathErrorKind::Empty));
        }

        Ok(nodes.join("/").encode_utf16().collect())
    }
}

fn parse_error(offset: usize, kind: DevicePathErrorKind) -> DevicePathError {
    DevicePathError::Parse { offset, kind }
}

fn render_error(kind: DevicePathErrorKind) -> DevicePathError {
    DevicePathError::Render(kind)
}

/// Converts UTF-16 text to a `String`, accepting only ASCII.
fn narrow(text: &[u16]) -> Result<String, DevicePathError> {
    text.iter()
        .enumerate()
        .map(|(offset, &unit)| {
            u8::try_from(unit)
                .ok()
                .filter(u8::is_ascii)
                .map(char::from)
                .ok_or(parse_error(offset, DevicePathErrorKind::Syntax))
        })
        .collect()
}

/// Parses one `Name(arg,...)` node starting at `offset` and appends its
/// binary form to `out`.
fn encode_node(node: &str, offset: usize, out: &mut Vec<u8>) -> Result<(), DevicePathError> {
    let syntax = || parse_error(offset, DevicePathErrorKind::Syntax);

    let (name, args) = node.split_once('(').ok_or_else(syntax)?;
    let args = args.strip_suffix(')').ok_or_else(syntax)?;
    if name.is_empty() || args.contains(['(', ')']) {
        return Err(syntax());
    }
    let args_offset = offset + name.len() + 1;

    match name {
        "PciRoot" | "PcieRoot" => {
            let [uid] = parse_args::<1>(args, args_offset)?;
            let hid = if name == "PciRoot" { PNP0A03 } else { PNP0A08 };
            let node = AcpiNode {
                header: NodeHeader::new::<AcpiNode>(ACPI_DEVICE_PATH, ACPI_DP),
                hid: little_endian::U32::new(hid),
                uid: little_endian::U32::new(narrow_number(uid, args_offset)?),
            };
            out.extend_from_slice(node.as_bytes());
        }
        "Pci" => {
            let [device, function] = parse_args::<2>(args, args_offset)?;
            let node = PciNode {
                header: NodeHeader::new::<PciNode>(HARDWARE_DEVICE_PATH, HW_PCI_DP),
                function: narrow_number(function, args_offset)?,
                device: narrow_number(device, args_offset)?,
            };
            out.extend_from_slice(node.as_bytes());
        }
        _ => return Err(parse_error(offset, DevicePathErrorKind::UnknownNode)),
    }

    Ok(())
}

/// Splits `args` on commas and parses exactly `N` numbers.
fn parse_args<const N: usize>(args: &str, offset: usize) -> Result<[u64; N], DevicePathError> {
    let mut values = [0; N];
    let mut count = 0;

    for arg in args.split(',') {
        let slot = values
            .get_mut(count)
            .ok_or(parse_error(offset, DevicePathErrorKind::ArgumentCount))?;
        *slot = parse_number(arg)
            .ok_or(parse_error(offset, DevicePathErrorKind::InvalidNumber))?;
        count += 1;
    }

    if count == N {
        Ok(values)
    } else {
        Err(parse_error(offset, DevicePathErrorKind::ArgumentCount))
    }
}

/// Parses a decimal number or a `0x`-prefixed hexadecimal number.
fn parse_number(arg: &str) -> Option<u64> {
    match arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => arg.parse().ok(),
    }
}

fn narrow_number<T: TryFrom<u64>>(value: u64, offset: usize) -> Result<T, DevicePathError> {
    T::try_from(value).map_err(|_| parse_error(offset, DevicePathErrorKind::InvalidNumber))
}

fn render_acpi(node: &[u8]) -> Result<String, DevicePathError> {
    let node = AcpiNode::read_from_bytes(node)
        .map_err(|_| render_error(DevicePathErrorKind::InvalidLength))?;
    let name = match node.hid.get() {
        PNP0A03 => "PciRoot",
        PNP0A08 => "PcieRoot",
        _ => return Err(render_error(DevicePathErrorKind::UnknownNode)),
    };
    Ok(format!("{name}(0x{:x})", node.uid.get()))
}

fn render_pci(node: &[u8]) -> Result<String, DevicePathError> {
    let node = PciNode::read_from_bytes(node)
        .map_err(|_| render_error(DevicePathErrorKind::InvalidLength))?;
    Ok(format!("Pci(0x{:x},0x{:x})", node.device, node.function))
}
