// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Round-trip validation of textual device paths.
//!
//! Firmware parses device path text leniently: `PciRoot(0)` and
//! `PciRoot(0x0)` describe the same node. The bootloader however compares
//! paths textually, so only the canonical spelling is useful. A path is
//! considered legal when converting it to its binary form and back yields
//! the same text, ignoring ASCII case.
//!
//! The conversion itself is delegated to a [`DevicePathCodec`]. If any step
//! of the conversion fails the path cannot be checked and is reported as
//! legal.

#[cfg(feature = "basic-codec")]
#[cfg_attr(docsrs, doc(cfg(feature = "basic-codec")))]
pub mod basic;

use alloc::vec::Vec;
use core::char::{REPLACEMENT_CHARACTER, decode_utf16};
use core::fmt::{self, Display, Formatter, Write};

use tracing::{debug, warn};

use crate::error::DevicePathError;

/// A converter between the UTF-16 text form and the binary form of device
/// paths.
pub trait DevicePathCodec {
    /// The binary device path produced by [`text_to_binary`].
    ///
    /// [`text_to_binary`]: DevicePathCodec::text_to_binary
    type Binary;

    /// Converts device path text to its binary form.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed.
    fn text_to_binary(&self, text: &[u16]) -> Result<Self::Binary, DevicePathError>;

    /// Converts a binary device path back to text.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary path cannot be rendered.
    fn binary_to_text(&self, path: &Self::Binary) -> Result<Vec<u16>, DevicePathError>;
}

/// The text of a device path before and after a round trip through a codec.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundTrip {
    /// The input, widened to UTF-16.
    pub original: Vec<u16>,
    /// The codec's rendering of the parsed input.
    pub rendered: Vec<u16>,
}

impl RoundTrip {
    /// Returns whether the rendering matches the input, ignoring ASCII case.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        wide_eq_ignore_ascii_case(&self.original, &self.rendered)
    }
}

/// Converts `path` to UTF-16, parses it with `codec` and renders it back.
///
/// The binary representation is dropped before this returns, whether or not
/// rendering succeeded.
///
/// # Errors
///
/// Returns [`DevicePathError::NonAscii`] if `path` is not ASCII, or the
/// codec's error if either conversion fails.
pub fn round_trip<C: DevicePathCodec + ?Sized>(
    codec: &C,
    path: &[u8],
) -> Result<RoundTrip, DevicePathError> {
    let original = ascii_to_wide(path)?;
    let binary = codec.text_to_binary(&original)?;
    let rendered = codec.binary_to_text(&binary)?;
    Ok(RoundTrip { original, rendered })
}

/// Returns whether `path` is a legal device path.
///
/// The path is legal if it survives a round trip through `codec` unchanged,
/// ignoring ASCII case. A mismatch is logged as a warning. If the round trip
/// cannot be completed the path is assumed to be legal.
#[must_use]
pub fn device_path_is_legal<C: DevicePathCodec + ?Sized>(
    codec: &C,
    path: impl AsRef<[u8]>,
) -> bool {
    match round_trip(codec, path.as_ref()) {
        Ok(trip) if trip.is_stable() => true,
        Ok(trip) => {
            warn!(
                "Original path: {}\nPath after internal conversion: {}",
                WideStr(&trip.original),
                WideStr(&trip.rendered),
            );
            false
        }
        Err(err) => {
            debug!(%err, "device path round trip not completed");
            true
        }
    }
}

/// Widens ASCII bytes to UTF-16 code units.
///
/// # Errors
///
/// Returns [`DevicePathError::NonAscii`] with the offset of the first byte
/// that is not 7-bit ASCII.
pub fn ascii_to_wide(ascii: &[u8]) -> Result<Vec<u16>, DevicePathError> {
    ascii
        .iter()
        .enumerate()
        .map(|(offset, &ch)| {
            if ch.is_ascii() {
                Ok(u16::from(ch))
            } else {
                Err(DevicePathError::NonAscii { offset })
            }
        })
        .collect()
}

/// Compares two UTF-16 strings, folding only ASCII letters.
#[must_use]
pub fn wide_eq_ignore_ascii_case(a: &[u16], b: &[u16]) -> bool {
    fn fold(unit: u16) -> u16 {
        match u8::try_from(unit) {
            Ok(ch) => u16::from(ch.to_ascii_lowercase()),
            Err(_) => unit,
        }
    }

    a.len() == b.len() && a.iter().zip(b).all(|(&a, &b)| fold(a) == fold(b))
}

/// Displays UTF-16 text, replacing unpaired surrogates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WideStr<'a>(pub &'a [u16]);

impl Display for WideStr<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for ch in decode_utf16(self.0.iter().copied()) {
            f.write_char(ch.unwrap_or(REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}
