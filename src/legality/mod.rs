// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character-set predicates for single configuration values.
//!
//! Every predicate takes the raw bytes of one value as stored in the
//! configuration tree and returns whether the bootloader can consume it.
//! Values are not null-terminated: a NUL byte is an ordinary character and is
//! rejected by every character set below. The predicates never log.

pub mod arch;
pub mod identifier;

/// Suffix required on UEFI driver and bootloader file names.
pub(crate) const EFI_SUFFIX: &[u8] = b".efi";

/// Returns whether `ch` may appear in a file system path:
/// `[0-9A-Za-z_./\-]` plus `\`.
fn is_path_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'_' | b'-' | b'.' | b'/' | b'\\')
}

/// Returns whether `ch` may appear in a driver file name: `[0-9A-Za-z_./-]`.
fn is_driver_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'_' | b'-' | b'.' | b'/')
}

/// Returns whether `ch` may appear in a patch identifier: `[0-9A-Za-z_.-]`.
pub(crate) fn is_identifier_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'_' | b'-' | b'.')
}

/// Returns whether `value` ends with `suffix`, ignoring ASCII case.
pub(crate) fn ends_with_ignore_ascii_case(value: &[u8], suffix: &[u8]) -> bool {
    value.len() >= suffix.len() && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Returns whether `path` is a legal file system path.
///
/// Only ASCII letters, digits, `_`, `-`, `.`, `/` and `\` are allowed. The
/// empty path is legal.
#[must_use]
pub fn path_is_legal(path: impl AsRef<[u8]>) -> bool {
    path.as_ref().iter().all(|&ch| is_path_char(ch))
}

/// Returns whether `comment` is a legal human-readable comment.
///
/// Comments may contain any printable ASCII character, space through `~`.
#[must_use]
pub fn comment_is_legal(comment: impl AsRef<[u8]>) -> bool {
    comment
        .as_ref()
        .iter()
        .all(|&ch| ch.is_ascii_graphic() || ch == b' ')
}

/// Returns whether `property` is a legal property value.
///
/// Property values follow the same rule as comments.
#[must_use]
pub fn property_is_legal(property: impl AsRef<[u8]>) -> bool {
    comment_is_legal(property)
}

/// Returns whether `driver` is a legal UEFI driver file name.
///
/// The name must end with `.efi`, ignoring case. A name starting with `#` is
/// commented out and the rest of it is not checked; otherwise only ASCII
/// letters, digits, `_`, `-`, `.` and `/` are allowed. A `#` anywhere but the
/// first position is an ordinary, illegal character.
#[must_use]
pub fn driver_is_legal(driver: impl AsRef<[u8]>) -> bool {
    let driver = driver.as_ref();

    if !ends_with_ignore_ascii_case(driver, EFI_SUFFIX) {
        return false;
    }

    if driver.first() == Some(&b'#') {
        return true;
    }

    driver.iter().all(|&ch| is_driver_char(ch))
}
