// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Patch target identifiers.

use super::{EFI_SUFFIX, ends_with_ignore_ascii_case, is_identifier_char};

/// Which kind of patch an identifier belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IdentifierKind {
    /// `Kernel->Patch->Identifier`: the kernel itself or a kext bundle.
    Kernel,
    /// `Booter->Patch->Identifier`: a bootloader image.
    Booter,
}

/// Returns whether `identifier` is a legal patch target for `kind`.
///
/// For [`IdentifierKind::Kernel`], `kernel` is always legal. Anything else
/// must look like a bundle identifier.
///
/// For [`IdentifierKind::Booter`], `Any` and `Apple` are always legal.
/// Anything else must end with `.efi` (ignoring case) and look like a bundle
/// identifier.
///
/// A bundle identifier contains at least one `.` and consists only of ASCII
/// letters, digits, `_`, `-` and `.`.
#[must_use]
pub fn identifier_is_legal(identifier: impl AsRef<[u8]>, kind: IdentifierKind) -> bool {
    let identifier = identifier.as_ref();

    match kind {
        IdentifierKind::Kernel => {
            if identifier == b"kernel" {
                return true;
            }
        }
        IdentifierKind::Booter => {
            if identifier == b"Any" || identifier == b"Apple" {
                return true;
            }
            if !ends_with_ignore_ascii_case(identifier, EFI_SUFFIX) {
                return false;
            }
        }
    }

    identifier.contains(&b'.') && identifier.iter().all(|&ch| is_identifier_char(ch))
}
