// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Architecture tags.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::error::ArchError;

/// Where an architecture tag appears, which decides the special values it
/// may take.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArchMode {
    /// `Kernel->Scheme->KernelArch`.
    KernelArch,
    /// Any other `Arch` field, such as on kext entries and patches.
    Other,
}

/// A known architecture tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// Matches every architecture.
    Any,
    /// Let the bootloader pick the kernel architecture.
    Auto,
    /// 32-bit kernel with 32-bit userspace.
    I386User32,
    /// 32-bit.
    I386,
    /// 64-bit.
    X86_64,
}

impl Arch {
    fn as_str(self) -> &'static str {
        match self {
            Arch::Any => "Any",
            Arch::Auto => "Auto",
            Arch::I386User32 => "i386-user32",
            Arch::I386 => "i386",
            Arch::X86_64 => "x86_64",
        }
    }

    /// Parses a tag from raw configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError`] if `bytes` is not exactly one of the known tags.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchError> {
        match bytes {
            b"Any" => Ok(Self::Any),
            b"Auto" => Ok(Self::Auto),
            b"i386-user32" => Ok(Self::I386User32),
            b"i386" => Ok(Self::I386),
            b"x86_64" => Ok(Self::X86_64),
            _ => Err(ArchError),
        }
    }

    /// Returns whether this tag may be used in `mode`.
    ///
    /// `i386` and `x86_64` are allowed everywhere. `Auto` and `i386-user32`
    /// only make sense for the kernel architecture, and `Any` only elsewhere.
    #[must_use]
    pub fn is_allowed(self, mode: ArchMode) -> bool {
        match self {
            Arch::I386 | Arch::X86_64 => true,
            Arch::Auto | Arch::I386User32 => mode == ArchMode::KernelArch,
            Arch::Any => mode == ArchMode::Other,
        }
    }
}

impl Display for Arch {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// Returns whether `arch` is a legal architecture tag in `mode`.
///
/// Matching is exact and case-sensitive.
#[must_use]
pub fn architecture_is_legal(arch: impl AsRef<[u8]>, mode: ArchMode) -> bool {
    Arch::from_bytes(arch.as_ref()).is_ok_and(|arch| arch.is_allowed(mode))
}
