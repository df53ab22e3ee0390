// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types for the `bootcfg-check` crate.

use core::fmt::{self, Display, Formatter};

use thiserror::Error;

/// A single inconsistency found in a binary patch.
///
/// Sizes are in bytes. The section name and patch index are not part of the
/// violation; [`validate_patch`](crate::patch::validate_patch) logs them
/// alongside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum PatchViolation {
    /// `Find` and `Replace` have different sizes.
    #[error("has different Find and Replace size ({find} vs {replace})")]
    SizeMismatch {
        /// Size of `Find`.
        find: usize,
        /// Size of `Replace`.
        replace: usize,
    },
    /// `Mask` is set but its size is different from `Find`.
    #[error("has Mask set but its size is different from Find ({mask} vs {find})")]
    MaskSizeMismatch {
        /// Size of `Mask`.
        mask: usize,
        /// Size of `Find`.
        find: usize,
    },
    /// `Find` asserts bits that `Mask` does not cover.
    #[error("Find requires Mask to be active for corresponding bits")]
    FindNotCoveredByMask,
    /// `ReplaceMask` is set but its size is different from `Replace`.
    #[error("has ReplaceMask set but its size is different from Replace ({mask} vs {replace})")]
    ReplaceMaskSizeMismatch {
        /// Size of `ReplaceMask`.
        mask: usize,
        /// Size of `Replace`.
        replace: usize,
    },
    /// `Replace` asserts bits that `ReplaceMask` does not cover.
    #[error("Replace requires ReplaceMask to be active for corresponding bits")]
    ReplaceNotCoveredByMask,
}

/// An error that can occur while converting a device path between its
/// textual and binary forms.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum DevicePathError {
    /// The input contained a byte outside the 7-bit ASCII range.
    #[error("non-ASCII byte at offset {offset}")]
    NonAscii {
        /// Offset of the offending byte.
        offset: usize,
    },
    /// The text could not be converted to a binary device path.
    #[error("{kind} at offset {offset}")]
    Parse {
        /// Offset into the text, in UTF-16 code units.
        offset: usize,
        /// The type of the error that has occurred.
        kind: DevicePathErrorKind,
    },
    /// The binary device path could not be rendered as text.
    #[error("cannot render device path: {0}")]
    Render(DevicePathErrorKind),
}

/// The kind of a device path conversion failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum DevicePathErrorKind {
    /// The path has no nodes.
    Empty,
    /// A node name is not understood by the codec.
    UnknownNode,
    /// A node has the wrong number of arguments.
    ArgumentCount,
    /// A node argument is not a number or does not fit its field.
    InvalidNumber,
    /// Parentheses are missing or unbalanced.
    Syntax,
    /// A binary node is truncated or has an impossible length.
    InvalidLength,
    /// A binary path is not terminated with an end node.
    MissingEnd,
}

impl Display for DevicePathErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DevicePathErrorKind::Empty => write!(f, "empty device path"),
            DevicePathErrorKind::UnknownNode => write!(f, "unknown device path node"),
            DevicePathErrorKind::ArgumentCount => {
                write!(f, "wrong number of node arguments")
            }
            DevicePathErrorKind::InvalidNumber => write!(f, "invalid numeric argument"),
            DevicePathErrorKind::Syntax => write!(f, "malformed node syntax"),
            DevicePathErrorKind::InvalidLength => write!(f, "invalid node length"),
            DevicePathErrorKind::MissingEnd => {
                write!(f, "device path not terminated with an end node")
            }
        }
    }
}

/// An error returned when parsing an architecture tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("unknown architecture")]
pub struct ArchError;
