// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Find/replace binary patches.
//!
//! A patch describes a targeted binary modification: every occurrence of
//! `Find` is overwritten with `Replace`. Optional masks restrict which bits
//! of `Find` are compared and which bits of `Replace` are written. A mask
//! must claim every bit that its pattern asserts, otherwise the pattern says
//! something the mask throws away.

use tracing::warn;

use crate::error::PatchViolation;

/// A borrowed view of one binary patch entry.
///
/// An empty mask means the mask is absent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Patch<'a> {
    find: &'a [u8],
    replace: &'a [u8],
    mask: &'a [u8],
    replace_mask: &'a [u8],
    find_size_can_be_zero: bool,
}

impl<'a> Patch<'a> {
    /// Creates a new [`Patch`] without masks.
    #[must_use]
    pub const fn new(find: &'a [u8], replace: &'a [u8]) -> Self {
        Self {
            find,
            replace,
            mask: &[],
            replace_mask: &[],
            find_size_can_be_zero: false,
        }
    }

    /// Sets the mask applied to `Find`.
    #[must_use]
    pub const fn with_mask(mut self, mask: &'a [u8]) -> Self {
        self.mask = mask;
        self
    }

    /// Sets the mask applied to `Replace`.
    #[must_use]
    pub const fn with_replace_mask(mut self, replace_mask: &'a [u8]) -> Self {
        self.replace_mask = replace_mask;
        self
    }

    /// Sets whether this patch kind may leave `Find` empty.
    ///
    /// Such patches locate their target some other way, so `Find` and
    /// `Replace` are not required to have the same size.
    #[must_use]
    pub const fn with_find_size_can_be_zero(mut self, find_size_can_be_zero: bool) -> Self {
        self.find_size_can_be_zero = find_size_can_be_zero;
        self
    }

    /// Returns the pattern to look for.
    #[must_use]
    pub const fn find(&self) -> &'a [u8] {
        self.find
    }

    /// Returns the bytes to write.
    #[must_use]
    pub const fn replace(&self) -> &'a [u8] {
        self.replace
    }

    /// Returns the mask applied to `Find`, if any.
    #[must_use]
    pub const fn mask(&self) -> Option<&'a [u8]> {
        if self.mask.is_empty() {
            None
        } else {
            Some(self.mask)
        }
    }

    /// Returns the mask applied to `Replace`, if any.
    #[must_use]
    pub const fn replace_mask(&self) -> Option<&'a [u8]> {
        if self.replace_mask.is_empty() {
            None
        } else {
            Some(self.replace_mask)
        }
    }

    /// Returns every inconsistency in this patch.
    ///
    /// The checks are independent, so one patch can yield several
    /// violations. They are yielded in this order: the `Find`/`Replace` size,
    /// then `Mask`, then `ReplaceMask`.
    pub fn violations(&self) -> impl Iterator<Item = PatchViolation> + use<> {
        let size = (!self.find_size_can_be_zero && self.find.len() != self.replace.len()).then_some(
            PatchViolation::SizeMismatch {
                find: self.find.len(),
                replace: self.replace.len(),
            },
        );

        let mask = self.mask().and_then(|mask| {
            if mask.len() != self.find.len() {
                Some(PatchViolation::MaskSizeMismatch {
                    mask: mask.len(),
                    find: self.find.len(),
                })
            } else if !has_proper_masking(self.find, mask) {
                Some(PatchViolation::FindNotCoveredByMask)
            } else {
                None
            }
        });

        let replace_mask = self.replace_mask().and_then(|mask| {
            if mask.len() != self.replace.len() {
                Some(PatchViolation::ReplaceMaskSizeMismatch {
                    mask: mask.len(),
                    replace: self.replace.len(),
                })
            } else if !has_proper_masking(self.replace, mask) {
                Some(PatchViolation::ReplaceNotCoveredByMask)
            } else {
                None
            }
        });

        [size, mask, replace_mask].into_iter().flatten()
    }
}

/// Returns whether every bit set in `data` is also set in `mask`.
///
/// `data` and `mask` are expected to have the same length; only the common
/// prefix is compared.
#[must_use]
pub fn has_proper_masking(data: &[u8], mask: &[u8]) -> bool {
    data.iter().zip(mask).all(|(&data, &mask)| data & !mask == 0)
}

/// Validates one patch and returns the number of violations found.
///
/// `section` and `index` locate the patch in the configuration and are only
/// used for logging. Each violation is logged as a warning.
pub fn validate_patch(section: &str, index: usize, patch: &Patch<'_>) -> u32 {
    patch.violations().fold(0, |count, violation| {
        warn!(section, index, "{section}[{index}] {violation}!");
        count + 1
    })
}
