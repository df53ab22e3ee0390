// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use bootcfg_check::error::PatchViolation;
use bootcfg_check::{Patch, has_proper_masking, validate_patch};
use proptest::prelude::*;

#[test]
fn masking() {
    assert!(has_proper_masking(&[0xff], &[0xff]));
    assert!(!has_proper_masking(&[0xff], &[0x0f]));
    assert!(has_proper_masking(&[0x0f], &[0xff]));
    assert!(has_proper_masking(&[0x00, 0x00], &[0x00, 0x00]));
    assert!(!has_proper_masking(&[0x00, 0x01], &[0xff, 0x00]));
    assert!(has_proper_masking(&[], &[]));
}

#[test]
fn plain_patch() {
    let patch = Patch::new(&[0x48, 0x85, 0xc0], &[0x48, 0x31, 0xc0]);
    assert_eq!(validate_patch("Kernel->Patch", 0, &patch), 0);
    assert_eq!(patch.violations().count(), 0);
}

#[test]
fn size_mismatch() {
    let patch = Patch::new(&[1, 2, 3, 4], &[1, 2]);
    assert_eq!(validate_patch("Kernel->Patch", 3, &patch), 1);
    assert_eq!(
        patch.violations().collect::<Vec<_>>(),
        [PatchViolation::SizeMismatch {
            find: 4,
            replace: 2
        }]
    );
}

#[test]
fn find_size_can_be_zero() {
    let patch = Patch::new(&[], &[0x90, 0x90]).with_find_size_can_be_zero(true);
    assert_eq!(validate_patch("Booter->Patch", 1, &patch), 0);

    let patch = Patch::new(&[1, 2, 3, 4], &[1, 2]).with_find_size_can_be_zero(true);
    assert_eq!(validate_patch("Booter->Patch", 1, &patch), 0);

    let patch = Patch::new(&[], &[0x90, 0x90]);
    assert_eq!(validate_patch("Kernel->Patch", 1, &patch), 1);
}

#[test]
fn mask_size_mismatch() {
    let patch = Patch::new(&[1, 2, 3, 4], &[5, 6, 7, 8]).with_mask(&[0xff, 0xff]);
    assert_eq!(validate_patch("ACPI->Patch", 0, &patch), 1);
    assert_eq!(
        patch.violations().collect::<Vec<_>>(),
        [PatchViolation::MaskSizeMismatch { mask: 2, find: 4 }]
    );

    // Still counted when Find and Replace disagree too.
    let patch = Patch::new(&[1, 2, 3, 4], &[5, 6]).with_mask(&[0xff]);
    assert_eq!(validate_patch("ACPI->Patch", 0, &patch), 2);
}

#[test]
fn find_not_covered_by_mask() {
    let patch = Patch::new(&[0xff, 0x01], &[0x00, 0x00]).with_mask(&[0x0f, 0xff]);
    assert_eq!(validate_patch("Kernel->Patch", 2, &patch), 1);
    assert_eq!(
        patch.violations().collect::<Vec<_>>(),
        [PatchViolation::FindNotCoveredByMask]
    );

    let patch = Patch::new(&[0x0f, 0x01], &[0x00, 0x00]).with_mask(&[0x0f, 0xff]);
    assert_eq!(validate_patch("Kernel->Patch", 2, &patch), 0);
}

#[test]
fn replace_mask() {
    let patch = Patch::new(&[0, 0], &[0xf0, 0x00]).with_replace_mask(&[0xf0, 0x00]);
    assert_eq!(validate_patch("Booter->Patch", 0, &patch), 0);

    let patch = Patch::new(&[0, 0], &[0xf0, 0x01]).with_replace_mask(&[0xf0, 0x00]);
    assert_eq!(
        patch.violations().collect::<Vec<_>>(),
        [PatchViolation::ReplaceNotCoveredByMask]
    );

    let patch = Patch::new(&[0, 0], &[0xf0, 0x01]).with_replace_mask(&[0xf0]);
    assert_eq!(
        patch.violations().collect::<Vec<_>>(),
        [PatchViolation::ReplaceMaskSizeMismatch {
            mask: 1,
            replace: 2
        }]
    );
}

#[test]
fn violations_accumulate() {
    let patch = Patch::new(&[0xff, 0xff, 0xff], &[0xff])
        .with_mask(&[0x00, 0x00, 0x00])
        .with_replace_mask(&[0xff, 0xff]);
    assert_eq!(validate_patch("Kernel->Patch", 7, &patch), 3);
    assert_eq!(
        patch.violations().collect::<Vec<_>>(),
        [
            PatchViolation::SizeMismatch {
                find: 3,
                replace: 1
            },
            PatchViolation::FindNotCoveredByMask,
            PatchViolation::ReplaceMaskSizeMismatch {
                mask: 2,
                replace: 1
            },
        ]
    );
}

#[test]
fn violation_messages() {
    assert_eq!(
        PatchViolation::SizeMismatch {
            find: 4,
            replace: 2
        }
        .to_string(),
        "has different Find and Replace size (4 vs 2)"
    );
    assert_eq!(
        PatchViolation::FindNotCoveredByMask.to_string(),
        "Find requires Mask to be active for corresponding bits"
    );
}

proptest! {
    #[test]
    fn data_within_mask_is_proper(pairs in proptest::collection::vec((any::<u8>(), any::<u8>()), 0..64)) {
        let mask: Vec<u8> = pairs.iter().map(|&(mask, _)| mask).collect();
        let data: Vec<u8> = pairs.iter().map(|&(mask, bits)| mask & bits).collect();
        prop_assert!(has_proper_masking(&data, &mask));
    }

    #[test]
    fn full_mask_accepts_anything(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mask: Vec<u8> = vec![0xff; data.len()];
        prop_assert!(has_proper_masking(&data, &mask));
        let patch = Patch::new(&data, &data).with_mask(&mask).with_replace_mask(&mask);
        prop_assert_eq!(validate_patch("Kernel->Patch", 0, &patch), 0);
    }

    #[test]
    fn uncovered_bit_is_rejected(
        data in proptest::collection::vec(any::<u8>(), 1..64),
        at in any::<proptest::sample::Index>(),
        bit in 0u32..8
    ) {
        let at = at.index(data.len());
        let mut data = data;
        data[at] |= 1 << bit;
        let mut mask: Vec<u8> = vec![0xff; data.len()];
        mask[at] &= !(1u8 << bit);
        prop_assert!(!has_proper_masking(&data, &mask));
    }
}
