// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rule-checking kernel for a firmware bootloader's configuration file.
//!
//! A configuration walker pulls one field at a time out of the parsed
//! configuration tree and asks this crate whether it is legal:
//!
//! - [`legality`] holds the pure character-set predicates for paths,
//!   comments, identifiers, architecture tags and driver file names.
//! - [`patch`] checks that a find/replace binary patch has consistent sizes
//!   and masks, counting every violation it finds.
//! - [`device_path`] round-trips a textual device path through a
//!   [`DevicePathCodec`] and reports whether the text is stable.
//! - [`report`] turns a violation count into a one-line log summary.
//!
//! None of the checks mutate their input or keep state between calls. The
//! caller sums the returned counts.
//!
//! Diagnostics go through [`tracing`]; no subscriber is installed here.

#![no_std]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod device_path;
pub mod error;
pub mod legality;
pub mod patch;
pub mod report;

pub use self::device_path::{DevicePathCodec, device_path_is_legal};
pub use self::legality::arch::{ArchMode, architecture_is_legal};
pub use self::legality::identifier::{IdentifierKind, identifier_is_legal};
pub use self::legality::{comment_is_legal, driver_is_legal, path_is_legal, property_is_legal};
pub use self::patch::{Patch, has_proper_masking, validate_patch};
pub use self::report::report_outcome;
