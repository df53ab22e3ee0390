// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Summaries of validation passes.

use core::fmt::{self, Display, Formatter};

use tracing::{debug, warn};

/// Displays a violation count as `no errors`, `1 error` or `N errors`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ErrorCount(pub u32);

impl Display for ErrorCount {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.0 {
            0 => f.write_str("no errors"),
            1 => f.write_str("1 error"),
            count => write!(f, "{count} errors"),
        }
    }
}

/// Logs the outcome of the validation pass `name` and returns `error_count`
/// unchanged.
///
/// A non-zero count is logged as a warning, zero at debug level. The return
/// value lets callers sum passes inline:
///
/// ```
/// use bootcfg_check::report_outcome;
///
/// let total = report_outcome("CheckKernel", 2) + report_outcome("CheckUefi", 0);
/// assert_eq!(total, 2);
/// ```
pub fn report_outcome(name: &str, error_count: u32) -> u32 {
    if error_count != 0 {
        warn!("{name} returns {}!", ErrorCount(error_count));
    } else {
        debug!("{name} returns {}!", ErrorCount(error_count));
    }

    error_count
}
