// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::{Arc, Mutex};

use bootcfg_check::report::ErrorCount;
use bootcfg_check::{Patch, report_outcome, validate_patch};
use tracing::Level;

/// Shared buffer that collects formatted log lines.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Runs `f` with a subscriber that records everything at debug level and
/// above, and returns `f`'s result with the log output.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}

#[test]
fn no_errors() {
    let (count, logs) = capture_logs(|| report_outcome("CheckKernel", 0));
    assert_eq!(count, 0);
    assert!(logs.contains("DEBUG"));
    assert!(logs.contains("CheckKernel returns no errors!"));
    assert!(!logs.contains("WARN"));
}

#[test]
fn one_error() {
    let (count, logs) = capture_logs(|| report_outcome("CheckBooter", 1));
    assert_eq!(count, 1);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("CheckBooter returns 1 error!"));
}

#[test]
fn several_errors() {
    let (count, logs) = capture_logs(|| report_outcome("CheckUefi", 3));
    assert_eq!(count, 3);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("CheckUefi returns 3 errors!"));
}

#[test]
fn counts_chain_inline() {
    let patch = Patch::new(&[1, 2, 3, 4], &[1, 2]);
    let total = report_outcome("CheckKernel", validate_patch("Kernel->Patch", 0, &patch))
        + report_outcome("CheckMisc", 0);
    assert_eq!(total, 1);
}

#[test]
fn patch_violations_are_logged() {
    let patch = Patch::new(&[1, 2, 3, 4], &[1, 2]);
    let (count, logs) = capture_logs(|| validate_patch("Kernel->Patch", 5, &patch));
    assert_eq!(count, 1);
    assert!(logs.contains("Kernel->Patch[5] has different Find and Replace size (4 vs 2)!"));
}

#[test]
fn pluralization() {
    assert_eq!(ErrorCount(0).to_string(), "no errors");
    assert_eq!(ErrorCount(1).to_string(), "1 error");
    assert_eq!(ErrorCount(2).to_string(), "2 errors");
}
