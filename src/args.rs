// SPDX-License-Identifier: MIT
//! Translation of [`ScanOptions`] into a `periphery scan` argument vector.
//!
//! Rules, applied per pair in mapping order:
//! 1. keys get underscores replaced with hyphens and a `--` prefix;
//! 2. falsy values emit nothing;
//! 3. `true` emits the bare flag;
//! 4. scalars emit the flag plus one argument token;
//! 5. lists emit the flag once, then either one comma-joined token or one
//!    token per element — Periphery changed its list parsing in 2.18.0, so
//!    the caller decides which encoding applies;
//! 6. the build passthrough key is pulled out and appended last, after a
//!    literal `--` separator.

use crate::options::{OptionValue, ScanOptions, BUILD_ARGS_KEY};

/// How list-valued options are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListEncoding {
    /// Single token, elements joined with commas (Periphery < 2.18.0).
    CommaJoined,
    /// One token per element (Periphery >= 2.18.0).
    Repeated,
}

pub(crate) fn scan_arguments(options: &ScanOptions, lists: ListEncoding) -> Vec<String> {
    let mut args = Vec::new();
    let mut build_args: Option<&OptionValue> = None;

    for (key, value) in options.iter() {
        if key == BUILD_ARGS_KEY {
            build_args = Some(value);
            continue;
        }
        match value {
            OptionValue::Flag(false) => {}
            OptionValue::Flag(true) => args.push(flag(key)),
            OptionValue::Value(scalar) => {
                args.push(flag(key));
                args.push(scalar.clone());
            }
            OptionValue::List(items) => {
                args.push(flag(key));
                match lists {
                    ListEncoding::CommaJoined => args.push(items.join(",")),
                    ListEncoding::Repeated => args.extend(items.iter().cloned()),
                }
            }
        }
    }

    // Raw xcodebuild arguments go last, behind the `--` separator.
    match build_args {
        Some(OptionValue::List(items)) => {
            args.push("--".to_string());
            args.extend(items.iter().cloned());
        }
        Some(OptionValue::Value(scalar)) => {
            args.push("--".to_string());
            args.push(scalar.clone());
        }
        Some(OptionValue::Flag(_)) | None => {}
    }

    args
}

fn flag(key: &str) -> String {
    format!("--{}", key.replace('_', "-"))
}
