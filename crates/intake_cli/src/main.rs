//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `intake_core` linkage without a UI shell.
//! - Apply `path=value` edits to a fresh snapshot and print the result.
//!
//! Usage: `intake_cli organization.name=Acme organization.tier=3`

use intake_core::{apply_edit_at, FieldValue, FormSnapshot};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("intake_core ping={}", intake_core::ping());
    println!("intake_core version={}", intake_core::core_version());

    let mut snapshot = FormSnapshot::empty();
    for arg in std::env::args().skip(1) {
        let Some((path, raw)) = arg.split_once('=') else {
            eprintln!("expected <entity>.<field>=<value>, got `{arg}`");
            return ExitCode::FAILURE;
        };
        snapshot = match apply_edit_at(&snapshot, path, &parse_value(raw)) {
            Ok(next) => next,
            Err(err) => {
                eprintln!("edit rejected: {err}");
                return ExitCode::FAILURE;
            }
        };
    }

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("snapshot encode failed: {err}");
            ExitCode::FAILURE
        }
    }
}

// Values stay text; numeric leaves coerce on write, text leaves keep the
// argument verbatim.
fn parse_value(raw: &str) -> FieldValue {
    FieldValue::from(raw)
}

#[cfg(test)]
mod tests {
    use super::parse_value;
    use intake_core::{apply_edit_at, FormSnapshot};

    #[test]
    fn text_leaves_keep_numeric_looking_arguments_verbatim() {
        let empty = FormSnapshot::empty();
        for raw in ["0123456", "+15551234", "1e3"] {
            let next = apply_edit_at(&empty, "person.phone", &parse_value(raw)).unwrap();
            assert_eq!(next.person.phone, raw);
        }
    }

    #[test]
    fn tier_argument_still_scales_deal_amount() {
        let next = apply_edit_at(
            &FormSnapshot::empty(),
            "organization.tier",
            &parse_value("3"),
        )
        .unwrap();
        assert_eq!(next.organization.tier, "3");
        assert_eq!(next.deal.amount, 300.0);
    }
}
