//! Diff command implementation.

use freeze_canonical::{dump_diff, tree_diff, AssertionError, DiffOptions};
use tracing::info;

use crate::input;

pub fn run(
    left: String,
    right: String,
    options: DiffOptions,
    dump: bool,
    check: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let left_value = input::read_value(Some(&left))?;
    let right_value = input::read_value(Some(&right))?;

    let diff = if dump {
        dump_diff(&left_value, &right_value, &options)
    } else {
        tree_diff(&left_value, &right_value, &options)
    };
    info!(left = %left, right = %right, identical = diff.is_empty(), "compared documents");

    if check && !diff.is_empty() {
        return Err(Box::new(AssertionError::Difference { diff }));
    }
    if !diff.is_empty() {
        println!("{}", diff);
    }
    Ok(())
}
