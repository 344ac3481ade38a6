//! Freeze command implementation.

use freeze_canonical::{recursive_sort, CycleCheck, FreezeOptions, Freezer};

use crate::input;
use crate::output;

pub fn run(
    input: Option<String>,
    json: bool,
    stringify: bool,
    sort: bool,
    assume_key: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input.as_deref())?;

    let freezer = Freezer::new(FreezeOptions {
        stringify,
        cycles: CycleCheck::Ancestors,
    });
    let mut frozen = freezer.freeze(&value);
    if sort {
        frozen = recursive_sort(&frozen, assume_key);
    }

    println!("{}", output::format_frozen(&frozen, json)?);
    Ok(())
}
