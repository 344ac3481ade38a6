//! Dump command implementation.

use freeze_canonical::{dump, sort_dump, vformat_dump};

use crate::input;

pub fn run(input: Option<String>, sort: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input.as_deref())?;

    let mut dumped = dump(&value);
    if sort {
        dumped = sort_dump(&dumped);
    }

    println!("{}", vformat_dump(&dumped));
    Ok(())
}
