//! Sort command implementation.

use freeze_canonical::{freeze_stringified, recursive_sort};

use crate::input;

pub fn run(input: Option<String>, assume_key: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input.as_deref())?;
    println!("{}", recursive_sort(&freeze_stringified(&value), assume_key));
    Ok(())
}
