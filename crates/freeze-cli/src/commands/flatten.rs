//! Flatten command implementation.

use freeze_canonical::flatten;

use crate::input;

pub fn run(input: Option<String>, assume_key: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input.as_deref())?;
    for path in flatten(&value, assume_key) {
        println!("{}", path);
    }
    Ok(())
}
