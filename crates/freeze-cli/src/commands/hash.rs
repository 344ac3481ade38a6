//! Hash command implementation.

use freeze_canonical::{recursive_hash_and_digest, stable_hash_and_digest};

use crate::input;
use crate::output;

pub fn run(input: Option<String>, recursive: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input.as_deref())?;

    let (hash, fingerprint) = if recursive {
        recursive_hash_and_digest(&value)
    } else {
        stable_hash_and_digest(&value)
    };

    if json {
        println!("{}", serde_json::to_string(&fingerprint)?);
    } else {
        println!("{}", output::format_hash(hash, &fingerprint));
    }
    Ok(())
}
