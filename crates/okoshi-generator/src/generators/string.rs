//! Textual generators.

use okoshi_core::quote;
use rand::Rng;
use std::fmt::Write;

/// Length of the random hex source string before truncation.
const HEX_LENGTH: usize = 32;

/// 32 random lowercase hex characters.
pub fn random_hex<R: Rng>(rng: &mut R) -> String {
    let bytes: [u8; HEX_LENGTH / 2] = rng.gen();
    bytes.iter().fold(String::with_capacity(HEX_LENGTH), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

fn truncated_hex<R: Rng>(rng: &mut R, limit: u32) -> String {
    let mut hex = random_hex(rng);
    hex.truncate(limit as usize);
    hex
}

/// Random hex truncated to `limit` characters, quoted.
pub fn generate_string<R: Rng>(rng: &mut R, limit: u32) -> String {
    quote(&truncated_hex(rng, limit))
}

/// `text-` followed by a truncated random hex string, quoted.
pub fn generate_text<R: Rng>(rng: &mut R, limit: u32) -> String {
    quote(&format!("text-{}", truncated_hex(rng, limit)))
}

/// Always the empty JSON object.
pub fn generate_json() -> String {
    quote("{}")
}
