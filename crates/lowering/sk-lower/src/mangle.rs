//! Identifier case conversion
//!
//! The surface convention is camelCase; the target convention is hyphenated
//! lowercase. The conversion is idempotent: hyphenated output contains no
//! uppercase letters, so a second pass changes nothing.

/// Convert a surface identifier to the target's hyphenated convention
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_breaks = false;
    for character in name.chars() {
        if character == '_' {
            out.push('-');
            prev_breaks = false;
            continue;
        }
        if character.is_uppercase() {
            if prev_breaks {
                out.push('-');
            }
            out.extend(character.to_lowercase());
        } else {
            out.push(character);
        }
        prev_breaks = character.is_lowercase() || character.is_ascii_digit();
    }
    out
}
