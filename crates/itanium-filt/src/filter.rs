//! Demangling of symbols embedded in free text.
//!
//! Mirrors what `c++filt` does with its standard input: every token that
//! looks like an Itanium mangled name is replaced in place and the rest of
//! the line is passed through untouched.

use itanium_demangle::{demangle_with, is_mangled, DemangleOptions};

/// Characters that may appear inside a mangled name, vendor suffix included.
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$')
}

/// Demangle every `_Z` token in `line`.
pub fn filter_line(line: &str, options: &DemangleOptions) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while !rest.is_empty() {
        let start = rest.find(is_symbol_char).unwrap_or(rest.len());
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let end = rest.find(|c: char| !is_symbol_char(c)).unwrap_or(rest.len());
        let token = &rest[..end];
        if is_mangled(token) {
            out.push_str(&demangle_with(token, options));
        } else {
            out.push_str(token);
        }
        rest = &rest[end..];
    }
    out
}
