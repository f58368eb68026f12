//! # itanium-demangle
//!
//! Demangling of C++ symbol names produced under the Itanium C++ ABI
//! (GCC, Clang).
//!
//! Supports:
//! - Free functions, nested names and member functions (`const`/`volatile`)
//! - Constructors, destructors and the full operator table
//! - Function templates (with return types) and class templates
//! - Substitutions (`S_`, `S<n>_`) and template parameters (`T_`, `T<n>_`)
//! - Special names: vtables, typeinfo, VTTs, guard variables, TLS helpers
//!   and thunks
//!
//! Decoding never fails hard. Malformed input renders whatever could be
//! recovered, with `_` standing in for back-references that resolve to
//! nothing.
//!
//! ```
//! use itanium_demangle::demangle;
//!
//! assert_eq!(demangle("_ZNK6Vector4sizeEv"), "Vector::size() const");
//! assert_eq!(demangle("_Z3maxIiET_S0_S0_"), "int max<int>(int, int)");
//! assert_eq!(demangle("printf"), "printf");
//! ```

pub mod ast;
pub mod codes;
pub mod context;
pub mod error;
pub mod format;
pub mod options;
pub mod parser;

pub use ast::{EncodedName, Segment, Signature, SpecialKind, Symbol, ThunkKind, TypeNode};
pub use error::DemangleError;
pub use options::DemangleOptions;

use parser::Parser;

/// Prefix carried by every Itanium mangled name.
const MANGLED_PREFIX: &str = "_Z";

/// Returns true if `name` carries the Itanium `_Z` prefix.
pub fn is_mangled(name: &str) -> bool {
    name.starts_with(MANGLED_PREFIX)
}

/// Demangle a symbol name.
///
/// Input without the `_Z` prefix is returned unchanged.
pub fn demangle(name: &str) -> String {
    demangle_with(name, &DemangleOptions::default())
}

/// Demangle a symbol name with custom rendering options.
pub fn demangle_with(name: &str, options: &DemangleOptions) -> String {
    match parse(name) {
        Ok(symbol) => symbol.display(*options).to_string(),
        Err(_) => name.to_string(),
    }
}

/// Demangle a symbol name, rejecting input that is not mangled.
pub fn try_demangle(name: &str) -> Result<String, DemangleError> {
    parse(name).map(|symbol| symbol.to_string())
}

/// Decode a symbol name into its [`Symbol`] tree.
///
/// A vendor suffix (`.constprop.0`, `.cold`, ...) is dropped before
/// decoding.
pub fn parse(name: &str) -> Result<Symbol, DemangleError> {
    let encoding = name
        .strip_prefix(MANGLED_PREFIX)
        .ok_or_else(|| DemangleError::not_mangled(name))?;
    Ok(Parser::new(strip_vendor_suffix(encoding)).parse_symbol())
}

fn strip_vendor_suffix(encoding: &str) -> &str {
    match encoding.find('.') {
        Some(dot) => &encoding[..dot],
        None => encoding,
    }
}
