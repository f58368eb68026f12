//! Fixed code tables of the Itanium mangling grammar.
//!
//! Builtin type codes, operator codes and the `std::` abbreviations all map
//! short mangled spellings onto fixed C++ text.

/// Mangled identifier GCC and Clang give to the anonymous namespace.
pub const ANONYMOUS_NAMESPACE: &str = "_GLOBAL__N_1";

/// Display text for [`ANONYMOUS_NAMESPACE`].
pub const ANONYMOUS_NAMESPACE_DISPLAY: &str = "(anonymous namespace)";

/// A builtin (fundamental) C++ type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuiltinType {
    Void,
    WChar,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Int128,
    UnsignedInt128,
    Float,
    Double,
    LongDouble,
    Float128,
    /// `z`, the variadic `...` parameter.
    Ellipsis,
    // Two-letter `D` codes.
    Decimal32,
    Decimal64,
    Decimal128,
    Half,
    Char8,
    Char16,
    Char32,
    Auto,
    DecltypeAuto,
    NullPtr,
}

impl BuiltinType {
    /// Look up a single-letter builtin type code.
    pub fn from_code(code: u8) -> Option<Self> {
        let ty = match code {
            b'v' => Self::Void,
            b'w' => Self::WChar,
            b'b' => Self::Bool,
            b'c' => Self::Char,
            b'a' => Self::SignedChar,
            b'h' => Self::UnsignedChar,
            b's' => Self::Short,
            b't' => Self::UnsignedShort,
            b'i' => Self::Int,
            b'j' => Self::UnsignedInt,
            b'l' => Self::Long,
            b'm' => Self::UnsignedLong,
            b'x' => Self::LongLong,
            b'y' => Self::UnsignedLongLong,
            b'n' => Self::Int128,
            b'o' => Self::UnsignedInt128,
            b'f' => Self::Float,
            b'd' => Self::Double,
            b'e' => Self::LongDouble,
            b'g' => Self::Float128,
            b'z' => Self::Ellipsis,
            _ => return None,
        };
        Some(ty)
    }

    /// Look up the second letter of a `D`-prefixed builtin type code.
    pub fn from_d_code(code: u8) -> Option<Self> {
        let ty = match code {
            b'f' => Self::Decimal32,
            b'd' => Self::Decimal64,
            b'e' => Self::Decimal128,
            b'h' => Self::Half,
            b'u' => Self::Char8,
            b's' => Self::Char16,
            b'i' => Self::Char32,
            b'a' => Self::Auto,
            b'c' => Self::DecltypeAuto,
            b'n' => Self::NullPtr,
            _ => return None,
        };
        Some(ty)
    }

    /// The C++ spelling of this type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::WChar => "wchar_t",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::SignedChar => "signed char",
            Self::UnsignedChar => "unsigned char",
            Self::Short => "short",
            Self::UnsignedShort => "unsigned short",
            Self::Int => "int",
            Self::UnsignedInt => "unsigned int",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned long",
            Self::LongLong => "long long",
            Self::UnsignedLongLong => "unsigned long long",
            Self::Int128 => "__int128",
            Self::UnsignedInt128 => "unsigned __int128",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::Float128 => "__float128",
            Self::Ellipsis => "...",
            Self::Decimal32 => "decimal32",
            Self::Decimal64 => "decimal64",
            Self::Decimal128 => "decimal128",
            Self::Half => "half",
            Self::Char8 => "char8_t",
            Self::Char16 => "char16_t",
            Self::Char32 => "char32_t",
            Self::Auto => "auto",
            Self::DecltypeAuto => "decltype(auto)",
            Self::NullPtr => "decltype(nullptr)",
        }
    }
}

/// Two-letter operator codes and their spelled names.
///
/// `cv` (conversion) and `li` (literal) are listed with their bare spelling;
/// the decoder handles the operand that follows them.
const OPERATORS: &[(&[u8; 2], &str)] = &[
    (b"nw", "operator new"),
    (b"na", "operator new[]"),
    (b"dl", "operator delete"),
    (b"da", "operator delete[]"),
    (b"aw", "operator co_await"),
    (b"ps", "operator+"),
    (b"ng", "operator-"),
    (b"ad", "operator&"),
    (b"de", "operator*"),
    (b"co", "operator~"),
    (b"pl", "operator+"),
    (b"mi", "operator-"),
    (b"ml", "operator*"),
    (b"dv", "operator/"),
    (b"rm", "operator%"),
    (b"an", "operator&"),
    (b"or", "operator|"),
    (b"eo", "operator^"),
    (b"aS", "operator="),
    (b"pL", "operator+="),
    (b"mI", "operator-="),
    (b"mL", "operator*="),
    (b"dV", "operator/="),
    (b"rM", "operator%="),
    (b"aN", "operator&="),
    (b"oR", "operator|="),
    (b"eO", "operator^="),
    (b"ls", "operator<<"),
    (b"rs", "operator>>"),
    (b"lS", "operator<<="),
    (b"rS", "operator>>="),
    (b"eq", "operator=="),
    (b"ne", "operator!="),
    (b"lt", "operator<"),
    (b"gt", "operator>"),
    (b"le", "operator<="),
    (b"ge", "operator>="),
    (b"ss", "operator<=>"),
    (b"nt", "operator!"),
    (b"aa", "operator&&"),
    (b"oo", "operator||"),
    (b"pp", "operator++"),
    (b"mm", "operator--"),
    (b"cm", "operator,"),
    (b"pm", "operator->*"),
    (b"pt", "operator->"),
    (b"cl", "operator()"),
    (b"ix", "operator[]"),
    (b"qu", "operator?"),
    (b"cv", "operator"),
    (b"li", "operator\"\""),
];

/// Look up a two-letter operator code.
pub fn operator_name(code: [u8; 2]) -> Option<&'static str> {
    OPERATORS
        .iter()
        .find(|(c, _)| **c == code)
        .map(|(_, name)| *name)
}

/// Expansion of the single-letter `S` abbreviations (`Sa`, `Sb`, `Ss`, ...).
pub fn std_abbreviation(code: u8) -> Option<&'static str> {
    let name = match code {
        b'a' => "std::allocator",
        b'b' => "std::basic_string",
        b's' => "std::basic_string<char, std::char_traits<char>, std::allocator<char>>",
        b'i' => "std::basic_istream<char, std::char_traits<char>>",
        b'o' => "std::basic_ostream<char, std::char_traits<char>>",
        b'd' => "std::basic_iostream<char, std::char_traits<char>>",
        _ => return None,
    };
    Some(name)
}
