//! Rendering of decoded symbols as C++ source text.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::{EncodedName, Qualifiers, Reference, Segment, Signature, Symbol, TypeNode};
use crate::codes::BuiltinType;
use crate::options::DemangleOptions;

impl Display for TypeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Basic(ty) => f.write_str(ty.name()),
            TypeNode::Named(name) => f.write_str(name),
            TypeNode::Qualified { base, qualifiers } => write_qualified(f, base, qualifiers),
            TypeNode::Array {
                element,
                dimensions,
            } => {
                write!(f, "{element}")?;
                for dim in dimensions {
                    match dim {
                        Some(n) => write!(f, "[{n}]")?,
                        None => f.write_str("[]")?,
                    }
                }
                Ok(())
            }
            TypeNode::FunctionPointer { ret, params } => write_function_pointer(f, ret, params, 1),
            TypeNode::MemberFunctionPointer {
                class,
                ret,
                params,
                is_const,
            } => {
                write!(f, "{ret} ({class}::*)({})", ParamList(params))?;
                if *is_const {
                    f.write_str(" const")?;
                }
                Ok(())
            }
            TypeNode::MemberPointer { class, member } => write!(f, "{member} {class}::**"),
            TypeNode::Template { base, args } => write!(f, "{base}{}", TemplateArgs(args)),
            TypeNode::Unresolved => f.write_char('_'),
        }
    }
}

fn write_qualified(f: &mut Formatter<'_>, base: &TypeNode, q: &Qualifiers) -> fmt::Result {
    if q.is_const {
        f.write_str("const ")?;
    }
    if q.is_volatile {
        f.write_str("volatile ")?;
    }

    match base {
        TypeNode::FunctionPointer { ret, params } => {
            write_function_pointer(f, ret, params, q.pointers.max(1))?
        }
        // the declarator already carries the pointer
        TypeNode::MemberFunctionPointer { .. } | TypeNode::MemberPointer { .. } => {
            write!(f, "{base}")?
        }
        _ => {
            write!(f, "{base}")?;
            for _ in 0..q.pointers {
                f.write_char('*')?;
            }
        }
    }

    if q.is_restrict {
        f.write_str(" restrict")?;
    }
    match q.reference {
        Some(Reference::LValue) => f.write_char('&'),
        Some(Reference::RValue) => f.write_str("&&"),
        None => Ok(()),
    }
}

fn write_function_pointer(
    f: &mut Formatter<'_>,
    ret: &TypeNode,
    params: &[TypeNode],
    stars: u32,
) -> fmt::Result {
    write!(f, "{ret} (")?;
    for _ in 0..stars {
        f.write_char('*')?;
    }
    write!(f, ")({})", ParamList(params))
}

/// A parameter list without the surrounding parentheses.
///
/// A lone unqualified `void` renders as nothing.
pub struct ParamList<'a>(pub &'a [TypeNode]);

impl Display for ParamList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let [only] = self.0 {
            if only.is_void() {
                return Ok(());
            }
        }
        write_comma_separated(f, self.0)
    }
}

/// A template argument list including its angle brackets.
///
/// An empty list renders as nothing at all.
pub struct TemplateArgs<'a>(pub &'a [TypeNode]);

impl Display for TemplateArgs<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_char('<')?;
        write_comma_separated(f, self.0)?;
        f.write_char('>')
    }
}

fn write_comma_separated(f: &mut Formatter<'_>, items: &[TypeNode]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(args) = &self.template_args {
            write!(f, "{}", TemplateArgs(args))?;
        }
        Ok(())
    }
}

impl Display for EncodedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_signature(f, self, DemangleOptions::default())
    }
}

fn write_signature(f: &mut Formatter<'_>, sig: &Signature, options: DemangleOptions) -> fmt::Result {
    if options.return_type {
        if let Some(ret) = &sig.return_type {
            write!(f, "{ret} ")?;
        }
    }
    write!(f, "{}", sig.name)?;

    if options.params {
        write!(f, "({})", ParamList(&sig.params))?;
        if sig.name.is_const {
            f.write_str(" const")?;
        }
        if sig.name.is_volatile {
            f.write_str(" volatile")?;
        }
    }
    Ok(())
}

/// A [`Symbol`] paired with the options to render it with.
///
/// Returned by [`Symbol::display`].
pub struct SymbolDisplay<'a> {
    symbol: &'a Symbol,
    options: DemangleOptions,
}

impl Symbol {
    /// Render with non-default options.
    ///
    /// ```
    /// use itanium_demangle::{parse, DemangleOptions};
    ///
    /// let symbol = parse("_ZN3foo3barEi").unwrap();
    /// let name_only = DemangleOptions::name_only();
    /// assert_eq!(symbol.display(name_only).to_string(), "foo::bar");
    /// ```
    pub fn display(&self, options: DemangleOptions) -> SymbolDisplay<'_> {
        SymbolDisplay {
            symbol: self,
            options,
        }
    }
}

impl Display for SymbolDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.symbol {
            Symbol::Function(sig) => write_signature(f, sig, self.options),
            Symbol::Special { kind, target } => write!(f, "{}{target}", kind.phrase()),
            Symbol::ConstructionVtable { derived, base } => {
                let base = base.to_string();
                if base.is_empty() {
                    write!(f, "construction vtable for {derived}")
                } else {
                    write!(f, "construction vtable for {base}-in-{derived}")
                }
            }
            Symbol::Thunk { kind, target } => {
                write!(f, "{}{}", kind.phrase(), target.display(self.options))
            }
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.display(DemangleOptions::default()).fmt(f)
    }
}

/// Text of a template literal argument (`L <type> <value> E`).
pub(crate) fn literal_text(ty: Option<&TypeNode>, value: &str) -> String {
    let value = match value.strip_prefix('n') {
        Some(magnitude) => format!("-{magnitude}"),
        None => value.to_owned(),
    };

    let Some(ty) = ty else {
        return value;
    };
    match ty {
        TypeNode::Basic(BuiltinType::Bool) => match value.as_str() {
            "0" => "false".to_owned(),
            "1" => "true".to_owned(),
            _ => format!("(bool){value}"),
        },
        TypeNode::Basic(BuiltinType::Int) => value,
        TypeNode::Basic(BuiltinType::UnsignedInt) => format!("{value}u"),
        TypeNode::Basic(BuiltinType::Long) => format!("{value}l"),
        TypeNode::Basic(BuiltinType::UnsignedLong) => format!("{value}ul"),
        TypeNode::Basic(BuiltinType::LongLong) => format!("{value}ll"),
        TypeNode::Basic(BuiltinType::UnsignedLongLong) => format!("{value}ull"),
        other => format!("({other}){value}"),
    }
}
