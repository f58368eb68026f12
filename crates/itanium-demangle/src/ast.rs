//! Decoded representation of an Itanium mangled name.
//!
//! The decoder produces a [`Symbol`]; everything below it is a small closed
//! tree of [`TypeNode`]s and [`EncodedName`]s. Rendering lives in
//! [`crate::format`].

use crate::codes::BuiltinType;

/// A decoded mangled symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Symbol {
    /// A function (or data) encoding: name plus parameter list.
    Function(Signature),

    /// A special name such as a vtable or typeinfo object.
    Special {
        kind: SpecialKind,
        target: TypeNode,
    },

    /// `TC`: the vtable of `base` used while constructing `derived`.
    ConstructionVtable {
        derived: TypeNode,
        base: TypeNode,
    },

    /// A this-adjusting or covariant-return thunk to another function.
    Thunk {
        kind: ThunkKind,
        target: Box<Symbol>,
    },
}

impl Symbol {
    /// The function signature, if this symbol names a function.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Symbol::Function(sig) => Some(sig),
            Symbol::Thunk { target, .. } => target.signature(),
            Symbol::Special { .. } | Symbol::ConstructionVtable { .. } => None,
        }
    }
}

/// Kind of a two-letter special name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpecialKind {
    /// `TI`
    TypeInfo,
    /// `TS`
    TypeInfoName,
    /// `TV`
    Vtable,
    /// `TT`
    Vtt,
    /// `GV`
    GuardVariable,
    /// `TH`
    TlsInit,
    /// `TW`
    TlsWrapper,
}

impl SpecialKind {
    /// Phrase printed in front of the operand.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::TypeInfo => "typeinfo for ",
            Self::TypeInfoName => "typeinfo name for ",
            Self::Vtable => "vtable for ",
            Self::Vtt => "VTT for ",
            Self::GuardVariable => "guard variable for ",
            Self::TlsInit => "TLS init function for ",
            Self::TlsWrapper => "TLS wrapper function for ",
        }
    }

    /// Whether the operand is a type (as opposed to an object name).
    pub fn takes_type(self) -> bool {
        matches!(
            self,
            Self::TypeInfo | Self::TypeInfoName | Self::Vtable | Self::Vtt
        )
    }
}

/// Kind of thunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThunkKind {
    /// `Th`: adjusts `this` by a fixed offset.
    NonVirtual,
    /// `Tv`: adjusts `this` through a vtable offset.
    Virtual,
    /// `Tc`: adjusts both `this` and the returned pointer.
    CovariantReturn,
}

impl ThunkKind {
    /// Phrase printed in front of the target function.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::NonVirtual => "non-virtual thunk to ",
            Self::Virtual => "virtual thunk to ",
            Self::CovariantReturn => "covariant return thunk to ",
        }
    }
}

/// A decoded function encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    /// The (possibly qualified, possibly templated) function name.
    pub name: EncodedName,
    /// Return type; only present for function templates.
    pub return_type: Option<TypeNode>,
    /// Parameter types in declaration order.
    pub params: Vec<TypeNode>,
}

impl Signature {
    /// Template arguments of a function template, if this is one.
    pub fn template_args(&self) -> Option<&[TypeNode]> {
        self.name.template_args()
    }
}

/// Result of decoding a name production.
///
/// Unlike a plain string this keeps the path segments apart so the decoder
/// can find the enclosing scope (for substitutions) and the class name (for
/// constructors) without re-parsing rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodedName {
    /// Path components, outermost first.
    pub segments: Vec<Segment>,
    /// Came from an `N...E` production.
    pub nested: bool,
    /// Member function carries a `K` qualifier.
    pub is_const: bool,
    /// Member function carries a `V` qualifier.
    pub is_volatile: bool,
    /// The trailing template arguments bind the function's template
    /// parameters (function template rather than class template).
    pub is_template: bool,
}

impl EncodedName {
    /// Returns true if no segment was decoded.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The enclosing scope: every segment but the last, `::`-joined.
    pub fn prefix(&self) -> Option<String> {
        let (_, scope) = self.segments.split_last()?;
        if scope.is_empty() {
            return None;
        }
        let parts: Vec<String> = scope.iter().map(ToString::to_string).collect();
        Some(parts.join("::"))
    }

    /// Identifier of the innermost segment, without template arguments.
    ///
    /// Constructors and destructors are named after this.
    pub fn class_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.name.as_str())
    }

    /// Template arguments bound by a function template.
    pub fn template_args(&self) -> Option<&[TypeNode]> {
        if !self.is_template {
            return None;
        }
        self.segments.last()?.template_args.as_deref()
    }

    /// Template arguments attached to the last segment, whatever their role.
    pub fn trailing_template_args(&self) -> Option<&[TypeNode]> {
        self.segments.last()?.template_args.as_deref()
    }
}

/// One `::`-separated component of a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Identifier, operator spelling, or constructor/destructor name.
    pub name: String,
    /// Template arguments following the identifier.
    pub template_args: Option<Vec<TypeNode>>,
}

impl Segment {
    /// A segment without template arguments.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_args: None,
        }
    }
}

/// Reference kind carried by a qualified type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reference {
    /// `R`, rendered `&`.
    LValue,
    /// `O`, rendered `&&`.
    RValue,
}

/// Qualifiers and declarators gathered in front of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_restrict: bool,
    /// Number of `P` markers.
    pub pointers: u32,
    pub reference: Option<Reference>,
}

impl Qualifiers {
    /// Returns true if no qualifier was recorded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record a reference marker. An lvalue reference absorbs an rvalue
    /// reference (`& &&` collapses to `&`).
    pub fn add_reference(&mut self, reference: Reference) {
        self.reference = match (self.reference, reference) {
            (Some(Reference::LValue), _) | (_, Reference::LValue) => Some(Reference::LValue),
            _ => Some(Reference::RValue),
        };
    }
}

/// A decoded type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TypeNode {
    /// A builtin type such as `int`.
    Basic(BuiltinType),

    /// A class, struct, enum or `std::` name, already rendered.
    Named(String),

    /// A base type wrapped in cv-qualifiers, pointers and references.
    Qualified {
        base: Box<TypeNode>,
        qualifiers: Qualifiers,
    },

    /// An array; nested arrays are flattened into `dimensions`, outermost
    /// first. `None` is an unknown bound.
    Array {
        element: Box<TypeNode>,
        dimensions: Vec<Option<usize>>,
    },

    /// Pointer to function.
    FunctionPointer {
        ret: Box<TypeNode>,
        params: Vec<TypeNode>,
    },

    /// Pointer to member function.
    MemberFunctionPointer {
        class: Box<TypeNode>,
        ret: Box<TypeNode>,
        params: Vec<TypeNode>,
        is_const: bool,
    },

    /// Pointer to data member.
    MemberPointer {
        class: Box<TypeNode>,
        member: Box<TypeNode>,
    },

    /// A template instantiation `base<args...>`.
    Template { base: String, args: Vec<TypeNode> },

    /// A back-reference that resolved to nothing; rendered `_`.
    Unresolved,
}

impl TypeNode {
    /// Returns true for the bare, unqualified `void` type.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeNode::Basic(BuiltinType::Void))
    }

    /// Returns true for an unresolved back-reference.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeNode::Unresolved)
    }

    /// Wrap `self` in `qualifiers`, or return it unchanged if there are none.
    pub fn qualified(self, qualifiers: Qualifiers) -> TypeNode {
        if qualifiers.is_empty() {
            self
        } else {
            TypeNode::Qualified {
                base: Box::new(self),
                qualifiers,
            }
        }
    }
}
