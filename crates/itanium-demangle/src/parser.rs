//! Recursive-descent decoder for the Itanium mangling grammar.
//!
//! The parser walks the encoding (the text after `_Z`, vendor suffix already
//! removed) left to right. Every production returns an `Option`: `None`
//! means "nothing matched here" and the caller decides whether to skip a
//! byte, stop, or substitute the `_` placeholder. Nothing in here fails
//! hard; a malformed encoding renders whatever could be recovered.

use tracing::{debug, trace};

use crate::ast::{
    EncodedName, Qualifiers, Reference, Segment, Signature, SpecialKind, Symbol, ThunkKind,
    TypeNode,
};
use crate::codes::{self, BuiltinType};
use crate::context::DecodeContext;
use crate::format::literal_text;

/// Maximum nesting of type productions.
///
/// Deeper input yields no node for the innermost production, which keeps
/// hostile input from exhausting the stack.
pub const MAX_DEPTH: usize = 128;

/// Decoder state for one encoding.
pub struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    ctx: DecodeContext,
}

impl<'a> Parser<'a> {
    /// Create a parser over an encoding (without the `_Z` prefix).
    pub fn new(encoding: &'a str) -> Self {
        Self {
            input: encoding.as_bytes(),
            pos: 0,
            depth: 0,
            ctx: DecodeContext::new(),
        }
    }

    /// Decode the whole encoding.
    pub fn parse_symbol(mut self) -> Symbol {
        let symbol = match self.parse_special_name() {
            Some(special) => special,
            None => Symbol::Function(self.parse_function_encoding()),
        };
        if !self.is_at_end() {
            trace!(
                offset = self.pos,
                trailing = self.rest().len(),
                "ignoring input after special name"
            );
        }
        symbol
    }

    // ---------------------------------------------------------------------
    // Cursor helpers
    // ---------------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn rest(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn bump(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &[u8]) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn next_is_digit(&self) -> bool {
        self.peek().is_some_and(|b| b.is_ascii_digit())
    }

    fn skip_unrecognized(&mut self) {
        trace!(
            offset = self.pos,
            byte = ?self.peek().map(char::from),
            "skipping unrecognized type code"
        );
        self.bump();
    }

    /// Run `f` one nesting level deeper, or give up at [`MAX_DEPTH`].
    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_DEPTH {
            debug!(offset = self.pos, "type nesting limit reached");
            return None;
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Decimal `<number>`; saturates instead of overflowing.
    fn parse_number(&mut self) -> Option<usize> {
        let start = self.pos;
        let mut value: usize = 0;
        while let Some(b @ b'0'..=b'9') = self.peek() {
            value = value.saturating_mul(10).saturating_add(usize::from(b - b'0'));
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    /// `[n] <number>` call offset component.
    fn parse_offset(&mut self) -> bool {
        self.eat(b'n');
        self.parse_number().is_some()
    }

    // ---------------------------------------------------------------------
    // Special names
    // ---------------------------------------------------------------------

    fn parse_special_name(&mut self) -> Option<Symbol> {
        let kind = match (self.peek()?, self.peek_at(1)?) {
            (b'T', b'I') => SpecialKind::TypeInfo,
            (b'T', b'S') => SpecialKind::TypeInfoName,
            (b'T', b'V') => SpecialKind::Vtable,
            (b'T', b'T') => SpecialKind::Vtt,
            (b'G', b'V') => SpecialKind::GuardVariable,
            (b'T', b'H') => SpecialKind::TlsInit,
            (b'T', b'W') => SpecialKind::TlsWrapper,
            (b'T', b'C') => {
                self.pos += 2;
                return Some(self.parse_construction_vtable());
            }
            (b'T', b'h' | b'v' | b'c') => return self.parse_thunk(),
            _ => return None,
        };
        self.pos += 2;

        let target = if kind.takes_type() {
            self.parse_type()
        } else {
            self.parse_object_name()
        };
        Some(Symbol::Special {
            kind,
            target: target.unwrap_or_else(empty_name),
        })
    }

    /// `TC <type> <number> _ <type>`
    fn parse_construction_vtable(&mut self) -> Symbol {
        let derived = self.parse_type().unwrap_or_else(empty_name);
        if self.parse_number().is_none() || !self.eat(b'_') {
            debug!(offset = self.pos, "construction vtable without offset");
        }
        let base = self.parse_type().unwrap_or_else(empty_name);
        Symbol::ConstructionVtable { derived, base }
    }

    /// `Th <offset> _`, `Tv <offset> _ <offset> _` and `Tc <call-offset>{2}`,
    /// each followed by the target function's encoding.
    fn parse_thunk(&mut self) -> Option<Symbol> {
        let start = self.pos;
        self.bump(); // T
        let kind = match self.peek()? {
            b'h' => ThunkKind::NonVirtual,
            b'v' => ThunkKind::Virtual,
            _ => {
                self.bump();
                ThunkKind::CovariantReturn
            }
        };

        let offsets_ok = match kind {
            ThunkKind::CovariantReturn => self.parse_call_offset() && self.parse_call_offset(),
            ThunkKind::NonVirtual | ThunkKind::Virtual => self.parse_call_offset(),
        };
        if !offsets_ok {
            debug!(offset = start, "malformed thunk offset");
            self.pos = start;
            return None;
        }

        let target = Symbol::Function(self.parse_function_encoding());
        Some(Symbol::Thunk {
            kind,
            target: Box::new(target),
        })
    }

    fn parse_call_offset(&mut self) -> bool {
        match self.peek() {
            Some(b'h') => {
                self.bump();
                self.parse_offset() && self.eat(b'_')
            }
            Some(b'v') => {
                self.bump();
                self.parse_offset() && self.eat(b'_') && self.parse_offset() && self.eat(b'_')
            }
            _ => false,
        }
    }

    /// Operand of `GV`/`TH`/`TW`: an object name, not a type.
    fn parse_object_name(&mut self) -> Option<TypeNode> {
        let name = self.parse_encoded_name();
        (!name.is_empty()).then(|| TypeNode::Named(name.to_string()))
    }

    // ---------------------------------------------------------------------
    // Function encoding
    // ---------------------------------------------------------------------

    fn parse_function_encoding(&mut self) -> Signature {
        let mut name = self.parse_encoded_name();

        if self.peek() == Some(b'I') {
            let args = self.parse_template_args();
            match name.segments.last_mut() {
                Some(last) => last.template_args.get_or_insert_with(Vec::new).extend(args),
                None => name.segments.push(Segment {
                    name: String::new(),
                    template_args: Some(args),
                }),
            }
            name.is_template = true;
        } else if name.nested && name.trailing_template_args().is_some() {
            name.is_template = true;
        }

        let template_params = name
            .template_args()
            .map(<[TypeNode]>::to_vec)
            .unwrap_or_default();

        if let Some(prefix) = name.prefix() {
            self.ctx.push_substitution(TypeNode::Named(prefix));
        }
        for param in &template_params {
            self.ctx.push_substitution(param.clone());
        }
        self.ctx.bind_template_params(template_params);

        // Only template encodings carry a return type.
        let return_type = if !self.ctx.template_params().is_empty() && !self.is_at_end() {
            self.parse_type()
        } else {
            None
        };

        let params = self.parse_bare_function_type();
        Signature {
            name,
            return_type,
            params,
        }
    }

    /// Parameter types up to the end of input.
    fn parse_bare_function_type(&mut self) -> Vec<TypeNode> {
        let mut params = Vec::new();
        while !self.is_at_end() {
            match self.parse_type() {
                Some(ty) => params.push(ty),
                None => self.skip_unrecognized(),
            }
        }
        params
    }

    /// Parameter types up to and including the closing `E`.
    fn parse_nested_params(&mut self) -> Vec<TypeNode> {
        let mut params = Vec::new();
        loop {
            match self.peek() {
                None => {
                    debug!("function type missing its `E` terminator");
                    break;
                }
                Some(b'E') => {
                    self.bump();
                    break;
                }
                Some(_) => match self.parse_type() {
                    Some(ty) => params.push(ty),
                    None => self.skip_unrecognized(),
                },
            }
        }
        params
    }

    // ---------------------------------------------------------------------
    // Names
    // ---------------------------------------------------------------------

    fn parse_encoded_name(&mut self) -> EncodedName {
        if self.eat(b'N') {
            self.parse_nested_name()
        } else {
            self.parse_unscoped_name()
        }
    }

    /// `N [<CV-qualifiers>] [<ref-qualifier>] <prefix> <unqualified-name> E`
    fn parse_nested_name(&mut self) -> EncodedName {
        let mut name = EncodedName {
            nested: true,
            ..EncodedName::default()
        };

        while let Some(byte) = self.peek() {
            match byte {
                b'K' => name.is_const = true,
                b'V' => name.is_volatile = true,
                // restrict and ref-qualifiers are not rendered
                b'r' | b'R' | b'O' => {}
                _ => break,
            }
            self.bump();
        }

        if self.eat_str(b"St") {
            name.segments.push(Segment::plain("std"));
        } else if self.peek() == Some(b'S') {
            let start = self.pos;
            match self.parse_substitution_prefix() {
                Some(node) => name.segments.push(Segment::plain(node.to_string())),
                None => self.pos = start,
            }
        }

        while let Some(byte) = self.peek() {
            match byte {
                b'E' => {
                    self.bump();
                    return name;
                }
                b'I' => {
                    let args = self.parse_template_args();
                    if let Some(last) = name.segments.last_mut() {
                        last.template_args.get_or_insert_with(Vec::new).extend(args);
                    }
                }
                _ => match self.parse_segment(&name) {
                    Some(segment) => name.segments.push(segment),
                    None => break,
                },
            }
        }

        trace!(offset = self.pos, "nested name ended without `E`");
        name
    }

    /// `[L] [St] <unqualified-name> [I <digit>... E]`
    fn parse_unscoped_name(&mut self) -> EncodedName {
        let mut name = EncodedName::default();

        // internal linkage marker
        self.eat(b'L');
        if self.eat_str(b"St") {
            name.segments.push(Segment::plain("std"));
        }

        if let Some(mut segment) = self.parse_segment(&name) {
            // Only the length-prefixed form belongs to the name here; a
            // type-coded list after a function name is its template list.
            if self.peek() == Some(b'I') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                segment.template_args = Some(self.parse_template_args());
            }
            name.segments.push(segment);
        }
        name
    }

    /// One path component: constructor, destructor, operator or identifier.
    fn parse_segment(&mut self, scope: &EncodedName) -> Option<Segment> {
        match (self.peek()?, self.peek_at(1)) {
            (b'C', Some(b'1'..=b'3')) => {
                let class = scope.class_name()?.to_owned();
                self.pos += 2;
                Some(Segment::plain(class))
            }
            (b'C', Some(b'I')) if matches!(self.peek_at(2), Some(b'1' | b'2')) => {
                let class = scope.class_name()?.to_owned();
                self.pos += 3;
                // inherited-from base class
                if self.parse_type().is_none() {
                    debug!(offset = self.pos, "inheriting constructor without base type");
                }
                Some(Segment::plain(class))
            }
            (b'D', Some(b'0'..=b'2')) => {
                let class = scope.class_name()?;
                let dtor = format!("~{class}");
                self.pos += 2;
                Some(Segment::plain(dtor))
            }
            (first, Some(second)) if first.is_ascii_lowercase() => {
                self.parse_operator_segment([first, second])
            }
            (b'0'..=b'9', _) => self.parse_source_name().map(Segment::plain),
            _ => None,
        }
    }

    fn parse_operator_segment(&mut self, code: [u8; 2]) -> Option<Segment> {
        let spelled = codes::operator_name(code)?;
        self.pos += 2;

        match &code {
            b"cv" => {
                // The conversion target is consumed but not rendered.
                if self.parse_type().is_none() {
                    debug!(offset = self.pos, "conversion operator without target type");
                }
            }
            b"li" if self.next_is_digit() => {
                // The literal suffix is consumed but not rendered.
                let _ = self.parse_source_name();
            }
            _ => {}
        }
        Some(Segment::plain(spelled))
    }

    /// `<length> <identifier>`
    fn parse_source_name(&mut self) -> Option<String> {
        let len = self.parse_number()?;
        let rest = self.rest();
        if len > rest.len() {
            debug!(
                expected = len,
                available = rest.len(),
                "identifier runs past end of input"
            );
        }
        let take = len.min(rest.len());
        let ident = String::from_utf8_lossy(&rest[..take]).into_owned();
        self.pos += take;

        if ident == codes::ANONYMOUS_NAMESPACE {
            return Some(codes::ANONYMOUS_NAMESPACE_DISPLAY.to_owned());
        }
        Some(ident)
    }

    /// A substitution or `std` abbreviation opening a nested name.
    fn parse_substitution_prefix(&mut self) -> Option<TypeNode> {
        self.bump(); // S
        match self.peek()? {
            b'_' => {
                self.bump();
                Some(self.lookup_substitution(0))
            }
            b'0'..=b'9' => {
                let index = self.parse_number()?;
                self.eat(b'_').then(|| self.lookup_substitution(index))
            }
            code => {
                let expansion = codes::std_abbreviation(code)?;
                self.bump();
                Some(TypeNode::Named(expansion.to_owned()))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Template arguments
    // ---------------------------------------------------------------------

    /// `I <template-arg>+ E`
    ///
    /// A digit right after `I` selects the length-prefixed identifier form;
    /// anything else is a list of type productions. Substitutions recorded
    /// while decoding the arguments are scoped to the list.
    fn parse_template_args(&mut self) -> Vec<TypeNode> {
        self.eat(b'I');
        let length_prefixed = self.next_is_digit();
        let checkpoint = self.ctx.checkpoint();
        let args = self.parse_template_arg_list(length_prefixed);
        self.ctx.rollback(checkpoint);
        args
    }

    fn parse_template_arg_list(&mut self, length_prefixed: bool) -> Vec<TypeNode> {
        let mut args = Vec::new();
        loop {
            match self.peek() {
                None => {
                    debug!("template argument list missing its `E` terminator");
                    break;
                }
                Some(b'E') => {
                    self.bump();
                    break;
                }
                Some(b'0'..=b'9') if length_prefixed => {
                    if let Some(ident) = self.parse_source_name() {
                        args.push(TypeNode::Named(ident));
                    }
                }
                Some(b'L') => match self.parse_literal() {
                    Some(literal) => args.push(literal),
                    None => self.skip_unrecognized(),
                },
                Some(b'J') => {
                    self.bump();
                    match self.descend(|p| Some(p.parse_template_arg_list(false))) {
                        Some(pack) => args.extend(pack),
                        None => self.skip_unrecognized(),
                    }
                }
                Some(_) => match self.parse_type() {
                    Some(ty) => args.push(ty),
                    None => self.skip_unrecognized(),
                },
            }
        }
        args
    }

    /// `L <type> <value> E` or `L _Z <encoding> E`
    fn parse_literal(&mut self) -> Option<TypeNode> {
        let start = self.pos;
        self.bump(); // L

        if self.eat_str(b"_Z") {
            let Some(name) = self.descend(|p| Some(p.parse_encoded_name())) else {
                self.pos = start;
                return None;
            };
            while self.peek().is_some_and(|b| b != b'E') {
                self.bump();
            }
            if !self.eat(b'E') {
                self.pos = start;
                return None;
            }
            return Some(TypeNode::Named(name.to_string()));
        }

        let ty = self.parse_type();
        let value_start = self.pos;
        while self.peek().is_some_and(|b| b != b'E') {
            self.bump();
        }
        let value = String::from_utf8_lossy(&self.input[value_start..self.pos]).into_owned();
        if !self.eat(b'E') {
            debug!(offset = start, "template literal missing its `E` terminator");
            self.pos = start;
            return None;
        }
        Some(TypeNode::Named(literal_text(ty.as_ref(), &value)))
    }

    /// Apply a following `I...E` list to `node`, if there is one.
    fn with_template_args(&mut self, node: TypeNode) -> TypeNode {
        if self.peek() != Some(b'I') {
            return node;
        }
        let args = self.parse_template_args();
        TypeNode::Template {
            base: node.to_string(),
            args,
        }
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    /// Decode exactly one type.
    ///
    /// On `None` the cursor and the substitution table are left as they
    /// were, so the caller can skip a single byte and carry on.
    pub fn parse_type(&mut self) -> Option<TypeNode> {
        let start = self.pos;
        let checkpoint = self.ctx.checkpoint();
        let node = self.descend(Self::parse_qualified_type);
        if node.is_none() {
            self.pos = start;
            self.ctx.rollback(checkpoint);
        }
        node
    }

    fn parse_qualified_type(&mut self) -> Option<TypeNode> {
        let mut qualifiers = Qualifiers::default();
        while let Some(byte) = self.peek() {
            match byte {
                b'R' => qualifiers.add_reference(Reference::LValue),
                b'O' => qualifiers.add_reference(Reference::RValue),
                b'r' => qualifiers.is_restrict = true,
                b'V' => qualifiers.is_volatile = true,
                b'K' => qualifiers.is_const = true,
                b'P' => qualifiers.pointers = qualifiers.pointers.saturating_add(1),
                _ => break,
            }
            self.bump();
        }

        let base = self.parse_base_type()?;
        Some(base.qualified(qualifiers))
    }

    fn parse_base_type(&mut self) -> Option<TypeNode> {
        match self.peek()? {
            b'A' => self.parse_array_type(),
            b'F' => self.parse_function_type(),
            b'M' => self.parse_member_pointer_type(),
            b'T' => self.parse_template_param(),
            b'S' => self.parse_substitution(),
            b'D' => {
                let ty = BuiltinType::from_d_code(self.peek_at(1)?)?;
                self.pos += 2;
                Some(TypeNode::Basic(ty))
            }
            b'u' => {
                // vendor extended type
                self.bump();
                self.parse_source_name().map(TypeNode::Named)
            }
            b'N' | b'0'..=b'9' => self.parse_class_type(),
            code => {
                let ty = BuiltinType::from_code(code)?;
                self.bump();
                Some(TypeNode::Basic(ty))
            }
        }
    }

    /// `A [<number>] _ <element type>`
    fn parse_array_type(&mut self) -> Option<TypeNode> {
        self.bump(); // A
        let size = self.parse_number();
        if !self.eat(b'_') {
            debug!(offset = self.pos, "array dimension without `_`");
            return None;
        }

        let mut dimensions = vec![size];
        let element = match self.parse_type()? {
            TypeNode::Array {
                element,
                dimensions: inner,
            } => {
                dimensions.extend(inner);
                element
            }
            other => Box::new(other),
        };
        Some(TypeNode::Array {
            element,
            dimensions,
        })
    }

    /// `F [Y] <return type> <parameter types> E`
    fn parse_function_type(&mut self) -> Option<TypeNode> {
        self.bump(); // F
        self.eat(b'Y');
        let ret = self.parse_type()?;
        let params = self.parse_nested_params();
        Some(TypeNode::FunctionPointer {
            ret: Box::new(ret),
            params,
        })
    }

    /// `M <class type> [<CV-qualifiers>] (<function type> | <member type>)`
    fn parse_member_pointer_type(&mut self) -> Option<TypeNode> {
        self.bump(); // M
        let class = Box::new(self.parse_type()?);

        let mut member_qualifiers = Qualifiers::default();
        while let Some(byte) = self.peek() {
            match byte {
                b'K' => member_qualifiers.is_const = true,
                b'V' => member_qualifiers.is_volatile = true,
                _ => break,
            }
            self.bump();
        }

        if self.eat(b'F') {
            self.eat(b'Y');
            let ret = self.parse_type()?;
            let params = self.parse_nested_params();
            return Some(TypeNode::MemberFunctionPointer {
                class,
                ret: Box::new(ret),
                params,
                is_const: member_qualifiers.is_const,
            });
        }

        let member = self.parse_type()?.qualified(member_qualifiers);
        Some(TypeNode::MemberPointer {
            class,
            member: Box::new(member),
        })
    }

    /// `T_` or `T <number> _`
    fn parse_template_param(&mut self) -> Option<TypeNode> {
        self.bump(); // T
        let index = self.parse_number().unwrap_or(0);
        if !self.eat(b'_') {
            debug!(offset = self.pos, "template parameter reference without `_`");
            return Some(TypeNode::Unresolved);
        }

        let node = match self.ctx.template_param(index) {
            Some(node) => node.clone(),
            None => {
                trace!(index, "template parameter reference has no referent");
                TypeNode::Unresolved
            }
        };
        Some(self.with_template_args(node))
    }

    /// Substitutions (`S_`, `S<n>_`) and `std` names (`St`, `Sa`, ...).
    fn parse_substitution(&mut self) -> Option<TypeNode> {
        self.bump(); // S

        let node = match self.peek()? {
            b'_' => {
                self.bump();
                let node = self.lookup_substitution(0);
                return Some(self.with_template_args(node));
            }
            b't' => {
                self.bump();
                let name = self.parse_encoded_name();
                if name.is_empty() {
                    return None;
                }
                TypeNode::Named(format!("std::{name}"))
            }
            b'0'..=b'9' => {
                let start = self.pos;
                if let Some(index) = self.parse_number() {
                    if self.eat(b'_') {
                        let node = self.lookup_substitution(index);
                        return Some(self.with_template_args(node));
                    }
                }
                // not a back-reference: `S<digits>` names a std:: member
                self.pos = start;
                if !self.next_is_digit() {
                    return None;
                }
                let name = self.parse_encoded_name();
                if name.is_empty() {
                    return None;
                }
                TypeNode::Named(format!("std::{name}"))
            }
            code => {
                let expansion = codes::std_abbreviation(code)?;
                self.bump();
                TypeNode::Named(expansion.to_owned())
            }
        };

        let node = self.with_template_args(node);
        self.ctx.push_substitution(node.clone());
        Some(node)
    }

    fn lookup_substitution(&self, index: usize) -> TypeNode {
        match self.ctx.substitution(index) {
            Some(node) => node.clone(),
            None => {
                trace!(
                    index,
                    recorded = self.ctx.substitution_count(),
                    "substitution has no referent"
                );
                TypeNode::Unresolved
            }
        }
    }

    /// A class, enum or namespace-qualified type name.
    fn parse_class_type(&mut self) -> Option<TypeNode> {
        let name = self.parse_encoded_name();
        if name.is_empty() {
            return None;
        }
        let node = self.with_template_args(TypeNode::Named(name.to_string()));
        self.ctx.push_substitution(node.clone());
        Some(node)
    }
}

fn empty_name() -> TypeNode {
    TypeNode::Named(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_type(input: &str) -> Option<TypeNode> {
        Parser::new(input).parse_type()
    }

    fn type_string(input: &str) -> String {
        parse_type(input).map(|t| t.to_string()).unwrap_or_default()
    }

    fn signature(input: &str) -> Signature {
        match Parser::new(input).parse_symbol() {
            Symbol::Function(sig) => sig,
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_types() {
        assert_eq!(parse_type("i"), Some(TypeNode::Basic(BuiltinType::Int)));
        assert_eq!(type_string("y"), "unsigned long long");
        assert_eq!(type_string("Dn"), "decltype(nullptr)");
        assert_eq!(parse_type("Q"), None);
    }

    #[test]
    fn test_qualifiers_any_order() {
        assert_eq!(type_string("PKc"), "const char*");
        assert_eq!(type_string("KPc"), "const char*");
        assert_eq!(type_string("PPPi"), "int***");
        assert_eq!(type_string("VKi"), "const volatile int");
        assert_eq!(type_string("RKi"), "const int&");
        assert_eq!(type_string("Oi"), "int&&");
        assert_eq!(type_string("Prc"), "char* restrict");
    }

    #[test]
    fn test_failed_type_restores_cursor() {
        let mut parser = Parser::new("PKq");
        assert_eq!(parser.parse_type(), None);
        assert_eq!(parser.pos, 0);
    }

    #[test]
    fn test_array_dimensions_are_flattened() {
        let node = parse_type("A2_A3_i").unwrap();
        assert_eq!(
            node,
            TypeNode::Array {
                element: Box::new(TypeNode::Basic(BuiltinType::Int)),
                dimensions: vec![Some(2), Some(3)],
            }
        );
        assert_eq!(node.to_string(), "int[2][3]");
        assert_eq!(type_string("A_i"), "int[]");
        assert_eq!(parse_type("A10i"), None);
    }

    #[test]
    fn test_function_pointer() {
        assert_eq!(type_string("PFviE"), "void (*)(int)");
        assert_eq!(type_string("PFivE"), "int (*)()");
        assert_eq!(type_string("PFPKcicE"), "const char* (*)(int, char)");
    }

    #[test]
    fn test_member_pointers() {
        assert_eq!(type_string("M3FooFviE"), "void (Foo::*)(int)");
        assert_eq!(type_string("M3FooKFivE"), "int (Foo::*)() const");
        assert_eq!(type_string("M3Fooi"), "int Foo::**");
    }

    #[test]
    fn test_class_types_are_recorded() {
        let mut parser = Parser::new("3Foo");
        assert_eq!(parser.parse_type(), Some(TypeNode::Named("Foo".into())));
        assert_eq!(parser.ctx.substitution(0), Some(&TypeNode::Named("Foo".into())));
    }

    #[test]
    fn test_builtins_are_not_recorded() {
        let mut parser = Parser::new("Pi");
        parser.parse_type();
        assert_eq!(parser.ctx.substitution_count(), 0);
    }

    #[test]
    fn test_std_names() {
        assert_eq!(type_string("St6vectorIiSaIiEE"), "std::vector<int, std::allocator<int>>");
        assert_eq!(type_string("SaIcE"), "std::allocator<char>");
        assert_eq!(type_string("S6string"), "std::string");
        assert_eq!(
            type_string("Si"),
            "std::basic_istream<char, std::char_traits<char>>"
        );
    }

    #[test]
    fn test_template_arg_substitutions_are_transient() {
        let mut parser = Parser::new("St6vectorI3FooE");
        parser.parse_type();
        // only the outer std::vector<Foo> survives the argument list
        assert_eq!(parser.ctx.substitution_count(), 1);
        assert_eq!(
            parser.ctx.substitution(0).map(ToString::to_string).as_deref(),
            Some("std::vector<Foo>")
        );
    }

    #[test]
    fn test_substitution_out_of_range_is_placeholder() {
        assert_eq!(parse_type("S_"), Some(TypeNode::Unresolved));
        assert!(parse_type("S4_").is_some_and(|t| t.is_unresolved()));
        assert!(!parse_type("i").is_some_and(|t| t.is_unresolved()));
        assert_eq!(parse_type("T_"), Some(TypeNode::Unresolved));
        assert_eq!(type_string("RKT0_"), "const _&");
    }

    #[test]
    fn test_substitution_index_is_decimal() {
        let sig = signature("1f1a1b1c1d1e1f1g1h1i1j1kS10_S9_");
        let rendered: Vec<String> = sig.params.iter().map(ToString::to_string).collect();
        assert_eq!(rendered[11..], ["k", "j"]);
        // upper-case letters are not index digits
        assert_eq!(parse_type("SA_"), None);
    }

    #[test]
    fn test_number_saturates() {
        let mut parser = Parser::new("99999999999999999999999999");
        assert_eq!(parser.parse_number(), Some(usize::MAX));
        assert!(parser.is_at_end());
    }

    #[test]
    fn test_nested_name_segments() {
        let sig = signature("N5outer5inner4funcEv");
        assert_eq!(sig.name.segments.len(), 3);
        assert_eq!(sig.name.prefix().as_deref(), Some("outer::inner"));
        assert!(!sig.name.is_const);
    }

    #[test]
    fn test_const_method_flag() {
        let sig = signature("NK6Vector4sizeEv");
        assert!(sig.name.is_const);
        assert_eq!(sig.params, vec![TypeNode::Basic(BuiltinType::Void)]);
    }

    #[test]
    fn test_constructor_and_destructor() {
        assert_eq!(signature("N3FooC2Ev").name.to_string(), "Foo::Foo");
        assert_eq!(signature("N3FooD1Ev").name.to_string(), "Foo::~Foo");
        assert_eq!(
            signature("N3FooIiEC1Ev").name.to_string(),
            "Foo<int>::Foo"
        );
    }

    #[test]
    fn test_constructor_without_class_is_not_a_segment() {
        let mut parser = Parser::new("C1Ev");
        let name = parser.parse_encoded_name();
        assert!(name.is_empty());
        assert_eq!(parser.pos, 0);
    }

    #[test]
    fn test_function_template_binds_params() {
        let sig = signature("3maxIiET_S0_S0_");
        assert_eq!(sig.template_args(), Some(&[TypeNode::Basic(BuiltinType::Int)][..]));
        assert_eq!(sig.return_type, Some(TypeNode::Basic(BuiltinType::Int)));
        assert_eq!(sig.params.len(), 2);
    }

    #[test]
    fn test_nested_function_template_binds_params() {
        let sig = signature("N2ns4makeIcEEPT_v");
        assert_eq!(sig.name.to_string(), "ns::make<char>");
        assert_eq!(sig.return_type.map(|t| t.to_string()).as_deref(), Some("char*"));
    }

    #[test]
    fn test_class_template_scope_does_not_bind_params() {
        let sig = signature("N3FooIiE3barEv");
        assert_eq!(sig.name.to_string(), "Foo<int>::bar");
        assert!(sig.template_args().is_none());
        assert_eq!(sig.return_type, None);
    }

    #[test]
    fn test_length_prefixed_template_args() {
        let mut parser = Parser::new("3BoxI5ApplesE");
        let name = parser.parse_encoded_name();
        assert_eq!(name.to_string(), "Box<Apples>");
        assert!(parser.is_at_end());
    }

    #[test]
    fn test_template_literals() {
        assert_eq!(type_string("St5arrayIiLm4EE"), "std::array<int, 4ul>");
        assert_eq!(type_string("3FooILb1EE"), "Foo<true>");
        assert_eq!(type_string("3FooILin3EE"), "Foo<-3>");
    }

    #[test]
    fn test_template_parameter_pack() {
        assert_eq!(type_string("St5tupleIJidEE"), "std::tuple<int, double>");
    }

    #[test]
    fn test_operator_segments() {
        assert_eq!(signature("N6NumberplERKS_").name.to_string(), "Number::operator+");
        assert_eq!(signature("nwm").name.to_string(), "operator new");
        assert_eq!(signature("N3FoocviEv").name.to_string(), "Foo::operator");
        assert_eq!(signature("li3_kmy").name.to_string(), "operator\"\"");
    }

    #[test]
    fn test_nested_literal_encodings_are_bounded() {
        let input = format!("1fIL_ZN1aI{}", "L_ZN1aI".repeat(MAX_DEPTH * 20));
        let _ = Parser::new(&input).parse_symbol();

        assert_eq!(type_string("1aIL_Z1bEE"), "a<b>");
    }

    #[test]
    fn test_depth_limit_stops_recursion() {
        let input = "P".repeat(10) + &"A1_".repeat(MAX_DEPTH * 2) + "i";
        // must not overflow; the innermost productions give up
        let _ = Parser::new(&input).parse_symbol();
    }
}
