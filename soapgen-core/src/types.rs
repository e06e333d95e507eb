use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Built-in generic base for repeated values (`list<T>`).
pub const LIST: &str = "list";
/// Built-in generic base for element holders (`holder<T>`).
pub const HOLDER: &str = "holder";
/// The void return type.
pub const VOID: &str = "void";

/// Scalar type names that resolve without an entry in the metadata index.
pub const SCALARS: &[&str] = &[
    "string", "boolean", "byte", "short", "int", "long", "float", "double", "decimal",
    "integer", "bytes", "date", "datetime", "qname", "any",
];

/// A declared type: a (possibly qualified) base name plus generic arguments.
///
/// Written and parsed as `base<arg, arg>`, e.g. `list<org.acme.Fruit>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    base: String,
    args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(base: impl Into<String>) -> Self {
        TypeRef {
            base: base.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(base: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef {
            base: base.into(),
            args,
        }
    }

    pub fn void() -> Self {
        Self::named(VOID)
    }

    /// Parse a type expression such as `holder<list<string>>`.
    pub fn parse(input: &str) -> Result<Self, MetadataError> {
        let mut parser = Parser {
            src: input,
            pos: 0,
            depth: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    pub fn is_void(&self) -> bool {
        self.args.is_empty() && (self.base == VOID || self.base == "()")
    }

    pub fn is_scalar(&self) -> bool {
        self.args.is_empty() && SCALARS.contains(&self.base.as_str())
    }

    /// Last dot-separated segment of the base name.
    pub fn simple_name(&self) -> &str {
        self.base.rsplit('.').next().unwrap_or(&self.base)
    }

    /// Visit this type and every nested argument, depth first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TypeRef)) {
        visit(self);
        for arg in &self.args {
            arg.walk(visit);
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.to_string()
    }
}

/// Deepest generic nesting accepted by [`TypeRef::parse`].
pub const MAX_TYPE_DEPTH: usize = 64;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> MetadataError {
        MetadataError::InvalidType {
            input: self.src.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, MetadataError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '(' | ')'))
        {
            self.bump();
        }
        let base = &self.src[start..self.pos];
        if base.is_empty() {
            return Err(self.error("expected type name"));
        }

        self.skip_ws();
        let mut args = Vec::new();
        if self.peek() == Some('<') {
            if self.depth >= MAX_TYPE_DEPTH {
                return Err(self.error("type nesting too deep"));
            }
            self.bump();
            self.depth += 1;
            loop {
                args.push(self.parse_type()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => self.bump(),
                    Some('>') => {
                        self.bump();
                        self.depth -= 1;
                        break;
                    }
                    _ => return Err(self.error("expected ',' or '>'")),
                }
            }
        }

        Ok(TypeRef::generic(base, args))
    }
}

/// Typed element holder for service signatures: a qualified element name
/// plus an optional payload. Declared as `holder<T>` in metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementHolder<T> {
    pub namespace: String,
    pub local: String,
    pub value: Option<T>,
}

impl<T> ElementHolder<T> {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>, value: Option<T>) -> Self {
        ElementHolder {
            namespace: namespace.into(),
            local: local.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_generics() {
        let ty = TypeRef::parse("holder< list<org.acme.Fruit> >").unwrap();
        assert_eq!(ty.base(), "holder");
        assert_eq!(ty.args()[0].base(), "list");
        assert_eq!(ty.args()[0].args()[0].simple_name(), "Fruit");
        assert_eq!(ty.to_string(), "holder<list<org.acme.Fruit>>");
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        assert!(TypeRef::parse("list<string").is_err());
        assert!(TypeRef::parse("list<>").is_err());
        assert!(TypeRef::parse("string>").is_err());
        assert!(TypeRef::parse("").is_err());
    }

    #[test]
    fn rejects_excessive_nesting() {
        let deep = format!("{}string{}", "list<".repeat(200_000), ">".repeat(200_000));
        let err = TypeRef::parse(&deep).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::InvalidType { ref reason, .. } if reason.starts_with("type nesting too deep")
        ));

        let ok = format!(
            "{}string{}",
            "list<".repeat(MAX_TYPE_DEPTH),
            ">".repeat(MAX_TYPE_DEPTH)
        );
        assert!(TypeRef::parse(&ok).is_ok());
    }

    #[test]
    fn void_detection() {
        assert!(TypeRef::void().is_void());
        assert!(TypeRef::parse("()").unwrap().is_void());
        assert!(!TypeRef::named("string").is_void());
    }
}
