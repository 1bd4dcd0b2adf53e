//! Generic type descriptors
//!
//! Provides [`TypeDescriptor`], the possibly-parameterized declared type of a
//! field (`List<Foo>`, `Map<String, Bar>`), and its textual form.
//!
//! # Syntax
//!
//! ```text
//! type     := '?' | '$' ident | ident ( '<' type ( ',' type )* '>' )?
//! ident    := [A-Za-z0-9_.]+
//! ```
//!
//! `?` is a wildcard and `$T` an unresolved type variable; neither has a raw
//! class.

use crate::class::ClassId;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Declared type, possibly carrying generic arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Plain class reference
    Class(ClassId),

    /// Generic class applied to arguments
    Parameterized {
        /// Raw (erased) class
        raw: ClassId,
        /// Type arguments in declaration order
        args: Vec<TypeDescriptor>,
    },

    /// Unbound type variable
    Variable(String),

    /// Wildcard argument
    Wildcard,
}

impl TypeDescriptor {
    /// Plain class type
    #[inline]
    #[must_use]
    pub fn class(id: impl Into<ClassId>) -> Self {
        Self::Class(id.into())
    }

    /// Parameterized type
    #[inline]
    #[must_use]
    pub fn parameterized(raw: impl Into<ClassId>, args: Vec<TypeDescriptor>) -> Self {
        Self::Parameterized {
            raw: raw.into(),
            args,
        }
    }

    /// Type variable
    #[inline]
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// `List<element>`
    #[inline]
    #[must_use]
    pub fn list_of(element: TypeDescriptor) -> Self {
        Self::parameterized("List", vec![element])
    }

    /// `Set<element>`
    #[inline]
    #[must_use]
    pub fn set_of(element: TypeDescriptor) -> Self {
        Self::parameterized("Set", vec![element])
    }

    /// `Map<key, value>`
    #[inline]
    #[must_use]
    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::parameterized("Map", vec![key, value])
    }

    /// Raw class, `None` for variables and wildcards
    #[must_use]
    pub fn raw_class(&self) -> Option<&ClassId> {
        match self {
            Self::Class(id) | Self::Parameterized { raw: id, .. } => Some(id),
            Self::Variable(_) | Self::Wildcard => None,
        }
    }

    /// Type argument at `index`
    #[must_use]
    pub fn type_argument(&self, index: usize) -> Option<&TypeDescriptor> {
        match self {
            Self::Parameterized { args, .. } => args.get(index),
            _ => None,
        }
    }
}

impl From<ClassId> for TypeDescriptor {
    fn from(id: ClassId) -> Self {
        Self::Class(id)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(id) => write!(f, "{id}"),
            Self::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Variable(name) => write!(f, "${name}"),
            Self::Wildcard => f.write_str("?"),
        }
    }
}

/// Errors parsing a type descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// Input ended early
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Character not valid at this position
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar {
        /// Offending character
        found: char,
        /// Byte offset
        offset: usize,
    },

    /// Empty `<>` argument list
    #[error("empty type argument list at offset {0}")]
    EmptyArguments(usize),

    /// Type arguments nested deeper than the parser accepts
    #[error("type arguments nested deeper than {limit} at offset {offset}")]
    TooDeep {
        /// Nesting limit, [`MAX_NESTING`]
        limit: usize,
        /// Byte offset of the rejected `<`
        offset: usize,
    },
}

/// Deepest `<...>` nesting the parser accepts
pub const MAX_NESTING: usize = 64;

impl FromStr for TypeDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            input: s,
            pos: 0,
            depth: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(ty),
            Some(found) => Err(DescriptorError::UnexpectedChar {
                found,
                offset: parser.pos,
            }),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), DescriptorError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(DescriptorError::UnexpectedChar {
                found,
                offset: self.pos - found.len_utf8(),
            }),
            None => Err(DescriptorError::UnexpectedEnd),
        }
    }

    fn ident(&mut self) -> Result<&str, DescriptorError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            self.bump();
        }
        if self.pos == start {
            return match self.peek() {
                Some(found) => Err(DescriptorError::UnexpectedChar {
                    found,
                    offset: start,
                }),
                None => Err(DescriptorError::UnexpectedEnd),
            };
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor, DescriptorError> {
        self.skip_ws();
        match self.peek() {
            Some('?') => {
                self.bump();
                Ok(TypeDescriptor::Wildcard)
            }
            Some('$') => {
                self.bump();
                Ok(TypeDescriptor::variable(self.ident()?))
            }
            _ => {
                let raw = ClassId::new(self.ident()?);
                self.skip_ws();
                if self.peek() != Some('<') {
                    return Ok(TypeDescriptor::Class(raw));
                }
                let open = self.pos;
                if self.depth == MAX_NESTING {
                    return Err(DescriptorError::TooDeep {
                        limit: MAX_NESTING,
                        offset: open,
                    });
                }
                self.bump();
                self.skip_ws();
                if self.peek() == Some('>') {
                    return Err(DescriptorError::EmptyArguments(open));
                }
                self.depth += 1;
                let mut args = vec![self.parse_type()?];
                loop {
                    self.skip_ws();
                    if self.peek() == Some(',') {
                        self.bump();
                        args.push(self.parse_type()?);
                    } else {
                        self.expect('>')?;
                        break;
                    }
                }
                self.depth -= 1;
                Ok(TypeDescriptor::Parameterized { raw, args })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_plain_class() {
        let ty: TypeDescriptor = "org.example.Foo".parse().unwrap();
        assert_eq!(ty, TypeDescriptor::class("org.example.Foo"));
    }

    #[test]
    fn parse_nested_generics() {
        let ty: TypeDescriptor = "Map<String, List<Vector3f>>".parse().unwrap();
        assert_eq!(
            ty,
            TypeDescriptor::map_of(
                TypeDescriptor::class("String"),
                TypeDescriptor::list_of(TypeDescriptor::class("Vector3f")),
            )
        );
    }

    #[test]
    fn parse_variable_and_wildcard() {
        let ty: TypeDescriptor = "List<$T>".parse().unwrap();
        assert_eq!(ty.type_argument(0), Some(&TypeDescriptor::variable("T")));

        let ty: TypeDescriptor = "Set<?>".parse().unwrap();
        assert_eq!(ty.type_argument(0), Some(&TypeDescriptor::Wildcard));
    }

    #[test]
    fn display_matches_parse() {
        let text = "Map<String, List<$T>>";
        let ty: TypeDescriptor = text.parse().unwrap();
        assert_eq!(ty.to_string(), text);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "List<".parse::<TypeDescriptor>(),
            Err(DescriptorError::UnexpectedEnd)
        );
        assert_eq!(
            "List<>".parse::<TypeDescriptor>(),
            Err(DescriptorError::EmptyArguments(4))
        );
        assert!(matches!(
            "List<A> trailing".parse::<TypeDescriptor>(),
            Err(DescriptorError::UnexpectedChar { found: 't', .. })
        ));
    }

    #[test]
    fn raw_class_of_variable_is_none() {
        assert!(TypeDescriptor::variable("T").raw_class().is_none());
        assert!(TypeDescriptor::Wildcard.raw_class().is_none());
        assert_eq!(
            TypeDescriptor::list_of(TypeDescriptor::Wildcard).raw_class(),
            Some(&ClassId::new("List"))
        );
    }

    #[test]
    fn type_argument_out_of_range() {
        let ty = TypeDescriptor::list_of(TypeDescriptor::class("A"));
        assert!(ty.type_argument(1).is_none());
        assert!(TypeDescriptor::class("List").type_argument(0).is_none());
    }

    #[test]
    fn nesting_limit() {
        let nested = |depth: usize| format!("{}Item{}", "List<".repeat(depth), ">".repeat(depth));

        assert!(nested(MAX_NESTING).parse::<TypeDescriptor>().is_ok());
        assert_eq!(
            nested(MAX_NESTING + 1).parse::<TypeDescriptor>(),
            Err(DescriptorError::TooDeep {
                limit: MAX_NESTING,
                offset: MAX_NESTING * 5 + 4,
            })
        );
        assert!(matches!(
            nested(100_000).parse::<TypeDescriptor>(),
            Err(DescriptorError::TooDeep { .. })
        ));
    }
}
