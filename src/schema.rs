//! Static schema descriptors.
//!
//! A [`Schema`] is a list of [`Field`]s declared once as a `static`. Each field
//! has a structural identifier (the Rust field name), a [`Kind`], and metadata
//! in one of two dialects:
//!
//! ```ignore
//! static BAR: Schema = Schema::new("Bar", &[
//!     // compact tag: name;shorthand;default;usage
//!     Field::tagged("example", Kind::String, "exampleString;;;interesting value"),
//!     // keyed: one builder call per sub-key
//!     Field::leaf("enabled", "enabled", Kind::Bool)
//!         .short('e')
//!         .default("false")
//!         .usage("enables something"),
//! ]);
//! ```
//!
//! A name that is empty or `-` excludes the field from flags, bindings and
//! path resolution.

use std::fmt;

use crate::error::ClapflagsError;
use crate::validate::Messages;

/// Name marking a field as excluded.
pub const EXCLUDED: &str = "-";

/// The value kind of a schema field.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// Comma-separated sequence of strings.
    StringList,
    /// A string-keyed table. Allowed in a schema, never a flag.
    Map,
    /// A nested sub-schema. Contributes a key segment, never a flag.
    Nested(&'static Schema),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "int8",
            Kind::I16 => "int16",
            Kind::I32 => "int32",
            Kind::I64 => "int64",
            Kind::Isize => "int",
            Kind::U8 => "uint8",
            Kind::U16 => "uint16",
            Kind::U32 => "uint32",
            Kind::U64 => "uint64",
            Kind::Usize => "uint",
            Kind::F32 => "float32",
            Kind::F64 => "float64",
            Kind::String => "string",
            Kind::StringList => "strings",
            Kind::Map => "map",
            Kind::Nested(_) => "nested",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared metadata of a field, in either dialect.
#[derive(Debug, Clone, Copy)]
pub enum Metadata {
    /// `name;shorthand;default;usage`. Trailing parts may be omitted.
    Tag(&'static str),
    Keyed(Keyed),
}

#[derive(Debug, Clone, Copy)]
pub struct Keyed {
    pub name: &'static str,
    pub shorthand: Option<char>,
    pub default: &'static str,
    pub usage: &'static str,
}

/// Metadata resolved from either dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    pub shorthand: Option<char>,
    pub default: &'static str,
    pub usage: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Structural identifier, as reported by the validation layer.
    pub ident: &'static str,
    pub kind: Kind,
    pub meta: Metadata,
}

impl Field {
    /// A field described by a compact tag.
    pub const fn tagged(ident: &'static str, kind: Kind, tag: &'static str) -> Self {
        Self {
            ident,
            kind,
            meta: Metadata::Tag(tag),
        }
    }

    /// A field described by keyed metadata. Refine with [`short`](Self::short),
    /// [`default`](Self::default) and [`usage`](Self::usage).
    pub const fn leaf(ident: &'static str, name: &'static str, kind: Kind) -> Self {
        Self {
            ident,
            kind,
            meta: Metadata::Keyed(Keyed {
                name,
                shorthand: None,
                default: "",
                usage: "",
            }),
        }
    }

    /// A nested sub-schema mounted under `name`.
    pub const fn nested(ident: &'static str, name: &'static str, schema: &'static Schema) -> Self {
        Self::leaf(ident, name, Kind::Nested(schema))
    }

    /// A field that exists in the config but gets no flag and no key.
    pub const fn skip(ident: &'static str, kind: Kind) -> Self {
        Self::tagged(ident, kind, EXCLUDED)
    }

    pub const fn short(self, shorthand: char) -> Self {
        match self.meta {
            Metadata::Keyed(keyed) => Self {
                meta: Metadata::Keyed(Keyed {
                    shorthand: Some(shorthand),
                    ..keyed
                }),
                ..self
            },
            Metadata::Tag(_) => self,
        }
    }

    pub const fn default(self, default: &'static str) -> Self {
        match self.meta {
            Metadata::Keyed(keyed) => Self {
                meta: Metadata::Keyed(Keyed { default, ..keyed }),
                ..self
            },
            Metadata::Tag(_) => self,
        }
    }

    pub const fn usage(self, usage: &'static str) -> Self {
        match self.meta {
            Metadata::Keyed(keyed) => Self {
                meta: Metadata::Keyed(Keyed { usage, ..keyed }),
                ..self
            },
            Metadata::Tag(_) => self,
        }
    }

    /// Whether the metadata uses the keyed dialect.
    pub fn is_keyed(&self) -> bool {
        matches!(self.meta, Metadata::Keyed(_))
    }

    /// Resolve the field's metadata. `Ok(None)` means the field is excluded.
    pub fn resolve(&self) -> Result<Option<FieldMeta>, ClapflagsError> {
        let meta = match self.meta {
            Metadata::Tag(tag) => self.parse_tag(tag)?,
            Metadata::Keyed(keyed) => FieldMeta {
                name: keyed.name,
                shorthand: keyed.shorthand,
                default: keyed.default,
                usage: keyed.usage,
            },
        };
        if meta.name.is_empty() || meta.name == EXCLUDED {
            return Ok(None);
        }
        if meta.name.contains('.') {
            return Err(ClapflagsError::InvalidName {
                field: self.ident.to_string(),
                name: meta.name.to_string(),
            });
        }
        if meta.shorthand == Some('-') {
            return Err(ClapflagsError::InvalidShorthand {
                field: self.ident.to_string(),
                shorthand: "-".to_string(),
            });
        }
        Ok(Some(meta))
    }

    fn parse_tag(&self, tag: &'static str) -> Result<FieldMeta, ClapflagsError> {
        let mut parts = tag.splitn(4, ';');
        let name = parts.next().unwrap_or_default();
        let short = parts.next().unwrap_or_default();
        let default = parts.next().unwrap_or_default();
        let usage = parts.next().unwrap_or_default();

        let mut chars = short.chars();
        let shorthand = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) => Some(c),
            (Some(_), Some(_)) => {
                return Err(ClapflagsError::InvalidShorthand {
                    field: self.ident.to_string(),
                    shorthand: short.to_string(),
                });
            }
        };

        Ok(FieldMeta {
            name,
            shorthand,
            default,
            usage,
        })
    }
}

/// One level of a configuration schema.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Find a field by structural identifier, falling back to declared name.
    pub fn field(&self, segment: &str) -> Option<&Field> {
        self.position(segment).map(|i| &self.fields[i])
    }

    /// Declaration index of the field [`field`](Self::field) would return.
    pub fn position(&self, segment: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.ident == segment)
            .or_else(|| {
                self.fields.iter().position(|f| {
                    matches!(f.resolve(), Ok(Some(meta)) if meta.name == segment)
                })
            })
    }
}

/// A configuration type that can be driven by a flag schema.
///
/// Implement it next to the `confique::Config` and `validator::Validate`
/// derives of the root config struct.
pub trait Settings: confique::Config + validator::Validate {
    const SCHEMA: &'static Schema;

    /// Called before validation, to register message templates for custom rules.
    fn pre_validate(&self, _messages: &mut Messages) {}
}
