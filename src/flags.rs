//! Typed flag registration.
//!
//! Every schema leaf becomes a [`FlagSpec`]: a name, an optional shorthand,
//! usage text, and a default parsed from the field's string literal into a
//! typed [`FlagValue`]. The [`FlagSet`] keeps specs in registration order and
//! rejects duplicate names or shorthands. Turning specs into clap arguments is
//! the job of the [`cli`](crate::cli) module.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ClapflagsError, ValueError};
use crate::schema::Kind;

/// A typed flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    StringList(Vec<String>),
}

impl FlagValue {
    /// Name of the value's kind, matching [`Kind::name`].
    pub fn kind_name(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "bool",
            FlagValue::I8(_) => "int8",
            FlagValue::I16(_) => "int16",
            FlagValue::I32(_) => "int32",
            FlagValue::I64(_) => "int64",
            FlagValue::Isize(_) => "int",
            FlagValue::U8(_) => "uint8",
            FlagValue::U16(_) => "uint16",
            FlagValue::U32(_) => "uint32",
            FlagValue::U64(_) => "uint64",
            FlagValue::Usize(_) => "uint",
            FlagValue::F32(_) => "float32",
            FlagValue::F64(_) => "float64",
            FlagValue::String(_) => "string",
            FlagValue::StringList(_) => "strings",
        }
    }

    /// Whether this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            FlagValue::Bool(v) => !v,
            FlagValue::I8(v) => *v == 0,
            FlagValue::I16(v) => *v == 0,
            FlagValue::I32(v) => *v == 0,
            FlagValue::I64(v) => *v == 0,
            FlagValue::Isize(v) => *v == 0,
            FlagValue::U8(v) => *v == 0,
            FlagValue::U16(v) => *v == 0,
            FlagValue::U32(v) => *v == 0,
            FlagValue::U64(v) => *v == 0,
            FlagValue::Usize(v) => *v == 0,
            FlagValue::F32(v) => *v == 0.0,
            FlagValue::F64(v) => *v == 0.0,
            FlagValue::String(v) => v.is_empty(),
            FlagValue::StringList(v) => v.is_empty(),
        }
    }

    /// Convert into a TOML value for layering.
    ///
    /// Fails only for unsigned values beyond `i64::MAX`, which TOML cannot hold.
    pub fn to_toml(&self) -> Result<toml::Value, String> {
        use toml::Value;

        let too_large = |v: &dyn fmt::Display| format!("{v} does not fit in a TOML integer");
        let value = match self {
            FlagValue::Bool(v) => Value::Boolean(*v),
            FlagValue::I8(v) => Value::Integer(i64::from(*v)),
            FlagValue::I16(v) => Value::Integer(i64::from(*v)),
            FlagValue::I32(v) => Value::Integer(i64::from(*v)),
            FlagValue::I64(v) => Value::Integer(*v),
            FlagValue::Isize(v) => {
                Value::Integer(i64::try_from(*v).map_err(|_| too_large(v))?)
            }
            FlagValue::U8(v) => Value::Integer(i64::from(*v)),
            FlagValue::U16(v) => Value::Integer(i64::from(*v)),
            FlagValue::U32(v) => Value::Integer(i64::from(*v)),
            FlagValue::U64(v) => Value::Integer(i64::try_from(*v).map_err(|_| too_large(v))?),
            FlagValue::Usize(v) => {
                Value::Integer(i64::try_from(*v).map_err(|_| too_large(v))?)
            }
            FlagValue::F32(v) => Value::Float(f64::from(*v)),
            FlagValue::F64(v) => Value::Float(*v),
            FlagValue::String(v) => Value::String(v.clone()),
            FlagValue::StringList(v) => {
                Value::Array(v.iter().cloned().map(Value::String).collect())
            }
        };
        Ok(value)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(v) => write!(f, "{v}"),
            FlagValue::I8(v) => write!(f, "{v}"),
            FlagValue::I16(v) => write!(f, "{v}"),
            FlagValue::I32(v) => write!(f, "{v}"),
            FlagValue::I64(v) => write!(f, "{v}"),
            FlagValue::Isize(v) => write!(f, "{v}"),
            FlagValue::U8(v) => write!(f, "{v}"),
            FlagValue::U16(v) => write!(f, "{v}"),
            FlagValue::U32(v) => write!(f, "{v}"),
            FlagValue::U64(v) => write!(f, "{v}"),
            FlagValue::Usize(v) => write!(f, "{v}"),
            FlagValue::F32(v) => write!(f, "{v}"),
            FlagValue::F64(v) => write!(f, "{v}"),
            FlagValue::String(v) => write!(f, "{v}"),
            FlagValue::StringList(v) => write!(f, "[{}]", v.join(",")),
        }
    }
}

/// Parse a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("'{s}' is not a boolean")),
    }
}

fn parse_number<T>(s: &str) -> Result<T, ValueError>
where
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    if s.is_empty() {
        return Ok(T::default());
    }
    s.parse::<T>()
        .map_err(|e| ValueError::Malformed(format!("'{s}': {e}")))
}

/// Parse a comma-separated list. An empty literal is an empty list.
pub fn parse_list(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(',').map(str::to_string).collect()
}

/// Parse a string literal into a typed value of `kind`.
///
/// An empty literal yields the kind's zero value.
pub fn parse_value(kind: Kind, literal: &str) -> Result<FlagValue, ValueError> {
    let value = match kind {
        Kind::Bool if literal.is_empty() => FlagValue::Bool(false),
        Kind::Bool => FlagValue::Bool(parse_bool(literal).map_err(ValueError::Malformed)?),
        Kind::I8 => FlagValue::I8(parse_number(literal)?),
        Kind::I16 => FlagValue::I16(parse_number(literal)?),
        Kind::I32 => FlagValue::I32(parse_number(literal)?),
        Kind::I64 => FlagValue::I64(parse_number(literal)?),
        Kind::Isize => FlagValue::Isize(parse_number(literal)?),
        Kind::U8 => FlagValue::U8(parse_number(literal)?),
        Kind::U16 => FlagValue::U16(parse_number(literal)?),
        Kind::U32 => FlagValue::U32(parse_number(literal)?),
        Kind::U64 => FlagValue::U64(parse_number(literal)?),
        Kind::Usize => FlagValue::Usize(parse_number(literal)?),
        Kind::F32 => FlagValue::F32(parse_number(literal)?),
        Kind::F64 => FlagValue::F64(parse_number(literal)?),
        Kind::String => FlagValue::String(literal.to_string()),
        Kind::StringList => FlagValue::StringList(parse_list(literal)),
        Kind::Map | Kind::Nested(_) => return Err(ValueError::Unsupported(kind.name())),
    };
    Ok(value)
}

/// A registered flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    pub name: String,
    pub shorthand: Option<char>,
    pub usage: String,
    /// Typed default; its variant also fixes the flag's kind.
    pub default: FlagValue,
}

impl FlagSpec {
    /// Parse a runtime value (from the environment, say) as this flag's kind.
    pub fn parse(&self, s: &str) -> Result<FlagValue, ValueError> {
        match &self.default {
            FlagValue::Bool(_) => parse_bool(s).map(FlagValue::Bool).map_err(ValueError::Malformed),
            FlagValue::I8(_) => Ok(FlagValue::I8(parse_number(s)?)),
            FlagValue::I16(_) => Ok(FlagValue::I16(parse_number(s)?)),
            FlagValue::I32(_) => Ok(FlagValue::I32(parse_number(s)?)),
            FlagValue::I64(_) => Ok(FlagValue::I64(parse_number(s)?)),
            FlagValue::Isize(_) => Ok(FlagValue::Isize(parse_number(s)?)),
            FlagValue::U8(_) => Ok(FlagValue::U8(parse_number(s)?)),
            FlagValue::U16(_) => Ok(FlagValue::U16(parse_number(s)?)),
            FlagValue::U32(_) => Ok(FlagValue::U32(parse_number(s)?)),
            FlagValue::U64(_) => Ok(FlagValue::U64(parse_number(s)?)),
            FlagValue::Usize(_) => Ok(FlagValue::Usize(parse_number(s)?)),
            FlagValue::F32(_) => Ok(FlagValue::F32(parse_number(s)?)),
            FlagValue::F64(_) => Ok(FlagValue::F64(parse_number(s)?)),
            FlagValue::String(_) => Ok(FlagValue::String(s.to_string())),
            FlagValue::StringList(_) => Ok(FlagValue::StringList(parse_list(s))),
        }
    }
}

/// Ordered collection of registered flags.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<FlagSpec>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag, rejecting a name or shorthand that is already taken, and
    /// the shorthand `-`.
    pub fn add(&mut self, spec: FlagSpec) -> Result<(), ClapflagsError> {
        if spec.shorthand == Some('-') {
            return Err(ClapflagsError::InvalidShorthand {
                field: spec.name,
                shorthand: "-".to_string(),
            });
        }
        if self.lookup(&spec.name).is_some() {
            return Err(ClapflagsError::DuplicateFlag(spec.name));
        }
        if let Some(short) = spec.shorthand
            && let Some(first) = self.lookup_short(short)
        {
            return Err(ClapflagsError::DuplicateShorthand {
                shorthand: short,
                first: first.name.clone(),
                second: spec.name,
            });
        }
        self.flags.push(spec);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn lookup_short(&self, short: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.shorthand == Some(short))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlagSpec> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Parse `default_literal` as `kind` and register the resulting flag.
///
/// Unsigned defaults above `i64::MAX` are rejected, since config layers are
/// TOML tables.
pub fn register_flag(
    flags: &mut FlagSet,
    kind: Kind,
    default_literal: &str,
    name: &str,
    shorthand: Option<char>,
    usage: &str,
) -> Result<(), ClapflagsError> {
    let invalid = |reason: String| ClapflagsError::InvalidDefault {
        flag: name.to_string(),
        kind: kind.name(),
        literal: default_literal.to_string(),
        reason,
    };
    let default = parse_value(kind, default_literal).map_err(|e| match e {
        ValueError::Malformed(reason) => invalid(reason),
        ValueError::Unsupported(kind) => ClapflagsError::UnsupportedKind {
            flag: name.to_string(),
            kind,
        },
    })?;
    // Defaults seed the lowest config layer, so they must be representable there.
    default.to_toml().map_err(invalid)?;

    debug!(flag = name, kind = kind.name(), default = %default, "registered flag");
    flags.add(FlagSpec {
        name: name.to_string(),
        shorthand,
        usage: usage.to_string(),
        default,
    })
}
