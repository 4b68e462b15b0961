//! Schema walker: one flag and one binding per schema leaf.
//!
//! The walk is depth-first and pre-order over fields in declaration order, so
//! flags are registered (and shown in help) in the order the schema declares
//! them. Nested fields only extend the key prefix.

use tracing::{debug, trace};

use crate::error::ClapflagsError;
use crate::flags::{self, FlagSet};
use crate::naming::{flag_name, join_key};
use crate::schema::{Kind, Schema};

/// Maps a hierarchical config key to the flag that can supply its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Dotted config key, e.g. `bar.exampleString`.
    pub key: String,
    /// Flag name without dashes, e.g. `bar-example-string`.
    pub flag: String,
    /// The flag name is also accepted as an environment variable name.
    pub env_alias: bool,
}

/// Ordered key-to-flag binding table.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: String, flag: String, env_alias: bool) {
        debug!(key = %key, flag = %flag, env_alias, "bound key");
        self.entries.push(Binding {
            key,
            flag,
            env_alias,
        });
    }

    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.entries.iter().find(|b| b.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flags and bindings produced by one walk of a root schema.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub flags: FlagSet,
    pub bindings: Bindings,
}

/// Walk `schema` from the root and return its flags and bindings.
pub fn generate(schema: &Schema) -> Result<Generated, ClapflagsError> {
    let mut generated = Generated::default();
    generate_flags(
        &mut generated.flags,
        &mut generated.bindings,
        schema,
        "",
    )?;
    Ok(generated)
}

/// Register a flag for every leaf of `schema` under `prefix`.
///
/// Stops at the first failure; whatever was registered before it stays in
/// `flags` and `bindings`.
pub fn generate_flags(
    flags: &mut FlagSet,
    bindings: &mut Bindings,
    schema: &Schema,
    prefix: &str,
) -> Result<(), ClapflagsError> {
    for field in schema.fields {
        let Some(meta) = field.resolve()? else {
            trace!(schema = schema.name, field = field.ident, "skipping excluded field");
            continue;
        };

        let key = join_key(prefix, meta.name);
        match field.kind {
            Kind::Nested(nested) => generate_flags(flags, bindings, nested, &key)?,
            kind => {
                let name = flag_name(&key);
                flags::register_flag(flags, kind, meta.default, &name, meta.shorthand, meta.usage)?;
                bindings.bind(key, name, field.is_keyed());
            }
        }
    }
    Ok(())
}
