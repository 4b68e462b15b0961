//! TOML tables as config layers.
//!
//! Every source (flag defaults, files, environment, command line) becomes a
//! nested `toml::Table` keyed by the hierarchical config keys. Layers are
//! deep-merged in precedence order before confique deserializes the result.

use toml::{Table, Value};

use crate::error::ClapflagsError;
use crate::flags::FlagValue;
use crate::walker::Generated;

/// Deep-merge `overlay` on top of `base`.
///
/// Tables present on both sides are merged recursively; any other value in
/// `overlay` replaces the one in `base`.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        match (base.remove(&key), value) {
            (Some(Value::Table(lower)), Value::Table(upper)) => {
                base.insert(key, Value::Table(deep_merge(lower, upper)));
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
    base
}

/// Insert `value` at a dotted key, creating intermediate tables.
pub fn insert_dotted(table: &mut Table, key: &str, value: Value) -> Result<(), ClapflagsError> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = table;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current
            .entry(segment)
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| ClapflagsError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{segment}' is already set to a non-table value"),
            })?;
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Insert a flag value at a dotted key.
pub fn insert_flag_value(
    table: &mut Table,
    key: &str,
    value: &FlagValue,
) -> Result<(), ClapflagsError> {
    let value = value
        .to_toml()
        .map_err(|reason| ClapflagsError::InvalidValue {
            key: key.to_string(),
            reason,
        })?;
    insert_dotted(table, key, value)
}

/// The lowest layer: every bound flag's default at its key.
pub fn defaults_table(generated: &Generated) -> Result<Table, ClapflagsError> {
    let mut table = Table::new();
    for binding in generated.bindings.iter() {
        if let Some(spec) = generated.flags.lookup(&binding.flag) {
            insert_flag_value(&mut table, &binding.key, &spec.default)?;
        }
    }
    Ok(table)
}
