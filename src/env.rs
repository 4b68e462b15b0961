//! Environment variables as a config layer.
//!
//! Each binding can be set from the environment. The variable name derived
//! from the dotted key (`APP_BAR_EXAMPLESTRING`) always works. Fields declared
//! with keyed metadata also accept the name derived from their flag
//! (`APP_BAR_EXAMPLE_STRING`), which is checked first. Empty values count as
//! unset. Values are parsed with the same rules as the flag's kind.

use std::collections::HashMap;

use toml::Table;
use tracing::debug;

use crate::error::ClapflagsError;
use crate::layer::insert_flag_value;
use crate::naming::{flag_env_var, key_env_var};
use crate::walker::{Binding, Generated};

/// Candidate variable names for a binding, in lookup order.
pub fn env_names(prefix: &str, binding: &Binding) -> Vec<String> {
    let mut names = Vec::with_capacity(2);
    if binding.env_alias {
        names.push(flag_env_var(prefix, &binding.flag));
    }
    let by_key = key_env_var(prefix, &binding.key);
    if !names.contains(&by_key) {
        names.push(by_key);
    }
    names
}

/// Build a layer from `vars`, taking only variables that name a binding.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(
    prefix: &str,
    generated: &Generated,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Table, ClapflagsError> {
    let vars: HashMap<String, String> = vars.into_iter().filter(|(_, v)| !v.is_empty()).collect();
    let mut table = Table::new();

    for binding in generated.bindings.iter() {
        let Some(spec) = generated.flags.lookup(&binding.flag) else {
            continue;
        };
        let Some((var, raw)) = env_names(prefix, binding)
            .into_iter()
            .find_map(|name| vars.get(&name).map(|raw| (name, raw)))
        else {
            continue;
        };

        let value = spec.parse(raw).map_err(|e| ClapflagsError::InvalidEnv {
            var: var.clone(),
            reason: e.to_string(),
        })?;
        debug!(var = %var, key = %binding.key, "config value from environment");
        insert_flag_value(&mut table, &binding.key, &value)?;
    }

    Ok(table)
}
