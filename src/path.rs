//! Field-path resolution: the walker in reverse.
//!
//! The validation layer reports violations by structural path (`["bar",
//! "enabled"]`). Resolving that path against the same schema yields the flag
//! name the walker registered for the field, so error messages can name the
//! token a user actually types.

use crate::error::ClapflagsError;
use crate::naming::kebab;
use crate::schema::{Kind, Schema};

/// Resolve a structural field path to its flag name, appending to `accumulated`.
///
/// Segments match a field's identifier or, failing that, its declared name.
pub fn resolve_flag_name(
    schema: &Schema,
    path: &[&str],
    accumulated: &str,
) -> Result<String, ClapflagsError> {
    let mismatch = || ClapflagsError::PathMismatch {
        path: path.join("."),
        schema: schema.name,
    };

    let (current, rest) = path.split_first().ok_or_else(mismatch)?;
    let field = schema.field(current).ok_or_else(mismatch)?;
    let meta = field
        .resolve()?
        .ok_or_else(|| ClapflagsError::ExcludedField(path.join(".")))?;

    let segment = kebab(meta.name);
    let name = if accumulated.is_empty() {
        segment
    } else {
        format!("{accumulated}-{segment}")
    };

    if rest.is_empty() {
        return Ok(name);
    }
    match field.kind {
        Kind::Nested(nested) => resolve_flag_name(nested, rest, &name),
        _ => Err(mismatch()),
    }
}

/// Resolve a structural path to the `--flag` token shown to users.
pub fn flag_token(schema: &Schema, path: &[&str]) -> Result<String, ClapflagsError> {
    resolve_flag_name(schema, path, "").map(|name| format!("--{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{EXAMPLE_SCHEMA, SERVER_SCHEMA};
    use crate::walker::generate;

    /// Every leaf's structural path, built by walking identifiers.
    fn leaf_paths(schema: &Schema, prefix: &[&'static str], out: &mut Vec<Vec<&'static str>>) {
        for field in schema.fields {
            if field.resolve().unwrap().is_none() {
                continue;
            }
            let mut path = prefix.to_vec();
            path.push(field.ident);
            match field.kind {
                Kind::Nested(nested) => leaf_paths(nested, &path, out),
                _ => out.push(path),
            }
        }
    }

    fn assert_equivalent(schema: &Schema) {
        let generated = generate(schema).unwrap();
        let mut paths = Vec::new();
        leaf_paths(schema, &[], &mut paths);
        assert_eq!(paths.len(), generated.flags.len());

        for (path, flag) in paths.iter().zip(generated.flags.iter()) {
            assert_eq!(resolve_flag_name(schema, path, "").unwrap(), flag.name);
        }
    }

    #[test]
    fn resolver_matches_walker_for_example_schema() {
        assert_equivalent(&EXAMPLE_SCHEMA);
    }

    #[test]
    fn resolver_matches_walker_for_server_schema() {
        assert_equivalent(&SERVER_SCHEMA);
    }

    #[test]
    fn nested_path() {
        let name = resolve_flag_name(&EXAMPLE_SCHEMA, &["bar", "example"], "").unwrap();
        assert_eq!(name, "bar-example-string");
    }

    #[test]
    fn declared_names_are_accepted() {
        let name = resolve_flag_name(&EXAMPLE_SCHEMA, &["bar", "exampleString"], "").unwrap();
        assert_eq!(name, "bar-example-string");
    }

    #[test]
    fn accumulated_prefix_is_kept() {
        let name = resolve_flag_name(&EXAMPLE_SCHEMA, &["foo"], "app").unwrap();
        assert_eq!(name, "app-foo");
    }

    #[test]
    fn flag_token_adds_dashes() {
        assert_eq!(
            flag_token(&EXAMPLE_SCHEMA, &["bar", "enabled"]).unwrap(),
            "--bar-enabled"
        );
    }

    #[test]
    fn unknown_field_is_mismatch() {
        let err = resolve_flag_name(&EXAMPLE_SCHEMA, &["bar", "missing"], "").unwrap_err();
        match err {
            ClapflagsError::PathMismatch { path, schema } => {
                assert_eq!(path, "missing");
                assert_eq!(schema, "Bar");
            }
            other => panic!("Expected PathMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn descending_into_leaf_is_mismatch() {
        let err = resolve_flag_name(&EXAMPLE_SCHEMA, &["foo", "deeper"], "").unwrap_err();
        assert!(matches!(err, ClapflagsError::PathMismatch { .. }));
    }

    #[test]
    fn empty_path_is_mismatch() {
        let err = resolve_flag_name(&EXAMPLE_SCHEMA, &[], "").unwrap_err();
        assert!(matches!(err, ClapflagsError::PathMismatch { .. }));
    }

    #[test]
    fn excluded_field_is_reported() {
        let err = resolve_flag_name(&EXAMPLE_SCHEMA, &["baz"], "").unwrap_err();
        assert!(matches!(err, ClapflagsError::ExcludedField(ref p) if p == "baz"));
    }

    #[test]
    fn excluded_sibling_does_not_affect_lookup() {
        assert_eq!(resolve_flag_name(&EXAMPLE_SCHEMA, &["foo"], "").unwrap(), "foo");
    }
}
