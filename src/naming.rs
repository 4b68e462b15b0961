//! Key and flag naming.
//!
//! A field's hierarchical key is the dot-joined chain of declared names
//! (`bar.exampleString`). Its flag name is the same chain with dots turned
//! into hyphens and every segment kebab-cased (`bar-example-string`).

/// Convert a mixed/camel case identifier to kebab-case.
///
/// A hyphen is inserted between a lowercase letter or digit and a following
/// uppercase letter, and before an uppercase letter that starts a capitalized
/// word (`HTTPServer` -> `http-server`). An existing `-` is a word boundary,
/// so `Bar-Example` becomes `bar-example`, never `bar--example`.
pub fn kebab(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase()
            && let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p))
        {
            let after_word = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let starts_word = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev != '-' && (after_word || starts_word) {
                out.push('-');
            }
        }
        out.push(c);
    }

    out.to_lowercase()
}

/// Join a key prefix and a field name into a dotted key.
pub fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        return name.to_string();
    }
    format!("{prefix}.{name}")
}

/// Derive the flag name for a dotted key.
pub fn flag_name(key: &str) -> String {
    kebab(&key.replace('.', "-"))
}

/// Environment variable derived from a flag name: `PREFIX_BAR_EXAMPLE_STRING`.
pub fn flag_env_var(prefix: &str, flag: &str) -> String {
    with_prefix(prefix, &flag.to_uppercase().replace('-', "_"))
}

/// Environment variable derived from a dotted key: `PREFIX_BAR_EXAMPLESTRING`.
pub fn key_env_var(prefix: &str, key: &str) -> String {
    with_prefix(prefix, &key.to_uppercase().replace(['.', '-'], "_"))
}

fn with_prefix(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        return name.to_string();
    }
    format!("{}_{name}", prefix.to_uppercase())
}
