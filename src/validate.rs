//! Validation reporting with flag names.
//!
//! Rules are declared with the `validator` derive on the config struct. When
//! they fail, every violation's structural path is resolved against the flag
//! schema, so a failure on `bar.enabled` reads `--bar-enabled is required`
//! rather than naming the Rust field. Identical messages are reported once.

use std::collections::HashMap;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::ClapflagsError;
use crate::path::flag_token;
use crate::schema::{Kind, Schema, Settings};

/// Message templates keyed by rule code.
///
/// `{0}` is replaced with the field's flag token; `{name}` with the rule
/// parameter `name`. `{bounds}` is derived from `min`, `max` and `equal`.
#[derive(Debug, Clone)]
pub struct Messages {
    templates: HashMap<String, String>,
}

impl Default for Messages {
    fn default() -> Self {
        let mut messages = Self::empty();
        messages
            .insert("required", "{0} is required")
            .insert("length", "{0} length must be {bounds}")
            .insert("range", "{0} must be {bounds}")
            .insert("email", "{0} must be a valid email address")
            .insert("url", "{0} must be a valid URL")
            .insert("hostname_port", "{0} must be a valid host:port");
        messages
    }
}

impl Messages {
    /// A table without the built-in templates.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Add or replace the template for a rule code.
    pub fn insert(&mut self, code: &str, template: &str) -> &mut Self {
        self.templates.insert(code.to_string(), template.to_string());
        self
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.templates.get(code).map(String::as_str)
    }

    /// Render a violation for the given field token.
    pub fn translate(&self, violation: &Violation, field: &str) -> String {
        match (self.get(&violation.code), &violation.message) {
            (Some(template), _) => render(template, field, &violation.params),
            (None, Some(message)) => format!("{field}: {message}"),
            (None, None) => format!("{field} failed the '{}' rule", violation.code),
        }
    }
}

fn render(template: &str, field: &str, params: &[(String, String)]) -> String {
    let mut out = template.replace("{0}", field);
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Structural path from the root, e.g. `["bar", "enabled"]`.
    pub path: Vec<String>,
    pub code: String,
    pub message: Option<String>,
    pub params: Vec<(String, String)>,
}

/// Flatten `ValidationErrors` into violations, ordered by path.
pub fn violations(errors: &ValidationErrors) -> Vec<Violation> {
    let mut out = Vec::new();
    collect(errors, &mut Vec::new(), &mut out);
    out
}

fn collect(errors: &ValidationErrors, path: &mut Vec<String>, out: &mut Vec<Violation>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| **name);

    for (name, kind) in fields {
        path.push((*name).to_string());
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| violation(path, e)));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, path, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect(inner, path, out);
                }
            }
        }
        path.pop();
    }
}

fn violation(path: &[String], error: &ValidationError) -> Violation {
    let mut params: Vec<(String, String)> = error
        .params
        .iter()
        .map(|(name, value)| {
            let text = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            (name.to_string(), text)
        })
        .collect();
    params.sort();

    if let Some(bounds) = bounds(&params) {
        params.push(("bounds".to_string(), bounds));
    }

    Violation {
        path: path.to_vec(),
        code: error.code.to_string(),
        message: error.message.as_ref().map(|m| m.to_string()),
        params,
    }
}

fn bounds(params: &[(String, String)]) -> Option<String> {
    let param = |name: &str| {
        params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    };
    match (param("equal"), param("min"), param("max")) {
        (Some(equal), _, _) => Some(format!("exactly {equal}")),
        (None, Some(min), Some(max)) => Some(format!("between {min} and {max}")),
        (None, Some(min), None) => Some(format!("at least {min}")),
        (None, None, Some(max)) => Some(format!("at most {max}")),
        (None, None, None) => None,
    }
}

/// Turn validation errors into one error listing every distinct message, in
/// schema declaration order.
///
/// Violations on excluded fields are named by their dotted path, since they
/// have no flag.
pub fn report(
    schema: &Schema,
    errors: &ValidationErrors,
    messages: &Messages,
) -> Result<(), ClapflagsError> {
    let mut lines: Vec<String> = Vec::new();
    let mut violations = violations(errors);
    violations.sort_by_cached_key(|v| declaration_order(schema, &v.path));

    for violation in violations {
        let path: Vec<&str> = violation.path.iter().map(String::as_str).collect();
        let field = match flag_token(schema, &path) {
            Ok(token) => token,
            Err(ClapflagsError::ExcludedField(dotted)) => dotted,
            Err(e) => return Err(e),
        };

        let line = format!("  {}", messages.translate(&violation, &field));
        if !lines.contains(&line) {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        return Ok(());
    }
    Err(ClapflagsError::Validation(lines))
}

/// Field indexes along `path`, so violations follow the order flags are
/// registered in. Segments the schema does not know sort last.
fn declaration_order(schema: &Schema, path: &[String]) -> Vec<usize> {
    let mut order = Vec::with_capacity(path.len());
    let mut current = Some(schema);
    for segment in path {
        let index = current.and_then(|s| s.position(segment));
        current = match (current, index) {
            (Some(s), Some(i)) => match s.fields[i].kind {
                Kind::Nested(nested) => Some(nested),
                _ => None,
            },
            _ => None,
        };
        order.push(index.unwrap_or(usize::MAX));
    }
    order
}

/// Run the config's rules and report failures by flag name.
pub fn validate<C: Settings>(config: &C) -> Result<(), ClapflagsError> {
    let mut messages = Messages::default();
    config.pre_validate(&mut messages);

    match Validate::validate(config) {
        Ok(()) => Ok(()),
        Err(errors) => report(C::SCHEMA, &errors, &messages),
    }
}

/// Rule for `host:port` strings.
///
/// The port must be a number in `1..=65535`. The host may be empty; otherwise
/// it must be an RFC 1123 hostname.
pub fn hostname_port(value: &str) -> Result<(), ValidationError> {
    let invalid = || Err(ValidationError::new("hostname_port"));

    let Some((host, port)) = value.rsplit_once(':') else {
        return invalid();
    };
    if !matches!(port.parse::<u16>(), Ok(p) if p >= 1) {
        return invalid();
    }
    if !host.is_empty() && !is_hostname(host) {
        return invalid();
    }
    Ok(())
}

fn is_hostname(host: &str) -> bool {
    host.split('.').all(|label| {
        let mut chars = label.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        label.len() <= 63
            && first.is_ascii_alphanumeric()
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
