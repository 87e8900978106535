//! Identifier and file naming for generated TypeScript

use apity_common::{HttpMethod, RouteMethodEntry};

/// Whether `name` can be used unquoted as a TypeScript identifier or key
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Replace characters that are not valid in an identifier with `_`
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if ident.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Exported validator name for a component schema (`User` → `UserSchema`)
pub fn schema_ident(name: &str) -> String {
    format!("{}Schema", sanitize_identifier(name))
}

/// Endpoint constant name: `{METHOD}_{path}[_{params}]`
///
/// The path has its `[param]` segments and slashes removed. Parameter
/// names come from the declared path parameters, or from the path
/// template when none are declared. Distinct routes can map to the same
/// name; no attempt is made to disambiguate them.
pub fn endpoint_name(path: &str, entry: &RouteMethodEntry) -> String {
    let mut params: Vec<&str> = entry.path_param_names().collect();
    if params.is_empty() {
        params = template_params(path);
    }
    build_endpoint_name(entry.method, path, &params)
}

fn build_endpoint_name(method: HttpMethod, path: &str, params: &[&str]) -> String {
    let stripped: String = strip_params(path).chars().filter(|c| *c != '/').collect();

    let mut name = format!("{}_{}", method.as_str(), stripped);
    if !params.is_empty() {
        name.push('_');
        name.push_str(&params.join("_"));
    }
    sanitize_identifier(&name)
}

/// Remove every `[...]` segment from a normalized path
fn strip_params(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Names inside `[...]` segments, in path order
fn template_params(path: &str) -> Vec<&str> {
    path.split('[')
        .skip(1)
        .filter_map(|rest| rest.split_once(']').map(|(name, _)| name))
        .collect()
}

/// Route file stem in file-based output (`/users/[id]` → `users._id_`)
pub fn route_file_stem(path: &str) -> String {
    let stem: String = path
        .trim_start_matches('/')
        .chars()
        .map(|c| match c {
            '/' => '.',
            '[' | ']' => '_',
            other => other,
        })
        .collect();

    if stem.is_empty() {
        "index".to_string()
    } else {
        stem
    }
}

/// Escape text for a single-quoted TypeScript string literal
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '`' => out.push_str("\\`"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Object key, quoted when it is not a plain identifier
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", escape_string(name))
    }
}
