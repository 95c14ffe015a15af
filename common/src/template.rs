//! Placeholder substitution for text templates.
//!
//! Placeholders are written as `{name}` where `name` starts with an ASCII
//! letter or underscore. Braces that do not form a known placeholder are kept
//! verbatim, so shell snippets such as `${HOME}` or `{ print }` survive
//! rendering untouched.

/// Replaces each `{key}` in `template` with its value from `replacements`.
///
/// # Examples
///
/// ```
/// use distkit_common::template::render_template;
///
/// let rendered = render_template(
///     "Exec={exec}\nIcon=${ICON}\n",
///     &[("exec", "/opt/app/run")],
/// );
/// assert_eq!(rendered, "Exec=/opt/app/run\nIcon=${ICON}\n");
/// ```
#[must_use]
pub fn render_template(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        output.push_str(before);

        let candidate = &from_brace[1..];
        let value = candidate
            .find('}')
            .map(|close| &candidate[..close])
            .filter(|key| is_placeholder_name(key))
            .and_then(|key| lookup(replacements, key).map(|value| (key.len(), value)));

        match value {
            Some((key_len, value)) => {
                output.push_str(value);
                rest = &candidate[key_len + 1..];
            }
            None => {
                output.push('{');
                rest = candidate;
            }
        }
    }

    output.push_str(rest);
    output
}

fn is_placeholder_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn lookup<'a>(replacements: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    replacements
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}
