//! Named-placeholder SQL templates.
//!
//! A template holds tokens of the form `%name%`. [`QueryTemplate::render`]
//! replaces each token that has a value with that value's text and leaves
//! everything else untouched. Only identifiers (table names) go through
//! here; literal values are bound as statement parameters by the writer.

use std::collections::HashMap;
use std::fmt::Display;

/// An immutable template plus the values to substitute into it.
///
/// Build a fresh one per query:
///
/// ```
/// use owidfetch::query::QueryTemplate;
///
/// let sql = QueryTemplate::new("insert into %t% values ('%v%')")
///     .with_value("t", "foo")
///     .with_value("v", "bar")
///     .render();
/// assert_eq!(sql, "insert into foo values ('bar')");
/// ```
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    template: String,
    values: HashMap<String, String>,
}

impl QueryTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            values: HashMap::new(),
        }
    }

    /// Set the value substituted for `%name%`
    pub fn with_value(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Set several values at once
    pub fn with_values<K, V, I>(self, values: I) -> Self
    where
        K: Into<String>,
        V: Display,
        I: IntoIterator<Item = (K, V)>,
    {
        values
            .into_iter()
            .fold(self, |qt, (name, value)| qt.with_value(name, value))
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template.
    ///
    /// The template is scanned once from left to right, so substituted text
    /// is never scanned again and the result does not depend on the order
    /// in which values were set.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('%') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let token = after
                .find('%')
                .map(|end| &after[..end])
                .and_then(|name| self.values.get(name).map(|v| (name, v)));

            match token {
                Some((name, value)) => {
                    out.push_str(value);
                    rest = &after[name.len() + 1..];
                }
                None => {
                    out.push('%');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}
