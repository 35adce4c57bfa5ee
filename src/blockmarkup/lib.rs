//! # Blockmarkup - Escaped HTML Rendering for Server Blocks
//!
//! A small layer over [minijinja](https://docs.rs/minijinja) for blocks that
//! render their initial markup on the server.
//!
//! ## The Problem
//!
//! Server-rendered blocks emit HTML that is later hydrated by a client runtime:
//! - Every interpolated value must be escaped, including values that end up
//!   inside attributes (JSON contexts, action paths, labels)
//! - Attribute lists supplied by the host (wrapper classes, styles) arrive as
//!   ordered name/value pairs that have to be serialized consistently
//! - Count labels need digit grouping and singular/plural phrasing
//!
//! ## The Solution
//!
//! - **Templates** define structure using Jinja2 syntax and are always
//!   auto-escaped as HTML, whatever their name
//! - **Filters** cover the recurring markup chores: `attrs`, `number`,
//!   `plural`
//! - Layout decisions stay in Rust; templates only branch on flags
//!
//! ## Quick Example
//!
//! ```rust
//! use blockmarkup::render;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Row {
//!     label: String,
//!     count: u64,
//! }
//!
//! let html = render(
//!     r#"<li>{{ label }} ({{ count|number }})</li>"#,
//!     &Row { label: "Odds & <ends>".into(), count: 1200 },
//! )
//! .unwrap();
//! assert_eq!(html, "<li>Odds &amp; &lt;ends&gt; (1,200)</li>");
//! ```
//!
//! ## Renderer for Multiple Templates
//!
//! ```rust
//! use blockmarkup::Renderer;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Wrapper {
//!     attributes: Vec<(String, String)>,
//! }
//!
//! let mut renderer = Renderer::new();
//! renderer
//!     .add_template("wrapper.html", "<div{{ attributes|attrs }}></div>")
//!     .unwrap();
//!
//! let html = renderer
//!     .render(
//!         "wrapper.html",
//!         &Wrapper { attributes: vec![("class".into(), "a b".into())] },
//!     )
//!     .unwrap();
//! assert_eq!(html, r#"<div class="a b"></div>"#);
//! ```

use minijinja::{AutoEscape, Environment, ErrorKind, HtmlEscape, UndefinedBehavior, Value};
use serde::Serialize;

pub use minijinja::Error;

/// Renders an inline template once.
///
/// The template is compiled on every call; prefer [`Renderer`] for templates
/// rendered per request.
pub fn render<T: Serialize>(template: &str, data: &T) -> Result<String, Error> {
    let mut env = Environment::new();
    configure(&mut env);

    env.add_template_owned("_inline".to_string(), template.to_string())?;
    let tmpl = env.get_template("_inline")?;
    tmpl.render(data)
}

/// A renderer with pre-registered templates.
///
/// Templates are compiled once when added and rendered by name. Rendering
/// is strict: referencing a field the data does not carry is an error rather
/// than silently producing an empty string.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        configure(&mut env);
        Self { env }
    }

    /// Registers a named template.
    ///
    /// The template is compiled immediately; errors are returned if syntax is invalid.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    /// Renders a registered template with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not found or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(data)
    }

    /// Returns true if a template with the given name is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn configure(env: &mut Environment<'static>) {
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("attrs", attrs_filter);
    env.add_filter("number", number_filter);
    env.add_filter("plural", plural_filter);
}

/// Serializes ordered `(name, value)` pairs as ` name="value"` attribute text.
///
/// Pairs with an empty value are emitted as bare boolean attributes.
pub fn format_attributes<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    let mut out = String::new();
    for (name, value) in pairs {
        out.push(' ');
        out.push_str(name.as_ref());
        if !value.as_ref().is_empty() {
            out.push_str("=\"");
            out.push_str(&HtmlEscape(value.as_ref()).to_string());
            out.push('"');
        }
    }
    out
}

/// Groups the digits of a count with commas (`1234567` → `1,234,567`).
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Picks the singular or plural phrase for `n` and substitutes `%s` with the
/// grouped count.
pub fn pluralize(n: u64, singular: &str, plural: &str) -> String {
    let phrase = if n == 1 { singular } else { plural };
    phrase.replace("%s", &group_digits(n))
}

fn attrs_filter(value: Value) -> Result<Value, Error> {
    if value.is_none() || value.is_undefined() {
        return Ok(Value::from_safe_string(String::new()));
    }

    let mut pairs = Vec::new();
    for pair in value.try_iter()? {
        let name = pair.get_item_by_index(0)?;
        let val = pair.get_item_by_index(1)?;
        let Some(name) = name.as_str() else {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                "attribute names must be strings",
            ));
        };
        let val = if val.is_none() || val.is_undefined() {
            String::new()
        } else {
            val.to_string()
        };
        pairs.push((name.to_string(), val));
    }

    Ok(Value::from_safe_string(format_attributes(&pairs)))
}

fn number_filter(value: u64) -> String {
    group_digits(value)
}

fn plural_filter(value: u64, singular: String, plural: String) -> String {
    pluralize(value, &singular, &plural)
}
