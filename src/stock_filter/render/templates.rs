//! Markup templates, kept as standalone files and included as string constants.
//!
//! All templates are rendered through `blockmarkup`, which auto-escapes every
//! interpolation. Values that are already markup (the host's inner blocks, a
//! nested template's output) go through `|safe`.
//!
//! Structure lives in the templates; which rows exist, which are checked and
//! how labels read is decided in Rust and handed over as flat data.

pub const BLOCK_TEMPLATE: &str = include_str!("templates/block.html");
pub const LIST_TEMPLATE: &str = include_str!("templates/list.html");
pub const DROPDOWN_TEMPLATE: &str = include_str!("templates/dropdown.html");
pub const PREVIEW_TEMPLATE: &str = include_str!("templates/preview.html");

pub(crate) const BLOCK: &str = "block.html";
pub(crate) const LIST: &str = "list.html";
pub(crate) const DROPDOWN: &str = "dropdown.html";
pub(crate) const PREVIEW: &str = "preview.html";

/// A renderer with every block template registered.
pub(crate) fn renderer() -> Result<blockmarkup::Renderer, blockmarkup::Error> {
    let mut renderer = blockmarkup::Renderer::new();
    renderer.add_template(BLOCK, BLOCK_TEMPLATE)?;
    renderer.add_template(LIST, LIST_TEMPLATE)?;
    renderer.add_template(DROPDOWN, DROPDOWN_TEMPLATE)?;
    renderer.add_template(PREVIEW, PREVIEW_TEMPLATE)?;
    Ok(renderer)
}
