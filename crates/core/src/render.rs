//! Block render dispatch.
//!
//! The renderer never sees the database: it takes a sequence of
//! [`BlockView`]s (already filtered to active blocks, already sorted) and
//! dispatches on the block tag through a [`BlockRegistry`]. Tags without a
//! registered renderer produce a visible placeholder fragment instead of
//! failing the page, since tags are stored as free-form strings and a newer
//! editor may have written kinds this build does not know.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::block::BlockKind;
use crate::types::DbId;

/// A block as seen by the renderer.
#[derive(Debug, Clone)]
pub struct BlockView {
    pub id: DbId,
    pub kind: BlockKind,
    pub data: Value,
    pub styles: Option<Value>,
}

/// Rendering mode. In edit mode every fragment is wrapped with the block id
/// so inline-edit affordances can address a partial update to that block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Public,
    Edit,
}

/// Output of rendering one block.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedBlock {
    pub block_id: DbId,
    pub kind: String,
    pub html: String,
    /// False when the tag had no registered renderer and the placeholder
    /// fragment was emitted instead.
    pub supported: bool,
}

/// Renders one kind of block into an HTML fragment.
pub trait BlockRenderer: Send + Sync {
    fn render(&self, block: &BlockView) -> String;
}

// Closure-backed renderer so simple kinds don't each need a named type.
impl<F> BlockRenderer for F
where
    F: Fn(&BlockView) -> String + Send + Sync,
{
    fn render(&self, block: &BlockView) -> String {
        self(block)
    }
}

/* --------------------------------------------------------------------------
   Registry
   -------------------------------------------------------------------------- */

/// Maps block tags to renderers.
///
/// Extension point for new kinds: register a renderer under the new tag and
/// existing pages pick it up without a schema change.
pub struct BlockRegistry {
    renderers: HashMap<String, Box<dyn BlockRenderer>>,
}

impl BlockRegistry {
    /// An empty registry with no renderers.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register (or replace) the renderer for a tag.
    pub fn register<R: BlockRenderer + 'static>(&mut self, tag: &str, renderer: R) {
        self.renderers.insert(tag.to_string(), Box::new(renderer));
    }

    /// Whether a renderer is registered for the tag.
    pub fn supports(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    /// Render a single block, falling back to the unsupported placeholder.
    pub fn render_block(&self, block: &BlockView, mode: RenderMode) -> RenderedBlock {
        let (html, supported) = match self.renderers.get(block.kind.as_str()) {
            Some(renderer) => (renderer.render(block), true),
            None => (unsupported_placeholder(block), false),
        };
        let html = match mode {
            RenderMode::Public => html,
            RenderMode::Edit => format!(
                "<div class=\"block-editable\" data-block-id=\"{}\" data-block-kind=\"{}\">{html}</div>",
                block.id,
                escape_html(block.kind.as_str())
            ),
        };
        RenderedBlock {
            block_id: block.id,
            kind: block.kind.as_str().to_string(),
            html,
            supported,
        }
    }

    /// Render an ordered sequence of active blocks.
    ///
    /// The caller supplies blocks already sorted ascending by their order;
    /// each is rendered independently so one bad block cannot take down the
    /// page.
    pub fn render_page(&self, blocks: &[BlockView], mode: RenderMode) -> Vec<RenderedBlock> {
        blocks.iter().map(|b| self.render_block(b, mode)).collect()
    }
}

impl Default for BlockRegistry {
    /// A registry with renderers for every known kind.
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register("hero", render_hero);
        reg.register("features", render_features);
        reg.register("testimonial", render_testimonial);
        reg.register("pricing", render_pricing);
        reg.register("contact", render_contact);
        reg.register("text", render_text);
        reg.register("image", render_image);
        reg.register("video", render_video);
        reg.register("button", render_button);
        reg.register("form", render_form);
        reg.register("custom", render_custom);
        reg
    }
}

/* --------------------------------------------------------------------------
   Built-in renderers
   -------------------------------------------------------------------------- */

fn unsupported_placeholder(block: &BlockView) -> String {
    format!(
        "<div class=\"block-unsupported\" data-unsupported-kind=\"{}\">Unsupported block type</div>",
        escape_html(block.kind.as_str())
    )
}

/// Read a string field from the payload, empty string if absent.
fn text_field<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or("")
}

fn render_hero(block: &BlockView) -> String {
    let title = escape_html(text_field(&block.data, "title"));
    let subtitle = escape_html(text_field(&block.data, "subtitle"));
    let image = escape_html(text_field(&block.data, "image"));
    let mut out = format!("<section class=\"hero\"><h1>{title}</h1>");
    if !subtitle.is_empty() {
        out.push_str(&format!("<p>{subtitle}</p>"));
    }
    if !image.is_empty() {
        out.push_str(&format!("<img src=\"{image}\" alt=\"\">"));
    }
    out.push_str("</section>");
    out
}

fn render_features(block: &BlockView) -> String {
    let items = block
        .data
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut out = String::from("<section class=\"features\"><ul>");
    for item in &items {
        let title = escape_html(text_field(item, "title"));
        let text = escape_html(text_field(item, "text"));
        out.push_str(&format!("<li><strong>{title}</strong> {text}</li>"));
    }
    out.push_str("</ul></section>");
    out
}

fn render_testimonial(block: &BlockView) -> String {
    let quote = escape_html(text_field(&block.data, "quote"));
    let author = escape_html(text_field(&block.data, "author"));
    format!(
        "<blockquote class=\"testimonial\"><p>{quote}</p><cite>{author}</cite></blockquote>"
    )
}

fn render_pricing(block: &BlockView) -> String {
    let plans = block
        .data
        .get("plans")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut out = String::from("<section class=\"pricing\">");
    for plan in &plans {
        let name = escape_html(text_field(plan, "name"));
        let price = escape_html(text_field(plan, "price"));
        out.push_str(&format!(
            "<div class=\"plan\"><h3>{name}</h3><span class=\"price\">{price}</span></div>"
        ));
    }
    out.push_str("</section>");
    out
}

fn render_contact(block: &BlockView) -> String {
    let heading = escape_html(text_field(&block.data, "heading"));
    format!("<section class=\"contact\"><h2>{heading}</h2></section>")
}

fn render_text(block: &BlockView) -> String {
    let body = escape_html(text_field(&block.data, "text"));
    format!("<div class=\"text-block\"><p>{body}</p></div>")
}

fn render_image(block: &BlockView) -> String {
    let src = escape_html(text_field(&block.data, "src"));
    let alt = escape_html(text_field(&block.data, "alt"));
    format!("<figure class=\"image-block\"><img src=\"{src}\" alt=\"{alt}\"></figure>")
}

fn render_video(block: &BlockView) -> String {
    let src = escape_html(text_field(&block.data, "src"));
    format!("<div class=\"video-block\"><video src=\"{src}\" controls></video></div>")
}

fn render_button(block: &BlockView) -> String {
    let label = escape_html(text_field(&block.data, "label"));
    let href = escape_html(text_field(&block.data, "href"));
    format!("<a class=\"button-block\" href=\"{href}\">{label}</a>")
}

fn render_form(block: &BlockView) -> String {
    let form_kind = escape_html(text_field(&block.data, "form"));
    format!("<div class=\"form-block\" data-form=\"{form_kind}\"></div>")
}

fn render_custom(block: &BlockView) -> String {
    // Custom blocks carry pre-sanitized HTML produced by the admin editor.
    text_field(&block.data, "html").to_string()
}

/// Minimal HTML entity escaping for text interpolated into fragments.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
