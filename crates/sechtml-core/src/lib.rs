//! Security-aware HTML rendering.
//!
//! [`SecureHtmlRenderer`] renders tags and event handlers through an ordered
//! chain of [`SecurityProcessor`]s, and can turn an inline event handler into
//! a standalone `<script>` tag so that pages work under a strict
//! Content-Security-Policy.

mod config;
mod error;
mod escape;
mod processor;
mod random;
mod renderer;
mod tag;

pub use config::{ProcessorConfig, RendererConfig};
pub use error::{RenderError, RenderResult};
pub use escape::{escape_css_identifier, escape_html, escape_html_attr, escape_raw_text};
pub use processor::{NonceProcessor, SanitizeProcessor, SecurityProcessor};
pub use random::{IDENTIFIER_SUFFIX_LEN, OsRandom, RandomSource};
pub use renderer::{HtmlRenderer, SecureHtmlRenderer};
pub use tag::{
    Attributes, EventHandlerData, TagData, is_raw_text, is_valid_attribute_name,
    is_valid_tag_name, is_void,
};
