use std::sync::Arc;

use crate::error::{RenderError, RenderResult};
use crate::escape::{escape_html, escape_html_attr, escape_raw_text};
use crate::processor::SecurityProcessor;
use crate::random::{IDENTIFIER_SUFFIX_LEN, RandomSource};
use crate::tag::{Attributes, EventHandlerData, TagData, is_void};

/// Serializes tag and event handler data as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn render_tag(&self, tag: &TagData) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(tag.tag_name());
        for (name, value) in tag.attributes() {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html_attr(value));
            out.push('"');
        }
        out.push('>');

        if is_void(tag.tag_name()) {
            if tag.content().is_some_and(|content| !content.is_empty()) {
                tracing::warn!(tag = tag.tag_name(), "dropping content of void element");
            }
            return out;
        }

        if let Some(content) = tag.content() {
            if tag.is_text_content() {
                out.push_str(&escape_html(content));
            } else {
                out.push_str(content);
            }
        }
        out.push_str("</");
        out.push_str(tag.tag_name());
        out.push('>');
        out
    }

    pub fn render_event_handler(&self, event: &EventHandlerData) -> String {
        format!(
            "{}=\"{}\"",
            event.event_name(),
            escape_html_attr(event.javascript())
        )
    }
}

/// Renders tags and event handlers through a chain of security processors.
#[derive(Debug, Clone)]
pub struct SecureHtmlRenderer {
    renderer: HtmlRenderer,
    random: Arc<dyn RandomSource>,
    processors: Vec<Arc<dyn SecurityProcessor>>,
}

impl SecureHtmlRenderer {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self {
            renderer: HtmlRenderer,
            random,
            processors: Vec::new(),
        }
    }

    /// Appends a processor to the end of the chain.
    pub fn with_processor(mut self, processor: impl SecurityProcessor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    pub fn with_processors(mut self, processors: Vec<Arc<dyn SecurityProcessor>>) -> Self {
        self.processors.extend(processors);
        self
    }

    pub fn processors(&self) -> &[Arc<dyn SecurityProcessor>] {
        &self.processors
    }

    /// Renders a tag, letting every processor rewrite it first.
    ///
    /// Attribute values must not be escaped by the caller. `text_content`
    /// selects whether `content` is escaped text or trusted markup.
    pub fn render_tag(
        &self,
        tag_name: &str,
        attributes: Attributes,
        content: Option<&str>,
        text_content: bool,
    ) -> RenderResult<String> {
        let mut tag = TagData::new(
            tag_name,
            attributes,
            content.map(str::to_owned),
            text_content,
        )?;
        for processor in &self.processors {
            tag = processor.process_tag(tag)?;
        }
        tracing::trace!(tag = tag.tag_name(), "rendering tag");
        Ok(self.renderer.render_tag(&tag))
    }

    /// Renders an event handler as an HTML attribute such as `onclick="..."`.
    pub fn render_event_listener(&self, event_name: &str, javascript: &str) -> RenderResult<String> {
        let mut event = EventHandlerData::new(event_name, javascript)?;
        for processor in &self.processors {
            event = processor.process_event_handler(event)?;
        }
        tracing::trace!(event = event.event_name(), "rendering event handler");
        Ok(self.renderer.render_event_handler(&event))
    }

    /// Renders what would have been an inline event handler attribute as a
    /// separate `<script>` tag.
    ///
    /// `event_name` is the attribute name (`onclick`), `element_selector` a
    /// CSS selector for the element the handler belongs to. The selector is
    /// inserted into the script verbatim and must not come from user input.
    /// Any `</` in the body is written as `<\/` so the handler cannot end the
    /// script element.
    pub fn render_event_listener_as_tag(
        &self,
        event_name: &str,
        attribute_javascript: &str,
        element_selector: &str,
    ) -> RenderResult<String> {
        let event: String = event_name.chars().skip(2).collect::<String>().to_lowercase();
        if !is_valid_dom_event(&event) {
            return Err(RenderError::InvalidEventName {
                event: event_name.to_string(),
            });
        }
        let listener_function = format!(
            "eventListener{}",
            self.random.random_string(IDENTIFIER_SUFFIX_LEN)
        );
        let element_name = format!(
            "listenedElement{}",
            self.random.random_string(IDENTIFIER_SUFFIX_LEN)
        );

        let script = [
            format!("function {} () {{", listener_function),
            format!("    {};", attribute_javascript),
            "}".to_string(),
            format!(
                "let {} = document.querySelector(\"{}\");",
                element_name, element_selector
            ),
            format!("if ({}) {{", element_name),
            format!(
                "    {}.addEventListener(\"{}\", (event) => {}.apply(event.target));",
                element_name, event, listener_function
            ),
            "}".to_string(),
        ]
        .join("\n");
        let script = escape_raw_text(&script);

        let attributes = Attributes::from([("type".to_string(), "text/javascript".to_string())]);
        self.render_tag("script", attributes, Some(&script), false)
    }
}

// The event name lands in a JavaScript string literal.
fn is_valid_dom_event(event: &str) -> bool {
    !event.is_empty()
        && event
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':'))
}
