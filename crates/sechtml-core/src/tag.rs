use indexmap::IndexMap;

use crate::error::{RenderError, RenderResult};

/// Ordered attribute map; insertion order is serialization order.
pub type Attributes = IndexMap<String, String>;

/// A tag about to be rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagData {
    tag_name: String,
    attributes: Attributes,
    content: Option<String>,
    is_text_content: bool,
}

impl TagData {
    pub fn new(
        tag_name: impl Into<String>,
        attributes: Attributes,
        content: Option<String>,
        is_text_content: bool,
    ) -> RenderResult<Self> {
        let tag_name = tag_name.into();
        if !is_valid_tag_name(&tag_name) {
            return Err(RenderError::InvalidTagName { tag: tag_name });
        }
        if let Some(name) = attributes.keys().find(|name| !is_valid_attribute_name(name)) {
            return Err(RenderError::InvalidAttributeName { name: name.clone() });
        }
        Ok(Self {
            tag_name,
            attributes,
            content,
            is_text_content,
        })
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether `content` is plain text that must be escaped, as opposed to
    /// trusted markup or a raw script/style body.
    pub fn is_text_content(&self) -> bool {
        self.is_text_content
    }

    /// Returns a copy with `name` set to `value`, replacing any previous value
    /// in place.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RenderResult<Self> {
        let name = name.into();
        if !is_valid_attribute_name(&name) {
            return Err(RenderError::InvalidAttributeName { name });
        }
        self.attributes.insert(name, value.into());
        Ok(self)
    }

    pub fn without_attribute(mut self, name: &str) -> Self {
        self.attributes.shift_remove(name);
        self
    }

    pub fn with_content(mut self, content: Option<String>, is_text_content: bool) -> Self {
        self.content = content;
        self.is_text_content = is_text_content;
        self
    }
}

/// An inline event handler such as `onclick="..."`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventHandlerData {
    event_name: String,
    javascript: String,
}

impl EventHandlerData {
    pub fn new(event_name: impl Into<String>, javascript: impl Into<String>) -> RenderResult<Self> {
        let event_name = event_name.into();
        if !is_valid_attribute_name(&event_name) {
            return Err(RenderError::InvalidEventName { event: event_name });
        }
        Ok(Self {
            event_name,
            javascript: javascript.into(),
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn javascript(&self) -> &str {
        &self.javascript
    }

    pub fn with_javascript(mut self, javascript: impl Into<String>) -> Self {
        self.javascript = javascript.into();
        self
    }
}

pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        }
        _ => false,
    }
}

// See <https://html.spec.whatwg.org/multipage/syntax.html#attributes-2>
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|ch| {
            !ch.is_whitespace()
                && !ch.is_control()
                && !matches!(ch, '"' | '\'' | '>' | '/' | '=' | '<')
        })
}

/// Elements that never have content or an end tag.
pub fn is_void(tag_name: &str) -> bool {
    matches!(
        tag_name.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is raw text (script bodies, stylesheets).
pub fn is_raw_text(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("script") || tag_name.eq_ignore_ascii_case("style")
}
