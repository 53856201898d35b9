use std::fmt;

use crate::error::RenderResult;
use crate::tag::{EventHandlerData, TagData, is_raw_text};

/// A transform applied to tags and event handlers before they are
/// serialized.
///
/// Processors run in registration order and each receives the previous
/// processor's output. They must not keep state between calls.
pub trait SecurityProcessor: fmt::Debug + Send + Sync {
    fn process_tag(&self, tag: TagData) -> RenderResult<TagData> {
        Ok(tag)
    }

    fn process_event_handler(&self, event: EventHandlerData) -> RenderResult<EventHandlerData> {
        Ok(event)
    }
}

/// Adds a CSP `nonce` to every `<script>` and `<style>` tag.
#[derive(Debug, Clone)]
pub struct NonceProcessor {
    nonce: String,
}

impl NonceProcessor {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
        }
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}

impl SecurityProcessor for NonceProcessor {
    fn process_tag(&self, tag: TagData) -> RenderResult<TagData> {
        if !is_raw_text(tag.tag_name()) || tag.attributes().contains_key("nonce") {
            return Ok(tag);
        }
        tag.with_attribute("nonce", self.nonce.as_str())
    }
}

/// Cleans markup content of non-script tags with an allow-list sanitizer.
///
/// Text content is left alone since the serializer escapes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeProcessor;

impl SecurityProcessor for SanitizeProcessor {
    fn process_tag(&self, tag: TagData) -> RenderResult<TagData> {
        if tag.is_text_content() || is_raw_text(tag.tag_name()) {
            return Ok(tag);
        }
        let cleaned = tag.content().map(ammonia::clean);
        Ok(tag.with_content(cleaned, false))
    }
}
