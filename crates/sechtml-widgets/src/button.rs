use std::sync::Arc;

use indexmap::IndexMap;
use sechtml_core::{
    Attributes, IDENTIFIER_SUFFIX_LEN, RandomSource, RenderResult, SecureHtmlRenderer,
    escape_css_identifier, escape_html, escape_raw_text, is_valid_attribute_name,
};
use serde::Deserialize;
use serde_json::Value;

use crate::attributes::{AttributeMap, data_value_to_string};

/// Attribute carrying the per-render hook id that generated tags select on.
pub const HOOK_ID_ATTRIBUTE: &str = "backend-button-widget-hook-id";

const HOOK_ID_PREFIX: &str = "buttonId";
const BASE_CLASSES: [&str; 2] = ["action-default", "scalable"];
const DISABLED: &str = "disabled";

/// Everything a button can be configured with.
///
/// Keys that are not recognized are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub label: Option<String>,
    pub class: Option<String>,
    pub disabled: bool,
    pub value: Option<String>,
    pub data_attribute: IndexMap<String, Value>,
    pub on_click: Option<String>,
    pub onclick: Option<String>,
    pub style: Option<String>,
    pub before_html: Option<String>,
    pub after_html: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ButtonConfig {
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A `<button>` element that never carries inline `onclick` or `style`
/// attributes.
///
/// Handlers and styles are rendered as separate `<script>` and `<style>` tags
/// after the element, bound to it through a random hook id that changes on
/// every render.
#[derive(Clone, Debug)]
pub struct Button {
    config: ButtonConfig,
    renderer: Arc<SecureHtmlRenderer>,
    random: Arc<dyn RandomSource>,
    hook_id: Option<String>,
    generated_html: String,
}

impl Button {
    pub fn new(
        config: ButtonConfig,
        renderer: Arc<SecureHtmlRenderer>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            config,
            renderer,
            random,
            hook_id: None,
            generated_html: String::new(),
        }
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn hook_id(&self) -> Option<&str> {
        self.hook_id.as_deref()
    }

    pub fn set_hook_id(&mut self, hook_id: impl Into<String>) {
        self.hook_id = Some(hook_id.into());
    }

    /// The `type` attribute: `reset` and `submit` are kept, anything else is
    /// a plain `button`.
    pub fn kind(&self) -> &str {
        match self.config.kind.as_deref() {
            Some(kind @ ("reset" | "submit")) => kind,
            _ => "button",
        }
    }

    pub fn on_click(&self) -> Option<&str> {
        non_empty(self.config.on_click.as_deref()).or(non_empty(self.config.onclick.as_deref()))
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.config.title.as_deref()).or(self.config.label.as_deref())
    }

    pub fn classes(&self) -> Vec<&str> {
        let mut classes = BASE_CLASSES.to_vec();
        if let Some(class) = non_empty(self.config.class.as_deref()) {
            classes.push(class);
        }
        if self.config.disabled {
            classes.push(DISABLED);
        }
        classes
    }

    pub fn attributes(&self) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        attributes.insert("id", self.config.id.clone());
        attributes.insert("name", self.config.name.clone());
        attributes.insert("title", self.title().map(str::to_owned));
        attributes.insert("type", Some(self.kind().to_string()));
        attributes.insert("class", Some(self.classes().join(" ")));
        attributes.insert("value", self.config.value.clone());
        attributes.insert(
            "disabled",
            self.config.disabled.then(|| DISABLED.to_string()),
        );
        if let Some(hook_id) = &self.hook_id {
            attributes.insert(HOOK_ID_ATTRIBUTE, Some(hook_id.clone()));
        }
        for (key, value) in &self.config.data_attribute {
            let name = format!("data-{}", key);
            if !is_valid_attribute_name(&name) {
                tracing::warn!(attribute = %name, "skipping invalid data attribute");
                continue;
            }
            attributes.insert(name, Some(data_value_to_string(value)));
        }
        attributes
    }

    pub fn attributes_html(&self) -> String {
        self.attributes().to_html()
    }

    /// Markup emitted after the element: the configured `after_html`
    /// followed by the tags generated by the last render pass.
    pub fn after_html(&self) -> String {
        let mut out = self.config.after_html.clone().unwrap_or_default();
        out.push_str(&self.generated_html);
        out
    }

    /// Prepares a render pass: assigns a fresh hook id and renders the click
    /// handler and inline style as standalone tags.
    ///
    /// On error the state of the previous pass is left untouched.
    pub fn before_to_html(&mut self) -> RenderResult<()> {
        let hook_id = format!(
            "{}{}",
            HOOK_ID_PREFIX,
            self.random.random_string(IDENTIFIER_SUFFIX_LEN)
        );

        let mut generated = String::new();
        if let Some(on_click) = self.on_click() {
            generated.push_str(&self.renderer.render_event_listener_as_tag(
                "onclick",
                on_click,
                &hook_selector(&hook_id),
            )?);
        }
        if let Some(style) = non_empty(self.config.style.as_deref()) {
            generated.push_str(&self.renderer.render_tag(
                "style",
                Attributes::new(),
                Some(&self.generate_style(style, &hook_id)),
                false,
            )?);
        }
        tracing::trace!(hook_id = %hook_id, "prepared button render");
        self.hook_id = Some(hook_id);
        self.generated_html = generated;
        Ok(())
    }

    /// Renders the complete widget.
    pub fn to_html(&mut self) -> RenderResult<String> {
        self.before_to_html()?;

        let mut out = self.config.before_html.clone().unwrap_or_default();
        out.push_str("<button ");
        out.push_str(&self.attributes_html());
        out.push_str("><span>");
        out.push_str(&escape_html(self.config.label.as_deref().unwrap_or_default()));
        out.push_str("</span></button>");
        out.push_str(&self.after_html());
        Ok(out)
    }

    // Scoped to the element id; buttons without one fall back to the hook.
    fn generate_style(&self, style: &str, hook_id: &str) -> String {
        let selector = match non_empty(self.config.id.as_deref()) {
            Some(id) => format!("#{}", escape_css_identifier(id)),
            None => hook_selector(hook_id),
        };
        escape_raw_text(&format!("{} {{\n    {}\n}}", selector, style))
    }
}

fn hook_selector(hook_id: &str) -> String {
    format!("*[{}='{}']", HOOK_ID_ATTRIBUTE, hook_id)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
