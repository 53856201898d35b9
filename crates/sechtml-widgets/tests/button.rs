use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use sechtml_core::{
    NonceProcessor, OsRandom, RandomSource, RenderError, RenderResult, SecureHtmlRenderer,
    SecurityProcessor, TagData,
};
use sechtml_widgets::{Button, ButtonConfig, HOOK_ID_ATTRIBUTE};
use serde_json::json;

#[derive(Debug, Default)]
struct SequenceRandom {
    calls: AtomicUsize,
}

impl RandomSource for SequenceRandom {
    fn random_string(&self, length: usize) -> String {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let ch = char::from(b'a' + (call % 26) as u8);
        std::iter::repeat_n(ch, length).collect()
    }
}

/// Rejects `<style>` tags once the shared switch is turned on.
#[derive(Debug)]
struct RejectStyles(Arc<AtomicBool>);

impl SecurityProcessor for RejectStyles {
    fn process_tag(&self, tag: TagData) -> RenderResult<TagData> {
        if tag.tag_name() == "style" && self.0.load(Ordering::SeqCst) {
            return Err(RenderError::InvalidTagName {
                tag: tag.tag_name().to_string(),
            });
        }
        Ok(tag)
    }
}

fn button_with(config: ButtonConfig, random: Arc<dyn RandomSource>) -> Button {
    let renderer = Arc::new(SecureHtmlRenderer::new(Arc::clone(&random)));
    Button::new(config, renderer, random)
}

fn button(config: ButtonConfig) -> Button {
    button_with(config, Arc::new(SequenceRandom::default()))
}

fn run(ch: char) -> String {
    std::iter::repeat_n(ch, 32).collect()
}

// Replaces the random part of generated identifiers so renders can be compared.
fn mask_identifiers(html: &str) -> String {
    let mut out = html.to_string();
    for prefix in ["buttonId", "eventListener", "listenedElement"] {
        let mut masked = String::new();
        let mut rest = out.as_str();
        while let Some(pos) = rest.find(prefix) {
            let start = pos + prefix.len();
            masked.push_str(&rest[..start]);
            let suffix_len = rest[start..]
                .chars()
                .take_while(|ch| ch.is_ascii_alphanumeric())
                .count();
            masked.push_str("<random>");
            rest = &rest[start + suffix_len..];
        }
        masked.push_str(rest);
        out = masked;
    }
    out
}

#[test]
fn type_defaults_to_button() {
    for (kind, expected) in [
        (None, "button"),
        (Some("submit"), "submit"),
        (Some("reset"), "reset"),
        (Some("Submit"), "button"),
        (Some("image"), "button"),
        (Some(""), "button"),
    ] {
        let button = button(ButtonConfig {
            kind: kind.map(str::to_owned),
            ..Default::default()
        });
        assert_eq!(button.kind(), expected, "type {:?}", kind);
    }
}

#[test]
fn on_click_prefers_primary_field_then_alias() {
    let both = button(ButtonConfig {
        on_click: Some("a()".into()),
        onclick: Some("b()".into()),
        ..Default::default()
    });
    assert_eq!(both.on_click(), Some("a()"));

    let alias = button(ButtonConfig {
        on_click: Some(String::new()),
        onclick: Some("b()".into()),
        ..Default::default()
    });
    assert_eq!(alias.on_click(), Some("b()"));

    let neither = button(ButtonConfig::default());
    assert_eq!(neither.on_click(), None);
}

#[test]
fn attributes_keep_fixed_order_and_skip_empty_values() {
    let button = button(ButtonConfig {
        id: Some("save".into()),
        name: Some("save_btn".into()),
        label: Some("Save".into()),
        class: Some("primary".into()),
        value: Some(String::new()),
        ..Default::default()
    });
    let attributes = button.attributes();
    let names: Vec<&str> = attributes.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["id", "name", "title", "type", "class", "value", "disabled"]
    );
    assert_eq!(
        button.attributes_html(),
        "id=\"save\" name=\"save_btn\" title=\"Save\" type=\"button\" class=\"action-default scalable primary\""
    );
}

#[test]
fn title_overrides_label() {
    let button = button(ButtonConfig {
        title: Some("Save the order".into()),
        label: Some("Save".into()),
        ..Default::default()
    });
    assert_eq!(
        button.attributes_html(),
        "title=\"Save the order\" type=\"button\" class=\"action-default scalable\""
    );
}

#[test]
fn disabled_sets_attribute_and_class() {
    let button = button(ButtonConfig {
        disabled: true,
        ..Default::default()
    });
    let html = button.attributes_html();
    assert!(html.contains("disabled=\"disabled\""), "{}", html);
    assert!(button.classes().contains(&"disabled"));
    assert!(html.contains("class=\"action-default scalable disabled\""), "{}", html);
}

#[test]
fn hook_id_attribute_only_after_it_is_set() {
    let mut button = button(ButtonConfig::default());
    assert!(!button.attributes().contains(HOOK_ID_ATTRIBUTE));

    button.set_hook_id("fixed");
    assert_eq!(button.attributes().get(HOOK_ID_ATTRIBUTE), Some("fixed"));
}

#[test]
fn data_attributes_pass_scalars_and_encode_the_rest() {
    let mut data = IndexMap::new();
    data.insert("role".to_string(), json!("save"));
    data.insert("count".to_string(), json!(3));
    data.insert("ratio".to_string(), json!(0.5));
    data.insert("on".to_string(), json!(true));
    data.insert("off".to_string(), json!(false));
    data.insert("mage-init".to_string(), json!({"button": {"event": "save"}}));
    data.insert("list".to_string(), json!([1, 2]));
    data.insert("bad key".to_string(), json!("x"));
    let button = button(ButtonConfig {
        data_attribute: data,
        ..Default::default()
    });

    let attributes = button.attributes();
    assert_eq!(attributes.get("data-role"), Some("save"));
    assert_eq!(attributes.get("data-count"), Some("3"));
    assert_eq!(attributes.get("data-ratio"), Some("0.5"));
    assert_eq!(attributes.get("data-on"), Some("1"));
    assert_eq!(attributes.get("data-mage-init"), Some("{\"button\":{\"event\":\"save\"}}"));
    assert_eq!(attributes.get("data-list"), Some("[1,2]"));
    assert!(!attributes.contains("data-bad key"));

    let html = button.attributes_html();
    assert!(!html.contains("data-off"), "{}", html);
    assert!(
        html.contains("data-mage-init=\"{&quot;button&quot;:{&quot;event&quot;:&quot;save&quot;}}\""),
        "{}",
        html
    );
}

#[test]
fn renders_click_handler_and_style_as_tags() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button(ButtonConfig {
        id: Some("save".into()),
        name: Some("save_btn".into()),
        label: Some("Save".into()),
        value: Some("1".into()),
        on_click: Some("save();".into()),
        style: Some("color:red".into()),
        ..Default::default()
    });
    let html = button.to_html()?;

    let hook = format!("buttonId{}", run('a'));
    let listener = format!("eventListener{}", run('b'));
    let element = format!("listenedElement{}", run('c'));
    let expected = format!(
        concat!(
            "<button id=\"save\" name=\"save_btn\" title=\"Save\" type=\"button\" ",
            "class=\"action-default scalable\" value=\"1\" backend-button-widget-hook-id=\"{hook}\">",
            "<span>Save</span></button>",
            "<script type=\"text/javascript\">function {f} () {{\n    save();;\n}}\n",
            "let {e} = document.querySelector(\"*[backend-button-widget-hook-id='{hook}']\");\n",
            "if ({e}) {{\n    {e}.addEventListener(\"click\", (event) => {f}.apply(event.target));\n}}</script>",
            "<style>#save {{\n    color:red\n}}</style>"
        ),
        hook = hook,
        f = listener,
        e = element
    );
    assert_eq!(html, expected);
    assert_eq!(button.hook_id(), Some(hook.as_str()));
    Ok(())
}

#[test]
fn style_selector_escapes_element_id() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button(ButtonConfig {
        id: Some("save.and:continue".into()),
        style: Some("color:red".into()),
        ..Default::default()
    });
    let html = button.to_html()?;
    assert!(html.starts_with("<button id=\"save.and:continue\""), "{}", html);
    assert!(
        html.ends_with("<style>#save\\.and\\:continue {\n    color:red\n}</style>"),
        "{}",
        html
    );
    Ok(())
}

#[test]
fn generated_tags_cannot_be_closed_from_inside() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button(ButtonConfig {
        id: Some("b".into()),
        on_click: Some("alert('</script><img src=x onerror=evil()>')".into()),
        style: Some("color:red}</style><script>evil()</script><style>".into()),
        ..Default::default()
    });
    let html = button.to_html()?;
    let element_end = html.find("</button>").ok_or("missing button")?;
    let trailing = &html[element_end..];

    assert_eq!(trailing.matches("</script").count(), 1, "{}", trailing);
    assert_eq!(trailing.matches("</style").count(), 1, "{}", trailing);
    assert_eq!(trailing.matches("<img").count(), 1, "{}", trailing);
    assert!(trailing.contains("alert('<\\/script><img"), "{}", trailing);
    assert!(
        trailing.ends_with("color:red}<\\/style><script>evil()<\\/script><style>\n}</style>"),
        "{}",
        trailing
    );
    Ok(())
}

#[test]
fn failed_render_keeps_previous_hook_and_tags() -> Result<(), Box<dyn std::error::Error>> {
    let reject = Arc::new(AtomicBool::new(false));
    let random: Arc<dyn RandomSource> = Arc::new(SequenceRandom::default());
    let renderer = Arc::new(
        SecureHtmlRenderer::new(Arc::clone(&random))
            .with_processor(RejectStyles(Arc::clone(&reject))),
    );
    let mut button = Button::new(
        ButtonConfig {
            on_click: Some("go()".into()),
            style: Some("color:red".into()),
            ..Default::default()
        },
        renderer,
        random,
    );

    button.to_html()?;
    let hook = button.hook_id().ok_or("missing hook id")?.to_string();
    let after = button.after_html();
    assert!(after.contains(&hook), "{}", after);

    reject.store(true, Ordering::SeqCst);
    let result = button.to_html();
    assert!(matches!(result, Err(RenderError::InvalidTagName { .. })));
    assert_eq!(button.hook_id(), Some(hook.as_str()));
    assert_eq!(button.after_html(), after);
    assert_eq!(
        button.attributes().get(HOOK_ID_ATTRIBUTE),
        Some(hook.as_str())
    );
    Ok(())
}

#[test]
fn first_render_failure_leaves_no_hook() {
    let random: Arc<dyn RandomSource> = Arc::new(SequenceRandom::default());
    let renderer = Arc::new(
        SecureHtmlRenderer::new(Arc::clone(&random))
            .with_processor(RejectStyles(Arc::new(AtomicBool::new(true)))),
    );
    let mut button = Button::new(
        ButtonConfig {
            style: Some("color:red".into()),
            ..Default::default()
        },
        renderer,
        random,
    );
    assert!(button.to_html().is_err());
    assert_eq!(button.hook_id(), None);
    assert!(!button.attributes().contains(HOOK_ID_ATTRIBUTE));
    assert_eq!(button.after_html(), "");
}

#[test]
fn element_never_carries_inline_handler_or_style() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button(ButtonConfig {
        id: Some("b".into()),
        onclick: Some("go()".into()),
        style: Some("display:none".into()),
        ..Default::default()
    });
    let html = button.to_html()?;
    let element_end = html.find("</button>").ok_or("missing button")?;
    let element = &html[..element_end];
    assert!(!element.contains("onclick="), "{}", element);
    assert!(!element.contains("style="), "{}", element);

    let trailing = &html[element_end..];
    let hook = button.hook_id().ok_or("missing hook id")?;
    assert!(trailing.contains(&format!(
        "document.querySelector(\"*[{}='{}']\")",
        HOOK_ID_ATTRIBUTE, hook
    )));
    assert!(trailing.contains("<style>#b {"));
    Ok(())
}

#[test]
fn style_without_id_is_scoped_to_hook() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button(ButtonConfig {
        style: Some("color:red".into()),
        ..Default::default()
    });
    let html = button.to_html()?;
    assert!(html.ends_with(&format!(
        "<style>*[{}='buttonId{}'] {{\n    color:red\n}}</style>",
        HOOK_ID_ATTRIBUTE,
        run('a')
    )));
    Ok(())
}

#[test]
fn plain_button_generates_no_tags() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button(ButtonConfig {
        label: Some("<Back>".into()),
        before_html: Some("<div>".into()),
        after_html: Some("</div>".into()),
        ..Default::default()
    });
    let html = button.to_html()?;
    assert_eq!(
        html,
        format!(
            "<div><button title=\"&lt;Back&gt;\" type=\"button\" class=\"action-default scalable\" {}=\"buttonId{}\"><span>&lt;Back&gt;</span></button></div>",
            HOOK_ID_ATTRIBUTE,
            run('a')
        )
    );
    Ok(())
}

#[test]
fn consecutive_renders_differ_only_in_identifiers() -> Result<(), Box<dyn std::error::Error>> {
    let mut button = button_with(
        ButtonConfig {
            id: Some("save".into()),
            label: Some("Save".into()),
            on_click: Some("save();".into()),
            style: Some("color:red".into()),
            after_html: Some("<i>after</i>".into()),
            ..Default::default()
        },
        Arc::new(OsRandom::new()?),
    );
    let first = button.to_html()?;
    let first_hook = button.hook_id().map(str::to_owned);
    let second = button.to_html()?;
    let second_hook = button.hook_id().map(str::to_owned);

    assert_ne!(first_hook, second_hook);
    assert_ne!(first, second);
    assert_eq!(mask_identifiers(&first), mask_identifiers(&second));
    assert_eq!(second.matches("<script").count(), 1);
    for hook in [first_hook, second_hook] {
        let hook = hook.ok_or("missing hook id")?;
        let suffix = hook.strip_prefix("buttonId").ok_or("missing prefix")?;
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }
    Ok(())
}

#[test]
fn processors_apply_to_generated_tags() -> Result<(), Box<dyn std::error::Error>> {
    let random: Arc<dyn RandomSource> = Arc::new(SequenceRandom::default());
    let renderer = Arc::new(
        SecureHtmlRenderer::new(Arc::clone(&random)).with_processor(NonceProcessor::new("n1")),
    );
    let mut button = Button::new(
        ButtonConfig {
            id: Some("b".into()),
            on_click: Some("go()".into()),
            style: Some("color:red".into()),
            ..Default::default()
        },
        renderer,
        random,
    );
    let html = button.to_html()?;
    assert!(html.contains("<script type=\"text/javascript\" nonce=\"n1\">"));
    assert!(html.contains("<style nonce=\"n1\">"));
    Ok(())
}

#[test]
fn config_deserializes_from_json() -> Result<(), Box<dyn std::error::Error>> {
    let config: ButtonConfig = serde_json::from_value(json!({
        "id": "save",
        "type": "submit",
        "label": "Save",
        "disabled": true,
        "data_attribute": { "role": "save" },
        "onclick": "save()",
        "ui_id": "order-save"
    }))?;
    assert_eq!(config.kind.as_deref(), Some("submit"));
    assert!(config.disabled);
    assert_eq!(config.onclick.as_deref(), Some("save()"));
    assert_eq!(config.extra("ui_id"), Some(&json!("order-save")));
    assert_eq!(config.data_attribute.get("role"), Some(&json!("save")));
    Ok(())
}
