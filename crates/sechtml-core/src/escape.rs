/// Escapes text for use between tags.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a value for use inside a double-quoted attribute.
///
/// Every `&` is encoded, including ones that already start an entity, so the
/// browser always decodes the value back to the exact input.
pub fn escape_html_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Keeps a `<script>` or `<style>` body from closing its element early.
///
/// `</` becomes `<\/`, which denotes the same text inside JavaScript string
/// literals and CSS.
pub fn escape_raw_text(body: &str) -> String {
    body.replace("</", "<\\/")
}

/// Escapes a value for use as a CSS identifier, e.g. after `#` in a selector.
///
/// See <https://drafts.csswg.org/cssom/#serialize-an-identifier>
pub fn escape_css_identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();
    for (idx, &ch) in chars.iter().enumerate() {
        let leading_digit = ch.is_ascii_digit()
            && (idx == 0 || (idx == 1 && chars[0] == '-'));
        match ch {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => out.push_str(&format!("\\{:x} ", ch as u32)),
            _ if leading_digit => out.push_str(&format!("\\{:x} ", ch as u32)),
            '-' if chars.len() == 1 => out.push_str("\\-"),
            '-' | '_' => out.push(ch),
            _ if ch.is_ascii_alphanumeric() || !ch.is_ascii() => out.push(ch),
            _ => {
                out.push('\\');
                out.push(ch);
            }
        }
    }
    out
}
