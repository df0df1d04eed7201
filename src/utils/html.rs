/// Escapes text for use inside HTML element content and quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut ret = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => ret.push_str("&amp;"),
            '<' => ret.push_str("&lt;"),
            '>' => ret.push_str("&gt;"),
            '"' => ret.push_str("&quot;"),
            '\'' => ret.push_str("&#39;"),
            _ => ret.push(c),
        }
    }
    ret
}
