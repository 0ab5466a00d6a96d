//! Formatting utilities (chat entities → HTML).

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inline style of a formatted span, as reported by the chat platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Spoiler,
    Code,
    Pre { language: Option<String> },
    TextLink { url: String },
}

/// A formatted span. `offset` and `length` are in UTF-16 code units (Telegram semantics).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEntity {
    pub offset: usize,
    pub length: usize,
    pub style: EntityStyle,
}

impl TextEntity {
    fn end(&self) -> usize {
        self.offset + self.length
    }
}

fn open_tag(style: &EntityStyle) -> String {
    match style {
        EntityStyle::Bold => "<b>".to_string(),
        EntityStyle::Italic => "<i>".to_string(),
        EntityStyle::Underline => "<u>".to_string(),
        EntityStyle::Strikethrough => "<s>".to_string(),
        EntityStyle::Spoiler => r#"<span class="tg-spoiler">"#.to_string(),
        EntityStyle::Code => "<code>".to_string(),
        EntityStyle::Pre { language: Some(l) } => {
            format!(r#"<pre><code class="language-{}">"#, escape_html(l))
        }
        EntityStyle::Pre { language: None } => "<pre>".to_string(),
        EntityStyle::TextLink { url } => format!(r#"<a href="{}">"#, escape_html(url)),
    }
}

fn close_tag(style: &EntityStyle) -> &'static str {
    match style {
        EntityStyle::Bold => "</b>",
        EntityStyle::Italic => "</i>",
        EntityStyle::Underline => "</u>",
        EntityStyle::Strikethrough => "</s>",
        EntityStyle::Spoiler => "</span>",
        EntityStyle::Code => "</code>",
        EntityStyle::Pre { language: Some(_) } => "</code></pre>",
        EntityStyle::Pre { language: None } => "</pre>",
        EntityStyle::TextLink { .. } => "</a>",
    }
}

fn close_ended(out: &mut String, open: &mut Vec<&TextEntity>, pos: usize) {
    while let Some(top) = open.last() {
        if top.end() > pos {
            break;
        }
        out.push_str(close_tag(&top.style));
        open.pop();
    }
}

/// Render plain text plus entity spans into HTML.
///
/// Entities are expected to nest properly (the chat platform guarantees this);
/// overlapping spans are closed late rather than split.
pub fn render_html(text: &str, entities: &[TextEntity]) -> String {
    if entities.is_empty() {
        return escape_html(text);
    }

    let mut sorted: Vec<&TextEntity> = entities.iter().filter(|e| e.length > 0).collect();
    sorted.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));

    let mut out = String::with_capacity(text.len() + sorted.len() * 8);
    let mut open: Vec<&TextEntity> = Vec::new();
    let mut next = 0usize;
    let mut pos = 0usize;

    for ch in text.chars() {
        close_ended(&mut out, &mut open, pos);
        while next < sorted.len() && sorted[next].offset <= pos {
            out.push_str(&open_tag(&sorted[next].style));
            open.push(sorted[next]);
            next += 1;
        }

        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
        pos += ch.len_utf16();
    }

    close_ended(&mut out, &mut open, usize::MAX);
    out
}
