use boardbrief_core::models::ExtractedText;
use boardbrief_core::traits::Cleaner;
use scraper::{ElementRef, Html, Node};

use crate::preload::{PRELOAD_MARKER, parse_preload};

/// Elements whose content never reaches the extracted text.
const SKIPPED_TAGS: &[&str] = &[
    "style", "noscript", "template", "svg", "iframe", "object", "canvas", "link",
];

/// Elements that start and end a paragraph of text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// HTML-to-plain-text cleaner built on `scraper`.
///
/// Output layout: page title, meta description, facts from the embedded game
/// preload (when present), then the visible body text. Sections are separated
/// by a single blank line and whitespace inside lines is collapsed.
#[derive(Debug, Clone, Default)]
pub struct HtmlTextCleaner;

impl HtmlTextCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Cleaner for HtmlTextCleaner {
    fn clean(&self, html: &str) -> ExtractedText {
        // Nothing that looks like markup: keep it as one plain-text block.
        if !html.contains('<') {
            return ExtractedText::new(normalize(html));
        }

        let document = Html::parse_document(html);
        let mut walk = Walk::default();
        walk.run(document.root_element());

        let mut sections = vec![normalize(&walk.title)];
        if let Some(description) = &walk.description {
            sections.push(normalize(description));
        }
        if let Some(script) = &walk.preload {
            match parse_preload(script) {
                Some(Ok(preload)) => {
                    let facts = preload.facts();
                    tracing::info!(facts = facts.len(), "Extracted structured game data");
                    sections.push(normalize(&facts.join("\n")));
                }
                Some(Err(e)) => tracing::warn!(error = %e, "Could not parse structured game data"),
                None => {}
            }
        }
        sections.push(normalize(&walk.body));

        let text = sections
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        ExtractedText::new(text)
    }
}

#[derive(Default)]
struct Walk {
    title: String,
    description: Option<String>,
    preload: Option<String>,
    body: String,
}

/// Pending work for the document walk. An explicit stack keeps deeply nested
/// markup off the call stack.
enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Leave { block: bool },
}

impl Walk {
    fn run(&mut self, root: ElementRef<'_>) {
        let mut stack = vec![Step::Enter(root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => self.body.push_str(text),
                Step::Leave { block } => {
                    if block {
                        self.body.push_str("\n\n");
                    }
                }
                Step::Enter(element) => {
                    if !self.open(element) {
                        continue;
                    }
                    let block = BLOCK_TAGS.contains(&element.value().name());
                    if block {
                        self.body.push_str("\n\n");
                    }
                    stack.push(Step::Leave { block });

                    let children: Vec<_> = element.children().collect();
                    for child in children.into_iter().rev() {
                        match child.value() {
                            Node::Text(text) => stack.push(Step::Text(text)),
                            Node::Element(_) => {
                                if let Some(child) = ElementRef::wrap(child) {
                                    stack.push(Step::Enter(child));
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    /// Handle an element on entry. Returns whether its children should be walked.
    fn open(&mut self, element: ElementRef<'_>) -> bool {
        let value = element.value();
        match value.name() {
            "script" => {
                if self.preload.is_none() {
                    let source: String = element.text().collect();
                    if source.contains(PRELOAD_MARKER) {
                        self.preload = Some(source);
                    }
                }
                false
            }
            "title" => {
                if self.title.is_empty() {
                    self.title = element.text().collect();
                }
                false
            }
            "meta" => {
                let is_description = value
                    .attr("name")
                    .is_some_and(|n| n.eq_ignore_ascii_case("description"));
                if is_description && self.description.is_none() {
                    self.description = value.attr("content").map(str::to_string);
                }
                false
            }
            "br" => {
                self.body.push('\n');
                false
            }
            name => !SKIPPED_TAGS.contains(&name),
        }
    }
}

/// Collapse whitespace within lines, drop tag delimiters, and squeeze runs of
/// blank lines down to one. Leading and trailing blank lines are removed.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_pending = false;

    for line in raw.lines() {
        let stripped: String = line.chars().filter(|c| *c != '<' && *c != '>').collect();
        let words: Vec<&str> = stripped.split_whitespace().collect();
        if words.is_empty() {
            blank_pending = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_pending {
                out.push('\n');
            }
        }
        blank_pending = false;
        out.push_str(&words.join(" "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        HtmlTextCleaner::new().clean(html).into_string()
    }

    fn assert_well_formed(text: &str) {
        assert!(!text.contains('<'), "markup left in {text:?}");
        assert!(!text.contains('>'), "markup left in {text:?}");
        assert!(!text.contains("\n\n\n"), "double blank line in {text:?}");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_strips_script_and_style() {
        let text = clean(
            "<html><head><style>p { color: red }</style></head>\
             <body><script>alert('x')</script><p>Brass: Birmingham is a game.</p></body></html>",
        );
        assert_eq!(text, "Brass: Birmingham is a game.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean(""), "");
        assert!(HtmlTextCleaner::new().clean("").is_empty());
    }

    #[test]
    fn test_whitespace_and_blank_lines_are_collapsed() {
        let text = clean(
            "<div>\n\n  Line   one\t\t</div>\n\n\n<div><div><p>Line two</p></div></div><br><br><br>tail",
        );
        assert_eq!(text, "Line one\n\nLine two\n\ntail");
    }

    #[test]
    fn test_inline_elements_do_not_split_words() {
        assert_eq!(clean("<p>Wing<b>span</b> is <i>great</i></p>"), "Wingspan is great");
    }

    #[test]
    fn test_malformed_html_is_best_effort() {
        let inputs = [
            "<div><p>unclosed <b>bold",
            "<<<>>> stray <brackets",
            "</p></div>closing only",
            "<script>never closed",
            "<p a=\"unterminated>text</p>",
            "plain & simple < 3 > 2",
        ];
        for input in inputs {
            assert_well_formed(&clean(input));
        }
        assert_eq!(clean("<div><p>unclosed <b>bold"), "unclosed bold");
    }

    #[test]
    fn test_plain_text_is_kept_as_a_block() {
        assert_eq!(
            clean("  Just some\n\n\n\ntext   here  "),
            "Just some\n\ntext here"
        );
    }

    #[test]
    fn test_entities_are_decoded_but_brackets_dropped() {
        assert_eq!(clean("<p>Ticket &amp; Ride &lt;3</p>"), "Ticket & Ride 3");
    }

    #[test]
    fn test_title_and_meta_description_lead_the_text() {
        let text = clean(
            r#"<html><head><title>Azul | Board Game</title>
               <meta name="Description" content="Tile-laying  for 2-4 players"></head>
               <body><p>Body text</p></body></html>"#,
        );
        assert_eq!(
            text,
            "Azul | Board Game\n\nTile-laying for 2-4 players\n\nBody text"
        );
    }

    #[test]
    fn test_preload_facts_are_included() {
        let html = r#"<html><head><title>Brass</title>
            <script>GEEK.geekitemPreload = {"item": {"name": "Brass: Birmingham", "minplayers": "2", "maxplayers": "4"}};
            GEEK.other = {};</script></head><body></body></html>"#;
        assert_eq!(
            clean(html),
            "Brass\n\nGame: Brass: Birmingham\nPlayers: 2-4"
        );
    }

    #[test]
    fn test_unparsable_preload_is_ignored() {
        let html = "<html><head><script>GEEK.geekitemPreload = {oops</script></head>\
                    <body><p>Still here</p></body></html>";
        assert_eq!(clean(html), "Still here");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = "<html><body><h1>Root</h1><ul><li>Vagabond</li><li>Marquise</li></ul></body></html>";
        assert_eq!(clean(html), clean(html));
        assert_well_formed(&clean(html));
    }

    #[test]
    fn test_script_heavy_document() {
        let mut html = String::from("<html><body>");
        for i in 0..20 {
            html.push_str(&format!("<script>var x{i} = '<p>not text</p>';</script>"));
            html.push_str("<style>.a{}</style><noscript>enable js</noscript>\n\n\n");
        }
        html.push_str("<p>Only this</p></body></html>");
        assert_eq!(clean(&html), "Only this");
    }

    #[test]
    fn test_deeply_nested_markup() {
        let html = format!("{}deep{}", "<span>".repeat(30_000), "</span>".repeat(30_000));
        assert_eq!(clean(&html), "deep");

        let html = format!(
            "<p>before</p>{}inner{}<p>after</p>",
            "<div>".repeat(2_000),
            "</div>".repeat(2_000)
        );
        assert_eq!(clean(&html), "before\n\ninner\n\nafter");
    }

    #[test]
    fn test_block_breaks_follow_document_order() {
        assert_eq!(
            clean("<ul><li>one <b>bold</b></li><li>two</li></ul><p>three<br>four</p>"),
            "one bold\n\ntwo\n\nthree\nfour"
        );
    }

    #[test]
    fn test_normalize_squeezes_blank_runs() {
        assert_eq!(normalize("\n\n a \n\n\n\n b \n\n"), "a\n\nb");
        assert_eq!(normalize("a\nb"), "a\nb");
        assert_eq!(normalize("   \n\t\n"), "");
    }
}
