use serde::Serialize;
use tracing::debug;

use crate::event::{Attributes, TagEvent, TagKind};
use crate::tokenizer::for_each_event;

const PARAGRAPH_BREAK: &str = "\n\n";
const STRONG_DELIMITER: &str = "**";
const EMPHASIS_DELIMITER: &str = "_";
const LINK_TARGET_ATTR: &str = "href";

/// Output of one conversion.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Inline text with `**`, `_` and `[text](target)` markup.
    pub text: String,
    /// Targets of links that had no visible text, in close order.
    pub bare_links: Vec<String>,
}

/// What happens to links still open when the input ends.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnterminatedLinks {
    /// Drop them, including any text collected inside.
    #[default]
    Discard,
    /// Close them innermost first, as if their end tags were present.
    Flush,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConvertOptions {
    pub unterminated_links: UnterminatedLinks,
}

#[derive(Clone, Debug, Default)]
struct LinkContext {
    text: String,
    target: String,
}

/// Single-pass state machine from markup events to inline text.
///
/// Feed it events with [`Converter::process`] in document order and call
/// [`Converter::finish`] once. Text inside an open link is routed to the
/// innermost link; everything else goes straight to the output.
#[derive(Debug, Default)]
pub struct Converter {
    options: ConvertOptions,
    out: String,
    links: Vec<LinkContext>,
    bare_links: Vec<String>,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn process(&mut self, event: TagEvent) {
        match event {
            TagEvent::Open { name, attrs } => self.open(&name, &attrs),
            TagEvent::Close { name } => self.close(&name),
            TagEvent::Text(data) => self.text(&data),
        }
    }

    pub fn finish(mut self) -> Conversion {
        if !self.links.is_empty() {
            match self.options.unterminated_links {
                UnterminatedLinks::Discard => {
                    debug!(count = self.links.len(), "discarding unterminated links");
                }
                UnterminatedLinks::Flush => {
                    while self.close_link() {}
                }
            }
        }
        Conversion {
            text: self.out,
            bare_links: self.bare_links,
        }
    }

    fn open(&mut self, name: &str, attrs: &Attributes) {
        match TagKind::of(name) {
            TagKind::Paragraph => self.out.push_str(PARAGRAPH_BREAK),
            TagKind::Strong => self.out.push_str(STRONG_DELIMITER),
            TagKind::Emphasis => self.out.push_str(EMPHASIS_DELIMITER),
            TagKind::Link => {
                if let Some(target) = attrs.get(LINK_TARGET_ATTR) {
                    self.links.push(LinkContext {
                        text: String::new(),
                        target: target.clone(),
                    });
                }
            }
            TagKind::Other => {}
        }
    }

    fn close(&mut self, name: &str) {
        match TagKind::of(name) {
            TagKind::Paragraph => self.out.push_str(PARAGRAPH_BREAK),
            TagKind::Strong => self.out.push_str(STRONG_DELIMITER),
            TagKind::Emphasis => self.out.push_str(EMPHASIS_DELIMITER),
            TagKind::Link => {
                if !self.close_link() {
                    debug!("ignoring link close without an open link");
                }
            }
            TagKind::Other => {}
        }
    }

    fn text(&mut self, data: &str) {
        match self.links.last_mut() {
            Some(link) => link.text.push_str(data),
            None => self.out.push_str(data),
        }
    }

    // Returns false when no link was open.
    fn close_link(&mut self) -> bool {
        let Some(link) = self.links.pop() else {
            return false;
        };
        if link.text.is_empty() {
            self.out.push(' ');
            self.bare_links.push(link.target);
        } else {
            self.out.push('[');
            self.out.push_str(&link.text);
            self.out.push_str("](");
            self.out.push_str(&link.target);
            self.out.push_str(") ");
        }
        true
    }
}

/// Converts a markup fragment with the default options.
pub fn convert(fragment: &str) -> Conversion {
    convert_with_options(fragment, &ConvertOptions::default())
}

pub fn convert_with_options(fragment: &str, options: &ConvertOptions) -> Conversion {
    let mut converter = Converter::new(*options);
    for_each_event(fragment, |event| converter.process(event));
    converter.finish()
}
