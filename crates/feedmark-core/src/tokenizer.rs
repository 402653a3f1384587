//! Flat markup tokenization on top of the `html5ever` tokenizer.
//!
//! Only the tokenizer stage is used: no tree is built, no end tags are
//! implied, and malformed input never fails. Character references are
//! decoded before events are handed out.
//!
//! html5ever folds `\r` and `\r\n` into `\n` while reading input. To keep
//! carriage returns intact they are fed as form feeds, which the tokenizer
//! treats as whitespace inside tags and passes through everywhere else,
//! and turned back on the way out. A fragment that already contains form
//! feeds is fed unchanged and gets the folded line endings.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::trace;

use crate::event::{Attributes, TagEvent};

const CARRIAGE_RETURN: char = '\r';
const CR_STAND_IN: char = '\u{c}';

/// Tokenizes `fragment` into a list of events.
pub fn tokenize(fragment: &str) -> Vec<TagEvent> {
    let mut events = Vec::new();
    for_each_event(fragment, |event| events.push(event));
    events
}

/// Streams the events of `fragment` into `emit`, in document order.
///
/// Adjacent character data is delivered as a single `Text` event. A
/// self-closing tag is delivered as an `Open` immediately followed by a
/// `Close`.
pub fn for_each_event<F>(fragment: &str, emit: F)
where
    F: FnMut(TagEvent),
{
    if fragment.is_empty() {
        return;
    }
    let restore_cr = fragment.contains(CARRIAGE_RETURN) && !fragment.contains(CR_STAND_IN);
    let source = if restore_cr {
        Cow::Owned(fragment.replace(CARRIAGE_RETURN, "\u{c}"))
    } else {
        Cow::Borrowed(fragment)
    };
    let sink = EventSink {
        emit: RefCell::new(emit),
        text: RefCell::new(String::new()),
        restore_cr,
    };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(&source));
    // The sink never returns `Script`, so feeding always runs to `Done`.
    let _ = tokenizer.feed(&input);
    tokenizer.end();
}

struct EventSink<F> {
    emit: RefCell<F>,
    text: RefCell<String>,
    restore_cr: bool,
}

impl<F> EventSink<F>
where
    F: FnMut(TagEvent),
{
    fn emit(&self, event: TagEvent) {
        let mut emit = self.emit.borrow_mut();
        (*emit)(event);
    }

    fn flush_text(&self) {
        let text = std::mem::take(&mut *self.text.borrow_mut());
        if !text.is_empty() {
            let text = self.restore(text);
            self.emit(TagEvent::Text(text));
        }
    }

    fn restore(&self, value: String) -> String {
        if self.restore_cr && value.contains(CR_STAND_IN) {
            value.replace(CR_STAND_IN, "\r")
        } else {
            value
        }
    }

    fn tag(&self, tag: Tag) -> TokenSinkResult<()> {
        self.flush_text();
        let name = tag.name.to_string();
        match tag.kind {
            TagKind::StartTag => {
                let attrs: Attributes = tag
                    .attrs
                    .into_iter()
                    .map(|attr| {
                        let value = self.restore(attr.value.to_string());
                        (attr.name.local.to_string(), value)
                    })
                    .collect();
                let raw = if tag.self_closing {
                    None
                } else {
                    raw_text_kind(&name)
                };
                self.emit(TagEvent::Open {
                    name: name.clone(),
                    attrs,
                });
                if tag.self_closing {
                    self.emit(TagEvent::Close { name });
                }
                if let Some(kind) = raw {
                    return TokenSinkResult::RawData(kind);
                }
            }
            TagKind::EndTag => self.emit(TagEvent::Close { name }),
        }
        TokenSinkResult::Continue
    }
}

impl<F> TokenSink for EventSink<F>
where
    F: FnMut(TagEvent),
{
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chunk) => self.text.borrow_mut().push_str(&chunk),
            Token::NullCharacterToken => self.text.borrow_mut().push('\0'),
            Token::TagToken(tag) => return self.tag(tag),
            Token::EOFToken => self.flush_text(),
            Token::ParseError(reason) => trace!(%reason, "markup parse error"),
            // Comments and doctypes carry no text.
            _ => {}
        }
        TokenSinkResult::Continue
    }

    fn end(&self) {
        self.flush_text();
    }
}

// Script and style bodies are passed through as text rather than tokenized.
fn raw_text_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::tokenize;
    use crate::event::TagEvent;

    #[test]
    fn decodes_references_in_text_and_attributes() {
        let events = tokenize("<a href=\"/q?a=1&amp;b=2\">Tom &amp; Jerry&#33;</a>");
        assert_eq!(
            events,
            vec![
                TagEvent::open_with("a", [("href", "/q?a=1&b=2")]),
                TagEvent::text("Tom & Jerry!"),
                TagEvent::close("a"),
            ]
        );
    }

    #[test]
    fn lowercases_tag_names() {
        let events = tokenize("<B>x</B>");
        assert_eq!(
            events,
            vec![TagEvent::open("b"), TagEvent::text("x"), TagEvent::close("b")]
        );
    }

    #[test]
    fn self_closing_tag_opens_and_closes() {
        let events = tokenize("<a href=\"x\"/>");
        assert_eq!(
            events,
            vec![TagEvent::open_with("a", [("href", "x")]), TagEvent::close("a")]
        );
    }

    #[test]
    fn script_body_is_raw_text() {
        let events = tokenize("<script>if (a<b) {}</script>");
        assert_eq!(
            events,
            vec![
                TagEvent::open("script"),
                TagEvent::text("if (a<b) {}"),
                TagEvent::close("script"),
            ]
        );
    }

    #[test]
    fn comments_are_dropped_and_text_is_joined() {
        let events = tokenize("one<!-- gone -->two");
        assert_eq!(events, vec![TagEvent::text("onetwo")]);
    }

    #[test]
    fn incomplete_trailing_tag_is_dropped() {
        assert_eq!(tokenize("text<a href="), vec![TagEvent::text("text")]);
    }

    #[test]
    fn carriage_returns_survive() {
        assert_eq!(
            tokenize("line one\r\nline two\rthree"),
            vec![TagEvent::text("line one\r\nline two\rthree")]
        );
    }

    #[test]
    fn carriage_return_inside_a_tag_is_whitespace() {
        let events = tokenize("<a\rhref=\"x\"\r\ntitle=\"a\rb\">y\r</a>");
        assert_eq!(
            events,
            vec![
                TagEvent::open_with("a", [("href", "x"), ("title", "a\rb")]),
                TagEvent::text("y\r"),
                TagEvent::close("a"),
            ]
        );
    }

    #[test]
    fn duplicate_attribute_keeps_the_first() {
        let events = tokenize("<a href=\"first\" href=\"second\">");
        assert_eq!(events, vec![TagEvent::open_with("a", [("href", "first")])]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenize("").is_empty());
    }
}
