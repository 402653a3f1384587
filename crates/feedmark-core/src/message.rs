//! Chat webhook messages built from feed items.

use serde::Serialize;

use crate::convert::convert;
use crate::feed::Item;

pub const STEAM_ICON: &str =
    "https://cdn.cloudflare.steamstatic.com/valvesoftware/images/about/steam_logo.png";

pub const CONTENT_LIMIT: usize = 2000;
pub const DESCRIPTION_LIMIT: usize = 4096;
pub const FIELD_VALUE_LIMIT: usize = 1024;

const ERROR_COLOR: u32 = 0xFF0000;
const POSTED_FORMAT: &str = "%a, %b %d, %Y @ %I:%M %p %Z";
const ELLIPSIS: char = '…';

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComposeOptions {
    pub avatar_url: String,
    /// Attach the converted item description as an embed.
    pub summary: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            avatar_url: STEAM_ICON.to_string(),
            summary: false,
        }
    }
}

/// Builds the message announcing a new feed item.
///
/// The publication date is printed in whatever offset `item.published`
/// carries; convert it beforehand to show local time.
pub fn announcement(channel_title: &str, item: &Item, options: &ComposeOptions) -> WebhookMessage {
    let posted = item.published.format(POSTED_FORMAT);
    let content = format!("# {}\n**Posted:** {}\n{}", item.title, posted, item.link);

    let mut embeds = Vec::new();
    if options.summary
        && let Some(description) = item.description.as_deref()
        && let Some(embed) = summary_embed(description)
    {
        embeds.push(embed);
    }

    WebhookMessage {
        username: channel_title.to_string(),
        avatar_url: options.avatar_url.clone(),
        content: Some(truncate(&content, CONTENT_LIMIT)),
        embeds,
    }
}

fn summary_embed(description: &str) -> Option<Embed> {
    let conversion = convert(description);
    let text = conversion.text.trim();
    if text.is_empty() && conversion.bare_links.is_empty() {
        return None;
    }
    let mut fields = Vec::new();
    if !conversion.bare_links.is_empty() {
        fields.push(EmbedField {
            name: "Links".to_string(),
            value: truncate(&conversion.bare_links.join("\n"), FIELD_VALUE_LIMIT),
        });
    }
    Some(Embed {
        description: (!text.is_empty()).then(|| truncate(text, DESCRIPTION_LIMIT)),
        fields,
        ..Embed::default()
    })
}

/// Builds the error message sent when a feed could not be fetched.
pub fn fetch_failure(feed_url: &str, status: u16, reason: &str) -> WebhookMessage {
    let username = "Steam RSS Feed".to_string();
    WebhookMessage {
        username: username.clone(),
        avatar_url: STEAM_ICON.to_string(),
        content: None,
        embeds: vec![Embed {
            title: Some(format!("Error: {status} | {reason}")),
            description: Some(feed_url.to_string()),
            color: Some(ERROR_COLOR),
            author: Some(EmbedAuthor {
                name: username,
                url: feed_url.to_string(),
                icon_url: STEAM_ICON.to_string(),
            }),
            ..Embed::default()
        }],
    }
}

/// Cuts `text` to at most `limit` chars, marking the cut with an ellipsis.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(limit - 1).collect();
    out.push(ELLIPSIS);
    out
}
