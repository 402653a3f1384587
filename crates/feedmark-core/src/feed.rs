//! RSS 2.0 channel reading.

use chrono::{DateTime, FixedOffset};
use roxmltree::{Document, Node};

use crate::error::{Error, Result};

const STEAM_COMMUNITY: &str = "https://steamcommunity.com";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Channel {
    pub title: String,
    /// Items in document order, which for most feeds is newest first.
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub published: DateTime<FixedOffset>,
    /// Raw markup body, if the item has one.
    pub description: Option<String>,
}

/// A Steam community announcement feed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeedSource {
    App(String),
    Group(String),
}

impl FeedSource {
    pub fn url(&self) -> String {
        match self {
            Self::App(appid) => format!("{STEAM_COMMUNITY}/ogg/{appid}/rss/"),
            Self::Group(name) => format!("{STEAM_COMMUNITY}/groups/{name}/rss/"),
        }
    }
}

pub fn parse_channel(xml: &str) -> Result<Channel> {
    let document = Document::parse(xml)?;
    let channel = document
        .root_element()
        .descendants()
        .find(|node| node.has_tag_name("channel"))
        .ok_or(Error::MissingChannel)?;

    let title = child_text(channel, "title").unwrap_or_default();
    let items = channel
        .children()
        .filter(|node| node.has_tag_name("item"))
        .enumerate()
        .map(|(index, node)| parse_item(index, node))
        .collect::<Result<Vec<_>>>()?;

    Ok(Channel { title, items })
}

fn parse_item(index: usize, node: Node<'_, '_>) -> Result<Item> {
    let required = |field: &'static str| {
        child_text(node, field).ok_or(Error::MissingField { item: index, field })
    };
    let guid = required("guid")?;
    let title = required("title")?;
    let link = required("link")?;
    let published = parse_date(&required("pubDate")?)?;
    let description = child_text(node, "description");
    Ok(Item {
        guid,
        title,
        link,
        published,
        description,
    })
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    let child = node.children().find(|child| child.has_tag_name(name))?;
    // Text and CDATA sections may be split across several nodes.
    let text: String = child
        .children()
        .filter(|part| part.is_text())
        .filter_map(|part| part.text())
        .collect();
    Some(text.trim().to_string())
}

pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S %z"))
        .map_err(|source| Error::InvalidDate {
            value: value.to_string(),
            source,
        })
}
