mod archive;
mod convert;
mod digest;
mod error;
mod event;
mod feed;
mod message;
mod tokenizer;

pub use archive::Archive;
pub use convert::{
    Conversion, ConvertOptions, Converter, UnterminatedLinks, convert, convert_with_options,
};
pub use digest::{DigestOptions, digest};
pub use error::{Error, Result};
pub use event::{Attributes, TagEvent};
pub use feed::{Channel, FeedSource, Item, parse_channel, parse_date};
pub use message::{
    CONTENT_LIMIT, ComposeOptions, DESCRIPTION_LIMIT, Embed, EmbedAuthor, EmbedField,
    FIELD_VALUE_LIMIT, STEAM_ICON, WebhookMessage, announcement, fetch_failure, truncate,
};
pub use tokenizer::{for_each_event, tokenize};
