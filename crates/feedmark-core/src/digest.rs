use chrono::FixedOffset;
use tracing::{debug, trace};

use crate::archive::Archive;
use crate::error::Error;
use crate::feed::{Channel, Item};
use crate::message::{ComposeOptions, WebhookMessage, announcement};

#[derive(Clone, Debug, Default)]
pub struct DigestOptions {
    pub compose: ComposeOptions,
    /// Announce items even when the archive started out empty.
    pub force_old: bool,
    /// Offset to show publication dates in; the feed's own when unset.
    pub display_offset: Option<FixedOffset>,
}

/// Delivers a message for each item of `channel` not archived yet.
///
/// Items are visited oldest first. A GUID is recorded only after
/// `deliver` accepted its message, so a failed delivery is retried on the
/// next run. A first run against an empty archive only seeds it unless
/// `force_old` is set, so a fresh setup does not replay the whole feed.
///
/// Returns the number of delivered messages.
pub fn digest<F, E>(
    channel: &Channel,
    archive: &mut Archive,
    options: &DigestOptions,
    mut deliver: F,
) -> std::result::Result<usize, E>
where
    F: FnMut(WebhookMessage) -> std::result::Result<(), E>,
    E: From<Error>,
{
    let announce = !archive.is_empty() || options.force_old;
    let mut delivered = 0;

    for item in channel.items.iter().rev() {
        if archive.contains(&item.guid) {
            trace!(guid = %item.guid, "already archived");
            continue;
        }
        if announce {
            let item = localize(item, options.display_offset);
            deliver(announcement(&channel.title, &item, &options.compose))?;
            delivered += 1;
        }
        archive.record(&item.guid)?;
    }

    debug!(
        channel = %channel.title,
        announced = delivered,
        seeded = !announce,
        "digest finished"
    );
    Ok(delivered)
}

fn localize(item: &Item, offset: Option<FixedOffset>) -> Item {
    let mut item = item.clone();
    if let Some(offset) = offset {
        item.published = item.published.with_timezone(&offset);
    }
    item
}
