use tracing::{debug, trace, warn};

use crate::calendar::{
    CalendarRef, ListingRecord, LocalizedText, PARASHAT_HASHAVUA, RawCalendarEntry,
};
use crate::descriptions::DescriptionTable;
use crate::error::ListingError;

/// Output keys of a listing record that an upstream field of the same name would shadow.
const RESERVED_RECORD_KEYS: &[&str] = &["refs", "displayTitle", "enSubtitle"];

/// Turns upstream calendar entries into display-ready listing records.
///
/// Adjacent entries sharing the same (unstripped) `title.en` become one record whose
/// `refs` keep input order. Entries that share a title but are not adjacent are kept
/// as separate records. The caller's slice is only read; every entry is cloned before
/// it is reshaped.
///
/// Fails without partial output when an entry has no `title.en`.
#[tracing::instrument(skip_all, fields(entries = raw_entries.len()))]
pub fn build(
    raw_entries: &[RawCalendarEntry],
    descriptions: &DescriptionTable,
) -> Result<Vec<ListingRecord>, ListingError> {
    let mut merged: Vec<ListingRecord> = Vec::with_capacity(raw_entries.len());

    for (index, raw) in raw_entries.iter().enumerate() {
        if raw.title.en.is_empty() {
            warn!(index, url = %raw.url, "calendar entry without title.en");
            return Err(ListingError::MalformedEntry {
                index,
                reason: "missing title.en",
            });
        }

        let entry = raw.clone();
        let series = descriptions.lookup(&entry.title.en);

        let description = entry
            .description
            .filter(|text| !text.is_empty())
            .or_else(|| series.and_then(|found| found.text()));

        let (display_title, display_value, en_subtitle) = if entry.title.en == PARASHAT_HASHAVUA
        {
            let citation = LocalizedText {
                en: entry.reference.unwrap_or_default(),
                he: entry.he_ref.unwrap_or_default(),
            };
            (entry.display_value, citation, None)
        } else {
            let subtitle = series.and_then(|found| found.en_subtitle.clone());
            (entry.title.clone(), entry.display_value, subtitle)
        };

        let calendar_ref = CalendarRef {
            url: entry.url.clone(),
            display_value,
        };

        if let Some(last) = merged.last_mut()
            && last.title.en == entry.title.en
        {
            trace!(index, title = %entry.title.en, url = %calendar_ref.url, "merging into previous listing");
            last.refs.push(calendar_ref);
            continue;
        }

        let mut extra = entry.extra;
        for key in RESERVED_RECORD_KEYS {
            if extra.remove(*key).is_some() {
                warn!(index, key = %key, "dropping upstream field that collides with listing output");
            }
        }

        merged.push(ListingRecord {
            title: entry.title,
            display_title,
            en_subtitle,
            description,
            category: entry.category,
            url: entry.url,
            refs: vec![calendar_ref],
            extra,
        });
    }

    debug!(records = merged.len(), "built calendar listings");
    Ok(merged)
}
