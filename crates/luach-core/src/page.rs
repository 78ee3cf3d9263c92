use tracing::debug;

use crate::buckets::Bucket;
use crate::calendar::{ListingRecord, LocalizedText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarModule {
    AboutLearningSchedules,
    StayConnected,
    SupportSefaria,
}

impl SidebarModule {
    pub fn title(self) -> LocalizedText {
        match self {
            SidebarModule::AboutLearningSchedules => {
                LocalizedText::new("Learning Schedules", "לוחות לימוד")
            }
            SidebarModule::StayConnected => LocalizedText::new("Stay Connected", "הישארו מעודכנים"),
            SidebarModule::SupportSefaria => LocalizedText::new("Support Sefaria", "תמכו בספריא"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub bucket: Bucket,
    pub heading: LocalizedText,
    pub listings: Vec<ListingRecord>,
}

/// Everything the calendars page shows, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarsPage {
    /// Shown above the sections when the sidebar is not visible.
    pub about: Option<SidebarModule>,
    pub sections: Vec<Section>,
    pub sidebar: Vec<SidebarModule>,
}

impl CalendarsPage {
    #[tracing::instrument(skip(records), fields(records = records.len()))]
    pub fn assemble(records: &[ListingRecord], multi_panel: bool) -> Self {
        let sections: Vec<Section> = Bucket::ALL
            .iter()
            .map(|bucket| Section {
                bucket: *bucket,
                heading: bucket.heading(),
                listings: bucket.select(records),
            })
            .collect();

        let (about, mut sidebar) = if multi_panel {
            (None, vec![SidebarModule::AboutLearningSchedules])
        } else {
            (Some(SidebarModule::AboutLearningSchedules), vec![])
        };
        sidebar.extend([SidebarModule::StayConnected, SidebarModule::SupportSefaria]);

        debug!(
            sections = sections.len(),
            listings = sections.iter().map(|s| s.listings.len()).sum::<usize>(),
            "assembled calendars page"
        );

        Self {
            about,
            sections,
            sidebar,
        }
    }
}
