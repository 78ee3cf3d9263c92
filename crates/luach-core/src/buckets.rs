use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use tracing::debug;

use crate::calendar::{ListingRecord, LocalizedText};

pub const WEEKLY_PORTION_SERIES: &[&str] = &[
    "Parashat Hashavua",
    "Haftarah (A)",
    "Haftarah (S)",
    "Haftarah",
];

pub const DAILY_LEARNING_SERIES: &[&str] = &[
    "Daf Yomi",
    "929",
    "Daily Mishnah",
    "Daily Rambam",
    "Daily Rambam (3 Chapters)",
    "Halakhah Yomit",
];

pub const WEEKLY_LEARNING_SERIES: &[&str] = &["Daf a Week"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    WeeklyPortion,
    DailyLearning,
    WeeklyLearning,
}

impl Bucket {
    /// Page order of the calendar sections.
    pub const ALL: [Bucket; 3] = [
        Bucket::WeeklyPortion,
        Bucket::DailyLearning,
        Bucket::WeeklyLearning,
    ];

    pub fn series(self) -> &'static [&'static str] {
        match self {
            Bucket::WeeklyPortion => WEEKLY_PORTION_SERIES,
            Bucket::DailyLearning => DAILY_LEARNING_SERIES,
            Bucket::WeeklyLearning => WEEKLY_LEARNING_SERIES,
        }
    }

    pub fn heading(self) -> LocalizedText {
        match self {
            Bucket::WeeklyPortion => LocalizedText::new("Weekly Torah Portion", "פרשת השבוע"),
            Bucket::DailyLearning => LocalizedText::new("Daily Learning", "לימוד יומי"),
            Bucket::WeeklyLearning => LocalizedText::new("Weekly Learning", "לימוד שבועי"),
        }
    }

    pub fn select(self, records: &[ListingRecord]) -> Vec<ListingRecord> {
        filter_by_names(records, self.series().iter().copied())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::WeeklyPortion => "weekly-portion",
            Bucket::DailyLearning => "daily",
            Bucket::WeeklyLearning => "weekly",
        };
        f.write_str(name)
    }
}

impl FromStr for Bucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly-portion" | "portion" | "parasha" => Ok(Bucket::WeeklyPortion),
            "daily" | "daily-learning" => Ok(Bucket::DailyLearning),
            "weekly" | "weekly-learning" => Ok(Bucket::WeeklyLearning),
            other => Err(anyhow!("unknown bucket: {other}")),
        }
    }
}

/// Keeps the records whose `title.en` is one of `names`, in their merged order.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn filter_by_names<'a, I>(records: &[ListingRecord], names: I) -> Vec<ListingRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted: BTreeSet<&str> = names.into_iter().collect();
    let selected: Vec<ListingRecord> = records
        .iter()
        .filter(|record| wanted.contains(record.title.en.as_str()))
        .cloned()
        .collect();

    debug!(
        names = wanted.len(),
        selected = selected.len(),
        "filtered listings by series name"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::{Bucket, filter_by_names};
    use crate::calendar::RawCalendarEntry;
    use crate::descriptions::DescriptionTable;
    use crate::listing::build;

    fn records(titles: &[&str]) -> Vec<crate::calendar::ListingRecord> {
        let raw: Vec<RawCalendarEntry> = titles
            .iter()
            .enumerate()
            .map(|(idx, title)| RawCalendarEntry::new(*title, format!("ref-{idx}")))
            .collect();
        build(&raw, DescriptionTable::builtin()).expect("build")
    }

    #[test]
    fn keeps_merged_order_not_name_order() {
        let all = records(&["Parashat Hashavua", "Daf Yomi", "929", "Daily Mishnah"]);

        let picked = filter_by_names(&all, ["929", "Daf Yomi"]);

        let titles: Vec<&str> = picked.iter().map(|r| r.title.en.as_str()).collect();
        assert_eq!(titles, vec!["Daf Yomi", "929"]);
    }

    #[test]
    fn unknown_names_select_nothing() {
        let all = records(&["Daf Yomi"]);

        assert!(filter_by_names(&all, ["Nach Yomi"]).is_empty());
        assert!(filter_by_names(&all, std::iter::empty()).is_empty());
    }

    #[test]
    fn buckets_partition_the_standard_series() {
        let all = records(&[
            "Parashat Hashavua",
            "Haftarah (A)",
            "Haftarah (S)",
            "Daf Yomi",
            "929",
            "Daily Mishnah",
            "Daily Rambam",
            "Daily Rambam (3 Chapters)",
            "Daf a Week",
            "Halakhah Yomit",
            "Chok LeYisrael",
        ]);

        let portion = Bucket::WeeklyPortion.select(&all);
        let daily = Bucket::DailyLearning.select(&all);
        let weekly = Bucket::WeeklyLearning.select(&all);

        assert_eq!(portion.len(), 3);
        assert_eq!(daily.len(), 6);
        assert_eq!(weekly.len(), 1);
        assert_eq!(daily.last().map(|r| r.title.en.as_str()), Some("Halakhah Yomit"));
        assert_eq!(all.len(), 11);
    }

    #[test]
    fn parses_bucket_names() {
        assert_eq!("daily".parse::<Bucket>().expect("daily"), Bucket::DailyLearning);
        assert_eq!("Parasha".parse::<Bucket>().expect("parasha"), Bucket::WeeklyPortion);
        assert!("monthly".parse::<Bucket>().is_err());
        assert_eq!(Bucket::WeeklyLearning.to_string(), "weekly");
    }
}
