use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::calendar::{Language, ListingRecord, LocalizedText};
use crate::config::Config;
use crate::descriptions::DescriptionTable;
use crate::page::{CalendarsPage, Section};
use crate::palette;

const DESCRIPTION_WIDTH: usize = 72;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    language: Language,
}

impl Renderer {
    pub fn new(cfg: &Config, language: Option<Language>) -> anyhow::Result<Self> {
        let color = cfg.get_bool("color")?.unwrap_or(true) && io::stdout().is_terminal();

        let language = match language {
            Some(language) => language,
            None => cfg
                .get("language")
                .map(|raw| raw.parse::<Language>())
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(Self { color, language })
    }

    pub fn plain(language: Language) -> Self {
        Self {
            color: false,
            language,
        }
    }

    #[tracing::instrument(skip(self, page))]
    pub fn print_page(&mut self, page: &CalendarsPage) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_page(&mut out, page)
    }

    #[tracing::instrument(skip(self, records))]
    pub fn print_listings(&mut self, records: &[ListingRecord]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        for record in records {
            self.write_listing(&mut out, record)?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, table))]
    pub fn print_series(&mut self, table: &DescriptionTable) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "Series".to_string(),
            "Subtitle".to_string(),
            "Description".to_string(),
        ];

        let rows = table
            .iter()
            .map(|(name, entry)| {
                let described = entry
                    .text()
                    .map(|text| truncate(&text.for_language(self.language), 40))
                    .unwrap_or_else(|| "-".to_string());
                vec![
                    self.paint(name, "33"),
                    entry.en_subtitle.clone().unwrap_or_default(),
                    described,
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    pub fn write_page<W: Write>(&self, out: &mut W, page: &CalendarsPage) -> anyhow::Result<()> {
        if let Some(about) = page.about {
            writeln!(out, "{}", self.text(&about.title()))?;
            writeln!(out)?;
        }

        for section in &page.sections {
            self.write_section(out, section)?;
        }

        let sidebar: Vec<String> = page
            .sidebar
            .iter()
            .map(|module| self.text(&module.title()))
            .collect();
        writeln!(out, "See also: {}", sidebar.join(" | "))?;
        Ok(())
    }

    pub fn write_section<W: Write>(&self, out: &mut W, section: &Section) -> anyhow::Result<()> {
        let heading = self.text(&section.heading);
        let rule = "=".repeat(UnicodeWidthStr::width(heading.as_str()));
        writeln!(out, "{}", self.paint(&heading, "1"))?;
        writeln!(out, "{rule}")?;
        writeln!(out)?;

        for record in &section.listings {
            self.write_listing(out, record)?;
        }
        Ok(())
    }

    pub fn write_listing<W: Write>(&self, out: &mut W, record: &ListingRecord) -> anyhow::Result<()> {
        let bar = self.category_bar(&record.category);

        let mut title = self.text(&record.display_title);
        if self.language != Language::Hebrew
            && let Some(subtitle) = &record.en_subtitle
        {
            title = format!("{title} {subtitle}");
        }
        writeln!(out, "{bar} {}  {}", self.paint(&title, "1"), record.title_href())?;

        let values: Vec<String> = record
            .refs
            .iter()
            .map(|calendar_ref| self.text(&calendar_ref.display_value))
            .collect();
        let width = values
            .iter()
            .map(|value| UnicodeWidthStr::width(value.as_str()))
            .max()
            .unwrap_or(0);

        for (value, calendar_ref) in values.iter().zip(&record.refs) {
            let padding = width.saturating_sub(UnicodeWidthStr::width(value.as_str()));
            writeln!(
                out,
                "{bar}   {value}{}  {}",
                " ".repeat(padding),
                calendar_ref.href()
            )?;
        }

        if let Some(description) = &record.description {
            for line in wrap(&self.text(description), DESCRIPTION_WIDTH) {
                writeln!(out, "{bar}   {line}")?;
            }
        }

        writeln!(out)?;
        Ok(())
    }

    fn text(&self, text: &LocalizedText) -> String {
        text.for_language(self.language)
    }

    fn category_bar(&self, category: &str) -> String {
        let hex = palette::category_color(category);
        match palette::ansi_code(hex) {
            Some(code) => self.paint("┃", &code),
            None => "┃".to_string(),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = UnicodeWidthStr::width(current.as_str())
            + usize::from(!current.is_empty())
            + UnicodeWidthStr::width(word);
        if !current.is_empty() && needed > max_width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > max_width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{Renderer, strip_ansi, truncate, wrap};
    use crate::calendar::{Language, LocalizedText, RawCalendarEntry};
    use crate::descriptions::DescriptionTable;
    use crate::listing::build;
    use crate::page::CalendarsPage;

    fn sample_records() -> Vec<crate::calendar::ListingRecord> {
        let mut first = RawCalendarEntry::new("Haftarah (A)", "Isaiah.42.5-43.10");
        first.display_value = LocalizedText::new("Isaiah 42:5-43:10", "ישעיהו מב:ה-מג:י");
        let mut second = RawCalendarEntry::new("Haftarah (A)", "Isaiah.42.5-42.21");
        second.display_value = LocalizedText::new("Isaiah 42:5-21", "ישעיהו מב:ה-כא");
        let mut daf = RawCalendarEntry::new("Daf Yomi", "Berakhot.2");
        daf.display_value = LocalizedText::new("Berakhot 2", "ברכות ב");
        daf.category = "Talmud".to_string();
        build(&[first, second, daf], DescriptionTable::builtin()).expect("build")
    }

    #[test]
    fn writes_listing_with_refs_and_subtitle() {
        let records = sample_records();
        let renderer = Renderer::plain(Language::English);
        let mut out = Vec::new();

        renderer
            .write_listing(&mut out, &records[1])
            .expect("write listing");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Daf Yomi (Talmud)  /Berakhot.2"));
        assert!(text.contains("Berakhot 2  /Berakhot.2"));
        assert!(text.contains("A learning program that covers a page of Talmud a day."));
    }

    #[test]
    fn aligns_ref_hrefs_within_listing() {
        let records = sample_records();
        let renderer = Renderer::plain(Language::English);
        let mut out = Vec::new();

        renderer
            .write_listing(&mut out, &records[0])
            .expect("write listing");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("┃   Isaiah 42:5-43:10  /Isaiah.42.5-43.10"));
        assert!(text.contains("┃   Isaiah 42:5-21     /Isaiah.42.5-42.21"));
    }

    #[test]
    fn hebrew_view_drops_english_subtitle() {
        let records = sample_records();
        let renderer = Renderer::plain(Language::Hebrew);
        let mut out = Vec::new();

        renderer
            .write_listing(&mut out, &records[1])
            .expect("write listing");

        let text = String::from_utf8(out).expect("utf8");
        assert!(!text.contains("(Talmud)"));
        assert!(text.contains("ברכות ב"));
    }

    #[test]
    fn writes_page_sections_in_order() {
        let records = sample_records();
        let page = CalendarsPage::assemble(&records, false);
        let renderer = Renderer::plain(Language::English);
        let mut out = Vec::new();

        renderer.write_page(&mut out, &page).expect("write page");

        let text = String::from_utf8(out).expect("utf8");
        let portion = text.find("Weekly Torah Portion").expect("portion heading");
        let daily = text.find("Daily Learning").expect("daily heading");
        let weekly = text.find("Weekly Learning").expect("weekly heading");
        assert!(text.starts_with("Learning Schedules"));
        assert!(portion < daily && daily < weekly);
        assert!(text.contains("See also: Stay Connected | Support Sefaria"));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(strip_ansi("\x1b[33mname\x1b[0m"), "name");
    }

    #[test]
    fn rejects_unknown_color_word() {
        let mut cfg = crate::config::Config::default();
        cfg.apply_overrides([("rc.color".to_string(), "sometimes".to_string())]);
        let err = Renderer::new(&cfg, None).expect_err("invalid color");
        assert_eq!(err.to_string(), "invalid color setting: sometimes");

        cfg.apply_overrides([("rc.color".to_string(), "off".to_string())]);
        assert!(Renderer::new(&cfg, Some(Language::English)).is_ok());
    }
}
