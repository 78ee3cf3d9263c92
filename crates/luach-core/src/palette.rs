const DEFAULT_COLOR: &str = "#cccccc";

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Tanakh", "#004e5f"),
    ("Torah", "#004e5f"),
    ("Prophets", "#004e5f"),
    ("Writings", "#004e5f"),
    ("Mishnah", "#5a99b7"),
    ("Talmud", "#ccb479"),
    ("Bavli", "#ccb479"),
    ("Yerushalmi", "#ccb479"),
    ("Midrash", "#5d956f"),
    ("Halakhah", "#802f3e"),
    ("Kabbalah", "#594176"),
    ("Liturgy", "#ab4e66"),
    ("Jewish Thought", "#7f85a9"),
    ("Philosophy", "#7f85a9"),
    ("Tosefta", "#00827f"),
    ("Chasidut", "#97b386"),
    ("Musar", "#7c406f"),
    ("Responsa", "#cb6158"),
    ("Second Temple", "#c6a7b4"),
    ("Reference", "#9ab8cb"),
    ("Commentary", "#4871bf"),
];

/// Border color for a listing's category; unknown categories get a neutral grey.
pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// SGR parameters for a 24-bit foreground color, e.g. `38;2;0;78;95`.
pub fn ansi_code(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);
    Some(format!("38;2;{r};{g};{b}"))
}
