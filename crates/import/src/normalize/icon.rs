use fathom_core::Icon;

/// Plain-text icon names some apps export instead of the glyph itself.
const NAMED_ICONS: &[(&str, &str)] = &[
    ("house", "🏠"),
    ("home", "🏠"),
    ("car", "🚗"),
    ("food", "🍔"),
    ("cart", "🛒"),
    ("shopping", "🛍️"),
    ("cash", "💵"),
    ("money", "💵"),
    ("bank", "🏦"),
    ("health", "💊"),
    ("medical", "💊"),
    ("game", "🎮"),
    ("movie", "🎬"),
    ("gift", "🎁"),
    ("plane", "✈️"),
    ("travel", "✈️"),
    ("work", "💼"),
    ("briefcase", "💼"),
    ("chart", "📈"),
    ("book", "📚"),
    ("phone", "📱"),
    ("bolt", "💡"),
];

/// Category keyword buckets, checked in order.
const CATEGORY_ICONS: &[(&[&str], &str)] = &[
    (&["food", "grocer", "restaurant", "dining", "coffee", "meal", "lunch", "dinner"], "🍔"),
    (&["transport", "car", "fuel", "gas", "uber", "taxi", "bus", "train", "parking"], "🚗"),
    (&["home", "rent", "mortgage", "house", "utilit"], "🏠"),
    (&["health", "medical", "doctor", "pharmacy", "gym", "fitness"], "💊"),
    (&["entertainment", "movie", "cinema", "game", "music", "stream", "netflix", "spotify"], "🎮"),
    (&["salary", "income", "paycheck", "wage", "bonus"], "💼"),
    (&["saving", "invest"], "🏦"),
];

/// Pick an icon: the cell's own glyph, a known icon name, a category bucket,
/// or the cash glyph.
pub fn resolve_icon(cell: Option<&str>, category: &str) -> Icon {
    let cell = cell.map(str::trim).filter(|c| !c.is_empty());

    if let Some(cell) = cell {
        if is_glyph(cell) {
            return Icon::new(cell);
        }
        let name = cell.to_lowercase();
        if let Some((_, glyph)) = NAMED_ICONS.iter().find(|(n, _)| *n == name) {
            return Icon::new(*glyph);
        }
    }

    let category = category.to_lowercase();
    CATEGORY_ICONS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| category.contains(k)))
        .map(|(_, glyph)| Icon::new(*glyph))
        .unwrap_or_default()
}

/// Emoji and other pictographs are neither ASCII nor alphanumeric.
fn is_glyph(s: &str) -> bool {
    s.chars().any(|c| !c.is_ascii() && !c.is_alphanumeric())
}
