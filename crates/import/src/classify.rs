use crate::mapping::{FieldKey, FieldMapping};

/// Keyword table in priority order. A header matches a field when its
/// lower-cased text contains any of the field's keywords.
const KEYWORDS: &[(FieldKey, &[&str])] = &[
    (FieldKey::Amount, &["amount", "price", "sum", "value"]),
    (FieldKey::Category, &["category", "categ"]),
    (FieldKey::Date, &["date", "time"]),
    (FieldKey::Notes, &["note", "description", "memo", "details"]),
    (FieldKey::Type, &["type", "direction"]),
    (FieldKey::Icon, &["icon", "symbol", "emoji"]),
    (FieldKey::Recurrence, &["recur", "repeat", "frequency", "schedule"]),
];

fn header_matches(field: FieldKey, keywords: &[&str], header: &str) -> bool {
    // "Transaction Type" columns carry a bank's own classification, not ours.
    if field == FieldKey::Type && header.contains("transaction") {
        return false;
    }
    keywords.iter().any(|k| header.contains(k))
}

/// Guess which column plays which role from the header row.
///
/// Each column claims the highest-priority field it matches that no earlier
/// column has claimed. Unmatched columns are ignored.
pub fn classify_headers<S: AsRef<str>>(headers: &[S]) -> FieldMapping {
    let mut mapping = FieldMapping::new();

    for (column, header) in headers.iter().enumerate() {
        let header = header.as_ref().trim().to_lowercase();
        if header.is_empty() {
            continue;
        }

        let claimed = KEYWORDS.iter().find(|(field, keywords)| {
            mapping.column_for(*field).is_none() && header_matches(*field, keywords, &header)
        });

        if let Some((field, _)) = claimed {
            mapping.set(*field, column);
        }
    }

    mapping
}

/// Headers that are exactly the field key names, as written by the app's own
/// export. Such files leave a missing type at its default instead of
/// guessing it from the amount's sign.
pub fn is_native_header<S: AsRef<str>>(headers: &[S]) -> bool {
    !headers.is_empty()
        && headers
            .iter()
            .all(|h| h.as_ref().parse::<FieldKey>().is_ok())
}
