use fathom_core::Recurrence;

/// Read a recurrence cell. Anything unrecognized is one-time.
pub fn parse_recurrence(raw: &str) -> Recurrence {
    let text = raw.trim().to_lowercase();

    if (text.contains("week") && text.contains("bi")) || text.contains("fortnight") {
        Recurrence::BiWeekly
    } else if text.contains("daily") || text.contains("every day") {
        Recurrence::Daily
    } else if text.contains("week") {
        Recurrence::Weekly
    } else if text.contains("month") {
        Recurrence::Monthly
    } else if text.contains("quarter") {
        Recurrence::Quarterly
    } else if text.contains("annual") || text.contains("year") {
        Recurrence::Annually
    } else {
        Recurrence::OneTime
    }
}
