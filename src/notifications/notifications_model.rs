use serde::Serialize;

/// A local notification to be shown to the user. The tag is deterministic so
/// the underlying notification system dedupes redundant emissions: re-running
/// the scheduler before the user dismisses an alert re-uses the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub tag: String,
    pub title: String,
    pub body: String,
}

/// At most one visible notification per closed ticket.
pub fn trade_closed_tag(ticket: i64) -> String {
    format!("trade-closed-{}", ticket)
}

/// At most one weekly summary per account per ISO week.
pub fn weekly_summary_tag(account_id: &str, iso_year: i32, iso_week: u32) -> String {
    format!("weekly-summary-{}-{}-W{:02}", account_id, iso_year, iso_week)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_deterministic() {
        assert_eq!(trade_closed_tag(1001), "trade-closed-1001");
        assert_eq!(trade_closed_tag(1001), trade_closed_tag(1001));
        assert_eq!(
            weekly_summary_tag("acc-1", 2024, 7),
            "weekly-summary-acc-1-2024-W07"
        );
    }
}
