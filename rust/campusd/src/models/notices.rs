use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, required, stamp};
use crate::error::Result;
use crate::listing::{FieldValue, Row};
use crate::store::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    #[default]
    All,
    Students,
    Teachers,
    Parents,
    Staff,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Students => "Students",
            Self::Teachers => "Teachers",
            Self::Parents => "Parents",
            Self::Staff => "Staff",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl NoticeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub status: NoticeStatus,
    #[serde(default)]
    pub priority: Priority,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Row for Notice {
    const KIND: &'static str = "notice";
    const FIELDS: &'static [&'static str] = &[
        "title",
        "content",
        "audience",
        "status",
        "priority",
        "date",
        "author",
        "createdAt",
        "updatedAt",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "content", "author"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => Some(FieldValue::text(&self.title)),
            "content" => optional_text(Some(&self.content)),
            "audience" => Some(FieldValue::text(self.audience.as_str())),
            "status" => Some(FieldValue::text(self.status.as_str())),
            "priority" => Some(FieldValue::text(self.priority.as_str())),
            "date" => Some(FieldValue::day(self.date)),
            "author" => optional_text(self.author.as_ref()),
            "createdAt" => stamp(self.created_at.as_ref()),
            "updatedAt" => stamp(self.updated_at.as_ref()),
            _ => None,
        }
    }
}

impl Record for Notice {
    const COLLECTION: &'static str = "notices";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        required("title", &self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeStats {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_audience: BTreeMap<&'static str, usize>,
    /// Notices dated today or later.
    pub upcoming: usize,
}

pub fn compute_stats(notices: &[Notice], today: NaiveDate) -> NoticeStats {
    let mut stats = NoticeStats {
        total: notices.len(),
        ..NoticeStats::default()
    };
    for n in notices {
        *stats.by_status.entry(n.status.as_str()).or_default() += 1;
        *stats.by_audience.entry(n.audience.as_str()).or_default() += 1;
        if n.date >= today {
            stats.upcoming += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{filter_records, sort_records, Criteria, SortSpec};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("date")
    }

    fn notice(title: &str, offset: i64, audience: Audience, status: NoticeStatus) -> Notice {
        Notice {
            id: title.to_lowercase(),
            title: title.to_string(),
            content: format!("{title} details"),
            audience,
            status,
            priority: Priority::Medium,
            date: today() + Duration::days(offset),
            author: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn date_sort_ascending_puts_past_notices_first() {
        let list = vec![
            notice("Sports day", 7, Audience::All, NoticeStatus::Published),
            notice("Exams", 10, Audience::Students, NoticeStatus::Published),
            notice("Holiday", -2, Audience::All, NoticeStatus::Archived),
        ];
        let out = sort_records(&list, &SortSpec::asc("date")).unwrap();
        let dates: Vec<NaiveDate> = out.iter().map(|n| n.date).collect();
        assert_eq!(
            dates,
            vec![
                today() - Duration::days(2),
                today() + Duration::days(7),
                today() + Duration::days(10)
            ]
        );
    }

    #[test]
    fn all_audience_filter_is_no_constraint() {
        let list = vec![
            notice("Staff meeting", 1, Audience::Staff, NoticeStatus::Draft),
            notice("Open day", 3, Audience::Parents, NoticeStatus::Published),
        ];
        let everyone = filter_records(&list, &Criteria::default().with("audience", "All")).unwrap();
        assert_eq!(everyone.len(), 2);
        let parents = filter_records(
            &list,
            &Criteria::default()
                .with("audience", "Parents")
                .with("status", "Published"),
        )
        .unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].title, "Open day");
    }

    #[test]
    fn date_filter_matches_the_day() {
        let list = vec![notice("Exams", 10, Audience::Students, NoticeStatus::Published)];
        let on_day = (today() + Duration::days(10)).to_string();
        let hit = filter_records(&list, &Criteria::default().with("date", &on_day)).unwrap();
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn stats_count_upcoming_from_today() {
        let stats = compute_stats(
            &[
                notice("Past", -1, Audience::All, NoticeStatus::Archived),
                notice("Today", 0, Audience::Staff, NoticeStatus::Published),
                notice("Later", 4, Audience::Staff, NoticeStatus::Draft),
            ],
            today(),
        );
        assert_eq!(stats.upcoming, 2);
        assert_eq!(stats.by_audience.get("Staff"), Some(&2));
        assert_eq!(stats.by_status.get("Archived"), Some(&1));
    }
}
