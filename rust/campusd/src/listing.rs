//! Filter, sort and paginate over in-memory record lists.
//!
//! Every list in the back office runs through the same pipeline. Entities
//! plug in through [`Row`], which exposes named fields for comparison and a
//! fixed set of text fields for free-text search.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[cfg(test)]
mod property_tests;

/// Criterion value that places no constraint, next to the empty string.
pub const ALL: &str = "All";

/// A comparable field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Number(i64),
    Date(NaiveDateTime),
}

impl FieldValue {
    pub fn text(v: impl Into<String>) -> Self {
        Self::Text(v.into())
    }

    pub fn day(d: NaiveDate) -> Self {
        d.and_hms_opt(0, 0, 0)
            .map_or_else(|| Self::Text(d.to_string()), Self::Date)
    }

    pub fn timestamp(ts: &DateTime<chrono::Utc>) -> Self {
        Self::Date(ts.naive_utc())
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Date(_) => 1,
            Self::Text(_) => 2,
            Self::List(_) => 3,
        }
    }
}

/// Field access for the list pipeline.
pub trait Row {
    /// Singular entity name used in error messages.
    const KIND: &'static str;
    /// Every field name that can be filtered or sorted on.
    const FIELDS: &'static [&'static str];
    /// Fields the `search` criterion looks into.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Value of `name`, or `None` when the record leaves it unset.
    fn field(&self, name: &str) -> Option<FieldValue>;

    fn has_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}

/// Partial filter. Missing, empty and `All` entries impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    /// Exact-match constraints keyed by field name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Criteria {
    #[cfg(test)]
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.fields
            .insert(field.to_string(), serde_json::Value::String(value.to_string()));
        self
    }

    #[cfg(test)]
    pub fn search(mut self, needle: &str) -> Self {
        self.search = Some(needle.to_string());
        self
    }
}

fn constrains(raw: Option<&str>) -> Option<&str> {
    let t = raw?.trim();
    if t.is_empty() || t == ALL {
        None
    } else {
        Some(t)
    }
}

fn criterion_text(field: &str, v: &serde_json::Value) -> Result<Option<String>> {
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(constrains(Some(s.as_str())).map(str::to_string)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(Error::invalid(format!(
            "filter.{field} must be a string, number or boolean"
        ))),
    }
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let t = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.date_naive())
}

/// Criteria checked against one entity's fields.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    needle: Option<String>,
    equals: Vec<(String, String)>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl Filter {
    pub fn compile<T: Row>(criteria: &Criteria) -> Result<Self> {
        let mut filter = Filter {
            needle: constrains(criteria.search.as_deref()).map(str::to_lowercase),
            ..Filter::default()
        };

        for (field, raw) in &criteria.fields {
            if !T::has_field(field) {
                return Err(Error::UnknownField {
                    kind: T::KIND,
                    field: field.clone(),
                });
            }
            if let Some(want) = criterion_text(field, raw)? {
                filter.equals.push((field.clone(), want));
            }
        }

        let bound = |raw: Option<&str>, name: &str| -> Result<Option<NaiveDate>> {
            let Some(t) = constrains(raw) else {
                return Ok(None);
            };
            if !T::has_field("date") {
                return Err(Error::UnknownField {
                    kind: T::KIND,
                    field: "date".to_string(),
                });
            }
            parse_day(t)
                .map(Some)
                .ok_or_else(|| Error::invalid(format!("{name} must be YYYY-MM-DD")))
        };
        filter.from = bound(criteria.date_from.as_deref(), "dateFrom")?;
        filter.to = bound(criteria.date_to.as_deref(), "dateTo")?;

        Ok(filter)
    }

    pub fn matches<T: Row>(&self, record: &T) -> bool {
        if let Some(needle) = &self.needle {
            let hit = T::SEARCH_FIELDS
                .iter()
                .filter_map(|f| record.field(f))
                .any(|v| match v {
                    FieldValue::Text(t) => t.to_lowercase().contains(needle.as_str()),
                    FieldValue::List(items) => items
                        .iter()
                        .any(|t| t.to_lowercase().contains(needle.as_str())),
                    _ => false,
                });
            if !hit {
                return false;
            }
        }

        for (field, want) in &self.equals {
            match record.field(field) {
                Some(v) if equals(&v, want) => {}
                _ => return false,
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(FieldValue::Date(dt)) = record.field("date") else {
                return false;
            };
            let day = dt.date();
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
                return false;
            }
        }

        true
    }
}

fn equals(value: &FieldValue, want: &str) -> bool {
    match value {
        FieldValue::Text(t) => t == want,
        FieldValue::List(items) => items.iter().any(|t| t == want),
        FieldValue::Number(n) => want.parse::<i64>().is_ok_and(|w| w == *n),
        FieldValue::Date(dt) => parse_day(want).is_some_and(|d| d == dt.date()),
    }
}

/// Records matching every criterion, in input order.
pub fn filter_records<T: Row + Clone>(records: &[T], criteria: &Criteria) -> Result<Vec<T>> {
    let filter = Filter::compile::<T>(criteria)?;
    Ok(records
        .iter()
        .filter(|r| filter.matches(*r))
        .cloned()
        .collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: Direction,
}

#[cfg(test)]
impl SortSpec {
    pub fn asc(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: Direction::Desc,
        }
    }
}

/// Case-insensitive ordering; at the first case-only difference lowercase wins.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        for (x, y) in a.chars().zip(b.chars()) {
            if x != y {
                return match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => x.cmp(&y),
                };
            }
        }
        a.len().cmp(&b.len())
    })
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => locale_cmp(x, y),
        (FieldValue::Number(x), FieldValue::Number(y)) => x.cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::List(x), FieldValue::List(y)) => locale_cmp(&x.join(", "), &y.join(", ")),
        _ => a.rank().cmp(&b.rank()),
    }
}

fn compare_rows<T: Row>(a: &T, b: &T, spec: &SortSpec) -> Ordering {
    // Unset keys go last in both directions.
    match (a.field(&spec.key), b.field(&spec.key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match spec.direction {
            Direction::Asc => compare_values(&x, &y),
            Direction::Desc => compare_values(&x, &y).reverse(),
        },
    }
}

/// Stable sort into a new vector; `records` is left untouched.
pub fn sort_records<T: Row + Clone>(records: &[T], spec: &SortSpec) -> Result<Vec<T>> {
    if !T::has_field(&spec.key) {
        return Err(Error::UnknownField {
            kind: T::KIND,
            field: spec.key.clone(),
        });
    }
    let mut out = records.to_vec();
    out.sort_by(|a, b| compare_rows(a, b, spec));
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
}

/// Slice `[page * size, page * size + size)`. Without a size the whole list is page 0.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: Option<usize>) -> Page<T> {
    let total = records.len();
    let size = page_size.unwrap_or(total).max(1);
    let page_count = total.div_ceil(size);
    let start = page.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    Page {
        items: records[start..end].to_vec(),
        total,
        page,
        page_size: page_size.unwrap_or(total),
        page_count,
    }
}

/// One list request: criteria, optional sort, and the page to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Criteria,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: Option<usize>,
}

pub fn run_query<T: Row + Clone>(records: &[T], query: &ListQuery) -> Result<Page<T>> {
    if query.page_size == Some(0) {
        return Err(Error::invalid("pageSize must be greater than 0"));
    }
    let filtered = filter_records(records, &query.filter)?;
    let ordered = match &query.sort {
        Some(spec) => sort_records(&filtered, spec)?,
        None => filtered,
    };
    Ok(paginate(&ordered, query.page, query.page_size))
}

/// State behind one list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    criteria: Criteria,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
}

impl ListState {
    pub fn new(page_size: usize) -> Self {
        Self {
            criteria: Criteria::default(),
            sort: None,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Any filter change goes back to the first page.
    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criteria = criteria;
        self.page = 0;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            filter: self.criteria.clone(),
            sort: self.sort.clone(),
            page: self.page,
            page_size: Some(self.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: String,
        status: &'static str,
        tags: Vec<String>,
        date: Option<NaiveDate>,
    }

    impl Row for Item {
        const KIND: &'static str = "item";
        const FIELDS: &'static [&'static str] = &["name", "status", "tags", "date"];
        const SEARCH_FIELDS: &'static [&'static str] = &["name", "tags"];

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::text(&self.name)),
                "status" => Some(FieldValue::text(self.status)),
                "tags" => Some(FieldValue::List(self.tags.clone())),
                "date" => self.date.map(FieldValue::day),
                _ => None,
            }
        }
    }

    fn item(name: &str, status: &'static str, date: Option<NaiveDate>) -> Item {
        Item {
            name: name.to_string(),
            status,
            tags: Vec::new(),
            date,
        }
    }

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).expect("date") + chrono::Duration::days(offset)
    }

    #[test]
    fn status_filter_keeps_exact_matches_only() {
        let items = vec![
            item("Class 1", "Active", None),
            item("Class 2", "Inactive", None),
        ];
        let out = filter_records(&items, &Criteria::default().with("status", "Active")).unwrap();
        assert_eq!(out, vec![items[0].clone()]);
    }

    #[test]
    fn empty_and_all_criteria_are_ignored() {
        let items = vec![item("a", "Active", None), item("b", "Inactive", None)];
        let criteria = Criteria::default().with("status", ALL).search("  ");
        assert_eq!(filter_records(&items, &criteria).unwrap().len(), 2);
        let criteria = Criteria::default().with("status", "");
        assert_eq!(filter_records(&items, &criteria).unwrap().len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_substring_over_lists_too() {
        let mut tagged = item("Maths", "Active", None);
        tagged.tags = vec!["Honours".to_string()];
        let items = vec![tagged.clone(), item("History", "Active", None)];
        let out = filter_records(&items, &Criteria::default().search("HONOUR")).unwrap();
        assert_eq!(out, vec![tagged]);
        let out = filter_records(&items, &Criteria::default().search("isto")).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unknown_filter_field_is_rejected() {
        let err = filter_records(&[item("a", "Active", None)], &Criteria::default().with("colour", "red"))
            .unwrap_err();
        assert_eq!(err.code(), "bad_params");
    }

    #[test]
    fn date_range_is_inclusive() {
        let items: Vec<Item> = (-2..=2).map(|d| item("x", "Active", Some(day(d)))).collect();
        let criteria = Criteria {
            date_from: Some(day(-1).to_string()),
            date_to: Some(day(1).to_string()),
            ..Criteria::default()
        };
        let out = filter_records(&items, &criteria).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn date_sort_orders_chronologically() {
        let items = vec![
            item("in a week", "Active", Some(day(7))),
            item("in ten days", "Active", Some(day(10))),
            item("two days ago", "Active", Some(day(-2))),
        ];
        let out = sort_records(&items, &SortSpec::asc("date")).unwrap();
        let names: Vec<&str> = out.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["two days ago", "in a week", "in ten days"]);
    }

    #[test]
    fn unset_keys_sink_in_both_directions() {
        let items = vec![
            item("none", "Active", None),
            item("early", "Active", Some(day(0))),
            item("late", "Active", Some(day(5))),
        ];
        let asc = sort_records(&items, &SortSpec::asc("date")).unwrap();
        assert_eq!(asc.last().unwrap().name, "none");
        let desc = sort_records(&items, &SortSpec::desc("date")).unwrap();
        assert_eq!(desc[0].name, "late");
        assert_eq!(desc.last().unwrap().name, "none");
    }

    #[test]
    fn locale_order_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn sort_by_unknown_key_fails() {
        assert!(sort_records(&[item("a", "Active", None)], &SortSpec::asc("nope")).is_err());
    }

    #[test]
    fn paginate_reports_totals_and_clamps_past_end() {
        let items: Vec<u32> = (0..23).collect();
        let page = paginate(&items, 2, Some(10));
        assert_eq!(page.items, vec![20, 21, 22]);
        assert_eq!(page.total, 23);
        assert_eq!(page.page_count, 3);
        assert!(paginate(&items, 9, Some(10)).items.is_empty());

        let all = paginate(&items, 0, None);
        assert_eq!(all.items.len(), 23);
        assert_eq!(all.page_count, 1);
        assert_eq!(paginate::<u32>(&[], 0, None).page_count, 0);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let query = ListQuery {
            page_size: Some(0),
            ..ListQuery::default()
        };
        assert!(run_query(&[item("a", "Active", None)], &query).is_err());
    }

    #[test]
    fn list_state_resets_page_on_filter_change() {
        let mut state = ListState::new(5);
        state.set_page(3);
        state.set_sort(Some(SortSpec::asc("name")));
        assert_eq!(state.page(), 3);
        state.set_criteria(Criteria::default().with("status", "Active"));
        assert_eq!(state.page(), 0);
        state.set_page(2);
        state.set_page_size(20);
        assert_eq!(state.page(), 0);
        assert_eq!(state.query().page_size, Some(20));
    }

    #[test]
    fn criteria_deserializes_flattened_fields() {
        let raw = serde_json::json!({ "search": "grade", "status": "Active", "dateFrom": "2026-01-01" });
        let criteria: Criteria = serde_json::from_value(raw).unwrap();
        assert_eq!(criteria.search.as_deref(), Some("grade"));
        assert_eq!(criteria.date_from.as_deref(), Some("2026-01-01"));
        assert_eq!(
            criteria.fields.get("status"),
            Some(&serde_json::Value::String("Active".to_string()))
        );
    }
}
