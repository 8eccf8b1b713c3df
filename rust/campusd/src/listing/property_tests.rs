use super::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

const STATUSES: [&str; 3] = ["Active", "Inactive", "Draft"];

#[derive(Clone, Debug, PartialEq)]
struct TestRow {
    name: String,
    status: &'static str,
    score: Option<i64>,
}

impl Row for TestRow {
    const KIND: &'static str = "test row";
    const FIELDS: &'static [&'static str] = &["name", "status", "score"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::text(&self.name)),
            "status" => Some(FieldValue::text(self.status)),
            "score" => self.score.map(FieldValue::Number),
            _ => None,
        }
    }
}

fn arb_status() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(STATUSES[0]),
        Just(STATUSES[1]),
        Just(STATUSES[2]),
    ]
}

fn arb_row() -> impl Strategy<Value = TestRow> {
    ("[a-zA-Z ]{0,8}", arb_status(), proptest::option::of(-50i64..50)).prop_map(
        |(name, status, score)| TestRow {
            name,
            status,
            score,
        },
    )
}

fn arb_rows() -> impl Strategy<Value = Vec<TestRow>> {
    prop::collection::vec(arb_row(), 0..24)
}

fn arb_search() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z]{0,2}")
}

// Independent statement of the filter rules.
fn oracle(row: &TestRow, search: Option<&str>, status: Option<&str>) -> bool {
    let search_ok = match search.map(str::trim) {
        None | Some("") | Some(ALL) => true,
        Some(s) => row.name.to_lowercase().contains(&s.to_lowercase()),
    };
    let status_ok = match status {
        None | Some("") | Some(ALL) => true,
        Some(s) => row.status == s,
    };
    search_ok && status_ok
}

fn criteria(search: Option<&str>, status: Option<&str>) -> Criteria {
    let mut c = Criteria {
        search: search.map(str::to_string),
        ..Criteria::default()
    };
    if let Some(s) = status {
        c = c.with("status", s);
    }
    c
}

proptest! {
    #[test]
    fn stricter_criteria_never_grow_the_result(
        rows in arb_rows(),
        search in arb_search(),
        status in arb_status(),
    ) {
        let loose = filter_records(&rows, &criteria(search.as_deref(), None)).unwrap();
        let strict = filter_records(&rows, &criteria(search.as_deref(), Some(status))).unwrap();

        prop_assert!(loose.len() <= rows.len());
        prop_assert!(strict.len() <= loose.len());
        for row in &strict {
            prop_assert!(loose.contains(row));
        }
    }

    #[test]
    fn filter_keeps_exactly_the_matching_rows(
        rows in arb_rows(),
        search in arb_search(),
        status in proptest::option::of(prop_oneof![arb_status(), Just(ALL), Just("")]),
    ) {
        let out = filter_records(&rows, &criteria(search.as_deref(), status)).unwrap();
        let expected: Vec<TestRow> = rows
            .iter()
            .filter(|r| oracle(r, search.as_deref(), status))
            .cloned()
            .collect();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn descending_resort_reverses_distinct_keys(
        names in prop::collection::btree_set("[a-z]{1,6}", 0..16),
        status in arb_status(),
    ) {
        let rows: Vec<TestRow> = names
            .into_iter()
            .rev()
            .map(|name| TestRow { name, status, score: None })
            .collect();
        let asc = sort_records(&rows, &SortSpec::asc("name")).unwrap();
        let desc = sort_records(&asc, &SortSpec::desc("name")).unwrap();
        let mut reversed = asc.clone();
        reversed.reverse();
        prop_assert_eq!(desc, reversed);
    }

    #[test]
    fn sorting_leaves_input_untouched(rows in arb_rows(), desc in any::<bool>()) {
        let before = rows.clone();
        let spec = if desc { SortSpec::desc("score") } else { SortSpec::asc("score") };
        let sorted = sort_records(&rows, &spec).unwrap();
        prop_assert_eq!(&rows, &before);
        prop_assert_eq!(sorted.len(), rows.len());

        // Rows without a score are always at the tail.
        let first_unset = sorted.iter().position(|r| r.score.is_none()).unwrap_or(sorted.len());
        prop_assert!(sorted[first_unset..].iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn pages_concatenate_to_the_full_listing(
        rows in arb_rows(),
        page_size in 1usize..8,
        status in proptest::option::of(arb_status()),
    ) {
        let mut query = ListQuery {
            filter: criteria(None, status),
            sort: Some(SortSpec::asc("name")),
            page: 0,
            page_size: Some(page_size),
        };
        let first = run_query(&rows, &query).unwrap();
        let full = sort_records(
            &filter_records(&rows, &query.filter).unwrap(),
            &SortSpec::asc("name"),
        )
        .unwrap();
        prop_assert_eq!(first.total, full.len());

        let mut joined = Vec::new();
        for page in 0..first.page_count {
            query.page = page;
            joined.extend(run_query(&rows, &query).unwrap().items);
        }
        prop_assert_eq!(joined, full);

        query.page = first.page_count;
        prop_assert!(run_query(&rows, &query).unwrap().items.is_empty());
    }
}

#[test]
fn distinct_names_generate_distinct_order() {
    let names: BTreeSet<&str> = ["b", "B", "a"].into_iter().collect();
    let rows: Vec<TestRow> = names
        .iter()
        .map(|n| TestRow {
            name: (*n).to_string(),
            status: "Active",
            score: None,
        })
        .collect();
    let asc = sort_records(&rows, &SortSpec::asc("name")).unwrap();
    let order: Vec<&str> = asc.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "B"]);
}
