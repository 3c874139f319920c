//! Filtering, free-text search and statistics over in-memory record sets.
//!
//! Every console table (offenses, users, drivers) goes through the same
//! [`QueryEngine`]; entities only differ in the [`Record`] adapter that
//! projects their fields.
//!
//! ```text
//! keep(r) = (every non-"all" filter equals r's projection)
//!         ∧ (search empty ∨ some searchable field contains search, case-insensitive)
//! ```
//!
//! Statistics are always tallied over the whole collection handed in, never
//! over the filtered rows.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Wire sentinel meaning "no constraint on this key".
pub const ALL: &str = "all";

/// One filter slot: either unconstrained or pinned to an exact projection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn accepts(&self, projected: Option<&str>) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(want) => projected == Some(want.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        if s == ALL {
            Selector::All
        } else {
            Selector::Only(s)
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::from(s.to_string())
    }
}

impl From<Selector> for String {
    fn from(s: Selector) -> Self {
        match s {
            Selector::All => ALL.to_string(),
            Selector::Only(v) => v,
        }
    }
}

/// Active equality constraints plus the free-text query.
///
/// Keys missing from `filters` behave exactly like keys set to `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub filters: BTreeMap<String, Selector>,
    #[serde(default)]
    pub search: String,
}

impl FilterSpec {
    /// Canonical unconstrained spec for an entity.
    pub fn reset<R: Record>() -> Self {
        reset_filters(R::FILTER_KEYS)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Selector>) {
        self.filters.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Selector>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty() && self.filters.values().all(Selector::is_all)
    }
}

/// Every key set to `"all"`, search cleared.
pub fn reset_filters(keys: &[&str]) -> FilterSpec {
    FilterSpec {
        filters: keys
            .iter()
            .map(|k| (k.to_string(), Selector::All))
            .collect(),
        search: String::new(),
    }
}

/// Named string accessor consulted by free-text search.
pub struct SearchField<R> {
    pub name: &'static str,
    pub get: fn(&R) -> Option<&str>,
}

impl<R> Clone for SearchField<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for SearchField<R> {}

impl<R> std::fmt::Debug for SearchField<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchField").field("name", &self.name).finish()
    }
}

/// Labelled predicate tallied by [`compute_statistics`].
pub struct Predicate<R> {
    pub label: &'static str,
    pub test: fn(&R) -> bool,
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Predicate<R> {}

impl<R> std::fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate").field("label", &self.label).finish()
    }
}

/// Field adapter implemented by every entity the console lists.
pub trait Record: Sized {
    /// Keys the entity accepts as equality filters.
    const FILTER_KEYS: &'static [&'static str];

    /// Comparable projection of a filter key, `None` when the record has no
    /// such field.
    fn filter_value(&self, key: &str) -> Option<&str>;

    fn searchable_fields() -> Vec<SearchField<Self>>;

    fn statistics() -> Vec<Predicate<Self>>;
}

fn retained<R: Record>(
    record: &R,
    filters: &BTreeMap<String, Selector>,
    needle: Option<&str>,
    fields: &[SearchField<R>],
) -> bool {
    let constrained = filters
        .iter()
        .filter(|(_, sel)| !sel.is_all())
        .all(|(key, sel)| sel.accepts(record.filter_value(key)));
    if !constrained {
        return false;
    }
    match needle {
        None => true,
        Some(needle) => fields.iter().any(|f| {
            (f.get)(record)
                .map(|v| v.to_lowercase().contains(needle))
                .unwrap_or(false)
        }),
    }
}

/// Ordered subsequence of `records` satisfying `spec`.
pub fn filter<'a, R: Record>(
    records: &'a [R],
    spec: &FilterSpec,
    fields: &[SearchField<R>],
) -> Vec<&'a R> {
    let needle = if spec.search.is_empty() {
        None
    } else {
        Some(spec.search.to_lowercase())
    };
    records
        .iter()
        .filter(|r| retained(*r, &spec.filters, needle.as_deref(), fields))
        .collect()
}

/// Per-label counts over the full collection, in predicate order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statistics {
    total: usize,
    counts: Vec<(&'static str, usize)>,
}

impl Statistics {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, c)| *c)
    }

    pub fn counts(&self) -> &[(&'static str, usize)] {
        &self.counts
    }

    /// Sum of all tallies. Equals `total()` only when the predicates
    /// partition the collection.
    pub fn tallied(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for Statistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 1))?;
        map.serialize_entry("total", &self.total)?;
        for (label, count) in &self.counts {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

pub fn compute_statistics<R>(records: &[R], predicates: &[Predicate<R>]) -> Statistics {
    Statistics {
        total: records.len(),
        counts: predicates
            .iter()
            .map(|p| (p.label, records.iter().filter(|r| (p.test)(r)).count()))
            .collect(),
    }
}

/// Filtered rows together with statistics over the unfiltered input.
#[derive(Debug, Serialize)]
pub struct QueryOutcome<'a, R> {
    pub rows: Vec<&'a R>,
    pub matched: usize,
    pub statistics: Statistics,
}

/// Query engine bound to one entity's searchable fields and statistics.
#[derive(Debug, Clone)]
pub struct QueryEngine<R> {
    fields: Vec<SearchField<R>>,
    predicates: Vec<Predicate<R>>,
}

impl<R: Record> Default for QueryEngine<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> QueryEngine<R> {
    pub fn new() -> Self {
        Self {
            fields: R::searchable_fields(),
            predicates: R::statistics(),
        }
    }

    pub fn with_predicates(mut self, predicates: Vec<Predicate<R>>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn filter<'a>(&self, records: &'a [R], spec: &FilterSpec) -> Vec<&'a R> {
        filter(records, spec, &self.fields)
    }

    pub fn statistics(&self, records: &[R]) -> Statistics {
        compute_statistics(records, &self.predicates)
    }

    pub fn run<'a>(&self, records: &'a [R], spec: &FilterSpec) -> QueryOutcome<'a, R> {
        let rows = self.filter(records, spec);
        QueryOutcome {
            matched: rows.len(),
            rows,
            statistics: self.statistics(records),
        }
    }

    pub fn reset(&self) -> FilterSpec {
        FilterSpec::reset::<R>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        kind: &'static str,
        label: Option<String>,
    }

    fn row_label(r: &Row) -> Option<&str> {
        r.label.as_deref()
    }

    impl Record for Row {
        const FILTER_KEYS: &'static [&'static str] = &["kind"];

        fn filter_value(&self, key: &str) -> Option<&str> {
            match key {
                "kind" => Some(self.kind),
                _ => None,
            }
        }

        fn searchable_fields() -> Vec<SearchField<Self>> {
            vec![SearchField {
                name: "label",
                get: row_label,
            }]
        }

        fn statistics() -> Vec<Predicate<Self>> {
            vec![
                Predicate {
                    label: "a",
                    test: |r: &Row| r.kind == "a",
                },
                Predicate {
                    label: "labelled",
                    test: |r: &Row| r.label.is_some(),
                },
            ]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                kind: "a",
                label: Some("Alpha".into()),
            },
            Row {
                kind: "b",
                label: None,
            },
            Row {
                kind: "a",
                label: Some("gamma".into()),
            },
        ]
    }

    #[test]
    fn selector_all_sentinel_round_trips_through_json() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"filters":{"kind":"all","other":"x"}}"#).unwrap();
        assert_eq!(spec.filters["kind"], Selector::All);
        assert_eq!(spec.filters["other"], Selector::Only("x".into()));
        assert_eq!(spec.search, "");
        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["filters"]["kind"], "all");
    }

    #[test]
    fn unknown_filter_key_excludes_everything() {
        let spec = FilterSpec::default().with("colour", "red");
        assert!(filter(&rows(), &spec, &Row::searchable_fields()).is_empty());
    }

    #[test]
    fn missing_search_field_never_matches() {
        let data = rows();
        let spec = FilterSpec::default().with_search("a");
        let got = filter(&data, &spec, &Row::searchable_fields());
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|r| r.label.is_some()));
    }

    #[test]
    fn search_is_case_insensitive() {
        let data = rows();
        let spec = FilterSpec::default().with_search("ALPH");
        let got = filter(&data, &spec, &Row::searchable_fields());
        assert_eq!(got, vec![&data[0]]);
    }

    #[test]
    fn run_keeps_statistics_unfiltered() {
        let data = rows();
        let engine = QueryEngine::<Row>::new();
        let out = engine.run(&data, &FilterSpec::default().with("kind", "b"));
        assert_eq!(out.matched, 1);
        assert_eq!(out.statistics.total(), 3);
        assert_eq!(out.statistics.get("a"), Some(2));
        assert_eq!(out.statistics.get("labelled"), Some(2));
        assert_eq!(out.statistics.get("nope"), None);
    }

    #[test]
    fn statistics_serialize_in_predicate_order() {
        let stats = compute_statistics(&rows(), &Row::statistics());
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"total":3,"a":2,"labelled":2}"#);
    }

    #[test]
    fn reset_sets_every_key_to_all() {
        let spec = QueryEngine::<Row>::new().reset();
        assert!(spec.is_unconstrained());
        assert_eq!(spec.filters.len(), 1);
        assert_eq!(spec.filters["kind"], Selector::All);
    }
}
