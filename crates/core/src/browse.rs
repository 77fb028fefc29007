//! Browse flow: fetch, filter and summarize school records.
//!
//! [`BrowseState`] is owned by a single listing view. The fetched set is
//! replaced wholesale on every load and the visible subset is recomputed
//! from the full set on every filter change.

use crate::filter::{city_options, SchoolFilter, SchoolStats};
use crate::school::School;
use crate::store::RecordStore;

#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    records: Vec<School>,
    filter: SchoolFilter,
    /// Indices into `records` that pass `filter`.
    visible: Vec<usize>,
    fetch_failed: bool,
}

impl BrowseState {
    /// Start from an already-fetched record set with no filter applied.
    pub fn from_records(records: Vec<School>) -> Self {
        let mut state = Self::default();
        state.replace_records(records);
        state
    }

    /// Fetch every record, newest first.
    ///
    /// A store failure is logged and yields an empty state with
    /// [`fetch_failed`](Self::fetch_failed) set.
    pub async fn load(store: &dyn RecordStore) -> Self {
        match store.list_newest_first().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Fetched school records");
                Self::from_records(records)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching schools");
                Self {
                    fetch_failed: true,
                    ..Self::default()
                }
            }
        }
    }

    // ---- transitions ----

    pub fn replace_records(&mut self, records: Vec<School>) {
        self.records = records;
        self.fetch_failed = false;
        self.recompute();
    }

    pub fn set_term(&mut self, term: Option<String>) {
        self.filter.term = term;
        self.recompute();
    }

    pub fn set_city(&mut self, city: Option<String>) {
        self.filter.city = city;
        self.recompute();
    }

    pub fn set_filter(&mut self, filter: SchoolFilter) {
        self.filter = filter;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(SchoolFilter::default());
    }

    fn recompute(&mut self) {
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, s)| self.filter.matches(s))
            .map(|(i, _)| i)
            .collect();
    }

    // ---- views ----

    pub fn visible(&self) -> Vec<&School> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn showing(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[School] {
        &self.records
    }

    pub fn filter(&self) -> &SchoolFilter {
        &self.filter
    }

    /// Aggregates over the full set, independent of the active filter.
    pub fn stats(&self) -> SchoolStats {
        SchoolStats::from_records(&self.records)
    }

    pub fn city_options(&self) -> Vec<String> {
        city_options(&self.records)
    }

    pub fn fetch_failed(&self) -> bool {
        self.fetch_failed
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::StoreError;
    use crate::filter::tests::school;
    use crate::school::NewSchool;

    struct FixedStore(Result<Vec<School>, StoreError>);

    #[async_trait]
    impl RecordStore for FixedStore {
        async fn insert(&self, _school: &NewSchool) -> Result<School, StoreError> {
            Err(StoreError::Rejected("read-only".into()))
        }

        async fn list_newest_first(&self) -> Result<Vec<School>, StoreError> {
            self.0.clone()
        }
    }

    fn five_schools() -> Vec<School> {
        vec![
            school(5, "Oak Hill", "Pune", "MH"),
            school(4, "Lotus Vale", "Delhi", "DL"),
            school(3, "Cedar Park", "Pune", "MH"),
            school(2, "Birch Row", "Mumbai", "MH"),
            school(1, "Elm Court", "Delhi", "DL"),
        ]
    }

    fn visible_ids(state: &BrowseState) -> Vec<i64> {
        state.visible().iter().map(|s| s.id).collect()
    }

    #[test]
    fn unfiltered_state_shows_everything() {
        let state = BrowseState::from_records(five_schools());
        assert_eq!(visible_ids(&state), vec![5, 4, 3, 2, 1]);
        assert_eq!(state.showing(), 5);
        assert_eq!(state.total(), 5);
    }

    #[test]
    fn transitions_recompute_from_full_set() {
        let mut state = BrowseState::from_records(five_schools());

        state.set_term(Some("oak".into()));
        assert_eq!(visible_ids(&state), vec![5]);

        // Widening the term must bring back records the narrower term hid.
        state.set_term(Some("l".into()));
        assert_eq!(visible_ids(&state), vec![5, 4, 1]);

        state.set_city(Some("Delhi".into()));
        assert_eq!(visible_ids(&state), vec![4, 1]);

        state.clear_filters();
        assert_eq!(visible_ids(&state), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn stats_ignore_active_filter() {
        let mut state = BrowseState::from_records(five_schools());
        state.set_city(Some("Mumbai".into()));
        assert_eq!(state.showing(), 1);
        let stats = state.stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.cities, 3);
        assert_eq!(stats.states, 2);
    }

    #[test]
    fn replacing_records_keeps_filter() {
        let mut state = BrowseState::from_records(five_schools());
        state.set_city(Some("Pune".into()));
        state.replace_records(vec![school(9, "New", "Pune", "MH"), school(8, "Other", "Goa", "GA")]);
        assert_eq!(visible_ids(&state), vec![9]);
        assert_eq!(state.city_options(), vec!["Pune", "Goa"]);
    }

    #[tokio::test]
    async fn load_orders_as_store_returns() {
        let store = FixedStore(Ok(five_schools()));
        let state = BrowseState::load(&store).await;
        assert!(!state.fetch_failed());
        assert_eq!(visible_ids(&state), vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn load_failure_renders_empty() {
        let store = FixedStore(Err(StoreError::Unavailable("connection refused".into())));
        let state = BrowseState::load(&store).await;
        assert!(state.fetch_failed());
        assert_eq!(state.total(), 0);
        assert!(state.visible().is_empty());
        assert_eq!(state.stats(), SchoolStats::default());
    }
}
