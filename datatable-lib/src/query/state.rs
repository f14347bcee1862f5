//! Table query state.

use std::collections::HashMap;
use std::collections::HashSet;

use super::Direction;
use super::FilterValue;
use super::Sort;
use crate::model::RecordId;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Outcome of a [`QueryState`] mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The list query changed; the current page is no longer valid.
    Dirty,
    /// Nothing that affects the list query changed.
    Cosmetic,
}

impl Change {
    /// Returns `true` if a refetch is required.
    pub fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }
}

/// Pagination, sort, filter, search and selection state of one table.
///
/// Mutators never fail: out-of-range input is clamped or ignored. Every
/// mutation of a non-page query field moves back to the first page.
///
/// # Example
///
/// ```
/// use datatable_lib::query::{Change, Direction, QueryState};
///
/// let mut state = QueryState::new(25);
/// state.set_page(3);
/// assert_eq!(state.set_sort("name", Direction::Asc), Change::Dirty);
/// assert_eq!(state.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    sort: Option<Sort>,
    filters: HashMap<String, FilterValue>,
    search: Option<String>,
    selected: HashSet<RecordId>,
    /// Page size restored by [`QueryState::reset`].
    initial_page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// Creates a state on the first page. A zero page size falls back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new(page_size: u32) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            page: 1,
            page_size,
            sort: None,
            filters: HashMap::new(),
            search: None,
            selected: HashSet::new(),
            initial_page_size: page_size,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the current 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the number of records per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the zero-based index of the first record on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Returns the last valid page number for a total record count.
    pub fn last_page(&self, total_count: u64) -> u32 {
        let pages = total_count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Returns the current sort, if any.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Returns all active filters.
    pub fn filters(&self) -> &HashMap<String, FilterValue> {
        &self.filters
    }

    /// Returns the value of a filter.
    pub fn filter(&self, name: &str) -> Option<&FilterValue> {
        self.filters.get(name)
    }

    /// Returns the search term, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the selected record ids.
    pub fn selected(&self) -> &HashSet<RecordId> {
        &self.selected
    }

    /// Returns `true` if the record is selected.
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` if both states would issue the same list request.
    ///
    /// Selection is ignored.
    pub fn same_query(&self, other: &QueryState) -> bool {
        self.page == other.page
            && self.page_size == other.page_size
            && self.sort == other.sort
            && self.filters == other.filters
            && self.search == other.search
    }

    // =========================================================================
    // Query mutators
    // =========================================================================

    /// Sets a filter value.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Change {
        let name = name.into();
        let value = value.into();
        if self.filters.get(&name) == Some(&value) {
            return Change::Cosmetic;
        }
        self.filters.insert(name, value);
        self.restart()
    }

    /// Removes a filter.
    pub fn clear_filter(&mut self, name: &str) -> Change {
        match self.filters.remove(name) {
            Some(_) => self.restart(),
            None => Change::Cosmetic,
        }
    }

    /// Removes all filters.
    pub fn clear_filters(&mut self) -> Change {
        if self.filters.is_empty() {
            return Change::Cosmetic;
        }
        self.filters.clear();
        self.restart()
    }

    /// Sorts by a key in the given direction.
    pub fn set_sort(&mut self, key: impl Into<String>, direction: Direction) -> Change {
        let sort = Sort::new(key, direction);
        if self.sort.as_ref() == Some(&sort) {
            return Change::Cosmetic;
        }
        self.sort = Some(sort);
        self.restart()
    }

    /// Sorts ascending by a new key, or reverses the direction of the
    /// current key.
    pub fn toggle_sort(&mut self, key: impl Into<String>) -> Change {
        let key = key.into();
        let direction = match &self.sort {
            Some(sort) if sort.key == key => sort.direction.reversed(),
            _ => Direction::Asc,
        };
        self.set_sort(key, direction)
    }

    /// Removes the sort.
    pub fn clear_sort(&mut self) -> Change {
        match self.sort.take() {
            Some(_) => self.restart(),
            None => Change::Cosmetic,
        }
    }

    /// Sets the search term. A blank term clears the search.
    pub fn set_search(&mut self, term: impl Into<String>) -> Change {
        let term = term.into();
        let term = term.trim();
        let search = (!term.is_empty()).then(|| term.to_string());
        if search == self.search {
            return Change::Cosmetic;
        }
        self.search = search;
        self.restart()
    }

    /// Moves to a page. Page `0` is clamped to `1`.
    pub fn set_page(&mut self, page: u32) -> Change {
        let page = page.max(1);
        if page == self.page {
            return Change::Cosmetic;
        }
        self.page = page;
        Change::Dirty
    }

    /// Sets the page size. A zero size is ignored.
    pub fn set_page_size(&mut self, page_size: u32) -> Change {
        if page_size == 0 || page_size == self.page_size {
            return Change::Cosmetic;
        }
        self.page_size = page_size;
        self.restart()
    }

    /// Restores the initial state, clearing the selection.
    pub fn reset(&mut self) -> Change {
        let fresh = QueryState::new(self.initial_page_size);
        let changed = !self.same_query(&fresh);
        *self = fresh;
        if changed {
            Change::Dirty
        } else {
            Change::Cosmetic
        }
    }

    fn restart(&mut self) -> Change {
        self.page = 1;
        Change::Dirty
    }

    // =========================================================================
    // Selection mutators
    // =========================================================================

    /// Replaces the selection.
    pub fn select(&mut self, ids: impl IntoIterator<Item = RecordId>) -> Change {
        self.selected = ids.into_iter().collect();
        Change::Cosmetic
    }

    /// Toggles selection of a record.
    pub fn toggle_selected(&mut self, id: RecordId) -> Change {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        Change::Cosmetic
    }

    /// Removes a record from the selection.
    pub fn deselect(&mut self, id: &RecordId) -> Change {
        self.selected.remove(id);
        Change::Cosmetic
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) -> Change {
        self.selected.clear();
        Change::Cosmetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: u32) -> QueryState {
        let mut state = QueryState::new(25);
        state.set_page(page);
        state
    }

    #[test]
    fn test_defaults() {
        let state = QueryState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(state.offset(), 0);
        assert!(state.sort().is_none());
        assert!(state.filters().is_empty());

        assert_eq!(QueryState::new(0).page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_non_page_changes_reset_page() {
        let mut state = on_page(4);
        assert_eq!(state.set_filter("cascade", true), Change::Dirty);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        assert_eq!(state.set_sort("name", Direction::Desc), Change::Dirty);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        assert_eq!(state.set_search("resistor"), Change::Dirty);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        assert_eq!(state.set_page_size(50), Change::Dirty);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        assert_eq!(state.clear_filter("cascade"), Change::Dirty);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_page_resets_across_mixed_sequences() {
        let mut state = QueryState::new(10);
        let steps: [fn(&mut QueryState) -> Change; 6] = [
            |s| s.set_page(7),
            |s| s.set_filter("structural", false),
            |s| s.set_page(3),
            |s| s.toggle_sort("name"),
            |s| s.set_page(9),
            |s| s.toggle_sort("name"),
        ];

        for step in steps {
            let before = state.clone();
            step(&mut state);
            let non_page_changed = before.sort() != state.sort()
                || before.filters() != state.filters()
                || before.search() != state.search()
                || before.page_size() != state.page_size();
            if non_page_changed {
                assert_eq!(state.page(), 1);
            }
        }
    }

    #[test]
    fn test_unchanged_values_are_cosmetic() {
        let mut state = on_page(3);
        state.set_filter("cascade", true);
        state.set_page(3);

        assert_eq!(state.set_filter("cascade", true), Change::Cosmetic);
        assert_eq!(state.clear_filter("missing"), Change::Cosmetic);
        assert_eq!(state.set_page(3), Change::Cosmetic);
        assert_eq!(state.set_search("   "), Change::Cosmetic);
        assert_eq!(state.clear_sort(), Change::Cosmetic);
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_clamping() {
        let mut state = on_page(2);
        assert_eq!(state.set_page(0), Change::Dirty);
        assert_eq!(state.page(), 1);

        assert_eq!(state.set_page_size(0), Change::Cosmetic);
        assert_eq!(state.page_size(), 25);
    }

    #[test]
    fn test_toggle_sort_cycles_direction() {
        let mut state = QueryState::default();
        state.toggle_sort("name");
        assert_eq!(state.sort(), Some(&Sort::asc("name")));
        state.toggle_sort("name");
        assert_eq!(state.sort(), Some(&Sort::desc("name")));
        state.toggle_sort("name");
        assert_eq!(state.sort(), Some(&Sort::asc("name")));
        state.toggle_sort("part_count");
        assert_eq!(state.sort(), Some(&Sort::asc("part_count")));
    }

    #[test]
    fn test_search_is_trimmed() {
        let mut state = QueryState::default();
        state.set_search("  caps ");
        assert_eq!(state.search(), Some("caps"));
        assert_eq!(state.set_search(""), Change::Dirty);
        assert_eq!(state.search(), None);
    }

    #[test]
    fn test_selection_is_cosmetic() {
        let mut state = on_page(2);
        assert_eq!(
            state.select([RecordId::from(1), RecordId::from(2)]),
            Change::Cosmetic
        );
        assert_eq!(state.toggle_selected(RecordId::from(2)), Change::Cosmetic);
        assert_eq!(state.toggle_selected(RecordId::from(3)), Change::Cosmetic);
        assert!(state.is_selected(&RecordId::from(1)));
        assert!(!state.is_selected(&RecordId::from(2)));
        assert!(state.is_selected(&RecordId::from(3)));
        assert_eq!(state.page(), 2);

        state.clear_selection();
        assert!(state.selected().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut state = QueryState::new(10);
        assert_eq!(state.reset(), Change::Cosmetic);

        state.set_page_size(50);
        state.set_filter("cascade", true);
        state.select([RecordId::from(1)]);
        assert_eq!(state.reset(), Change::Dirty);
        assert_eq!(state, QueryState::new(10));
    }

    #[test]
    fn test_last_page_and_offset() {
        let mut state = QueryState::new(25);
        assert_eq!(state.last_page(0), 1);
        assert_eq!(state.last_page(25), 1);
        assert_eq!(state.last_page(26), 2);
        state.set_page(3);
        assert_eq!(state.offset(), 50);
    }

    #[test]
    fn test_same_query_ignores_selection() {
        let mut a = QueryState::default();
        let b = a.clone();
        a.select([RecordId::from(5)]);
        assert!(a.same_query(&b));
        a.set_page(2);
        assert!(!a.same_query(&b));
    }
}
