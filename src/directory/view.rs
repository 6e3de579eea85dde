use std::sync::Arc;

use super::aggregate::{chart_data, ChartData};
use super::filters::{cycle_choice, distinct_values, Choice, FilterSelection};
use super::paginate::{clamp_page, paginate, Page, PageSize};
use super::record::{Dataset, Field, Record};

/// Table state for the Biodata tab.
///
/// Any change to the search text, a facet or the page size sends the view
/// back to page 1; moving between pages does not touch the filters.
#[derive(Debug, Clone)]
pub struct BiodataView {
    dataset: Arc<Dataset>,
    selection: FilterSelection,
    page_size: PageSize,
    page: usize,
    grade_options: Vec<Choice>,
    specialization_options: Vec<Choice>,
    /// Positions in the dataset that pass the current selection
    filtered: Vec<usize>,
}

impl BiodataView {
    pub fn new(dataset: Arc<Dataset>, page_size: PageSize) -> Self {
        let mut view = Self {
            dataset: Arc::new(Dataset::default()),
            selection: FilterSelection::default(),
            page_size,
            page: 1,
            grade_options: vec![Choice::All],
            specialization_options: vec![Choice::All],
            filtered: Vec::new(),
        };
        view.set_dataset(dataset);
        view
    }

    /// Swap in a freshly loaded snapshot. Selections missing from the new
    /// option sets fall back to `All`.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.grade_options = distinct_values(dataset.records(), Field::Grade);
        self.specialization_options = distinct_values(dataset.records(), Field::Specialization);
        self.dataset = dataset;

        if !self.grade_options.contains(&self.selection.grade) {
            self.selection.grade = Choice::All;
        }
        if !self.specialization_options.contains(&self.selection.specialization) {
            self.selection.specialization = Choice::All;
        }
        self.refilter();
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn grade_options(&self) -> &[Choice] {
        &self.grade_options
    }

    pub fn specialization_options(&self) -> &[Choice] {
        &self.specialization_options
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.selection.search = search.into();
        self.refilter();
    }

    pub fn push_search(&mut self, c: char) {
        self.selection.search.push(c);
        self.refilter();
    }

    pub fn pop_search(&mut self) {
        if self.selection.search.pop().is_some() {
            self.refilter();
        }
    }

    pub fn set_grade(&mut self, grade: Choice) {
        self.selection.grade = grade;
        self.refilter();
    }

    pub fn cycle_grade(&mut self, forward: bool) {
        let next = cycle_choice(&self.grade_options, &self.selection.grade, forward);
        self.set_grade(next);
    }

    pub fn set_specialization(&mut self, specialization: Choice) {
        self.selection.specialization = specialization;
        self.refilter();
    }

    pub fn cycle_specialization(&mut self, forward: bool) {
        let next = cycle_choice(
            &self.specialization_options,
            &self.selection.specialization,
            forward,
        );
        self.set_specialization(next);
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    pub fn cycle_page_size(&mut self) {
        self.set_page_size(self.page_size.next());
    }

    /// Clear search and both facets
    pub fn reset(&mut self) {
        self.selection.reset();
        self.refilter();
    }

    pub fn total_pages(&self) -> usize {
        self.page().total_pages
    }

    /// Jump to a page, clamped into range
    pub fn go_to(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to(1);
    }

    pub fn last_page(&mut self) {
        self.go_to(self.total_pages());
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// All records passing the selection, in dataset order
    pub fn filtered(&self) -> Vec<&Record> {
        self.filtered.iter().map(|&i| &self.dataset.records[i]).collect()
    }

    /// The current page over dataset positions
    pub fn page(&self) -> Page<'_, usize> {
        paginate(&self.filtered, self.page, self.page_size)
    }

    pub fn page_records(&self) -> Vec<&Record> {
        self.page()
            .items
            .iter()
            .map(|&i| &self.dataset.records[i])
            .collect()
    }

    fn refilter(&mut self) {
        let selection = &self.selection;
        self.filtered = self
            .dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| selection.matches(record))
            .map(|(i, _)| i)
            .collect();
        self.page = 1;
    }
}

/// Chart state for the Infografik tab
#[derive(Debug, Clone)]
pub struct InfografikView {
    dataset: Arc<Dataset>,
    focus: Choice,
    grade_options: Vec<Choice>,
}

impl InfografikView {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let mut view = Self {
            dataset: Arc::new(Dataset::default()),
            focus: Choice::All,
            grade_options: vec![Choice::All],
        };
        view.set_dataset(dataset);
        view
    }

    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.grade_options = distinct_values(dataset.records(), Field::Grade);
        self.dataset = dataset;
        if !self.grade_options.contains(&self.focus) {
            self.focus = Choice::All;
        }
    }

    pub fn focus(&self) -> &Choice {
        &self.focus
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = cycle_choice(&self.grade_options, &self.focus, forward);
    }

    pub fn grade_options(&self) -> &[Choice] {
        &self.grade_options
    }

    pub fn chart(&self) -> ChartData {
        chart_data(self.dataset.records(), &self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fixtures::{dataset, teacher};
    use pretty_assertions::assert_eq;

    fn staff() -> Arc<Dataset> {
        Arc::new(dataset(vec![
            teacher("Ali bin Ahmad", "DG41", "Matematik"),
            teacher("Siti", "DG44", "Sains"),
            teacher("Alia", "DG41", "Sains"),
            teacher("Aminah", "DG44", "Matematik"),
            teacher("Azlan", "DG48", "Sejarah"),
        ]))
    }

    fn page_names(view: &BiodataView) -> Vec<String> {
        view.page_records().iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_paging_through_filtered_rows() {
        let mut view = BiodataView::new(staff(), PageSize::rows(2));
        assert_eq!(view.total_pages(), 3);
        assert_eq!(page_names(&view), vec!["Ali bin Ahmad", "Siti"]);

        view.last_page();
        assert_eq!(view.current_page(), 3);
        assert_eq!(page_names(&view), vec!["Azlan"]);
        assert_eq!(view.page().range(), (5, 5, 5));

        view.next_page();
        assert_eq!(view.current_page(), 3);
        view.first_page();
        view.prev_page();
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut view = BiodataView::new(staff(), PageSize::rows(2));

        view.go_to(3);
        view.push_search('a');
        assert_eq!(view.current_page(), 1);

        view.go_to(2);
        view.cycle_grade(true);
        assert_eq!(view.selection().grade, Choice::Only("DG41".to_string()));
        assert_eq!(view.current_page(), 1);
        assert_eq!(page_names(&view), vec!["Ali bin Ahmad", "Alia"]);

        view.go_to(2);
        view.cycle_page_size();
        assert_eq!(view.page_size(), PageSize::rows(10));
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_page_moves_keep_filters() {
        let mut view = BiodataView::new(staff(), PageSize::rows(1));
        view.set_specialization(Choice::Only("Sains".to_string()));
        view.next_page();

        assert_eq!(view.current_page(), 2);
        assert_eq!(page_names(&view), vec!["Alia"]);
        assert_eq!(
            view.selection().specialization,
            Choice::Only("Sains".to_string())
        );
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut view = BiodataView::new(staff(), PageSize::All);
        view.set_search("siti");
        view.set_grade(Choice::Only("DG44".to_string()));
        assert_eq!(view.filtered_len(), 1);

        view.reset();
        assert_eq!(view.selection(), &FilterSelection::default());
        assert_eq!(view.filtered_len(), 5);
        assert_eq!(view.total_pages(), 1);
    }

    #[test]
    fn test_reload_drops_vanished_choices() {
        let mut view = BiodataView::new(staff(), PageSize::default());
        view.set_grade(Choice::Only("DG48".to_string()));
        view.set_specialization(Choice::Only("Sejarah".to_string()));
        assert_eq!(view.filtered_len(), 1);

        view.set_dataset(Arc::new(dataset(vec![
            teacher("Baru", "DG41", "Sejarah"),
        ])));
        assert_eq!(view.selection().grade, Choice::All);
        assert_eq!(
            view.selection().specialization,
            Choice::Only("Sejarah".to_string())
        );
        assert_eq!(view.filtered_len(), 1);
    }

    #[test]
    fn test_pop_search_on_empty_is_noop() {
        let mut view = BiodataView::new(staff(), PageSize::rows(2));
        view.go_to(2);
        view.pop_search();
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_infografik_focus_cycles_grades() {
        let mut view = InfografikView::new(staff());
        assert_eq!(view.chart().specializations.len(), 3);

        view.cycle_focus(true);
        assert_eq!(view.focus(), &Choice::Only("DG41".to_string()));
        let chart = view.chart();
        assert_eq!(chart.total, 5);
        assert_eq!(chart.specializations.len(), 2);

        view.cycle_focus(false);
        view.cycle_focus(false);
        assert_eq!(view.focus(), &Choice::Only("DG48".to_string()));
    }
}
