//! Single-select Area picker state.

use crate::dataset::Dataset;

/// Sorted distinct areas with exactly one selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaSelector {
    options: Vec<String>,
    index: usize,
}

impl AreaSelector {
    /// `None` when the dataset has no areas; nothing can be selected then.
    pub fn new(dataset: &Dataset) -> Option<Self> {
        Self::from_options(dataset.areas())
    }

    /// Build from an option list; the list is sorted and deduplicated.
    pub fn from_options(mut options: Vec<String>) -> Option<Self> {
        options.sort();
        options.dedup();
        if options.is_empty() {
            return None;
        }
        Some(Self { options, index: 0 })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> &str {
        &self.options[self.index]
    }

    /// Move down one option. Returns true if the selection changed.
    pub fn select_next(&mut self) -> bool {
        if self.index + 1 < self.options.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move up one option. Returns true if the selection changed.
    pub fn select_prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn select_first(&mut self) -> bool {
        let changed = self.index != 0;
        self.index = 0;
        changed
    }

    pub fn select_last(&mut self) -> bool {
        let last = self.options.len() - 1;
        let changed = self.index != last;
        self.index = last;
        changed
    }

    /// Select an option by name. Returns false (selection unchanged) if absent.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.options.binary_search_by(|o| o.as_str().cmp(name)) {
            Ok(i) => {
                self.index = i;
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(names: &[&str]) -> AreaSelector {
        AreaSelector::from_options(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn defaults_to_first_alphabetically() {
        let s = selector(&["West", "East", "North", "East"]);
        assert_eq!(s.options(), &["East", "North", "West"]);
        assert_eq!(s.selected(), "East");
    }

    #[test]
    fn empty_has_no_selector() {
        assert!(AreaSelector::from_options(Vec::new()).is_none());
        assert!(AreaSelector::new(&Dataset::empty()).is_none());
    }

    #[test]
    fn navigation_is_clamped() {
        let mut s = selector(&["A", "B"]);
        assert!(!s.select_prev());
        assert!(s.select_next());
        assert_eq!(s.selected(), "B");
        assert!(!s.select_next());
        assert!(s.select_first());
        assert!(s.select_last());
        assert!(!s.select_last());
    }

    #[test]
    fn select_by_name_restores_known_areas_only() {
        let mut s = selector(&["East", "North", "West"]);
        assert!(s.select_by_name("West"));
        assert_eq!(s.index(), 2);
        assert!(!s.select_by_name("Atlantis"));
        assert_eq!(s.selected(), "West");
    }
}
