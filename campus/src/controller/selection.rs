use std::collections::BTreeSet;

/// Checked rows for bulk actions.
///
/// Select-all only ever covers the rows currently displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// If every displayed row is already selected, clear the selection;
    /// otherwise select exactly the displayed rows.
    pub fn toggle_all(&mut self, visible: &[String]) {
        let all_selected =
            !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible.iter().cloned().collect();
        }
    }

    pub fn is_all_selected(&self, visible: &[String]) -> bool {
        !visible.is_empty()
            && visible.len() == self.ids.len()
            && visible.iter().all(|id| self.ids.contains(id))
    }

    /// Drop ids that are no longer displayed.
    pub fn retain_visible(&mut self, visible: &[String]) {
        let visible: BTreeSet<&str> = visible.iter().map(String::as_str).collect();
        self.ids.retain(|id| visible.contains(id.as_str()));
    }

    pub fn deselect<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
