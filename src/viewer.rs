//! Master-detail viewer state: which interview is open and the ordered ids
//! the user can step through from it.

use serde::Serialize;

use crate::models::InterviewRecord;

/// Detail viewer state.
///
/// `scoped_ids` is a snapshot taken by [`DetailViewer::open`]. It is not kept
/// in sync with the interview list; the next `open` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailViewer {
    is_open: bool,
    current_id: Option<String>,
    scoped_ids: Vec<String>,
}

/// Outcome of looking up the open interview in the interview list.
#[derive(Debug, PartialEq)]
pub enum DetailLookup<'a> {
    Closed,
    /// The id is no longer in the list (e.g. it was removed elsewhere).
    NotFound(&'a str),
    Found(&'a InterviewRecord),
}

impl DetailViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn scoped_ids(&self) -> &[String] {
        &self.scoped_ids
    }

    /// Show `id`, replacing any previous scope wholesale.
    pub fn open(&mut self, id: impl Into<String>, scoped_ids: Vec<String>) {
        self.current_id = Some(id.into());
        self.scoped_ids = scoped_ids;
        self.is_open = true;
    }

    /// Hide the viewer. The scope is cleared too; `open` always sets a new one.
    pub fn close(&mut self) {
        self.is_open = false;
        self.current_id = None;
        self.scoped_ids.clear();
    }

    /// Move to the next scoped id. Saturates at the end of the scope.
    pub fn navigate_next(&mut self) {
        if let Some(index) = self.current_index() {
            if let Some(next) = self.scoped_ids.get(index + 1) {
                self.current_id = Some(next.clone());
            }
        }
    }

    /// Move to the previous scoped id. Saturates at the start of the scope.
    pub fn navigate_prev(&mut self) {
        if let Some(index) = self.current_index() {
            if index > 0 {
                self.current_id = Some(self.scoped_ids[index - 1].clone());
            }
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_index()
            .is_some_and(|index| index + 1 < self.scoped_ids.len())
    }

    pub fn has_prev(&self) -> bool {
        self.current_index().is_some_and(|index| index > 0)
    }

    /// 1-based position of the current id and the scope length.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_index()
            .map(|index| (index + 1, self.scoped_ids.len()))
    }

    /// Find the open interview in `records`.
    pub fn resolve<'a>(&'a self, records: &'a [InterviewRecord]) -> DetailLookup<'a> {
        if !self.is_open {
            return DetailLookup::Closed;
        }
        let Some(id) = self.current_id.as_deref() else {
            return DetailLookup::Closed;
        };
        match records.iter().find(|r| r.id == id) {
            Some(record) => DetailLookup::Found(record),
            None => DetailLookup::NotFound(id),
        }
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current_id.as_deref()?;
        self.scoped_ids.iter().position(|id| id == current)
    }
}
