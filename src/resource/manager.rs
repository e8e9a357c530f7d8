//! List Manager
//!
//! Generic create/read/update/delete state for one studio section. The
//! manager owns the in-memory collection, the modal/edit selection and the
//! advisory loading counter. It never talks to the network itself: every
//! mutating call applies its change locally right away and hands back a
//! [`Mutation`] for the caller to persist.

use super::record::{merge_record, new_record, FormData, Record, RecordId};
use anyhow::Result;

/// What the modal overlay is doing
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<R> {
    Closed,
    Creating,
    /// Edit selection plus the collection slot it was opened from
    Editing { record: R, position: usize },
}

/// Answer from the delete confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Persistence intent produced by a local mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R> {
    Create(R),
    Update(R),
    Delete(RecordId),
}

impl<R: Record> Mutation<R> {
    pub fn record_id(&self) -> &RecordId {
        match self {
            Mutation::Create(record) | Mutation::Update(record) => record.id(),
            Mutation::Delete(id) => id,
        }
    }
}

/// Collection + modal + loading state for a single resource type
#[derive(Debug, Clone)]
pub struct ListManager<R> {
    items: Vec<R>,
    modal: ModalState<R>,
    /// Outstanding fetch/persist calls; loading while non-zero
    in_flight: usize,
}

impl<R: Record> Default for ListManager<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ListManager<R> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            modal: ModalState::Closed,
            in_flight: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_modal_open(&self) -> bool {
        !matches!(self.modal, ModalState::Closed)
    }

    /// Current edit selection, if the modal is in edit mode
    pub fn editing(&self) -> Option<&R> {
        match &self.modal {
            ModalState::Editing { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Records in display order
    pub fn display_items(&self, reverse: bool) -> Vec<&R> {
        if reverse {
            self.items.iter().rev().collect()
        } else {
            self.items.iter().collect()
        }
    }

    /// Collection slot shown at `display_index`
    pub fn storage_index(&self, display_index: usize, reverse: bool) -> Option<usize> {
        let len = self.items.len();
        if display_index >= len {
            return None;
        }
        Some(if reverse {
            len - 1 - display_index
        } else {
            display_index
        })
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn begin_operation(&mut self) {
        self.in_flight += 1;
    }

    pub fn end_operation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Mark the initial fetch as started
    pub fn begin_load(&mut self) {
        self.begin_operation();
    }

    /// Install the result of the initial fetch. A failed fetch leaves an
    /// empty collection.
    pub fn initialize(&mut self, fetched: Result<Vec<R>>) {
        match fetched {
            Ok(records) => {
                tracing::debug!("{}: loaded {} records", R::RESOURCE_KEY, records.len());
                self.items = records;
            },
            Err(e) => {
                tracing::warn!("{}: initial fetch failed: {:#}", R::RESOURCE_KEY, e);
                self.items.clear();
            },
        }
        self.end_operation();
    }

    // =========================================================================
    // Modal
    // =========================================================================

    pub fn open_create(&mut self) {
        self.modal = ModalState::Creating;
    }

    /// Select the record at `position` for editing. Out of range leaves
    /// the modal untouched.
    pub fn open_edit(&mut self, position: usize) -> Option<&R> {
        let record = self.items.get(position)?.clone();
        self.modal = ModalState::Editing { record, position };
        self.editing()
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Remove the first record with `id` once the operator confirms.
    /// The returned delete must be persisted; the local removal stands
    /// whatever the backend says.
    pub fn request_delete(
        &mut self,
        id: &RecordId,
        confirmation: Confirmation,
    ) -> Option<Mutation<R>> {
        if confirmation == Confirmation::Declined {
            return None;
        }

        self.begin_operation();
        match self.items.iter().position(|r| r.id() == id) {
            Some(pos) => {
                self.items.remove(pos);
            },
            None => {
                tracing::debug!("{}: delete of unknown id {}", R::RESOURCE_KEY, id);
            },
        }

        Some(Mutation::Delete(id.clone()))
    }

    /// Apply a submitted form: merge into the edit selection, or prepend a
    /// new record. Closes the modal. Fails only when the form data cannot
    /// form a record, in which case nothing changes.
    ///
    /// An edit replaces the slot it was opened from. If that slot no longer
    /// holds the same id, the first record with the id is replaced instead.
    pub fn submit(&mut self, form: &FormData) -> Result<Mutation<R>> {
        let mutation = match &self.modal {
            ModalState::Editing { record, position } => {
                let merged = merge_record(record, form)?;
                let slot = match self.items.get(*position) {
                    Some(current) if current.id() == record.id() => Some(*position),
                    _ => self.items.iter().position(|r| r.id() == record.id()),
                };
                match slot {
                    Some(pos) => self.items[pos] = merged.clone(),
                    None => {
                        tracing::debug!(
                            "{}: edited record {} is no longer listed",
                            R::RESOURCE_KEY,
                            record.id()
                        );
                    },
                }
                Mutation::Update(merged)
            },
            ModalState::Creating | ModalState::Closed => {
                let record: R = new_record(form)?;
                self.items.insert(0, record.clone());
                Mutation::Create(record)
            },
        };

        self.begin_operation();
        self.close_modal();
        Ok(mutation)
    }
}
