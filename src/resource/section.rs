//! Sections
//!
//! A [`Section`] binds a [`ListManager`] to its [`DataSource`] and to the
//! resource's row/form definitions. Backend calls run as spawned tasks;
//! their results come back over oneshot channels that the event loop
//! drains through [`SectionView::poll`], so the UI never blocks on I/O.

use super::datasource::{persist, DataSource, RestDataSource};
use super::form::FormState;
use super::manager::{Confirmation, ListManager, Mutation};
use super::record::{
    to_json, Booking, Collection, Contact, Expenditure, FormData, Other, Photo, Record, RecordId,
};
use super::registry::{get_resource, ResourceDef, SummaryKind};
use super::{extract_json_value, format_money};
use crate::api::client::{format_api_error, ApiClient};
use crate::notification::{NotificationManager, OperationType};
use anyhow::{Context, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use uuid::Uuid;

/// Object-safe view of a section so the app can hold all six together
pub trait SectionView: Send {
    fn key(&self) -> &'static str;

    fn def(&self) -> &'static ResourceDef;

    /// Discard local state and fetch the collection again
    fn mount(&mut self, notifications: &mut NotificationManager);

    /// Drain finished backend calls. Returns true if anything changed.
    fn poll(&mut self, notifications: &mut NotificationManager) -> bool;

    fn is_loading(&self) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    /// Records as JSON, in display order
    fn rows(&self) -> Vec<Value>;

    /// Human label for the record at a display index
    fn label_at(&self, index: usize) -> Option<String>;

    fn open_create(&mut self) -> FormState;

    fn open_edit(&mut self, index: usize) -> Option<FormState>;

    fn close_modal(&mut self);

    fn is_modal_open(&self) -> bool;

    /// Apply the form locally and persist it in the background
    fn submit(&mut self, form: &FormData, notifications: &mut NotificationManager) -> Result<()>;

    /// Identifier of the record at a display index
    fn id_at(&self, index: usize) -> Option<RecordId>;

    fn request_delete(
        &mut self,
        id: &RecordId,
        confirmation: Confirmation,
        notifications: &mut NotificationManager,
    );

    /// Dashboard card value, if the resource defines one
    fn summary(&self) -> Option<(String, String)>;
}

/// A backend call whose result has not been collected yet
struct PendingCall<T> {
    notification: Uuid,
    /// Mount the call was issued under
    generation: u64,
    rx: oneshot::Receiver<Result<T>>,
}

pub struct Section<R: Record, D: DataSource<R>> {
    def: &'static ResourceDef,
    manager: ListManager<R>,
    source: Arc<D>,
    generation: u64,
    fetch: Option<PendingCall<Vec<R>>>,
    writes: Vec<PendingCall<()>>,
}

fn spawn_call<T, F>(call: F) -> oneshot::Receiver<Result<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        // Receiver is gone when the section was remounted
        let _ = tx.send(call.await);
    });
    rx
}

impl<R: Record, D: DataSource<R>> Section<R, D> {
    pub fn new(source: D) -> Result<Self> {
        let def = get_resource(R::RESOURCE_KEY)
            .with_context(|| format!("No resource definition for {}", R::RESOURCE_KEY))?;

        Ok(Self {
            def,
            manager: ListManager::new(),
            source: Arc::new(source),
            generation: 0,
            fetch: None,
            writes: Vec::new(),
        })
    }

    fn record_at(&self, index: usize) -> Option<&R> {
        let position = self.manager.storage_index(index, self.def.reverse_display)?;
        self.manager.items().get(position)
    }

    fn label_for(&self, record: &R) -> String {
        let label = extract_json_value(&to_json(record), &self.def.name_field);
        if label.is_empty() || label == "-" {
            record.id().to_string()
        } else {
            label
        }
    }

    /// Spawn the remote half of a local mutation
    fn dispatch(&mut self, mutation: Mutation<R>, notifications: &mut NotificationManager) {
        let (operation, subject) = match &mutation {
            Mutation::Create(record) => (OperationType::Create, self.label_for(record)),
            Mutation::Update(record) => (OperationType::Update, self.label_for(record)),
            Mutation::Delete(id) => (OperationType::Delete, id.to_string()),
        };
        tracing::info!(
            "{}: {} {}",
            self.def.display_name,
            operation.present_participle(),
            mutation.record_id()
        );

        let notification = notifications.create_notification(
            operation,
            self.def.display_name.clone(),
            subject,
        );
        let source = Arc::clone(&self.source);
        let rx = spawn_call(async move { persist(source.as_ref(), &mutation).await });

        self.writes.push(PendingCall {
            notification,
            generation: self.generation,
            rx,
        });
    }

    fn poll_fetch(&mut self, notifications: &mut NotificationManager) -> bool {
        let Some(pending) = self.fetch.as_mut() else {
            return false;
        };

        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(anyhow::anyhow!("Fetch task ended without a result")),
        };

        let notification = pending.notification;
        self.fetch = None;
        match &result {
            Ok(_) => notifications.mark_success(notification),
            Err(e) => notifications.mark_error(notification, format_api_error(e)),
        }
        self.manager.initialize(result);
        true
    }

    fn poll_writes(&mut self, notifications: &mut NotificationManager) -> bool {
        let mut changed = false;
        let mut still_pending = Vec::with_capacity(self.writes.len());

        for mut pending in std::mem::take(&mut self.writes) {
            let result = match pending.rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => {
                    still_pending.push(pending);
                    continue;
                },
                Err(TryRecvError::Closed) => {
                    Err(anyhow::anyhow!("Persistence task ended without a result"))
                },
            };

            match result {
                Ok(()) => notifications.mark_success(pending.notification),
                Err(e) => {
                    tracing::error!("{}: failed to persist change: {:#}", self.def.display_name, e);
                    notifications.mark_error(pending.notification, format_api_error(&e));
                },
            }
            if pending.generation == self.generation {
                self.manager.end_operation();
            }
            changed = true;
        }

        self.writes = still_pending;
        changed
    }
}

impl<R: Record, D: DataSource<R>> SectionView for Section<R, D> {
    fn key(&self) -> &'static str {
        R::RESOURCE_KEY
    }

    fn def(&self) -> &'static ResourceDef {
        self.def
    }

    fn mount(&mut self, notifications: &mut NotificationManager) {
        self.generation += 1;
        self.manager = ListManager::new();
        self.manager.begin_load();

        if let Some(stale) = self.fetch.take() {
            notifications.mark_error(stale.notification, "Superseded by a newer load".to_string());
        }

        let notification = notifications.create_notification(
            OperationType::Load,
            self.def.display_name.clone(),
            self.def.display_name.clone(),
        );
        let source = Arc::clone(&self.source);
        let rx = spawn_call(async move { source.list().await });

        self.fetch = Some(PendingCall {
            notification,
            generation: self.generation,
            rx,
        });
    }

    fn poll(&mut self, notifications: &mut NotificationManager) -> bool {
        let fetched = self.poll_fetch(notifications);
        let written = self.poll_writes(notifications);
        fetched || written
    }

    fn is_loading(&self) -> bool {
        self.manager.is_loading()
    }

    fn len(&self) -> usize {
        self.manager.len()
    }

    fn is_empty(&self) -> bool {
        self.manager.is_empty()
    }

    fn rows(&self) -> Vec<Value> {
        self.manager
            .display_items(self.def.reverse_display)
            .into_iter()
            .map(to_json)
            .collect()
    }

    fn label_at(&self, index: usize) -> Option<String> {
        self.record_at(index).map(|r| self.label_for(r))
    }

    fn open_create(&mut self) -> FormState {
        self.manager.open_create();
        FormState::for_create(&self.def.fields)
    }

    fn open_edit(&mut self, index: usize) -> Option<FormState> {
        let position = self.manager.storage_index(index, self.def.reverse_display)?;
        let record = self.manager.open_edit(position)?;
        Some(FormState::for_edit(&self.def.fields, record))
    }

    fn close_modal(&mut self) {
        self.manager.close_modal();
    }

    fn is_modal_open(&self) -> bool {
        self.manager.is_modal_open()
    }

    fn submit(&mut self, form: &FormData, notifications: &mut NotificationManager) -> Result<()> {
        let mutation = self.manager.submit(form)?;
        self.dispatch(mutation, notifications);
        Ok(())
    }

    fn id_at(&self, index: usize) -> Option<RecordId> {
        self.record_at(index).map(|r| r.id().clone())
    }

    fn request_delete(
        &mut self,
        id: &RecordId,
        confirmation: Confirmation,
        notifications: &mut NotificationManager,
    ) {
        if let Some(mutation) = self.manager.request_delete(id, confirmation) {
            self.dispatch(mutation, notifications);
        }
    }

    fn summary(&self) -> Option<(String, String)> {
        let summary = self.def.summary.as_ref()?;
        let value = match summary.kind {
            SummaryKind::Count => self.manager.len().to_string(),
            SummaryKind::Sum => {
                let field = summary.field.as_deref().unwrap_or("amount");
                let total: f64 = self
                    .manager
                    .items()
                    .iter()
                    .map(|r| match to_json(r).get(field) {
                        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
                        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
                        _ => 0.0,
                    })
                    .sum();
                format_money(total)
            },
        };
        Some((summary.label.clone(), value))
    }
}

/// One REST-backed section per studio resource, in sidebar order
pub fn rest_sections(client: &ApiClient) -> Result<Vec<Box<dyn SectionView>>> {
    fn section<R: Record>(client: &ApiClient) -> Result<Box<dyn SectionView>> {
        let def = get_resource(R::RESOURCE_KEY)
            .with_context(|| format!("No resource definition for {}", R::RESOURCE_KEY))?;
        let source = RestDataSource::<R>::new(client.clone(), &def.endpoint);
        Ok(Box::new(Section::new(source)?))
    }

    Ok(vec![
        section::<Booking>(client)?,
        section::<Contact>(client)?,
        section::<Photo>(client)?,
        section::<Collection>(client)?,
        section::<Expenditure>(client)?,
        section::<Other>(client)?,
    ])
}
