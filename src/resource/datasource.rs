//! Data Sources
//!
//! Where a section's records come from and where its mutations go. The
//! REST implementation talks to the studio backend; tests use the
//! in-memory one.

use super::manager::Mutation;
use super::record::{Record, RecordId, ID_FIELD};
use crate::api::client::ApiClient;
use anyhow::{Context, Result};
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;

/// Remote store for one record type
pub trait DataSource<R: Record>: Send + Sync + 'static {
    /// Fetch the whole collection in backend order
    fn list(&self) -> impl Future<Output = Result<Vec<R>>> + Send;

    fn create(&self, record: &R) -> impl Future<Output = Result<()>> + Send;

    fn update(&self, record: &R) -> impl Future<Output = Result<()>> + Send;

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;
}

/// Send a manager mutation to its data source
pub async fn persist<R: Record, D: DataSource<R>>(source: &D, mutation: &Mutation<R>) -> Result<()> {
    match mutation {
        Mutation::Create(record) => source.create(record).await,
        Mutation::Update(record) => source.update(record).await,
        Mutation::Delete(id) => source.delete(id).await,
    }
}

/// JSON REST collection at `<base>/<endpoint>`
pub struct RestDataSource<R> {
    client: ApiClient,
    endpoint: String,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RestDataSource<R> {
    pub fn new(client: ApiClient, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            _record: PhantomData,
        }
    }
}

/// Decode a list response. Rows that do not fit the record type are
/// skipped so one bad row cannot blank the section.
pub fn parse_collection<R: Record>(body: Value) -> Result<Vec<R>> {
    let rows = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        other => anyhow::bail!(
            "Expected a JSON array from the {} endpoint, got {}",
            R::RESOURCE_KEY,
            json_kind(&other)
        ),
    };

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<R>(row) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("{}: skipping malformed row: {}", R::RESOURCE_KEY, e),
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Create payload: every field except the client-side id
fn create_body<R: Record>(record: &R) -> Result<Value> {
    let mut body = serde_json::to_value(record).context("Failed to serialize record")?;
    if let Value::Object(ref mut map) = body {
        map.remove(ID_FIELD);
    }
    Ok(body)
}

impl<R: Record> DataSource<R> for RestDataSource<R> {
    async fn list(&self) -> Result<Vec<R>> {
        let url = self.client.endpoint_url(&self.endpoint);
        let body = self.client.get(&url).await?;
        parse_collection(body)
    }

    async fn create(&self, record: &R) -> Result<()> {
        let url = self.client.endpoint_url(&self.endpoint);
        let body = create_body(record)?;
        self.client.post(&url, &body).await?;
        Ok(())
    }

    async fn update(&self, record: &R) -> Result<()> {
        let url = self.client.record_url(&self.endpoint, &record.id().to_string());
        let body = serde_json::to_value(record).context("Failed to serialize record")?;
        self.client.put(&url, &body).await?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let url = self.client.record_url(&self.endpoint, &id.to_string());
        self.client.delete(&url).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::record::{merge_record, Collection, Contact, Expenditure};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn source<R: Record>(server: &MockServer, endpoint: &str) -> RestDataSource<R> {
        let client = ApiClient::new(&format!("{}/api", server.uri()), None).unwrap();
        RestDataSource::new(client, endpoint)
    }

    fn contact(id: &str, name: &str) -> Contact {
        serde_json::from_value(json!({"id": id, "fullName": name, "createdAt": "2024-01-01"}))
            .unwrap()
    }

    #[test]
    fn test_null_body_is_an_empty_collection() {
        let records: Vec<Contact> = parse_collection(Value::Null).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_object_body_is_rejected() {
        let result: Result<Vec<Contact>> = parse_collection(json!({"error": "nope"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let records: Vec<Contact> = parse_collection(json!([
            {"id": "1", "fullName": "A"},
            {"fullName": "no id"},
            {"id": 3, "fullName": "C"}
        ]))
        .unwrap();

        let ids: Vec<&RecordId> = records.iter().map(|r| &r.id).collect();
        assert_eq!(ids, vec![&RecordId::from("1"), &RecordId::Num(3)]);
    }

    #[tokio::test]
    async fn test_list_reads_endpoint_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Contact"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "b", "fullName": "Second"},
                {"id": "a", "fullName": "First"}
            ])))
            .mount(&server)
            .await;

        let records = source::<Contact>(&server, "Contact").list().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name, "Second");
        assert_eq!(records[1].full_name, "First");
    }

    #[tokio::test]
    async fn test_create_posts_without_local_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Contact"))
            .and(body_partial_json(json!({"fullName": "Rahim", "createdAt": "2024-01-01"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "srv-1"})))
            .expect(1)
            .mount(&server)
            .await;

        source::<Contact>(&server, "Contact")
            .create(&contact("local-1", "Rahim"))
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_update_puts_full_record_to_id_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/Expenditure/42"))
            .and(body_partial_json(json!({
                "id": 42,
                "title": "Studio rent",
                "expenditure": "expenditure"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let record: Expenditure = serde_json::from_value(json!({
            "id": 42,
            "title": "Studio rent",
            "amount": 1200,
            "expenditure": "expenditure"
        }))
        .unwrap();

        source::<Expenditure>(&server, "Expenditure")
            .update(&record)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edited_record_keeps_numeric_id_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/Collection/42"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let fetched: Collection =
            serde_json::from_value(json!({"id": 42, "name": "Rahim advance", "amount": 15200}))
                .unwrap();
        let delta = json!({"name": "Rahim final"}).as_object().cloned().unwrap();
        let edited = merge_record(&fetched, &delta).unwrap();

        persist(
            &source::<Collection>(&server, "Collection"),
            &Mutation::Update(edited),
        )
        .await
        .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["id"], json!(42));
        assert_eq!(body["name"], "Rahim final");
    }

    #[tokio::test]
    async fn test_persist_delete_reports_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/Contact/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let rest = source::<Contact>(&server, "Contact");
        let result = persist(&rest, &Mutation::Delete(RecordId::Num(7))).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
