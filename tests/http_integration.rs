//! Integration tests for the studio REST wire contract using wiremock
//!
//! These tests pin down the studio backend's HTTP shapes, one section
//! endpoint at a time, using the camelCase field sets of the section
//! definitions. The binary's own request building is covered next to the
//! REST data source.

use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Wire shapes of list, create, update and delete calls
mod wire_contract_tests {
    use super::*;

    /// Listing returns a JSON array of records
    #[tokio::test]
    async fn test_list_bookings_returns_array() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Booking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "fullName": "Rahim Uddin", "subject": "Wedding", "bookingType": "Full Day", "status": "Confirmed", "createdAt": "2024-01-10T10:00:00Z"},
                {"id": 2, "fullName": "Karim Ali", "subject": "Birthday", "bookingType": "Half Day", "status": "Pending", "createdAt": "2024-01-11T10:00:00Z"}
            ])))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Booking", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        let rows = response.as_array().expect("Should be an array");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["fullName"], "Rahim Uddin");
        assert_eq!(rows[1]["status"], "Pending");
        // Identifiers arrive as strings or numbers
        assert!(rows[1]["id"].is_number());
    }

    /// Create posts the form fields and createdAt, never the local id
    #[tokio::test]
    async fn test_create_contact_posts_without_id() {
        let server = MockServer::start().await;

        let payload = json!({
            "fullName": "Nusrat Jahan",
            "email": "nusrat@example.com",
            "phone": "01700000000",
            "subject": "Pre-wedding shoot",
            "message": "Are you free in December?",
            "createdAt": "2024-02-01T09:30:00Z"
        });

        Mock::given(method("POST"))
            .and(path("/api/Contact"))
            .and(header("content-type", "application/json"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "17"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Contact", server.uri());

        let response = client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .expect("Request should succeed");

        assert!(response.status().is_success());

        let received: Vec<Request> = server
            .received_requests()
            .await
            .expect("Recording should be enabled");
        let sent: serde_json::Value =
            serde_json::from_slice(&received[0].body).expect("Body should be JSON");
        assert!(sent.get("id").is_none());
    }

    /// Update puts the full merged record at <endpoint>/<id>
    #[tokio::test]
    async fn test_update_photo_puts_full_record() {
        let server = MockServer::start().await;

        let record = json!({
            "id": "42",
            "name": "Golden hour",
            "category": "Outdoor",
            "imageUrl": "https://cdn.example.com/42.jpg",
            "createdAt": "2024-03-05T17:45:00Z",
            "likes": 12
        });

        Mock::given(method("PUT"))
            .and(path("/api/Photo/42"))
            .and(body_json(&record))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Photo/42", server.uri());

        let response = client
            .put(&url)
            .json(&record)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        // Unknown backend fields survive the round trip
        assert_eq!(response["likes"], 12);
    }

    /// A numeric id stays a number in the PUT body
    #[tokio::test]
    async fn test_update_collection_keeps_numeric_id() {
        let server = MockServer::start().await;

        let record = json!({
            "id": 42,
            "name": "Wedding deposit",
            "amount": 15200,
            "paymentMethod": "Bank Transfer",
            "createdAt": "2024-04-02T11:00:00Z"
        });

        Mock::given(method("PUT"))
            .and(path("/api/Collection/42"))
            .and(body_json(&record))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Collection/42", server.uri());

        let response = client
            .put(&url)
            .json(&record)
            .send()
            .await
            .expect("Request should succeed");
        assert_eq!(response.status(), 204);

        let received = server
            .received_requests()
            .await
            .expect("Recording should be enabled");
        let sent: serde_json::Value =
            serde_json::from_slice(&received[0].body).expect("Body should be JSON");
        assert!(sent["id"].is_i64());
    }

    /// Delete targets <endpoint>/<id>; an empty success body is fine
    #[tokio::test]
    async fn test_delete_expenditure_accepts_empty_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/Expenditure/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Expenditure/9", server.uri());

        let response = client
            .delete(&url)
            .send()
            .await
            .expect("Request should succeed");

        assert_eq!(response.status(), 204);
        let body = response.text().await.expect("Should get body");
        assert!(body.is_empty());
    }

    /// Bearer header is sent only when a token is configured
    #[tokio::test]
    async fn test_bearer_token_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Collection"))
            .and(bearer_token("studio-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/Collection"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Collection", server.uri());

        let with_token = client
            .get(&url)
            .bearer_auth("studio-token")
            .send()
            .await
            .expect("Request should complete");
        assert_eq!(with_token.status(), 200);

        let without_token = client
            .get(&url)
            .send()
            .await
            .expect("Request should complete");
        assert_eq!(without_token.status(), 401);
        let received = server
            .received_requests()
            .await
            .expect("Recording should be enabled");
        assert!(received[1].headers.get("authorization").is_none());
    }
}

/// Failure shapes the console surfaces as error notifications
mod failure_tests {
    use super::*;

    /// A null list body is treated as an empty collection
    #[tokio::test]
    async fn test_null_list_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Other"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Other", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        assert!(response.is_null());
    }

    /// 404 on update for a record the backend no longer has
    #[tokio::test]
    async fn test_update_missing_record_returns_404() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/Booking/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Booking not found"
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Booking/missing", server.uri());

        let response = client
            .put(&url)
            .json(&json!({"id": "missing", "fullName": "Ghost"}))
            .send()
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), 404);
        let body: serde_json::Value = response.json().await.expect("Should parse JSON");
        assert_eq!(body["message"], "Booking not found");
    }

    /// Server errors carry a plain-text body
    #[tokio::test]
    async fn test_500_with_text_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/Collection"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/Collection", server.uri());

        let response = client
            .post(&url)
            .json(&json!({"name": "Rahim advance", "amount": 15200, "paymentMethod": "Cash"}))
            .send()
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), 500);
        assert_eq!(
            response.text().await.expect("Should get body"),
            "database unavailable"
        );
    }
}
