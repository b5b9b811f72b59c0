//! Integration tests for the listings API client against a local stub server

mod common;

use common::{details_payload, listings_payload, StubResponse, StubServer};
use rideau_listings::data::{ListingQuery, ListingsClient, ListingsError, CONTACT_FOR_PRICE};
use serde_json::json;

fn client_for(server: &StubServer) -> ListingsClient {
    ListingsClient::new("test-key").with_base_url(server.base_url.clone())
}

#[tokio::test]
async fn test_fetch_listings_normalizes_results() {
    let server = StubServer::start(vec![StubResponse::json(listings_payload())]).await;

    let page = client_for(&server)
        .fetch_listings(&ListingQuery::default())
        .await
        .expect("fetch should succeed");

    assert_eq!(page.total_records, 37);
    assert_eq!(page.listings.len(), 2);

    let first = &page.listings[0];
    assert_eq!(first.mls_number, "X1000001");
    assert_eq!(first.title, "12 Shore Rd, Portland");
    assert_eq!(first.price_value, Some(925_000));
    assert_eq!(first.category, "Waterfront");
    assert_eq!(first.agent_name, "Scott Burns");
    assert_eq!(first.agent_phone, "(613) 555-0101");

    let second = &page.listings[1];
    assert_eq!(second.price, CONTACT_FOR_PRICE);
    assert_eq!(second.category, "Vacant Land");
    assert_eq!(second.sqft, "1.2 ac");
    assert_eq!(second.agent_name, "Rideau Realty Team");
}

#[tokio::test]
async fn test_fetch_listings_sends_query_and_headers() {
    let server = StubServer::start(vec![StubResponse::json(listings_payload())]).await;
    let query = ListingQuery::default().with_records_per_page(100);

    client_for(&server).fetch_listings(&query).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let head = requests[0].to_lowercase();
    assert!(head.starts_with("get /agents/get-listings?"));
    assert!(head.contains("recordsperpage=100"));
    assert!(head.contains("sortorder=d"));
    assert!(head.contains("sortby=1"));
    assert!(head.contains("cultureid=1"));
    assert!(head.contains("organizationid=56031"));
    assert!(head.contains("x-rapidapi-host: realty-in-ca1.p.rapidapi.com"));
    assert!(head.contains("x-rapidapi-key: test-key"));
    assert!(head.contains("accept: application/json"));
}

#[tokio::test]
async fn test_total_records_defaults_to_result_count() {
    let mut payload = listings_payload();
    payload.as_object_mut().unwrap().remove("Paging");
    payload.as_object_mut().unwrap().remove("ErrorCode");
    let server = StubServer::start(vec![StubResponse::json(payload)]).await;

    let page = client_for(&server)
        .fetch_listings(&ListingQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total_records, 2);
}

#[tokio::test]
async fn test_http_status_error() {
    let server = StubServer::start(vec![StubResponse::status(500, "oops")]).await;

    let err = client_for(&server)
        .fetch_listings(&ListingQuery::default())
        .await
        .unwrap_err();

    match err {
        ListingsError::ApiRequest { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("expected ApiRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_embedded_error_code() {
    let payload = json!({
        "ErrorCode": { "Id": 400, "Description": "Invalid OrganizationId" },
        "Results": []
    });
    let server = StubServer::start(vec![StubResponse::json(payload)]).await;

    let err = client_for(&server)
        .fetch_listings(&ListingQuery::default())
        .await
        .unwrap_err();

    match err {
        ListingsError::ApiRequest { status, description } => {
            assert_eq!(status, None);
            assert_eq!(description, "Invalid OrganizationId");
        }
        other => panic!("expected ApiRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let server = StubServer::start(vec![StubResponse::status(200, "<html>maintenance</html>")]).await;

    let err = client_for(&server)
        .fetch_listings(&ListingQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ListingsError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_details() {
    let server = StubServer::start(vec![StubResponse::json(details_payload())]).await;

    let details = client_for(&server)
        .fetch_details("27000001", "X1000001")
        .await
        .expect("details should load");

    assert_eq!(details.title, "House in Portland");
    assert_eq!(details.address.street, "12 Shore Rd");
    assert_eq!(details.financials.price_per_sqft.as_deref(), Some("$500/sqft"));
    assert!(details.features.contains(&"Garage".to_string()));

    let head = server.requests()[0].to_lowercase();
    assert!(head.starts_with("get /properties/detail?"));
    assert!(head.contains("propertyid=27000001"));
    assert!(head.contains("referencenumber=x1000001"));
    assert!(head.contains("preferedmeasurementunit=1"));
}

#[tokio::test]
async fn test_fetch_details_embedded_error() {
    let payload = json!({ "ErrorCode": { "Id": 404, "Description": "Property not found" } });
    let server = StubServer::start(vec![StubResponse::json(payload)]).await;

    let err = client_for(&server)
        .fetch_details("1", "M1")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Property not found"));
}
