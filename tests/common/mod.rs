//! Local HTTP stub for integration tests
//!
//! Serves canned responses in order over a tokio TCP listener and records the
//! head of every request it receives.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned HTTP response
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Starts a server answering with `responses` in order; the last one repeats
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            let mut served = 0usize;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let head = read_request_head(&mut socket).await;
                recorded.lock().unwrap().push(head);

                let response = responses
                    .get(served)
                    .or_else(|| responses.last())
                    .cloned()
                    .unwrap_or_else(|| StubResponse::status(404, ""));
                served += 1;

                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Request heads received so far (request line plus headers)
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// A listings payload in the API's shape
pub fn listings_payload() -> serde_json::Value {
    serde_json::json!({
        "ErrorCode": { "Id": 200, "Description": "Success" },
        "Paging": { "TotalRecords": 37, "RecordsPerPage": 50, "CurrentPage": 1 },
        "Results": [
            {
                "Id": "27000001",
                "MlsNumber": "X1000001",
                "PublicRemarks": "Waterfront home on Big Rimmer Lake with a double garage.",
                "Building": {
                    "Bedrooms": "3",
                    "BathroomTotal": "2",
                    "Type": "House",
                    "FloorAreaMeasurements": [ { "AreaUnformatted": "1,900 sqft" } ]
                },
                "Individual": [
                    {
                        "Name": "Scott Burns",
                        "Position": "Broker of Record",
                        "Phones": [ { "AreaCode": "613", "PhoneNumber": "555-0101" } ],
                        "Emails": [ { "ContactId": "1111" } ]
                    }
                ],
                "Property": {
                    "Price": "$925,000",
                    "Type": "Single Family",
                    "PriceUnformattedValue": "925000",
                    "Address": {
                        "AddressText": "12 Shore Rd|Portland, Ontario K0G1V0",
                        "Latitude": "44.70",
                        "Longitude": "-76.19"
                    },
                    "Photo": [ { "HighResPath": "https://cdn.example.com/1.jpg" } ]
                }
            },
            {
                "Id": "27000002",
                "MlsNumber": "X1000002",
                "PublicRemarks": "Vacant building lot close to the village.",
                "Property": {
                    "Price": "Contact for price",
                    "Address": { "AddressText": "Lot 4 Hwy 15|Elgin, Ontario K0G1E0" }
                },
                "Land": { "SizeTotal": "1.2 ac" }
            }
        ]
    })
}

/// A detail payload in the API's shape
pub fn details_payload() -> serde_json::Value {
    serde_json::json!({
        "ErrorCode": { "Id": 200 },
        "Id": "27000001",
        "MlsNumber": "X1000001",
        "PublicRemarks": "Waterfront home with a double garage.",
        "Property": {
            "Price": "$925,000",
            "Address": {
                "StreetNumber": "12",
                "StreetName": "Shore Rd",
                "City": "Portland",
                "Province": "Ontario",
                "PostalCode": "K0G 1V0"
            },
            "Building": { "Type": "House", "Bedrooms": "3", "SizeInterior": "1850" }
        }
    })
}
