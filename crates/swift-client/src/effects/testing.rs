//! Canned-response transport for unit tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;

use crate::effects::http::{HttpClient, HttpRequest, HttpResponse};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StubError(pub String);

pub struct StubResponse {
    status:  u16,
    headers: Vec<(String, String)>,
    chunks:  Vec<Result<Bytes, String>>,
}

impl StubResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            chunks: Vec::new(),
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn chunk(mut self, bytes: &'static [u8]) -> Self {
        self.chunks.push(Ok(Bytes::from_static(bytes)));
        self
    }

    /// Make the body stream fail at this point.
    pub fn fail(mut self, message: &str) -> Self {
        self.chunks.push(Err(message.to_string()));
        self
    }
}

#[derive(Default)]
pub struct StubHttp {
    responses: Mutex<VecDeque<Result<StubResponse, String>>>,
    requests:  Mutex<Vec<HttpRequest>>,
}

impl StubHttp {
    pub fn new() -> Self { Self::default() }

    pub fn respond(self, response: StubResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn refuse(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> { self.requests.lock().unwrap().clone() }
}

impl HttpClient for StubHttp {
    type Error = StubError;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse<StubError>, StubError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no response queued".to_string()));

        let response = next.map_err(StubError)?;
        let headers: BTreeMap<String, String> = response
            .headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        let chunks = response.chunks.into_iter().map(|c| c.map_err(StubError));

        Ok(HttpResponse {
            url: request.url,
            status: response.status,
            headers,
            body: Box::pin(futures_util::stream::iter(chunks)),
        })
    }
}
