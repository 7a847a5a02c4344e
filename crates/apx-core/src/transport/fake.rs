//! In-memory transport for unit tests.

use std::sync::Mutex;

use super::{HttpResponse, MultipartForm, Transport, TransportError};

/// One request as the fake saw it.
#[derive(Debug, Clone)]
pub(crate) enum Recorded {
    Form { url: String, form: MultipartForm },
    Json { url: String, body: serde_json::Value },
    Get { url: String },
}

impl Recorded {
    pub fn url(&self) -> &str {
        match self {
            Recorded::Form { url, .. } | Recorded::Json { url, .. } | Recorded::Get { url } => url,
        }
    }
}

type Responder = dyn Fn(&Recorded) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Records every request and answers with `responder`.
pub(crate) struct FakeTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeTransport {
    pub fn new(
        responder: impl Fn(&Recorded) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, req: Recorded) -> Result<HttpResponse, TransportError> {
        let out = (self.responder)(&req);
        self.requests.lock().unwrap().push(req);
        out
    }
}

impl Transport for FakeTransport {
    fn post_form(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, TransportError> {
        self.answer(Recorded::Form {
            url: url.to_string(),
            form: form.clone(),
        })
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
        self.answer(Recorded::Json {
            url: url.to_string(),
            body: body.clone(),
        })
    }

    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.answer(Recorded::Get {
            url: url.to_string(),
        })
    }
}

/// Response with a JSON body and content type.
pub(crate) fn json_response(status: u32, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        reason: String::new(),
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: body.to_string().into_bytes(),
    }
}
