//! Scripted transport and fixtures shared by the resolver tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::{ResolverConfig, UuidResolver};

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;
type Delay = Box<dyn Fn(&HttpRequest) -> Duration + Send + Sync>;

/// Records every request and answers from a closure
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<HttpRequest>>,
    respond: Responder,
    delay: Delay,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(respond: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            delay: Box::new(|_| Duration::ZERO),
        }
    }

    /// Answer every request with the same status and body
    pub(crate) fn status(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_| Ok(HttpResponse::new(status, body.clone())))
    }

    pub(crate) fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&HttpRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Box::new(delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = (self.delay)(&request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(&request)
    }
}

/// Deterministic dashless id derived from a (≤16 byte) username
pub(crate) fn fake_id(name: &str) -> String {
    let mut bytes = [0u8; 16];
    for (slot, b) in bytes.iter_mut().zip(name.bytes()) {
        *slot = b;
    }
    format!("{:032x}", u128::from_be_bytes(bytes))
}

pub(crate) fn fake_player(name: &str) -> mojang_uuid::PlayerId {
    mojang_uuid::decode(&fake_id(name)).unwrap()
}

pub(crate) fn profile_json(name: &str) -> String {
    format!(r#"{{"id":"{}","name":"{}"}}"#, fake_id(name), name)
}

pub(crate) fn usernames(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("player{:04}", i)).collect()
}

/// Usernames sent in a bulk request body
pub(crate) fn bulk_names(request: &HttpRequest) -> Vec<String> {
    serde_json::from_str(request.body.as_deref().unwrap_or("[]")).unwrap()
}

/// Username in a single lookup URL
pub(crate) fn single_name(request: &HttpRequest) -> String {
    let last = request.url.rsplit('/').next().unwrap();
    urlencoding::decode(last).unwrap().into_owned()
}

/// Behaves like the real API for accounts that exist, except for `missing`
pub(crate) fn echo_api(missing: &[&str]) -> ScriptedTransport {
    let missing: Vec<String> = missing.iter().map(|s| s.to_string()).collect();
    ScriptedTransport::new(move |request| match request.method {
        Method::Get => {
            let name = single_name(request);
            if missing.contains(&name) {
                Ok(HttpResponse::new(204, ""))
            } else {
                Ok(HttpResponse::new(200, profile_json(&name)))
            }
        }
        Method::Post => {
            let profiles: Vec<String> = bulk_names(request)
                .iter()
                .filter(|name| !missing.contains(name))
                .map(|name| profile_json(name))
                .collect();
            Ok(HttpResponse::new(200, format!("[{}]", profiles.join(","))))
        }
    })
}

pub(crate) fn uncached(transport: &Arc<ScriptedTransport>) -> UuidResolver {
    with_config(transport, ResolverConfig::default())
}

pub(crate) fn with_config(
    transport: &Arc<ScriptedTransport>,
    config: ResolverConfig,
) -> UuidResolver {
    UuidResolver::builder()
        .config(config)
        .transport(transport.clone())
        .without_cache()
        .build()
        .unwrap()
}

pub(crate) fn cached(transport: &Arc<ScriptedTransport>) -> UuidResolver {
    UuidResolver::builder()
        .transport(transport.clone())
        .build()
        .unwrap()
}
