use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use mojang_uuid::PlayerId;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, error, trace, warn};

use crate::cache::{MokaUuidCache, UuidCache};
use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::in_flight::{wait_for_owner, InFlight, Shared};
use crate::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use crate::types::{Diagnostic, ProfileResponse, Resolution};

const RATE_LIMIT_STATUS: u16 = 429;
const NO_CONTENT_STATUS: u16 = 204;

/// Resolves Minecraft usernames to player UUIDs through the Mojang API
///
/// Cheap to clone; clones share the transport, cache and in-flight registry.
#[derive(Clone)]
pub struct UuidResolver {
    inner: Arc<Inner>,
}

struct Inner {
    config: ResolverConfig,
    transport: Arc<dyn Transport>,
    cache: Option<Arc<dyn UuidCache>>,
    in_flight: InFlight,
}

/// Explicit wiring of a [`UuidResolver`]'s collaborators
pub struct UuidResolverBuilder {
    config: ResolverConfig,
    transport: Option<Arc<dyn Transport>>,
    cache: CacheChoice,
}

enum CacheChoice {
    Default,
    Custom(Arc<dyn UuidCache>),
    Disabled,
}

impl UuidResolverBuilder {
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn UuidCache>) -> Self {
        self.cache = CacheChoice::Custom(cache);
        self
    }

    /// Every resolve call goes upstream
    pub fn without_cache(mut self) -> Self {
        self.cache = CacheChoice::Disabled;
        self
    }

    pub fn build(self) -> Result<UuidResolver> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.request_timeout)?),
        };
        let cache: Option<Arc<dyn UuidCache>> = match self.cache {
            CacheChoice::Default => Some(Arc::new(MokaUuidCache::new(self.config.cache_capacity))),
            CacheChoice::Custom(cache) => Some(cache),
            CacheChoice::Disabled => None,
        };

        Ok(UuidResolver {
            inner: Arc::new(Inner {
                config: self.config,
                transport,
                cache,
                in_flight: InFlight::default(),
            }),
        })
    }
}

impl UuidResolver {
    /// Resolver against the public Mojang API with the default cache
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> UuidResolverBuilder {
        UuidResolverBuilder {
            config: ResolverConfig::default(),
            transport: None,
            cache: CacheChoice::Default,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.inner.config
    }

    /// Resolve a single username
    pub async fn resolve_one(&self, username: &str) -> Result<Option<PlayerId>> {
        let ids = self.resolve(&[username]).await?;
        Ok(ids.into_iter().next().flatten())
    }

    /// Resolve usernames to ids, index for index.
    ///
    /// Entries are `None` when the account does not exist or the lookup failed
    /// softly (rate limiting, upstream errors); use [`resolve_detailed`]
    /// to see why.
    ///
    /// [`resolve_detailed`]: Self::resolve_detailed
    pub async fn resolve<S: AsRef<str>>(&self, usernames: &[S]) -> Result<Vec<Option<PlayerId>>> {
        Ok(self.resolve_detailed(usernames).await?.ids)
    }

    pub async fn resolve_detailed<S: AsRef<str>>(&self, usernames: &[S]) -> Result<Resolution> {
        self.resolve_with(usernames, &CancellationToken::new()).await
    }

    /// Resolve with a caller-controlled cancellation token.
    ///
    /// Lookups still running when the token fires (or the configured deadline
    /// passes) yield absent entries and a [`Diagnostic::Cancelled`]; finished
    /// batches keep their results.
    pub async fn resolve_with<S: AsRef<str>>(
        &self,
        usernames: &[S],
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        let names: Vec<String> = usernames.iter().map(|n| n.as_ref().to_string()).collect();
        if names.is_empty() {
            return Ok(Resolution::default());
        }

        let interrupt = Interrupt {
            cancel: cancel.clone(),
            deadline: self.inner.config.deadline.map(|d| Instant::now() + d),
        };

        match self.inner.cache.clone() {
            Some(cache) => self.inner.resolve_cached(names, cache.as_ref(), &interrupt).await,
            None => self.inner.fetch(names, &interrupt).await,
        }
    }
}

/// Cancellation token plus optional deadline for one resolve call
#[derive(Clone)]
struct Interrupt {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Interrupt {
    async fn fired(&self) {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(at) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }

    /// Run a lookup unless interrupted first; an interrupted lookup yields
    /// absent entries for `usernames`.
    async fn guard<F>(&self, usernames: &[String], lookup: F) -> Result<Resolution>
    where
        F: Future<Output = Result<Resolution>>,
    {
        tokio::select! {
            biased;
            _ = self.fired() => {
                debug!(count = usernames.len(), "Lookup interrupted before completion");
                Ok(Resolution::absent(usernames.len()).with_diagnostic(Diagnostic::Cancelled {
                    usernames: usernames.to_vec(),
                }))
            }
            outcome = lookup => outcome,
        }
    }
}

impl Inner {
    /// Serve from cache where possible and fetch each missing username once,
    /// even across concurrent resolve calls.
    async fn resolve_cached(
        self: &Arc<Self>,
        names: Vec<String>,
        cache: &dyn UuidCache,
        interrupt: &Interrupt,
    ) -> Result<Resolution> {
        let mut ids = vec![None; names.len()];
        let mut misses = Vec::new();
        for (i, name) in names.iter().enumerate() {
            match cache.get(name).await {
                Some(id) => ids[i] = Some(id),
                None => misses.push(i),
            }
        }
        trace!(
            count = names.len(),
            hits = names.len() - misses.len(),
            "Checked UUID cache"
        );
        if misses.is_empty() {
            return Ok(Resolution {
                ids,
                diagnostics: Vec::new(),
            });
        }

        let mut resolved: HashMap<String, Option<PlayerId>> = HashMap::new();
        let mut diagnostics = Vec::new();
        let mut pending: Vec<String> = misses.iter().map(|&i| names[i].clone()).collect();

        // Usernames abandoned by an interrupted owner go round again.
        while !pending.is_empty() {
            pending = self
                .resolve_shared(&pending, cache, interrupt, &mut resolved, &mut diagnostics)
                .await?;
        }

        for i in misses {
            ids[i] = resolved.get(&names[i]).copied().flatten();
        }

        Ok(Resolution { ids, diagnostics })
    }

    /// Claim `pending`, fetch the owned usernames and wait on the rest.
    ///
    /// Returns the usernames whose owner stopped before getting an answer.
    async fn resolve_shared(
        self: &Arc<Self>,
        pending: &[String],
        cache: &dyn UuidCache,
        interrupt: &Interrupt,
        resolved: &mut HashMap<String, Option<PlayerId>>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<String>> {
        let claim = self.in_flight.claim(pending);

        // An owner may have finished between our cache check and the claim.
        let mut to_fetch = Vec::with_capacity(claim.owned.len());
        for name in claim.owned {
            match cache.get(&name).await {
                Some(id) => {
                    claim.lease.publish(&name, Shared::Resolved(Some(id)));
                    resolved.insert(name, Some(id));
                }
                None => to_fetch.push(name),
            }
        }

        let fetched = match self.fetch(to_fetch.clone(), interrupt).await {
            Ok(fetched) => fetched,
            Err(e) => {
                claim.lease.fail();
                return Err(e);
            }
        };

        let failures: HashMap<&str, &Diagnostic> = fetched
            .diagnostics
            .iter()
            .flat_map(|d| d.usernames().iter().map(move |name| (name.as_str(), d)))
            .collect();
        for (name, id) in to_fetch.iter().zip(&fetched.ids) {
            match (id, failures.get(name.as_str())) {
                (Some(id), _) => {
                    cache.put(name, *id, self.config.cache_ttl).await;
                    claim.lease.publish(name, Shared::Resolved(Some(*id)));
                }
                // Unpublished; the lease hands it on as abandoned.
                (None, Some(Diagnostic::Cancelled { .. })) => {}
                (None, Some(failure)) => {
                    claim.lease.publish(name, Shared::Failed(failure.narrowed_to(name)));
                }
                (None, None) => claim.lease.publish(name, Shared::Resolved(None)),
            }
            resolved.insert(name.clone(), *id);
        }
        diagnostics.extend(fetched.diagnostics.iter().cloned());
        drop(claim.lease);

        let mut abandoned = Vec::new();
        for (name, rx) in claim.waiting {
            trace!(username = %name, "Waiting on concurrent lookup");
            let shared = tokio::select! {
                biased;
                _ = interrupt.fired() => None,
                shared = wait_for_owner(rx) => Some(shared),
            };
            let id = match shared {
                Some(Some(Shared::Resolved(id))) => id,
                Some(Some(Shared::Failed(failure))) => {
                    diagnostics.push(failure);
                    None
                }
                Some(Some(Shared::Abandoned)) => {
                    debug!(username = %name, "Concurrent lookup abandoned, taking over");
                    abandoned.push(name);
                    continue;
                }
                Some(None) => {
                    diagnostics.push(Diagnostic::SharedLookupIncomplete {
                        username: name.clone(),
                    });
                    None
                }
                None => {
                    diagnostics.push(Diagnostic::Cancelled {
                        usernames: vec![name.clone()],
                    });
                    None
                }
            };
            resolved.insert(name, id);
        }

        Ok(abandoned)
    }

    /// Fetch usernames upstream, picking the endpoint by list size
    async fn fetch(
        self: &Arc<Self>,
        names: Vec<String>,
        interrupt: &Interrupt,
    ) -> Result<Resolution> {
        let batch_size = self.config.effective_batch_size();
        match names.len() {
            0 => Ok(Resolution::default()),
            1 => interrupt.guard(&names, self.lookup_single(&names[0])).await,
            n if n <= batch_size => interrupt.guard(&names, self.lookup_bulk(&names)).await,
            n => {
                trace!(count = n, batch_size, "Splitting usernames into parallel batches");
                self.fetch_batches(names, batch_size, interrupt).await
            }
        }
    }

    /// One spawned task per batch; results are concatenated in batch order
    /// after every task has been joined. Dropping the returned future aborts
    /// the batches still running.
    async fn fetch_batches(
        self: &Arc<Self>,
        names: Vec<String>,
        batch_size: usize,
        interrupt: &Interrupt,
    ) -> Result<Resolution> {
        let handles: Vec<_> = names
            .chunks(batch_size)
            .enumerate()
            .map(|(batch, chunk)| {
                let inner = Arc::clone(self);
                let interrupt = interrupt.clone();
                let chunk = chunk.to_vec();
                AbortOnDropHandle::new(tokio::spawn(async move {
                    trace!(batch, count = chunk.len(), "Launching bulk lookup batch");
                    interrupt.guard(&chunk, inner.lookup_bulk(&chunk)).await
                }))
            })
            .collect();

        let mut resolution = Resolution {
            ids: Vec::with_capacity(names.len()),
            diagnostics: Vec::new(),
        };
        let mut first_error = None;
        for (batch, outcome) in join_all(handles).await.into_iter().enumerate() {
            match outcome.map_err(ResolveError::from).and_then(|r| r) {
                Ok(part) => resolution.append(part),
                Err(e) => {
                    error!(batch, error = %e, "Bulk lookup batch failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(resolution),
        }
    }

    async fn lookup_single(&self, username: &str) -> Result<Resolution> {
        trace!(username, "Resolving single username");
        let url = self.config.single_lookup_url(username);
        let request = self.request(Method::Get, url, None);
        let usernames = || vec![username.to_string()];

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(username, error = %e, "Single lookup request failed");
                return Ok(Resolution::absent(1).with_diagnostic(Diagnostic::Transport {
                    message: e.to_string(),
                    usernames: usernames(),
                }));
            }
        };

        if response.status == NO_CONTENT_STATUS {
            trace!(username, "No account for username");
            return Ok(Resolution::absent(1));
        }
        if !response.is_success() {
            let diagnostic = self.report_failure(response, usernames());
            return Ok(Resolution::absent(1).with_diagnostic(diagnostic));
        }

        let profile: ProfileResponse = serde_json::from_str(&response.body).map_err(|e| {
            ResolveError::MalformedResponse(format!("single lookup for {username}: {e}"))
        })?;
        if profile.name != username {
            return Err(ResolveError::ResponseMismatch {
                requested: username.to_string(),
                returned: profile.name,
            });
        }
        let id = mojang_uuid::decode(&profile.id)?;

        Ok(Resolution {
            ids: vec![Some(id)],
            diagnostics: Vec::new(),
        })
    }

    async fn lookup_bulk(&self, usernames: &[String]) -> Result<Resolution> {
        trace!(count = usernames.len(), "Resolving usernames in bulk");
        let url = self.config.bulk_lookup_url();
        let body = serde_json::Value::from(usernames.to_vec()).to_string();
        let request = self.request(Method::Post, url, Some(body));

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(count = usernames.len(), error = %e, "Bulk lookup request failed");
                return Ok(
                    Resolution::absent(usernames.len()).with_diagnostic(Diagnostic::Transport {
                        message: e.to_string(),
                        usernames: usernames.to_vec(),
                    }),
                );
            }
        };

        if !response.is_success() {
            let diagnostic = self.report_failure(response, usernames.to_vec());
            return Ok(Resolution::absent(usernames.len()).with_diagnostic(diagnostic));
        }

        // Every requested name gets a slot up front; omitted names stay None.
        let mut found: HashMap<&str, Option<PlayerId>> =
            usernames.iter().map(|name| (name.as_str(), None)).collect();

        let profiles: Vec<ProfileResponse> = serde_json::from_str(&response.body)
            .map_err(|e| ResolveError::MalformedResponse(format!("bulk lookup: {e}")))?;
        for profile in profiles {
            match found.get_mut(profile.name.as_str()) {
                Some(slot) => *slot = Some(mojang_uuid::decode(&profile.id)?),
                None => {
                    debug!(name = %profile.name, "Ignoring unrequested profile in bulk response")
                }
            }
        }

        let ids = usernames
            .iter()
            .map(|name| found.get(name.as_str()).copied().flatten())
            .collect();

        Ok(Resolution {
            ids,
            diagnostics: Vec::new(),
        })
    }

    fn request(&self, method: Method, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("User-Agent", self.config.user_agent.clone())];
        if body.is_some() {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn report_failure(&self, response: HttpResponse, usernames: Vec<String>) -> Diagnostic {
        if response.status == RATE_LIMIT_STATUS {
            warn!(
                count = usernames.len(),
                "Rate limited by Mojang API. Failed to do username -> UUID lookup"
            );
            Diagnostic::RateLimited { usernames }
        } else {
            debug!(
                status = response.status,
                body = %response.body,
                count = usernames.len(),
                "Mojang API returned non-success status"
            );
            Diagnostic::Upstream {
                status: response.status,
                body: response.body,
                usernames,
            }
        }
    }
}
