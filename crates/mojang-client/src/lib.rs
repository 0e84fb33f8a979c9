//! Mojang Username → UUID Resolver
//!
//! Resolves Minecraft usernames to player UUIDs through the Mojang profile API.
//! Single names use the per-username endpoint, up to 100 names go through one
//! bulk call, and larger lists are split into batches fetched in parallel.
//! Lookups are cached in a moka async cache with a one day TTL.
//!
//! ```no_run
//! use mojang_client::UuidResolver;
//!
//! # async fn example() -> Result<(), mojang_client::ResolveError> {
//! let resolver = UuidResolver::new()?;
//! let ids = resolver.resolve(&["mikroskeem", "MHF_Steve"]).await?;
//! for id in ids.iter().flatten() {
//!     println!("{id}");
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod in_flight;
mod resolver;
mod transport;
mod types;

#[cfg(test)]
mod test_support;

pub use cache::{MokaUuidCache, UuidCache};
pub use config::{ResolverConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, MAX_BATCH_SIZE};
pub use error::{ResolveError, Result, TransportError};
pub use resolver::{UuidResolver, UuidResolverBuilder};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use types::{Diagnostic, Resolution};

pub use mojang_uuid::{decode, is_valid_username, MalformedIdentifier, PlayerId};
pub use tokio_util::sync::CancellationToken;
