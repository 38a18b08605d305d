//! Overpass spatial query client.
//!
//! [`OverpassClient`] turns a reference POI's [`QueryFilter`]s into an
//! Overpass QL radius query, posts it to a list of public endpoints with
//! fallback and retries, and decodes the JSON answer into
//! [`OverpassElement`]s, which implement [`Poi`](poimatch_core::Poi) and can
//! be fed straight into the resolver.
//!
//! [`QueryFilter`]: poimatch_core::QueryFilter

mod client;
mod element;
mod error;
mod query;

pub use client::{
    DEFAULT_ENDPOINTS, DEFAULT_USER_AGENT, OverpassClient, OverpassConfig, RetryPolicy,
};
pub use element::{ElementType, OverpassElement, OverpassResponse};
pub use error::{ClientBuildError, FetchError};
pub use query::build_query;
