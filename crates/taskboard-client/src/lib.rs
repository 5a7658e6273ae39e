//! Taskboard API client
//!
//! Typed access to the tracker's REST API, plus the client-side state that
//! sits on top of it: a query cache, the board move flow and cancellable
//! background fetching.

pub mod client;
pub mod error;
pub mod fetch;
pub mod http;
pub mod query;
pub mod sync;
pub mod transport;

pub use client::TrackerClient;
pub use error::{Error, Result};
pub use fetch::{FetchMessage, Fetcher};
pub use query::{QueryCache, QueryData, QueryKey};
pub use sync::{FormOptions, MoveOutcome};
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
