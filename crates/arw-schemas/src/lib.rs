//! arw-schemas
//!
//! Shared value types: the validated address [`Query`], the [`Record`] observed
//! for it, and the registry wire shapes used by the search endpoint.
//!
//! No IO. Serialization of a query into the search payload is a pure function
//! of the query.

mod query;
mod record;
mod wire;

pub use query::{BuildingAddress, Query, QueryError, QuerySpec, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use record::{Record, REGISTRATION_ID_WIDTH};
pub use wire::{SearchPayload, SearchResponse, SeatPayload, Subject};
