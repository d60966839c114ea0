//! Hosted backend adapters (PostgREST dialect, as served by Supabase).

mod connector;
mod postgrest;

pub use connector::PostgrestConnector;
pub use postgrest::PostgrestClient;
