//! Object storage adapters.
//!
//! Scan images are written to a Supabase Storage bucket through its REST API
//! and served back through the bucket's public URL.

mod dto;
mod supabase_store;

pub use supabase_store::SupabaseImageStore;
