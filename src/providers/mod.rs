//! Clients for the remote services the studio talks to

pub mod gateway;
pub mod stripe;
pub mod supabase;

pub use gateway::{generate_visualization, GenerationRequest, GenerationResult};
