//! Model hub client
//!
//! Resolves pretrained model files by name, downloading them from the
//! Hugging Face hub into the local cache when absent.

mod client;

pub use client::HubClient;
