//! RAG Chatbot - floating chat widget gateway
//!
//! Renders a chat widget, relays its queries to an external
//! retrieval-augmented generation service, and keeps that service's index
//! in step with site content. Retrieval and generation themselves live
//! behind the service's HTTP API.

pub mod api;
pub mod config;
pub mod content_sync;
pub mod nonce;
pub mod rag;
pub mod session;
pub mod text;
