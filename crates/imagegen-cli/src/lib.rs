//! Test client for the Image Generator Agent
//!
//! Talks A2A JSON-RPC to a running server and turns streamed agent
//! messages back into [`ImageResult`](imagegen_tools::ImageResult)s.

pub mod client;

pub use client::{extract_image_result, A2AClient, AgentCardInfo, ClientError, StreamEvent};
