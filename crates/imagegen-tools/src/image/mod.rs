//! Text-to-image generation
//!
//! [`ImageGenerator`] turns an [`ImageRequest`] into a PNG on disk by
//! posting the prompt to an inference endpoint through an
//! [`ImageTransport`].

mod generator;
mod transport;
mod types;

pub use generator::ImageGenerator;
pub use transport::{HttpImageTransport, ImageTransport, TransportResponse};
pub use types::{target_path, GenerationOutcome, ImageRequest, ImageResult};
