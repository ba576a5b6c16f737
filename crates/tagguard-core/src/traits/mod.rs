mod backend;
mod cancellation;
mod handler;

pub use backend::TaggingBackend;
pub use cancellation::CancellationToken;
pub use handler::ResourceHandler;
