pub mod documents;

pub use documents::{AddTextRequest, CreatePdfResponse};
