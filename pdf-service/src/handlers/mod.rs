pub mod documents;
pub mod health;

pub use documents::{add_text, create_pdf, fetch_pdf};
pub use health::health_check;
