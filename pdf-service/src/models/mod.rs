pub mod document;

pub use document::DocumentId;
