pub mod build;
pub mod fmt;
pub mod lsp;
pub mod version;
