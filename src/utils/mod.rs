pub mod clipboard;
pub mod text_wrapping;
pub mod url;
