pub mod config;
pub mod editor;
pub mod markup;
pub mod note;
pub mod prompt;
pub mod render;
pub mod store;
pub mod theme;
