pub mod compositor;
pub mod config;
pub mod editor;
pub mod error;
pub mod filters;
pub mod history;
pub mod pixel;
pub mod store;
pub mod stroke;
