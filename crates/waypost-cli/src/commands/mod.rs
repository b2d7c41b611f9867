pub mod add;
pub mod common;
pub mod completions;
pub mod delete;
pub mod draw;
pub mod export;
pub mod list;
pub mod rename;
pub mod sync;
