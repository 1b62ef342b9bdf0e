pub mod block;
pub mod document;
pub mod lead;
pub mod page;
pub mod render;
