//! Resume intake: file storage, text extraction and vector indexing.

pub mod extract;
pub mod handlers;
pub mod service;
pub mod storage;
