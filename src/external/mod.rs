//! Outbound HTTP: the shared client and the review-status API.

pub mod client;
pub mod practicum;

pub use client::HTTP_CLIENT;
pub use practicum::{HomeworkStatusProvider, PracticumClient};
