mod client;
mod provider;

pub use client::PracticumClient;
pub use provider::HomeworkStatusProvider;
