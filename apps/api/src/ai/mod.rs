// AI assistance: resume-versus-posting analysis and interview preparation.

pub mod analysis;
pub mod handlers;
pub mod interview;
pub mod prompts;
