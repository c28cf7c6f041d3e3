// src/services/mod.rs
pub mod conversation;
pub mod metrics_manager;
pub mod reply_scheduler;
pub mod responder;
pub mod session_manager;
