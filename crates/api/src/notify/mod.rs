//! Outbound notifications.

pub mod webhook;

pub use webhook::LeadWebhook;
