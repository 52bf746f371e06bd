pub mod billing_sync;
pub mod webhook;
