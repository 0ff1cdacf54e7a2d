//! Client-side core of the job tracker: a single-flight remote-action
//! controller, the cover-letter action built on it, and the status rules the
//! dashboard and job forms share.

pub mod action;
pub mod config;
pub mod cover_letter;
pub mod errors;
pub mod status;
pub mod transport;
