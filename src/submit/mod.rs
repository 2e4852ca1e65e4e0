pub mod error;
pub mod outcome;
pub mod submitter;
pub mod transport;
