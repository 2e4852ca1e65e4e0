pub mod document;
pub mod notification;
