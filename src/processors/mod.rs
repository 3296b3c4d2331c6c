//! Source and output collaborators

pub mod locale;
