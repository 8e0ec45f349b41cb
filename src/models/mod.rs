//! Request and response models

pub mod auth;
