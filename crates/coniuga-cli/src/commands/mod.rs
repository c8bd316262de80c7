pub mod init;
pub mod learn;
pub mod list_models;
pub mod quiz;
pub mod verbs;
