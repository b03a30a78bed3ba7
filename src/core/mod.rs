pub mod backend;
pub mod config;
pub mod controller;
pub mod exchange;
pub mod keyring;
pub mod message;
pub mod password;
pub mod session;
pub mod startup;
pub mod transcript;
