// Application layer and process wiring for the reminder engine

pub mod application;
pub mod presentation;
