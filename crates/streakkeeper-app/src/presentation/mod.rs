pub mod bootstrap;
pub mod startup;
pub mod state;
