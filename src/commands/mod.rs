pub mod declarative;
pub mod state;
