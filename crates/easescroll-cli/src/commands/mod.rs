pub mod config;
pub mod run;
pub mod sample;
pub mod simulate;
