mod assignment;
mod config;
mod fixtures;
mod power;
mod request_state;
mod simulation;
