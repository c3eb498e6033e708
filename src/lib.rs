pub mod assign;
pub mod error;
pub mod net;
pub mod power;
pub mod queue;
pub mod sim;
pub mod topo;
pub mod workload;

#[cfg(test)]
mod test;
