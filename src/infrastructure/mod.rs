pub mod hipalz;
pub mod in_memory;
