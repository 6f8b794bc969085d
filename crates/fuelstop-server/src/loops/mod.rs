//! Background loops for continuous processing.

pub mod cache_prune_loop;
