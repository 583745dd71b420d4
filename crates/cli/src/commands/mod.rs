pub mod collect;
pub mod export;
