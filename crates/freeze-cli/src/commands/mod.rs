pub mod diff;
pub mod dump;
pub mod flatten;
pub mod freeze;
pub mod hash;
pub mod sort;
