#![deny(clippy::wildcard_imports)]

pub mod block;
