pub mod common;

mod curation_flow;
mod polling;
