//! Asset integration test modules

mod cli;
mod cloud_provider_config;
mod fixtures;
