mod config;
mod cookie;
mod orchestrator;
mod provider;
