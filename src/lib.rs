pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod events;
pub mod generator;
pub mod prompts;
pub mod spinner;
pub mod view;
pub mod workflow;
