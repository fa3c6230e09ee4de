pub mod app;
pub mod command;
pub mod config;
pub mod dictionary;
pub mod document;
pub mod encounter;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod navigation;
pub mod presenter;
pub mod reader;
pub mod settle;
pub mod text;
pub mod ui;

#[cfg(test)]
mod testing;
