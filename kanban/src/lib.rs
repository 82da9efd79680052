//! `kanban`: a single-user kanban board with durable local storage.

pub mod auth;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod storage;
