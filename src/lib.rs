//! Mail MCP Server Library
//!
//! A Model Context Protocol (MCP) server for Gmail integration.
//! Fetches messages via the Gmail API, normalizes and sanitizes them into a
//! canonical record, and renders them into LLM- or export-friendly output.

pub mod config;
pub mod error;
pub mod gmail;
pub mod mail;
pub mod mcp;

pub use config::Config;
pub use error::{MailMcpError, Result};
