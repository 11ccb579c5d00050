//! Integration tests for triarb-bot.
//!
//! These tests verify the interaction between components:
//! - WebSocket connection lifecycle
//! - Subscription release on shutdown
//! - Push flow from transport into shared quotes

pub mod common;
