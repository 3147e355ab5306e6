//! Unit tests for the notification engine.
