//! Unit tests for configuration parsing and roster handling.
