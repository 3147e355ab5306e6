//! Unit tests for the identity collaborator.
