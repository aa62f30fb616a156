//! Behaviour-driven tests for the public registry surface.

mod behaviour;
