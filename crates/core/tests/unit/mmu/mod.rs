//! MMU component tests.
