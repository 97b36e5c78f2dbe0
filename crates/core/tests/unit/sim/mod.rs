//! Reference simulator tests.

/// Start, stop, restart, and observer notifications.
pub mod lifecycle;
