//! Tests for the context store and scoped overlays.

mod scoped;
