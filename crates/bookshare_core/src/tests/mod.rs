//! Cross-component scenario tests.

pub mod support;

mod notification_test;
