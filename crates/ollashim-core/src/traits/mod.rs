// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.

pub mod adapter;

pub use adapter::{Completion, CompletionAdapter};
