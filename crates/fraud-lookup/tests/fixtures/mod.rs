// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Test fixtures for lookup flows
//!
//! Model artifacts and configurations pointing at a mock artifact host.

pub mod artifacts;

pub use artifacts::*;
