// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for hwtopo tools.
//! Keeps storage adapters thin and framework-agnostic.

pub mod config;
