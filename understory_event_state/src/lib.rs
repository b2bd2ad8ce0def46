// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event State: small input recognizers for navigation widgets.
//!
//! Each recognizer is a plain state machine. None of them owns a clock or
//! spawns timers; callers pass timestamps in milliseconds and poll pending
//! work with the recognizer's `poll(now)` / `next_deadline()` pair.
//!
//! - [`tap`]: tell a touch tap from a scroll gesture that happens to end on a control.
//! - [`hover_intent`]: report hover only once the pointer has settled.
//! - [`swipe`]: swipe-to-close recognition for edge-anchored drawers.
//! - [`debounce`]: trailing-edge debounce for viewport width changes.
//! - [`queue`]: typed FIFO of controller events with stoppable dispatch.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tracing`.
//! - `libm`: `no_std` builds relying on `libm` for floating-point math.
//! - `serde`: `Serialize`/`Deserialize` for configuration types.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod debounce;
pub mod hover_intent;
pub mod queue;
pub mod swipe;
pub mod tap;
