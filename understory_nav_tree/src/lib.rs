// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Nav Tree: the element tree navigation components operate on.
//!
//! Navigation widgets (multilevel menus, slide-over panes, off-canvas drawers)
//! only need a narrow slice of a document: element structure, a handful of
//! markup markers, text for labels, focusability, and the layout size of a few
//! containers. This crate models exactly that slice so the controllers built on
//! it stay headless and testable.
//!
//! - [`Tree`]: generational element arena with DOM-like queries
//!   ([`Tree::closest`], [`Tree::descendants`], [`Tree::wrap`], ...).
//! - [`Element`]: kind, [`Role`], [`NodeFlags`], text, href, id, tab index, and
//!   layout bounds reported by the host.
//! - [`Role`]: the closed set of markers the components read and generate.
//!   [`Role::class_name`] gives the CSS class a DOM host applies.
//! - [`Viewport`] and [`Breakpoint`]: the mobile/desktop split.
//!
//! ## Layout is external
//!
//! The tree never measures anything. A host reports layout with
//! [`Tree::set_bounds`] (typically after each frame) and controllers read the
//! bounds at the moment they need a height or offset.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: `no_std` + `alloc` builds relying on `libm` for floating-point math.
//! - `serde`: `Serialize`/`Deserialize` for [`Breakpoint`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;
mod viewport;

pub use tree::{Descendants, Tree};
pub use types::{Element, ElementKind, NodeFlags, NodeId, Role};
pub use viewport::{Breakpoint, ParseBreakpointError, Viewport};
