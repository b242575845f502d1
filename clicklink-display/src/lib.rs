//! Watch face rendering for ClickLink
//!
//! This crate provides:
//! - `TextLayer` holding the label and how it is presented
//! - Word wrapping sized to the screen and font
//! - `FrameBuffer`, a page-organized 1-bit buffer for small OLED panels
//! - `render`, which draws a layer onto any `embedded-graphics` target
//!
//! Screen shape is handled by the layer's text-flow inset: round panels
//! enable it so lines keep clear of the bezel.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod framebuffer;
pub mod layout;
pub mod render;
pub mod text_layer;

pub use framebuffer::FrameBuffer;
pub use layout::wrap;
pub use render::render;
pub use text_layer::{TextAlignment, TextLayer, MAX_TEXT_LEN};
