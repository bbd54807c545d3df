//! Pixed - core of a pixel-art sprite editor
//!
//! This library provides:
//! - A sprite bank, shared colour palette and tile map ([`models`])
//! - Pixel editing interaction with gap-free strokes and whole-sprite tools ([`editor`])
//! - A project store that publishes change notifications ([`store`])
//! - The JSON project document ([`document`]) and key-value persistence ([`storage`])
//! - Packed sprite sheet export with JSON metadata ([`export`])

pub mod cli;
pub mod color;
pub mod config;
pub mod document;
pub mod editor;
pub mod export;
pub mod models;
pub mod output;
pub mod storage;
pub mod store;
pub mod surface;
pub mod thumbnails;
