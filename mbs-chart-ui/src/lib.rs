//! Shared UI layer for the Metro Bike Share chart apps: reusable Dioxus
//! components, the async CSV loader, reactive app state, and the D3.js
//! bridge.

pub mod components;
pub mod js_bridge;
pub mod loader;
pub mod state;
