//! WASM bindings for `cobweb_core`.
//!
//! The browser side owns all rendering; everything here returns plain numbers
//! or serde-serialised payloads.

mod system;

pub use system::WasmMap;
