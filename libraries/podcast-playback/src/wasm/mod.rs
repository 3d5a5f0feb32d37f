//! WASM bindings for podcast-playback
//!
//! Browser implementations of the engine, media-session and unload seams,
//! plus the `WasmAudioPlayer` facade exported to JavaScript.

pub mod engine;
pub mod media_session;
pub mod player;
pub mod unload;

pub use engine::WebAudioEngine;
pub use media_session::BrowserMediaSession;
pub use player::WasmAudioPlayer;
pub use unload::BrowserUnloadHook;
