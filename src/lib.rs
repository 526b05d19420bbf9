//! Keeps decorative arrows between DOM nodes attached to the right edges as
//! the page reflows.
//!
//! The geometry, tree walks and invalidation logic are platform-neutral and
//! run on the host; the browser bindings live under `wasm` and are only
//! compiled for `wasm32`.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod tree;

pub use config::{ArrowStyle, ResolverConfig};
pub use coordinator::{
    ArrowSink, ArrowUpdate, Coordinator, FrameScheduler, FrameToken, Invalidator, Phase,
};
pub use error::ResolverError;
pub use geometry::{anchor_id, pick_relation, AnchorDirection, PathKind, Rect, Relation};
pub use tree::{
    lowest_common_ancestor, scroll_parents, LayoutHost, LayoutTree, ObservationSet, ScrollTarget,
};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod arrow;
    pub mod dom;
    pub mod frame;
    pub mod observe;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::debug!("anchor arrows ready");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    arrow::{install_anchor_markers, mount_chain, JsCallbackSink, ResponsiveAnchorArrow},
    dom::DomHost,
    frame::AnimationFrames,
    observe::Subscriptions,
};
