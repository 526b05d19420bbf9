//! The JavaScript-facing arrow.

use js_sys::{Array, Function, Object, Reflect};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::config::{ArrowStyle, ResolverConfig};
use crate::coordinator::{ArrowSink, ArrowUpdate, Coordinator};
use crate::error::Result;
use crate::geometry::{anchor_id, AnchorDirection};
use crate::tree::LayoutHost;

use super::dom::DomHost;
use super::frame::AnimationFrames;
use super::observe::Subscriptions;

/// Hands each update to a JS function as a plain object.
pub struct JsCallbackSink {
    callback: Function,
}

impl JsCallbackSink {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl ArrowSink for JsCallbackSink {
    fn publish(&self, update: &ArrowUpdate) {
        let object = update_to_js(update);
        if let Err(err) = self.callback.call1(&JsValue::NULL, &object) {
            warn!("arrow update callback threw: {err:?}");
        }
    }
}

fn update_to_js(update: &ArrowUpdate) -> JsValue {
    let object = Object::new();
    let style = &update.style;
    let fields: [(&str, JsValue); 8] = [
        ("start", update.start_anchor.as_str().into()),
        ("end", update.end_anchor.as_str().into()),
        ("path", update.path.as_str().into()),
        ("color", style.color.as_str().into()),
        ("strokeWidth", style.stroke_width.into()),
        ("headSize", style.head_size.into()),
        ("curveness", style.curveness.into()),
        ("zIndex", style.z_index.into()),
    ];
    for (key, value) in fields {
        // setting a data property on a fresh object cannot fail
        let _ = Reflect::set(&object, &JsValue::from_str(key), &value);
    }
    object.into()
}

/// An arrow between two element ids that re-anchors itself as layout changes.
///
/// Mounted on construction; call `dispose()` (or `free()`) on unmount.
#[wasm_bindgen]
pub struct ResponsiveAnchorArrow {
    coordinator: Coordinator<DomHost>,
    subscriptions: Option<Subscriptions>,
}

#[wasm_bindgen]
impl ResponsiveAnchorArrow {
    #[wasm_bindgen(constructor)]
    pub fn new(
        start_base: &str,
        end_base: &str,
        on_update: Function,
    ) -> std::result::Result<ResponsiveAnchorArrow, JsValue> {
        Ok(Self::mount(
            start_base,
            end_base,
            on_update,
            ArrowStyle::default(),
            ResolverConfig::default(),
        )?)
    }

    #[wasm_bindgen(js_name = withStyle)]
    pub fn with_style(
        start_base: &str,
        end_base: &str,
        on_update: Function,
        color: String,
        stroke_width: f64,
        head_size: f64,
    ) -> std::result::Result<ResponsiveAnchorArrow, JsValue> {
        let style = ArrowStyle {
            color,
            stroke_width,
            head_size,
            ..ArrowStyle::default()
        };
        Ok(Self::mount(start_base, end_base, on_update, style, ResolverConfig::default())?)
    }

    /// Recompute right now; returns the new update or `undefined` if a node is missing.
    pub fn update(&self) -> JsValue {
        self.coordinator
            .recompute()
            .map(|update| update_to_js(&update))
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Request a recompute on the next animation frame.
    pub fn invalidate(&self) {
        self.coordinator.invalidate();
    }

    pub fn current(&self) -> JsValue {
        update_to_js(&self.coordinator.current())
    }

    #[wasm_bindgen(getter, js_name = recomputeCount)]
    pub fn recompute_count(&self) -> u32 {
        u32::try_from(self.coordinator.recompute_count()).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(getter)]
    pub fn disposed(&self) -> bool {
        self.subscriptions.is_none()
    }

    pub fn dispose(&mut self) {
        self.coordinator.teardown();
        self.subscriptions = None;
    }
}

impl ResponsiveAnchorArrow {
    pub fn mount(
        start_base: &str,
        end_base: &str,
        on_update: Function,
        style: ArrowStyle,
        config: ResolverConfig,
    ) -> Result<Self> {
        let host = DomHost::new()?;
        let frames = AnimationFrames::new(host.window().clone());
        let coordinator = Coordinator::new(
            host.clone(),
            start_base,
            end_base,
            style,
            config.clone(),
            Box::new(frames),
            Box::new(JsCallbackSink::new(on_update)),
        );

        let subscriptions = coordinator
            .mount()
            .map(|set| Subscriptions::attach(&host, &set, coordinator.invalidator(), &config));
        Ok(Self { coordinator, subscriptions })
    }

    /// Event listeners currently attached (window resize plus each scroll target).
    pub fn listener_count(&self) -> usize {
        self.subscriptions.as_ref().map_or(0, Subscriptions::listener_count)
    }

    pub fn observes_resize(&self) -> bool {
        self.subscriptions.as_ref().is_some_and(Subscriptions::observes_resize)
    }
}

impl Drop for ResponsiveAnchorArrow {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Arrows between each consecutive pair of `ids`, e.g. a workflow row.
#[wasm_bindgen(js_name = mountChain)]
pub fn mount_chain(ids: Array, on_update: Function) -> std::result::Result<Array, JsValue> {
    let ids: Vec<String> = ids.iter().filter_map(|id| id.as_string()).collect();
    let arrows = Array::new();
    for pair in ids.windows(2) {
        let arrow = ResponsiveAnchorArrow::mount(
            &pair[0],
            &pair[1],
            on_update.clone(),
            ArrowStyle::default(),
            ResolverConfig::default(),
        )?;
        arrows.push(&JsValue::from(arrow));
    }
    debug!("mounted {} chained arrows", arrows.length());
    Ok(arrows)
}

const MARKER_BASE: &str = "position:absolute;width:1px;height:1px;opacity:0;pointer-events:none;";

fn marker_offset(dir: AnchorDirection) -> &'static str {
    match dir {
        AnchorDirection::Top => "top:0;left:50%;transform:translate(-50%,-50%);",
        AnchorDirection::Right => "right:0;top:50%;transform:translate(50%,-50%);",
        AnchorDirection::Bottom => "bottom:0;left:50%;transform:translate(-50%,50%);",
        AnchorDirection::Left => "left:0;top:50%;transform:translate(-50%,-50%);",
        AnchorDirection::Center => "top:50%;left:50%;transform:translate(-50%,-50%);",
    }
}

/// Create the invisible edge-midpoint markers (`{id}--top`, ...) inside the
/// node with id `base`, skipping any that already exist.
///
/// Returns how many markers were created.
#[wasm_bindgen(js_name = installAnchorMarkers)]
pub fn install_anchor_markers(base: &str) -> std::result::Result<u32, JsValue> {
    let host = DomHost::new()?;
    let Some(node) = host.find(base) else {
        return Ok(0);
    };
    let document = host.document();

    if let Some(html) = node.dyn_ref::<HtmlElement>() {
        let positioned = host
            .window()
            .get_computed_style(&node)?
            .map(|style| style.get_property_value("position").unwrap_or_default() != "static")
            .unwrap_or(true);
        if !positioned {
            html.style().set_property("position", "relative")?;
        }
    }

    let mut created = 0;
    for dir in AnchorDirection::EDGES {
        let id = anchor_id(base, dir);
        if document.get_element_by_id(&id).is_some() {
            continue;
        }
        let marker = document.create_element("span")?;
        marker.set_id(&id);
        marker.set_attribute(
            "style",
            &format!("{MARKER_BASE}{}", marker_offset(dir)),
        )?;
        node.append_child(&marker)?;
        created += 1;
    }
    Ok(created)
}
