//! Analytics sinks. Both trackers are fire-and-forget: nothing is returned,
//! nothing is retried, and a missing vendor script just drops the event.

#[cfg(test)]
use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use serde_json::{json, Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Function, Reflect};
use web_sys::window;

use crate::funnel::state::Stage;

pub type EventAttrs = Map<String, Value>;

pub trait EventSink {
    fn emit(&self, name: &str, attrs: &EventAttrs);
}

fn attrs(value: Value) -> EventAttrs {
    match value {
        Value::Object(map) => map,
        _ => EventAttrs::new(),
    }
}

fn to_js(attrs: &EventAttrs) -> Option<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match serde::Serialize::serialize(attrs, &serializer) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Dropping event attributes: {}", e);
            None
        }
    }
}

/// Forwards events to the Meta pixel (`fbq('trackCustom', ...)`) when the
/// pixel script is present on the page.
pub struct PixelSink;

impl EventSink for PixelSink {
    fn emit(&self, name: &str, attrs: &EventAttrs) {
        debug!("tracker event {} {:?}", name, attrs);
        let Some(window) = window() else { return };
        let Ok(fbq) = Reflect::get(&window, &JsValue::from_str("fbq")) else { return };
        let Some(fbq) = fbq.dyn_ref::<Function>() else {
            debug!("fbq not loaded, dropping {}", name);
            return;
        };
        let Some(params) = to_js(attrs) else { return };
        let args = Array::of3(&JsValue::from_str("trackCustom"), &JsValue::from_str(name), &params);
        if let Err(e) = fbq.apply(&JsValue::NULL, &args) {
            warn!("fbq rejected {}: {:?}", name, e);
        }
    }
}

/// Pushes `{event: name, ...attrs}` onto the GA4 `dataLayer`.
pub struct DataLayerSink;

impl EventSink for DataLayerSink {
    fn emit(&self, name: &str, attrs: &EventAttrs) {
        debug!("ga4 event {} {:?}", name, attrs);
        let Some(window) = window() else { return };
        let Ok(data_layer) = Reflect::get(&window, &JsValue::from_str("dataLayer")) else { return };
        let Some(data_layer) = data_layer.dyn_ref::<Array>() else {
            debug!("dataLayer missing, dropping {}", name);
            return;
        };
        let mut payload = attrs.clone();
        payload.insert("event".to_string(), Value::String(name.to_string()));
        if let Some(entry) = to_js(&payload) {
            data_layer.push(&entry);
        }
    }
}

/// Records every event in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<(String, EventAttrs)>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn events(&self) -> Vec<(String, EventAttrs)> {
        self.events.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.borrow().iter().filter(|(n, _)| n == name).count()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&self, name: &str, attrs: &EventAttrs) {
        self.events.borrow_mut().push((name.to_string(), attrs.clone()));
    }
}

/// Which checkout button was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuyButton {
    Main,
    Sticky,
}

/// The generic tracker and the GA4 tracker, with the funnel's event
/// vocabulary.
#[derive(Clone)]
pub struct Trackers {
    pub tracker: Rc<dyn EventSink>,
    pub ga4: Rc<dyn EventSink>,
}

impl Trackers {
    pub fn browser() -> Self {
        Self {
            tracker: Rc::new(PixelSink),
            ga4: Rc::new(DataLayerSink),
        }
    }

    pub fn result_page_view(&self) {
        self.tracker.emit("page_view", &attrs(json!({ "page": "resultado" })));
        self.ga4.emit("result_page_view", &EventAttrs::new());
    }

    /// Events for entering `stage`. Loading has none.
    pub fn stage_entered(&self, stage: Stage) {
        match stage {
            Stage::Loading => {}
            Stage::Reveal1 => {
                self.revelation_viewed("why_left");
                self.ga4_revelation("Por qué te dejó", 1);
            }
            Stage::Reveal2 => {
                self.revelation_viewed("72h_window");
                self.ga4_revelation("Ventana 72 Horas", 2);
            }
            Stage::OfferButton => {
                self.revelation_viewed("vsl");
                self.tracker.emit("vsl_event", &attrs(json!({ "action": "started" })));
                self.ga4.emit("video_started", &EventAttrs::new());
            }
            Stage::Reveal3 => {
                self.revelation_viewed("offer");
                self.cta_clicked("reveal_offer_button");
                self.ga4_revelation("Oferta Revelada", 3);
                self.ga4.emit("offer_revealed", &EventAttrs::new());
            }
            Stage::Reveal4 => {
                self.ga4.emit("offer_viewed", &EventAttrs::new());
            }
        }
    }

    pub fn spots_updated(&self, spots: u32) {
        self.ga4.emit("spots_updated", &attrs(json!({ "spots": spots })));
    }

    /// The sticky bar reports its own GA4 click, then runs the main button's
    /// path.
    pub fn buy_clicked(&self, button: BuyButton) {
        if button == BuyButton::Sticky {
            self.ga4_buy("result_buy_sticky");
        }
        self.cta_clicked("result_buy");
        self.ga4_buy("result_buy_main");
    }

    fn revelation_viewed(&self, id: &str) {
        self.tracker.emit("revelation_viewed", &attrs(json!({ "id": id })));
    }

    fn cta_clicked(&self, id: &str) {
        self.tracker.emit("cta_clicked", &attrs(json!({ "id": id })));
    }

    fn ga4_buy(&self, location: &str) {
        self.ga4.emit("cta_buy_clicked", &attrs(json!({ "location": location })));
    }

    fn ga4_revelation(&self, name: &str, number: u8) {
        self.ga4.emit("revelation_viewed", &attrs(json!({ "name": name, "number": number })));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recording() -> (Trackers, Rc<RecordingSink>, Rc<RecordingSink>) {
        let tracker = Rc::new(RecordingSink::new());
        let ga4 = Rc::new(RecordingSink::new());
        let trackers = Trackers {
            tracker: tracker.clone(),
            ga4: ga4.clone(),
        };
        (trackers, tracker, ga4)
    }

    #[test]
    fn offer_button_starts_video_events() {
        let (trackers, tracker, ga4) = recording();
        trackers.stage_entered(Stage::OfferButton);
        assert_eq!(tracker.names(), vec!["revelation_viewed", "vsl_event"]);
        assert_eq!(ga4.names(), vec!["video_started"]);
    }

    #[test]
    fn reveal_three_reports_click_and_reveal() {
        let (trackers, tracker, ga4) = recording();
        trackers.stage_entered(Stage::Reveal3);
        let events = tracker.events();
        assert_eq!(events[1].0, "cta_clicked");
        assert_eq!(events[1].1.get("id"), Some(&json!("reveal_offer_button")));
        assert_eq!(ga4.names(), vec!["revelation_viewed", "offer_revealed"]);
        assert_eq!(ga4.events()[0].1.get("number"), Some(&json!(3)));
    }

    #[test]
    fn loading_emits_nothing() {
        let (trackers, tracker, ga4) = recording();
        trackers.stage_entered(Stage::Loading);
        assert!(tracker.names().is_empty());
        assert!(ga4.names().is_empty());
    }

    fn buy_locations(ga4: &RecordingSink) -> Vec<Value> {
        ga4.events()
            .into_iter()
            .map(|(name, attrs)| {
                assert_eq!(name, "cta_buy_clicked");
                attrs.get("location").cloned().unwrap_or(Value::Null)
            })
            .collect()
    }

    #[test]
    fn main_buy_click_reports_main_location() {
        let (trackers, tracker, ga4) = recording();
        trackers.buy_clicked(BuyButton::Main);
        assert_eq!(tracker.events()[0].1.get("id"), Some(&json!("result_buy")));
        assert_eq!(buy_locations(&ga4), vec![json!("result_buy_main")]);
    }

    #[test]
    fn sticky_buy_click_reports_sticky_then_main() {
        let (trackers, tracker, ga4) = recording();
        trackers.buy_clicked(BuyButton::Sticky);
        assert_eq!(tracker.names(), vec!["cta_clicked"]);
        assert_eq!(tracker.events()[0].1.get("id"), Some(&json!("result_buy")));
        assert_eq!(
            buy_locations(&ga4),
            vec![json!("result_buy_sticky"), json!("result_buy_main")]
        );
    }
}
