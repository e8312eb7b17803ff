use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::{window, HtmlAudioElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// Cosmetic page side effects triggered by the reveal sequence.
pub trait PageEffects {
    fn play_reveal_sound(&self);
    fn scroll_to_offer(&self);
}

pub struct BrowserEffects {
    pub sound_src: &'static str,
    pub offer_section_id: &'static str,
}

impl PageEffects for BrowserEffects {
    fn play_reveal_sound(&self) {
        let audio = match HtmlAudioElement::new_with_src(self.sound_src) {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Could not create reveal sound: {:?}", e);
                return;
            }
        };
        audio.set_volume(0.5);
        match audio.play() {
            Ok(playback) => {
                // Blocked autoplay rejects the promise; keep it out of the console.
                let on_reject = Closure::once(|reason: JsValue| debug!("Reveal sound not played: {:?}", reason));
                let _ = playback.catch(&on_reject);
                on_reject.forget();
            }
            Err(e) => debug!("Reveal sound not played: {:?}", e),
        }
    }

    fn scroll_to_offer(&self) {
        let Some(section) = window()
            .and_then(|w| w.document())
            .and_then(|document| document.get_element_by_id(self.offer_section_id))
        else {
            warn!("Offer section #{} not rendered, skipping scroll", self.offer_section_id);
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        section.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
