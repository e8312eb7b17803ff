#[cfg(debug_assertions)]
pub fn get_checkout_url() -> &'static str {
    "https://pay.hotmart.com/TEST-PLAN-21?checkoutMode=10"  // Sandbox offer when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_checkout_url() -> &'static str {
    "https://pay.hotmart.com/P-PLAN-21?checkoutMode=10"  // Production offer
}

pub const VIDEO_WIDGET_ID: &str = "vid-6938c3eeb96ec714286a4c2b";
pub const VIDEO_CONTAINER_ID: &str = "vsl-container";
pub const VIDEO_SCRIPT_SRC: &str =
    "https://scripts.converteai.net/ea3c2dc1-1976-40a2-b0fb-c5055f82bfaf/players/6938c3eeb96ec714286a4c2b/v4/player.js";

pub const OFFER_SECTION_ID: &str = "offer-section";
pub const REVEAL_SOUND_SRC: &str = "/assets/key-click.mp3";
