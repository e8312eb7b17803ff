use std::rc::Rc;

use log::{info, warn};
use yew::prelude::*;

use crate::attribution::{load_attribution, outbound_url, reapply_to_current_url, AttributionSet};
use crate::config;
use crate::content::{
    answer_summary, diagnosis_copy, format_time, phase_text, situation_insight, CTA_LABEL, EXCLUSIVE_NOTE, FEATURES,
    LOADING_KEEP_OPEN, LOADING_MESSAGE, LOADING_STEPS, LOADING_TITLE, OFFER_SUMMARY_HEADING, OFFER_TITLE,
    OFFER_UNLOCKED_TITLE, REVEAL_OFFER_BUTTON, REVEAL_OFFER_SUBTITLE, REVEAL_OFFER_TITLE, SOCIAL_PROOF, TITLE,
    VIDEO_INTRO, WINDOW_72H_COPY,
};
use crate::funnel::effects::BrowserEffects;
use crate::funnel::schedule::GlooScheduler;
use crate::funnel::sequencer::{FunnelDeps, Sequencer};
use crate::funnel::state::{FunnelState, Stage};
use crate::funnel::video::ScriptEmbedder;
use crate::quiz::{load_quiz_answers, QuizAnswers};
use crate::storage::{BrowserStorage, SpotsStore};
use crate::tracking::{BuyButton, Trackers};

fn browser_deps() -> FunnelDeps {
    FunnelDeps {
        trackers: Trackers::browser(),
        spots: Rc::new(BrowserStorage),
        embedder: Rc::new(ScriptEmbedder {
            container_id: config::VIDEO_CONTAINER_ID,
            script_src: config::VIDEO_SCRIPT_SRC,
        }),
        effects: Rc::new(BrowserEffects {
            sound_src: config::REVEAL_SOUND_SRC,
            offer_section_id: config::OFFER_SECTION_ID,
        }),
        video_widget_id: config::VIDEO_WIDGET_ID,
    }
}

/// Opens the checkout in a new tab, or in this one when popups are blocked.
fn open_checkout(url: &str) {
    let Some(window) = web_sys::window() else { return };
    match window.open_with_url_and_target(url, "_blank") {
        Ok(Some(_)) => info!("Opened checkout"),
        _ => {
            warn!("Checkout popup blocked, navigating in place");
            let _ = window.location().set_href(url);
        }
    }
}

fn render_loading(state: &FunnelState) -> Html {
    let current = state.loading_step();
    html! {
        <div class="revelation fade-in loading-card">
            <div class="loading-icon">{"🧠"}</div>
            <h2 class="loading-title">{LOADING_TITLE}</h2>
            <p class="loading-subtitle">{LOADING_MESSAGE}</p>
            <ul class="loading-steps">
                { for LOADING_STEPS.into_iter().enumerate().map(|(index, step)| {
                    let (class, icon) = if index < current {
                        ("loading-step done", "✅")
                    } else if index == current {
                        ("loading-step active", step.icon)
                    } else {
                        ("loading-step", "⏳")
                    };
                    html! {
                        <li class={class}>
                            <span class="loading-step-icon">{icon}</span>
                            <span>{step.text}</span>
                        </li>
                    }
                }) }
            </ul>
            <div class="progress-track">
                <div class="progress-fill" style={format!("width: {}%;", state.loading_progress)}></div>
            </div>
            <div class="progress-label">
                <span>{format!("{}%", state.loading_progress)}</span>
                <span>{format!("⏱️ {} segundos...", state.loading_seconds_left())}</span>
            </div>
            <p class="loading-keep-open">{LOADING_KEEP_OPEN}</p>
        </div>
    }
}

fn render_diagnosis(answers: &QuizAnswers) -> Html {
    html! {
        <div class="revelation fade-in">
            <div class="revelation-header">
                <div class="revelation-icon">{"💔"}</div>
                <h2>{TITLE}</h2>
            </div>
            <p class="revelation-text">{diagnosis_copy(answers)}</p>
            {
                if let Some(insight) = situation_insight(answers) {
                    html! { <p class="revelation-insight">{insight}</p> }
                } else {
                    html! {}
                }
            }
            <p class="revelation-text">{WINDOW_72H_COPY}</p>
            <ul class="phase-list">
                { for (1..=3).filter_map(|phase| phase_text(answers.gender, phase)).map(|text| html! {
                    <li>{text}</li>
                }) }
            </ul>
        </div>
    }
}

fn render_video() -> Html {
    html! {
        <div class="revelation fade-in vsl-revelation">
            <div class="revelation-header">
                <div class="revelation-icon">{"🎥"}</div>
                <h2>{VIDEO_INTRO}</h2>
            </div>
            <div id={config::VIDEO_CONTAINER_ID} class="vsl-container"></div>
        </div>
    }
}

fn render_reveal_button(time_left: u32, onclick: Callback<MouseEvent>) -> Html {
    html! {
        <div class="revelation fade-in reveal-offer">
            <div class="revelation-icon">{"🎁"}</div>
            <h2>{REVEAL_OFFER_TITLE}</h2>
            <p class="reveal-offer-subtitle">{REVEAL_OFFER_SUBTITLE}</p>
            <button class="reveal-offer-button" {onclick}>{REVEAL_OFFER_BUTTON}</button>
            <p class="reveal-offer-timer">{format!("⏰ Precio especial válido solo por {}", format_time(time_left))}</p>
        </div>
    }
}

fn render_offer(state: &FunnelState, answers: &QuizAnswers, on_buy: Callback<MouseEvent>) -> Html {
    html! {
        <div id={config::OFFER_SECTION_ID} class="revelation fade-in offer-revelation">
            <div class="offer-unlocked">{OFFER_UNLOCKED_TITLE}</div>
            <div class="revelation-header">
                <div class="revelation-icon">{"🎯"}</div>
                <h2>{OFFER_TITLE}</h2>
            </div>
            <div class="offer-summary">
                <p class="offer-summary-heading">{OFFER_SUMMARY_HEADING}</p>
                <ul>
                    { for answer_summary(answers).into_iter().map(|(label, value)| html! {
                        <li>{format!("✓ {}: ", label)}<strong>{value.to_string()}</strong></li>
                    }) }
                </ul>
            </div>
            <ul class="offer-features">
                { for FEATURES.into_iter().map(|feature| html! { <li>{feature}</li> }) }
            </ul>
            <div class="offer-urgency">
                <span>{"⏰ "}{format_time(state.time_left)}</span>
                <span>{format!("{} spots restantes", state.spots_left)}</span>
            </div>
            <button class="cta-button" onclick={on_buy}>{CTA_LABEL}</button>
            <p class="social-proof-count">{SOCIAL_PROOF}</p>
            <p class="guarantee-text">{EXCLUSIVE_NOTE}</p>
        </div>
    }
}

fn render_sticky_bar(state: &FunnelState, on_buy: Callback<MouseEvent>) -> Html {
    html! {
        <div class="sticky-cta fade-in">
            <span class="sticky-cta-urgency">
                {format!("⏰ {} • {} spots restantes", format_time(state.time_left), state.spots_left)}
            </span>
            <button class="cta-button sticky" onclick={on_buy}>{CTA_LABEL}</button>
        </div>
    }
}

#[function_component(ResultPage)]
pub fn result_page() -> Html {
    let funnel = use_state(|| FunnelState::new(BrowserStorage.spots_left()));
    let answers = use_state(|| load_quiz_answers(&BrowserStorage));
    let attribution = use_state(|| load_attribution(&BrowserStorage));
    let sequencer = use_mut_ref(|| None::<Rc<Sequencer>>);

    {
        let setter = funnel.setter();
        let sequencer = sequencer.clone();
        let attribution = attribution.clone();
        use_effect_with_deps(
            move |_| {
                reapply_to_current_url(&attribution);
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }

                let active = Sequencer::new(
                    browser_deps(),
                    Rc::new(GlooScheduler),
                    Callback::from(move |state: FunnelState| setter.set(state)),
                );
                active.activate();
                *sequencer.borrow_mut() = Some(active.clone());

                move || {
                    active.deactivate();
                    sequencer.borrow_mut().take();
                }
            },
            (), // mount only
        );
    }

    let on_reveal_offer = {
        let sequencer = sequencer.clone();
        Callback::from(move |_: MouseEvent| {
            let active = sequencer.borrow().clone();
            if let Some(active) = active {
                active.reveal_offer();
            }
        })
    };

    let on_buy = |button: BuyButton| {
        let attribution: AttributionSet = (*attribution).clone();
        Callback::from(move |_: MouseEvent| {
            Trackers::browser().buy_clicked(button);
            open_checkout(&outbound_url(config::get_checkout_url(), &attribution));
        })
    };

    let state = &*funnel;
    html! {
        <div class="result-container">
            <style>
                {r#"
                    .result-container { max-width: 720px; margin: 0 auto; padding: 24px 16px 120px; color: #f5f5f5; }
                    .urgency-bar { background: #b91c1c; border-radius: 8px; padding: 10px 16px; text-align: center; font-weight: bold; }
                    .revelation { margin-top: 32px; }
                    .fade-in { animation: fadeIn 0.5s ease-in-out; }
                    @keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
                    .revelation-text, .revelation-insight { white-space: pre-line; line-height: 1.8; }
                    .loading-card { border: 2px solid rgb(234, 179, 8); border-radius: 16px; padding: 32px 24px; }
                    .progress-track { height: 8px; background: rgba(255, 255, 255, 0.1); border-radius: 4px; overflow: hidden; }
                    .progress-fill { height: 100%; background: rgb(234, 179, 8); transition: width 0.1s linear; }
                    .loading-step { opacity: 0.4; list-style: none; }
                    .loading-step.active, .loading-step.done { opacity: 1; }
                    .progress-label { display: flex; justify-content: space-between; color: rgb(253, 224, 71); font-weight: bold; }
                    .loading-keep-open { margin-top: 24px; color: rgb(74, 222, 128); text-align: center; }
                    .social-proof-count { color: rgb(74, 222, 128); text-align: center; font-weight: 600; }
                    .guarantee-text { text-align: center; opacity: 0.9; }
                    .offer-features li { white-space: pre-line; margin-bottom: 12px; }
                    .cta-button, .reveal-offer-button { width: 100%; padding: 18px; border: none; border-radius: 10px; background: #16a34a; color: white; font-size: 1.1rem; font-weight: bold; cursor: pointer; }
                    .sticky-cta { position: fixed; bottom: 0; left: 0; right: 0; background: rgba(17, 17, 17, 0.95); padding: 12px 16px; display: flex; flex-direction: column; gap: 8px; align-items: center; z-index: 10; }
                "#}
            </style>
            <div class="result-header">
                <h1 class="result-title">{"Tu Plan Personalizado Está Listo"}</h1>
                <div class="urgency-bar">
                    <span class="urgency-icon">{"⚠ "}</span>
                    <span class="urgency-text">{format!("Tiempo para acceder: {}", format_time(state.time_left))}</span>
                </div>
            </div>

            <div class="revelations-container">
                { if state.stage == Stage::Loading { render_loading(state) } else { html! {} } }
                { if state.stage >= Stage::Reveal1 { render_diagnosis(&answers) } else { html! {} } }
                { if state.stage >= Stage::Reveal2 { render_video() } else { html! {} } }
                {
                    if state.shows_offer_button() {
                        render_reveal_button(state.time_left, on_reveal_offer)
                    } else {
                        html! {}
                    }
                }
                { if state.stage >= Stage::Reveal3 { render_offer(state, &answers, on_buy(BuyButton::Main)) } else { html! {} } }
            </div>

            { if state.stage >= Stage::Reveal4 { render_sticky_bar(state, on_buy(BuyButton::Sticky)) } else { html! {} } }
        </div>
    }
}
