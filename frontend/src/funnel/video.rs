use log::{error, info};
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Document, Element, HtmlScriptElement};

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("no document to embed into")]
    NoDocument,
    #[error("video container #{0} is not on the page")]
    MissingContainer(String),
    #[error("dom operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for EmbedError {
    fn from(value: JsValue) -> Self {
        EmbedError::Dom(format!("{:?}", value))
    }
}

/// Puts the third-party video player on the page. Safe to call repeatedly:
/// the backing script is loaded at most once per document.
pub trait VideoEmbedder {
    fn ensure_loaded(&self, widget_id: &str) -> Result<(), EmbedError>;
}

/// Injects the smartplayer tag into a container and appends its script to
/// `<head>` unless a script with the same source is already present.
pub struct ScriptEmbedder {
    pub container_id: &'static str,
    pub script_src: &'static str,
}

const LOAD_ERROR_HTML: &str = r#"<div style="background: #333; color: white; padding: 20px; text-align: center; border-radius: 8px;">
    <p>Error al cargar el video. Intenta recargar la página.</p>
    <button onclick="location.reload()" style="background: #ffc107; color: black; padding: 10px 20px; border: none; border-radius: 5px; cursor: pointer; font-weight: bold;">Recargar</button>
</div>"#;

fn player_html(widget_id: &str) -> String {
    format!(
        r#"<div style="position: relative; width: 100%; padding-bottom: 56.25%; background: #000; border-radius: 8px; overflow: hidden;">
    <vturb-smartplayer id="{}" style="display: block; margin: 0 auto; width: 100%; height: 100%; position: absolute; top: 0; left: 0;"></vturb-smartplayer>
</div>"#,
        widget_id
    )
}

/// Matches any `<script>` already loading `src`, however it got there.
fn script_selector(src: &str) -> String {
    format!(r#"script[src="{}"]"#, src.replace('\\', "\\\\").replace('"', "\\\""))
}

impl ScriptEmbedder {
    fn container(&self, document: &Document) -> Result<Element, EmbedError> {
        document
            .get_element_by_id(self.container_id)
            .ok_or_else(|| EmbedError::MissingContainer(self.container_id.to_string()))
    }

    fn script_present(&self, document: &Document) -> Result<bool, EmbedError> {
        Ok(document.query_selector(&script_selector(self.script_src))?.is_some())
    }

    fn append_script(&self, document: &Document) -> Result<(), EmbedError> {
        let script = document
            .create_element("script")?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| EmbedError::Dom("created element is not a script".to_string()))?;
        script.set_src(self.script_src);
        script.set_async(true);

        let container_id = self.container_id;
        let on_load = Closure::once_into_js(move || info!("Video player script loaded"));
        let on_error = Closure::once_into_js(move || {
            error!("Video player script failed to load");
            show_load_error(container_id);
        });
        script.set_onload(Some(on_load.unchecked_ref()));
        script.set_onerror(Some(on_error.unchecked_ref()));

        let head = document.head().ok_or(EmbedError::NoDocument)?;
        head.append_child(&script)?;
        Ok(())
    }
}

impl VideoEmbedder for ScriptEmbedder {
    fn ensure_loaded(&self, widget_id: &str) -> Result<(), EmbedError> {
        let document = window().and_then(|w| w.document()).ok_or(EmbedError::NoDocument)?;
        let container = self.container(&document)?;
        if container.query_selector("vturb-smartplayer")?.is_none() {
            container.set_inner_html(&player_html(widget_id));
        }
        if self.script_present(&document)? {
            info!("Video player script already on the page");
            return Ok(());
        }
        self.append_script(&document)
    }
}

/// Replaces the player with a static message and a reload button.
pub fn show_load_error(container_id: &str) {
    if let Some(container) = window()
        .and_then(|w| w.document())
        .and_then(|document| document.get_element_by_id(container_id))
    {
        container.set_inner_html(LOAD_ERROR_HTML);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_markup_carries_widget_id() {
        let html = player_html("vid-123");
        assert!(html.contains(r#"<vturb-smartplayer id="vid-123""#));
    }

    #[test]
    fn script_selector_matches_exact_source() {
        assert_eq!(
            script_selector(crate::config::VIDEO_SCRIPT_SRC),
            format!(r#"script[src="{}"]"#, crate::config::VIDEO_SCRIPT_SRC)
        );
    }

    #[test]
    fn script_selector_escapes_quotes() {
        assert_eq!(script_selector(r#"/p.js?a="b""#), r#"script[src="/p.js?a=\"b\""]"#);
    }

    #[test]
    fn load_error_offers_reload() {
        assert!(LOAD_ERROR_HTML.contains("location.reload()"));
    }
}
