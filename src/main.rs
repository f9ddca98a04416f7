// src/main.rs
//
// Calculatrice d’incertitudes — point d’entrée NATIF + WEB (WASM)
// ---------------------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : eframe::run_native + NativeOptions
// - WEB  (wasm32)              : eframe::WebRunner + WebOptions + <canvas>
// - Préférences relues depuis le stockage eframe (thème, arrondi, modes)
//
// Côté WEB (WASM) : index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>
//
// `impl eframe::App for AppCalc` vit dans src/app.rs ; ici, point d’entrée seulement.

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod noyau;

use app::AppCalc;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice d’incertitudes";

/// Construit l’app avec les préférences de la session précédente (si présentes).
fn creer_app(cc: &eframe::CreationContext<'_>) -> AppCalc {
    let prefs = cc
        .storage
        .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
        .unwrap_or_default();
    AppCalc::new(prefs)
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG=calculatrice_incertitudes=debug pour suivre saisie + calculs
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([560.0, 780.0])
            .with_min_inner_size([440.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(TITRE_APP, options, Box::new(|cc| Ok(Box::new(creer_app(cc)))))
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{creer_app, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// - Fixe le titre de l’onglet
    /// - Récupère le <canvas id="the_canvas_id">
    /// - Démarre eframe WebRunner dessus
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(creer_app(cc)))),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
