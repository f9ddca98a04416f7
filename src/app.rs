// src/app.rs
//
// Calculatrice d’incertitudes — module App (racine)
// -------------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - Enter est géré dans vue.rs (seulement quand un champ a le focus).
// - Seules les préférences sont sauvegardées.

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

use etat::Theme;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(match self.prefs.theme {
            Theme::Sombre => egui::Visuals::dark(),
            Theme::Clair => egui::Visuals::light(),
        });

        // ESC = remise à zéro (préférences conservées)
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.reset_total();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.prefs);
    }
}
