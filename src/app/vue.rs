// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Deux saisies : lignes (valeur ± incertitude + parenthèses + opérateur) ou texte libre
// - Clavier : Enter calcule (quand un champ a le focus)
// - Tactile : boutons de symboles, focus redonné au champ texte après clic
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::{Affichage, AppCalc, ModeArrondi, ModeResultat, ModeSaisie, Theme, NOMBRE_ARRONDI_MAX};
use crate::noyau::jetons::Op;
use crate::noyau::{calculer_propagation, calculer_valeurs_reelles, depuis_lignes, depuis_texte, Options};

/// Opérateurs proposés entre deux lignes.
const OPERATEURS: [Op; 4] = [Op::Plus, Op::Moins, Op::Fois, Op::Divise];

/// Symboles insérables dans le champ texte.
const SYMBOLES: [&str; 5] = ["±", "×", "÷", "(", ")"];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Calculatrice d’incertitudes");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.ui_theme(ui);
                    });
                });
                ui.add_space(6.0);

                self.ui_reglages(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                match self.prefs.saisie {
                    ModeSaisie::Lignes => self.ui_lignes(ui),
                    ModeSaisie::Texte => self.ui_texte(ui),
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.add_sized([110.0, 32.0], egui::Button::new("Calculer")).clicked() {
                        self.calculer();
                    }
                    if ui
                        .add_sized([80.0, 32.0], egui::Button::new("Effacer"))
                        .on_hover_text("Remise à zéro (Échap)")
                        .clicked()
                    {
                        self.reset_total();
                    }
                });

                if !self.erreur.is_empty() {
                    ui.add_space(6.0);
                    ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
                }

                if let Some(aff) = &self.resultat {
                    ui.add_space(8.0);
                    ui.separator();
                    ui.add_space(8.0);
                    Self::ui_resultat(ui, aff);
                }

                if !self.demarche.is_empty() {
                    ui.add_space(8.0);
                    self.ui_demarche(ui);
                }
            });
    }

    fn ui_theme(&mut self, ui: &mut egui::Ui) {
        let (texte, suivant) = match self.prefs.theme {
            Theme::Sombre => ("Thème clair", Theme::Clair),
            Theme::Clair => ("Thème sombre", Theme::Sombre),
        };
        if ui.button(texte).clicked() {
            self.prefs.theme = suivant;
        }
    }

    fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Saisie :");
            ui.selectable_value(&mut self.prefs.saisie, ModeSaisie::Lignes, "Lignes");
            ui.selectable_value(&mut self.prefs.saisie, ModeSaisie::Texte, "Texte");
        });

        ui.horizontal_wrapped(|ui| {
            ui.label("Résultat :");
            ui.radio_value(&mut self.prefs.resultat, ModeResultat::Incertitude, "Incertitude");
            ui.radio_value(&mut self.prefs.resultat, ModeResultat::Reelle, "Valeurs réelles");
        });

        ui.horizontal_wrapped(|ui| {
            ui.label("Arrondi :");
            egui::ComboBox::from_id_salt("mode_arrondi")
                .selected_text(libelle_arrondi(self.prefs.arrondi))
                .show_ui(ui, |ui| {
                    for mode in [ModeArrondi::Auto, ModeArrondi::ChiffresSignificatifs, ModeArrondi::Decimales] {
                        ui.selectable_value(&mut self.prefs.arrondi, mode, libelle_arrondi(mode));
                    }
                });

            if self.prefs.arrondi != ModeArrondi::Auto {
                ui.add(
                    egui::DragValue::new(&mut self.prefs.nombre_arrondi)
                        .speed(1)
                        .range(0..=NOMBRE_ARRONDI_MAX),
                );
            }
        });
    }

    /* ------------------------ Saisie par lignes ------------------------ */

    fn ui_lignes(&mut self, ui: &mut egui::Ui) {
        let mut a_retirer = None;
        let mut entree = false;
        let retirable = self.lignes.len() > super::etat::LIGNES_MIN;

        egui::Grid::new("grille_lignes")
            .num_columns(7)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for (i, ligne) in self.lignes.iter_mut().enumerate() {
                    // opérateur reliant à la ligne précédente
                    if i == 0 {
                        ui.label("");
                    } else {
                        egui::ComboBox::from_id_salt(("op_ligne", i))
                            .width(40.0)
                            .selected_text(ligne.op.symbole_affiche().to_string())
                            .show_ui(ui, |ui| {
                                for op in OPERATEURS {
                                    ui.selectable_value(&mut ligne.op, op, op.symbole_affiche().to_string());
                                }
                            });
                    }

                    if ui
                        .add_sized([34.0, 24.0], egui::Button::new(parentheses('(', ligne.ouvrantes)))
                        .on_hover_text("Parenthèses ouvrantes (0 à 3)")
                        .clicked()
                    {
                        ligne.basculer_ouvrantes();
                    }

                    let v = ui.add(
                        egui::TextEdit::singleline(&mut ligne.valeur)
                            .id_salt(("valeur", i))
                            .desired_width(90.0)
                            .hint_text(format!("Valeur {}", i + 1)),
                    );
                    ui.label("±");
                    let u = ui.add(
                        egui::TextEdit::singleline(&mut ligne.incertitude)
                            .id_salt(("incertitude", i))
                            .desired_width(70.0)
                            .hint_text("0"),
                    );

                    if ui
                        .add_sized([34.0, 24.0], egui::Button::new(parentheses(')', ligne.fermantes)))
                        .on_hover_text("Parenthèses fermantes (0 à 3)")
                        .clicked()
                    {
                        ligne.basculer_fermantes();
                    }

                    if ui.add_enabled(retirable, egui::Button::new("✖")).clicked() {
                        a_retirer = Some(i);
                    }
                    ui.end_row();

                    entree |= (v.lost_focus() || u.lost_focus())
                        && ui.input(|inp| inp.key_pressed(egui::Key::Enter));
                }
            });

        if let Some(i) = a_retirer {
            self.retirer_ligne(i);
        }

        if ui.button("+ Ajouter une valeur").clicked() {
            self.ajouter_ligne();
        }

        if entree {
            self.calculer();
        }
    }

    /* ------------------------ Saisie texte ------------------------ */

    fn ui_texte(&mut self, ui: &mut egui::Ui) {
        ui.label("Expression :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.texte)
                .desired_width(ui.available_width())
                .hint_text("Ex: (2±0.1 + 3±0.2) × 4")
                .id_salt("expression_texte")
                .code_editor(),
        );

        if self.focus_texte {
            resp.request_focus();
            self.focus_texte = false;
        }

        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.calculer();
            self.focus_texte = true;
        }

        ui.horizontal_wrapped(|ui| {
            for s in SYMBOLES {
                if ui.add_sized([40.0, 28.0], egui::Button::new(s)).clicked() {
                    self.inserer_symbole(s);
                }
            }
        });
    }

    /* ------------------------ Sorties ------------------------ */

    fn ui_resultat(ui: &mut egui::Ui, aff: &Affichage) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(egui::RichText::new(&aff.principal).monospace().size(22.0).strong());
                ui.monospace(&aff.plage);
            });
    }

    fn ui_demarche(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(true)
            .show(ui, |ui| {
                for (i, bloc) in self.demarche.iter().enumerate() {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.push_id(("bloc", i), |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.strong(&bloc.titre);
                            for l in &bloc.lignes {
                                ui.monospace(l);
                            }
                        });
                    });
                    ui.add_space(4.0);
                }
            });
    }

    /// Saisie -> noyau -> résultat + démarche dans l’état UI.
    fn calculer(&mut self) {
        let saisie = match self.prefs.saisie {
            ModeSaisie::Lignes => depuis_lignes(&self.lignes),
            ModeSaisie::Texte => depuis_texte(&self.texte),
        };

        let saisie = match saisie {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(erreur = %e, "saisie refusée");
                self.set_erreur(e.to_string());
                return;
            }
        };

        let options = Options {
            jetons: Some(saisie.jetons),
            force: self.prefs.force(),
        };

        match self.prefs.resultat {
            ModeResultat::Incertitude => {
                let c = calculer_propagation(&saisie.expression, &options);
                let affichage = Affichage {
                    principal: c.affiche.to_string(),
                    plage: format!("Plage : {} à {}", c.plage.0, c.plage.1),
                };
                self.set_resultat(affichage, c.demarche);
            }
            ModeResultat::Reelle => {
                let c = calculer_valeurs_reelles(&saisie.expression, &options);
                let affichage = Affichage {
                    principal: c.milieu.to_string(),
                    plage: format!("Valeurs réelles : {} à {}", c.min.valeur, c.max.valeur),
                };
                self.set_resultat(affichage, c.demarche);
            }
        }
    }
}

/// "·" si aucune parenthèse, sinon "((" etc.
fn parentheses(c: char, n: usize) -> String {
    if n == 0 {
        "·".to_string()
    } else {
        std::iter::repeat(c).take(n).collect()
    }
}

fn libelle_arrondi(mode: ModeArrondi) -> &'static str {
    match mode {
        ModeArrondi::Auto => "Automatique",
        ModeArrondi::ChiffresSignificatifs => "Chiffres significatifs",
        ModeArrondi::Decimales => "Décimales",
    }
}
