//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (lignes ou texte saisi, résultat,
//! erreur, démarche, préférences) et offrir des opérations simples sans
//! logique d’affichage.
//!
//! Contrats :
//! - Aucun calcul ici (le noyau est appelé depuis vue.rs).
//! - Actions déterministes, sans effet de bord caché.
//! - Au moins `LIGNES_MIN` lignes dans l’éditeur.
//! - Seules les préférences survivent d’une session à l’autre (pas d’historique).

use serde::{Deserialize, Serialize};

use crate::noyau::demarche::Bloc;
use crate::noyau::{ForcePrecision, Ligne};

/// Nombre de lignes au démarrage (et minimum).
pub const LIGNES_MIN: usize = 2;

/// Précision personnalisée par défaut (chiffres ou décimales).
const NOMBRE_ARRONDI_DEFAUT: i32 = 2;

/// Garde-fou : au-delà, le rendu n’a plus de sens.
pub const NOMBRE_ARRONDI_MAX: i32 = 15;

/* ------------------------ Préférences (persistées) ------------------------ */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Sombre,
    Clair,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeArrondi {
    #[default]
    Auto,
    ChiffresSignificatifs,
    Decimales,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeResultat {
    /// valeur ± incertitude (propagation)
    #[default]
    Incertitude,
    /// plage min..max (extrêmes)
    Reelle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeSaisie {
    #[default]
    Lignes,
    Texte,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub arrondi: ModeArrondi,
    pub nombre_arrondi: i32,
    pub resultat: ModeResultat,
    pub saisie: ModeSaisie,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            arrondi: ModeArrondi::default(),
            nombre_arrondi: NOMBRE_ARRONDI_DEFAUT,
            resultat: ModeResultat::default(),
            saisie: ModeSaisie::default(),
        }
    }
}

impl Preferences {
    /// Précision imposée au noyau (aucune en mode Auto).
    pub fn force(&self) -> ForcePrecision {
        let n = self.nombre_arrondi.clamp(0, NOMBRE_ARRONDI_MAX);
        match self.arrondi {
            ModeArrondi::Auto => ForcePrecision::aucune(),
            ModeArrondi::ChiffresSignificatifs => ForcePrecision::chiffres_significatifs(n),
            ModeArrondi::Decimales => ForcePrecision::decimales(n),
        }
    }
}

/* ------------------------ État ------------------------ */

/// Résultat affiché dans l’encadré.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affichage {
    /// "6.5 ± 0.4"
    pub principal: String,
    /// "6.1 à 6.9"
    pub plage: String,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub lignes: Vec<Ligne>,
    pub texte: String,

    // --- sorties ---
    pub resultat: Option<Affichage>,
    pub erreur: String,
    pub demarche: Vec<Bloc>,

    // --- paramètres ---
    pub prefs: Preferences,

    // --- UX ---
    // Permet à vue.rs de redonner le focus au champ texte après un clic sur un symbole.
    pub focus_texte: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl AppCalc {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            lignes: vec![Ligne::default(); LIGNES_MIN],
            texte: String::new(),
            resultat: None,
            erreur: String::new(),
            demarche: Vec::new(),
            prefs,
            focus_texte: false,
        }
    }

    /* ------------------------ Actions (état seulement) ------------------------ */

    pub fn ajouter_ligne(&mut self) {
        self.lignes.push(Ligne::default());
    }

    /// Retire la ligne `i` (et l’opérateur qui la précède) ; jamais sous `LIGNES_MIN`.
    pub fn retirer_ligne(&mut self, i: usize) {
        if self.lignes.len() > LIGNES_MIN && i < self.lignes.len() {
            self.lignes.remove(i);
        }
    }

    /// Insère un symbole à la fin du texte ("±", "×", "÷", "(", ")").
    pub fn inserer_symbole(&mut self, symbole: &str) {
        self.texte.push_str(symbole);
        self.focus_texte = true;
    }

    /// Efface résultat + erreur + démarche (sans toucher à la saisie).
    pub fn effacer_resultats(&mut self) {
        self.resultat = None;
        self.erreur.clear();
        self.demarche.clear();
    }

    /// Remise à zéro de la saisie et des résultats (préférences conservées).
    pub fn reset_total(&mut self) {
        let prefs = self.prefs.clone();
        *self = Self::new(prefs);
    }

    /// Erreur de saisie : le résultat précédent n’est plus fiable.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.effacer_resultats();
        self.erreur = msg.into();
    }

    pub fn set_resultat(&mut self, affichage: Affichage, demarche: Vec<Bloc>) {
        self.erreur.clear();
        self.resultat = Some(affichage);
        self.demarche = demarche;
    }
}
