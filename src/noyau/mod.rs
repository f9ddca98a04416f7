//! Noyau : calcul d’incertitudes (barres d’erreur)
//!
//! Organisation interne :
//! - format.rs     : rendu des nombres façon navigateur (toString, toFixed, toPrecision…)
//! - mesure.rs     : valeur mesurée = f64 + écriture d’origine
//! - analyse.rs    : chiffres significatifs / rang décimal
//! - jetons.rs     : lecture d’une expression "v±u" en jetons
//! - rpn.rs        : shunting-yard + évaluation f64
//! - eval.rs       : évaluation numérique (NaN si refusée)
//! - solveur.rs    : propagation (parenthèses, × ÷ puis + -)
//! - extremes.rs   : valeurs réelles min / max
//! - precision.rs  : choix de la précision d’arrondi
//! - arrondi.rs    : mise en forme finale valeur ± incertitude
//! - demarche.rs   : étapes structurées + blocs affichés
//! - calcul.rs     : les deux modes (incertitude, valeurs réelles)
//! - saisie.rs     : lignes / texte -> jetons (seule étape faillible)

pub mod analyse;
pub mod arrondi;
pub mod calcul;
pub mod demarche;
pub mod eval;
pub mod extremes;
pub mod format;
pub mod jetons;
pub mod mesure;
pub mod precision;
pub mod rpn;
pub mod saisie;
pub mod solveur;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use calcul::{calculer_propagation, calculer_valeurs_reelles, Options};
pub use precision::ForcePrecision;
pub use saisie::{depuis_lignes, depuis_texte, Ligne};
