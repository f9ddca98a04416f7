//! Valeur mesurée : magnitude numérique + écriture décimale d’origine.
//!
//! Les zéros de queue portent la précision ("5.00" ≠ "5") : on garde donc
//! TOUJOURS le texte saisi à côté du f64. Les résultats intermédiaires
//! reçoivent le rendu navigateur de leur magnitude.

use std::fmt;

use super::format::{js_texte, parse_float};

#[derive(Clone, Debug, PartialEq)]
pub struct Mesure {
    pub grandeur: f64,
    pub chiffres: String,
}

impl Mesure {
    /// Depuis un texte saisi (le texte est conservé tel quel).
    pub fn depuis_texte(texte: &str) -> Self {
        let chiffres = texte.trim().to_string();
        Self {
            grandeur: parse_float(&chiffres),
            chiffres,
        }
    }

    /// Depuis un résultat de calcul (texte = rendu navigateur).
    pub fn depuis_valeur(grandeur: f64) -> Self {
        Self {
            grandeur,
            chiffres: js_texte(grandeur),
        }
    }

    /// Valeur exacte zéro, utilisée pour les incertitudes absentes.
    pub fn zero() -> Self {
        Self {
            grandeur: 0.0,
            chiffres: "0".into(),
        }
    }

    pub fn est_nulle(&self) -> bool {
        self.grandeur == 0.0
    }
}

impl fmt::Display for Mesure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chiffres)
    }
}
