// src/noyau/arrondi.rs
//
// Mise en forme finale d’un couple valeur ± incertitude
// -----------------------------------------------------
// Deux régimes:
// - rang décimal p : les deux nombres arrondis au même rang
//     p >= 0 => p décimales fixes ("6.5", "0.4")
//     p <  0 => entiers arrondis à la dizaine, centaine… ("1200", "200")
// - chiffres significatifs n : la valeur porte n chiffres, puis l’incertitude
//   impose son propre rang aux deux écritures (valeur jamais plus précise
//   que son incertitude). n = EXACT : valeur gardée telle quelle.

use std::fmt;

use super::analyse::{self, EXACT};
use super::format::{js_round, js_texte, parse_float, to_fixed, to_precision};

/// Couple prêt à afficher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaireFormatee {
    pub valeur: String,
    pub incertitude: String,
}

impl fmt::Display for PaireFormatee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}", self.valeur, self.incertitude)
    }
}

/// Arrondi au rang `rang` (entier si rang < 0, décimales fixes sinon).
fn au_rang(x: f64, rang: i32) -> String {
    if rang < 0 {
        js_texte(js_round(x))
    } else {
        to_fixed(parse_float(&to_fixed(x, rang)), rang)
    }
}

/// Arrondit `valeur ± incertitude`.
///
/// `en_decimales` : `precision` est un rang décimal ; sinon un nombre de
/// chiffres significatifs.
pub fn arrondir(valeur: f64, incertitude: f64, precision: i32, en_decimales: bool) -> PaireFormatee {
    if en_decimales {
        let echelle = 10f64.powi(precision);
        let v = js_round(valeur * echelle) / echelle;
        let u = js_round(incertitude * echelle) / echelle;

        return if precision < 0 {
            PaireFormatee {
                valeur: js_texte(js_round(v)),
                incertitude: js_texte(js_round(u)),
            }
        } else {
            PaireFormatee {
                valeur: to_fixed(v, precision),
                incertitude: to_fixed(u, precision),
            }
        };
    }

    let exacte = precision >= EXACT;
    let arrondie = if exacte {
        valeur
    } else {
        parse_float(&to_precision(valeur, precision))
    };

    let texte_inc = js_texte(incertitude);
    let rang_inc = analyse::rang_decimal(&texte_inc, Some(&texte_inc));

    let mut texte_val = if exacte {
        au_rang(arrondie, rang_inc)
    } else {
        to_precision(valeur, precision)
    };

    let texte_inc = if rang_inc < 0 {
        js_texte(js_round(incertitude))
    } else {
        to_fixed(incertitude, rang_inc)
    };

    // l’incertitude fixe le dernier chiffre affiché de la valeur
    if rang_inc >= 0 && valeur.is_finite() {
        texte_val = to_fixed(valeur, rang_inc);
    }

    // pas de notation scientifique pour les petites valeurs
    if texte_val.contains(['e', 'E']) && arrondie.is_finite() && arrondie.abs() < 1000.0 {
        texte_val = au_rang(arrondie, rang_inc);
    }

    tracing::trace!(valeur, incertitude, precision, en_decimales, %texte_val, %texte_inc, "arrondi");

    PaireFormatee {
        valeur: texte_val,
        incertitude: texte_inc,
    }
}
