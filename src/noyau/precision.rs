// src/noyau/precision.rs
//
// Choix de la précision d’arrondi
// -------------------------------
// Table de décision (sur les classes d’opérations réellement utilisées) :
//   × ÷ utilisées (seules ou mêlées à + -) => chiffres significatifs
//   + - seules                           => rang décimal
//   aucune opération                     => d’après l’opérande unique
// Une précision forcée (préférences) passe avant tout.

use super::analyse::{chiffres_significatifs, rang_decimal, EXACT};
use super::jetons::Operande;
use super::solveur::ResultatPropagation;

/// Précision imposée par l’utilisateur (sinon `force == false`).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ForcePrecision {
    pub force: bool,
    pub rang_decimal: bool,
    pub precision: i32,
    pub libelle: String,
}

impl ForcePrecision {
    pub fn aucune() -> Self {
        Self::default()
    }

    pub fn chiffres_significatifs(n: i32) -> Self {
        let n = n.max(1);
        Self {
            force: true,
            rang_decimal: false,
            precision: n,
            libelle: libelle_chiffres(n),
        }
    }

    pub fn decimales(n: i32) -> Self {
        let n = n.max(0);
        Self {
            force: true,
            rang_decimal: true,
            precision: n,
            libelle: libelle_rang(n),
        }
    }
}

/// Précision retenue pour l’arrondi final.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoixPrecision {
    pub rang_decimal: bool,
    pub precision: i32,
    pub libelle: String,
}

impl ChoixPrecision {
    pub fn chiffres(n: i32) -> Self {
        Self {
            rang_decimal: false,
            precision: n,
            libelle: libelle_chiffres(n),
        }
    }

    pub fn rang(p: i32) -> Self {
        Self {
            rang_decimal: true,
            precision: p,
            libelle: libelle_rang(p),
        }
    }
}

/* ------------------------ Libellés ------------------------ */

const RANGS: [&str; 4] = ["unités", "dizaines", "centaines", "milliers"];

fn libelle_chiffres(n: i32) -> String {
    if n >= EXACT {
        "valeur exacte".into()
    } else if n > 1 {
        format!("{n} chiffres significatifs")
    } else {
        format!("{n} chiffre significatif")
    }
}

/// "2 décimales", "1 décimale", "rang des centaines"…
pub fn libelle_rang(p: i32) -> String {
    if p >= 0 {
        return if p > 1 {
            format!("{p} décimales")
        } else {
            format!("{p} décimale")
        };
    }
    match RANGS.get(p.unsigned_abs() as usize) {
        Some(nom) => format!("rang des {nom}"),
        None => format!("rang des 10^{}", p.unsigned_abs()),
    }
}

/* ------------------------ Décision ------------------------ */

/// Raison affichée dans la démarche (étape d’arrondi).
pub fn raison_arrondi(meta: &ResultatPropagation) -> &'static str {
    match (meta.mult_div, meta.add_sub) {
        (true, true) => {
            "Opérations mixtes : la multiplication/division l’emporte, arrondi aux chiffres significatifs."
        }
        (true, false) => "Multiplication/division : arrondi aux chiffres significatifs.",
        (false, true) => "Addition/soustraction : arrondi au rang décimal.",
        (false, false) => "Aucune opération : arrondi aux chiffres significatifs (le plus petit nombre parmi les valeurs).",
    }
}

/// Plus petit nombre de chiffres significatifs parmi les opérandes (1 si aucune).
fn min_chiffres<'a>(operandes: impl Iterator<Item = &'a Operande>) -> i32 {
    operandes
        .map(|o| chiffres_significatifs(&o.valeur.chiffres, Some(&o.incertitude.chiffres)))
        .min()
        .unwrap_or(1)
}

/// Choisit la précision d’arrondi.
///
/// `operandes` ne sert qu’aux repli (précision absente des métadonnées).
pub fn choisir_precision<'a>(
    meta: &ResultatPropagation,
    force: &ForcePrecision,
    operandes: impl IntoIterator<Item = &'a Operande>,
) -> ChoixPrecision {
    if force.force {
        return ChoixPrecision {
            rang_decimal: force.rang_decimal,
            precision: force.precision,
            libelle: force.libelle.clone(),
        };
    }

    let operandes = operandes.into_iter();

    let choix = if meta.mult_div {
        let n = meta
            .chiffres_significatifs
            .unwrap_or_else(|| min_chiffres(operandes));
        ChoixPrecision::chiffres(n)
    } else if meta.add_sub {
        let p = meta.rang_decimal.unwrap_or_else(|| {
            operandes
                .map(|o| rang_decimal(&o.valeur.chiffres, Some(&o.incertitude.chiffres)))
                .min()
                .unwrap_or(0)
        });
        ChoixPrecision::rang(p)
    } else {
        // aucune opération : la donnée la moins précise fixe les chiffres
        ChoixPrecision::chiffres(min_chiffres(operandes))
    };

    tracing::debug!(
        rang_decimal = choix.rang_decimal,
        precision = choix.precision,
        libelle = %choix.libelle,
        "précision choisie"
    );
    choix
}
