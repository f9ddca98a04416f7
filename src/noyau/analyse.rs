// src/noyau/analyse.rs
//
// Analyse de précision d’un couple valeur / incertitude
// -----------------------------------------------------
// - chiffres significatifs (règles usuelles, ou dictés par l’incertitude)
// - rang décimal (positif = chiffres après la virgule, négatif = dizaines, centaines…)
//
// Fonctions pures : elles lisent les TEXTES (zéros de queue significatifs).

use super::format::{js_round, parse_float};

/// Sentinelle “infinité de chiffres significatifs” (entier exact).
pub const EXACT: i32 = 999;

/// Sépare "1.20e3" en ("1.20", 3). Exposant absent ou illisible => 0.
fn mantisse_exposant(texte: &str) -> (&str, i32) {
    match texte.find(['e', 'E']) {
        Some(i) => (&texte[..i], texte[i + 1..].parse().unwrap_or(0)),
        None => (texte, 0),
    }
}

/// Incertitude numérique si le texte est fourni et non vide.
fn incertitude_lue(incertitude: Option<&str>) -> Option<f64> {
    incertitude
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_float)
}

/// Compte des chiffres significatifs d’après l’écriture seule.
/// Les zéros de tête (y compris après la virgule) ne comptent pas.
fn chiffres_ecrits(valeur: &str) -> i32 {
    let (mantisse, _) = mantisse_exposant(valeur.trim());
    let mut compte = 0;
    let mut non_nul_vu = false;

    for c in mantisse.chars().filter(char::is_ascii_digit) {
        if c != '0' {
            non_nul_vu = true;
        }
        if non_nul_vu {
            compte += 1;
        }
    }

    compte.max(1)
}

/// Chiffres significatifs de `valeur`.
///
/// - incertitude "0" : entier => `EXACT` ; décimal => compte écrit ("5.00" => 3)
/// - incertitude > 0 : ordre(valeur) - ordre(incertitude) + 1 (au moins 1)
/// - sinon           : compte écrit
pub fn chiffres_significatifs(valeur: &str, incertitude: Option<&str>) -> i32 {
    let ecrits = chiffres_ecrits(valeur);

    let Some(inc) = incertitude_lue(incertitude) else {
        return ecrits;
    };

    if inc == 0.0 {
        return if valeur.contains('.') { ecrits } else { EXACT };
    }

    if inc > 0.0 {
        let v = parse_float(valeur);
        // valeur nulle (ou illisible) : ordre supposé de 0.1, évite -∞
        let v = if v == 0.0 || v.is_nan() { 0.1 } else { v.abs() };
        let ordre_val = v.log10().floor();
        let ordre_inc = inc.abs().log10().floor();
        return (ordre_val - ordre_inc + 1.0).max(1.0) as i32;
    }

    ecrits
}

/// Rang décimal de `valeur`.
///
/// - incertitude > 0 : rang de l’incertitude arrondie à 1 chiffre (0.3 => 1, 200 => -2)
/// - décimal         : nombre de chiffres après la virgule ("0.45" => 2)
/// - entier          : -(zéros de queue) ("9000" => -3, "7" => 0)
pub fn rang_decimal(valeur: &str, incertitude: Option<&str>) -> i32 {
    if let Some(inc) = incertitude_lue(incertitude) {
        if inc > 0.0 {
            return rang_incertitude(inc);
        }
    }

    let (mantisse, exposant) = mantisse_exposant(valeur.trim());

    if let Some((_, apres)) = mantisse.split_once('.') {
        let n = apres.chars().filter(char::is_ascii_digit).count() as i32;
        return n.saturating_sub(exposant);
    }

    let chiffres: Vec<char> = mantisse.chars().filter(char::is_ascii_digit).collect();
    if chiffres.is_empty() {
        return 0;
    }
    let zeros_queue = chiffres.iter().rev().take_while(|&&c| c == '0').count() as i32;
    (-zeros_queue).saturating_sub(exposant)
}

/// Rang d’une incertitude strictement positive : ordre de grandeur de
/// incertitude / (coefficient arrondi à 1 chiffre), arrondi à l’entier.
fn rang_incertitude(inc: f64) -> i32 {
    let inc = inc.abs();
    if !inc.is_finite() {
        return 0;
    }
    let ordre = inc.log10().floor();

    let sci = format!("{:e}", inc);
    let coefficient = parse_float(sci.split('e').next().unwrap_or("1"));
    let arrondi = js_round(coefficient);
    let ordre_final = ordre + (coefficient.log10() - arrondi.log10());

    -(js_round(ordre_final) as i32)
}
