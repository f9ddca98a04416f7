// src/noyau/format.rs
//
// Rendu des nombres f64 "comme le navigateur"
// --------------------------------------------
// La calculatrice vit dans une page web : les chaînes affichées doivent être
// celles de Number.prototype.toString / toFixed / toPrecision, et les arrondis
// ceux de Math.round / parseFloat. Toute la précision passe par ici.
//
// Règles:
// - toFixed / toPrecision travaillent sur la valeur décimale EXACTE du f64
//   (égalité parfaite => on prend le plus grand entier, donc "demi vers le haut"
//   sur la magnitude).
// - toString utilise les chiffres les plus courts qui relisent le même f64.
// - Aucune fonction ne panique : NaN / ±∞ ressortent en "NaN" / "Infinity".

/// Chiffres significatifs demandés pour les traces (valeurs perturbées, plages).
pub const PRECISION_TRACE: i32 = 12;

/* ------------------------ Décomposition décimale ------------------------ */

/// Décompose un flottant fini strictement positif en (chiffres, n) tels que
/// x = 0.d1d2d3… × 10^n (d1 ≠ 0, pas de zéro final).
///
/// `exact = false` : chiffres les plus courts (aller-retour garanti).
/// `exact = true`  : développement décimal complet du f64.
fn decomposer(x: f64, exact: bool) -> (Vec<u8>, i32) {
    // 767 chiffres significatifs suffisent pour n’importe quel f64.
    let sci = if exact {
        format!("{:.800e}", x)
    } else {
        format!("{:e}", x)
    };

    let (mantisse, exposant) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exposant: i32 = exposant.parse().unwrap_or(0);

    let mut chiffres: Vec<u8> = mantisse
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|c| c - b'0')
        .collect();
    while chiffres.len() > 1 && chiffres.last() == Some(&0) {
        chiffres.pop();
    }

    (chiffres, exposant + 1)
}

/// Entier formé des `garder` premiers chiffres (complétés par des zéros),
/// arrondi demi-supérieur sur le chiffre suivant. Peut gagner un chiffre (retenue).
fn arrondir_chiffres(chiffres: &[u8], garder: i32) -> Vec<u8> {
    if garder < 0 {
        return Vec::new();
    }
    let g = garder as usize;
    let mut m: Vec<u8> = (0..g).map(|i| chiffres.get(i).copied().unwrap_or(0)).collect();

    if chiffres.get(g).is_some_and(|&c| c >= 5) {
        let mut i = m.len();
        loop {
            if i == 0 {
                m.insert(0, 1);
                break;
            }
            i -= 1;
            if m[i] == 9 {
                m[i] = 0;
            } else {
                m[i] += 1;
                break;
            }
        }
    }
    m
}

fn en_texte(chiffres: &[u8]) -> String {
    chiffres.iter().map(|&c| char::from(b'0' + c)).collect()
}

fn zeros(n: i32) -> String {
    "0".repeat(n.max(0) as usize)
}

/* ------------------------ Number.prototype.toString ------------------------ */

/// Rendu “String(x)” : chiffres minimaux, notation exponentielle hors [1e-7, 1e21).
pub fn js_texte(x: f64) -> String {
    if x.is_nan() {
        return "NaN".into();
    }
    if x == 0.0 {
        return "0".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if x < 0.0 {
        return format!("-{}", js_texte(-x));
    }

    let (d, n) = decomposer(x, false);
    let k = d.len() as i32;
    let s = en_texte(&d);

    if k <= n && n <= 21 {
        return format!("{s}{}", zeros(n - k));
    }
    if 0 < n && n <= 21 {
        let (a, b) = s.split_at(n as usize);
        return format!("{a}.{b}");
    }
    if -6 < n && n <= 0 {
        return format!("0.{}{s}", zeros(-n));
    }

    let e = n - 1;
    let signe = if e < 0 { '-' } else { '+' };
    let (a, b) = s.split_at(1);
    if b.is_empty() {
        format!("{a}e{signe}{}", e.abs())
    } else {
        format!("{a}.{b}e{signe}{}", e.abs())
    }
}

/* ------------------------ toFixed / toPrecision ------------------------ */

/// `x.toFixed(f)` ; `f` borné à 0..=100 (au-delà le navigateur lève une erreur).
pub fn to_fixed(x: f64, f: i32) -> String {
    let f = f.clamp(0, 100);
    if x.is_nan() {
        return "NaN".into();
    }
    if x.abs() >= 1e21 || x.is_infinite() {
        return js_texte(x);
    }

    // -0.0 < 0 est faux : pas de signe pour le zéro négatif.
    let signe = if x < 0.0 { "-" } else { "" };
    let x = x.abs();

    let m = if x == 0.0 {
        Vec::new()
    } else {
        let (d, n) = decomposer(x, true);
        arrondir_chiffres(&d, n + f)
    };

    let mut s = en_texte(&m);
    if s.is_empty() {
        s.push('0');
    }
    if f == 0 {
        return format!("{signe}{s}");
    }

    let f = f as usize;
    if s.len() <= f {
        s = format!("{}{s}", "0".repeat(f + 1 - s.len()));
    }
    let (a, b) = s.split_at(s.len() - f);
    format!("{signe}{a}.{b}")
}

/// `x.toPrecision(p)` ; `p` borné à 1..=100.
pub fn to_precision(x: f64, p: i32) -> String {
    let p = p.clamp(1, 100);
    if x.is_nan() || x.is_infinite() {
        return js_texte(x);
    }

    let signe = if x < 0.0 { "-" } else { "" };
    let x = x.abs();

    let (m, e) = if x == 0.0 {
        (vec![0u8; p as usize], 0)
    } else {
        let (d, n) = decomposer(x, true);
        let mut m = arrondir_chiffres(&d, p);
        let mut e = n - 1;
        if m.len() > p as usize {
            m.truncate(p as usize);
            e += 1;
        }
        (m, e)
    };
    let s = en_texte(&m);

    if e < -6 || e >= p {
        let (a, b) = s.split_at(1);
        let signe_e = if e < 0 { '-' } else { '+' };
        if b.is_empty() {
            return format!("{signe}{a}e{signe_e}{}", e.abs());
        }
        return format!("{signe}{a}.{b}e{signe_e}{}", e.abs());
    }

    if e == p - 1 {
        return format!("{signe}{s}");
    }
    if e >= 0 {
        let (a, b) = s.split_at((e + 1) as usize);
        return format!("{signe}{a}.{b}");
    }
    format!("{signe}0.{}{s}", zeros(-(e + 1)))
}

/* ------------------------ Math.round / parseFloat ------------------------ */

/// `Math.round` : demi vers +∞ (donc -2.5 => -2).
pub fn js_round(x: f64) -> f64 {
    let plancher = x.floor();
    if x - plancher >= 0.5 {
        plancher + 1.0
    } else {
        plancher
    }
}

/// `parseFloat` : lit le plus long préfixe décimal valide, NaN sinon.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut i = 0;

    let negatif = b.first() == Some(&b'-');
    if matches!(b.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if negatif {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut nb_chiffres = 0;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        nb_chiffres += 1;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
            nb_chiffres += 1;
        }
    }
    if nb_chiffres == 0 {
        return f64::NAN;
    }

    // exposant retenu seulement s’il est complet ("1e" => 1)
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let debut = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > debut {
            i = j;
        }
    }

    s[..i].parse::<f64>().unwrap_or(f64::NAN)
}

/* ------------------------ Helpers de trace ------------------------ */

/// Rendu court pour les traces : 12 chiffres significatifs, sans artefacts
/// du type 3.8999999999999995.
pub fn format_trace(x: f64) -> String {
    if !x.is_finite() {
        return js_texte(x);
    }
    js_texte(parse_float(&to_precision(x, PRECISION_TRACE)))
}

/// `Math.min` : NaN contamine le résultat.
pub fn js_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// `Math.max` : NaN contamine le résultat.
pub fn js_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texte_courant() {
        assert_eq!(js_texte(6.5), "6.5");
        assert_eq!(js_texte(20.0), "20");
        assert_eq!(js_texte(-0.25), "-0.25");
        assert_eq!(js_texte(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(js_texte(-0.0), "0");
    }

    #[test]
    fn texte_exponentiel() {
        assert_eq!(js_texte(1e21), "1e+21");
        assert_eq!(js_texte(1.5e-7), "1.5e-7");
        assert_eq!(js_texte(0.000001), "0.000001");
        assert_eq!(js_texte(123456789012345680000.0), "123456789012345680000");
        assert_eq!(js_texte(f64::NAN), "NaN");
        assert_eq!(js_texte(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn fixed() {
        assert_eq!(to_fixed(6.5, 1), "6.5");
        assert_eq!(to_fixed(0.4, 2), "0.40");
        assert_eq!(to_fixed(20.0, 0), "20");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.004, 2), "0.00");
        assert_eq!(to_fixed(0.005, 2), "0.01");
        assert_eq!(to_fixed(-0.0001, 2), "-0.00");
        assert_eq!(to_fixed(0.0, 3), "0.000");
        assert_eq!(to_fixed(99.96, 1), "100.0");
        // 1.005 vaut 1.00499999999999989… en binaire
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn precision() {
        assert_eq!(to_precision(100.0, 3), "100");
        assert_eq!(to_precision(123.456, 2), "1.2e+2");
        assert_eq!(to_precision(6.0, 2), "6.0");
        assert_eq!(to_precision(0.000123, 2), "0.00012");
        assert_eq!(to_precision(0.0000001234, 2), "1.2e-7");
        assert_eq!(to_precision(2.5, 1), "3");
        assert_eq!(to_precision(-2.5, 1), "-3");
        assert_eq!(to_precision(0.0, 3), "0.00");
        assert_eq!(to_precision(9.99, 2), "10");
        assert_eq!(to_precision(3.8999999999999995, 12), "3.90000000000");
    }

    #[test]
    fn round_js() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(0.49999999999999994), 0.0);
        assert!(js_round(f64::NAN).is_nan());
    }

    #[test]
    fn parse() {
        assert_eq!(parse_float("4.5"), 4.5);
        assert_eq!(parse_float("  -.5abc"), -0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("1.2e-3x"), 0.0012);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("").is_nan());
    }

    #[test]
    fn trace() {
        assert_eq!(format_trace(3.8999999999999995), "3.9");
        assert_eq!(format_trace(11.0), "11");
        assert_eq!(format_trace(f64::NAN), "NaN");
    }
}
