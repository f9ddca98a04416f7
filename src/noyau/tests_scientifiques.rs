//! Tests scientifiques (campagne) : scénarios de bout en bout + invariants.
//!
//! Chaque test passe par les points d’entrée publics (saisie -> calcul),
//! comme le fait l’interface.
//!
//! Notes :
//! - Les sommes sont LINÉAIRES (pire cas), pas quadratiques : 0.3 + 0.1 = 0.4.
//! - Les comparaisons de f64 issues d’une évaluation passent par `proche`.

use super::analyse::{chiffres_significatifs, rang_decimal, EXACT};
use super::arrondi::arrondir;
use super::calcul::{calculer_propagation, calculer_valeurs_reelles, Options};
use super::demarche::Etape;
use super::extremes::Direction;
use super::format::parse_float;
use super::jetons::Op;
use super::mesure::Mesure;
use super::saisie::{depuis_lignes, depuis_texte, Ligne};
use super::solveur::{add_sub, mult_div, resoudre};

fn proche(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn options_de(texte: &str) -> (String, Options) {
    let s = depuis_texte(texte).unwrap_or_else(|e| panic!("texte={texte:?} err={e}"));
    (
        s.expression,
        Options {
            jetons: Some(s.jetons),
            ..Options::default()
        },
    )
}

fn incertitude(texte: &str) -> String {
    let (expr, o) = options_de(texte);
    calculer_propagation(&expr, &o).affiche.to_string()
}

fn m(s: &str) -> Mesure {
    Mesure::depuis_texte(s)
}

/* ------------------------ Analyse des nombres ------------------------ */

#[test]
fn sci_chiffres_significatifs_valeurs_exactes() {
    assert_eq!(chiffres_significatifs("5.00", Some("0")), 3);
    assert_eq!(chiffres_significatifs("500", Some("0")), EXACT);
    assert_eq!(rang_decimal("9000", Some("0")), -3);
    assert_eq!(rang_decimal("0.45", None), 2);
}

/* ------------------------ Règles de propagation ------------------------ */

#[test]
fn sci_regle_multiplication() {
    let mut trace = Vec::new();
    let r = mult_div(Op::Fois, (&m("2"), &m("0.1")), (&m("3"), &m("0.2")), &mut trace);
    assert_eq!(r.total, 6.0);
    assert!(proche(r.incertitude, 6.0 * (0.05 + 0.2 / 3.0)));
    assert!((r.incertitude - 0.7).abs() < 1e-3);

    match &trace[0] {
        Etape::Operation(op) => {
            let (r1, r2) = op.relatives.unwrap_or_default();
            assert!(proche(r1, 0.05));
            assert!((r2 - 0.0667).abs() < 1e-4);
        }
        autre => panic!("étape inattendue: {autre:?}"),
    }
}

#[test]
fn sci_regle_addition() {
    let mut trace = Vec::new();
    let r = add_sub(Op::Plus, (&m("5.2"), &m("0.1")), (&m("3.1"), &m("0.05")), &mut trace);
    assert!(proche(r.total, 8.3));
    assert!(proche(r.incertitude, 0.15));
    assert_eq!(r.precision, 1);
}

#[test]
fn sci_parentheses_puis_produit_exact() {
    let mut trace = Vec::new();
    let r = resoudre("(2±0.1+3±0.2)*4±0", &mut trace);

    // parenthèse d’abord : 5 ± 0.3
    let interieur = trace
        .iter()
        .position(|e| matches!(e, Etape::Parentheses(_)))
        .unwrap_or_else(|| panic!("pas d’étape parenthèses"));
    let produit = trace
        .iter()
        .position(|e| matches!(e, Etape::Operation(op) if op.relatives.is_some()))
        .unwrap_or_else(|| panic!("pas de produit"));
    assert!(interieur < produit);

    assert!(proche(r.total.grandeur, 20.0));
    assert_eq!(
        r.chiffres_significatifs,
        Some(chiffres_significatifs("5", Some("0.3")).min(EXACT))
    );
}

/* ------------------------ Extrêmes ------------------------ */

#[test]
fn sci_extremes_directionnels() {
    let (expr, o) = options_de("10±1 - 2±0.5");
    let c = calculer_valeurs_reelles(&expr, &o);

    assert_eq!(c.decisions[0].direction, Direction::Croissante);
    assert_eq!(c.decisions[1].direction, Direction::Decroissante);

    // max : (10+1) - (2-0.5) ; min : (10-1) - (2+0.5)
    assert_eq!(c.extremes.expr_max, "11-1.5");
    assert_eq!(c.extremes.expr_min, "9-2.5");
    assert_eq!(c.extremes.max, 9.5);
    assert_eq!(c.extremes.min, 6.5);
}

#[test]
fn sci_extremes_plage_contient_le_nominal() {
    for texte in ["4.5±0.3*2±0.1", "(2±0.1+3±0.2)*4", "10±1/2±0.5", "7±0.5-3±0.2*2"] {
        let (expr, o) = options_de(texte);
        let c = calculer_valeurs_reelles(&expr, &o);
        let nominal = resoudre(&expr, &mut Vec::new()).total.grandeur;
        assert!(
            c.extremes.min <= nominal + 1e-12 && nominal <= c.extremes.max + 1e-12,
            "texte={texte:?} min={} nominal={nominal} max={}",
            c.extremes.min,
            c.extremes.max
        );
    }
}

/* ------------------------ Arrondi ------------------------ */

#[test]
fn sci_idempotence_arrondi() {
    for (v, u, p, d) in [
        (6.5, 0.4, 1, true),
        (20.0, 2.0, 2, false),
        (0.0123, 0.0004, 2, false),
        (98765.0, 300.0, -2, true),
    ] {
        let une = arrondir(v, u, p, d);
        let deux = arrondir(parse_float(&une.valeur), parse_float(&une.incertitude), p, d);
        assert_eq!(une, deux, "v={v} u={u} p={p}");
    }
}

#[test]
fn sci_exact_ne_change_pas_la_grandeur() {
    for (v, u, attendu) in [(12.0, 0.5, "12.0"), (250.0, 0.0, "250"), (1.25, 0.01, "1.25")] {
        let p = arrondir(v, u, EXACT, false);
        assert_eq!(p.valeur, attendu);
        assert_eq!(parse_float(&p.valeur), v);
    }
}

/* ------------------------ Bout en bout ------------------------ */

#[test]
fn sci_bout_en_bout_lignes() {
    let lignes = [
        Ligne {
            valeur: "4.5".into(),
            incertitude: "0.3".into(),
            ..Ligne::default()
        },
        Ligne {
            valeur: "2".into(),
            incertitude: "0.1".into(),
            op: Op::Plus,
            ..Ligne::default()
        },
    ];
    let s = depuis_lignes(&lignes).unwrap_or_else(|e| panic!("{e}"));
    let o = Options {
        jetons: Some(s.jetons),
        ..Options::default()
    };
    let c = calculer_propagation(&s.expression, &o);
    assert_eq!(c.affiche.to_string(), "6.5 ± 0.4");
}

#[test]
fn sci_bout_en_bout_texte() {
    assert_eq!(incertitude("10±1*2±0"), "20 ± 2");
    assert_eq!(incertitude("10 ± 1 × 2"), "20 ± 2");
    assert_eq!(incertitude("(2±0.1+3±0.2)*4"), "20 ± 1");
    assert_eq!(incertitude("5.2±0.1+3.1±0.05"), "8.3 ± 0.2");
}

#[test]
fn sci_bout_en_bout_valeurs_reelles() {
    let (expr, o) = options_de("4.5±0.3+2±0.1");
    let c = calculer_valeurs_reelles(&expr, &o);
    assert_eq!(c.min.valeur, "6.1");
    assert_eq!(c.max.valeur, "6.9");
    assert_eq!(c.milieu.to_string(), "6.5 ± 0.4");
}

#[test]
fn sci_division_par_zero_sans_panique() {
    let texte = incertitude("1±0.1/0±0");
    assert!(texte.contains("Infinity") || texte.contains("NaN"), "{texte}");
}
