//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe) pour les expressions générées
//! - quickcheck pour les entrées arbitraires et les propriétés d’arrondi
//! - budget temps global
//! - invariant clé : le calcul ne panique jamais ; un résultat indéfini
//!   s’affiche "NaN", jamais une valeur inventée

use std::time::{Duration, Instant};

use quickcheck::{QuickCheck, TestResult};

use super::arrondi::arrondir;
use super::calcul::{calculer_propagation, calculer_valeurs_reelles, Options};
use super::eval::evaluer;
use super::format::parse_float;
use super::jetons::{analyser, former_expression};
use super::saisie::depuis_texte;
use super::solveur::resoudre;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Générateurs ------------------------ */

/// Littéral "v" ou "v±u" (décimales variées, zéros de queue possibles).
fn gen_mesure(rng: &mut Rng, positive: bool) -> String {
    let entier = rng.pick(200);
    let dec = rng.pick(3);
    let frac = rng.pick(10u32.pow(dec));
    let mut v = if dec == 0 {
        entier.to_string()
    } else {
        format!("{entier}.{frac:0width$}", width = dec as usize)
    };
    if !positive && rng.pick(5) == 0 {
        v.insert(0, '-');
    }
    if rng.coin() {
        let u = rng.pick(50) + 1;
        format!("{v}±{}.{}", u / 10, u % 10)
    } else {
        v
    }
}

/// Expression plate ou parenthésée, profondeur bornée.
fn gen_expr(rng: &mut Rng, profondeur: u32, ops: &[&str], positive: bool) -> String {
    if profondeur == 0 || rng.pick(3) == 0 {
        return gen_mesure(rng, positive);
    }
    let op = ops[rng.pick(ops.len() as u32) as usize];
    let g = gen_expr(rng, profondeur - 1, ops, positive);
    let d = gen_expr(rng, profondeur - 1, ops, positive);
    if rng.coin() {
        format!("({g}{op}{d})")
    } else {
        format!("{g}{op}{d}")
    }
}

/* ------------------------ Fuzz déterministe ------------------------ */

#[test]
fn fuzz_expressions_generees_sans_panique() {
    let start = Instant::now();
    let max = Duration::from_secs(10);
    let mut rng = Rng::new(0xC0FFEE);

    for _ in 0..400 {
        budget(start, max);
        let texte = gen_expr(&mut rng, 4, &["+", "-", "*", "/", " × ", " ÷ "], false);

        let Ok(s) = depuis_texte(&texte) else {
            continue;
        };
        let o = Options {
            jetons: Some(s.jetons),
            ..Options::default()
        };

        let p = calculer_propagation(&s.expression, &o);
        assert!(!p.affiche.valeur.is_empty(), "texte={texte:?}");
        assert!(!p.demarche.is_empty());

        let r = calculer_valeurs_reelles(&s.expression, &o);
        if !r.extremes.min.is_nan() && !r.extremes.max.is_nan() {
            assert!(r.extremes.min <= r.extremes.max, "texte={texte:?}");
        }
    }
}

#[test]
fn fuzz_sommes_plage_contient_le_nominal() {
    // + et - seuls : l’expression est monotone en chaque opérande
    let start = Instant::now();
    let max = Duration::from_secs(10);
    let mut rng = Rng::new(42);

    for _ in 0..300 {
        budget(start, max);
        let texte = gen_expr(&mut rng, 3, &["+", "-"], true);
        let expr = former_expression(&analyser(&texte));

        let nominal = resoudre(&expr, &mut Vec::new()).total.grandeur;
        let r = calculer_valeurs_reelles(&expr, &Options::default());
        let marge = 1e-9 * (1.0 + nominal.abs());

        assert!(
            r.extremes.min - marge <= nominal && nominal <= r.extremes.max + marge,
            "expr={expr:?} min={} nominal={nominal} max={}",
            r.extremes.min,
            r.extremes.max
        );
    }
}

#[test]
fn fuzz_resultat_indefini_reste_nan() {
    for texte in ["NaN±1+2", "2±0.1*NaN", "(NaN)*3±1", "1±0+"] {
        let c = calculer_propagation(texte, &Options::default());
        assert!(
            c.affiche.valeur.contains("NaN"),
            "texte={texte:?} affiche={}",
            c.affiche
        );
    }
}

/* ------------------------ quickcheck ------------------------ */

#[test]
fn qc_analyse_ne_panique_jamais() {
    fn prop(entree: String) -> TestResult {
        let _ = analyser(&entree);
        let _ = former_expression(&analyser(&entree));
        let _ = evaluer(&entree);
        let _ = resoudre(&entree, &mut Vec::new());
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn qc_calcul_ne_panique_jamais() {
    fn prop(entree: String) -> TestResult {
        let _ = calculer_propagation(&entree, &Options::default());
        let _ = calculer_valeurs_reelles(&entree, &Options::default());
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn qc_arrondi_decimal_idempotent() {
    fn prop(k: i32, j: u16, p: u8) -> TestResult {
        let p = i32::from(p % 5);
        let k = k % 10_000_000;
        let echelle = 10f64.powi(p);
        let v = f64::from(k) / echelle;
        let u = f64::from(j) / echelle;

        let une = arrondir(v, u, p, true);
        let deux = arrondir(parse_float(&une.valeur), parse_float(&une.incertitude), p, true);
        TestResult::from_bool(une == deux)
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(i32, u16, u8) -> TestResult);
}

#[test]
fn qc_evaluation_entiere_native() {
    fn prop(a: i16, b: i16, c: i16) -> TestResult {
        let (a, b, c) = (f64::from(a), f64::from(b), f64::from(c));
        let expr = format!("{a}+{b}*{c}");
        TestResult::from_bool(evaluer(&expr) == a + b * c)
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(i16, i16, i16) -> TestResult);
}
