//! Noyau — évaluation numérique (sans incertitudes)
//!
//! tokenize -> RPN -> f64
//!
//! Sert au calcul des extrêmes : les expressions évaluées ici sont construites
//! par le noyau lui-même (valeurs perturbées, parenthèses recopiées).
//! Contrat : JAMAIS d’erreur remontée. Une syntaxe refusée donne NaN, que
//! l’appelant doit tester avant de s’en servir.

use super::rpn::{eval_rpn, to_rpn, tokenize};

/// Évalue une expression numérique ; NaN si elle est mal formée.
pub fn evaluer(expr: &str) -> f64 {
    // alias d’affichage acceptés
    let expr = expr.replace('×', "*").replace('÷', "/");

    match tokenize(&expr).and_then(|t| to_rpn(&t)).and_then(|r| eval_rpn(&r)) {
        Ok(v) => v,
        Err(msg) => {
            tracing::debug!(%expr, %msg, "évaluation numérique refusée");
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::evaluer;

    fn ok(s: &str) -> f64 {
        let v = evaluer(s);
        assert!(!v.is_nan(), "evaluer({s:?}) a donné NaN");
        v
    }

    #[test]
    fn precedence_et_associativite() {
        assert_eq!(ok("2+3*4"), 14.0);
        assert_eq!(ok("(2+3)*4"), 20.0);
        assert_eq!(ok("8/4/2"), 1.0);
        assert_eq!(ok("10-4-3"), 3.0);
        assert_eq!(ok("2*3/4"), 1.5);
    }

    #[test]
    fn expressions_d_extremes() {
        assert_eq!(ok("11-1.5"), 9.5);
        assert_eq!(ok("((2+3)*4)"), 20.0);
        assert_eq!(ok("10*-2"), -20.0);
        assert_eq!(ok("1e-7*1e7"), 1.0);
    }

    #[test]
    fn arithmetique_native() {
        assert_eq!(ok("0.1+0.2"), 0.1 + 0.2);
        assert_eq!(evaluer("1/0"), f64::INFINITY);
        assert!(evaluer("0/0").is_nan());
        assert_eq!(ok("6×2÷4"), 3.0);
    }

    #[test]
    fn syntaxe_invalide_donne_nan() {
        for s in ["", "2+", "(2", "2±1", "((", "abc", "2 3"] {
            assert!(evaluer(s).is_nan(), "{s:?}");
        }
        assert!(evaluer("NaN+1").is_nan());
    }
}
