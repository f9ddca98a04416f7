// src/noyau/extremes.rs
//
// Valeurs réelles (extrêmes)
// --------------------------
// Pour chaque opérande incertaine, on essaie v+u puis v-u (les autres restant
// nominales) et on regarde quel choix fait MONTER l’expression. L’expression du
// maximum prend ce choix, celle du minimum le choix inverse.
//
// Hypothèse : l’expression est monotone en chaque opérande sur [v-u, v+u].
// (faux près d’un pôle, p.ex. 1/(x±u) avec u > |x| : on ne le détecte pas)

use super::eval::evaluer;
use super::format::{format_trace, js_max, js_min};
use super::jetons::Jeton;

/// Valeur substituée pour une opérande.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choix {
    Nominale,
    Haute,
    Basse,
}

/// Effet d’une opérande sur l’expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// augmenter l’opérande augmente l’expression
    Croissante,
    /// augmenter l’opérande diminue l’expression
    Decroissante,
    /// pas d’incertitude (ou essai indéfini) : valeur nominale partout
    Exacte,
}

impl Direction {
    fn pour_max(self) -> Choix {
        match self {
            Direction::Croissante => Choix::Haute,
            Direction::Decroissante => Choix::Basse,
            Direction::Exacte => Choix::Nominale,
        }
    }

    fn pour_min(self) -> Choix {
        match self {
            Direction::Croissante => Choix::Basse,
            Direction::Decroissante => Choix::Haute,
            Direction::Exacte => Choix::Nominale,
        }
    }
}

/// Essai v+u / v-u d’une opérande.
#[derive(Clone, Debug, PartialEq)]
pub struct Essai {
    pub expr_haute: String,
    pub val_haute: f64,
    pub expr_basse: String,
    pub val_basse: f64,
}

/// Décision prise pour une opérande (trace de la démarche).
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionOperande {
    /// rang de l’opérande, à partir de 1
    pub numero: usize,
    pub nominale: f64,
    pub incertitude: f64,
    pub essai: Option<Essai>,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultatExtremes {
    pub expr_max: String,
    pub expr_min: String,
    pub eval_max: f64,
    pub eval_min: f64,
    /// min(eval_min, eval_max) : l’hypothèse de monotonie peut inverser les deux
    pub min: f64,
    pub max: f64,
}

/* ------------------------ Construction ------------------------ */

/// (nominale, incertitude) de chaque opérande ; incertitude illisible => 0.
fn bornes(jetons: &[Jeton]) -> Vec<(f64, f64)> {
    jetons
        .iter()
        .filter_map(Jeton::operande)
        .map(|o| {
            let u = o.incertitude.grandeur;
            let u = if o.est_exacte() || u.is_nan() { 0.0 } else { u };
            (o.valeur.grandeur, u)
        })
        .collect()
}

/// Réécrit l’expression numérique avec, pour chaque opérande, la valeur choisie.
/// Les parenthèses sont recopiées, les nombres rendus à 12 chiffres.
pub fn construire_expression(jetons: &[Jeton], choix: &[Choix]) -> String {
    let mut s = String::new();
    let mut k = 0usize;

    for j in jetons {
        match j {
            Jeton::Operande(o) => {
                let v = o.valeur.grandeur;
                let u = o.incertitude.grandeur;
                let u = if u.is_nan() { 0.0 } else { u };
                let x = match choix.get(k).copied().unwrap_or(Choix::Nominale) {
                    Choix::Nominale => v,
                    Choix::Haute => v + u,
                    Choix::Basse => v - u,
                };
                s.push_str(&"(".repeat(o.ouvrantes));
                s.push_str(&format_trace(x));
                s.push_str(&")".repeat(o.fermantes));
                k += 1;
            }
            Jeton::Op(op) => s.push(op.symbole()),
        }
    }
    s
}

/* ------------------------ Évaluation ------------------------ */

/// Min / max réels d’une suite de jetons. `decisions` reçoit une entrée par opérande.
pub fn evaluer_extremes(jetons: &[Jeton], decisions: &mut Vec<DecisionOperande>) -> ResultatExtremes {
    let bornes = bornes(jetons);
    let n = bornes.len();
    let mut directions = Vec::with_capacity(n);

    for (k, &(nominale, incertitude)) in bornes.iter().enumerate() {
        let (essai, direction) = if incertitude == 0.0 {
            (None, Direction::Exacte)
        } else {
            let mut choix = vec![Choix::Nominale; n];
            choix[k] = Choix::Haute;
            let expr_haute = construire_expression(jetons, &choix);
            choix[k] = Choix::Basse;
            let expr_basse = construire_expression(jetons, &choix);

            let val_haute = evaluer(&expr_haute);
            let val_basse = evaluer(&expr_basse);

            let direction = if val_haute.is_nan() || val_basse.is_nan() {
                Direction::Exacte
            } else if val_haute >= val_basse {
                Direction::Croissante
            } else {
                Direction::Decroissante
            };

            (
                Some(Essai {
                    expr_haute,
                    val_haute,
                    expr_basse,
                    val_basse,
                }),
                direction,
            )
        };

        tracing::debug!(numero = k + 1, nominale, incertitude, ?direction, "décision d’extrême");

        directions.push(direction);
        decisions.push(DecisionOperande {
            numero: k + 1,
            nominale,
            incertitude,
            essai,
            direction,
        });
    }

    let choix_max: Vec<Choix> = directions.iter().map(|d| d.pour_max()).collect();
    let choix_min: Vec<Choix> = directions.iter().map(|d| d.pour_min()).collect();

    let expr_max = construire_expression(jetons, &choix_max);
    let expr_min = construire_expression(jetons, &choix_min);
    let eval_max = evaluer(&expr_max);
    let eval_min = evaluer(&expr_min);

    let r = ResultatExtremes {
        min: js_min(eval_min, eval_max),
        max: js_max(eval_min, eval_max),
        expr_max,
        expr_min,
        eval_max,
        eval_min,
    };
    tracing::debug!(min = r.min, max = r.max, "extrêmes");
    r
}
