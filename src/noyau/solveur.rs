// src/noyau/solveur.rs
//
// Propagation des incertitudes (barres d’erreur)
// ----------------------------------------------
// Pipeline:
//   1) parenthèses les plus internes d’abord : contenu -> jetons -> pliage simple
//      -> remplacé par "total±incertitude" dans le texte ; on recommence
//   2) pliage simple du texte sans parenthèses
//   3) si ce dernier pliage n’a rien calculé (opérande seule), on hérite des
//      métadonnées de la dernière parenthèse résolue : "(2×3)" reste un produit
//
// Règles (sommes LINÉAIRES, pas quadratiques) :
// - × ÷ : incertitudes relatives additionnées ; chiffres significatifs = min
// - + - : incertitudes absolues additionnées ; rang décimal = le moins précis,
//         sauf si une seule des deux opérandes est exacte (elle ne dégrade rien)

use super::analyse::{chiffres_significatifs, rang_decimal};
use super::demarche::{Etape, GenreOperation, TraceOperation};
use super::jetons::{analyser, Jeton, Op, Operande};
use super::mesure::Mesure;

/// Garde-fou : nombre maximal de parenthèses résolues (défense, pas une limite du langage).
pub const MAX_ITERATIONS_PARENTHESES: usize = 50;

/// Résultat d’un pliage : valeur ± incertitude + classes d’opérations utilisées.
///
/// `chiffres_significatifs` / `rang_decimal` : précision dictée par la DERNIÈRE
/// opération de chaque classe (None si la classe n’a pas servi).
#[derive(Clone, Debug, PartialEq)]
pub struct ResultatPropagation {
    pub total: Mesure,
    pub incertitude: Mesure,
    pub mult_div: bool,
    pub add_sub: bool,
    pub chiffres_significatifs: Option<i32>,
    pub rang_decimal: Option<i32>,
}

impl ResultatPropagation {
    fn indefini() -> Self {
        Self {
            total: Mesure::depuis_valeur(f64::NAN),
            incertitude: Mesure::depuis_valeur(f64::NAN),
            mult_div: false,
            add_sub: false,
            chiffres_significatifs: None,
            rang_decimal: None,
        }
    }
}

/// Résultat d’une opération élémentaire.
/// `precision` = chiffres significatifs (× ÷) ou rang décimal (+ -).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResultatOperation {
    pub total: f64,
    pub incertitude: f64,
    pub precision: i32,
}

/* ------------------------ Règles élémentaires ------------------------ */

/// Produit / quotient de deux mesures.
pub fn mult_div(
    op: Op,
    (v1, u1): (&Mesure, &Mesure),
    (v2, u2): (&Mesure, &Mesure),
    trace: &mut Vec<Etape>,
) -> ResultatOperation {
    let cs1 = chiffres_significatifs(&v1.chiffres, Some(&u1.chiffres));
    let cs2 = chiffres_significatifs(&v2.chiffres, Some(&u2.chiffres));
    let cs = cs1.min(cs2);

    let (genre, total) = match op {
        Op::Divise => (GenreOperation::Division, v1.grandeur / v2.grandeur),
        _ => (GenreOperation::Multiplication, v1.grandeur * v2.grandeur),
    };

    let r1 = u1.grandeur / v1.grandeur.abs();
    let r2 = u2.grandeur / v2.grandeur.abs();
    let incertitude = total.abs() * (r1 + r2);

    tracing::debug!(?genre, v1 = %v1, v2 = %v2, total, incertitude, cs, "opération");

    trace.push(Etape::Operation(TraceOperation {
        genre,
        gauche: (v1.clone(), u1.clone()),
        droite: (v2.clone(), u2.clone()),
        total,
        incertitude,
        relatives: Some((r1, r2)),
    }));

    ResultatOperation {
        total,
        incertitude,
        precision: cs,
    }
}

/// Somme / différence de deux mesures.
pub fn add_sub(
    op: Op,
    (v1, u1): (&Mesure, &Mesure),
    (v2, u2): (&Mesure, &Mesure),
    trace: &mut Vec<Etape>,
) -> ResultatOperation {
    let rd1 = rang_decimal(&v1.chiffres, Some(&u1.chiffres));
    let rd2 = rang_decimal(&v2.chiffres, Some(&u2.chiffres));

    let (genre, total) = match op {
        Op::Moins => (GenreOperation::Soustraction, v1.grandeur - v2.grandeur),
        _ => (GenreOperation::Addition, v1.grandeur + v2.grandeur),
    };
    let incertitude = u1.grandeur + u2.grandeur;

    // une valeur exacte ne dégrade pas la précision de l’autre
    let rd = if u1.grandeur == 0.0 && u2.grandeur > 0.0 {
        rd2
    } else if u2.grandeur == 0.0 && u1.grandeur > 0.0 {
        rd1
    } else {
        rd1.min(rd2)
    };

    tracing::debug!(?genre, v1 = %v1, v2 = %v2, total, incertitude, rd, "opération");

    trace.push(Etape::Operation(TraceOperation {
        genre,
        gauche: (v1.clone(), u1.clone()),
        droite: (v2.clone(), u2.clone()),
        total,
        incertitude,
        relatives: None,
    }));

    ResultatOperation {
        total,
        incertitude,
        precision: rd,
    }
}

/* ------------------------ Parenthèses ------------------------ */

/// Paire de parenthèses la plus interne (la plus profonde, la plus à gauche).
/// Retourne les positions (octets) de "(" et ")" ; None s’il n’y a aucune paire complète.
pub fn trouver_parentheses_internes(expr: &str) -> Option<(usize, usize)> {
    let mut profondeur = 0usize;
    let mut max = 0usize;
    let mut debut = 0usize;

    for (i, c) in expr.char_indices() {
        match c {
            '(' => {
                profondeur += 1;
                if profondeur > max {
                    max = profondeur;
                    debut = i;
                }
            }
            ')' if max > 0 && profondeur == max => return Some((debut, i)),
            ')' => profondeur = profondeur.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/* ------------------------ Pliages ------------------------ */

fn remplacer(travail: &mut Vec<Jeton>, i: usize, r: &ResultatOperation) {
    travail[i - 1] = Jeton::Operande(Operande::nouvelle(
        Mesure::depuis_valeur(r.total),
        Mesure::depuis_valeur(r.incertitude),
    ));
    travail.drain(i..=i + 1);
}

fn mesures(o: &Operande) -> (&Mesure, &Mesure) {
    (&o.valeur, &o.incertitude)
}

/// Pliage d’une suite SANS parenthèses : × ÷ d’abord (gauche à droite), puis + -.
pub fn resoudre_simple(jetons: &[Jeton], trace: &mut Vec<Etape>) -> ResultatPropagation {
    let mut travail: Vec<Jeton> = jetons.to_vec();
    let mut res = ResultatPropagation::indefini();

    // Passe 1 : premier × ou ÷ encadré par deux opérandes, puis on recommence.
    loop {
        let trouve = (1..travail.len().saturating_sub(1)).find_map(|i| match &travail[i] {
            Jeton::Op(op) if op.est_mult_div() => {
                let a = travail[i - 1].operande()?;
                let b = travail[i + 1].operande()?;
                Some((i, *op, a, b))
            }
            _ => None,
        });
        let Some((i, op, a, b)) = trouve else {
            break;
        };

        let r = mult_div(op, mesures(a), mesures(b), trace);
        res.mult_div = true;
        res.chiffres_significatifs = Some(r.precision);
        remplacer(&mut travail, i, &r);
    }

    // Passe 2 : + - de gauche à droite.
    while travail.len() > 1 {
        let (Some(a), Some(Jeton::Op(op)), Some(b)) = (
            travail[0].operande(),
            travail.get(1),
            travail.get(2).and_then(Jeton::operande),
        ) else {
            break;
        };
        if op.est_mult_div() {
            break;
        }

        let r = add_sub(*op, mesures(a), mesures(b), trace);
        res.add_sub = true;
        res.rang_decimal = Some(r.precision);
        remplacer(&mut travail, 1, &r);
    }

    match travail.as_slice() {
        [Jeton::Operande(o)] => {
            res.total = o.valeur.clone();
            res.incertitude = o.incertitude.clone();
        }
        _ => {
            tracing::warn!(restant = travail.len(), "pliage incomplet : résultat indéfini");
            trace.push(Etape::Erreur(
                "Expression incomplète : résultat indéfini (NaN)".into(),
            ));
            res.total = Mesure::depuis_valeur(f64::NAN);
            res.incertitude = Mesure::depuis_valeur(f64::NAN);
        }
    }

    res
}

/// Propagation complète sur une expression "v±u" avec parenthèses.
pub fn resoudre(expression: &str, trace: &mut Vec<Etape>) -> ResultatPropagation {
    trace.push(Etape::Expression(expression.to_string()));

    let mut expr = expression.to_string();
    let mut derniere_parenthese: Option<ResultatPropagation> = None;
    let mut iterations = 0usize;

    while let Some((debut, fin)) = trouver_parentheses_internes(&expr) {
        iterations += 1;
        if iterations > MAX_ITERATIONS_PARENTHESES {
            tracing::warn!(%expr, "trop d’itérations de parenthèses");
            trace.push(Etape::Erreur(
                "Trop d’itérations de parenthèses : boucle interrompue".into(),
            ));
            break;
        }

        let interieur = &expr[debut + 1..fin];
        trace.push(Etape::Parentheses(interieur.to_string()));

        let r = resoudre_simple(&analyser(interieur), trace);
        expr = format!(
            "{}{}±{}{}",
            &expr[..debut],
            r.total,
            r.incertitude,
            &expr[fin + 1..]
        );
        derniere_parenthese = Some(r);
    }

    if derniere_parenthese.is_some() {
        trace.push(Etape::ApresParentheses(expr.clone()));
    }

    let jetons = analyser(&expr);
    let mut res = resoudre_simple(&jetons, trace);

    if let (1, Some(p)) = (jetons.len(), derniere_parenthese) {
        if !res.mult_div && !res.add_sub {
            res.mult_div = p.mult_div;
            res.add_sub = p.add_sub;
            res.chiffres_significatifs = p.chiffres_significatifs;
            res.rang_decimal = p.rang_decimal;
        }
    }

    tracing::debug!(
        total = %res.total,
        incertitude = %res.incertitude,
        mult_div = res.mult_div,
        add_sub = res.add_sub,
        "propagation terminée"
    );
    res
}
