// src/noyau/demarche.rs
//
// Démarche (explication pas à pas)
// --------------------------------
// Le solveur et l’évaluateur d’extrêmes émettent des ÉTAPES structurées ;
// ce module les met en blocs titrés pour l’affichage ("Étape 2 : Addition").
// Aucun texte n’est relu ni analysé après coup.

use std::fmt;

use super::calcul::{CalculPropagation, CalculReel};
use super::extremes::{DecisionOperande, Direction};
use super::format::{format_trace, js_texte, to_fixed};
use super::mesure::Mesure;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreOperation {
    Multiplication,
    Division,
    Addition,
    Soustraction,
}

impl GenreOperation {
    pub fn nom(self) -> &'static str {
        match self {
            GenreOperation::Multiplication => "Multiplication",
            GenreOperation::Division => "Division",
            GenreOperation::Addition => "Addition",
            GenreOperation::Soustraction => "Soustraction",
        }
    }

    pub fn symbole(self) -> char {
        match self {
            GenreOperation::Multiplication => '×',
            GenreOperation::Division => '÷',
            GenreOperation::Addition => '+',
            GenreOperation::Soustraction => '-',
        }
    }
}

/// Opération élémentaire effectuée par le solveur.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceOperation {
    pub genre: GenreOperation,
    pub gauche: (Mesure, Mesure),
    pub droite: (Mesure, Mesure),
    pub total: f64,
    pub incertitude: f64,
    /// incertitudes relatives (× ÷ seulement)
    pub relatives: Option<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Etape {
    Expression(String),
    Parentheses(String),
    ApresParentheses(String),
    Operation(TraceOperation),
    Erreur(String),
}

/// Bloc affiché : un titre et ses lignes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bloc {
    pub titre: String,
    pub lignes: Vec<String>,
}

impl fmt::Display for Bloc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.titre)?;
        for l in &self.lignes {
            writeln!(f, "   {l}")?;
        }
        Ok(())
    }
}

/// Numérotation des blocs.
struct Redaction {
    blocs: Vec<Bloc>,
}

impl Redaction {
    fn new() -> Self {
        Self { blocs: Vec::new() }
    }

    fn bloc(&mut self, titre: &str, lignes: Vec<String>) {
        let n = self.blocs.len() + 1;
        self.blocs.push(Bloc {
            titre: format!("Étape {n} : {titre}"),
            lignes,
        });
    }
}

/* ------------------------ Mode incertitude ------------------------ */

fn lignes_operation(op: &TraceOperation) -> Vec<String> {
    let (v1, u1) = &op.gauche;
    let (v2, u2) = &op.droite;
    let s = op.genre.symbole();
    let total = js_texte(op.total);
    let inc = js_texte(op.incertitude);

    let mut l = vec![
        format!("{v1} ± {u1} {s} {v2} ± {u2}"),
        format!("Valeur : {v1} {s} {v2} = {total}"),
    ];

    match op.relatives {
        Some((r1, r2)) => {
            let r = r1 + r2;
            l.push(format!(
                "Incertitude relative : {u1}/{} + {u2}/{} = {} + {} = {}",
                js_texte(v1.grandeur.abs()),
                js_texte(v2.grandeur.abs()),
                to_fixed(r1, 4),
                to_fixed(r2, 4),
                to_fixed(r, 4),
            ));
            l.push(format!(
                "Incertitude absolue : |{total}| × {} = {inc}",
                to_fixed(r, 4)
            ));
        }
        None => l.push(format!("Incertitude : {u1} + {u2} = {inc}")),
    }

    l.push(format!("Résultat : {total} ± {inc}"));
    l
}

/// Blocs de la démarche en mode incertitude.
pub fn demarche_propagation(c: &CalculPropagation) -> Vec<Bloc> {
    let mut r = Redaction::new();
    r.bloc("Expression", vec![c.expression.clone()]);

    for etape in &c.trace {
        match etape {
            // déjà donnée en tête
            Etape::Expression(_) => {}
            Etape::Parentheses(s) => r.bloc("Parenthèses", vec![format!("Calcul de ({s})")]),
            Etape::ApresParentheses(s) => r.bloc("Expression simplifiée", vec![s.clone()]),
            Etape::Operation(op) => r.bloc(op.genre.nom(), lignes_operation(op)),
            Etape::Erreur(s) => r.bloc("Avertissement", vec![s.clone()]),
        }
    }

    r.bloc(
        "Arrondi",
        vec![
            c.raison.to_string(),
            format!("Précision retenue : {}", c.choix.libelle),
            format!(
                "Avant arrondi : {} ± {}",
                format_trace(c.resultat.total.grandeur),
                format_trace(c.resultat.incertitude.grandeur)
            ),
            format!("Après arrondi : {}", c.affiche),
        ],
    );
    r.bloc(
        "Résultat final",
        vec![
            c.affiche.to_string(),
            format!("Plage : {} à {}", c.plage.0, c.plage.1),
        ],
    );
    r.blocs
}

/* ------------------------ Mode valeurs réelles ------------------------ */

fn lignes_decision(d: &DecisionOperande) -> Vec<String> {
    let mut l = vec![
        format!("Valeur {} = {}", d.numero, format_trace(d.nominale)),
        format!("Incertitude = {}", format_trace(d.incertitude)),
    ];

    let (haut, bas) = match d.direction {
        Direction::Croissante => ("l’augmente", "la diminue"),
        Direction::Decroissante => ("la diminue", "l’augmente"),
        Direction::Exacte => {
            l.push(match &d.essai {
                None => "Valeur exacte : gardée telle quelle dans les deux cas".into(),
                Some(_) => "Effet indéterminé : valeur nominale gardée".into(),
            });
            return l;
        }
    };

    l.push(format!("HAUT = {}", format_trace(d.nominale + d.incertitude)));
    l.push(format!("Effet sur l’expression : {haut}"));
    l.push(format!("BAS = {}", format_trace(d.nominale - d.incertitude)));
    l.push(format!("Effet sur l’expression : {bas}"));
    l
}

/// Blocs de la démarche en mode valeurs réelles.
pub fn demarche_reelle(c: &CalculReel) -> Vec<Bloc> {
    let mut r = Redaction::new();
    let e = &c.extremes;

    r.bloc("Expression", vec![c.expression.clone()]);

    let mut plages = Vec::new();
    for (i, d) in c.decisions.iter().enumerate() {
        if i > 0 {
            plages.push(String::new());
        }
        plages.extend(lignes_decision(d));
    }
    r.bloc("Plages des valeurs et effet sur l’expression", plages);

    r.bloc(
        "Expressions extrêmes",
        vec![
            format!("Expression du minimum : {}", e.expr_min),
            format!("Expression du maximum : {}", e.expr_max),
            format!("Valeur minimale : {}", format_trace(e.eval_min)),
            format!("Valeur maximale : {}", format_trace(e.eval_max)),
        ],
    );

    r.bloc(
        "Arrondi",
        vec![
            c.raison.to_string(),
            format!("Précision retenue : {}", c.choix.libelle),
            format!(
                "Plage avant arrondi : {} à {}",
                format_trace(e.min),
                format_trace(e.max)
            ),
            format!("Plage après arrondi : {} à {}", c.min.valeur, c.max.valeur),
        ],
    );

    let milieu = format_trace(c.point_milieu);
    r.bloc(
        "Incertitude",
        vec![
            format!(
                "Milieu de la plage : ({}+{})/2 = {milieu}",
                format_trace(e.min),
                format_trace(e.max)
            ),
            format!(
                "Incertitude : {milieu} - {} = {}",
                format_trace(e.min),
                format_trace(c.pseudo_incertitude)
            ),
            format!("Arrondi : {}", c.milieu),
        ],
    );

    r.blocs
}
