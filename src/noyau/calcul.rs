// src/noyau/calcul.rs
//
// Les deux modes de calcul
// ------------------------
// - incertitude : propagation (solveur) -> précision -> arrondi -> démarche
// - valeurs réelles : extrêmes (évaluation numérique) -> précision (métadonnées
//   d’un pliage silencieux) -> arrondi de min / max / milieu -> démarche
//
// Fonctions pures : aucune entrée ne fait échouer le calcul, au pire le
// résultat affiché vaut "NaN ± NaN".

use super::analyse::chiffres_significatifs;
use super::arrondi::{arrondir, PaireFormatee};
use super::demarche::{demarche_propagation, demarche_reelle, Bloc, Etape};
use super::extremes::{evaluer_extremes, DecisionOperande, ResultatExtremes};
use super::format::{format_trace, parse_float};
use super::jetons::{analyser, operandes, Jeton};
use super::precision::{choisir_precision, raison_arrondi, ChoixPrecision, ForcePrecision};
use super::solveur::{resoudre, ResultatPropagation};

/// Options communes aux deux modes.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// jetons déjà formés (saisie par lignes) ; sinon l’expression est analysée
    pub jetons: Option<Vec<Jeton>>,
    pub force: ForcePrecision,
}

impl Options {
    fn jetons_pour(&self, expression: &str) -> Vec<Jeton> {
        match &self.jetons {
            Some(j) if !j.is_empty() => j.clone(),
            _ => analyser(expression),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CalculPropagation {
    pub expression: String,
    pub resultat: ResultatPropagation,
    pub trace: Vec<Etape>,
    pub raison: &'static str,
    pub choix: ChoixPrecision,
    pub affiche: PaireFormatee,
    /// valeur - incertitude, valeur + incertitude (affichées)
    pub plage: (String, String),
    pub demarche: Vec<Bloc>,
}

#[derive(Clone, Debug)]
pub struct CalculReel {
    pub expression: String,
    pub decisions: Vec<DecisionOperande>,
    pub extremes: ResultatExtremes,
    pub raison: &'static str,
    pub choix: ChoixPrecision,
    pub min: PaireFormatee,
    pub max: PaireFormatee,
    pub milieu: PaireFormatee,
    pub pseudo_incertitude: f64,
    pub point_milieu: f64,
    pub demarche: Vec<Bloc>,
}

/* ------------------------ Mode incertitude ------------------------ */

pub fn calculer_propagation(expression: &str, options: &Options) -> CalculPropagation {
    let jetons = options.jetons_pour(expression);

    let mut trace = Vec::new();
    let resultat = resoudre(expression, &mut trace);

    let mut choix = choisir_precision(&resultat, &options.force, operandes(&jetons));
    let total = resultat.total.grandeur;
    let inc = resultat.incertitude.grandeur;

    let mut affiche = arrondir(total, inc, choix.precision, choix.rang_decimal);

    // l’incertitude arrondie peut exiger plus de chiffres que prévu
    if !choix.rang_decimal {
        let requis = chiffres_significatifs(&affiche.incertitude, Some(&affiche.incertitude));
        if requis > choix.precision {
            tracing::debug!(avant = choix.precision, apres = requis, "précision élargie");
            choix = ChoixPrecision::chiffres(requis);
            affiche = arrondir(total, inc, choix.precision, false);
        }
    }

    let v = parse_float(&affiche.valeur);
    let u = parse_float(&affiche.incertitude);
    let plage = (format_trace(v - u), format_trace(v + u));

    let mut c = CalculPropagation {
        expression: expression.to_string(),
        raison: raison_arrondi(&resultat),
        resultat,
        trace,
        choix,
        affiche,
        plage,
        demarche: Vec::new(),
    };
    c.demarche = demarche_propagation(&c);

    tracing::info!(expression, resultat = %c.affiche, "calcul (incertitude)");
    c
}

/* ------------------------ Mode valeurs réelles ------------------------ */

struct Arrondis {
    min: PaireFormatee,
    max: PaireFormatee,
    milieu: PaireFormatee,
}

fn arrondir_plage(e: &ResultatExtremes, pseudo: f64, milieu: f64, choix: &ChoixPrecision) -> Arrondis {
    let (p, d) = (choix.precision, choix.rang_decimal);
    Arrondis {
        max: arrondir(e.max, pseudo, p, d),
        min: arrondir(e.min, pseudo, p, d),
        milieu: arrondir(milieu, pseudo, p, d),
    }
}

pub fn calculer_valeurs_reelles(expression: &str, options: &Options) -> CalculReel {
    let jetons = options.jetons_pour(expression);

    let mut decisions = Vec::new();
    let extremes = evaluer_extremes(&jetons, &mut decisions);

    // pliage silencieux : seulement pour les classes d’opérations
    let metadonnees = resoudre(expression, &mut Vec::new());

    let mut choix = choisir_precision(&metadonnees, &options.force, operandes(&jetons));

    let pseudo_incertitude = (extremes.max - extremes.min).abs() / 2.0;
    let point_milieu = (extremes.min + extremes.max) / 2.0;

    let mut a = arrondir_plage(&extremes, pseudo_incertitude, point_milieu, &choix);

    if !choix.rang_decimal {
        let requis = chiffres_significatifs(&a.milieu.incertitude, Some(&a.milieu.incertitude))
            .max(chiffres_significatifs(&a.milieu.valeur, None));
        if requis > choix.precision {
            tracing::debug!(avant = choix.precision, apres = requis, "précision élargie");
            choix = ChoixPrecision::chiffres(requis);
            a = arrondir_plage(&extremes, pseudo_incertitude, point_milieu, &choix);
        }
    }

    let mut c = CalculReel {
        expression: expression.to_string(),
        raison: raison_arrondi(&metadonnees),
        decisions,
        extremes,
        choix,
        min: a.min,
        max: a.max,
        milieu: a.milieu,
        pseudo_incertitude,
        point_milieu,
        demarche: Vec::new(),
    };
    c.demarche = demarche_reelle(&c);

    tracing::info!(
        expression,
        min = %c.min.valeur,
        max = %c.max.valeur,
        "calcul (valeurs réelles)"
    );
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagation_somme() {
        let c = calculer_propagation("4.5±0.3+2±0.1", &Options::default());
        assert_eq!(c.affiche.to_string(), "6.5 ± 0.4");
        assert!(c.choix.rang_decimal);
        assert_eq!(c.plage, ("6.1".to_string(), "6.9".to_string()));
    }

    #[test]
    fn propagation_produit_par_exact() {
        let c = calculer_propagation("10±1*2±0", &Options::default());
        assert_eq!(c.affiche.to_string(), "20 ± 2");
        assert_eq!(c.choix.precision, 2);
    }

    #[test]
    fn elargissement_incertitude_nulle() {
        // incertitude nulle => la valeur n’est plus limitée en chiffres
        let c = calculer_propagation("2.5±0*2±0", &Options::default());
        assert_eq!(c.affiche.incertitude, "0");
        assert_eq!(c.affiche.valeur, "5");
    }

    #[test]
    fn precision_forcee() {
        let o = Options {
            force: ForcePrecision::decimales(2),
            ..Options::default()
        };
        let c = calculer_propagation("4.5±0.3+2±0.1", &o);
        assert_eq!(c.affiche.to_string(), "6.50 ± 0.40");
    }

    #[test]
    fn jetons_fournis() {
        // les extrêmes suivent les jetons de la saisie, pas le texte
        let o = Options {
            jetons: Some(analyser("4.5±0.3+2±0.1")),
            ..Options::default()
        };
        let c = calculer_valeurs_reelles("4.5±0.3+2±0.1", &o);
        assert_eq!(c.decisions.len(), 2);
        assert!((c.extremes.max - 6.9).abs() < 1e-9);
        assert!((c.extremes.min - 6.1).abs() < 1e-9);
    }

    #[test]
    fn parentheses_redondantes_sans_valeur_exacte_imposee() {
        let c = calculer_propagation("((1000±0*2.5±0.5))", &Options::default());
        assert!(!c.resultat.mult_div && !c.resultat.add_sub);
        assert_eq!(c.choix.precision, 2);
        assert_eq!(c.choix.libelle, "2 chiffres significatifs");
        assert_eq!(c.affiche.incertitude, "500");
    }

    #[test]
    fn reelles_difference() {
        let c = calculer_valeurs_reelles("10±1 - 2±0.5", &Options::default());
        assert_eq!(c.extremes.max, 9.5);
        assert_eq!(c.extremes.min, 6.5);
        assert_eq!(c.pseudo_incertitude, 1.5);
        assert_eq!(c.point_milieu, 8.0);
        assert!(c.choix.rang_decimal);
        assert_eq!(c.min.valeur, "7");
        assert_eq!(c.max.valeur, "10");
        assert_eq!(c.milieu.to_string(), "8 ± 2");
    }

    #[test]
    fn demarches_remplies() {
        let c = calculer_propagation("(2±0.1+3±0.2)*4±0", &Options::default());
        assert!(c.demarche.first().is_some_and(|b| b.titre == "Étape 1 : Expression"));
        assert!(c.demarche.iter().any(|b| b.titre.ends_with("Multiplication")));
        assert!(c.demarche.last().is_some_and(|b| b.titre.ends_with("Résultat final")));

        let r = calculer_valeurs_reelles("(2±0.1+3±0.2)*4", &Options::default());
        assert_eq!(r.demarche.len(), 5);
        assert_eq!(r.decisions.len(), 3);
    }

    #[test]
    fn entree_vide() {
        let c = calculer_propagation("", &Options::default());
        assert_eq!(c.affiche.to_string(), "NaN ± NaN");
        let r = calculer_valeurs_reelles("", &Options::default());
        assert!(r.extremes.min.is_nan());
    }
}
