// src/noyau/saisie.rs
//
// Saisie utilisateur -> jetons
// ----------------------------
// Deux formes:
// - lignes : une valeur par ligne (valeur, incertitude facultative, parenthèses
//   avant/après) et un opérateur entre deux lignes
// - texte  : expression libre, normalisée par l’analyseur
//
// Seule étape faillible de l’application : les erreurs sont montrées telles quelles.

use thiserror::Error;

use super::format::parse_float;
use super::jetons::{analyser, est_litteral, former_expression, operandes, Jeton, Op, Operande};
use super::mesure::Mesure;

/// Nombre maximal de parenthèses par côté d’une ligne (le bouton boucle 0..=3).
pub const MAX_PARENTHESES_LIGNE: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErreurSaisie {
    #[error("Valeur {0} : veuillez saisir une valeur")]
    ValeurVide(usize),

    #[error("Valeur {0} : « {1} » n’est pas un nombre valide")]
    ValeurInvalide(usize, String),

    #[error("Valeur {0} : incertitude « {1} » invalide (laisser vide pour une valeur exacte)")]
    IncertitudeInvalide(usize, String),

    #[error("Veuillez saisir une expression")]
    ExpressionVide,

    #[error("Impossible de lire l’expression : aucune valeur trouvée")]
    AucuneOperande,
}

/// Une ligne de l’éditeur. `op` relie cette ligne à la précédente (ignoré en tête).
#[derive(Clone, Debug, PartialEq)]
pub struct Ligne {
    pub ouvrantes: usize,
    pub valeur: String,
    pub incertitude: String,
    pub fermantes: usize,
    pub op: Op,
}

impl Default for Ligne {
    fn default() -> Self {
        Self {
            ouvrantes: 0,
            valeur: String::new(),
            incertitude: String::new(),
            fermantes: 0,
            op: Op::Plus,
        }
    }
}

impl Ligne {
    pub fn basculer_ouvrantes(&mut self) {
        self.ouvrantes = (self.ouvrantes + 1) % (MAX_PARENTHESES_LIGNE + 1);
    }

    pub fn basculer_fermantes(&mut self) {
        self.fermantes = (self.fermantes + 1) % (MAX_PARENTHESES_LIGNE + 1);
    }

    fn operande(&self, numero: usize) -> Result<Operande, ErreurSaisie> {
        let valeur = self.valeur.trim();
        if valeur.is_empty() {
            return Err(ErreurSaisie::ValeurVide(numero));
        }
        if !est_litteral(valeur) || parse_float(valeur).is_nan() {
            return Err(ErreurSaisie::ValeurInvalide(numero, valeur.to_string()));
        }

        let incertitude = self.incertitude.trim();
        let incertitude = if incertitude.is_empty() {
            Mesure::zero()
        } else if !est_litteral(incertitude) || parse_float(incertitude).is_nan() {
            return Err(ErreurSaisie::IncertitudeInvalide(numero, incertitude.to_string()));
        } else {
            Mesure::depuis_texte(incertitude)
        };

        Ok(Operande {
            ouvrantes: self.ouvrantes,
            valeur: Mesure::depuis_texte(valeur),
            incertitude,
            fermantes: self.fermantes,
        })
    }
}

/// Saisie validée : expression canonique + jetons correspondants.
#[derive(Clone, Debug, PartialEq)]
pub struct Saisie {
    pub expression: String,
    pub jetons: Vec<Jeton>,
}

/// Lignes -> jetons. La première erreur (dans l’ordre des lignes) est retournée.
pub fn depuis_lignes(lignes: &[Ligne]) -> Result<Saisie, ErreurSaisie> {
    let mut jetons = Vec::with_capacity(lignes.len() * 2);

    for (i, ligne) in lignes.iter().enumerate() {
        if i > 0 {
            jetons.push(Jeton::Op(ligne.op));
        }
        jetons.push(Jeton::Operande(ligne.operande(i + 1)?));
    }

    if jetons.is_empty() {
        return Err(ErreurSaisie::AucuneOperande);
    }

    let expression = former_expression(&jetons);
    tracing::debug!(%expression, lignes = lignes.len(), "saisie par lignes");
    Ok(Saisie { expression, jetons })
}

/// Texte libre -> jetons (normalisé).
pub fn depuis_texte(texte: &str) -> Result<Saisie, ErreurSaisie> {
    if texte.trim().is_empty() {
        return Err(ErreurSaisie::ExpressionVide);
    }

    let jetons = analyser(texte);
    if operandes(&jetons).next().is_none() {
        return Err(ErreurSaisie::AucuneOperande);
    }

    let expression = former_expression(&jetons);
    tracing::debug!(%expression, "saisie texte");
    Ok(Saisie { expression, jetons })
}
