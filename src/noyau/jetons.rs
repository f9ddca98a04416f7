// src/noyau/jetons.rs
//
// Lecture “souple” d’une expression avec incertitudes
// ----------------------------------------------------
// "4.5±0.3 + (2±0.1) × 3" => [Opérande, Op, Opérande, Op, Opérande]
//
// Règles:
// - nombre : signe optionnel (seulement là où une opérande est attendue),
//   décimales, exposant (e/E), suffixe "±incertitude" optionnel (sinon "0").
//   NaN / Infinity sont lus comme des nombres (propagation des échecs).
// - opérateurs + - * / et alias × ÷ (normalisés en * /).
// - parenthèses : pas de jeton propre, elles s’accumulent sur l’opérande
//   suivante "(" ou précédente ")".
// - tout le reste (espaces, symboles parasites) est ignoré : jamais d’erreur.

use std::fmt;

use super::mesure::Mesure;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Plus,
    Moins,
    Fois,
    Divise,
}

impl Op {
    pub fn depuis_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Op::Plus),
            '-' => Some(Op::Moins),
            '*' | '×' => Some(Op::Fois),
            '/' | '÷' => Some(Op::Divise),
            _ => None,
        }
    }

    /// Symbole ASCII (celui des expressions évaluées).
    pub fn symbole(self) -> char {
        match self {
            Op::Plus => '+',
            Op::Moins => '-',
            Op::Fois => '*',
            Op::Divise => '/',
        }
    }

    /// Symbole d’affichage (démarche).
    pub fn symbole_affiche(self) -> char {
        match self {
            Op::Plus => '+',
            Op::Moins => '-',
            Op::Fois => '×',
            Op::Divise => '÷',
        }
    }

    pub fn est_mult_div(self) -> bool {
        matches!(self, Op::Fois | Op::Divise)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbole())
    }
}

/// Une grandeur mesurée + ses parenthèses (ouvrantes avant, fermantes après).
#[derive(Clone, Debug, PartialEq)]
pub struct Operande {
    pub ouvrantes: usize,
    pub valeur: Mesure,
    pub incertitude: Mesure,
    pub fermantes: usize,
}

impl Operande {
    pub fn nouvelle(valeur: Mesure, incertitude: Mesure) -> Self {
        Self {
            ouvrantes: 0,
            valeur,
            incertitude,
            fermantes: 0,
        }
    }

    pub fn est_exacte(&self) -> bool {
        self.incertitude.est_nulle()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Jeton {
    Operande(Operande),
    Op(Op),
}

impl Jeton {
    pub fn operande(&self) -> Option<&Operande> {
        match self {
            Jeton::Operande(o) => Some(o),
            Jeton::Op(_) => None,
        }
    }
}

/* ------------------------ Littéraux ------------------------ */

/// Tente de lire un littéral numérique à partir de `i`.
/// Retourne (texte du littéral, position suivante).
fn lire_nombre(chars: &[char], i: usize, signe_permis: bool) -> Option<(String, usize)> {
    let mut j = i;

    if signe_permis && matches!(chars.get(j), Some('-') | Some('+')) {
        j += 1;
    }

    // mots-clés de la lecture flottante
    for mot in ["NaN", "Infinity"] {
        let n = mot.chars().count();
        if chars.len() >= j + n && chars[j..j + n].iter().copied().eq(mot.chars()) {
            return Some((chars[i..j + n].iter().collect(), j + n));
        }
    }

    let debut = j;
    while j < chars.len() && chars[j].is_ascii_digit() {
        j += 1;
    }
    // la virgule n’est prise que si un chiffre la suit ("5." => "5")
    if chars.get(j) == Some(&'.') && chars.get(j + 1).is_some_and(char::is_ascii_digit) {
        j += 1;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
    }
    if j == debut {
        return None;
    }

    // exposant seulement s’il est complet
    if matches!(chars.get(j), Some('e') | Some('E')) {
        let mut k = j + 1;
        if matches!(chars.get(k), Some('-') | Some('+')) {
            k += 1;
        }
        let debut_exp = k;
        while k < chars.len() && chars[k].is_ascii_digit() {
            k += 1;
        }
        if k > debut_exp {
            j = k;
        }
    }

    Some((chars[i..j].iter().collect(), j))
}

fn sauter_espaces(chars: &[char], mut i: usize) -> usize {
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    i
}

/* ------------------------ Analyse ------------------------ */

/// Découpe une expression en jetons. Ne lève jamais d’erreur : une entrée
/// malformée donne une suite partielle (voire vide).
pub fn analyser(texte: &str) -> Vec<Jeton> {
    let chars: Vec<char> = texte.chars().collect();
    let mut out: Vec<Jeton> = Vec::new();

    let mut ouvrantes_en_attente = 0usize;
    let mut attend_operande = true;
    let mut i = 0usize;

    while i < chars.len() {
        if let Some((valeur, suite)) = lire_nombre(&chars, i, attend_operande) {
            i = suite;

            // suffixe ±u (espaces tolérés autour du ±) : le signe éventuel
            // de l’incertitude est ignoré
            let mut incertitude = String::from("0");
            let pm = sauter_espaces(&chars, i);
            if chars.get(pm) == Some(&'±') {
                if let Some((u, apres)) = lire_nombre(&chars, sauter_espaces(&chars, pm + 1), true) {
                    incertitude = u.trim_start_matches(['-', '+']).to_string();
                    i = apres;
                }
            }

            out.push(Jeton::Operande(Operande {
                ouvrantes: std::mem::take(&mut ouvrantes_en_attente),
                valeur: Mesure::depuis_texte(&valeur),
                incertitude: Mesure::depuis_texte(&incertitude),
                fermantes: 0,
            }));
            attend_operande = false;
            continue;
        }

        let c = chars[i];
        match c {
            '(' => {
                ouvrantes_en_attente += 1;
                attend_operande = true;
            }
            ')' => {
                if let Some(Jeton::Operande(o)) = out.last_mut() {
                    o.fermantes += 1;
                }
                attend_operande = false;
            }
            _ => {
                if let Some(op) = Op::depuis_char(c) {
                    out.push(Jeton::Op(op));
                    attend_operande = true;
                }
            }
        }
        i += 1;
    }

    tracing::trace!(jetons = %format_jetons(&out), "analyse");
    out
}

/// Réécrit une suite de jetons en expression canonique "(v±u)*v±u".
pub fn former_expression(jetons: &[Jeton]) -> String {
    let mut s = String::new();
    for j in jetons {
        match j {
            Jeton::Operande(o) => {
                s.push_str(&"(".repeat(o.ouvrantes));
                s.push_str(&o.valeur.chiffres);
                s.push('±');
                s.push_str(&o.incertitude.chiffres);
                s.push_str(&")".repeat(o.fermantes));
            }
            Jeton::Op(op) => s.push(op.symbole()),
        }
    }
    s
}

/// Vrai si tout le texte (espaces de bord retirés) forme un seul littéral.
pub fn est_litteral(texte: &str) -> bool {
    let chars: Vec<char> = texte.trim().chars().collect();
    matches!(lire_nombre(&chars, 0, true), Some((_, fin)) if fin == chars.len())
}

/// Opérandes seules, dans l’ordre.
pub fn operandes(jetons: &[Jeton]) -> impl Iterator<Item = &Operande> {
    jetons.iter().filter_map(Jeton::operande)
}

/// Format utilitaire (traces) : jetons séparés par des espaces.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| match j {
            Jeton::Operande(o) => format!(
                "{}{}±{}{}",
                "(".repeat(o.ouvrantes),
                o.valeur,
                o.incertitude,
                ")".repeat(o.fermantes)
            ),
            Jeton::Op(op) => op.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
