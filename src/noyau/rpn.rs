// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> valeur f64
// Objectif:
// - Évaluer une expression PUREMENT numérique (littéraux, + - * / et parenthèses)
//   avec la précédence native : * / avant + -, gauche à droite, parenthèses prioritaires.
//
// Règles:
// - Signe unaire (+/-) : opérateur préfixe, plus prioritaire que * et /
//   ("5*-3" => -15, "-2*3" => -6). "5--2" se lit 5 - (-2).
// - Toute construction que le navigateur refuserait ("2 3", "()", "2+", "(2")
//   est une erreur (Err), convertie en NaN par l’appelant.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    Plus,
    Minus,
    Star,
    Slash,

    // signes unaires (préfixes)
    Neg,
    Pos,

    LPar,
    RPar,
}

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg | Tok::Pos => 3,
        _ => 0,
    }
}

fn est_unaire(t: &Tok) -> bool {
    matches!(t, Tok::Neg | Tok::Pos)
}

/* ------------------------ Jetons numériques ------------------------ */

/// Tokenize une expression numérique.
/// Supporte:
/// - littéraux décimaux (12, 1.5, .5, 5., 1e-7, 2.5E+3)
/// - NaN / Infinity
/// - opérateurs + - * / et parenthèses
/// - espaces ignorés ; tout autre caractère est refusé
pub fn tokenize(s: &str) -> Result<Vec<Tok>, String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // mots-clés numériques
        let reste: String = chars[i..].iter().take(8).collect();
        if reste.starts_with("NaN") {
            out.push(Tok::Num(f64::NAN));
            i += 3;
            continue;
        }
        if reste.starts_with("Infinity") {
            out.push(Tok::Num(f64::INFINITY));
            i += 8;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            let mut nb_chiffres = 0;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
                nb_chiffres += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                    nb_chiffres += 1;
                }
            }
            if nb_chiffres == 0 {
                return Err("littéral invalide: '.'".into());
            }

            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                i += 1;
                if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
                    i += 1;
                }
                let debut_exp = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i == debut_exp {
                    return Err("exposant incomplet".into());
                }
            }

            let texte: String = chars[start..i].iter().collect();
            let v = texte
                .parse::<f64>()
                .map_err(|_| format!("nombre invalide: {texte}"))?;
            out.push(Tok::Num(v));
            continue;
        }

        return Err(format!("caractère inattendu: '{c}'"));
    }

    Ok(out)
}

/* ------------------------ Shunting-yard ------------------------ */

/// Convertit une suite de jetons en RPN (notation polonaise inversée),
/// en validant la syntaxe au passage.
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, String> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un littéral ou une parenthèse fermée.
    // Sert à détecter les signes unaires et les juxtapositions.
    let mut prev_was_value = false;

    for &tok in tokens {
        match tok {
            Tok::Num(_) => {
                if prev_was_value {
                    return Err("deux valeurs sans opérateur".into());
                }
                out.push(tok);
                prev_was_value = true;
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err("parenthèse ouvrante après une valeur".into());
                }
                ops.push(tok);
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err("parenthèse fermante inattendue".into());
                }
                loop {
                    match ops.pop() {
                        Some(Tok::LPar) => break,
                        Some(top) => out.push(top),
                        None => return Err("parenthèse fermante sans ouvrante".into()),
                    }
                }
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // signe unaire : préfixe, ne dépile rien
                ops.push(if tok == Tok::Minus { Tok::Neg } else { Tok::Pos });
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash => {
                if !prev_was_value {
                    return Err("opérateur sans opérande gauche".into());
                }
                // gauche-associatif : on dépile tant que la précédence du haut >= la nôtre
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) || precedence(top) < precedence(&tok) {
                        break;
                    }
                    if let Some(top) = ops.pop() {
                        out.push(top);
                    }
                }
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Neg | Tok::Pos => ops.push(tok),
        }
    }

    if !prev_was_value {
        return Err("expression incomplète".into());
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err("parenthèses non fermées".into());
        }
        out.push(op);
    }

    Ok(out)
}

/// Évalue une RPN en f64 (arithmétique IEEE : 1/0 = ∞, 0/0 = NaN).
pub fn eval_rpn(rpn: &[Tok]) -> Result<f64, String> {
    let mut st: Vec<f64> = Vec::new();

    for &tok in rpn {
        match tok {
            Tok::Num(v) => st.push(v),

            t if est_unaire(&t) => {
                let x = st.pop().ok_or("expression invalide")?;
                st.push(if t == Tok::Neg { -x } else { x });
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash => {
                let b = st.pop().ok_or("expression invalide")?;
                let a = st.pop().ok_or("expression invalide")?;
                st.push(match tok {
                    Tok::Plus => a + b,
                    Tok::Minus => a - b,
                    Tok::Star => a * b,
                    _ => a / b,
                });
            }

            _ => return Err("parenthèse inattendue en RPN".into()),
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err("expression invalide".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpn_de(s: &str) -> Vec<Tok> {
        to_rpn(&tokenize(s).unwrap()).unwrap()
    }

    #[test]
    fn precedence_standard() {
        assert_eq!(
            rpn_de("1+2*3"),
            vec![Tok::Num(1.0), Tok::Num(2.0), Tok::Num(3.0), Tok::Star, Tok::Plus]
        );
    }

    #[test]
    fn unaire_lie_plus_fort() {
        assert_eq!(
            rpn_de("5*-3"),
            vec![Tok::Num(5.0), Tok::Num(3.0), Tok::Neg, Tok::Star]
        );
        assert_eq!(eval_rpn(&rpn_de("-2*3")), Ok(-6.0));
        assert_eq!(eval_rpn(&rpn_de("5--2")), Ok(7.0));
    }

    #[test]
    fn litteraux() {
        assert_eq!(tokenize("1e-7").unwrap(), vec![Tok::Num(1e-7)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Tok::Num(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Tok::Num(5.0)]);
        assert!(tokenize("1e").is_err());
        assert!(tokenize("2±1").is_err());
    }

    #[test]
    fn syntaxe_refusee() {
        for s in ["", "2 3", "()", "2+", "(2", "2)", "*2", "(2)(3)"] {
            let r = tokenize(s).and_then(|t| to_rpn(&t));
            assert!(r.is_err(), "{s:?} devrait être refusé");
        }
    }
}
