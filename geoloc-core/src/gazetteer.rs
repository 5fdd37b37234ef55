//! # Gazetteer de Locais
//!
//! Lista de nomes de locais conhecidos, possivelmente com várias palavras
//! ("New York", "St. Louis", "Rio de Janeiro"). Cada nome é tokenizado com o mesmo
//! tokenizador padrão usado nas frases, para que "Washington, D.C." case token a token.
//!
//! A busca é **gulosa pelo maior nome**: em cada posição tenta o nome mais longo que
//! começa com aquele token, e os spans devolvidos nunca se sobrepõem.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::span::{Span, TokenIndex};
use crate::tokenizer::{RuleTokenizer, Tokenizer, TokenizerMode};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Gazetteer {
    names: Vec<String>,
    /// Primeiro token (minúsculo) → nomes tokenizados, do mais longo ao mais curto
    index: HashMap<String, Vec<Vec<String>>>,
}

impl Gazetteer {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut gaz = Self::default();
        for name in names {
            gaz.add(name);
        }
        gaz
    }

    pub fn add(&mut self, name: impl Into<String>) {
        let name = name.into();
        let parts: Vec<String> = RuleTokenizer::new(TokenizerMode::Standard)
            .tokenize(&name)
            .tokens()
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        let Some(first) = parts.first().cloned() else {
            return;
        };
        let bucket = self.index.entry(first).or_default();
        if bucket.contains(&parts) {
            return;
        }
        bucket.push(parts);
        bucket.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.names.push(name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Encontra nomes do gazetteer na sequência de tokens.
    ///
    /// O primeiro token do trecho precisa começar com maiúscula no texto
    /// ("Turkey" o país, não "turkey" a ave). O restante casa sem diferenciar caixa.
    pub fn find(&self, tokens: &[String]) -> Vec<Span<TokenIndex>> {
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mut spans = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let capitalized = tokens[i].chars().next().map(char::is_uppercase).unwrap_or(false);
            let matched = if capitalized {
                self.index.get(&lowered[i]).and_then(|candidates| {
                    candidates.iter().find(|parts| {
                        i + parts.len() <= lowered.len()
                            && parts.iter().zip(&lowered[i..]).all(|(p, t)| p == t)
                    })
                })
            } else {
                None
            };

            match matched.and_then(|parts| Span::new(i, i + parts.len())) {
                Some(span) => {
                    i = span.end();
                    spans.push(span);
                }
                None => i += 1,
            }
        }

        spans
    }
}

impl From<Vec<String>> for Gazetteer {
    fn from(names: Vec<String>) -> Self {
        Gazetteer::new(names)
    }
}

impl From<Gazetteer> for Vec<String> {
    fn from(gaz: Gazetteer) -> Self {
        gaz.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_longest_match_wins() {
        let gaz = Gazetteer::new(["New York", "New York City", "York"]);
        let tokens = strings(&["I", "love", "New", "York", "City", "and", "York", "."]);
        let spans = gaz.find(&tokens);
        let ranges: Vec<_> = spans.iter().map(|s| s.range()).collect();
        assert_eq!(ranges, [2..5, 6..7]);
    }

    #[test]
    fn test_requires_capitalized_first_token() {
        let gaz = Gazetteer::new(["Turkey"]);
        assert!(gaz.find(&strings(&["roast", "turkey"])).is_empty());
        assert_eq!(gaz.find(&strings(&["visit", "Turkey"])).len(), 1);
    }

    #[test]
    fn test_names_are_tokenized_like_sentences() {
        let gaz = Gazetteer::new(["Washington, D.C.", "St. Louis"]);
        let spans = gaz.find(&strings(&["From", "St.", "Louis", "to", "Washington", ",", "D.C.", "."]));
        let ranges: Vec<_> = spans.iter().map(|s| s.range()).collect();
        assert_eq!(ranges, [1..3, 4..7]);
    }

    #[test]
    fn test_duplicates_and_blank_names_ignored() {
        let gaz = Gazetteer::new(["Paris", "paris", "  "]);
        assert_eq!(gaz.len(), 1);
        let json = serde_json::to_string(&gaz).unwrap();
        assert_eq!(json, r#"["Paris"]"#);
        let back: Gazetteer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names(), gaz.names());
    }
}
