//! # Etiquetagem Morfossintática (POS) e Dicionário de Tags
//!
//! Sustenta a segunda estratégia de extração, o **filtro de nomes próprios**:
//! um token só é candidato quando o etiquetador o marca como `NNP` **e** o dicionário
//! diz que aquela palavra exata só admite uma tag em todo o vocabulário do modelo.
//!
//! ```text
//! "The"   → etiquetador: NNP? (início de frase)  dicionário: {DT, NNP}  → descartado
//! "Paris" → etiquetador: NNP                     dicionário: {NNP}      → candidato
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hmm::HmmModel;

/// Tag Penn Treebank de nome próprio singular.
pub const PROPER_NOUN_TAG: &str = "NNP";

/// Verdadeiro se a tag indica nome próprio (comparação ASCII sem caixa).
pub fn is_proper_noun(tag: &str) -> bool {
    tag.eq_ignore_ascii_case(PROPER_NOUN_TAG)
}

/// Papel de etiquetador: tokens → uma tag por token, alinhadas por índice.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<String>;
}

/// Papel de dicionário: palavra → conjunto de tags que ela pode assumir.
///
/// Conjunto vazio significa palavra desconhecida.
pub trait TagDictionary: Send + Sync {
    fn possible_tags(&self, token: &str) -> BTreeSet<&str>;

    /// Verdadeiro se a palavra admite exatamente uma tag, seja ela qual for.
    fn is_unambiguous(&self, token: &str) -> bool {
        self.possible_tags(token).len() == 1
    }
}

/// Dicionário de tags sensível a maiúsculas ("Bill" e "bill" são entradas distintas).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosDictionary {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl PosDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrói o dicionário a partir de sequências `(palavra, tag)`.
    pub fn from_sequences<'s, 'w: 's, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'s [(&'w str, &'w str)]>,
    {
        let mut dict = Self::new();
        for seq in sequences {
            for &(word, tag) in seq {
                dict.insert(word, tag);
            }
        }
        dict
    }

    pub fn insert(&mut self, word: &str, tag: &str) {
        self.entries
            .entry(word.to_string())
            .or_default()
            .insert(tag.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TagDictionary for PosDictionary {
    fn possible_tags(&self, token: &str) -> BTreeSet<&str> {
        self.entries
            .get(token)
            .map(|tags| tags.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Etiquetador POS baseado no [`HmmModel`].
#[derive(Debug, Clone)]
pub struct HmmPosTagger {
    model: Arc<HmmModel>,
}

impl HmmPosTagger {
    pub fn new(model: Arc<HmmModel>) -> Self {
        Self { model }
    }
}

impl PosTagger for HmmPosTagger {
    fn tag(&self, tokens: &[String]) -> Vec<String> {
        self.model.predict(tokens)
    }
}
