//! # Reconhecedor de Nomes de Locais
//!
//! Primeira estratégia de extração. Recebe os tokens de uma frase e devolve spans
//! (em índices de token) dos nomes de locais encontrados.
//!
//! O reconhecedor padrão combina três fontes, nesta prioridade:
//!
//! 1. **Gazetteer**: nomes conhecidos, casados pelo maior trecho possível;
//! 2. **Modelo HMM BIO**: spans `LOC` previstos que não colidem com o gazetteer;
//! 3. **Memória adaptativa**: tokens capitalizados já reconhecidos como local
//!    nesta sessão voltam a ser reconhecidos sozinhos.
//!
//! A memória adaptativa é o estado mutável do reconhecedor. O extrator chama
//! [`NameRecognizer::clear_adaptive_data`] ao fim de cada frase, o que torna o
//! resultado de uma frase independente das frases anteriores.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::gazetteer::Gazetteer;
use crate::hmm::HmmModel;
use crate::span::{Span, TokenIndex};
use crate::tagger::{location_spans, Tag};

/// Papel de reconhecedor de nomes (com estado).
pub trait NameRecognizer: Send {
    /// Spans `[i, j)` de nomes de locais, ordenados e sem sobreposição.
    fn find_names(&mut self, tokens: &[String]) -> Vec<Span<TokenIndex>>;

    /// Descarta tudo o que foi aprendido desde a última limpeza.
    fn clear_adaptive_data(&mut self);
}

/// Reconhecedor padrão: gazetteer + HMM BIO + memória adaptativa.
#[derive(Debug, Clone)]
pub struct AdaptiveNameRecognizer {
    gazetteer: Arc<Gazetteer>,
    model: Arc<HmmModel>,
    memory: BTreeSet<String>,
}

impl AdaptiveNameRecognizer {
    pub fn new(gazetteer: Arc<Gazetteer>, model: Arc<HmmModel>) -> Self {
        Self {
            gazetteer,
            model,
            memory: BTreeSet::new(),
        }
    }

    /// Quantos tokens estão na memória adaptativa.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    fn model_spans(&self, tokens: &[String]) -> Vec<Span<TokenIndex>> {
        let labels = self.model.predict(tokens);
        if labels.len() != tokens.len() {
            return Vec::new();
        }
        let tags: Vec<Tag> = labels
            .iter()
            .map(|l| Tag::from_label(l).unwrap_or(Tag::Outside))
            .collect();
        location_spans(&tags)
    }

    fn remember(&mut self, tokens: &[String], spans: &[Span<TokenIndex>]) {
        for span in spans {
            for token in &tokens[span.range()] {
                if is_capitalized(token) {
                    self.memory.insert(token.clone());
                }
            }
        }
    }
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().map(char::is_uppercase).unwrap_or(false)
}

impl NameRecognizer for AdaptiveNameRecognizer {
    fn find_names(&mut self, tokens: &[String]) -> Vec<Span<TokenIndex>> {
        let mut covered = vec![false; tokens.len()];
        let mut spans = Vec::new();

        let mut accept = |span: Span<TokenIndex>, spans: &mut Vec<Span<TokenIndex>>| {
            if covered[span.range()].iter().any(|&c| c) {
                return;
            }
            covered[span.range()].iter_mut().for_each(|c| *c = true);
            spans.push(span);
        };

        for span in self.gazetteer.find(tokens) {
            accept(span, &mut spans);
        }
        for span in self.model_spans(tokens) {
            accept(span, &mut spans);
        }
        for (i, token) in tokens.iter().enumerate() {
            if is_capitalized(token) && self.memory.contains(token) {
                accept(Span::single(i), &mut spans);
            }
        }

        spans.sort_by_key(|s| s.start());
        self.remember(tokens, &spans);
        spans
    }

    fn clear_adaptive_data(&mut self) {
        if !self.memory.is_empty() {
            tracing::trace!(tokens = self.memory.len(), "memória adaptativa limpa");
        }
        self.memory.clear();
    }
}
