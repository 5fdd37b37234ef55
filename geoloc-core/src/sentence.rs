//! # Segmentação de Frases
//!
//! Divide o documento em frases e devolve spans **no sistema do documento**.
//! O extrator sempre recorta cada frase do documento original a partir destes spans,
//! nunca reconstrói fronteiras a partir dos tokens.
//!
//! ## Regras do segmentador padrão
//!
//! 1. Candidato a fronteira: `.`, `!` ou `?` (repetidos ou não), seguidos de aspas ou
//!    parênteses de fechamento opcionais, e então espaço ou fim do texto.
//! 2. Um ponto final **não** é fronteira quando a palavra anterior é uma abreviação
//!    conhecida ("Mr.", "St.") ou uma inicial ("J.", "U.S."), ou quando a próxima
//!    palavra começa com minúscula.
//! 3. Os spans excluem espaços nas bordas; trechos só com espaços não geram frases.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::span::{Document, Span};
use crate::tokenizer::ABBREVIATIONS;

/// Papel de segmentador: documento → spans de frases, em ordem crescente.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, document: &str) -> Vec<Span<Document>>;
}

fn boundary_pattern() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| {
        Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*"#).expect("padrão de fronteira é uma regex válida")
    })
}

/// Segmentador baseado em pontuação e lista de abreviações.
#[derive(Debug, Clone)]
pub struct RuleSentenceSegmenter {
    abbreviations: HashSet<String>,
}

impl RuleSentenceSegmenter {
    pub fn new() -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Acrescenta abreviações (sem o ponto final, ex: "Univ").
    pub fn with_abbreviations<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abbreviations.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Decide se o terminador encontrado é um falso positivo.
    fn is_false_boundary(&self, before: &str, terminator: &str, after: &str) -> bool {
        if terminator != "." {
            return false;
        }
        let next_starts_lower = after
            .trim_start()
            .chars()
            .next()
            .map(|c| c.is_lowercase())
            .unwrap_or(false);
        if next_starts_lower {
            return true;
        }
        let last_word = before
            .split_whitespace()
            .last()
            .unwrap_or("")
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        self.abbreviations.contains(last_word) || is_initialism(last_word)
    }
}

impl Default for RuleSentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// "J", "U.S", "D.C" → iniciais maiúsculas separadas por pontos
fn is_initialism(word: &str) -> bool {
    !word.is_empty()
        && word.split('.').all(|part| {
            let mut chars = part.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
        })
}

impl SentenceSegmenter for RuleSentenceSegmenter {
    fn segment(&self, document: &str) -> Vec<Span<Document>> {
        let mut spans = Vec::new();
        let mut start = 0;

        for m in boundary_pattern().find_iter(document) {
            let after = &document[m.end()..];
            let followed_by_space = after.chars().next().map(char::is_whitespace).unwrap_or(true);
            if !followed_by_space {
                continue;
            }
            if self.is_false_boundary(&document[start..m.start()], m.as_str(), after) {
                continue;
            }
            push_trimmed(&mut spans, document, start, m.end());
            start = m.end();
        }
        push_trimmed(&mut spans, document, start, document.len());

        spans
    }
}

/// Adiciona `document[start..end]` sem os espaços das bordas, se sobrar algo.
fn push_trimmed(spans: &mut Vec<Span<Document>>, document: &str, start: usize, end: usize) {
    let segment = &document[start..end];
    let lead = segment.len() - segment.trim_start().len();
    let len = segment.trim().len();
    if len > 0 {
        spans.extend(Span::new(start + lead, start + lead + len));
    }
}
