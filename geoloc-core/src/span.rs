//! # Spans e Sistemas de Coordenadas
//!
//! Três sistemas de coordenadas convivem no extrator e **nunca** podem ser confundidos:
//!
//! ```text
//! Documento:  "John went to Paris. Paris is lovely."
//!              0    5    10   15   20   25   30
//!
//! Document  → offsets no documento inteiro      ("Paris" = [13, 18))
//! Sentence  → offsets relativos ao início da frase ("Paris" na 2ª frase = [0, 5))
//! TokenIndex→ índices no vetor de tokens da frase  ("Paris" na 1ª frase = [3, 4))
//! ```
//!
//! O sistema é codificado no tipo (`Span<Document>`, `Span<Sentence>`, `Span<TokenIndex>`),
//! então somar um offset de frase a um índice de token é um erro de compilação.
//! Offsets de texto são índices de byte UTF-8, os mesmos usados para fatiar `&str`.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Range;

use serde::Serialize;

/// Marcador de sistema de coordenadas.
pub trait Frame: Copy + Eq + Hash + fmt::Debug + Default + 'static {
    /// Nome curto usado em mensagens de erro.
    const NAME: &'static str;
}

/// Offsets de byte relativos ao documento inteiro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Document;

/// Offsets de byte relativos ao início de uma frase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sentence;

/// Índices no vetor de tokens de uma frase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenIndex;

impl Frame for Document {
    const NAME: &'static str = "document";
}

impl Frame for Sentence {
    const NAME: &'static str = "sentence";
}

impl Frame for TokenIndex {
    const NAME: &'static str = "token";
}

/// Intervalo semiaberto `[start, end)` em um sistema de coordenadas `F`.
///
/// # Invariante
/// `start <= end`. Um span com `start == end` cobre um intervalo vazio.
/// O invariante é garantido pelos construtores; os campos são privados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(bound = "")]
pub struct Span<F: Frame> {
    start: usize,
    end: usize,
    #[serde(skip)]
    frame: PhantomData<F>,
}

impl<F: Frame> Span<F> {
    /// Cria um span, ou `None` se `start > end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self {
            start,
            end,
            frame: PhantomData,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Limite superior (exclusivo).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Span<TokenIndex> {
    /// Span de um único token: `[index, index + 1)`.
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index + 1,
            frame: PhantomData,
        }
    }
}

impl Span<Sentence> {
    /// Traduz um span relativo à frase para coordenadas do documento.
    pub fn to_document(&self, sentence_start: usize) -> Span<Document> {
        Span {
            start: sentence_start + self.start,
            end: sentence_start + self.end,
            frame: PhantomData,
        }
    }
}

impl<F: Frame> fmt::Display for Span<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}, {})", F::NAME, self.start, self.end)
    }
}
