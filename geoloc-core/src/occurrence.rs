//! # Ocorrências de Locais
//!
//! Uma [`LocationOccurrence`] é o produto final do extrator: o trecho exato do
//! documento que parece nomear um local e o offset onde ele começa.

use serde::Serialize;

/// Um nome de local candidato, localizado no documento.
///
/// # Invariante
/// `document[position..position + text.len()] == text`. Só o resolvedor de offsets
/// ([`crate::resolver`]) cria ocorrências, e os campos são imutáveis após a criação.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationOccurrence {
    text: String,
    position: usize,
}

impl LocationOccurrence {
    pub(crate) fn new(text: String, position: usize) -> Self {
        Self { text, position }
    }

    /// O trecho literal do documento (ex: "Rio de Janeiro").
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Offset de byte do primeiro caractere de `text` no documento.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Offset de byte logo após o último caractere.
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }

    /// Posição em caracteres Unicode (útil para clientes que contam `char`s).
    ///
    /// Retorna `None` se `position` não cabe em `document` ou não cai numa fronteira de caractere.
    pub fn char_position(&self, document: &str) -> Option<usize> {
        document.get(..self.position).map(|prefix| prefix.chars().count())
    }
}
