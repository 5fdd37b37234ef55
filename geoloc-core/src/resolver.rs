//! # Resolvedor de Offsets
//!
//! Converte um span em índices de token (sistema `TokenIndex`) em uma
//! [`LocationOccurrence`] no sistema do documento:
//!
//! ```text
//! frase começa em 20, tokens ["Paris", "is", "lovely", "."]
//! span [0, 1) → primeiro token [0, 5) → documento [20, 25) → "Paris" @ 20
//! ```
//!
//! O texto da ocorrência é sempre recortado do **documento original**, nunca
//! reconstruído juntando tokens; espaços e pontuação internos são preservados
//! ("Rio de Janeiro", "St. Louis").
//!
//! Qualquer índice fora dos limites é um defeito de colaborador e vira
//! [`ExtractError::ContractViolation`].

use crate::error::{ExtractError, Result};
use crate::occurrence::LocationOccurrence;
use crate::span::{Document, Sentence, Span, TokenIndex};

/// Resolve o span de tokens `range` da frase `sentence`.
///
/// `token_spans` são os spans dos tokens da frase, relativos ao início dela.
pub fn resolve(
    document: &str,
    sentence: Span<Document>,
    token_spans: &[Span<Sentence>],
    range: Span<TokenIndex>,
) -> Result<LocationOccurrence> {
    if range.is_empty() {
        return Err(ExtractError::contract(format!("span de nome vazio: {range}")));
    }
    if range.end() > token_spans.len() {
        return Err(ExtractError::contract(format!(
            "span de nome {range} excede os {} tokens da frase",
            token_spans.len()
        )));
    }

    let first = token_spans[range.start()];
    let last = token_spans[range.end() - 1];
    let local = Span::<Sentence>::new(first.start(), last.end()).ok_or_else(|| {
        ExtractError::contract(format!("tokens {first} e {last} fora de ordem"))
    })?;

    slice_occurrence(document, sentence, local)
}

/// Resolve um único token (usado pelo filtro de nomes próprios).
pub fn resolve_token(
    document: &str,
    sentence: Span<Document>,
    token_span: Span<Sentence>,
) -> Result<LocationOccurrence> {
    slice_occurrence(document, sentence, token_span)
}

fn slice_occurrence(
    document: &str,
    sentence: Span<Document>,
    local: Span<Sentence>,
) -> Result<LocationOccurrence> {
    if local.end() > sentence.len() {
        return Err(ExtractError::contract(format!(
            "span {local} ultrapassa a frase de {} bytes",
            sentence.len()
        )));
    }
    let absolute = local.to_document(sentence.start());
    let text = document.get(absolute.range()).ok_or_else(|| {
        ExtractError::contract(format!(
            "span {absolute} não cabe no documento de {} bytes ou corta um caractere",
            document.len()
        ))
    })?;
    Ok(LocationOccurrence::new(text.to_string(), absolute.start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_spans(offsets: &[(usize, usize)]) -> Vec<Span<Sentence>> {
        offsets.iter().map(|&(s, e)| Span::new(s, e).unwrap()).collect()
    }

    #[test]
    fn test_resolve_in_second_sentence() {
        let doc = "John went to Paris. Paris is lovely.";
        let sentence = Span::new(20, 36).unwrap();
        let tokens = sentence_spans(&[(0, 5), (6, 8), (9, 15), (15, 16)]);
        let occ = resolve(doc, sentence, &tokens, Span::single(0)).unwrap();
        assert_eq!(occ.text(), "Paris");
        assert_eq!(occ.position(), 20);
    }

    #[test]
    fn test_multi_token_keeps_inner_text() {
        let doc = "From Rio de  Janeiro.";
        let sentence = Span::new(0, doc.len()).unwrap();
        let tokens = sentence_spans(&[(0, 4), (5, 8), (9, 11), (13, 20), (20, 21)]);
        let occ = resolve(doc, sentence, &tokens, Span::new(1, 4).unwrap()).unwrap();
        assert_eq!(occ.text(), "Rio de  Janeiro");
        assert_eq!(occ.position(), 5);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let doc = "Paris.";
        let sentence = Span::new(0, 6).unwrap();
        let tokens = sentence_spans(&[(0, 5), (5, 6)]);

        let empty = resolve(doc, sentence, &tokens, Span::new(1, 1).unwrap());
        assert!(matches!(empty, Err(ExtractError::ContractViolation(_))));

        let past_end = resolve(doc, sentence, &tokens, Span::new(1, 3).unwrap());
        assert!(matches!(past_end, Err(ExtractError::ContractViolation(_))));
    }

    #[test]
    fn test_rejects_spans_outside_document() {
        let doc = "Paris";
        let sentence = Span::new(0, 5).unwrap();
        let too_long = resolve_token(doc, sentence, Span::new(0, 9).unwrap());
        assert!(matches!(too_long, Err(ExtractError::ContractViolation(_))));

        let sentence_past_doc = Span::new(3, 12).unwrap();
        let outside = resolve_token(doc, sentence_past_doc, Span::new(0, 5).unwrap());
        assert!(matches!(outside, Err(ExtractError::ContractViolation(_))));
    }

    #[test]
    fn test_rejects_split_character() {
        let doc = "São";
        let sentence = Span::new(0, doc.len()).unwrap();
        let split = resolve_token(doc, sentence, Span::new(0, 2).unwrap());
        assert!(matches!(split, Err(ExtractError::ContractViolation(_))));
    }
}
