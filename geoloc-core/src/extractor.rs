//! # Extrator de Locais — Orquestrador com Eventos Observáveis
//!
//! Coordena os colaboradores (segmentador, tokenizador, reconhecedor, etiquetador
//! POS e dicionário) e junta as duas estratégias de extração:
//!
//! ```text
//! documento ──► frases ──► para cada frase:
//!                            tokens ──► A: reconhecedor de nomes ──► resolver ─┐
//!                                   └─► B: NNP + dicionário único ──► resolver ─┤
//!                                                                               ▼
//!                                                      ocorrências (A antes de B)
//! ```
//!
//! A lista final é a **união** das duas estratégias, sem remoção de duplicatas:
//! "Paris" pode aparecer duas vezes com a mesma posição.
//!
//! Assim como no pipeline de NER, existe um modo observável
//! ([`LocationExtractor::extract_streaming`]) que emite um [`ExtractionEvent`] por
//! passo via `mpsc`, usado pelo WebSocket do servidor.

use std::sync::{mpsc, Arc};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::model::LocationModels;
use crate::occurrence::LocationOccurrence;
use crate::pos::{is_proper_noun, PosTagger, TagDictionary};
use crate::recognizer::NameRecognizer;
use crate::resolver::{resolve, resolve_token};
use crate::sentence::SentenceSegmenter;
use crate::span::{Document, Span, TokenIndex};
use crate::tokenizer::Tokenizer;

/// Eventos emitidos durante a extração.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ExtractionEvent {
    /// Uma frase foi recortada do documento.
    SentenceDetected {
        index: usize,
        span: Span<Document>,
        text: String,
    },
    Tokenized {
        sentence: usize,
        tokens: Vec<String>,
    },
    /// **Estratégia A**: o reconhecedor encontrou um nome.
    NameFound {
        sentence: usize,
        tokens: Span<TokenIndex>,
        occurrence: LocationOccurrence,
    },
    /// **Estratégia B**: token `NNP` sem ambiguidade no dicionário.
    ProperNounFound {
        sentence: usize,
        token: usize,
        occurrence: LocationOccurrence,
    },
    AdaptiveDataCleared {
        sentence: usize,
    },
    Done {
        occurrences: Vec<LocationOccurrence>,
        sentences: usize,
        processing_ms: u64,
    },
    Error {
        message: String,
    },
}

/// O extrator de locais.
///
/// Dono do estado adaptativo do reconhecedor, por isso `extract` recebe `&mut self`.
/// Os demais colaboradores são compartilhados (somente leitura) via `Arc`.
pub struct LocationExtractor {
    segmenter: Arc<dyn SentenceSegmenter>,
    tokenizer: Arc<dyn Tokenizer>,
    recognizer: Box<dyn NameRecognizer>,
    tagger: Arc<dyn PosTagger>,
    dictionary: Arc<dyn TagDictionary>,
}

impl LocationExtractor {
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        tokenizer: Arc<dyn Tokenizer>,
        recognizer: Box<dyn NameRecognizer>,
        tagger: Arc<dyn PosTagger>,
        dictionary: Arc<dyn TagDictionary>,
    ) -> Self {
        Self {
            segmenter,
            tokenizer,
            recognizer,
            tagger,
            dictionary,
        }
    }

    /// Extrai as ocorrências de locais do documento.
    ///
    /// # Ordem do resultado
    /// Frases em ordem crescente; dentro de uma frase, todas as ocorrências do
    /// reconhecedor antes das ocorrências do filtro de nomes próprios.
    ///
    /// # Erros
    /// [`ExtractError::ContractViolation`] se algum colaborador devolver índices
    /// inconsistentes ou frases fora de ordem. A falha aborta o documento inteiro.
    pub fn extract(&mut self, document: &str) -> Result<Vec<LocationOccurrence>> {
        self.run(document, None)
    }

    /// Variante que aceita documento ausente (`None` → [`ExtractError::InvalidInput`]).
    pub fn extract_opt(&mut self, document: Option<&str>) -> Result<Vec<LocationOccurrence>> {
        match document {
            Some(doc) => self.extract(doc),
            None => Err(ExtractError::InvalidInput("documento ausente".into())),
        }
    }

    /// Executa a extração enviando eventos de progresso em tempo real.
    ///
    /// # Fluxo de Eventos
    /// 1. `SentenceDetected` e `Tokenized` por frase;
    /// 2. `NameFound` (loop), depois `AdaptiveDataCleared`;
    /// 3. `ProperNounFound` (loop);
    /// 4. `Done` com a lista final, ou `Error` se a extração falhou.
    ///
    /// Um receptor descartado não interrompe a extração.
    pub fn extract_streaming(
        &mut self,
        document: &str,
        tx: mpsc::Sender<ExtractionEvent>,
    ) -> Result<Vec<LocationOccurrence>> {
        let result = self.run(document, Some(&tx));
        if let Err(err) = &result {
            let _ = tx.send(ExtractionEvent::Error {
                message: err.to_string(),
            });
        }
        result
    }

    fn run(
        &mut self,
        document: &str,
        tx: Option<&mpsc::Sender<ExtractionEvent>>,
    ) -> Result<Vec<LocationOccurrence>> {
        let start = Instant::now();
        let sentences = self.segmenter.segment(document);
        debug!(sentences = sentences.len(), bytes = document.len(), "documento segmentado");
        if let Some(pair) = sentences.windows(2).find(|w| w[1].start() < w[0].start()) {
            return Err(ExtractError::contract(format!(
                "segmentador devolveu a frase {} depois de {}",
                pair[1], pair[0]
            )));
        }

        let mut occurrences = Vec::new();
        for (index, &span) in sentences.iter().enumerate() {
            self.process_sentence(document, index, span, tx, &mut occurrences)?;
        }

        emit(tx, || ExtractionEvent::Done {
            occurrences: occurrences.clone(),
            sentences: sentences.len(),
            processing_ms: start.elapsed().as_millis() as u64,
        });
        Ok(occurrences)
    }

    fn process_sentence(
        &mut self,
        document: &str,
        index: usize,
        sentence: Span<Document>,
        tx: Option<&mpsc::Sender<ExtractionEvent>>,
        out: &mut Vec<LocationOccurrence>,
    ) -> Result<()> {
        let text = document.get(sentence.range()).ok_or_else(|| {
            ExtractError::contract(format!(
                "frase {sentence} não cabe no documento de {} bytes",
                document.len()
            ))
        })?;
        emit(tx, || ExtractionEvent::SentenceDetected {
            index,
            span: sentence,
            text: text.to_string(),
        });

        let frame = self.tokenizer.tokenize(text);
        emit(tx, || ExtractionEvent::Tokenized {
            sentence: index,
            tokens: frame.tokens().to_vec(),
        });

        // === Estratégia A: reconhecedor de nomes ===
        let names = self.recognizer.find_names(frame.tokens());
        let resolved: Result<Vec<_>> = names
            .iter()
            .map(|&range| resolve(document, sentence, frame.spans(), range).map(|occ| (range, occ)))
            .collect();
        // Limpa sempre, com ou sem acertos, mesmo se a resolução falhou
        self.recognizer.clear_adaptive_data();
        emit(tx, || ExtractionEvent::AdaptiveDataCleared { sentence: index });

        let resolved = resolved?;
        debug!(sentence = index, names = resolved.len(), "estratégia de nomes concluída");
        for (range, occurrence) in resolved {
            emit(tx, || ExtractionEvent::NameFound {
                sentence: index,
                tokens: range,
                occurrence: occurrence.clone(),
            });
            out.push(occurrence);
        }

        // === Estratégia B: nomes próprios sem ambiguidade ===
        let tags = self.tagger.tag(frame.tokens());
        if tags.len() != frame.len() {
            return Err(ExtractError::contract(format!(
                "etiquetador devolveu {} tags para {} tokens",
                tags.len(),
                frame.len()
            )));
        }

        let mut proper_nouns = 0;
        for (i, ((token, token_span), tag)) in frame.iter().zip(&tags).enumerate() {
            if !is_proper_noun(tag) || !self.dictionary.is_unambiguous(token) {
                continue;
            }
            let occurrence = resolve_token(document, sentence, token_span)?;
            emit(tx, || ExtractionEvent::ProperNounFound {
                sentence: index,
                token: i,
                occurrence: occurrence.clone(),
            });
            out.push(occurrence);
            proper_nouns += 1;
        }
        debug!(sentence = index, proper_nouns, "estratégia de nomes próprios concluída");

        Ok(())
    }
}

fn emit(tx: Option<&mpsc::Sender<ExtractionEvent>>, event: impl FnOnce() -> ExtractionEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event());
    }
}

/// Extrai vários documentos em paralelo.
///
/// Cada worker do rayon monta seu próprio extrator (e portanto seu próprio estado
/// adaptativo); os modelos são compartilhados via `Arc`. A saída segue a ordem da entrada.
pub fn extract_batch<S>(models: &LocationModels, documents: &[S]) -> Vec<Result<Vec<LocationOccurrence>>>
where
    S: AsRef<str> + Sync,
{
    documents
        .par_iter()
        .map_init(|| models.extractor(), |extractor, doc| extractor.extract(doc.as_ref()))
        .collect()
}
