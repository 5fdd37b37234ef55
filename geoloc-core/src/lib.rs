//! # geoloc-core — Extração de Nomes de Locais
//!
//! Este crate encontra, em texto livre em inglês, os trechos que parecem nomes de locais
//! e devolve cada um com o offset exato no documento. O resultado alimenta um resolvedor
//! geográfico externo (fora do escopo deste crate).
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: documento bruto (`&str`).
//! 2.  **Segmentação** ([`sentence`]): spans de frases no sistema do documento.
//! 3.  **Tokenização** ([`tokenizer`]): tokens e spans relativos à frase.
//! 4.  **Duas estratégias** por frase:
//!     *   **Reconhecedor de nomes** ([`recognizer`]): gazetteer + HMM BIO + memória adaptativa,
//!         limpa ao fim de cada frase.
//!     *   **Nomes próprios** ([`pos`]): tokens etiquetados `NNP` cuja entrada no dicionário
//!         de tags tem uma única tag.
//! 5.  **Resolução de offsets** ([`resolver`]): índices de token → posição no documento.
//! 6.  **Saída**: lista de [`LocationOccurrence`] (união das estratégias, sem deduplicação).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use geoloc_core::LocationModels;
//!
//! // 1. Treina os modelos embutidos e monta um extrator
//! let models = LocationModels::builtin();
//! let mut extractor = models.extractor();
//!
//! // 2. Extrai
//! let text = "John went to Paris. Paris is lovely.";
//! let occurrences = extractor.extract(text).unwrap();
//!
//! // 3. Cada ocorrência aponta para o trecho exato do documento
//! for occ in &occurrences {
//!     assert_eq!(&text[occ.position()..occ.end()], occ.text());
//! }
//! assert!(occurrences.iter().any(|o| o.text() == "Paris" && o.position() == 13));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`extractor`]: orquestrador que conecta todos os estágios.
//! - [`span`]: sistemas de coordenadas tipados (documento, frase, índice de token).
//! - [`model`]: treino, leitura e gravação dos modelos.
//! - [`corpus`]: corpus anotado (POS + BIO) usado no treino embutido.

pub mod corpus;
pub mod error;
pub mod extractor;
pub mod gazetteer;
pub mod hmm;
pub mod model;
pub mod occurrence;
pub mod pos;
pub mod recognizer;
pub mod resolver;
pub mod sentence;
pub mod span;
pub mod tagger;
pub mod tokenizer;

pub use error::{ExtractError, Result};
pub use extractor::{extract_batch, ExtractionEvent, LocationExtractor};
pub use model::LocationModels;
pub use occurrence::LocationOccurrence;
pub use pos::{PosTagger, TagDictionary};
pub use recognizer::NameRecognizer;
pub use sentence::SentenceSegmenter;
pub use span::{Document, Sentence, Span, TokenIndex};
pub use tokenizer::{TokenFrame, Tokenizer, TokenizerMode};
