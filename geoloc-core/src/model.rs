//! # Modelos de Extração
//!
//! Agrupa tudo o que os colaboradores padrão precisam para funcionar:
//! - **HMM POS**: etiquetador morfossintático (Penn Treebank);
//! - **HMM BIO**: modelo de reconhecimento de nomes;
//! - **Dicionário de tags**: palavra → tags possíveis;
//! - **Gazetteer**: nomes de locais conhecidos.
//!
//! Os modelos podem ser treinados a partir do corpus embutido ([`LocationModels::builtin`])
//! ou lidos de um diretório com quatro arquivos JSON ([`LocationModels::load`]):
//!
//! ```text
//! models/
//! ├── pos-hmm.json
//! ├── ner-hmm.json
//! ├── pos-dictionary.json
//! └── gazetteer.json
//! ```
//!
//! Qualquer falha de leitura acontece aqui, na construção, e nunca durante a extração.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::corpus::{bio_sequences, location_names, pos_sequences, SEED_LOCATIONS};
use crate::error::{ExtractError, Result};
use crate::extractor::LocationExtractor;
use crate::gazetteer::Gazetteer;
use crate::hmm::HmmModel;
use crate::pos::{HmmPosTagger, PosDictionary};
use crate::recognizer::AdaptiveNameRecognizer;
use crate::sentence::RuleSentenceSegmenter;
use crate::tokenizer::{RuleTokenizer, TokenizerMode};

pub const POS_MODEL_FILE: &str = "pos-hmm.json";
pub const NER_MODEL_FILE: &str = "ner-hmm.json";
pub const DICTIONARY_FILE: &str = "pos-dictionary.json";
pub const GAZETTEER_FILE: &str = "gazetteer.json";

/// Conjunto de modelos compartilhados (somente leitura) entre extratores.
///
/// Clonar é barato: só os `Arc`s são copiados.
#[derive(Debug, Clone)]
pub struct LocationModels {
    pos: Arc<HmmModel>,
    ner: Arc<HmmModel>,
    dictionary: Arc<PosDictionary>,
    gazetteer: Arc<Gazetteer>,
    tokenizer_mode: TokenizerMode,
}

impl LocationModels {
    pub fn new(pos: HmmModel, ner: HmmModel, dictionary: PosDictionary, gazetteer: Gazetteer) -> Self {
        Self {
            pos: Arc::new(pos),
            ner: Arc::new(ner),
            dictionary: Arc::new(dictionary),
            gazetteer: Arc::new(gazetteer),
            tokenizer_mode: TokenizerMode::Standard,
        }
    }

    /// Treina os modelos a partir do corpus anotado embutido.
    pub fn builtin() -> Self {
        let pos_seqs = pos_sequences();
        let bio_seqs = bio_sequences();

        let mut pos = HmmModel::new();
        pos.train(pos_seqs.iter().map(Vec::as_slice));

        let mut ner = HmmModel::new();
        ner.train(bio_seqs.iter().map(Vec::as_slice));

        let dictionary = PosDictionary::from_sequences(pos_seqs.iter().map(Vec::as_slice));

        let mut gazetteer = Gazetteer::new(location_names());
        for name in SEED_LOCATIONS {
            gazetteer.add(*name);
        }

        info!(
            pos_tags = pos.tags().len(),
            dictionary = dictionary.len(),
            gazetteer = gazetteer.len(),
            "modelos embutidos treinados"
        );
        Self::new(pos, ner, dictionary, gazetteer)
    }

    /// Lê os quatro arquivos de modelo de `dir`.
    ///
    /// # Erros
    /// - [`ExtractError::ModelRead`]: arquivo ausente ou ilegível;
    /// - [`ExtractError::ModelParse`]: JSON malformado;
    /// - [`ExtractError::ModelInvalid`]: HMM inconsistente ou dicionário vazio.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let pos: HmmModel = read_json(&dir.join(POS_MODEL_FILE))?;
        check_hmm(&pos, &dir.join(POS_MODEL_FILE))?;

        let ner: HmmModel = read_json(&dir.join(NER_MODEL_FILE))?;
        check_hmm(&ner, &dir.join(NER_MODEL_FILE))?;

        let dictionary: PosDictionary = read_json(&dir.join(DICTIONARY_FILE))?;
        if dictionary.is_empty() {
            return Err(ExtractError::ModelInvalid {
                path: dir.join(DICTIONARY_FILE),
                reason: "dicionário de tags vazio".into(),
            });
        }

        let gazetteer: Gazetteer = read_json(&dir.join(GAZETTEER_FILE))?;

        info!(
            dir = %dir.display(),
            dictionary = dictionary.len(),
            gazetteer = gazetteer.len(),
            "modelos carregados"
        );
        Ok(Self::new(pos, ner, dictionary, gazetteer))
    }

    /// Grava os quatro arquivos de modelo em `dir` (criado se não existir).
    pub fn save(&self, dir: impl AsRef<Path>) -> io::Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        write_json(&dir.join(POS_MODEL_FILE), self.pos.as_ref())?;
        write_json(&dir.join(NER_MODEL_FILE), self.ner.as_ref())?;
        write_json(&dir.join(DICTIONARY_FILE), self.dictionary.as_ref())?;
        write_json(&dir.join(GAZETTEER_FILE), self.gazetteer.as_ref())?;
        info!(dir = %dir.display(), "modelos exportados");
        Ok(())
    }

    /// Modo de tokenização usado pelos extratores construídos a partir destes modelos.
    pub fn with_tokenizer_mode(mut self, mode: TokenizerMode) -> Self {
        self.tokenizer_mode = mode;
        self
    }

    /// Monta um extrator pronto, com estado adaptativo próprio.
    pub fn extractor(&self) -> LocationExtractor {
        LocationExtractor::new(
            Arc::new(RuleSentenceSegmenter::new()),
            Arc::new(RuleTokenizer::new(self.tokenizer_mode)),
            Box::new(AdaptiveNameRecognizer::new(
                Arc::clone(&self.gazetteer),
                Arc::clone(&self.ner),
            )),
            Arc::new(HmmPosTagger::new(Arc::clone(&self.pos))),
            self.dictionary.clone(),
        )
    }

    pub fn pos_model(&self) -> &HmmModel {
        &self.pos
    }

    pub fn ner_model(&self) -> &HmmModel {
        &self.ner
    }

    pub fn dictionary(&self) -> &PosDictionary {
        &self.dictionary
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| ExtractError::ModelRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExtractError::ModelParse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()
}

fn check_hmm(model: &HmmModel, path: &Path) -> Result<()> {
    model.validate().map_err(|reason| ExtractError::ModelInvalid {
        path: path.to_path_buf(),
        reason,
    })
}
