//! # Hidden Markov Model (HMM) de Sequências
//!
//! Implementação clássica de HMM de primeira ordem, usada por dois componentes:
//! - o **etiquetador morfossintático** (estados = tags Penn Treebank: NNP, DT, VBD...);
//! - o **reconhecedor de nomes** (estados = tags BIO: B-LOC, I-LOC, O...).
//!
//! O modelo guarda apenas **contagens** observadas no corpus; as probabilidades são
//! derivadas na decodificação:
//! 1. Transição: P(tag_atual | tag_anterior), suavização add-1
//! 2. Emissão: P(palavra | tag), suavização add-α (α pequeno)
//! 3. Inicial: P(tag_inicial), suavização add-1
//!
//! Guardar contagens em mapas com chave `String` permite serializar o modelo em JSON.
//!
//! ## Palavras desconhecidas
//!
//! Palavras que aparecem uma única vez no treino também são contadas sob a sua
//! **forma** (`<UNK-CAP>`, `<UNK-NUM>`...). Na predição, uma palavra fora do vocabulário
//! é observada pela sua forma, o que leva "Timbuktu" a se comportar como as palavras
//! raras capitalizadas do corpus.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Classes de forma usadas para palavras desconhecidas.
pub const SHAPES: &[&str] = &[
    "<UNK-CAP>",
    "<UNK-CAPS>",
    "<UNK-NUM>",
    "<UNK-LOWER>",
    "<UNK-PUNCT>",
    "<UNK>",
];

/// Suavização padrão das emissões.
const DEFAULT_EMISSION_ALPHA: f64 = 0.01;

/// Classifica a forma ortográfica de uma palavra.
pub fn word_shape(word: &str) -> &'static str {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return "<UNK>";
    };
    if word.chars().any(char::is_numeric) {
        "<UNK-NUM>"
    } else if !word.chars().any(char::is_alphanumeric) {
        "<UNK-PUNCT>"
    } else if word.chars().count() > 1 && word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) {
        "<UNK-CAPS>"
    } else if first.is_uppercase() {
        "<UNK-CAP>"
    } else if first.is_lowercase() {
        "<UNK-LOWER>"
    } else {
        "<UNK>"
    }
}

/// Modelo HMM treinado por contagem supervisionada.
///
/// # Componentes
/// - **Transição**: `transition_counts[prev][curr]`
/// - **Emissão**: `emission_counts[tag][palavra]` (inclui as classes de forma)
/// - **Inicial**: `start_counts[tag]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HmmModel {
    transition_counts: BTreeMap<String, BTreeMap<String, u32>>,
    emission_counts: BTreeMap<String, BTreeMap<String, u32>>,
    start_counts: BTreeMap<String, u32>,
    tag_counts: BTreeMap<String, u32>,
    /// Número de sequências vistas no treino.
    sequences: u32,
    /// Vocabulário conhecido (palavras vistas no treino).
    vocab: BTreeSet<String>,
    #[serde(default = "default_emission_alpha")]
    emission_alpha: f64,
}

fn default_emission_alpha() -> f64 {
    DEFAULT_EMISSION_ALPHA
}

impl HmmModel {
    pub fn new() -> Self {
        Self {
            emission_alpha: DEFAULT_EMISSION_ALPHA,
            ..Self::default()
        }
    }

    /// Treina o HMM com sequências rotuladas `(palavra, tag)`.
    ///
    /// Pode ser chamado mais de uma vez; as contagens se acumulam.
    pub fn train<'s, 'w: 's, I>(&mut self, sequences: I)
    where
        I: IntoIterator<Item = &'s [(&'w str, &'w str)]>,
    {
        let sequences: Vec<&[(&str, &str)]> = sequences.into_iter().collect();

        // Frequência de cada palavra, para detectar hapax legomena
        let mut word_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for seq in &sequences {
            for &(word, _) in seq.iter() {
                *word_freq.entry(word).or_insert(0) += 1;
            }
        }

        for seq in &sequences {
            if seq.is_empty() {
                continue;
            }
            self.sequences += 1;
            let mut prev_tag: Option<&str> = None;

            for &(word, tag) in seq.iter() {
                self.vocab.insert(word.to_string());
                *self.tag_counts.entry(tag.to_string()).or_insert(0) += 1;

                let emissions = self.emission_counts.entry(tag.to_string()).or_default();
                *emissions.entry(word.to_string()).or_insert(0) += 1;
                if word_freq.get(word).copied() == Some(1) {
                    *emissions.entry(word_shape(word).to_string()).or_insert(0) += 1;
                }

                match prev_tag {
                    None => *self.start_counts.entry(tag.to_string()).or_insert(0) += 1,
                    Some(prev) => {
                        *self
                            .transition_counts
                            .entry(prev.to_string())
                            .or_default()
                            .entry(tag.to_string())
                            .or_insert(0) += 1
                    }
                }
                prev_tag = Some(tag);
            }
        }
    }

    /// Lista ordenada de todas as tags conhecidas.
    pub fn tags(&self) -> Vec<&str> {
        self.tag_counts.keys().map(String::as_str).collect()
    }

    pub fn is_trained(&self) -> bool {
        !self.tag_counts.is_empty()
    }

    /// Verifica a consistência de um modelo carregado de disco.
    pub fn validate(&self) -> Result<(), String> {
        if !self.is_trained() {
            return Err("modelo sem nenhuma tag".into());
        }
        if !(self.emission_alpha > 0.0) {
            return Err(format!("emission_alpha inválido: {}", self.emission_alpha));
        }
        let unknown = self
            .emission_counts
            .keys()
            .chain(self.transition_counts.keys())
            .chain(self.start_counts.keys())
            .find(|tag| !self.tag_counts.contains_key(*tag));
        match unknown {
            Some(tag) => Err(format!("tag '{tag}' ausente de tag_counts")),
            None => Ok(()),
        }
    }

    fn start_log(&self, tag: &str) -> f64 {
        let count = self.start_counts.get(tag).copied().unwrap_or(0) as f64;
        let num_tags = self.tag_counts.len() as f64;
        ((count + 1.0) / (self.sequences as f64 + num_tags)).ln()
    }

    fn transition_log(&self, prev: &str, curr: &str) -> f64 {
        let row = self.transition_counts.get(prev);
        let count = row.and_then(|r| r.get(curr)).copied().unwrap_or(0) as f64;
        let total: f64 = row.map(|r| r.values().map(|&c| c as f64).sum()).unwrap_or(0.0);
        let num_tags = self.tag_counts.len() as f64;
        ((count + 1.0) / (total + num_tags)).ln()
    }

    fn emission_log(&self, tag: &str, observation: &str) -> f64 {
        let count = self
            .emission_counts
            .get(tag)
            .and_then(|e| e.get(observation))
            .copied()
            .unwrap_or(0) as f64;
        let tag_count = self.tag_counts.get(tag).copied().unwrap_or(0) as f64;
        let observations = (self.vocab.len() + SHAPES.len()) as f64;
        let alpha = self.emission_alpha;
        ((count + alpha) / (tag_count + alpha * observations)).ln()
    }

    /// Observação usada para um token: a própria palavra ou a sua forma.
    fn observation<'w>(&self, word: &'w str) -> &'w str {
        if self.vocab.contains(word) {
            word
        } else {
            word_shape(word)
        }
    }

    /// Decodifica uma sequência de tokens para a melhor sequência de tags (Viterbi).
    ///
    /// # Complexidade
    /// $O(N \cdot T^2)$, onde $N$ é o número de tokens e $T$ o número de tags.
    ///
    /// # Retorno
    /// Tags alinhadas com os tokens de entrada. Vazio se o modelo não foi treinado.
    /// Empates são resolvidos pela menor tag em ordem lexicográfica, de forma determinística.
    pub fn predict(&self, tokens: &[String]) -> Vec<String> {
        let all_tags = self.tags();
        if tokens.is_empty() || all_tags.is_empty() {
            return Vec::new();
        }

        let n_tokens = tokens.len();
        let n_tags = all_tags.len();

        // viterbi[t][s] = log-prob do melhor caminho terminando no tempo t com estado s
        let mut viterbi = vec![vec![f64::NEG_INFINITY; n_tags]; n_tokens];
        // backptr[t][s] = índice do estado anterior que maximizou viterbi[t][s]
        let mut backptr = vec![vec![0usize; n_tags]; n_tokens];

        // Transições pré-calculadas (T x T)
        let trans: Vec<Vec<f64>> = all_tags
            .iter()
            .map(|prev| all_tags.iter().map(|curr| self.transition_log(prev, curr)).collect())
            .collect();

        // 1. Inicialização (t=0)
        let first = self.observation(&tokens[0]);
        for (s, tag) in all_tags.iter().enumerate() {
            viterbi[0][s] = self.start_log(tag) + self.emission_log(tag, first);
        }

        // 2. Recursão (t=1..N)
        for t in 1..n_tokens {
            let obs = self.observation(&tokens[t]);
            for (s, curr_tag) in all_tags.iter().enumerate() {
                let emit_p = self.emission_log(curr_tag, obs);
                let mut best_prob = f64::NEG_INFINITY;
                let mut best_prev = 0;

                for prev_s in 0..n_tags {
                    let prob = viterbi[t - 1][prev_s] + trans[prev_s][s];
                    if prob > best_prob {
                        best_prob = prob;
                        best_prev = prev_s;
                    }
                }

                viterbi[t][s] = best_prob + emit_p;
                backptr[t][s] = best_prev;
            }
        }

        // 3. Terminação
        let mut best_last = 0;
        for s in 1..n_tags {
            if viterbi[n_tokens - 1][s] > viterbi[n_tokens - 1][best_last] {
                best_last = s;
            }
        }

        // 4. Backtracking
        let mut best_path = vec![String::new(); n_tokens];
        let mut curr = best_last;
        best_path[n_tokens - 1] = all_tags[curr].to_string();
        for t in (1..n_tokens).rev() {
            curr = backptr[t][curr];
            best_path[t - 1] = all_tags[curr].to_string();
        }

        best_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn tiny_model() -> HmmModel {
        let corpus: [&[(&str, &str)]; 3] = [
            &[("Paris", "NNP"), ("is", "VBZ"), ("big", "JJ"), (".", ".")],
            &[("The", "DT"), ("city", "NN"), ("is", "VBZ"), ("old", "JJ"), (".", ".")],
            &[("Rome", "NNP"), ("is", "VBZ"), ("old", "JJ"), (".", ".")],
        ];
        let mut model = HmmModel::new();
        model.train(corpus);
        model
    }

    #[test]
    fn test_hmm_basic_training() {
        let model = tiny_model();
        assert!(model.tags().contains(&"NNP"));
        assert!(model.validate().is_ok());

        let tags = model.predict(&strings(&["Paris", "is", "old", "."]));
        assert_eq!(tags, ["NNP", "VBZ", "JJ", "."]);
    }

    #[test]
    fn test_hmm_unknown_capitalized_word() {
        let model = tiny_model();
        // "Lisbon" é desconhecida, mas tem a forma das raras capitalizadas (NNP)
        let tags = model.predict(&strings(&["Lisbon", "is", "big", "."]));
        assert_eq!(tags[0], "NNP");
        assert_eq!(tags.len(), 4);
    }

    #[test]
    fn test_untrained_model_predicts_nothing() {
        let model = HmmModel::new();
        assert!(model.predict(&strings(&["a"])).is_empty());
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_word_shapes() {
        assert_eq!(word_shape("Paris"), "<UNK-CAP>");
        assert_eq!(word_shape("NATO"), "<UNK-CAPS>");
        assert_eq!(word_shape("1990"), "<UNK-NUM>");
        assert_eq!(word_shape("city"), "<UNK-LOWER>");
        assert_eq!(word_shape("--"), "<UNK-PUNCT>");
        assert_eq!(word_shape(""), "<UNK>");
    }

    #[test]
    fn test_json_round_trip() {
        let model = tiny_model();
        let json = serde_json::to_string(&model).unwrap();
        let loaded: HmmModel = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, model);
    }
}
