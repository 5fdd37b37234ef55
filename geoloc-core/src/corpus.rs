//! # Corpus Inglês Anotado (POS + BIO)
//!
//! Pequeno corpus anotado à mão usado para treinar os modelos embutidos
//! ([`crate::model::LocationModels::builtin`]). Cada token carrega duas camadas:
//!
//! - **POS** (Penn Treebank): alimenta o etiquetador e o dicionário de tags;
//! - **BIO**: alimenta o modelo de reconhecimento de nomes e o gazetteer.
//!
//! Algumas frases existem só para criar ambiguidade no dicionário: "The" aparece como
//! `DT` e como parte de "The Hague" (`NNP`); "Bill" (pessoa) e "bill" (conta) são
//! entradas distintas porque o dicionário diferencia maiúsculas.

use std::collections::BTreeSet;

use crate::tagger::{location_spans, Tag};

/// Uma frase anotada.
pub struct AnnotatedSentence {
    /// Texto original; tokenizado pelo tokenizador padrão gera exatamente `annotations`.
    pub text: &'static str,
    /// Triplas (palavra, tag_POS, tag_BIO).
    pub annotations: &'static [(&'static str, &'static str, &'static str)],
}

/// Retorna o corpus completo.
pub fn get_corpus() -> Vec<AnnotatedSentence> {
    vec![
        // ===== VIAGENS =====
        AnnotatedSentence {
            text: "John went to Paris.",
            annotations: &[
                ("John", "NNP", "B-PER"), ("went", "VBD", "O"), ("to", "TO", "O"),
                ("Paris", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Paris is lovely in the spring.",
            annotations: &[
                ("Paris", "NNP", "B-LOC"), ("is", "VBZ", "O"), ("lovely", "JJ", "O"),
                ("in", "IN", "O"), ("the", "DT", "O"), ("spring", "NN", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Maria Silva moved from Rio de Janeiro to New York in 2019.",
            annotations: &[
                ("Maria", "NNP", "B-PER"), ("Silva", "NNP", "I-PER"), ("moved", "VBD", "O"),
                ("from", "IN", "O"), ("Rio", "NNP", "B-LOC"), ("de", "NNP", "I-LOC"),
                ("Janeiro", "NNP", "I-LOC"), ("to", "TO", "O"), ("New", "NNP", "B-LOC"),
                ("York", "NNP", "I-LOC"), ("in", "IN", "O"), ("2019", "CD", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "We flew from Tokyo to Sydney last week.",
            annotations: &[
                ("We", "PRP", "O"), ("flew", "VBD", "O"), ("from", "IN", "O"),
                ("Tokyo", "NNP", "B-LOC"), ("to", "TO", "O"), ("Sydney", "NNP", "B-LOC"),
                ("last", "JJ", "O"), ("week", "NN", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "May I travel to Cairo with you?",
            annotations: &[
                ("May", "MD", "O"), ("I", "PRP", "O"), ("travel", "VB", "O"), ("to", "TO", "O"),
                ("Cairo", "NNP", "B-LOC"), ("with", "IN", "O"), ("you", "PRP", "O"), ("?", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Carlos Santos flew to Buenos Aires yesterday.",
            annotations: &[
                ("Carlos", "NNP", "B-PER"), ("Santos", "NNP", "I-PER"), ("flew", "VBD", "O"),
                ("to", "TO", "O"), ("Buenos", "NNP", "B-LOC"), ("Aires", "NNP", "I-LOC"),
                ("yesterday", "NN", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "They drove from Los Angeles to San Francisco.",
            annotations: &[
                ("They", "PRP", "O"), ("drove", "VBD", "O"), ("from", "IN", "O"),
                ("Los", "NNP", "B-LOC"), ("Angeles", "NNP", "I-LOC"), ("to", "TO", "O"),
                ("San", "NNP", "B-LOC"), ("Francisco", "NNP", "I-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "This summer we stayed in a hotel near Venice.",
            annotations: &[
                ("This", "DT", "O"), ("summer", "NN", "O"), ("we", "PRP", "O"),
                ("stayed", "VBD", "O"), ("in", "IN", "O"), ("a", "DT", "O"), ("hotel", "NN", "O"),
                ("near", "IN", "O"), ("Venice", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "A ferry connects Dover with Calais.",
            annotations: &[
                ("A", "DT", "O"), ("ferry", "NN", "O"), ("connects", "VBZ", "O"),
                ("Dover", "NNP", "B-LOC"), ("with", "IN", "O"), ("Calais", "NNP", "B-LOC"),
                (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Students from Lisbon visited Madrid and Barcelona.",
            annotations: &[
                ("Students", "NNS", "O"), ("from", "IN", "O"), ("Lisbon", "NNP", "B-LOC"),
                ("visited", "VBD", "O"), ("Madrid", "NNP", "B-LOC"), ("and", "CC", "O"),
                ("Barcelona", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        // ===== POLÍTICA =====
        AnnotatedSentence {
            text: "The Hague hosts the International Court of Justice.",
            annotations: &[
                ("The", "NNP", "B-LOC"), ("Hague", "NNP", "I-LOC"), ("hosts", "VBZ", "O"),
                ("the", "DT", "O"), ("International", "NNP", "B-ORG"), ("Court", "NNP", "I-ORG"),
                ("of", "IN", "I-ORG"), ("Justice", "NNP", "I-ORG"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Angela Merkel met the president in Berlin.",
            annotations: &[
                ("Angela", "NNP", "B-PER"), ("Merkel", "NNP", "I-PER"), ("met", "VBD", "O"),
                ("the", "DT", "O"), ("president", "NN", "O"), ("in", "IN", "O"),
                ("Berlin", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "The United Nations opened an office in Geneva.",
            annotations: &[
                ("The", "DT", "O"), ("United", "NNP", "B-ORG"), ("Nations", "NNPS", "I-ORG"),
                ("opened", "VBD", "O"), ("an", "DT", "O"), ("office", "NN", "O"),
                ("in", "IN", "O"), ("Geneva", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Washington is the capital of the United States.",
            annotations: &[
                ("Washington", "NNP", "B-LOC"), ("is", "VBZ", "O"), ("the", "DT", "O"),
                ("capital", "NN", "O"), ("of", "IN", "O"), ("the", "DT", "O"),
                ("United", "NNP", "B-LOC"), ("States", "NNPS", "I-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "George Washington was born in Virginia.",
            annotations: &[
                ("George", "NNP", "B-PER"), ("Washington", "NNP", "I-PER"), ("was", "VBD", "O"),
                ("born", "VBN", "O"), ("in", "IN", "O"), ("Virginia", "NNP", "B-LOC"),
                (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Officials in Kenya and Uganda signed the agreement.",
            annotations: &[
                ("Officials", "NNS", "O"), ("in", "IN", "O"), ("Kenya", "NNP", "B-LOC"),
                ("and", "CC", "O"), ("Uganda", "NNP", "B-LOC"), ("signed", "VBD", "O"),
                ("the", "DT", "O"), ("agreement", "NN", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Turkey borders Greece and Bulgaria.",
            annotations: &[
                ("Turkey", "NNP", "B-LOC"), ("borders", "VBZ", "O"), ("Greece", "NNP", "B-LOC"),
                ("and", "CC", "O"), ("Bulgaria", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        // ===== NOTÍCIAS =====
        AnnotatedSentence {
            text: "Reuters reported that the storm hit Florida on Monday.",
            annotations: &[
                ("Reuters", "NNP", "B-ORG"), ("reported", "VBD", "O"), ("that", "IN", "O"),
                ("the", "DT", "O"), ("storm", "NN", "O"), ("hit", "VBD", "O"),
                ("Florida", "NNP", "B-LOC"), ("on", "IN", "O"), ("Monday", "NNP", "O"),
                (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Heavy rain fell across northern India and Nepal.",
            annotations: &[
                ("Heavy", "JJ", "O"), ("rain", "NN", "O"), ("fell", "VBD", "O"),
                ("across", "IN", "O"), ("northern", "JJ", "O"), ("India", "NNP", "B-LOC"),
                ("and", "CC", "O"), ("Nepal", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "It was cold in Moscow, but warm in Athens.",
            annotations: &[
                ("It", "PRP", "O"), ("was", "VBD", "O"), ("cold", "JJ", "O"), ("in", "IN", "O"),
                ("Moscow", "NNP", "B-LOC"), (",", ",", "O"), ("but", "CC", "O"),
                ("warm", "JJ", "O"), ("in", "IN", "O"), ("Athens", "NNP", "B-LOC"),
                (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "In Mexico City, the festival drew thousands.",
            annotations: &[
                ("In", "IN", "O"), ("Mexico", "NNP", "B-LOC"), ("City", "NNP", "I-LOC"),
                (",", ",", "O"), ("the", "DT", "O"), ("festival", "NN", "O"),
                ("drew", "VBD", "O"), ("thousands", "NNS", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "He said the museum in Amsterdam is closed.",
            annotations: &[
                ("He", "PRP", "O"), ("said", "VBD", "O"), ("the", "DT", "O"),
                ("museum", "NN", "O"), ("in", "IN", "O"), ("Amsterdam", "NNP", "B-LOC"),
                ("is", "VBZ", "O"), ("closed", "VBN", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "The report from Reuters mentioned Canada.",
            annotations: &[
                ("The", "DT", "O"), ("report", "NN", "O"), ("from", "IN", "O"),
                ("Reuters", "NNP", "B-ORG"), ("mentioned", "VBD", "O"),
                ("Canada", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        // ===== ECONOMIA =====
        AnnotatedSentence {
            text: "Google announced a new campus in Dublin.",
            annotations: &[
                ("Google", "NNP", "B-ORG"), ("announced", "VBD", "O"), ("a", "DT", "O"),
                ("new", "JJ", "O"), ("campus", "NN", "O"), ("in", "IN", "O"),
                ("Dublin", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "The bank in Chicago lent money to Apple.",
            annotations: &[
                ("The", "DT", "O"), ("bank", "NN", "O"), ("in", "IN", "O"),
                ("Chicago", "NNP", "B-LOC"), ("lent", "VBD", "O"), ("money", "NN", "O"),
                ("to", "TO", "O"), ("Apple", "NNP", "B-ORG"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Microsoft hired engineers in Seattle.",
            annotations: &[
                ("Microsoft", "NNP", "B-ORG"), ("hired", "VBD", "O"), ("engineers", "NNS", "O"),
                ("in", "IN", "O"), ("Seattle", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Prices rose in Hong Kong and Singapore.",
            annotations: &[
                ("Prices", "NNS", "O"), ("rose", "VBD", "O"), ("in", "IN", "O"),
                ("Hong", "NNP", "B-LOC"), ("Kong", "NNP", "I-LOC"), ("and", "CC", "O"),
                ("Singapore", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "Bill paid the bill at a cafe in Rome.",
            annotations: &[
                ("Bill", "NNP", "B-PER"), ("paid", "VBD", "O"), ("the", "DT", "O"),
                ("bill", "NN", "O"), ("at", "IN", "O"), ("a", "DT", "O"), ("cafe", "NN", "O"),
                ("in", "IN", "O"), ("Rome", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        // ===== NATUREZA =====
        AnnotatedSentence {
            text: "Mr. Smith lives near Lake Geneva.",
            annotations: &[
                ("Mr.", "NNP", "O"), ("Smith", "NNP", "B-PER"), ("lives", "VBZ", "O"),
                ("near", "IN", "O"), ("Lake", "NNP", "B-LOC"), ("Geneva", "NNP", "I-LOC"),
                (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "The mountain climbers reached Mount Everest in May.",
            annotations: &[
                ("The", "DT", "O"), ("mountain", "NN", "O"), ("climbers", "NNS", "O"),
                ("reached", "VBD", "O"), ("Mount", "NNP", "B-LOC"), ("Everest", "NNP", "I-LOC"),
                ("in", "IN", "O"), ("May", "NNP", "O"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "The Amazon River runs through Brazil and Peru.",
            annotations: &[
                ("The", "DT", "O"), ("Amazon", "NNP", "B-LOC"), ("River", "NNP", "I-LOC"),
                ("runs", "VBZ", "O"), ("through", "IN", "O"), ("Brazil", "NNP", "B-LOC"),
                ("and", "CC", "O"), ("Peru", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "The river flows through London and Oxford.",
            annotations: &[
                ("The", "DT", "O"), ("river", "NN", "O"), ("flows", "VBZ", "O"),
                ("through", "IN", "O"), ("London", "NNP", "B-LOC"), ("and", "CC", "O"),
                ("Oxford", "NNP", "B-LOC"), (".", ".", "O"),
            ],
        },
        AnnotatedSentence {
            text: "She cooked a turkey for the family.",
            annotations: &[
                ("She", "PRP", "O"), ("cooked", "VBD", "O"), ("a", "DT", "O"),
                ("turkey", "NN", "O"), ("for", "IN", "O"), ("the", "DT", "O"),
                ("family", "NN", "O"), (".", ".", "O"),
            ],
        },
        // ===== ESPORTES =====
        AnnotatedSentence {
            text: "The French team won the World Cup in Moscow.",
            annotations: &[
                ("The", "DT", "O"), ("French", "JJ", "B-MISC"), ("team", "NN", "O"),
                ("won", "VBD", "O"), ("the", "DT", "O"), ("World", "NNP", "B-MISC"),
                ("Cup", "NNP", "I-MISC"), ("in", "IN", "O"), ("Moscow", "NNP", "B-LOC"),
                (".", ".", "O"),
            ],
        },
    ]
}

/// Sequências `(palavra, tag_POS)` para o etiquetador e o dicionário.
pub fn pos_sequences() -> Vec<Vec<(&'static str, &'static str)>> {
    get_corpus()
        .iter()
        .map(|s| s.annotations.iter().map(|&(w, pos, _)| (w, pos)).collect())
        .collect()
}

/// Sequências `(palavra, tag_BIO)` para o modelo de nomes.
pub fn bio_sequences() -> Vec<Vec<(&'static str, &'static str)>> {
    get_corpus()
        .iter()
        .map(|s| s.annotations.iter().map(|&(w, _, bio)| (w, bio)).collect())
        .collect()
}

/// Nomes de locais anotados no corpus (spans `LOC`), sem repetição.
pub fn location_names() -> Vec<String> {
    let mut names = BTreeSet::new();
    for sentence in get_corpus() {
        let tags: Vec<Tag> = sentence
            .annotations
            .iter()
            .map(|&(_, _, bio)| Tag::from_label(bio).unwrap_or(Tag::Outside))
            .collect();
        for span in location_spans(&tags) {
            let words: Vec<&str> = sentence.annotations[span.range()]
                .iter()
                .map(|&(w, _, _)| w)
                .collect();
            names.insert(words.join(" "));
        }
    }
    names.into_iter().collect()
}

/// Locais conhecidos que complementam o gazetteer além do que o corpus anota.
pub const SEED_LOCATIONS: &[&str] = &[
    "Africa", "Asia", "Europe", "North America", "South America", "Antarctica",
    "Atlantic Ocean", "Pacific Ocean", "Mediterranean Sea",
    "Argentina", "Australia", "Austria", "Belgium", "Chile", "China", "Colombia",
    "Denmark", "Egypt", "England", "Finland", "France", "Germany", "Ireland", "Israel",
    "Italy", "Japan", "Mexico", "Morocco", "Netherlands", "Nigeria", "Norway", "Poland",
    "Portugal", "Russia", "Scotland", "South Africa", "South Korea", "Spain", "Sweden",
    "Switzerland", "Ukraine", "United Kingdom", "Vietnam",
    "Bangkok", "Beijing", "Boston", "Cape Town", "Edinburgh", "Florence", "Istanbul",
    "Jerusalem", "Lagos", "Lima", "Manchester", "Melbourne", "Milan", "Montreal",
    "Mumbai", "Munich", "Nairobi", "Naples", "New Delhi", "New Orleans", "Prague",
    "Quebec", "Rio de Janeiro", "São Paulo", "Santiago", "Seoul", "Shanghai",
    "St. Louis", "St. Petersburg", "Stockholm", "Toronto", "Vancouver", "Vienna",
    "Warsaw", "Washington, D.C.", "Zurich",
    "Mount Kilimanjaro", "Lake Victoria", "Nile River", "Sahara Desert", "Alps",
    "Rocky Mountains", "Grand Canyon",
];

/// Textos de demonstração para a interface web e o console.
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Viagens",
            "John went to Paris. Paris is lovely in the spring, but he soon left for Rome and Florence. In August he flew from Milan to New York, where his sister Maria lives near Central Park.",
        ),
        (
            "Desambiguação",
            "Paris Hilton flew to Paris last week. George Washington never lived in Washington, D.C. and Bill paid the bill in Turkey before he cooked a turkey.",
        ),
        (
            "Notícias",
            "Reuters reported that the storm hit Florida on Monday. Heavy rain also fell across northern India and Nepal, while officials in Kenya and Uganda signed a water agreement in Nairobi.",
        ),
        (
            "Abreviações",
            "Mr. Smith moved to St. Louis in 1990. Dr. J. R. Jones visited the U.S. in May and later sailed from Dover to Calais.",
        ),
        (
            "Natureza",
            "The Amazon River runs through Brazil and Peru. Climbers who reach Mount Everest often start in Kathmandu, and some later hike around Lake Geneva in Switzerland.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{RuleTokenizer, Tokenizer, TokenizerMode};

    #[test]
    fn test_annotations_match_tokenizer() {
        let tokenizer = RuleTokenizer::new(TokenizerMode::Standard);
        for sentence in get_corpus() {
            let frame = tokenizer.tokenize(sentence.text);
            let words: Vec<&str> = sentence.annotations.iter().map(|&(w, _, _)| w).collect();
            assert_eq!(frame.tokens(), words.as_slice(), "frase: {}", sentence.text);
        }
    }

    #[test]
    fn test_bio_labels_are_valid() {
        for sentence in get_corpus() {
            let mut prev = Tag::Outside;
            for &(word, _, bio) in sentence.annotations {
                let tag = Tag::from_label(bio).unwrap_or_else(|| panic!("tag inválida {bio}"));
                assert!(
                    Tag::is_valid_transition(&prev, &tag),
                    "transição inválida em '{word}' ({})",
                    sentence.text
                );
                prev = tag;
            }
        }
    }

    #[test]
    fn test_location_names() {
        let names = location_names();
        assert!(names.contains(&"Rio de Janeiro".to_string()));
        assert!(names.contains(&"The Hague".to_string()));
        assert!(names.contains(&"Paris".to_string()));
        assert!(!names.contains(&"John".to_string()));
    }

    #[test]
    fn test_layers_have_same_length() {
        let pos = pos_sequences();
        let bio = bio_sequences();
        assert_eq!(pos.len(), get_corpus().len());
        for (p, b) in pos.iter().zip(&bio) {
            assert_eq!(p.len(), b.len());
        }
    }
}
