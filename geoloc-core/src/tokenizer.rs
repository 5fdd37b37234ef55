//! # Tokenizador
//!
//! Divide o texto de uma frase em tokens (palavras, pontuações) e mantém, para cada
//! token, seu span **relativo ao início da frase**. O par alinhado (textos, spans)
//! forma um [`TokenFrame`], que é o que o resolvedor de offsets consome.
//!
//! ## Modos
//!
//! - **Standard**: palavras separadas por espaços/pontuações. Preserva abreviações
//!   ("Mr.", "St.", "U.S."), iniciais ("J.") e números decimais ("3.5").
//! - **Whitespace**: apenas espaços separam tokens. Útil para textos já tokenizados.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use geoloc_core::tokenizer::{RuleTokenizer, Tokenizer, TokenizerMode};
//!
//! let frame = RuleTokenizer::new(TokenizerMode::Standard).tokenize("Mr. Smith left St. Louis.");
//! assert_eq!(frame.tokens(), ["Mr.", "Smith", "left", "St.", "Louis", "."]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::span::{Sentence, Span};

/// Papel de tokenizador: frase → [`TokenFrame`].
///
/// Implementações devem ser sem estado por chamada (compartilháveis entre threads).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> TokenFrame;
}

/// Tokens de uma frase e seus spans, alinhados por índice.
///
/// # Invariantes
/// - `tokens.len() == spans.len()`
/// - spans ordenados pelo início, sem sobreposição
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenFrame {
    tokens: Vec<String>,
    spans: Vec<Span<Sentence>>,
}

impl TokenFrame {
    /// Constrói um frame verificando os invariantes.
    pub fn new(tokens: Vec<String>, spans: Vec<Span<Sentence>>) -> Result<Self> {
        if tokens.len() != spans.len() {
            return Err(ExtractError::contract(format!(
                "token frame desalinhado: {} tokens para {} spans",
                tokens.len(),
                spans.len()
            )));
        }
        if let Some(w) = spans.windows(2).find(|w| w[1].start() < w[0].end()) {
            return Err(ExtractError::contract(format!(
                "spans de token fora de ordem ou sobrepostos: {} seguido de {}",
                w[0], w[1]
            )));
        }
        Ok(Self { tokens, spans })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn spans(&self) -> &[Span<Sentence>] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Itera sobre pares (texto, span).
    pub fn iter(&self) -> impl Iterator<Item = (&str, Span<Sentence>)> + '_ {
        self.tokens.iter().map(String::as_str).zip(self.spans.iter().copied())
    }

    /// Adiciona um token produzido pelos tokenizadores internos, que já emitem em ordem.
    fn push(&mut self, text: String, start: usize, end: usize) {
        if let Some(span) = Span::new(start, end) {
            self.tokens.push(text);
            self.spans.push(span);
        }
    }
}

/// Estratégias de tokenização disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// **Padrão**: separa por espaços e pontuações, preservando abreviações e decimais.
    #[default]
    Standard,
    /// **Espaços**: cada sequência sem espaços é um token.
    Whitespace,
}

/// Tokenizador baseado em regras.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer {
    mode: TokenizerMode,
}

impl RuleTokenizer {
    pub fn new(mode: TokenizerMode) -> Self {
        Self { mode }
    }
}

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, sentence: &str) -> TokenFrame {
        match self.mode {
            TokenizerMode::Standard => tokenize_standard(sentence),
            TokenizerMode::Whitespace => tokenize_whitespace(sentence),
        }
    }
}

/// Abreviações inglesas cujo ponto pertence ao token
pub(crate) const ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr", "St", "Mt", "Ft", "Gen", "Col",
    "Capt", "Lt", "Sgt", "Gov", "Sen", "Rep", "Rev", "Hon", "Pres", "Inc", "Ltd",
    "Co", "Corp", "Bros", "vs", "etc", "approx", "Ave", "Blvd", "Rd", "No",
    "Jan", "Feb", "Mar", "Apr", "Aug", "Sep", "Sept", "Oct", "Nov", "Dec",
];

/// Verifica se o texto acumulado termina em uma inicial maiúscula isolada ("J", "U.S").
fn ends_with_initial(current: &str) -> bool {
    let last = current.rsplit('.').next().unwrap_or(current);
    let mut chars = last.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn tokenize_whitespace(text: &str) -> TokenFrame {
    let mut frame = TokenFrame::default();
    let mut current_start: Option<usize> = None;

    for (byte_pos, ch) in text.char_indices() {
        match (ch.is_whitespace(), current_start) {
            (true, Some(start)) => {
                frame.push(text[start..byte_pos].to_string(), start, byte_pos);
                current_start = None;
            }
            (false, None) => current_start = Some(byte_pos),
            _ => {}
        }
    }
    if let Some(start) = current_start {
        frame.push(text[start..].to_string(), start, text.len());
    }
    frame
}

fn tokenize_standard(text: &str) -> TokenFrame {
    let mut frame = TokenFrame::default();
    let mut current_start = 0;
    let mut current_text = String::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(byte_pos, ch)) in chars.iter().enumerate() {
        if ch.is_alphanumeric() || ch == '-' && !current_text.is_empty() {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if ch == '.' && !current_text.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current_text.as_str())
                || ends_with_initial(&current_text);
            // Decimal (ex: 3.5)
            let current_is_num = current_text.chars().all(char::is_numeric);
            let next_is_num = chars
                .get(i + 1)
                .map(|(_, c)| c.is_numeric())
                .unwrap_or(false);

            if is_abbrev || (current_is_num && next_is_num) {
                current_text.push('.');
            } else {
                flush_token(&mut frame, &mut current_text, current_start, byte_pos);
                frame.push(".".to_string(), byte_pos, byte_pos + 1);
            }
        } else if (ch == '\'' || ch == '\u{2019}') && !current_text.is_empty() {
            // Apóstrofo interno ("O'Hare", "John's")
            current_text.push(ch);
        } else if ch.is_whitespace() {
            flush_token(&mut frame, &mut current_text, current_start, byte_pos);
        } else {
            flush_token(&mut frame, &mut current_text, current_start, byte_pos);
            frame.push(ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        }
    }

    flush_token(&mut frame, &mut current_text, current_start, text.len());
    frame
}

/// Fecha o token acumulado e adiciona ao frame (se não vazio)
fn flush_token(frame: &mut TokenFrame, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        frame.push(std::mem::take(text), start, end);
    }
}
