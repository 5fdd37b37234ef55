//! # Esquema de Tags BIO
//!
//! O modelo de reconhecimento de nomes rotula cada token com uma tag **BIO**
//! (Beginning-Inside-Outside). As sequências de tags são depois convertidas em
//! spans de índices de token, que é o que o extrator consome.
//!
//! | Prefixo | Significado         | Exemplos                        |
//! |---------|---------------------|---------------------------------|
//! | PER     | Pessoa              | John, Angela Merkel             |
//! | ORG     | Organização         | United Nations, Reuters         |
//! | LOC     | Local/Geográfico    | Paris, New York, Mount Everest  |
//! | MISC    | Miscelânea          | Olympics, French                |
//! | O       | Fora de entidade    | (qualquer palavra não-entidade) |
//!
//! Só spans `LOC` viram ocorrências; as demais categorias existem para que o modelo
//! aprenda a *não* confundir "John" ou "Reuters" com locais.

use serde::{Deserialize, Serialize};

use crate::span::{Span, TokenIndex};

/// Categorias de entidade presentes no corpus de treino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    Per,
    Org,
    Loc,
    Misc,
}

impl EntityCategory {
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Per => "PER",
            EntityCategory::Org => "ORG",
            EntityCategory::Loc => "LOC",
            EntityCategory::Misc => "MISC",
        }
    }

    /// Tenta parsear a partir de string (ex: "LOC" → Some(Loc))
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "PER" => Some(EntityCategory::Per),
            "ORG" => Some(EntityCategory::Org),
            "LOC" => Some(EntityCategory::Loc),
            "MISC" => Some(EntityCategory::Misc),
            _ => None,
        }
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Primeiro token de uma entidade. Ex: **New** (B-LOC) York.
    Begin(EntityCategory),
    /// Continuação de uma entidade. Ex: New **York** (I-LOC).
    Inside(EntityCategory),
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-LOC", "I-PER", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(cat) => format!("B-{}", cat.name()),
            Tag::Inside(cat) => format!("I-{}", cat.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Verifica se a transição `prev → next` é válida no esquema BIO.
    ///
    /// `I-X` só pode seguir `B-X` ou `I-X`; `B-X` e `O` podem seguir qualquer tag.
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(cat) => match prev {
                Tag::Begin(prev_cat) | Tag::Inside(prev_cat) => prev_cat == cat,
                Tag::Outside => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-LOC" → Begin(Loc))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (prefix, name) = s.split_once('-')?;
        let cat = EntityCategory::from_name(name)?;
        match prefix {
            "B" => Some(Tag::Begin(cat)),
            "I" => Some(Tag::Inside(cat)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Converte uma sequência de tags BIO em spans de índices de token por categoria.
///
/// Máquina de estados do esquema BIO:
/// - `B-X` inicia uma nova entidade (fechando a anterior, se houver);
/// - `I-X` continua a entidade aberta de mesma categoria; se a categoria difere,
///   ou nenhuma entidade está aberta, é tratado como `B-X`;
/// - `O` fecha a entidade aberta.
///
/// # Exemplo
/// `[O, B-LOC, I-LOC, O, B-PER]` → `[(LOC, [1, 3)), (PER, [4, 5))]`
pub fn bio_to_spans(tags: &[Tag]) -> Vec<(EntityCategory, Span<TokenIndex>)> {
    let mut spans = Vec::new();
    let mut open: Option<(EntityCategory, usize)> = None;

    for (i, tag) in tags.iter().enumerate() {
        match (tag, open) {
            (Tag::Inside(cat), Some((open_cat, _))) if *cat == open_cat => {}
            (Tag::Begin(cat) | Tag::Inside(cat), _) => {
                close(&mut spans, open.take(), i);
                open = Some((*cat, i));
            }
            (Tag::Outside, _) => close(&mut spans, open.take(), i),
        }
    }
    close(&mut spans, open, tags.len());

    spans
}

fn close(
    spans: &mut Vec<(EntityCategory, Span<TokenIndex>)>,
    open: Option<(EntityCategory, usize)>,
    end: usize,
) {
    if let Some((cat, start)) = open {
        spans.extend(Span::new(start, end).map(|span| (cat, span)));
    }
}

/// Apenas os spans de locais, na ordem em que aparecem.
pub fn location_spans(tags: &[Tag]) -> Vec<Span<TokenIndex>> {
    bio_to_spans(tags)
        .into_iter()
        .filter(|(cat, _)| *cat == EntityCategory::Loc)
        .map(|(_, span)| span)
        .collect()
}
