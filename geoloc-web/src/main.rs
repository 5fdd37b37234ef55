//! Binário `geoloc`: servidor HTTP/WebSocket, parser de arquivos e console interativo

mod server;

use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use geoloc_core::{LocationModels, LocationOccurrence, TokenizerMode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geoloc", version, about = "Extrai candidatos a nomes de locais de texto livre")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sobe o servidor HTTP + WebSocket
    Serve {
        #[arg(long, env = "GEOLOC_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,
        #[command(flatten)]
        models: ModelArgs,
        /// Tamanho máximo aceito por documento, em bytes
        #[arg(long, env = "GEOLOC_MAX_DOCUMENT_BYTES", default_value_t = 1_048_576)]
        max_document_bytes: usize,
    },
    /// Extrai os locais de um arquivo e imprime JSON
    Parse {
        file: PathBuf,
        #[command(flatten)]
        models: ModelArgs,
    },
    /// Lê documentos da entrada padrão, um por linha, até EOF ou `quit`
    Console {
        #[command(flatten)]
        models: ModelArgs,
    },
    /// Grava os modelos embutidos como arquivos JSON
    ExportModels { dir: PathBuf },
}

#[derive(Args)]
struct ModelArgs {
    /// Diretório com pos-hmm.json, ner-hmm.json, pos-dictionary.json e gazetteer.json
    #[arg(long, env = "GEOLOC_MODELS")]
    models: Option<PathBuf>,
    /// Como as frases são quebradas em tokens
    #[arg(long, env = "GEOLOC_TOKENIZER", value_enum, default_value_t = TokenizerArg::Standard)]
    tokenizer: TokenizerArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TokenizerArg {
    /// Pontuação separada, abreviações e decimais preservados
    Standard,
    /// Apenas espaços separam tokens
    Whitespace,
}

impl From<TokenizerArg> for TokenizerMode {
    fn from(arg: TokenizerArg) -> Self {
        match arg {
            TokenizerArg::Standard => TokenizerMode::Standard,
            TokenizerArg::Whitespace => TokenizerMode::Whitespace,
        }
    }
}

impl ModelArgs {
    fn load(&self) -> anyhow::Result<LocationModels> {
        let models = match &self.models {
            Some(dir) => LocationModels::load(dir)
                .with_context(|| format!("não foi possível carregar os modelos de {}", dir.display()))?,
            None => LocationModels::builtin(),
        };
        Ok(models.with_tokenizer_mode(self.tokenizer.into()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs vão para stderr: stdout fica reservado para o JSON de `parse` e `console`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve {
            bind,
            models,
            max_document_bytes,
        } => {
            let models = models.load()?;
            let state = Arc::new(server::AppState::new(&models, max_document_bytes));
            server::serve(bind, state).await
        }
        Command::Parse { file, models } => parse_file(&file, &models.load()?),
        Command::Console { models } => {
            let models = models.load()?;
            tokio::task::spawn_blocking(move || run_console(&models)).await?
        }
        Command::ExportModels { dir } => {
            LocationModels::builtin()
                .save(&dir)
                .with_context(|| format!("não foi possível gravar os modelos em {}", dir.display()))?;
            info!("modelos gravados em {}", dir.display());
            Ok(())
        }
    }
}

fn parse_file(path: &Path, models: &LocationModels) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("não foi possível ler {}", path.display()))?;
    let occurrences = models
        .extractor()
        .extract(&text)
        .with_context(|| format!("falha ao extrair locais de {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&server::locate(&text, &occurrences))?);
    Ok(())
}

fn run_console(models: &LocationModels) -> anyhow::Result<()> {
    let mut extractor = models.extractor();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if is_quit(&line) {
            break;
        }
        let document = strip_bias(&line);
        match extractor.extract(document) {
            Ok(occurrences) => writeln!(stdout, "{}", render_line(document, &occurrences)?)?,
            Err(err) => warn!(%err, "linha ignorada"),
        }
        stdout.flush()?;
    }
    Ok(())
}

fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}

/// Remove um prefixo `lat|lon|` de viés geográfico, se houver; o resto da linha é o documento.
fn strip_bias(line: &str) -> &str {
    let mut parts = line.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), Some(doc))
            if lat.trim().parse::<f64>().is_ok() && lon.trim().parse::<f64>().is_ok() =>
        {
            doc
        }
        _ => line,
    }
}

fn render_line(document: &str, occurrences: &[LocationOccurrence]) -> serde_json::Result<String> {
    serde_json::to_string(&server::locate(document, occurrences))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_is_case_insensitive() {
        assert!(is_quit("quit"));
        assert!(is_quit("  QUIT \n"));
        assert!(!is_quit("quitting time in Paris"));
    }

    #[test]
    fn test_bias_prefix_is_stripped() {
        assert_eq!(strip_bias("48.85|2.35|I love Paris"), "I love Paris");
        assert_eq!(strip_bias(" -22.9 | -43.2 |Rio is hot"), "Rio is hot");
        // Sem números nos dois primeiros campos, a linha inteira é o documento
        assert_eq!(strip_bias("a|b|c"), "a|b|c");
        assert_eq!(strip_bias("1|2"), "1|2");
        assert_eq!(strip_bias("John went to Paris."), "John went to Paris.");
    }

    #[test]
    fn test_tokenizer_flag() {
        let cli = Cli::try_parse_from(["geoloc", "console", "--tokenizer", "whitespace"]).unwrap();
        match cli.command {
            Command::Console { models } => assert_eq!(models.tokenizer, TokenizerArg::Whitespace),
            _ => panic!("subcomando errado"),
        }
        assert!(Cli::try_parse_from(["geoloc", "console", "--tokenizer", "bogus"]).is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["geoloc", "parse", "doc.txt", "--models", "models"]).unwrap();
        match cli.command {
            Command::Parse { file, models } => {
                assert_eq!(file, PathBuf::from("doc.txt"));
                assert_eq!(models.models, Some(PathBuf::from("models")));
            }
            _ => panic!("subcomando errado"),
        }

        let cli = Cli::try_parse_from(["geoloc", "serve", "--bind", "127.0.0.1:8080"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { .. }));
    }

    #[test]
    fn test_console_line_is_json_array() {
        let mut extractor = LocationModels::builtin().extractor();
        let occurrences = extractor.extract("John went to Paris.").unwrap();
        let line = render_line("John went to Paris.", &occurrences).unwrap();
        assert!(line.starts_with('[') && line.ends_with(']'));
        assert!(line.contains(r#""text":"Paris""#));
        assert!(line.contains(r#""char_position":13"#));
        assert!(!line.contains('\n'));
    }
}
