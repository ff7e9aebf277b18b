use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

const ARQUIVO_SESSAO: &str = "sessao.token";

/// Fixed credential allow-list. The gate is a precondition for every page
/// except Login; there is no expiry model.
const CREDENCIAIS: &[(&str, &str)] = &[
    ("sakajiri", "saka@4599.123"),
    ("juan.gargiulo", "juan@1189.32"),
];

/// Opaque session token. Initialized at application start from the
/// persisted file, mutated only by login/logout, read by the page guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sessao {
    pub token: String,
}

pub fn autenticar(usuario: &str, senha: &str) -> Option<Sessao> {
    let valido = CREDENCIAIS
        .iter()
        .any(|(nome, chave)| *nome == usuario && *chave == senha);
    if !valido {
        return None;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    Some(Sessao {
        token: format!("{usuario}:{nanos:x}"),
    })
}

fn caminho_sessao(data_dir: &Path) -> PathBuf {
    data_dir.join(ARQUIVO_SESSAO)
}

pub fn carregar_sessao(data_dir: &Path) -> Option<Sessao> {
    let token = fs::read_to_string(caminho_sessao(data_dir)).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(Sessao { token })
}

pub fn gravar_sessao(data_dir: &Path, sessao: &Sessao) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data dir: {}", data_dir.display()))?;
    fs::write(caminho_sessao(data_dir), &sessao.token)
        .context("failed to persist session token")?;
    Ok(())
}

pub fn limpar_sessao(data_dir: &Path) -> Result<()> {
    let caminho = caminho_sessao(data_dir);
    if caminho.exists() {
        fs::remove_file(&caminho).context("failed to remove session token")?;
    }
    Ok(())
}
